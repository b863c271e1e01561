use crate::error::{KernelError, Result};
use crate::matrix::alloc_zeroed;

/// `v[i] = i * scale`, the benchmark input pattern (`a = ramp(n, 1)`,
/// `b = ramp(n, 2)`).
pub fn ramp(len: usize, scale: f64) -> Result<Vec<f64>> {
    let mut v = alloc_zeroed(len)?;
    for (i, x) in v.iter_mut().enumerate() {
        *x = i as f64 * scale;
    }
    Ok(v)
}

pub fn check_lengths(a: &[f64], b: &[f64], c: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(KernelError::ShapeMismatch {
            expected: vec![a.len()],
            got: vec![b.len()],
        });
    }
    if c.len() != a.len() {
        return Err(KernelError::ShapeMismatch {
            expected: vec![a.len()],
            got: vec![c.len()],
        });
    }
    Ok(())
}

/// `c[i] = a[i] + b[i]` over the common prefix of the three slices.
pub fn add_into(a: &[f64], b: &[f64], c: &mut [f64]) {
    for ((ci, ai), bi) in c.iter_mut().zip(a).zip(b) {
        *ci = ai + bi;
    }
}
