use std::fmt::Debug;

use crate::error::Result;
use crate::matrix::Matrix;

/// Trait for pluggable shared-memory compute backends (serial reference,
/// thread team).
///
/// Inputs are borrowed and outputs are written into caller-owned buffers, so
/// a benchmark can time the serial and parallel paths against the same
/// allocations.
pub trait ComputeBackend: Send + Sync + Debug {
    /// Number of workers the backend spreads a kernel across.
    fn workers(&self) -> usize;

    /// Element-wise addition: c[i] = a[i] + b[i].
    fn vector_add(&self, a: &[f64], b: &[f64], c: &mut [f64]) -> Result<()>;

    /// Matrix multiplication: C = A @ B.
    ///
    /// - `a`: shape [m, k]
    /// - `b`: shape [k, n]
    /// - `c`: shape [m, n], fully overwritten
    fn matmul(&self, a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()>;

    /// Midpoint-rule estimate of pi with `steps` intervals.
    fn integrate_pi(&self, steps: usize) -> Result<f64>;

    /// Monte-Carlo estimate of pi from `samples` uniform points, seeded
    /// deterministically from `seed`.
    fn sample_pi(&self, samples: usize, seed: u64) -> Result<f64>;
}
