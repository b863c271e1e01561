pub mod matmul;
pub mod quadrature;
pub mod vector;

use crate::backend::ComputeBackend;
use crate::error::Result;
use crate::matrix::Matrix;

/// Single-threaded reference backend.
///
/// Every parallel path is checked and timed against this one.
#[derive(Debug, Clone)]
pub struct SerialBackend;

impl SerialBackend {
    pub fn new() -> Self {
        SerialBackend
    }
}

impl Default for SerialBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for SerialBackend {
    fn workers(&self) -> usize {
        1
    }

    fn vector_add(&self, a: &[f64], b: &[f64], c: &mut [f64]) -> Result<()> {
        vector::check_lengths(a, b, c)?;
        vector::add_into(a, b, c);
        Ok(())
    }

    fn matmul(&self, a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
        matmul::check_shapes(a, b, c)?;
        let rows = a.rows();
        matmul::matmul_rows_into(a, b, 0..rows, c.as_mut_slice());
        Ok(())
    }

    fn integrate_pi(&self, steps: usize) -> Result<f64> {
        Ok(quadrature::midpoint_sum(0..steps, steps) * quadrature::step_width(steps))
    }

    fn sample_pi(&self, samples: usize, seed: u64) -> Result<f64> {
        let mut rng = quadrature::worker_rng(seed, 0);
        let hits = quadrature::quarter_circle_hits(samples, &mut rng);
        Ok(quadrature::hits_to_pi(hits, samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn backend() -> SerialBackend {
        SerialBackend::new()
    }

    #[test]
    fn test_matmul_identity() {
        let b = backend();
        let id = Matrix::from_fn(3, 3, |i, j| if i == j { 1.0 } else { 0.0 }).unwrap();
        let x = Matrix::index_sum(3).unwrap();
        let mut c = Matrix::zeros(3, 3).unwrap();
        b.matmul(&id, &x, &mut c).unwrap();
        assert_eq!(c, x);
    }

    #[test]
    fn test_matmul_basic() {
        let b = backend();
        let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let x = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let mut c = Matrix::zeros(2, 2).unwrap();
        b.matmul(&a, &x, &mut c).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matmul_index_sum() {
        // A = B = [0,1;1,2] -> [1,2;2,5]
        let b = backend();
        let a = Matrix::index_sum(2).unwrap();
        let mut c = Matrix::zeros(2, 2).unwrap();
        b.matmul(&a, &a, &mut c).unwrap();
        assert_eq!(c.as_slice(), &[1.0, 2.0, 2.0, 5.0]);
    }

    #[test]
    fn test_matmul_dimension_mismatch() {
        let b = backend();
        let a = Matrix::zeros(1, 3).unwrap();
        let x = Matrix::zeros(2, 2).unwrap();
        let mut c = Matrix::zeros(1, 2).unwrap();
        assert!(b.matmul(&a, &x, &mut c).is_err());
    }

    #[test]
    fn test_vector_add_ramp() {
        let b = backend();
        let x = vector::ramp(1000, 1.0).unwrap();
        let y = vector::ramp(1000, 2.0).unwrap();
        let mut z = vec![0.0; 1000];
        b.vector_add(&x, &y, &mut z).unwrap();
        for i in 0..1000 {
            assert_eq!(z[i], x[i] + y[i]);
            assert_eq!(z[i], 3.0 * i as f64);
        }
    }

    #[test]
    fn test_add_length_mismatch() {
        let b = backend();
        let mut c = vec![0.0];
        assert!(b.vector_add(&[1.0], &[1.0, 2.0], &mut c).is_err());
    }

    #[test]
    fn test_integrate_pi() {
        let pi = backend().integrate_pi(1_000_000).unwrap();
        assert_abs_diff_eq!(pi, PI, epsilon = 1e-5);
    }

    #[test]
    fn test_sample_pi() {
        let pi = backend().sample_pi(100_000, 11).unwrap();
        assert_abs_diff_eq!(pi, PI, epsilon = 0.05);
    }
}
