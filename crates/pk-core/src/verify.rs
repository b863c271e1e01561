//! Result checks run by the coordinator after a parallel kernel.
//!
//! Matrix products are checked by recomputing entries straight from the
//! inputs. The default [`Coverage::Sampled`] window only looks at the top-left
//! corner of the product, so corruption elsewhere goes unnoticed; test suites
//! use [`Coverage::Exhaustive`].

use crate::cpu::matmul::dot;
use crate::matrix::Matrix;

/// Side of the square window checked by default.
pub const DEFAULT_WINDOW: usize = 10;

/// Absolute tolerance for recomputed matrix entries.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Entries `(i, j)` with `i, j < window`, clamped to the matrix.
    Sampled { window: usize },
    /// Every entry.
    Exhaustive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatmulVerifier {
    coverage: Coverage,
    tolerance: f64,
}

impl MatmulVerifier {
    pub fn sampled(window: usize) -> Self {
        MatmulVerifier {
            coverage: Coverage::Sampled { window },
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn exhaustive() -> Self {
        MatmulVerifier {
            coverage: Coverage::Exhaustive,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    /// Returns `true` when every covered entry of `c` is within tolerance of
    /// the recomputed `(a @ b)[i][j]`. Mismatched shapes fail.
    pub fn verify(&self, a: &Matrix, b: &Matrix, c: &Matrix) -> bool {
        if a.cols() != b.rows() || c.dims() != [a.rows(), b.cols()] {
            return false;
        }

        let (rows, cols) = match self.coverage {
            Coverage::Sampled { window } => (window.min(c.rows()), window.min(c.cols())),
            Coverage::Exhaustive => (c.rows(), c.cols()),
        };

        for i in 0..rows {
            for j in 0..cols {
                let expected = dot(a, b, i, j);
                let diff = (c[(i, j)] - expected).abs();
                if diff.is_nan() || diff > self.tolerance {
                    log::debug!(
                        "verification mismatch at ({}, {}): got {}, expected {}",
                        i,
                        j,
                        c[(i, j)],
                        expected
                    );
                    return false;
                }
            }
        }
        true
    }
}

impl Default for MatmulVerifier {
    fn default() -> Self {
        Self::sampled(DEFAULT_WINDOW)
    }
}

/// Exact full check of `c[i] == a[i] + b[i]`.
pub fn verify_vector_add(a: &[f64], b: &[f64], c: &[f64]) -> bool {
    if a.len() != b.len() || a.len() != c.len() {
        return false;
    }
    a.iter().zip(b).zip(c).all(|((x, y), z)| *z == x + y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ComputeBackend;
    use crate::cpu::SerialBackend;

    fn product(n: usize) -> (Matrix, Matrix, Matrix) {
        let a = Matrix::index_sum(n).unwrap();
        let b = Matrix::index_sum(n).unwrap();
        let mut c = Matrix::zeros(n, n).unwrap();
        SerialBackend::new().matmul(&a, &b, &mut c).unwrap();
        (a, b, c)
    }

    #[test]
    fn test_sampled_passes() {
        let (a, b, c) = product(24);
        assert!(MatmulVerifier::default().verify(&a, &b, &c));
    }

    #[test]
    fn test_window_clamped() {
        let (a, b, c) = product(4);
        assert!(MatmulVerifier::sampled(100).verify(&a, &b, &c));
    }

    #[test]
    fn test_sampled_misses_outside_window() {
        let (a, b, mut c) = product(16);
        c[(15, 15)] += 1.0;
        assert!(MatmulVerifier::default().verify(&a, &b, &c));
        assert!(!MatmulVerifier::exhaustive().verify(&a, &b, &c));
    }

    #[test]
    fn test_sampled_catches_inside_window() {
        let (a, b, mut c) = product(16);
        c[(3, 7)] += 1e-3;
        assert!(!MatmulVerifier::default().verify(&a, &b, &c));
        assert!(MatmulVerifier::default()
            .with_tolerance(1e-2)
            .verify(&a, &b, &c));
    }

    #[test]
    fn test_nan_rejected() {
        let (a, b, mut c) = product(4);
        c[(0, 0)] = f64::NAN;
        assert!(!MatmulVerifier::default().verify(&a, &b, &c));
        assert!(!MatmulVerifier::exhaustive().verify(&a, &b, &c));

        let (a, b, mut c) = product(16);
        c[(12, 3)] = f64::INFINITY;
        assert!(!MatmulVerifier::exhaustive().verify(&a, &b, &c));
    }

    #[test]
    fn test_shape_mismatch_fails() {
        let (a, b, _) = product(4);
        let c = Matrix::zeros(3, 4).unwrap();
        assert!(!MatmulVerifier::exhaustive().verify(&a, &b, &c));
    }

    #[test]
    fn test_vector_add_check() {
        let a = [0.0, 1.0, 2.0];
        let b = [0.0, 2.0, 4.0];
        assert!(verify_vector_add(&a, &b, &[0.0, 3.0, 6.0]));
        assert!(!verify_vector_add(&a, &b, &[0.0, 3.0, 6.5]));
        assert!(!verify_vector_add(&a, &b, &[0.0, 3.0]));
        assert!(!verify_vector_add(&a, &b, &[0.0, f64::NAN, 6.0]));
    }
}
