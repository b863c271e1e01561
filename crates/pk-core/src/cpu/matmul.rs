// Row-block matrix multiplication shared by every backend.
//
// Summation runs left to right over k with loop order i, j, k, so any
// partitioning of the rows reproduces the serial result bit for bit.

use std::ops::Range;

use crate::error::{KernelError, Result};
use crate::matrix::Matrix;

/// Checks that `a @ b` is defined and that `c` has the product's shape.
pub fn check_shapes(a: &Matrix, b: &Matrix, c: &Matrix) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(KernelError::MatmulMismatch {
            m: a.rows(),
            k: a.cols(),
            k2: b.rows(),
            n: b.cols(),
        });
    }
    if c.dims() != [a.rows(), b.cols()] {
        return Err(KernelError::ShapeMismatch {
            expected: vec![a.rows(), b.cols()],
            got: c.dims().to_vec(),
        });
    }
    Ok(())
}

/// Single output entry `C[i][j]`.
pub fn dot(a: &Matrix, b: &Matrix, i: usize, j: usize) -> f64 {
    let row = a.row(i);
    let mut sum = 0.0f64;
    for (k, &aik) in row.iter().enumerate() {
        sum += aik * b[(k, j)];
    }
    sum
}

/// Computes rows `rows` of `a @ b` into `out`, which holds exactly those rows.
///
/// # Panics
/// Panics if `out.len() != rows.len() * b.cols()`; callers validate shapes
/// with [`check_shapes`] first.
pub fn matmul_rows_into(a: &Matrix, b: &Matrix, rows: Range<usize>, out: &mut [f64]) {
    let n = b.cols();
    assert_eq!(out.len(), rows.len() * n, "row block length mismatch");

    for (local, i) in rows.enumerate() {
        let out_row = &mut out[local * n..(local + 1) * n];
        for (j, cij) in out_row.iter_mut().enumerate() {
            *cij = dot(a, b, i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_matches_full() {
        let a = Matrix::index_sum(6).unwrap();
        let b = Matrix::index_sum(6).unwrap();
        let mut full = vec![0.0; 36];
        matmul_rows_into(&a, &b, 0..6, &mut full);

        let mut block = vec![0.0; 12];
        matmul_rows_into(&a, &b, 2..4, &mut block);
        assert_eq!(&full[12..24], block.as_slice());
    }

    #[test]
    fn test_dot_known_value() {
        // [1,2;3,4] @ [5,6;7,8] = [19,22;43,50]
        let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        assert_eq!(dot(&a, &b, 0, 0), 19.0);
        assert_eq!(dot(&a, &b, 1, 1), 50.0);
    }

    #[test]
    fn test_check_shapes() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(3, 4).unwrap();
        assert!(check_shapes(&a, &b, &Matrix::zeros(2, 4).unwrap()).is_ok());
        assert!(matches!(
            check_shapes(&a, &a, &Matrix::zeros(2, 3).unwrap()),
            Err(KernelError::MatmulMismatch { .. })
        ));
        assert!(matches!(
            check_shapes(&a, &b, &Matrix::zeros(4, 2).unwrap()),
            Err(KernelError::ShapeMismatch { .. })
        ));
    }
}
