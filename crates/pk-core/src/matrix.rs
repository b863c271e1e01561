use std::ops::{Index, IndexMut, Range};

use crate::error::{KernelError, Result};

/// Allocate a zero-filled `f64` buffer, surfacing allocation failure as an
/// error instead of aborting.
pub fn alloc_zeroed(len: usize) -> Result<Vec<f64>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| KernelError::Allocation { elements: len })?;
    data.resize(len, 0.0);
    Ok(data)
}

/// Dense row-major `f64` matrix.
///
/// Dimensions are fixed at construction; the buffer is released when the
/// matrix is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Create a zero-filled matrix.
    ///
    /// # Errors
    /// Returns `Allocation` if the buffer cannot be reserved or `rows * cols`
    /// overflows.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .ok_or(KernelError::Allocation { elements: usize::MAX })?;
        Ok(Matrix {
            data: alloc_zeroed(len)?,
            rows,
            cols,
        })
    }

    /// Create a matrix whose entry `(i, j)` is `f(i, j)`.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut m = Matrix::zeros(rows, cols)?;
        for i in 0..rows {
            let row = m.row_mut(i);
            for (j, v) in row.iter_mut().enumerate() {
                *v = f(i, j);
            }
        }
        Ok(m)
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(KernelError::ShapeMismatch {
                expected: vec![rows, cols],
                got: vec![data.len()],
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Square `n x n` matrix with `A[i][j] = i + j`, the benchmark input.
    pub fn index_sum(n: usize) -> Result<Self> {
        Matrix::from_fn(n, n, |i, j| (i + j) as f64)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Returns a reference to row `i`.
    ///
    /// # Panics
    /// Panics if `i >= rows()`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Contiguous storage of the rows in `rows`.
    ///
    /// # Panics
    /// Panics if `rows.end > self.rows()`.
    pub fn row_block(&self, rows: Range<usize>) -> &[f64] {
        &self.data[rows.start * self.cols..rows.end * self.cols]
    }

    pub fn row_block_mut(&mut self, rows: Range<usize>) -> &mut [f64] {
        &mut self.data[rows.start * self.cols..rows.end * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        debug_assert!(j < self.cols);
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        debug_assert!(j < self.cols);
        &mut self.data[i * self.cols + j]
    }
}
