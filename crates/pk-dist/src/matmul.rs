//! Distributed dense matrix multiplication with row-block partitioning.
//!
//! Every rank allocates matching storage, the coordinator's inputs are
//! broadcast whole, each rank computes the rows it owns, and the row blocks are
//! gathered in rank order into a fresh matrix at the coordinator.

use std::ops::Range;

use pk_core::cpu::matmul::matmul_rows_into;
use pk_core::matrix::alloc_zeroed;
use pk_core::{KernelError, Matrix, Partition};

use crate::comm::{Communicator, COORDINATOR};
use crate::error::Result;
use crate::stage::{enter, Stage};

/// Row range owned by the calling rank.
///
/// # Errors
/// `UnevenPartition` if `rows` is not a multiple of the world size.
pub fn owned_rows(comm: &dyn Communicator, rows: usize) -> Result<Range<usize>> {
    Ok(Partition::exact(rows, comm.size())?.range(comm.rank())?)
}

/// Replicates the coordinator's `a` and `b` onto every rank.
///
/// Non-coordinators must pass matrices of the coordinator's shape; their
/// contents are overwritten.
///
/// # Errors
/// `ShapeMismatch` on a rank whose shapes differ from the coordinator's. The
/// dimensions travel ahead of the data, so equal element counts in a
/// different shape are rejected too.
pub fn distribute(comm: &dyn Communicator, a: &mut Matrix, b: &mut Matrix) -> Result<()> {
    enter(comm, Stage::Distribute);
    let local = [a.rows(), a.cols(), b.rows(), b.cols()];
    let mut dims = local.map(|d| d as f64);
    comm.broadcast(&mut dims, COORDINATOR)?;
    let root = dims.map(|d| d as usize);
    if root != local {
        return Err(KernelError::ShapeMismatch {
            expected: root.to_vec(),
            got: local.to_vec(),
        }
        .into());
    }

    comm.broadcast(a.as_mut_slice(), COORDINATOR)?;
    comm.broadcast(b.as_mut_slice(), COORDINATOR)?;
    Ok(())
}

/// Computes the rank's owned rows of `a @ b`. Returns the row-major block.
pub fn compute_block(comm: &dyn Communicator, a: &Matrix, b: &Matrix) -> Result<Vec<f64>> {
    enter(comm, Stage::Compute);
    let rows = owned_rows(comm, a.rows())?;
    let mut block = alloc_zeroed(rows.len() * b.cols())?;
    matmul_rows_into(a, b, rows, &mut block);
    Ok(block)
}

/// Gathers every rank's block into an `rows x cols` matrix at the
/// coordinator. Other ranks get `None`.
pub fn collect(
    comm: &dyn Communicator,
    block: &[f64],
    rows: usize,
    cols: usize,
) -> Result<Option<Matrix>> {
    enter(comm, Stage::Collect);
    match comm.gather(block, COORDINATOR)? {
        Some(staged) => Ok(Some(Matrix::from_vec(rows, cols, staged)?)),
        None => Ok(None),
    }
}

/// Full pipeline: distribute, compute, collect.
///
/// Shapes and the partition precondition are checked on every rank before
/// any communication, so a bad launch fails everywhere instead of leaving
/// ranks blocked in a collective.
pub fn multiply(comm: &dyn Communicator, a: &mut Matrix, b: &mut Matrix) -> Result<Option<Matrix>> {
    if a.cols() != b.rows() {
        return Err(KernelError::MatmulMismatch {
            m: a.rows(),
            k: a.cols(),
            k2: b.rows(),
            n: b.cols(),
        }
        .into());
    }
    let (rows, cols) = (a.rows(), b.cols());
    owned_rows(comm, rows)?;

    distribute(comm, a, b)?;
    let block = compute_block(comm, a, b)?;
    collect(comm, &block, rows, cols)
}
