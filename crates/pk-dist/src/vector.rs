//! Distributed element-wise vector addition.

use std::ops::Range;

use pk_core::cpu::vector::add_into;
use pk_core::matrix::alloc_zeroed;
use pk_core::{KernelError, Partition};

use crate::comm::{Communicator, COORDINATOR};
use crate::error::Result;
use crate::stage::{enter, Stage};

/// Index range owned by the calling rank.
pub fn owned_range(comm: &dyn Communicator, len: usize) -> Result<Range<usize>> {
    Ok(Partition::exact(len, comm.size())?.range(comm.rank())?)
}

/// Broadcasts the coordinator's `a` and `b`, adds the owned slice on every
/// rank, and gathers `c` at the coordinator.
///
/// Non-coordinators pass zeroed vectors of the coordinator's length.
pub fn add(comm: &dyn Communicator, a: &mut [f64], b: &mut [f64]) -> Result<Option<Vec<f64>>> {
    if a.len() != b.len() {
        return Err(KernelError::ShapeMismatch {
            expected: vec![a.len()],
            got: vec![b.len()],
        }
        .into());
    }
    let range = owned_range(comm, a.len())?;
    let mut block = alloc_zeroed(range.len())?;

    enter(comm, Stage::Distribute);
    comm.broadcast(a, COORDINATOR)?;
    comm.broadcast(b, COORDINATOR)?;

    enter(comm, Stage::Compute);
    add_into(&a[range.clone()], &b[range], &mut block);

    enter(comm, Stage::Collect);
    comm.gather(&block, COORDINATOR)
}
