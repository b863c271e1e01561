//! Distributed midpoint-rule pi.
//!
//! Interval indices are split with the balanced scheme, so any step count
//! works for any world size. Partial sums are reduced at the coordinator and
//! scaled once.

use pk_core::cpu::quadrature::{midpoint_sum, step_width};
use pk_core::Partition;

use crate::comm::{Communicator, COORDINATOR};
use crate::error::Result;
use crate::stage::{enter, Stage};

/// Returns the estimate on the coordinator and `None` elsewhere.
pub fn integrate(comm: &dyn Communicator, steps: usize) -> Result<Option<f64>> {
    let range = Partition::balanced(steps, comm.size())?.range(comm.rank())?;

    enter(comm, Stage::Compute);
    let local = midpoint_sum(range, steps);

    enter(comm, Stage::Collect);
    let total = comm.reduce_sum(local, COORDINATOR)?;
    Ok(total.map(|sum| sum * step_width(steps)))
}
