//! MPI-backed communicator for multi-process launches (`mpirun -n P ...`).
//!
//! Gated behind the `mpi` feature; requires a system MPI installation.

use mpi::collective::SystemOperation;
use mpi::environment::Universe;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

use crate::error::{DistError, Result};

pub struct MpiComm {
    world: SimpleCommunicator,
    rank: usize,
    size: usize,
    // Finalizes MPI on drop, so it must outlive `world`.
    _universe: Universe,
}

impl MpiComm {
    /// Initializes MPI and binds to the world communicator.
    ///
    /// # Errors
    /// `Init` if MPI was already initialized in this process.
    pub fn init() -> Result<Self> {
        let universe = mpi::initialize()
            .ok_or_else(|| DistError::Init("MPI is already initialized".to_string()))?;
        let world = universe.world();
        let rank = world.rank() as usize;
        let size = world.size() as usize;
        log::info!("MPI rank {} of {} ready", rank, size);
        Ok(MpiComm {
            world,
            rank,
            size,
            _universe: universe,
        })
    }

    fn check_root(&self, root: usize) -> Result<()> {
        if root >= self.size {
            return Err(DistError::InvalidRoot {
                root,
                size: self.size,
            });
        }
        Ok(())
    }
}

impl crate::comm::Communicator for MpiComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) -> Result<()> {
        self.world.barrier();
        Ok(())
    }

    fn broadcast(&self, buf: &mut [f64], root: usize) -> Result<()> {
        self.check_root(root)?;
        self.world
            .process_at_rank(root as i32)
            .broadcast_into(buf);
        Ok(())
    }

    fn gather(&self, local: &[f64], root: usize) -> Result<Option<Vec<f64>>> {
        self.check_root(root)?;
        let root_process = self.world.process_at_rank(root as i32);
        if self.rank == root {
            let mut staged = vec![0.0f64; local.len() * self.size];
            root_process.gather_into_root(local, &mut staged[..]);
            Ok(Some(staged))
        } else {
            root_process.gather_into(local);
            Ok(None)
        }
    }

    fn reduce_sum(&self, value: f64, root: usize) -> Result<Option<f64>> {
        self.check_root(root)?;
        let root_process = self.world.process_at_rank(root as i32);
        if self.rank == root {
            let mut total = 0.0f64;
            root_process.reduce_into_root(&value, &mut total, SystemOperation::sum());
            Ok(Some(total))
        } else {
            root_process.reduce_into(&value, SystemOperation::sum());
            Ok(None)
        }
    }
}
