//! `pk-dist` - Message-passing runtime for parallel-kernels.
//!
//! This crate provides:
//! - A `Communicator` trait with blocking collectives
//! - `LocalWorld`, an in-process world of thread-backed ranks
//! - `MpiComm`, an MPI communicator (behind the `mpi` feature)
//! - Distributed vector add, row-block matmul, and pi quadrature

pub mod comm;
pub mod error;
pub mod local;
pub mod matmul;
#[cfg(feature = "mpi")]
pub mod mpi_comm;
pub mod pi;
pub mod stage;
pub mod vector;

pub use comm::{Communicator, COORDINATOR};
pub use error::{DistError, Result};
pub use local::{LocalComm, LocalWorld};
#[cfg(feature = "mpi")]
pub use mpi_comm::MpiComm;
pub use stage::Stage;
