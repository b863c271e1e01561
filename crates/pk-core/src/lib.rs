//! `pk-core` - Kernels and shared-memory backends for parallel-kernels.
//!
//! This crate provides:
//! - A row-major `Matrix` with fallible allocation
//! - A `Partition` that maps an index space onto workers
//! - Reference kernels: vector add, row-block matmul, pi quadrature
//! - A `ComputeBackend` trait with serial and thread-team implementations
//! - Sampled and exhaustive result verification

pub mod backend;
pub mod cpu;
pub mod error;
pub mod matrix;
pub mod partition;
pub mod team;
pub mod verify;

// Re-export primary types at the crate root for convenience.
pub use backend::ComputeBackend;
pub use cpu::SerialBackend;
pub use error::{KernelError, Result};
pub use matrix::Matrix;
pub use partition::Partition;
pub use team::ThreadTeam;
pub use verify::{Coverage, MatmulVerifier};
