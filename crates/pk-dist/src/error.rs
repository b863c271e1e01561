use thiserror::Error;

#[derive(Error, Debug)]
pub enum DistError {
    #[error("kernel error: {0}")]
    Kernel(#[from] pk_core::KernelError),
    #[error("message length mismatch: expected {expected}, got {got} from rank {from}")]
    LengthMismatch {
        expected: usize,
        got: usize,
        from: usize,
    },
    #[error("rank {peer} disconnected before completing the collective")]
    Disconnected { peer: usize },
    #[error("rank {0} panicked")]
    RankPanicked(usize),
    #[error("root rank {root} out of range for {size} ranks")]
    InvalidRoot { root: usize, size: usize },
    #[error("communicator initialization failed: {0}")]
    Init(String),
}

pub type Result<T> = std::result::Result<T, DistError>;
