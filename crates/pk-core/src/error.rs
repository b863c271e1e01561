use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelError {
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("matmul dimension mismatch: [{m}x{k}] @ [{k2}x{n}]")]
    MatmulMismatch {
        m: usize,
        k: usize,
        k2: usize,
        n: usize,
    },
    #[error("{total} items cannot be split evenly across {workers} workers")]
    UnevenPartition { total: usize, workers: usize },
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("worker index {index} out of range for {workers} workers")]
    WorkerOutOfRange { index: usize, workers: usize },
    #[error("failed to allocate {elements} elements")]
    Allocation { elements: usize },
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, KernelError>;
