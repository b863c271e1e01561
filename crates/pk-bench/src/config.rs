//! Launch parameters and fixed problem sizes.
//!
//! Problem sizes are constants. The only inputs are the ones a launcher
//! supplies: a thread-count hint, the in-process world size, and the
//! verification coverage. Each is a flag with an environment fallback.

use clap::{Args, ValueEnum};
use pk_core::verify::DEFAULT_WINDOW;
use pk_core::{MatmulVerifier, ThreadTeam};

/// Elements in the vector-add benchmarks.
pub const VECTOR_LEN: usize = 1_000_000;
/// Side of the square matrices in the matmul benchmarks.
pub const MATRIX_DIM: usize = 1000;
/// Midpoint intervals for the pi benchmarks.
pub const PI_STEPS: usize = 100_000_000;
/// Points drawn by the Monte-Carlo pi estimate.
pub const PI_SAMPLES: usize = 10_000_000;
/// Seed for the Monte-Carlo pi estimate.
pub const PI_SEED: u64 = 0x5EED;
/// Elements in the fixed-team chunked vector add.
pub const CHUNKED_LEN: usize = 1000;
/// Threads in the fixed-team chunked vector add.
pub const CHUNKED_THREADS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VerifyMode {
    /// Recompute the top-left 10x10 window only.
    Sampled,
    /// Recompute every entry.
    Exhaustive,
}

#[derive(Debug, Clone, Args)]
pub struct LaunchArgs {
    /// Upper bound on the thread-team size.
    #[arg(long, env = "PK_THREADS")]
    pub threads: Option<usize>,

    /// Ranks in the in-process world (ignored when launched under MPI).
    #[arg(long, env = "PK_WORKERS", default_value_t = 4)]
    pub workers: usize,

    /// Matrix verification coverage.
    #[arg(long, env = "PK_VERIFY", value_enum, default_value_t = VerifyMode::Sampled)]
    pub verify: VerifyMode,
}

impl LaunchArgs {
    pub fn thread_team(&self) -> pk_core::Result<ThreadTeam> {
        ThreadTeam::new(self.threads)
    }

    pub fn verifier(&self) -> MatmulVerifier {
        match self.verify {
            VerifyMode::Sampled => MatmulVerifier::sampled(DEFAULT_WINDOW),
            VerifyMode::Exhaustive => MatmulVerifier::exhaustive(),
        }
    }
}

/// Installs the `env_logger` backend; `RUST_LOG` selects verbosity.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pk_core::Coverage;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        launch: LaunchArgs,
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["bench", "--threads", "2", "--workers", "8", "--verify", "exhaustive"]);
        assert_eq!(cli.launch.threads, Some(2));
        assert_eq!(cli.launch.workers, 8);
        assert_eq!(cli.launch.verifier().coverage(), Coverage::Exhaustive);
        assert!(cli.launch.thread_team().unwrap().size() <= 2);
    }

    #[test]
    fn test_default_verifier_is_sampled() {
        let cli = Cli::parse_from(["bench", "--workers", "4"]);
        assert_eq!(
            cli.launch.verifier().coverage(),
            Coverage::Sampled { window: 10 }
        );
    }

    #[test]
    fn test_bad_verify_mode_rejected() {
        assert!(Cli::try_parse_from(["bench", "--verify", "partial"]).is_err());
    }
}
