use clap::Parser;
use pk_bench::config::MATRIX_DIM;
use pk_bench::{init_logging, run_distributed, runs, LaunchArgs};

/// Row-block matrix multiplication across message-passing ranks.
#[derive(Parser)]
#[command(name = "dist-matrix-mult", version)]
struct Cli {
    #[command(flatten)]
    launch: LaunchArgs,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let verifier = cli.launch.verifier();
    run_distributed(&cli.launch, |comm| runs::dist_matmul(comm, MATRIX_DIM, &verifier))
}
