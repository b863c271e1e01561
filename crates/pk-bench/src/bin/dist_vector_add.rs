use clap::Parser;
use pk_bench::config::VECTOR_LEN;
use pk_bench::{init_logging, run_distributed, runs, LaunchArgs};

/// Vector addition across message-passing ranks.
#[derive(Parser)]
#[command(name = "dist-vector-add", version)]
struct Cli {
    #[command(flatten)]
    launch: LaunchArgs,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    run_distributed(&cli.launch, |comm| runs::dist_vector_add(comm, VECTOR_LEN))
}
