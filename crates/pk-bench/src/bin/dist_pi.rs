use clap::Parser;
use pk_bench::config::PI_STEPS;
use pk_bench::{init_logging, run_distributed, runs, LaunchArgs};

/// Midpoint-rule pi across message-passing ranks.
#[derive(Parser)]
#[command(name = "dist-pi", version)]
struct Cli {
    #[command(flatten)]
    launch: LaunchArgs,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    run_distributed(&cli.launch, |comm| runs::dist_pi(comm, PI_STEPS))
}
