use clap::Parser;
use pk_bench::config::MATRIX_DIM;
use pk_bench::{init_logging, runs, LaunchArgs};

/// Dense matrix multiplication: serial baseline vs thread team.
#[derive(Parser)]
#[command(name = "shared-matrix-mult", version)]
struct Cli {
    #[command(flatten)]
    launch: LaunchArgs,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let team = cli.launch.thread_team()?;
    let report = runs::shared_matmul(&team, MATRIX_DIM, &cli.launch.verifier())?;
    print!("{}", report);
    Ok(())
}
