use clap::Parser;
use pk_bench::config::VECTOR_LEN;
use pk_bench::{init_logging, runs, LaunchArgs};

/// Vector addition: serial baseline vs thread team.
#[derive(Parser)]
#[command(name = "shared-vector-add", version)]
struct Cli {
    #[command(flatten)]
    launch: LaunchArgs,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let team = cli.launch.thread_team()?;
    let report = runs::shared_vector_add(&team, VECTOR_LEN)?;
    print!("{}", report);
    Ok(())
}
