use clap::Parser;
use pk_bench::config::{PI_SAMPLES, PI_SEED, PI_STEPS};
use pk_bench::{init_logging, runs, LaunchArgs};

/// Midpoint-rule pi: serial baseline vs thread team, plus a Monte-Carlo
/// estimate.
#[derive(Parser)]
#[command(name = "shared-pi", version)]
struct Cli {
    #[command(flatten)]
    launch: LaunchArgs,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let team = cli.launch.thread_team()?;
    let report = runs::shared_pi(&team, PI_STEPS, PI_SAMPLES, PI_SEED)?;
    print!("{}", report);
    Ok(())
}
