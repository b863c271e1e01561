use clap::Parser;
use pk_bench::config::{CHUNKED_LEN, CHUNKED_THREADS};
use pk_bench::{init_logging, runs};

/// Vector addition on a fixed team of four threads with manual chunking.
#[derive(Parser)]
#[command(name = "chunked-vector-add", version)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    init_logging();
    let _cli = Cli::parse();

    let report = runs::chunked_vector_add(CHUNKED_LEN, CHUNKED_THREADS)?;
    print!("{}", report);
    Ok(())
}
