use ada_matting::cli::Cli;
use ada_matting::infra::logger::{self, LoggerConfig};
use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // One logger per process; every layer below logs through `tracing`.
    let logger = logger::init(&LoggerConfig::new(cli.write_log))?;

    cli.run(logger)
}
