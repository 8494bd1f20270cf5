//! Agentdeck CLI Binary

use agentdeck::logging::init_logging;
use agentdeck::tooling::cli::{Cli, CliContext};
use anyhow::Context;
use clap::Parser;
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = cli.resolve_config().context("Failed to load configuration")?;
    init_logging(Some(&config.logging)).context("Failed to initialize logging")?;
    let context = CliContext::new(&config).context("Failed to connect to configuration store")?;
    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
