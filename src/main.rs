mod checks;
mod cli;
mod core;
mod fixers;
mod reporters;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let default = if verbose { "envdoctor=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Doctor(args) => {
            let exit = cli::commands::doctor::execute(args).await?;
            Ok(ExitCode::from(exit.code()))
        }
        Commands::Init(args) => {
            cli::commands::init::execute(args).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
