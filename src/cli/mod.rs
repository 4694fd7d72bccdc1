pub mod commands;
pub mod output;
pub mod progress;
pub mod prompt;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "envdoctor",
    version,
    about = "Diagnose and fix your React Native development environment"
)]
pub struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the tools and SDKs your project needs, then offer to fix them
    Doctor(commands::doctor::DoctorArgs),
    /// Write a default .envdoctor.yml
    Init(commands::init::InitArgs),
}
