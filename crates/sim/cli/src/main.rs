//! APL simulator entry point.
//!
//! Run with: `apl-sim <command> <DATA_DIR>`

mod commands;
mod session;

use anyhow::Result;
use clap::Parser;
use commands::{Run, Validate};

/// Evaluate action priority lists against a simulated encounter
#[derive(Parser)]
#[command(name = "apl-sim")]
#[command(about = "Action priority list simulator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run trials and report damage per second
    Run(Run),

    /// Compile the rotation and print its diagnostics
    Validate(Validate),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::Validate(cmd) => cmd.execute(),
    }
}
