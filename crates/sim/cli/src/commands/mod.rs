//! Command implementations for apl-sim
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod run;
mod validate;

pub use run::Run;
pub use validate::Validate;

/// Output format shared by commands
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Summary,
    /// JSON document on stdout
    Json,
}
