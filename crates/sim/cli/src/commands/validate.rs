//! Compile a rotation against its scenario and print diagnostics
//!
//! Exits with an error when any entry produced a warning or error, so the
//! command can gate rotation files in scripts.

use anyhow::Result;
use apl::ValidationMessage;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use super::OutputFormat;
use crate::session::Session;

/// Compile the rotation and print its diagnostics
#[derive(Parser)]
pub struct Validate {
    /// Directory containing scenario.ron and rotation.ron
    #[arg(value_name = "DATA_DIR")]
    data_dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct EntryReport {
    index: usize,
    description: String,
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    entries: usize,
    active: Vec<EntryReport>,
    messages: Vec<String>,
    warnings: usize,
}

impl Validate {
    pub fn execute(self) -> Result<()> {
        let session = Session::load(&self.data_dir)?;
        let (_, rotation, diagnostics) =
            session.compile(session.trial.sim_config()?, session.trial.seed)?;

        let warnings = diagnostics.warnings().count();
        let report = ValidationReport {
            entries: rotation.len(),
            active: rotation
                .active_entries()
                .map(|(index, entry)| EntryReport {
                    index,
                    description: entry.describe(),
                })
                .collect(),
            messages: diagnostics
                .into_messages()
                .iter()
                .map(ValidationMessage::to_string)
                .collect(),
            warnings,
        };

        match self.format {
            OutputFormat::Summary => {
                println!("Entries: {} ({} active)", report.entries, report.active.len());
                for entry in &report.active {
                    println!("  #{:<3} {}", entry.index, entry.description);
                }
                for message in &report.messages {
                    println!("{}", message);
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        if report.warnings > 0 {
            anyhow::bail!("Rotation has {} warning(s)", report.warnings);
        }
        Ok(())
    }
}
