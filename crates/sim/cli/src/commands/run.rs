//! Run trials in parallel and summarize damage per second
//!
//! Every trial gets its own simulation and compiled rotation. Trial `i`
//! is seeded with `seed + i`, so a run is reproducible for a given seed
//! regardless of thread count.

use anyhow::{Context, Result};
use apl::TrialReport;
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use super::OutputFormat;
use crate::session::Session;

/// Run trials and report damage per second
#[derive(Parser)]
pub struct Run {
    /// Directory containing scenario.ron, rotation.ron and config.toml
    #[arg(value_name = "DATA_DIR")]
    data_dir: PathBuf,

    /// Number of trials (overrides config.toml)
    #[arg(short = 'n', long, value_name = "N")]
    iterations: Option<u32>,

    /// Encounter length in seconds (overrides config.toml)
    #[arg(short, long, value_name = "SECS")]
    duration: Option<f64>,

    /// Base seed (overrides config.toml)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Worker threads (overrides config.toml)
    #[arg(short = 'j', long, value_name = "N")]
    threads: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

/// Aggregate over every trial of a run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub iterations: u32,
    pub duration_secs: f64,
    pub seed: u64,
    pub mean_dps: f64,
    pub min_dps: f64,
    pub max_dps: f64,
    pub stddev_dps: f64,
    pub mean_damage: f64,
    pub mean_casts: f64,
    pub warnings: Vec<String>,
}

impl RunSummary {
    fn new(reports: &[TrialReport], duration_secs: f64, seed: u64, warnings: Vec<String>) -> Self {
        let n = reports.len().max(1) as f64;
        let dps: Vec<f64> = reports.iter().map(TrialReport::dps).collect();
        let mean_dps = dps.iter().sum::<f64>() / n;
        let variance = dps.iter().map(|d| (d - mean_dps).powi(2)).sum::<f64>() / n;

        Self {
            iterations: reports.len() as u32,
            duration_secs,
            seed,
            mean_dps,
            min_dps: dps.iter().copied().fold(f64::INFINITY, f64::min),
            max_dps: dps.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            stddev_dps: variance.sqrt(),
            mean_damage: reports.iter().map(|r| r.damage).sum::<f64>() / n,
            mean_casts: reports.iter().map(|r| f64::from(r.casts)).sum::<f64>() / n,
            warnings,
        }
    }

    fn print(&self) {
        println!("Trials:     {}", self.iterations);
        println!("Duration:   {:.1}s", self.duration_secs);
        println!("Seed:       {}", self.seed);
        println!(
            "DPS:        {:.1} (min {:.1}, max {:.1}, stddev {:.1})",
            self.mean_dps, self.min_dps, self.max_dps, self.stddev_dps
        );
        println!("Damage:     {:.1}", self.mean_damage);
        println!("Casts:      {:.1}", self.mean_casts);
        if !self.warnings.is_empty() {
            println!("\nWarnings ({}):", self.warnings.len());
            for warning in &self.warnings {
                println!("  {}", warning);
            }
        }
    }
}

impl Run {
    pub fn execute(self) -> Result<()> {
        let mut session = Session::load(&self.data_dir)?;
        let trial = &mut session.trial;
        if let Some(iterations) = self.iterations {
            trial.iterations = iterations;
        }
        if let Some(duration) = self.duration {
            trial.duration_secs = duration;
        }
        if let Some(seed) = self.seed {
            trial.seed = seed;
        }
        if self.threads.is_some() {
            trial.threads = self.threads;
        }
        if trial.iterations == 0 {
            anyhow::bail!("At least one trial is required");
        }

        let trial = session.trial.clone();
        let sim_config = trial.sim_config()?;

        // Diagnostics do not depend on the seed; collect them once.
        let (_, _, diagnostics) = session.compile(sim_config.clone(), trial.seed)?;
        let warnings: Vec<String> = diagnostics.warnings().map(ToString::to_string).collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(trial.threads.unwrap_or(0))
            .build()
            .context("Failed to build trial thread pool")?;

        tracing::info!(
            iterations = trial.iterations,
            threads = pool.current_num_threads(),
            "running trials"
        );
        let started = Instant::now();
        let reports = pool.install(|| {
            (0..trial.iterations)
                .into_par_iter()
                .map(|index| session.run_trial(sim_config.clone(), trial.trial_seed(index)))
                .collect::<Result<Vec<_>>>()
        })?;
        tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "trials finished");

        let summary = RunSummary::new(&reports, trial.duration_secs, trial.seed, warnings);
        match self.format {
            OutputFormat::Summary => summary.print(),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn report(damage: f64, casts: u32) -> TrialReport {
        TrialReport {
            damage,
            casts,
            duration: Duration::from_secs(10),
        }
    }

    #[test]
    fn summary_aggregates_reports() {
        let summary = RunSummary::new(&[report(100.0, 4), report(300.0, 6)], 10.0, 7, Vec::new());
        assert_eq!(summary.iterations, 2);
        assert_eq!(summary.mean_dps, 20.0);
        assert_eq!(summary.min_dps, 10.0);
        assert_eq!(summary.max_dps, 30.0);
        assert_eq!(summary.stddev_dps, 10.0);
        assert_eq!(summary.mean_casts, 5.0);
    }

    #[test]
    fn parallel_runs_are_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        crate::session::fixtures::write(dir.path());
        let session = Session::load(dir.path()).unwrap();
        let config = session.trial.sim_config().unwrap();

        let run = || {
            (0..session.trial.iterations)
                .into_par_iter()
                .map(|i| session.run_trial(config.clone(), session.trial.trial_seed(i)))
                .collect::<Result<Vec<_>>>()
                .unwrap()
        };
        assert_eq!(run(), run());
    }
}
