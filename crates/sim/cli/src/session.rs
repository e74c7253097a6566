//! Content of one run, loaded once and shared by every trial.

use std::path::Path;

use anyhow::{Context, Result};
use apl::{AplRotation, Diagnostics, RotationConfig, TrialReport, ValueCatalog, run_trial};
use sim_content::{ContentFactory, ScenarioConfig, TrialConfig};
use sim_core::{SimConfig, Simulation};

pub struct Session {
    pub scenario: ScenarioConfig,
    pub rotation: RotationConfig,
    pub trial: TrialConfig,
    catalog: ValueCatalog,
}

impl Session {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let factory = ContentFactory::new(data_dir);
        let scenario = factory
            .load_scenario()
            .with_context(|| format!("loading scenario from {}", data_dir.display()))?;
        let rotation = factory
            .load_rotation()
            .with_context(|| format!("loading rotation from {}", data_dir.display()))?;
        let trial = factory.load_trial_config()?;

        Ok(Self {
            scenario,
            rotation,
            trial,
            catalog: ValueCatalog::standard(),
        })
    }

    /// Builds a fresh simulation and compiles the rotation against it.
    pub fn compile(
        &self,
        config: SimConfig,
        seed: u64,
    ) -> Result<(Simulation, AplRotation, Diagnostics)> {
        let (sim, player) = self.scenario.build(config, seed)?;
        let mut diagnostics = Diagnostics::new();
        let rotation =
            AplRotation::new(&self.rotation, &sim, player, &self.catalog, &mut diagnostics)?;
        Ok((sim, rotation, diagnostics))
    }

    /// Runs one trial with its own simulation, rotation and diagnostics.
    pub fn run_trial(&self, config: SimConfig, seed: u64) -> Result<TrialReport> {
        let (mut sim, mut rotation, _) = self.compile(config, seed)?;
        Ok(run_trial(&mut sim, &mut rotation))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_and_runs_a_trial() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write(dir.path());

        let session = Session::load(dir.path()).unwrap();
        let config = session.trial.sim_config().unwrap();

        let (_, rotation, diagnostics) = session.compile(config.clone(), 0).unwrap();
        assert_eq!(rotation.len(), 3);
        assert_eq!(diagnostics.warnings().count(), 1);

        let report = session.run_trial(config, 0).unwrap();
        assert_eq!(report.duration.as_secs(), 30);
        assert!(report.dps() > 0.0);
    }
}
