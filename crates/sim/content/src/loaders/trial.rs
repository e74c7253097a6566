//! Trial settings loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sim_core::SimConfig;

use crate::loaders::{LoadResult, read_file, secs};

/// How many trials to run and how long each encounter lasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    pub iterations: u32,
    pub duration_secs: f64,
    pub global_cooldown_secs: f64,
    pub rune_cooldown_secs: f64,
    /// Base seed; trial `i` uses `seed + i`.
    pub seed: u64,
    /// Worker threads; `None` uses the rayon default.
    pub threads: Option<usize>,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            duration_secs: SimConfig::DEFAULT_DURATION.as_secs_f64(),
            global_cooldown_secs: SimConfig::DEFAULT_GLOBAL_COOLDOWN.as_secs_f64(),
            rune_cooldown_secs: SimConfig::DEFAULT_RUNE_COOLDOWN.as_secs_f64(),
            seed: 0,
            threads: None,
        }
    }
}

impl TrialConfig {
    pub fn sim_config(&self) -> LoadResult<SimConfig> {
        Ok(SimConfig {
            duration: secs(self.duration_secs, "duration_secs")?,
            global_cooldown: secs(self.global_cooldown_secs, "global_cooldown_secs")?,
            rune_cooldown: secs(self.rune_cooldown_secs, "rune_cooldown_secs")?,
        })
    }

    /// Seed of the trial with the given index.
    pub fn trial_seed(&self, index: u32) -> u64 {
        self.seed.wrapping_add(u64::from(index))
    }
}

/// Loader for trial settings from TOML files.
pub struct TrialConfigLoader;

impl TrialConfigLoader {
    /// Load trial settings from a TOML file.
    pub fn load(path: &Path) -> LoadResult<TrialConfig> {
        let content = read_file(path)?;
        let config: TrialConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}
