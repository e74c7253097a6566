//! Content factory for loading a simulation run from a data directory.

use std::path::{Path, PathBuf};

use apl::RotationConfig;

use crate::loaders::{
    LoadResult, RotationLoader, ScenarioConfig, ScenarioLoader, TrialConfig, TrialConfigLoader,
};

/// Content factory that loads all run content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml     (optional)
/// ├── scenario.ron
/// └── rotation.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the caster and encounter from `scenario.ron`.
    pub fn load_scenario(&self) -> LoadResult<ScenarioConfig> {
        let path = self.data_dir.join("scenario.ron");
        ScenarioLoader::load(&path)
    }

    /// Load the priority list from `rotation.ron`.
    pub fn load_rotation(&self) -> LoadResult<RotationConfig> {
        let path = self.data_dir.join("rotation.ron");
        RotationLoader::load(&path)
    }

    /// Load trial settings from `config.toml`, falling back to defaults
    /// when the file does not exist.
    pub fn load_trial_config(&self) -> LoadResult<TrialConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(TrialConfig::default());
        }
        TrialConfigLoader::load(&path)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
