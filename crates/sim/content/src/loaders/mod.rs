//! Content loaders for reading simulator data from files.

pub mod factory;
pub mod rotation;
pub mod scenario;
pub mod trial;

pub use factory::ContentFactory;
pub use rotation::RotationLoader;
pub use scenario::{RuneBarSpec, ScenarioConfig, ScenarioLoader, SpellSpec, TargetSpec, UnitSpec};
pub use trial::{TrialConfig, TrialConfigLoader};

use std::path::Path;
use std::time::Duration;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Converts a seconds field into a duration.
pub(crate) fn secs(value: f64, field: &str) -> LoadResult<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| anyhow::anyhow!("Invalid duration for {}: {} ({})", field, value, e))
}
