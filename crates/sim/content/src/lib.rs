//! Data-driven simulator content.
//!
//! Loaders for the files that describe one simulation run:
//! - Scenario: caster, spells, rune bar and encounter targets (RON)
//! - Rotation: the caster's priority list (RON)
//! - Trial settings: iteration count, encounter length, seed (TOML)
//!
//! Scenarios are turned into ready-to-run [`sim_core::Simulation`] instances
//! by [`ScenarioConfig::build`].

pub mod loaders;

pub use loaders::{
    ContentFactory, LoadResult, RotationLoader, RuneBarSpec, ScenarioConfig, ScenarioLoader,
    SpellSpec, TargetSpec, TrialConfig, TrialConfigLoader, UnitSpec,
};
