//! Simulation state consumed by the APL evaluation engine.
//!
//! `sim-core` models the parts of a combat simulation that rotation
//! conditions read: units and their stats, the encounter target roster,
//! spells, periodic effects with their snapshots, rune bars, and the clock.
//! All mutation flows through [`Simulation`]; the evaluation engine only
//! ever holds shared references to it while evaluating conditions.
pub mod combat;
pub mod config;
pub mod dot;
pub mod encounter;
pub mod error;
pub mod runes;
pub mod sim;
pub mod spell;
pub mod time;
pub mod unit;

pub use config::SimConfig;
pub use dot::{Dot, DotSnapshot};
pub use encounter::Encounter;
pub use error::{CastError, ErrorSeverity, RuneError, SimError};
pub use runes::{RuneCost, RuneSlot, RuneType, RunicPowerBar};
pub use sim::{RosterFull, Simulation};
pub use spell::{ActionId, DotConfig, Spell};
pub use time::{MIN_TIME_GRANULARITY, NEVER_EXPIRES, SimTime};
pub use unit::{Unit, UnitId, UnitKind, UnitStats};
