//! Minimal combat math.
//!
//! Expected values only depend on unit stats; actual tick outcomes roll crits
//! with the simulation's seeded RNG.

use std::time::Duration;

use rand::Rng;

use crate::config::SimConfig;
use crate::dot::DotSnapshot;
use crate::spell::DotConfig;
use crate::time::{MIN_TIME_GRANULARITY, divide_duration, round_duration};
use crate::unit::UnitStats;

/// Damage after caster and target multipliers, before crits.
pub fn modified_damage(base: f64, caster: &UnitStats, target: &UnitStats) -> f64 {
    base * caster.damage_multiplier * target.damage_taken_multiplier
}

/// Average damage of a hit that crits with `crit_chance`.
pub fn expected_damage(damage: f64, crit_chance: f64) -> f64 {
    damage * (1.0 + crit_chance.clamp(0.0, 1.0) * (SimConfig::CRIT_MULTIPLIER - 1.0))
}

/// Live expected tick damage of `dot` from `caster` on `target`.
pub fn expected_tick_damage(dot: &DotConfig, caster: &UnitStats, target: &UnitStats) -> f64 {
    expected_damage(
        modified_damage(dot.base_tick_damage, caster, target),
        caster.spell_crit_chance,
    )
}

/// Tick period recomputed from the caster's current haste, unrounded.
pub fn calc_tick_period(dot: &DotConfig, caster: &UnitStats) -> Duration {
    if dot.affected_by_haste && caster.haste > 0.0 {
        divide_duration(dot.base_tick_period, caster.haste)
    } else {
        dot.base_tick_period
    }
}

/// Captures the values a dot keeps for the lifetime of one application.
pub fn snapshot_dot(dot: &DotConfig, caster: &UnitStats, target: &UnitStats) -> DotSnapshot {
    DotSnapshot {
        tick_damage: modified_damage(dot.base_tick_damage, caster, target),
        crit_chance: caster.spell_crit_chance,
        tick_period: round_duration(calc_tick_period(dot, caster), MIN_TIME_GRANULARITY),
    }
}

/// Rolls a hit for `damage`, doubling it on a crit.
pub fn roll_damage<R: Rng>(rng: &mut R, damage: f64, crit_chance: f64) -> f64 {
    if rng.r#gen::<f64>() < crit_chance {
        damage * SimConfig::CRIT_MULTIPLIER
    } else {
        damage
    }
}
