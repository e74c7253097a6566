//! Periodic effect ("dot") values.
//!
//! Single-target nodes hold a [`DotReference`] and look the effect
//! instance up on every evaluation. Multi-target nodes hold one reference
//! per roster target, built once from the roster at compile time.
//!
//! # Percent increases
//!
//! The three `*PercentIncrease` nodes compare what a fresh application
//! would snapshot right now against the snapshot of the last application:
//!
//! ```text
//! increase = live / snapshot - 1
//! ```
//!
//! A zero baseline (never applied, or nothing to compare against) reads as
//! `1.0` so that refresh conditions written as `increase > x` fire.

use std::fmt;
use std::time::Duration;

use sim_core::combat;
use sim_core::time::round_duration;
use sim_core::{
    ActionId, Dot, DotConfig, MIN_TIME_GRANULARITY, NEVER_EXPIRES, Simulation, UnitId,
};

use super::{AplValue, ValueNode};
use crate::config::ValueConfig;
use crate::context::CompileContext;
use crate::reference::{DotReference, UnitCell};

// ============================================================================
// Single target
// ============================================================================

pub struct DotIsActive {
    dot: DotReference,
}

impl ValueNode<bool> for DotIsActive {
    fn evaluate(&self, sim: &Simulation) -> bool {
        self.dot.is_active(sim)
    }
}

impl fmt::Display for DotIsActive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dot Is Active({})", self.dot.spell())
    }
}

pub struct DotRemainingTime {
    dot: DotReference,
}

impl ValueNode<Duration> for DotRemainingTime {
    fn evaluate(&self, sim: &Simulation) -> Duration {
        self.dot
            .get(sim)
            .map_or(Duration::ZERO, |d| d.remaining_duration(sim.current_time()))
    }
}

impl fmt::Display for DotRemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dot Remaining Time({})", self.dot.spell())
    }
}

/// Snapshotted tick period of the last application.
pub struct DotTickFrequency {
    dot: DotReference,
}

impl ValueNode<Duration> for DotTickFrequency {
    fn evaluate(&self, sim: &Simulation) -> Duration {
        self.dot.get(sim).map_or(Duration::ZERO, Dot::tick_period)
    }
}

impl fmt::Display for DotTickFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dot Tick Frequency({})", self.dot.spell())
    }
}

pub(crate) fn new_is_active(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::DotIsActive { spell_id, target } = config else {
        return None;
    };
    let dot = ctx.dot_reference(*target, *spell_id)?;
    Some(AplValue::bool(DotIsActive { dot }))
}

pub(crate) fn new_remaining_time(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::DotRemainingTime { spell_id, target } = config else {
        return None;
    };
    let dot = ctx.dot_reference(*target, *spell_id)?;
    Some(AplValue::duration(DotRemainingTime { dot }))
}

pub(crate) fn new_tick_frequency(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::DotTickFrequency { spell_id, target } = config else {
        return None;
    };
    let dot = ctx.dot_reference(*target, *spell_id)?;
    Some(AplValue::duration(DotTickFrequency { dot }))
}

// ============================================================================
// Multi target
// ============================================================================

/// One reference per roster target, fixed at compile time.
struct MultiDot {
    spell: ActionId,
    dots: Vec<DotReference>,
}

impl MultiDot {
    /// Instances on enabled targets; `None` where the effect was never applied.
    fn enabled<'s>(&'s self, sim: &'s Simulation) -> impl Iterator<Item = Option<&'s Dot>> + 's {
        self.dots
            .iter()
            .filter(move |r| r.target_enabled(sim))
            .map(move |r| r.get(sim))
    }
}

pub struct DotIsActiveOnAllTargets {
    dots: MultiDot,
}

impl ValueNode<bool> for DotIsActiveOnAllTargets {
    fn evaluate(&self, sim: &Simulation) -> bool {
        self.dots
            .enabled(sim)
            .all(|dot| dot.is_some_and(Dot::is_active))
    }
}

impl fmt::Display for DotIsActiveOnAllTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dot Is Active On All Targets({})", self.dots.spell)
    }
}

/// Shortest remaining duration across enabled targets.
///
/// Reads zero as soon as one enabled target lacks an active effect, and
/// [`NEVER_EXPIRES`] when no target is enabled.
pub struct DotLowestRemainingTime {
    dots: MultiDot,
}

impl ValueNode<Duration> for DotLowestRemainingTime {
    fn evaluate(&self, sim: &Simulation) -> Duration {
        let now = sim.current_time();
        let mut lowest = NEVER_EXPIRES;
        for dot in self.dots.enabled(sim) {
            match dot.filter(|d| d.is_active()) {
                Some(dot) => lowest = lowest.min(dot.remaining_duration(now)),
                None => return Duration::ZERO,
            }
        }
        lowest
    }
}

impl fmt::Display for DotLowestRemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dot Lowest Remaining Time({})", self.dots.spell)
    }
}

pub(crate) fn new_is_active_on_all_targets(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::DotIsActiveOnAllTargets { spell_id } = config else {
        return None;
    };
    let dots = ctx.multi_dot_references(*spell_id)?;
    Some(AplValue::bool(DotIsActiveOnAllTargets {
        dots: MultiDot {
            spell: *spell_id,
            dots,
        },
    }))
}

pub(crate) fn new_lowest_remaining_time(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::DotLowestRemainingTime { spell_id } = config else {
        return None;
    };
    let dots = ctx.multi_dot_references(*spell_id)?;
    Some(AplValue::duration(DotLowestRemainingTime {
        dots: MultiDot {
            spell: *spell_id,
            dots,
        },
    }))
}

// ============================================================================
// Snapshot comparisons
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Increase {
    Damage,
    Crit,
    TickRate,
}

/// Compares live modifiers against the effect's snapshot.
///
/// The spell's effect parameters are copied at compile time; caster and
/// target are looked up on every evaluation.
pub struct DotIncrease {
    kind: Increase,
    caster: UnitId,
    spell: ActionId,
    config: DotConfig,
    target: UnitCell,
}

impl DotIncrease {
    fn ratio(live: f64, baseline: f64) -> f64 {
        if baseline == 0.0 {
            1.0
        } else {
            live / baseline - 1.0
        }
    }
}

impl ValueNode<f64> for DotIncrease {
    fn evaluate(&self, sim: &Simulation) -> f64 {
        let (Some(caster), Some(target)) = (sim.unit(self.caster), self.target.unit(sim)) else {
            return 0.0;
        };
        let dot = sim.dot(self.caster, self.spell, target.id);

        match self.kind {
            Increase::Damage => {
                let live = combat::expected_tick_damage(&self.config, &caster.stats, &target.stats);
                let baseline = dot.map_or(0.0, Dot::expected_tick_damage_from_snapshot);
                Self::ratio(live, baseline)
            }
            Increase::Crit => {
                let baseline = dot.map_or(0.0, |d| d.snapshot().crit_chance);
                Self::ratio(caster.stats.spell_crit_chance, baseline)
            }
            Increase::TickRate => {
                let snapshot = dot.map_or(0.0, |d| d.tick_period().as_secs_f64());
                let live = round_duration(
                    combat::calc_tick_period(&self.config, &caster.stats),
                    MIN_TIME_GRANULARITY,
                )
                .as_secs_f64();
                if snapshot == 0.0 || live == 0.0 {
                    return 1.0;
                }
                // Shorter live period is an increase.
                snapshot / live - 1.0
            }
        }
    }
}

impl fmt::Display for DotIncrease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            Increase::Damage => "Dot Percent Increase",
            Increase::Crit => "Dot Crit Percent Increase",
            Increase::TickRate => "Dot Tick Rate Percent Increase",
        };
        write!(f, "{name}({})", self.spell)
    }
}

fn new_increase(
    ctx: &mut CompileContext<'_>,
    kind: Increase,
    spell_id: ActionId,
    target: crate::config::UnitReference,
) -> Option<AplValue> {
    let (_, config) = ctx.dot_spell(spell_id)?;
    let target = ctx.unit_cell(target)?;
    Some(AplValue::float(DotIncrease {
        kind,
        caster: ctx.caster(),
        spell: spell_id,
        config: config.clone(),
        target,
    }))
}

pub(crate) fn new_percent_increase(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::DotPercentIncrease { spell_id, target } = config else {
        return None;
    };
    new_increase(ctx, Increase::Damage, *spell_id, *target)
}

pub(crate) fn new_crit_percent_increase(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::DotCritPercentIncrease { spell_id, target } = config else {
        return None;
    };
    new_increase(ctx, Increase::Crit, *spell_id, *target)
}

pub(crate) fn new_tick_rate_percent_increase(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::DotTickRatePercentIncrease { spell_id, target } = config else {
        return None;
    };
    new_increase(ctx, Increase::TickRate, *spell_id, *target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ValueCatalog;
    use crate::config::UnitReference;
    use crate::diagnostics::Diagnostics;
    use crate::value::Evaluated;
    use sim_core::{SimConfig, Spell, UnitStats};

    const PLAGUE: ActionId = ActionId(55078);
    const STRIKE: ActionId = ActionId(49020);

    fn plague() -> Spell {
        Spell::new(PLAGUE, "Blood Plague").with_dot(DotConfig {
            base_tick_damage: 100.0,
            base_tick_period: Duration::from_secs(3),
            num_ticks: 5,
            affected_by_haste: true,
        })
    }

    fn setup() -> (Simulation, UnitId, UnitId) {
        let mut sim = Simulation::new(SimConfig::default(), 1);
        let target = sim.add_target("Dummy", UnitStats::default()).unwrap();
        let player = sim.add_player("Knight", UnitStats::default());
        let unit = sim.unit_mut(player).unwrap();
        unit.learn(plague());
        unit.learn(Spell::new(STRIKE, "Strike").with_direct_damage(10.0));
        (sim, player, target)
    }

    fn build(
        sim: &Simulation,
        caster: UnitId,
        config: ValueConfig,
    ) -> (Option<AplValue>, Diagnostics) {
        let catalog = ValueCatalog::standard();
        let mut diagnostics = Diagnostics::new();
        let value = {
            let mut ctx = CompileContext::new(sim, caster, &catalog, &mut diagnostics);
            ctx.value(&config)
        };
        (value, diagnostics)
    }

    fn float(value: Evaluated) -> f64 {
        match value {
            Evaluated::Float(v) => v,
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[test]
    fn unknown_spell_warns_once() {
        let (sim, player, _) = setup();
        let (value, diagnostics) = build(
            &sim,
            player,
            ValueConfig::DotIsActive {
                spell_id: ActionId(1),
                target: UnitReference::CurrentTarget,
            },
        );
        assert!(value.is_none());
        let warnings: Vec<_> = diagnostics.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "Knight does not know spell {SpellID: 1}");
    }

    #[test]
    fn spell_without_dot_is_rejected() {
        let (sim, player, _) = setup();
        let (value, diagnostics) = build(
            &sim,
            player,
            ValueConfig::DotRemainingTime {
                spell_id: STRIKE,
                target: UnitReference::CurrentTarget,
            },
        );
        assert!(value.is_none());
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn remaining_time_and_tick_frequency_track_the_instance() {
        let (mut sim, player, target) = setup();
        let (remaining, _) = build(
            &sim,
            player,
            ValueConfig::DotRemainingTime {
                spell_id: PLAGUE,
                target: UnitReference::CurrentTarget,
            },
        );
        let (frequency, _) = build(
            &sim,
            player,
            ValueConfig::DotTickFrequency {
                spell_id: PLAGUE,
                target: UnitReference::Target(0),
            },
        );
        let (remaining, frequency) = (remaining.unwrap(), frequency.unwrap());

        assert_eq!(remaining.evaluate(&sim), Evaluated::Duration(Duration::ZERO));
        assert_eq!(frequency.evaluate(&sim), Evaluated::Duration(Duration::ZERO));

        sim.cast(player, PLAGUE, target).unwrap();
        sim.advance_by(Duration::from_secs(4));
        assert_eq!(
            remaining.evaluate(&sim),
            Evaluated::Duration(Duration::from_secs(11))
        );
        assert_eq!(
            frequency.evaluate(&sim),
            Evaluated::Duration(Duration::from_secs(3))
        );
    }

    #[test]
    fn current_target_may_be_missing_at_build_time() {
        let (mut sim, player, target) = setup();
        sim.set_current_target(player, None);
        let (active, diagnostics) = build(
            &sim,
            player,
            ValueConfig::DotIsActive {
                spell_id: PLAGUE,
                target: UnitReference::CurrentTarget,
            },
        );
        assert!(diagnostics.is_empty());
        let active = active.unwrap();
        assert_eq!(active.evaluate(&sim), Evaluated::Bool(false));

        sim.set_current_target(player, Some(target));
        sim.cast(player, PLAGUE, target).unwrap();
        assert_eq!(active.evaluate(&sim), Evaluated::Bool(true));
    }

    #[test]
    fn unresolved_current_target_reads_neutral() {
        let (mut sim, player, target) = setup();
        let (active, _) = build(
            &sim,
            player,
            ValueConfig::DotIsActive {
                spell_id: PLAGUE,
                target: UnitReference::CurrentTarget,
            },
        );
        let active = active.unwrap();
        sim.cast(player, PLAGUE, target).unwrap();
        assert_eq!(active.evaluate(&sim), Evaluated::Bool(true));

        sim.set_current_target(player, None);
        assert_eq!(active.evaluate(&sim), Evaluated::Bool(false));
    }

    #[test]
    fn percent_increase_compares_live_against_snapshot() {
        let (mut sim, player, target) = setup();
        let (increase, _) = build(
            &sim,
            player,
            ValueConfig::DotPercentIncrease {
                spell_id: PLAGUE,
                target: UnitReference::CurrentTarget,
            },
        );
        let increase = increase.unwrap();

        // Never applied: zero baseline.
        assert_eq!(float(increase.evaluate(&sim)), 1.0);

        sim.cast(player, PLAGUE, target).unwrap();
        assert!(float(increase.evaluate(&sim)).abs() < 1e-9);

        sim.unit_mut(player).unwrap().stats.damage_multiplier = 1.2;
        assert!((float(increase.evaluate(&sim)) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn crit_increase_uses_one_on_zero_snapshot() {
        let (mut sim, player, target) = setup();
        let (increase, _) = build(
            &sim,
            player,
            ValueConfig::DotCritPercentIncrease {
                spell_id: PLAGUE,
                target: UnitReference::CurrentTarget,
            },
        );
        let increase = increase.unwrap();
        sim.cast(player, PLAGUE, target).unwrap();
        assert_eq!(float(increase.evaluate(&sim)), 1.0);
    }

    #[test]
    fn tick_rate_increase_follows_haste() {
        let (mut sim, player, target) = setup();
        let (increase, _) = build(
            &sim,
            player,
            ValueConfig::DotTickRatePercentIncrease {
                spell_id: PLAGUE,
                target: UnitReference::CurrentTarget,
            },
        );
        let increase = increase.unwrap();
        sim.cast(player, PLAGUE, target).unwrap();
        assert!(float(increase.evaluate(&sim)).abs() < 1e-9);

        sim.unit_mut(player).unwrap().stats.haste = 1.5;
        assert!((float(increase.evaluate(&sim)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_target_index_warns() {
        let (sim, player, _) = setup();
        let (value, diagnostics) = build(
            &sim,
            player,
            ValueConfig::DotIsActive {
                spell_id: PLAGUE,
                target: UnitReference::Target(4),
            },
        );
        assert!(value.is_none());
        assert_eq!(diagnostics.warnings().count(), 1);
    }
}
