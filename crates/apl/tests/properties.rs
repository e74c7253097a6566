mod common;

use std::time::Duration;

use apl::{Evaluated, UnitReference, ValueConfig};
use common::{PLAGUE, build, encounter, plague};
use proptest::prelude::*;
use sim_core::{
    ActionId, DotConfig, NEVER_EXPIRES, RuneCost, RuneType, RunicPowerBar, Simulation, Spell,
    UnitId,
};

/// Per-target setup: (effect applied, target enabled).
fn roster() -> impl Strategy<Value = Vec<(bool, bool)>> {
    prop::collection::vec((any::<bool>(), any::<bool>()), 1..6)
}

fn aggregates(sim: &Simulation, player: UnitId) -> (Evaluated, Evaluated) {
    let (all, _) = build(sim, player, &ValueConfig::DotIsActiveOnAllTargets { spell_id: PLAGUE });
    let (lowest, _) = build(sim, player, &ValueConfig::DotLowestRemainingTime { spell_id: PLAGUE });
    (
        all.map(|v| v.evaluate(sim)).unwrap_or(Evaluated::Bool(false)),
        lowest
            .map(|v| v.evaluate(sim))
            .unwrap_or(Evaluated::Duration(Duration::ZERO)),
    )
}

/// Applies the effect where requested, lets `elapsed_ms` pass, then
/// disables targets. Targets with `dot_disabled` set also get the effect
/// if they end up disabled.
fn scenario(setup: &[(bool, bool)], elapsed_ms: u64, dot_disabled: bool) -> (Simulation, UnitId) {
    let (mut sim, player, targets) = encounter(setup.len(), vec![plague(2, 5)]);
    for (&(applied, enabled), &target) in setup.iter().zip(&targets) {
        if applied || (dot_disabled && !enabled) {
            sim.cast(player, PLAGUE, target).unwrap();
        }
    }
    sim.advance_by(Duration::from_millis(elapsed_ms));
    for (&(_, enabled), &target) in setup.iter().zip(&targets) {
        if !enabled {
            sim.set_target_enabled(target, false);
        }
    }
    (sim, player)
}

proptest! {
    #[test]
    fn any_inactive_enabled_target_zeroes_aggregates(setup in roster(), elapsed_ms in 0u64..9_000) {
        let (sim, player) = scenario(&setup, elapsed_ms, false);
        let (all, lowest) = aggregates(&sim, player);

        let missing = setup.iter().any(|&(applied, enabled)| enabled && !applied);
        let any_enabled = setup.iter().any(|&(_, enabled)| enabled);

        if missing {
            prop_assert_eq!(all, Evaluated::Bool(false));
            prop_assert_eq!(lowest, Evaluated::Duration(Duration::ZERO));
        } else if any_enabled {
            prop_assert_eq!(all, Evaluated::Bool(true));
            let expected = Duration::from_secs(10) - Duration::from_millis(elapsed_ms);
            prop_assert_eq!(lowest, Evaluated::Duration(expected));
        } else {
            prop_assert_eq!(lowest, Evaluated::Duration(NEVER_EXPIRES));
        }
    }

    #[test]
    fn disabled_targets_never_change_aggregates(setup in roster(), elapsed_ms in 0u64..9_000) {
        let (with, player) = scenario(&setup, elapsed_ms, true);
        let (without, _) = scenario(&setup, elapsed_ms, false);
        prop_assert_eq!(aggregates(&with, player), aggregates(&without, player));
    }

    #[test]
    fn zero_baseline_reads_one(
        damage in 0.0f64..5.0,
        crit in 0.0f64..1.0,
        haste in 1.0f64..2.0,
        applied in any::<bool>(),
    ) {
        // A spell whose snapshot carries no damage and no crit.
        let weak = Spell::new(ActionId(9), "Weak").with_dot(DotConfig {
            base_tick_damage: 0.0,
            base_tick_period: Duration::from_secs(2),
            num_ticks: 3,
            affected_by_haste: true,
        });
        let (mut sim, player, targets) = encounter(1, vec![weak]);
        if applied {
            sim.cast(player, ActionId(9), targets[0]).unwrap();
        }

        let stats = &mut sim.unit_mut(player).unwrap().stats;
        stats.damage_multiplier = damage;
        stats.spell_crit_chance = crit;
        stats.haste = haste;

        let (spell_id, target) = (ActionId(9), UnitReference::CurrentTarget);
        for config in [
            ValueConfig::DotPercentIncrease { spell_id, target },
            ValueConfig::DotCritPercentIncrease { spell_id, target },
        ] {
            let (value, _) = build(&sim, player, &config);
            prop_assert_eq!(value.unwrap().evaluate(&sim), Evaluated::Float(1.0));
        }

        if !applied {
            let (value, _) = build(
                &sim,
                player,
                &ValueConfig::DotTickRatePercentIncrease {
                    spell_id: ActionId(9),
                    target: UnitReference::CurrentTarget,
                },
            );
            prop_assert_eq!(value.unwrap().evaluate(&sim), Evaluated::Float(1.0));
        }
    }

    #[test]
    fn remaining_time_is_zero_once_inactive(extra_ms in 0u64..60_000) {
        let (mut sim, player, targets) = encounter(1, vec![plague(2, 3)]);
        let (remaining, _) = build(
            &sim,
            player,
            &ValueConfig::DotRemainingTime {
                spell_id: PLAGUE,
                target: UnitReference::CurrentTarget,
            },
        );
        let remaining = remaining.unwrap();

        sim.cast(player, PLAGUE, targets[0]).unwrap();
        sim.advance_by(Duration::from_secs(6) + Duration::from_millis(extra_ms));
        prop_assert!(!sim.dot(player, PLAGUE, targets[0]).unwrap().is_active());
        prop_assert_eq!(remaining.evaluate(&sim), Evaluated::Duration(Duration::ZERO));
    }

    #[test]
    fn rune_cooldowns_clamp_to_zero(elapsed_ms in 0u64..40_000) {
        let costly = Spell::new(ActionId(5), "Costly").with_rune_cost(RuneCost {
            blood: 2,
            ..RuneCost::default()
        });
        let (mut sim, player, targets) = encounter(1, vec![costly]);
        sim.unit_mut(player)
            .unwrap()
            .set_runes(Some(RunicPowerBar::new(Duration::from_secs(10))));
        sim.cast(player, ActionId(5), targets[0]).unwrap();
        sim.advance_by(Duration::from_millis(elapsed_ms));

        let now = sim.current_time();
        let runes = sim.unit(player).unwrap().runes().unwrap().clone();
        let blood = ValueConfig::RuneCooldown { rune_type: RuneType::Blood };
        let (cooldown, _) = build(&sim, player, &blood);
        let (slot, _) = build(&sim, player, &ValueConfig::RuneSlotCooldown { rune_slot: 2 });

        let expected = now.until(runes.ready_at(RuneType::Blood).unwrap());
        prop_assert_eq!(cooldown.unwrap().evaluate(&sim), Evaluated::Duration(expected));

        let slot = slot.unwrap().evaluate(&sim);
        if runes.slot_ready_at(1).unwrap() <= now {
            prop_assert_eq!(slot, Evaluated::Duration(Duration::ZERO));
        }
    }
}
