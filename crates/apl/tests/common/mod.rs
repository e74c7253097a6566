#![allow(dead_code)]

use std::time::Duration;

use apl::{AplValue, CompileContext, Diagnostics, Evaluated, ValueCatalog, ValueConfig};
use sim_core::{ActionId, DotConfig, SimConfig, Simulation, Spell, UnitId, UnitStats};

pub const PLAGUE: ActionId = ActionId(55078);
pub const STRIKE: ActionId = ActionId(49020);

/// Off-GCD periodic effect so several targets can be dotted at one instant.
pub fn plague(period_secs: u64, ticks: u32) -> Spell {
    Spell::new(PLAGUE, "Blood Plague")
        .with_dot(DotConfig {
            base_tick_damage: 50.0,
            base_tick_period: Duration::from_secs(period_secs),
            num_ticks: ticks,
            affected_by_haste: true,
        })
        .off_gcd()
}

pub fn strike() -> Spell {
    Spell::new(STRIKE, "Strike").with_direct_damage(200.0)
}

/// Simulation with `targets` targets and a player knowing `spells`.
pub fn encounter(targets: usize, spells: Vec<Spell>) -> (Simulation, UnitId, Vec<UnitId>) {
    let mut sim = Simulation::new(SimConfig::default(), 42);
    let targets = (0..targets)
        .map(|i| sim.add_target(format!("Target {i}"), UnitStats::default()).unwrap())
        .collect();
    let player = sim.add_player("Knight", UnitStats::default());
    let unit = sim.unit_mut(player).unwrap();
    for spell in spells {
        unit.learn(spell);
    }
    (sim, player, targets)
}

pub fn build(
    sim: &Simulation,
    caster: UnitId,
    config: &ValueConfig,
) -> (Option<AplValue>, Diagnostics) {
    let catalog = ValueCatalog::standard();
    let mut diagnostics = Diagnostics::new();
    let value = {
        let mut ctx = CompileContext::new(sim, caster, &catalog, &mut diagnostics);
        ctx.value(config)
    };
    (value, diagnostics)
}

pub fn secs(value: f64) -> Evaluated {
    Evaluated::Duration(Duration::from_secs_f64(value))
}
