//! Scenario loader.
//!
//! A scenario describes who fights whom: one player caster with its spells
//! and optional rune bar, and the encounter target roster.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sim_core::{
    ActionId, DotConfig, RuneCost, RunicPowerBar, SimConfig, Simulation, Spell, UnitId, UnitStats,
};

use crate::loaders::{LoadResult, read_file, secs};

/// Periodic effect of a spell, with times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotSpec {
    pub base_tick_damage: f64,
    pub tick_period_secs: f64,
    pub num_ticks: u32,
    #[serde(default)]
    pub affected_by_haste: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellSpec {
    pub id: ActionId,
    pub label: String,
    #[serde(default)]
    pub cooldown_secs: f64,
    #[serde(default)]
    pub rune_cost: RuneCost,
    #[serde(default)]
    pub direct_damage: f64,
    #[serde(default = "default_true")]
    pub triggers_gcd: bool,
    #[serde(default)]
    pub dot: Option<DotSpec>,
}

fn default_true() -> bool {
    true
}

impl SpellSpec {
    pub fn to_spell(&self) -> LoadResult<Spell> {
        let mut spell = Spell::new(self.id, self.label.clone())
            .with_cooldown(secs(self.cooldown_secs, "cooldown_secs")?)
            .with_rune_cost(self.rune_cost)
            .with_direct_damage(self.direct_damage);
        if !self.triggers_gcd {
            spell = spell.off_gcd();
        }
        if let Some(dot) = &self.dot {
            spell = spell.with_dot(DotConfig {
                base_tick_damage: dot.base_tick_damage,
                base_tick_period: secs(dot.tick_period_secs, "tick_period_secs")?,
                num_ticks: dot.num_ticks,
                affected_by_haste: dot.affected_by_haste,
            });
        }
        Ok(spell)
    }
}

/// Rune bar of the player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuneBarSpec {
    /// Overrides the trial's rune cooldown.
    pub rune_cd_secs: Option<f64>,
    pub regen_multiplier: Option<f64>,
    /// 1-based slots that start as Death runes.
    pub death_slots: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub label: String,
    #[serde(default)]
    pub stats: UnitStats,
    #[serde(default)]
    pub runes: Option<RuneBarSpec>,
    #[serde(default)]
    pub spells: Vec<SpellSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub label: String,
    #[serde(default)]
    pub stats: UnitStats,
}

/// Scenario file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub player: UnitSpec,
    pub targets: Vec<TargetSpec>,
}

impl ScenarioConfig {
    /// Builds a fresh simulation for one trial and returns it with the
    /// player's unit id.
    pub fn build(&self, config: SimConfig, seed: u64) -> LoadResult<(Simulation, UnitId)> {
        let rune_cooldown = config.rune_cooldown;
        let mut sim = Simulation::new(config, seed);

        for target in &self.targets {
            sim.add_target(target.label.clone(), target.stats.clone())
                .map_err(|e| anyhow::anyhow!("Cannot add target {}: {}", target.label, e))?;
        }

        let player = sim.add_player(self.player.label.clone(), self.player.stats.clone());
        let runes = self
            .player
            .runes
            .as_ref()
            .map(|spec| build_rune_bar(spec, rune_cooldown))
            .transpose()?;
        let spells = self
            .player
            .spells
            .iter()
            .map(SpellSpec::to_spell)
            .collect::<LoadResult<Vec<_>>>()?;

        let unit = sim
            .unit_mut(player)
            .ok_or_else(|| anyhow::anyhow!("Player {} was not created", player))?;
        unit.set_runes(runes);
        for spell in spells {
            unit.learn(spell);
        }

        Ok((sim, player))
    }
}

fn build_rune_bar(
    spec: &RuneBarSpec,
    default_cd: std::time::Duration,
) -> LoadResult<RunicPowerBar> {
    let rune_cd = match spec.rune_cd_secs {
        Some(value) => secs(value, "rune_cd_secs")?,
        None => default_cd,
    };
    let mut bar = RunicPowerBar::new(rune_cd);
    if let Some(multiplier) = spec.regen_multiplier {
        bar.set_regen_multiplier(multiplier);
    }
    for &slot in &spec.death_slots {
        let converted = (slot as usize)
            .checked_sub(1)
            .is_some_and(|index| bar.convert_to_death(index));
        if !converted {
            anyhow::bail!(
                "Invalid death rune slot {} (slots are 1-{})",
                slot,
                SimConfig::RUNE_SLOTS
            );
        }
    }
    Ok(bar)
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario from a RON file.
    pub fn load(path: &Path) -> LoadResult<ScenarioConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ScenarioConfig> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::RuneType;

    const SCENARIO: &str = r#"(
        player: (
            label: "Knight",
            stats: (spell_crit_chance: 0.25, haste: 1.2),
            runes: Some((death_slots: [1])),
            spells: [
                (
                    id: 55078,
                    label: "Blood Plague",
                    triggers_gcd: false,
                    dot: Some((
                        base_tick_damage: 40.0,
                        tick_period_secs: 3.0,
                        num_ticks: 5,
                        affected_by_haste: true,
                    )),
                ),
                (
                    id: 49020,
                    label: "Obliterate",
                    rune_cost: (frost: 1, unholy: 1),
                    direct_damage: 900.0,
                ),
            ],
        ),
        targets: [
            (label: "Boss"),
            (label: "Add", stats: (damage_taken_multiplier: 1.1)),
        ],
    )"#;

    #[test]
    fn builds_simulation_from_scenario() {
        let scenario = ScenarioLoader::parse(SCENARIO).unwrap();
        let (sim, player) = scenario.build(SimConfig::default(), 1).unwrap();

        assert_eq!(sim.encounter().len(), 2);
        let unit = sim.unit(player).unwrap();
        assert_eq!(unit.label, "Knight");
        assert_eq!(unit.stats.haste, 1.2);
        assert_eq!(unit.stats.damage_multiplier, 1.0);
        assert_eq!(unit.current_target(), sim.encounter().target(0));

        let plague = unit.spell(ActionId(55078)).unwrap();
        assert!(!plague.triggers_gcd);
        assert_eq!(
            plague.dot.as_ref().unwrap().base_tick_period,
            std::time::Duration::from_secs(3)
        );
        assert_eq!(unit.spell(ActionId(49020)).unwrap().rune_cost.frost, 1);

        let runes = unit.runes().unwrap();
        assert!(runes.is_death(0));
        assert_eq!(runes.current_runes(RuneType::Death, sim.current_time()), 1);
    }

    #[test]
    fn rejects_invalid_death_slot() {
        let mut scenario = ScenarioLoader::parse(SCENARIO).unwrap();
        scenario.player.runes = Some(RuneBarSpec {
            death_slots: vec![0],
            ..RuneBarSpec::default()
        });
        assert!(scenario.build(SimConfig::default(), 1).is_err());
    }

    #[test]
    fn rejects_negative_durations() {
        let mut scenario = ScenarioLoader::parse(SCENARIO).unwrap();
        scenario.player.spells[0].cooldown_secs = -1.0;
        let err = scenario.build(SimConfig::default(), 1).unwrap_err();
        assert!(err.to_string().contains("cooldown_secs"));
    }
}
