//! Simulation state for one trial.
//!
//! [`Simulation`] owns every unit, the encounter roster, the clock and the
//! seeded RNG of a single trial. It is never shared between trials: each
//! trial builds its own instance.
//!
//! The clock only moves through [`Simulation::advance_to`], which fires every
//! periodic tick due in between in chronological order.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::combat;
use crate::config::SimConfig;
use crate::dot::Dot;
use crate::encounter::Encounter;
use crate::error::CastError;
use crate::spell::ActionId;
use crate::time::SimTime;
use crate::unit::{Unit, UnitId, UnitKind, UnitStats};

/// Error returned when the encounter roster cannot take another target.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("encounter roster is full ({max} targets)")]
pub struct RosterFull {
    pub max: usize,
}

/// Mutable state of one simulation trial.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    current_time: SimTime,
    units: Vec<Unit>,
    encounter: Encounter,
    damage_done: f64,
    casts: u32,
    rng: ChaCha8Rng,
}

impl Simulation {
    pub fn new(config: SimConfig, seed: u64) -> Self {
        Self {
            config,
            current_time: SimTime::ZERO,
            units: Vec::new(),
            encounter: Encounter::new(),
            damage_done: 0.0,
            casts: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Adds a player unit and returns its id.
    ///
    /// The player's current target defaults to the first encounter target.
    pub fn add_player(&mut self, label: impl Into<String>, stats: UnitStats) -> UnitId {
        let id = self.next_id();
        let mut unit = Unit::new(id, label, UnitKind::Player).with_stats(stats);
        unit.set_current_target(self.encounter.target(0));
        self.units.push(unit);
        id
    }

    /// Adds an encounter target and returns its id.
    pub fn add_target(
        &mut self,
        label: impl Into<String>,
        stats: UnitStats,
    ) -> Result<UnitId, RosterFull> {
        let id = self.next_id();
        let index = self.encounter.push(id).ok_or(RosterFull {
            max: SimConfig::MAX_TARGETS,
        })?;
        self.units
            .push(Unit::new(id, label, UnitKind::Target { index }).with_stats(stats));

        for unit in self.units.iter_mut() {
            if unit.kind == UnitKind::Player && unit.current_target().is_none() {
                unit.set_current_target(Some(id));
            }
        }
        Ok(id)
    }

    fn next_id(&self) -> UnitId {
        UnitId(self.units.len() as u32)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    pub fn end_time(&self) -> SimTime {
        SimTime::ZERO + self.config.duration
    }

    /// Time left in the encounter, zero once it has ended.
    pub fn remaining_time(&self) -> Duration {
        self.current_time.until(self.end_time())
    }

    pub fn is_finished(&self) -> bool {
        self.current_time >= self.end_time()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0 as usize)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.0 as usize)
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    /// Every target in the roster, enabled or not.
    pub fn targets(&self) -> impl Iterator<Item = &Unit> {
        self.encounter
            .targets()
            .iter()
            .filter_map(|&id| self.unit(id))
    }

    pub fn enabled_target_count(&self) -> usize {
        self.targets().filter(|u| u.is_enabled()).count()
    }

    /// Periodic effect instance of `spell` cast by `caster` on `target`.
    pub fn dot(&self, caster: UnitId, spell: ActionId, target: UnitId) -> Option<&Dot> {
        self.unit(caster)?.dot(spell, target)
    }

    pub fn damage_done(&self) -> f64 {
        self.damage_done
    }

    pub fn casts(&self) -> u32 {
        self.casts
    }

    // ========================================================================
    // Encounter control
    // ========================================================================

    /// Enables or disables a target. Disabling ends every effect on it.
    pub fn set_target_enabled(&mut self, target: UnitId, enabled: bool) -> bool {
        let Some(unit) = self.unit_mut(target) else {
            return false;
        };
        if unit.target_index().is_none() {
            return false;
        }
        unit.set_enabled(enabled);

        if !enabled {
            for caster in self.units.iter_mut() {
                for dot in caster.dots_mut().filter(|d| d.target() == target) {
                    dot.deactivate();
                }
            }
            debug!(target = %target, time = %self.current_time, "target disabled");
        }
        true
    }

    pub fn set_current_target(&mut self, caster: UnitId, target: Option<UnitId>) -> bool {
        match self.unit_mut(caster) {
            Some(unit) => {
                unit.set_current_target(target);
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Casting
    // ========================================================================

    /// Checks whether `caster` could cast `spell` on `target` right now.
    pub fn check_cast(
        &self,
        caster: UnitId,
        spell: ActionId,
        target: UnitId,
    ) -> Result<(), CastError> {
        let now = self.current_time;
        let unit = self.unit(caster).ok_or(CastError::UnknownUnit(caster))?;
        let definition = unit
            .spell(spell)
            .ok_or(CastError::UnknownSpell { caster, spell })?;

        let target_unit = self.unit(target).ok_or(CastError::UnknownUnit(target))?;
        if target_unit.target_index().is_none() || !target_unit.is_enabled() {
            return Err(CastError::InvalidTarget(target));
        }

        let cooldown_ready = unit.cooldown_ready_at(spell);
        if cooldown_ready > now {
            return Err(CastError::OnCooldown {
                spell,
                remaining: now.until(cooldown_ready),
            });
        }
        if definition.triggers_gcd && unit.gcd_ready_at() > now {
            return Err(CastError::GlobalCooldown(now.until(unit.gcd_ready_at())));
        }

        if !definition.rune_cost.is_free() {
            let runes = unit
                .runes()
                .ok_or(CastError::NoRuneBar { caster, spell })?;
            runes.can_spend(&definition.rune_cost, now)?;
        }
        Ok(())
    }

    /// Casts `spell` from `caster` on `target`.
    ///
    /// Pays the rune cost, starts cooldowns, deals direct damage and
    /// (re)applies the spell's periodic effect with a fresh snapshot. On
    /// error nothing is changed.
    pub fn cast(
        &mut self,
        caster: UnitId,
        spell: ActionId,
        target: UnitId,
    ) -> Result<(), CastError> {
        self.check_cast(caster, spell, target)?;

        let now = self.current_time;
        let gcd = self.config.global_cooldown;
        let target_stats = self
            .unit(target)
            .map(|u| u.stats.clone())
            .ok_or(CastError::UnknownUnit(target))?;
        let unit = self
            .units
            .get_mut(caster.0 as usize)
            .ok_or(CastError::UnknownUnit(caster))?;
        let definition = unit
            .spell(spell)
            .cloned()
            .ok_or(CastError::UnknownSpell { caster, spell })?;

        if let Some(runes) = unit.runes_mut() {
            runes.spend(&definition.rune_cost, now)?;
        }
        if !definition.cooldown.is_zero() {
            unit.start_cooldown(spell, now + definition.cooldown);
        }
        if definition.triggers_gcd {
            unit.start_gcd(now + gcd);
        }

        if let Some(dot_config) = &definition.dot {
            let snapshot = combat::snapshot_dot(dot_config, &unit.stats, &target_stats);
            unit.dot_entry(spell, target)
                .apply(now, dot_config.num_ticks, snapshot);
        }

        let direct = combat::modified_damage(definition.direct_damage, &unit.stats, &target_stats);
        let crit_chance = unit.stats.spell_crit_chance;
        if direct > 0.0 {
            self.damage_done += combat::roll_damage(&mut self.rng, direct, crit_chance);
        }
        self.casts += 1;

        debug!(
            caster = %caster,
            target = %target,
            spell = %spell,
            time = %now,
            "cast {}",
            definition.label
        );
        Ok(())
    }

    // ========================================================================
    // Clock
    // ========================================================================

    /// Earliest future moment at which the state changes on its own.
    ///
    /// Considers periodic ticks, global and spell cooldowns, rune
    /// regeneration, and the end of the encounter.
    pub fn next_event_time(&self) -> SimTime {
        let now = self.current_time;
        let end = self.end_time();

        let mut next = end;
        let mut consider = |t: SimTime| {
            if t > now && t < next {
                next = t;
            }
        };

        for unit in &self.units {
            consider(unit.gcd_ready_at());
            for spell in unit.spells() {
                consider(unit.cooldown_ready_at(spell.id));
            }
            if let Some(runes) = unit.runes() {
                for slot in runes.slots() {
                    consider(slot.ready_at());
                }
            }
            for tick in unit.dots().filter_map(Dot::next_tick_at) {
                consider(tick);
            }
        }
        next
    }

    /// Moves the clock to `time` (bounded by the end of the encounter),
    /// firing every periodic tick due on the way.
    pub fn advance_to(&mut self, time: SimTime) {
        let time = time.min(self.end_time());

        while let Some((caster, spell, target, at)) = self.next_due_tick(time) {
            if at > self.current_time {
                self.current_time = at;
            }
            let Some(dot) = self.units[caster].dot_mut(spell, target) else {
                break;
            };
            if !dot.tick(at) {
                break;
            }
            let snapshot = *dot.snapshot();
            let damage =
                combat::roll_damage(&mut self.rng, snapshot.tick_damage, snapshot.crit_chance);
            self.damage_done += damage;
            trace!(spell = %spell, target = %target, time = %at, damage, "dot tick");
        }

        if time > self.current_time {
            self.current_time = time;
        }
    }

    pub fn advance_by(&mut self, duration: Duration) {
        self.advance_to(self.current_time + duration);
    }

    fn next_due_tick(&self, limit: SimTime) -> Option<(usize, ActionId, UnitId, SimTime)> {
        self.units
            .iter()
            .enumerate()
            .flat_map(|(index, unit)| {
                unit.dots().filter_map(move |dot| {
                    dot.next_tick_at()
                        .filter(|&at| at <= limit)
                        .map(|at| (index, dot.spell(), dot.target(), at))
                })
            })
            .min_by_key(|&(_, _, _, at)| at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runes::{RuneCost, RunicPowerBar};
    use crate::spell::{DotConfig, Spell};

    const PLAGUE: ActionId = ActionId(55078);

    fn plague() -> Spell {
        Spell::new(PLAGUE, "Plague").with_dot(DotConfig {
            base_tick_damage: 100.0,
            base_tick_period: Duration::from_secs(2),
            num_ticks: 3,
            affected_by_haste: false,
        })
    }

    fn setup() -> (Simulation, UnitId, UnitId) {
        let mut sim = Simulation::new(SimConfig::default(), 7);
        let target = sim.add_target("Dummy", UnitStats::default()).unwrap();
        let player = sim.add_player("Knight", UnitStats::default());
        sim.unit_mut(player).unwrap().learn(plague());
        (sim, player, target)
    }

    #[test]
    fn player_defaults_to_first_target() {
        let (sim, player, target) = setup();
        assert_eq!(sim.unit(player).unwrap().current_target(), Some(target));
    }

    #[test]
    fn dot_ticks_deal_snapshot_damage_and_expire() {
        let (mut sim, player, target) = setup();
        sim.cast(player, PLAGUE, target).unwrap();

        let dot = sim.dot(player, PLAGUE, target).unwrap();
        assert_eq!(dot.remaining_duration(sim.current_time()), Duration::from_secs(6));

        sim.advance_by(Duration::from_secs(2));
        assert_eq!(sim.damage_done(), 100.0);
        let dot = sim.dot(player, PLAGUE, target).unwrap();
        assert_eq!(dot.remaining_duration(sim.current_time()), Duration::from_secs(4));

        sim.advance_by(Duration::from_secs(10));
        assert_eq!(sim.damage_done(), 300.0);
        assert!(!sim.dot(player, PLAGUE, target).unwrap().is_active());
    }

    #[test]
    fn global_cooldown_blocks_second_cast() {
        let (mut sim, player, target) = setup();
        sim.cast(player, PLAGUE, target).unwrap();
        let err = sim.cast(player, PLAGUE, target).unwrap_err();
        assert!(matches!(err, CastError::GlobalCooldown(_)));
        assert_eq!(sim.next_event_time(), SimTime::from_secs_f64(1.5));
    }

    #[test]
    fn rune_cost_requires_rune_bar() {
        let (mut sim, player, target) = setup();
        let strike = Spell::new(ActionId(1), "Strike").with_rune_cost(RuneCost {
            frost: 1,
            ..RuneCost::default()
        });
        sim.unit_mut(player).unwrap().learn(strike);
        assert!(matches!(
            sim.check_cast(player, ActionId(1), target),
            Err(CastError::NoRuneBar { .. })
        ));

        sim.unit_mut(player)
            .unwrap()
            .set_runes(Some(RunicPowerBar::default()));
        assert!(sim.cast(player, ActionId(1), target).is_ok());
        let runes = sim.unit(player).unwrap().runes().unwrap();
        assert_eq!(runes.current_non_death_runes(crate::RuneType::Frost, SimTime::ZERO), 1);
    }

    #[test]
    fn disabling_a_target_ends_its_effects() {
        let (mut sim, player, target) = setup();
        sim.cast(player, PLAGUE, target).unwrap();
        assert!(sim.set_target_enabled(target, false));

        assert!(!sim.dot(player, PLAGUE, target).unwrap().is_active());
        assert_eq!(sim.enabled_target_count(), 0);
        assert!(matches!(
            sim.check_cast(player, PLAGUE, target),
            Err(CastError::InvalidTarget(_))
        ));
    }
}
