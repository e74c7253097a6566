//! Handles to units and periodic effects that outlive a single evaluation.
//!
//! # Binding
//!
//! A reference is validated when its node is built, but the entity it
//! names is looked up again on every evaluation:
//!
//! - [`UnitCell::Fixed`] names one unit by id. The unit must exist when
//!   the cell is built.
//! - [`UnitCell::CurrentTargetOf`] names "whoever the caster is targeting
//!   right now" and may resolve to a different unit, or to nothing, at
//!   each evaluation.
//!
//! [`DotReference`] pairs a caster, a spell and a target cell. The spell
//! must be known by the caster and carry a periodic effect; the effect
//! instance itself only exists once it has been applied, so a reference
//! that finds no instance reads as an inactive effect.

use std::fmt;

use sim_core::{ActionId, Dot, Simulation, Unit, UnitId};

/// Deferred handle to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitCell {
    Fixed(UnitId),
    CurrentTargetOf(UnitId),
}

impl UnitCell {
    /// Resolves the cell against the current state.
    pub fn get(&self, sim: &Simulation) -> Option<UnitId> {
        match *self {
            Self::Fixed(id) => sim.unit(id).map(|u| u.id),
            Self::CurrentTargetOf(caster) => sim.unit(caster)?.current_target(),
        }
    }

    pub fn unit<'s>(&self, sim: &'s Simulation) -> Option<&'s Unit> {
        self.get(sim).and_then(|id| sim.unit(id))
    }
}

impl fmt::Display for UnitCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(id) => write!(f, "Unit {id}"),
            Self::CurrentTargetOf(_) => f.write_str("Current Target"),
        }
    }
}

/// Deferred handle to the periodic effect of one spell on one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DotReference {
    caster: UnitId,
    spell: ActionId,
    target: UnitCell,
}

impl DotReference {
    pub(crate) fn new(caster: UnitId, spell: ActionId, target: UnitCell) -> Self {
        Self {
            caster,
            spell,
            target,
        }
    }

    pub fn caster(&self) -> UnitId {
        self.caster
    }

    pub fn spell(&self) -> ActionId {
        self.spell
    }

    pub fn target(&self) -> UnitCell {
        self.target
    }

    /// Effect instance, if the target resolves and the effect was ever applied.
    pub fn get<'s>(&self, sim: &'s Simulation) -> Option<&'s Dot> {
        let target = self.target.get(sim)?;
        sim.dot(self.caster, self.spell, target)
    }

    pub fn is_active(&self, sim: &Simulation) -> bool {
        self.get(sim).is_some_and(Dot::is_active)
    }

    /// Whether the referenced target currently takes part in the encounter.
    pub fn target_enabled(&self, sim: &Simulation) -> bool {
        self.target.unit(sim).is_some_and(Unit::is_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{SimConfig, UnitStats};

    #[test]
    fn current_target_follows_the_caster() {
        let mut sim = Simulation::new(SimConfig::default(), 0);
        let first = sim.add_target("A", UnitStats::default()).unwrap();
        let second = sim.add_target("B", UnitStats::default()).unwrap();
        let player = sim.add_player("P", UnitStats::default());

        let cell = UnitCell::CurrentTargetOf(player);
        assert_eq!(cell.get(&sim), Some(first));

        sim.set_current_target(player, Some(second));
        assert_eq!(cell.get(&sim), Some(second));

        sim.set_current_target(player, None);
        assert_eq!(cell.get(&sim), None);
        assert_eq!(UnitCell::Fixed(first).get(&sim), Some(first));
        assert_eq!(UnitCell::Fixed(UnitId(99)).get(&sim), None);
    }

    #[test]
    fn missing_instance_reads_inactive() {
        let mut sim = Simulation::new(SimConfig::default(), 0);
        let target = sim.add_target("A", UnitStats::default()).unwrap();
        let player = sim.add_player("P", UnitStats::default());

        let reference = DotReference::new(player, ActionId(1), UnitCell::Fixed(target));
        assert!(reference.get(&sim).is_none());
        assert!(!reference.is_active(&sim));
        assert!(reference.target_enabled(&sim));
    }
}
