//! Units: the caster and the encounter targets.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::dot::{Dot, DotKey};
use crate::runes::RunicPowerBar;
use crate::spell::{ActionId, Spell};
use crate::time::SimTime;

/// Unique identifier for a unit in one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Player,
    /// Encounter target with its roster index.
    Target { index: usize },
}

/// Combat modifiers of a unit. Values are multipliers unless noted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnitStats {
    /// Outgoing damage multiplier.
    pub damage_multiplier: f64,
    /// Incoming damage multiplier.
    pub damage_taken_multiplier: f64,
    /// Spell crit chance in `[0, 1]`.
    pub spell_crit_chance: f64,
    /// Current haste multiplier (1.0 = no haste).
    pub haste: f64,
    /// Haste multiplier from gear at trial start.
    pub initial_haste: f64,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            damage_multiplier: 1.0,
            damage_taken_multiplier: 1.0,
            spell_crit_chance: 0.0,
            haste: 1.0,
            initial_haste: 1.0,
        }
    }
}

/// A unit participating in the simulation.
#[derive(Clone, Debug)]
pub struct Unit {
    pub id: UnitId,
    pub label: String,
    pub kind: UnitKind,
    pub stats: UnitStats,
    enabled: bool,
    runes: Option<RunicPowerBar>,
    spells: Vec<Spell>,
    cooldowns: HashMap<ActionId, SimTime>,
    gcd_ready_at: SimTime,
    current_target: Option<UnitId>,
    dots: BTreeMap<DotKey, Dot>,
}

impl Unit {
    pub fn new(id: UnitId, label: impl Into<String>, kind: UnitKind) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            stats: UnitStats::default(),
            enabled: true,
            runes: None,
            spells: Vec::new(),
            cooldowns: HashMap::new(),
            gcd_ready_at: SimTime::ZERO,
            current_target: None,
            dots: BTreeMap::new(),
        }
    }

    pub fn with_stats(mut self, stats: UnitStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn set_runes(&mut self, runes: Option<RunicPowerBar>) {
        self.runes = runes;
    }

    /// Registers a spell, replacing any previous spell with the same id.
    pub fn learn(&mut self, spell: Spell) {
        self.spells.retain(|s| s.id != spell.id);
        self.spells.push(spell);
    }

    /// Whether the unit is alive and present in the encounter.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn target_index(&self) -> Option<usize> {
        match self.kind {
            UnitKind::Target { index } => Some(index),
            UnitKind::Player => None,
        }
    }

    pub fn has_runes(&self) -> bool {
        self.runes.is_some()
    }

    pub fn runes(&self) -> Option<&RunicPowerBar> {
        self.runes.as_ref()
    }

    pub fn runes_mut(&mut self) -> Option<&mut RunicPowerBar> {
        self.runes.as_mut()
    }

    pub fn spell(&self, id: ActionId) -> Option<&Spell> {
        self.spells.iter().find(|s| s.id == id)
    }

    pub fn spells(&self) -> &[Spell] {
        &self.spells
    }

    pub fn cooldown_ready_at(&self, id: ActionId) -> SimTime {
        self.cooldowns.get(&id).copied().unwrap_or(SimTime::ZERO)
    }

    pub(crate) fn start_cooldown(&mut self, id: ActionId, ready_at: SimTime) {
        self.cooldowns.insert(id, ready_at);
    }

    pub fn gcd_ready_at(&self) -> SimTime {
        self.gcd_ready_at
    }

    pub(crate) fn start_gcd(&mut self, ready_at: SimTime) {
        self.gcd_ready_at = ready_at;
    }

    pub fn current_target(&self) -> Option<UnitId> {
        self.current_target
    }

    pub(crate) fn set_current_target(&mut self, target: Option<UnitId>) {
        self.current_target = target;
    }

    /// Periodic effect instance cast by this unit, if it was ever applied.
    pub fn dot(&self, spell: ActionId, target: UnitId) -> Option<&Dot> {
        self.dots.get(&DotKey { spell, target })
    }

    pub(crate) fn dot_mut(&mut self, spell: ActionId, target: UnitId) -> Option<&mut Dot> {
        self.dots.get_mut(&DotKey { spell, target })
    }

    pub(crate) fn dot_entry(&mut self, spell: ActionId, target: UnitId) -> &mut Dot {
        self.dots
            .entry(DotKey { spell, target })
            .or_insert_with(|| Dot::new(spell, target))
    }

    pub fn dots(&self) -> impl Iterator<Item = &Dot> {
        self.dots.values()
    }

    pub(crate) fn dots_mut(&mut self) -> impl Iterator<Item = &mut Dot> {
        self.dots.values_mut()
    }
}
