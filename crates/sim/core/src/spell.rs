//! Spell definitions.
//!
//! A spell is static game content registered on its caster. Spells with a
//! [`DotConfig`] apply a periodic effect to their target when cast.

use std::fmt;
use std::time::Duration;

use crate::runes::RuneCost;

/// Stable identity of a spell or ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActionId(pub i32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{SpellID: {}}}", self.0)
    }
}

/// Periodic effect parameters of a spell.
#[derive(Clone, Debug, PartialEq)]
pub struct DotConfig {
    /// Damage of a single tick before caster and target modifiers.
    pub base_tick_damage: f64,
    /// Tick period before haste.
    pub base_tick_period: Duration,
    /// Ticks per application.
    pub num_ticks: u32,
    /// Whether haste shortens the tick period.
    pub affected_by_haste: bool,
}

/// A spell known by a unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Spell {
    pub id: ActionId,
    pub label: String,
    pub cooldown: Duration,
    pub rune_cost: RuneCost,
    /// Immediate damage on cast before modifiers.
    pub direct_damage: f64,
    pub triggers_gcd: bool,
    pub dot: Option<DotConfig>,
}

impl Spell {
    pub fn new(id: ActionId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            cooldown: Duration::ZERO,
            rune_cost: RuneCost::default(),
            direct_damage: 0.0,
            triggers_gcd: true,
            dot: None,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_rune_cost(mut self, rune_cost: RuneCost) -> Self {
        self.rune_cost = rune_cost;
        self
    }

    pub fn with_direct_damage(mut self, damage: f64) -> Self {
        self.direct_damage = damage;
        self
    }

    pub fn with_dot(mut self, dot: DotConfig) -> Self {
        self.dot = Some(dot);
        self
    }

    pub fn off_gcd(mut self) -> Self {
        self.triggers_gcd = false;
        self
    }

    /// Whether this spell applies a periodic effect.
    #[inline]
    pub fn has_dot(&self) -> bool {
        self.dot.is_some()
    }
}
