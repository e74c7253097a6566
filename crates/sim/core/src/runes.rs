//! Rune bar: a fixed set of regenerating resource slots.
//!
//! A rune bar holds six slots, two per base rune type (Blood, Frost, Unholy).
//! Any slot can be converted into a Death rune, which is usable in place of
//! any base type. Each slot carries its own ready time; a slot is active when
//! the clock has reached that time.
//!
//! Slots of the same pair regenerate one at a time: spending a rune while its
//! partner is still regenerating queues the new regeneration behind it.
//!
//! The evaluation engine only reads counts and timers from here; spending and
//! conversion are simulation-side mutations.

use std::time::Duration;

use crate::config::SimConfig;
use crate::error::RuneError;
use crate::time::{SimTime, divide_duration, scale_duration};

/// Rune type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuneType {
    Blood,
    Frost,
    Unholy,
    /// Wildcard type, spendable as any base type.
    Death,
}

impl RuneType {
    /// The three base types in slot order.
    pub const BASE: [RuneType; 3] = [RuneType::Blood, RuneType::Frost, RuneType::Unholy];

    /// Slot indices owned by a base type. Death runes own no slots.
    pub const fn slot_pair(self) -> Option<[usize; 2]> {
        match self {
            Self::Blood => Some([0, 1]),
            Self::Frost => Some([2, 3]),
            Self::Unholy => Some([4, 5]),
            Self::Death => None,
        }
    }
}

/// Per-type rune cost of a spell. Death runes may pay for any base type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuneCost {
    pub blood: u8,
    pub frost: u8,
    pub unholy: u8,
}

impl RuneCost {
    pub fn get(&self, rune_type: RuneType) -> u8 {
        match rune_type {
            RuneType::Blood => self.blood,
            RuneType::Frost => self.frost,
            RuneType::Unholy => self.unholy,
            RuneType::Death => 0,
        }
    }

    pub fn is_free(&self) -> bool {
        self.blood == 0 && self.frost == 0 && self.unholy == 0
    }
}

/// A single rune slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuneSlot {
    base: RuneType,
    death: bool,
    ready_at: SimTime,
}

impl RuneSlot {
    fn new(base: RuneType) -> Self {
        Self {
            base,
            death: false,
            ready_at: SimTime::ZERO,
        }
    }

    pub fn base(&self) -> RuneType {
        self.base
    }

    pub fn is_death(&self) -> bool {
        self.death
    }

    pub fn ready_at(&self) -> SimTime {
        self.ready_at
    }

    #[inline]
    pub fn is_ready(&self, now: SimTime) -> bool {
        self.ready_at <= now
    }
}

/// Rune resource owned by a unit.
#[derive(Clone, Debug, PartialEq)]
pub struct RunicPowerBar {
    slots: [RuneSlot; SimConfig::RUNE_SLOTS],
    rune_cd: Duration,
    regen_multiplier: f64,
}

impl RunicPowerBar {
    /// Creates a rune bar with every slot ready.
    pub fn new(rune_cd: Duration) -> Self {
        Self {
            slots: [
                RuneSlot::new(RuneType::Blood),
                RuneSlot::new(RuneType::Blood),
                RuneSlot::new(RuneType::Frost),
                RuneSlot::new(RuneType::Frost),
                RuneSlot::new(RuneType::Unholy),
                RuneSlot::new(RuneType::Unholy),
            ],
            rune_cd,
            regen_multiplier: 1.0,
        }
    }

    /// Sets the multiplier applied to the rune cooldown (lower is faster).
    pub fn with_regen_multiplier(mut self, multiplier: f64) -> Self {
        self.set_regen_multiplier(multiplier);
        self
    }

    pub fn set_regen_multiplier(&mut self, multiplier: f64) {
        self.regen_multiplier = if multiplier.is_finite() && multiplier > 0.0 {
            multiplier
        } else {
            1.0
        };
    }

    pub fn regen_multiplier(&self) -> f64 {
        self.regen_multiplier
    }

    /// Unmodified per-slot regeneration time.
    pub fn rune_cd(&self) -> Duration {
        self.rune_cd
    }

    pub fn slot(&self, slot: usize) -> Option<&RuneSlot> {
        self.slots.get(slot)
    }

    pub fn slots(&self) -> &[RuneSlot] {
        &self.slots
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether the slot has finished regenerating. Out-of-range slots are inactive.
    pub fn is_active(&self, slot: usize, now: SimTime) -> bool {
        self.slot(slot).is_some_and(|s| s.is_ready(now))
    }

    /// Whether the slot currently holds a Death rune.
    pub fn is_death(&self, slot: usize) -> bool {
        self.slot(slot).is_some_and(|s| s.death)
    }

    /// Ready time of a single slot, if the slot exists.
    pub fn slot_ready_at(&self, slot: usize) -> Option<SimTime> {
        self.slot(slot).map(|s| s.ready_at)
    }

    /// Ready runes usable as `rune_type`.
    ///
    /// For a base type this counts ready non-death runes of that type plus
    /// every ready Death rune. For [`RuneType::Death`] only Death runes count.
    pub fn current_runes(&self, rune_type: RuneType, now: SimTime) -> u8 {
        let deaths = self.current_death_runes(now);
        match rune_type {
            RuneType::Death => deaths,
            base => self.current_non_death_runes(base, now) + deaths,
        }
    }

    /// Ready runes of `rune_type` that have not been converted to Death.
    pub fn current_non_death_runes(&self, rune_type: RuneType, now: SimTime) -> u8 {
        if rune_type == RuneType::Death {
            return 0;
        }
        self.count(|s| s.base == rune_type && !s.death && s.is_ready(now))
    }

    pub fn current_death_runes(&self, now: SimTime) -> u8 {
        self.count(|s| s.death && s.is_ready(now))
    }

    /// Earliest time at which a slot of the type's pair is ready.
    ///
    /// Returns `None` for [`RuneType::Death`], which owns no slots.
    pub fn ready_at(&self, rune_type: RuneType) -> Option<SimTime> {
        let [a, b] = rune_type.slot_pair()?;
        Some(self.slots[a].ready_at.min(self.slots[b].ready_at))
    }

    /// Completion time of the next regenerating slot of the type's pair.
    ///
    /// If neither slot is regenerating the rune is already available and
    /// `now` is returned.
    pub fn next_ready_at(&self, rune_type: RuneType, now: SimTime) -> Option<SimTime> {
        let pair = rune_type.slot_pair()?;
        Some(
            pair.iter()
                .map(|&i| self.slots[i].ready_at)
                .filter(|&t| t > now)
                .min()
                .unwrap_or(now),
        )
    }

    /// Regeneration time of one slot at the current regen multiplier.
    pub fn full_cooldown(&self) -> Duration {
        scale_duration(self.rune_cd, self.regen_multiplier)
    }

    /// Regeneration time of one slot at the unit's initial haste only.
    pub fn base_cooldown(&self, initial_haste: f64) -> Duration {
        if initial_haste <= 0.0 {
            return self.rune_cd;
        }
        divide_duration(self.rune_cd, initial_haste)
    }

    /// Whether `cost` could be paid right now.
    pub fn can_spend(&self, cost: &RuneCost, now: SimTime) -> Result<(), RuneError> {
        let mut deaths = self.current_death_runes(now);
        for rune_type in RuneType::BASE {
            let needed = cost.get(rune_type);
            let own = self.current_non_death_runes(rune_type, now);
            let shortfall = needed.saturating_sub(own);
            if shortfall > deaths {
                return Err(RuneError::Insufficient {
                    rune_type,
                    needed,
                    available: own + deaths,
                });
            }
            deaths -= shortfall;
        }
        Ok(())
    }

    // ========================================================================
    // Mutations (simulation side)
    // ========================================================================

    /// Spends runes for `cost`, preferring base runes over Death runes.
    ///
    /// Spent Death runes revert to their base type. Nothing is spent if the
    /// full cost cannot be paid.
    pub fn spend(&mut self, cost: &RuneCost, now: SimTime) -> Result<(), RuneError> {
        self.can_spend(cost, now)?;

        for rune_type in RuneType::BASE {
            for _ in 0..cost.get(rune_type) {
                let slot = self
                    .find_ready(|s| s.base == rune_type && !s.death, now)
                    .or_else(|| self.find_ready(|s| s.death, now));
                if let Some(slot) = slot {
                    self.start_regen(slot, now);
                }
            }
        }
        Ok(())
    }

    /// Converts a slot into a Death rune. Returns false for out-of-range slots.
    pub fn convert_to_death(&mut self, slot: usize) -> bool {
        match self.slots.get_mut(slot) {
            Some(s) => {
                s.death = true;
                true
            }
            None => false,
        }
    }

    fn start_regen(&mut self, slot: usize, now: SimTime) {
        let partner = slot ^ 1;
        let partner_ready = self.slots[partner].ready_at;
        let start = if partner_ready > now {
            partner_ready
        } else {
            now
        };
        let ready_at = start + self.full_cooldown();

        let s = &mut self.slots[slot];
        s.death = false;
        s.ready_at = ready_at;
    }

    fn find_ready(&self, pred: impl Fn(&RuneSlot) -> bool, now: SimTime) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.is_ready(now) && pred(s))
    }

    fn count(&self, pred: impl Fn(&RuneSlot) -> bool) -> u8 {
        self.slots.iter().filter(|s| pred(s)).count() as u8
    }
}

impl Default for RunicPowerBar {
    fn default() -> Self {
        Self::new(SimConfig::DEFAULT_RUNE_COOLDOWN)
    }
}
