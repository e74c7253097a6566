//! Periodic effect ("dot") instances.
//!
//! A dot instance exists per (spell, target) once the caster has applied it
//! at least once. It stays in the caster's table after expiring so that its
//! last snapshot can still be inspected; `is_active` tells whether it is
//! currently ticking.
//!
//! # Snapshots
//!
//! Tick damage, crit chance and tick period are captured when the effect is
//! (re)applied and stay fixed until the next application, even if the
//! caster's live modifiers change in between.

use std::time::Duration;

use crate::combat;
use crate::spell::ActionId;
use crate::time::SimTime;
use crate::unit::UnitId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct DotKey {
    pub spell: ActionId,
    pub target: UnitId,
}

/// Values captured when a dot is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DotSnapshot {
    /// Tick damage including caster and target multipliers, excluding crits.
    pub tick_damage: f64,
    pub crit_chance: f64,
    pub tick_period: Duration,
}

/// One periodic effect instance on one target.
#[derive(Clone, Debug, PartialEq)]
pub struct Dot {
    spell: ActionId,
    target: UnitId,
    active: bool,
    expires_at: SimTime,
    next_tick_at: SimTime,
    ticks_remaining: u32,
    snapshot: DotSnapshot,
}

impl Dot {
    pub(crate) fn new(spell: ActionId, target: UnitId) -> Self {
        Self {
            spell,
            target,
            active: false,
            expires_at: SimTime::ZERO,
            next_tick_at: SimTime::ZERO,
            ticks_remaining: 0,
            snapshot: DotSnapshot::default(),
        }
    }

    pub fn spell(&self) -> ActionId {
        self.spell
    }

    pub fn target(&self) -> UnitId {
        self.target
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Time left on the effect; zero when inactive.
    pub fn remaining_duration(&self, now: SimTime) -> Duration {
        if self.active {
            now.until(self.expires_at)
        } else {
            Duration::ZERO
        }
    }

    /// Snapshotted tick period of the last application.
    pub fn tick_period(&self) -> Duration {
        self.snapshot.tick_period
    }

    pub fn snapshot(&self) -> &DotSnapshot {
        &self.snapshot
    }

    /// Expected tick damage using only snapshotted values.
    pub fn expected_tick_damage_from_snapshot(&self) -> f64 {
        combat::expected_damage(self.snapshot.tick_damage, self.snapshot.crit_chance)
    }

    pub fn next_tick_at(&self) -> Option<SimTime> {
        self.active.then_some(self.next_tick_at)
    }

    /// (Re)applies the effect, replacing the snapshot and restarting its ticks.
    pub(crate) fn apply(&mut self, now: SimTime, num_ticks: u32, snapshot: DotSnapshot) {
        self.snapshot = snapshot;
        self.ticks_remaining = num_ticks;
        self.next_tick_at = now + snapshot.tick_period;
        self.expires_at = now + snapshot.tick_period.saturating_mul(num_ticks);
        self.active = num_ticks > 0 && !snapshot.tick_period.is_zero();
    }

    /// Consumes one tick. Returns false if the effect was not due to tick.
    pub(crate) fn tick(&mut self, now: SimTime) -> bool {
        if !self.active || self.next_tick_at > now {
            return false;
        }
        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
        if self.ticks_remaining == 0 {
            self.active = false;
        } else {
            self.next_tick_at = self.next_tick_at + self.snapshot.tick_period;
        }
        true
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
        self.ticks_remaining = 0;
    }
}
