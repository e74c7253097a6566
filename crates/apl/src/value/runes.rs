//! Rune values.
//!
//! Every node here requires the caster to own a rune bar when it is
//! built. At evaluation the bar is looked up again; a caster that has lost
//! it reads neutral values.

use std::fmt;
use std::time::Duration;

use sim_core::{RuneType, RunicPowerBar, SimTime, Simulation, Unit, UnitId};

use super::{AplValue, ValueNode};
use crate::config::ValueConfig;
use crate::context::CompileContext;

fn rune_bar(sim: &Simulation, caster: UnitId) -> Option<&RunicPowerBar> {
    sim.unit(caster).and_then(Unit::runes)
}

fn count(runes: u8) -> i32 {
    i32::from(runes)
}

// ============================================================================
// Counts
// ============================================================================

/// Ready runes usable as the type, Death runes included.
pub struct CurrentRuneCount {
    caster: UnitId,
    rune_type: RuneType,
}

impl ValueNode<i32> for CurrentRuneCount {
    fn evaluate(&self, sim: &Simulation) -> i32 {
        rune_bar(sim, self.caster).map_or(0, |r| {
            count(r.current_runes(self.rune_type, sim.current_time()))
        })
    }
}

impl fmt::Display for CurrentRuneCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Current Rune Count({})", self.rune_type)
    }
}

pub struct CurrentNonDeathRuneCount {
    caster: UnitId,
    rune_type: RuneType,
}

impl ValueNode<i32> for CurrentNonDeathRuneCount {
    fn evaluate(&self, sim: &Simulation) -> i32 {
        rune_bar(sim, self.caster).map_or(0, |r| {
            count(r.current_non_death_runes(self.rune_type, sim.current_time()))
        })
    }
}

impl fmt::Display for CurrentNonDeathRuneCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Current Non-Death Rune Count({})", self.rune_type)
    }
}

// ============================================================================
// Slots
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotQuery {
    Active,
    Death,
}

pub struct CurrentRuneSlot {
    caster: UnitId,
    query: SlotQuery,
    slot: usize,
}

impl ValueNode<bool> for CurrentRuneSlot {
    fn evaluate(&self, sim: &Simulation) -> bool {
        let Some(runes) = rune_bar(sim, self.caster) else {
            return false;
        };
        match self.query {
            SlotQuery::Active => runes.is_active(self.slot, sim.current_time()),
            SlotQuery::Death => runes.is_death(self.slot),
        }
    }
}

impl fmt::Display for CurrentRuneSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.query {
            SlotQuery::Active => "Current Rune Active",
            SlotQuery::Death => "Current Rune Death",
        };
        write!(f, "{name}({})", self.slot + 1)
    }
}

pub struct RuneSlotCooldown {
    caster: UnitId,
    slot: usize,
}

impl ValueNode<Duration> for RuneSlotCooldown {
    fn evaluate(&self, sim: &Simulation) -> Duration {
        let now = sim.current_time();
        rune_bar(sim, self.caster)
            .and_then(|r| r.slot_ready_at(self.slot))
            .map_or(Duration::ZERO, |ready| now.until(ready))
    }
}

impl fmt::Display for RuneSlotCooldown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rune Slot Cooldown({})", self.slot + 1)
    }
}

// ============================================================================
// Cooldowns
// ============================================================================

/// Time until a rune of the type is ready. Death runes read zero.
pub struct RuneCooldown {
    caster: UnitId,
    rune_type: RuneType,
    /// Only consider slots still regenerating after now.
    next: bool,
}

impl RuneCooldown {
    fn ready_at(&self, runes: &RunicPowerBar, now: SimTime) -> Option<SimTime> {
        if self.next {
            runes.next_ready_at(self.rune_type, now)
        } else {
            runes.ready_at(self.rune_type)
        }
    }
}

impl ValueNode<Duration> for RuneCooldown {
    fn evaluate(&self, sim: &Simulation) -> Duration {
        let now = sim.current_time();
        rune_bar(sim, self.caster)
            .and_then(|r| self.ready_at(r, now))
            .map_or(Duration::ZERO, |ready| now.until(ready))
    }
}

impl fmt::Display for RuneCooldown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.next {
            "Next Rune Cooldown"
        } else {
            "Rune Cooldown"
        };
        write!(f, "{name}({})", self.rune_type)
    }
}

/// Regeneration time of one rune slot.
pub struct FullRuneCooldown {
    caster: UnitId,
    use_base_value: bool,
}

impl ValueNode<Duration> for FullRuneCooldown {
    fn evaluate(&self, sim: &Simulation) -> Duration {
        let Some(unit) = sim.unit(self.caster) else {
            return Duration::ZERO;
        };
        let Some(runes) = unit.runes() else {
            return Duration::ZERO;
        };
        if self.use_base_value {
            runes.base_cooldown(unit.stats.initial_haste)
        } else {
            runes.full_cooldown()
        }
    }
}

impl fmt::Display for FullRuneCooldown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.use_base_value {
            f.write_str("Full Rune Cooldown(Base)")
        } else {
            f.write_str("Full Rune Cooldown")
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

pub(crate) fn new_current_rune_count(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::CurrentRuneCount { rune_type } = config else {
        return None;
    };
    if !ctx.require_runes() {
        return None;
    }
    Some(AplValue::int(CurrentRuneCount {
        caster: ctx.caster(),
        rune_type: *rune_type,
    }))
}

pub(crate) fn new_current_non_death_rune_count(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::CurrentNonDeathRuneCount { rune_type } = config else {
        return None;
    };
    if !ctx.require_runes() {
        return None;
    }
    Some(AplValue::int(CurrentNonDeathRuneCount {
        caster: ctx.caster(),
        rune_type: *rune_type,
    }))
}

fn new_slot_query(
    ctx: &mut CompileContext<'_>,
    query: SlotQuery,
    rune_slot: u8,
) -> Option<AplValue> {
    if !ctx.require_runes() {
        return None;
    }
    let slot = ctx.rune_slot(rune_slot)?;
    Some(AplValue::bool(CurrentRuneSlot {
        caster: ctx.caster(),
        query,
        slot,
    }))
}

pub(crate) fn new_current_rune_active(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::CurrentRuneActive { rune_slot } = config else {
        return None;
    };
    new_slot_query(ctx, SlotQuery::Active, *rune_slot)
}

pub(crate) fn new_current_rune_death(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::CurrentRuneDeath { rune_slot } = config else {
        return None;
    };
    new_slot_query(ctx, SlotQuery::Death, *rune_slot)
}

pub(crate) fn new_rune_slot_cooldown(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::RuneSlotCooldown { rune_slot } = config else {
        return None;
    };
    if !ctx.require_runes() {
        return None;
    }
    let slot = ctx.rune_slot(*rune_slot)?;
    Some(AplValue::duration(RuneSlotCooldown {
        caster: ctx.caster(),
        slot,
    }))
}

pub(crate) fn new_rune_cooldown(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::RuneCooldown { rune_type } = config else {
        return None;
    };
    if !ctx.require_runes() {
        return None;
    }
    Some(AplValue::duration(RuneCooldown {
        caster: ctx.caster(),
        rune_type: *rune_type,
        next: false,
    }))
}

pub(crate) fn new_next_rune_cooldown(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::NextRuneCooldown { rune_type } = config else {
        return None;
    };
    if !ctx.require_runes() {
        return None;
    }
    Some(AplValue::duration(RuneCooldown {
        caster: ctx.caster(),
        rune_type: *rune_type,
        next: true,
    }))
}

pub(crate) fn new_full_rune_cooldown(
    ctx: &mut CompileContext<'_>,
    config: &ValueConfig,
) -> Option<AplValue> {
    let ValueConfig::FullRuneCooldown { use_base_value } = config else {
        return None;
    };
    if !ctx.require_runes() {
        return None;
    }
    Some(AplValue::duration(FullRuneCooldown {
        caster: ctx.caster(),
        use_base_value: *use_base_value,
    }))
}
