//! Registry of value node constructors.
//!
//! Every [`ValueConfig`] variant maps to exactly one constructor, keyed by
//! the variant name. Constructors either return a complete node or `None`
//! after recording why in the compile context's diagnostics; they never
//! return a half-built node.

use std::collections::HashMap;

use tracing::trace;

use crate::config::ValueConfig;
use crate::context::CompileContext;
use crate::value::{AplValue, dot, logic, runes};

/// Builds one node kind from its configuration.
pub type ValueConstructor = fn(&mut CompileContext<'_>, &ValueConfig) -> Option<AplValue>;

/// Lookup table from expression kind to constructor.
///
/// # Example
///
/// ```
/// use apl::ValueCatalog;
///
/// let catalog = ValueCatalog::standard();
/// assert!(catalog.contains("DotLowestRemainingTime"));
/// assert!(catalog.contains("CurrentRuneCount"));
/// ```
#[derive(Clone)]
pub struct ValueCatalog {
    constructors: HashMap<&'static str, ValueConstructor>,
}

impl ValueCatalog {
    /// Creates a catalog with no constructors.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Creates a catalog with every built-in node kind.
    pub fn standard() -> Self {
        let mut catalog = Self::empty();

        catalog.register("Const", logic::new_const);
        catalog.register("And", logic::new_and);
        catalog.register("Or", logic::new_or);
        catalog.register("Not", logic::new_not);
        catalog.register("Cmp", logic::new_cmp);
        catalog.register("CurrentTime", logic::new_current_time);
        catalog.register("RemainingTime", logic::new_remaining_time);
        catalog.register("NumberTargets", logic::new_number_targets);

        catalog.register("DotIsActive", dot::new_is_active);
        catalog.register("DotIsActiveOnAllTargets", dot::new_is_active_on_all_targets);
        catalog.register("DotRemainingTime", dot::new_remaining_time);
        catalog.register("DotLowestRemainingTime", dot::new_lowest_remaining_time);
        catalog.register("DotTickFrequency", dot::new_tick_frequency);
        catalog.register("DotPercentIncrease", dot::new_percent_increase);
        catalog.register("DotCritPercentIncrease", dot::new_crit_percent_increase);
        catalog.register(
            "DotTickRatePercentIncrease",
            dot::new_tick_rate_percent_increase,
        );

        catalog.register("CurrentRuneCount", runes::new_current_rune_count);
        catalog.register(
            "CurrentNonDeathRuneCount",
            runes::new_current_non_death_rune_count,
        );
        catalog.register("CurrentRuneActive", runes::new_current_rune_active);
        catalog.register("CurrentRuneDeath", runes::new_current_rune_death);
        catalog.register("RuneCooldown", runes::new_rune_cooldown);
        catalog.register("NextRuneCooldown", runes::new_next_rune_cooldown);
        catalog.register("RuneSlotCooldown", runes::new_rune_slot_cooldown);
        catalog.register("FullRuneCooldown", runes::new_full_rune_cooldown);

        catalog
    }

    /// Registers a constructor, returning the one it replaces.
    pub fn register(
        &mut self,
        kind: &'static str,
        constructor: ValueConstructor,
    ) -> Option<ValueConstructor> {
        self.constructors.insert(kind, constructor)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Builds the node described by `config`.
    pub fn build(&self, ctx: &mut CompileContext<'_>, config: &ValueConfig) -> Option<AplValue> {
        let kind = config.kind();
        let Some(constructor) = self.constructors.get(kind) else {
            ctx.warn(format!("No value constructor registered for {kind}"));
            return None;
        };
        let value = constructor(ctx, config);
        trace!(kind, built = value.is_some(), "value node compiled");
        value
    }
}

impl Default for ValueCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use sim_core::{SimConfig, Simulation, UnitStats};

    #[test]
    fn standard_catalog_covers_every_kind() {
        let catalog = ValueCatalog::standard();
        assert_eq!(catalog.len(), 24);
        for kind in [
            "Const",
            "Cmp",
            "DotIsActiveOnAllTargets",
            "DotTickRatePercentIncrease",
            "CurrentNonDeathRuneCount",
            "FullRuneCooldown",
        ] {
            assert!(catalog.contains(kind), "{kind} missing");
        }
    }

    #[test]
    fn unregistered_kind_warns() {
        let mut sim = Simulation::new(SimConfig::default(), 0);
        let player = sim.add_player("P", UnitStats::default());
        let catalog = ValueCatalog::empty();
        let mut diagnostics = Diagnostics::new();

        let mut ctx = CompileContext::new(&sim, player, &catalog, &mut diagnostics);
        assert!(catalog.build(&mut ctx, &ValueConfig::CurrentTime).is_none());
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn registered_constructor_can_be_replaced() {
        fn never(_: &mut CompileContext<'_>, _: &ValueConfig) -> Option<AplValue> {
            None
        }

        let mut catalog = ValueCatalog::standard();
        assert!(catalog.register("CurrentTime", never).is_some());

        let sim = Simulation::new(SimConfig::default(), 0);
        let mut diagnostics = Diagnostics::new();
        let mut ctx = CompileContext::new(&sim, sim_core::UnitId(0), &catalog, &mut diagnostics);
        assert!(catalog.build(&mut ctx, &ValueConfig::CurrentTime).is_none());
    }
}
