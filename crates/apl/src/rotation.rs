//! Priority list evaluation.
//!
//! An [`AplRotation`] is the compiled form of a [`RotationConfig`]. At each
//! decision point it scans its entries top to bottom and executes the
//! first one whose condition holds and whose action is ready, the same
//! first-success rule a behavior tree selector applies to its children.
//!
//! # States
//!
//! ```text
//! Idle ──▶ Evaluating ──▶ ActionSelected ──▶ ActionExecuting
//!   ▲          │                                   │
//!   └──────────┘ (nothing ready)                   │
//!              ▲───────────────────────────────────┘
//! ```
//!
//! Entries that failed to compile stay in the list as inert slots so that
//! indices reported in [`Decision`] match the configured list.

use sim_core::{CastError, SimError, SimTime, Simulation, UnitId};
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::action::{ActionOutcome, AplAction, build_action};
use crate::catalog::ValueCatalog;
use crate::config::{ListItem, RotationConfig};
use crate::context::CompileContext;
use crate::diagnostics::Diagnostics;
use crate::error::AplError;
use crate::value::BoolNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum RotationState {
    Idle,
    Evaluating,
    ActionSelected { index: usize },
    ActionExecuting { index: usize },
}

/// Outcome of one decision point.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    Executed { index: usize },
    NothingReady,
    /// The selected action was rejected by the simulation.
    Failed { index: usize, error: CastError },
}

/// One compiled priority list entry.
pub struct AplEntry {
    uuid: Option<Uuid>,
    condition: Option<BoolNode>,
    action: Box<dyn AplAction>,
}

impl AplEntry {
    pub fn uuid(&self) -> Option<Uuid> {
        self.uuid
    }

    /// Whether the entry would fire now.
    pub fn should_act(&self, sim: &Simulation) -> bool {
        let condition = self.condition.as_ref().is_none_or(|c| c.evaluate(sim));
        condition && self.action.is_ready(sim)
    }

    pub fn describe(&self) -> String {
        match &self.condition {
            Some(condition) => format!("{} if {}", self.action, condition),
            None => self.action.to_string(),
        }
    }
}

pub struct AplRotation {
    caster: UnitId,
    entries: Vec<Option<AplEntry>>,
    state: RotationState,
    wait_until: Option<SimTime>,
}

impl AplRotation {
    /// Compiles a rotation for `caster`.
    ///
    /// Configuration problems are reported to `diagnostics` and disable
    /// only the affected entry. The only hard error is a caster that does
    /// not exist.
    pub fn new(
        config: &RotationConfig,
        sim: &Simulation,
        caster: UnitId,
        catalog: &ValueCatalog,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, AplError> {
        if sim.unit(caster).is_none() {
            return Err(AplError::UnknownCaster(caster));
        }

        let mut ctx = CompileContext::new(sim, caster, catalog, diagnostics);
        let entries = config
            .priority_list
            .iter()
            .enumerate()
            .map(|(index, item)| Self::compile_entry(&mut ctx, index, item))
            .collect();

        Ok(Self {
            caster,
            entries,
            state: RotationState::Idle,
            wait_until: None,
        })
    }

    fn compile_entry(
        ctx: &mut CompileContext<'_>,
        index: usize,
        item: &ListItem,
    ) -> Option<AplEntry> {
        if item.hide {
            return None;
        }
        ctx.set_entry(item.uuid);

        let action = build_action(ctx, &item.action);
        let condition = match &item.condition {
            Some(config) => ctx.bool_value(config).map(Some),
            None => Some(None),
        };

        match (action, condition) {
            (Some(action), Some(condition)) => Some(AplEntry {
                uuid: item.uuid,
                condition,
                action,
            }),
            _ => {
                debug!(index, "priority list entry disabled");
                None
            }
        }
    }

    pub fn caster(&self) -> UnitId {
        self.caster
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    /// Number of configured entries, inert ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<&AplEntry> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    /// Entries that compiled, with their configured index.
    pub fn active_entries(&self) -> impl Iterator<Item = (usize, &AplEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (i, e)))
    }

    /// Time until which a `Wait` keeps the rotation idle.
    pub fn wait_until(&self) -> Option<SimTime> {
        self.wait_until
    }

    /// Scans the list and returns the first entry that should act.
    pub fn select(&mut self, sim: &Simulation) -> Option<usize> {
        self.state = RotationState::Evaluating;

        let selected = self
            .active_entries()
            .find(|(_, entry)| entry.should_act(sim))
            .map(|(index, _)| index);

        self.state = match selected {
            Some(index) => {
                trace!(index, time = %sim.current_time(), "entry selected");
                RotationState::ActionSelected { index }
            }
            None => RotationState::Idle,
        };
        selected
    }

    /// Runs one decision point: select an entry and execute its action.
    pub fn do_next_action(&mut self, sim: &mut Simulation) -> Decision {
        let now = sim.current_time();
        if let Some(until) = self.wait_until {
            if now < until {
                self.state = RotationState::Idle;
                return Decision::NothingReady;
            }
            self.wait_until = None;
        }

        let Some(index) = self.select(sim) else {
            return Decision::NothingReady;
        };
        self.state = RotationState::ActionExecuting { index };

        let Some(entry) = self.entries.get(index).and_then(Option::as_ref) else {
            self.state = RotationState::Idle;
            return Decision::NothingReady;
        };

        let result = entry.action.execute(sim);
        self.state = RotationState::Evaluating;
        match result {
            Ok(ActionOutcome::Cast) => {
                debug!(index, time = %now, action = %entry.action, "executed");
                Decision::Executed { index }
            }
            Ok(ActionOutcome::WaitUntil(until)) => {
                debug!(index, time = %now, until = %until, "waiting");
                self.wait_until = Some(until);
                Decision::Executed { index }
            }
            Err(error) => {
                warn!(
                    index,
                    time = %now,
                    code = error.error_code(),
                    severity = error.severity().as_str(),
                    "action failed: {error}"
                );
                Decision::Failed { index, error }
            }
        }
    }

    /// Earliest time the rotation may act again.
    pub fn next_decision_time(&self, sim: &Simulation) -> SimTime {
        let next = sim.next_event_time();
        match self.wait_until {
            Some(until) if until > sim.current_time() => next.min(until),
            _ => next,
        }
    }
}
