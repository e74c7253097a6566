//! Actions a priority list entry can take.

use std::fmt;
use std::time::Duration;

use sim_core::{ActionId, CastError, SimTime, Simulation, UnitId};

use crate::config::ActionConfig;
use crate::context::CompileContext;
use crate::reference::UnitCell;

/// What executing an action did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Cast,
    /// The caster idles until the given time.
    WaitUntil(SimTime),
}

/// An executable priority list action.
pub trait AplAction: fmt::Display + Send + Sync {
    /// Whether the action could execute right now.
    fn is_ready(&self, sim: &Simulation) -> bool;

    fn execute(&self, sim: &mut Simulation) -> Result<ActionOutcome, CastError>;
}

/// Casts a spell on a target.
pub struct CastSpell {
    caster: UnitId,
    spell: ActionId,
    label: String,
    target: UnitCell,
}

impl CastSpell {
    fn target(&self, sim: &Simulation) -> Result<UnitId, CastError> {
        self.target.get(sim).ok_or(CastError::NoTarget)
    }
}

impl AplAction for CastSpell {
    fn is_ready(&self, sim: &Simulation) -> bool {
        self.target(sim)
            .and_then(|target| sim.check_cast(self.caster, self.spell, target))
            .is_ok()
    }

    fn execute(&self, sim: &mut Simulation) -> Result<ActionOutcome, CastError> {
        let target = self.target(sim)?;
        sim.cast(self.caster, self.spell, target)?;
        Ok(ActionOutcome::Cast)
    }
}

impl fmt::Display for CastSpell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cast {} {} on {}", self.label, self.spell, self.target)
    }
}

/// Idles for a fixed duration.
pub struct Wait {
    duration: Duration,
}

impl AplAction for Wait {
    fn is_ready(&self, _sim: &Simulation) -> bool {
        true
    }

    fn execute(&self, sim: &mut Simulation) -> Result<ActionOutcome, CastError> {
        Ok(ActionOutcome::WaitUntil(sim.current_time() + self.duration))
    }
}

impl fmt::Display for Wait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wait {:.3}s", self.duration.as_secs_f64())
    }
}

/// Compiles an action, or returns `None` after warning.
pub(crate) fn build_action(
    ctx: &mut CompileContext<'_>,
    config: &ActionConfig,
) -> Option<Box<dyn AplAction>> {
    match config {
        ActionConfig::CastSpell { spell_id, target } => {
            let spell = ctx.known_spell(*spell_id)?;
            let target = ctx.unit_cell(*target)?;
            Some(Box::new(CastSpell {
                caster: ctx.caster(),
                spell: *spell_id,
                label: spell.label.clone(),
                target,
            }))
        }
        ActionConfig::Wait { secs } => match Duration::try_from_secs_f64(*secs) {
            Ok(duration) if !duration.is_zero() => Some(Box::new(Wait { duration })),
            _ => {
                ctx.warn(format!("Invalid wait duration {secs}"));
                None
            }
        },
    }
}
