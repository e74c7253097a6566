//! Driving a rotation through one simulated encounter.

use std::time::Duration;

use sim_core::Simulation;
use tracing::{debug, trace};

use crate::rotation::{AplRotation, Decision};

/// Cap on actions taken without the clock moving.
///
/// Off-GCD actions with no cooldown could otherwise fire forever at the
/// same instant.
pub const MAX_ACTIONS_PER_INSTANT: usize = 64;

/// Summary of one trial.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrialReport {
    pub damage: f64,
    pub casts: u32,
    pub duration: Duration,
}

impl TrialReport {
    pub fn dps(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 { self.damage / secs } else { 0.0 }
    }
}

/// Runs `rotation` until the encounter ends.
///
/// At each decision point the rotation acts as long as something is
/// ready; otherwise the clock jumps to the next event that could change
/// the answer.
pub fn run_trial(sim: &mut Simulation, rotation: &mut AplRotation) -> TrialReport {
    let mut actions_this_instant = 0;

    while !sim.is_finished() {
        let decision = rotation.do_next_action(sim);
        trace!(time = %sim.current_time(), ?decision, "decision point");

        let acted = matches!(decision, Decision::Executed { .. });
        if acted && actions_this_instant < MAX_ACTIONS_PER_INSTANT {
            actions_this_instant += 1;
            continue;
        }
        if acted {
            debug!(time = %sim.current_time(), "action limit reached at one instant");
        }

        actions_this_instant = 0;
        let next = rotation.next_decision_time(sim);
        sim.advance_to(next);
    }

    TrialReport {
        damage: sim.damage_done(),
        casts: sim.casts(),
        duration: sim.current_time().elapsed(),
    }
}
