//! Encounter target roster.

use arrayvec::ArrayVec;

use crate::config::SimConfig;
use crate::unit::UnitId;

/// Ordered list of every target in the encounter, enabled or not.
///
/// Targets are never removed from the roster; a dead or despawned target is
/// disabled on its [`Unit`](crate::Unit) instead so that roster indices stay
/// stable for the whole trial.
#[derive(Clone, Debug, Default)]
pub struct Encounter {
    targets: ArrayVec<UnitId, { SimConfig::MAX_TARGETS }>,
}

impl Encounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a target, returning its roster index, or `None` when full.
    pub(crate) fn push(&mut self, id: UnitId) -> Option<usize> {
        self.targets.try_push(id).ok()?;
        Some(self.targets.len() - 1)
    }

    pub fn targets(&self) -> &[UnitId] {
        &self.targets
    }

    /// Target at a roster index.
    pub fn target(&self, index: usize) -> Option<UnitId> {
        self.targets.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
