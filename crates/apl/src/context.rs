//! Compile-time context handed to node constructors.

use sim_core::{ActionId, DotConfig, SimConfig, Simulation, Spell, Unit, UnitId};
use uuid::Uuid;

use crate::catalog::ValueCatalog;
use crate::config::{UnitReference, ValueConfig};
use crate::diagnostics::Diagnostics;
use crate::reference::{DotReference, UnitCell};
use crate::value::{AplValue, BoolNode};

/// Everything a node constructor may look at while building a node.
///
/// Constructors report problems through [`CompileContext::warn`] and
/// return `None`; the message is tagged with the entry being compiled.
pub struct CompileContext<'a> {
    sim: &'a Simulation,
    caster: UnitId,
    catalog: &'a ValueCatalog,
    diagnostics: &'a mut Diagnostics,
    entry: Option<Uuid>,
}

impl<'a> CompileContext<'a> {
    pub fn new(
        sim: &'a Simulation,
        caster: UnitId,
        catalog: &'a ValueCatalog,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            sim,
            caster,
            catalog,
            diagnostics,
            entry: None,
        }
    }

    /// Sets the entry subsequent messages are attributed to.
    pub fn set_entry(&mut self, entry: Option<Uuid>) {
        self.entry = entry;
    }

    pub fn caster(&self) -> UnitId {
        self.caster
    }

    pub fn caster_unit(&self) -> Option<&'a Unit> {
        self.sim.unit(self.caster)
    }

    fn caster_label(&self) -> String {
        self.caster_unit()
            .map_or_else(|| self.caster.to_string(), |u| u.label.clone())
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.diagnostics.warn(self.entry, message);
    }

    // ========================================================================
    // Nested values
    // ========================================================================

    /// Builds a nested node through the catalog.
    pub fn value(&mut self, config: &ValueConfig) -> Option<AplValue> {
        let catalog = self.catalog;
        catalog.build(self, config)
    }

    /// Builds a nested node that must produce a boolean.
    pub fn bool_value(&mut self, config: &ValueConfig) -> Option<BoolNode> {
        let value = self.value(config)?;
        match value.into_bool() {
            Ok(node) => Some(node),
            Err(err) => {
                self.warn(err.to_string());
                None
            }
        }
    }

    // ========================================================================
    // References
    // ========================================================================

    /// Resolves a unit reference to a deferred cell.
    pub fn unit_cell(&mut self, reference: UnitReference) -> Option<UnitCell> {
        match reference {
            UnitReference::Caster => Some(UnitCell::Fixed(self.caster)),
            UnitReference::CurrentTarget => Some(UnitCell::CurrentTargetOf(self.caster)),
            UnitReference::Target(index) => match self.sim.encounter().target(index) {
                Some(id) => Some(UnitCell::Fixed(id)),
                None => {
                    self.warn(format!("No encounter target at index {index}"));
                    None
                }
            },
        }
    }

    /// Looks up a spell the caster knows.
    pub fn known_spell(&mut self, spell_id: ActionId) -> Option<&'a Spell> {
        let spell = self.caster_unit().and_then(|u| u.spell(spell_id));
        if spell.is_none() {
            let label = self.caster_label();
            self.warn(format!("{label} does not know spell {spell_id}"));
        }
        spell
    }

    /// Looks up a known spell together with its periodic effect.
    pub fn dot_spell(&mut self, spell_id: ActionId) -> Option<(&'a Spell, &'a DotConfig)> {
        let spell = self.known_spell(spell_id)?;
        match &spell.dot {
            Some(dot) => Some((spell, dot)),
            None => {
                self.warn(format!("{} has no periodic effect", spell.label));
                None
            }
        }
    }

    /// Builds a reference to the periodic effect of `spell_id` on `target`.
    ///
    /// Only the spell is checked here. A current target is resolved on each
    /// read, so a caster without one yet gets a reference that reads as
    /// inactive until a target is selected.
    pub fn dot_reference(
        &mut self,
        target: UnitReference,
        spell_id: ActionId,
    ) -> Option<DotReference> {
        self.dot_spell(spell_id)?;
        let cell = self.unit_cell(target)?;
        Some(DotReference::new(self.caster, spell_id, cell))
    }

    /// Builds one reference per roster target for `spell_id`.
    ///
    /// The roster is read once, now; targets added later are not covered.
    pub fn multi_dot_references(&mut self, spell_id: ActionId) -> Option<Vec<DotReference>> {
        let spell = self.known_spell(spell_id)?;
        let references: Vec<_> = if spell.has_dot() {
            self.sim
                .encounter()
                .targets()
                .iter()
                .map(|&id| DotReference::new(self.caster, spell_id, UnitCell::Fixed(id)))
                .collect()
        } else {
            Vec::new()
        };

        if references.is_empty() {
            self.warn(format!("Could not find a DoT for {spell_id} on Target(s)"));
            return None;
        }
        Some(references)
    }

    // ========================================================================
    // Runes
    // ========================================================================

    /// Whether the caster has a rune bar; warns if not.
    pub fn require_runes(&mut self) -> bool {
        if self.caster_unit().is_some_and(Unit::has_runes) {
            return true;
        }
        let label = self.caster_label();
        self.warn(format!("{label} does not use Runes"));
        false
    }

    /// Converts a 1-based configured slot to a slot index.
    pub fn rune_slot(&mut self, slot: u8) -> Option<usize> {
        match (slot as usize).checked_sub(1) {
            Some(index) if index < SimConfig::RUNE_SLOTS => Some(index),
            _ => {
                self.warn(format!(
                    "Rune slot {slot} is out of range (1-{})",
                    SimConfig::RUNE_SLOTS
                ));
                None
            }
        }
    }
}
