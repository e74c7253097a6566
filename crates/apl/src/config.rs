//! Declarative rotation configuration.
//!
//! These types are the serialized form of a rotation. They carry no
//! behavior: [`crate::AplRotation::new`] compiles them into value nodes
//! and actions against a concrete simulation.

use serde::{Deserialize, Serialize};
use sim_core::{ActionId, RuneType};
use uuid::Uuid;

/// Which unit a value or action refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitReference {
    /// The rotation's own caster.
    Caster,
    /// Whatever the caster is targeting when the value is evaluated.
    #[default]
    CurrentTarget,
    /// Fixed encounter target by roster index.
    Target(usize),
}

/// Literal value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConstValue {
    Bool(bool),
    Int(i32),
    Float(f64),
    /// Duration in seconds.
    Duration(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum CompareOp {
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
}

impl CompareOp {
    pub fn compare<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
        }
    }
}

/// Serialized value node.
///
/// The variant name is the catalog key used to look up the node
/// constructor (see [`crate::ValueCatalog`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, strum::IntoStaticStr)]
pub enum ValueConfig {
    // ------------------------------------------------------------------------
    // Logic and constants
    // ------------------------------------------------------------------------
    Const(ConstValue),
    And(Vec<ValueConfig>),
    Or(Vec<ValueConfig>),
    Not(Box<ValueConfig>),
    Cmp {
        op: CompareOp,
        lhs: Box<ValueConfig>,
        rhs: Box<ValueConfig>,
    },

    // ------------------------------------------------------------------------
    // Encounter
    // ------------------------------------------------------------------------
    CurrentTime,
    RemainingTime,
    NumberTargets,

    // ------------------------------------------------------------------------
    // Periodic effects
    // ------------------------------------------------------------------------
    DotIsActive {
        spell_id: ActionId,
        #[serde(default)]
        target: UnitReference,
    },
    DotIsActiveOnAllTargets {
        spell_id: ActionId,
    },
    DotRemainingTime {
        spell_id: ActionId,
        #[serde(default)]
        target: UnitReference,
    },
    DotLowestRemainingTime {
        spell_id: ActionId,
    },
    DotTickFrequency {
        spell_id: ActionId,
        #[serde(default)]
        target: UnitReference,
    },
    DotPercentIncrease {
        spell_id: ActionId,
        #[serde(default)]
        target: UnitReference,
    },
    DotCritPercentIncrease {
        spell_id: ActionId,
        #[serde(default)]
        target: UnitReference,
    },
    DotTickRatePercentIncrease {
        spell_id: ActionId,
        #[serde(default)]
        target: UnitReference,
    },

    // ------------------------------------------------------------------------
    // Runes (slots are 1-based, 0 means unset)
    // ------------------------------------------------------------------------
    CurrentRuneCount {
        rune_type: RuneType,
    },
    CurrentNonDeathRuneCount {
        rune_type: RuneType,
    },
    CurrentRuneActive {
        rune_slot: u8,
    },
    CurrentRuneDeath {
        rune_slot: u8,
    },
    RuneCooldown {
        rune_type: RuneType,
    },
    NextRuneCooldown {
        rune_type: RuneType,
    },
    RuneSlotCooldown {
        rune_slot: u8,
    },
    FullRuneCooldown {
        #[serde(default)]
        use_base_value: bool,
    },
}

impl ValueConfig {
    /// Catalog key of this node.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// Serialized action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionConfig {
    CastSpell {
        spell_id: ActionId,
        #[serde(default)]
        target: UnitReference,
    },
    /// Idle for the given number of seconds.
    Wait { secs: f64 },
}

/// One priority list entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Identifier attached to validation messages about this entry.
    #[serde(default)]
    pub uuid: Option<Uuid>,
    /// Hidden entries are kept in the file but never compiled.
    #[serde(default)]
    pub hide: bool,
    /// Entry is unconditional when absent.
    #[serde(default)]
    pub condition: Option<ValueConfig>,
    pub action: ActionConfig,
}

impl ListItem {
    pub fn new(action: ActionConfig) -> Self {
        Self {
            uuid: None,
            hide: false,
            condition: None,
            action,
        }
    }

    pub fn when(mut self, condition: ValueConfig) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }
}

/// Complete rotation: an ordered priority list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationConfig {
    pub priority_list: Vec<ListItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_variant_name() {
        let config = ValueConfig::DotLowestRemainingTime {
            spell_id: ActionId(55078),
        };
        assert_eq!(config.kind(), "DotLowestRemainingTime");
        assert_eq!(ValueConfig::CurrentTime.kind(), "CurrentTime");
    }

    #[test]
    fn parses_rotation_from_ron() {
        let text = r#"(
            priority_list: [
                (
                    condition: Some(Not(DotIsActive(spell_id: 55078))),
                    action: CastSpell(spell_id: 55078),
                ),
                (
                    hide: true,
                    action: Wait(secs: 0.5),
                ),
                (
                    condition: Some(Cmp(
                        op: Gt,
                        lhs: CurrentRuneCount(rune_type: Frost),
                        rhs: Const(Int(0)),
                    )),
                    action: CastSpell(spell_id: 49020, target: Target(1)),
                ),
            ],
        )"#;
        let config: RotationConfig = ron::from_str(text).unwrap();

        assert_eq!(config.priority_list.len(), 3);
        assert!(config.priority_list[1].hide);
        assert_eq!(
            config.priority_list[0].condition,
            Some(ValueConfig::Not(Box::new(ValueConfig::DotIsActive {
                spell_id: ActionId(55078),
                target: UnitReference::CurrentTarget,
            })))
        );
        assert_eq!(
            config.priority_list[2].action,
            ActionConfig::CastSpell {
                spell_id: ActionId(49020),
                target: UnitReference::Target(1),
            }
        );
    }

    #[test]
    fn compare_ops() {
        assert!(CompareOp::Lt.compare(1, 2));
        assert!(CompareOp::Ge.compare(2.0, 2.0));
        assert!(!CompareOp::Ne.compare(3, 3));
        assert_eq!(CompareOp::Le.to_string(), "<=");
    }
}
