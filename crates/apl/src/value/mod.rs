//! Typed value nodes.
//!
//! A value node is a small, immutable query over the simulation state.
//! Each node produces exactly one [`ValueType`], fixed when it is built:
//! the kind is part of the node's Rust type ([`ValueNode<bool>`],
//! [`ValueNode<Duration>`], ...) and [`AplValue`] records which one a
//! compiled node is. Asking a node for a kind it does not produce is a
//! compile-time [`AplError::KindMismatch`], never a runtime surprise.
//!
//! Nodes hold identities (unit ids, spell ids), not borrowed state, and
//! re-read everything they need from the [`Simulation`] on every call.

use std::fmt;
use std::time::Duration;

use sim_core::Simulation;

use crate::error::AplError;

pub mod dot;
pub mod logic;
pub mod runes;

/// Value kinds a node can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Duration,
}

/// A query that produces a `T` from the current simulation state.
///
/// Evaluation never mutates anything and never fails: when the state a
/// node looks at is missing, it returns the neutral value of its kind.
pub trait ValueNode<T>: fmt::Display + Send + Sync {
    fn evaluate(&self, sim: &Simulation) -> T;
}

pub type BoolNode = Box<dyn ValueNode<bool>>;
pub type IntNode = Box<dyn ValueNode<i32>>;
pub type FloatNode = Box<dyn ValueNode<f64>>;
pub type DurationNode = Box<dyn ValueNode<Duration>>;

/// A compiled node tagged with the kind it produces.
pub enum AplValue {
    Bool(BoolNode),
    Int(IntNode),
    Float(FloatNode),
    Duration(DurationNode),
}

/// Result of evaluating an [`AplValue`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Evaluated {
    Bool(bool),
    Int(i32),
    Float(f64),
    Duration(Duration),
}

impl Evaluated {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
            Self::Duration(_) => ValueType::Duration,
        }
    }
}

impl fmt::Display for Evaluated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.3}"),
            Self::Duration(v) => write!(f, "{:.3}s", v.as_secs_f64()),
        }
    }
}

impl AplValue {
    pub fn bool(node: impl ValueNode<bool> + 'static) -> Self {
        Self::Bool(Box::new(node))
    }

    pub fn int(node: impl ValueNode<i32> + 'static) -> Self {
        Self::Int(Box::new(node))
    }

    pub fn float(node: impl ValueNode<f64> + 'static) -> Self {
        Self::Float(Box::new(node))
    }

    pub fn duration(node: impl ValueNode<Duration> + 'static) -> Self {
        Self::Duration(Box::new(node))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
            Self::Duration(_) => ValueType::Duration,
        }
    }

    /// Evaluates the node with its own kind.
    pub fn evaluate(&self, sim: &Simulation) -> Evaluated {
        match self {
            Self::Bool(node) => Evaluated::Bool(node.evaluate(sim)),
            Self::Int(node) => Evaluated::Int(node.evaluate(sim)),
            Self::Float(node) => Evaluated::Float(node.evaluate(sim)),
            Self::Duration(node) => Evaluated::Duration(node.evaluate(sim)),
        }
    }

    pub fn into_bool(self) -> Result<BoolNode, AplError> {
        match self {
            Self::Bool(node) => Ok(node),
            other => Err(other.mismatch(ValueType::Bool)),
        }
    }

    pub fn into_int(self) -> Result<IntNode, AplError> {
        match self {
            Self::Int(node) => Ok(node),
            other => Err(other.mismatch(ValueType::Int)),
        }
    }

    pub fn into_float(self) -> Result<FloatNode, AplError> {
        match self {
            Self::Float(node) => Ok(node),
            other => Err(other.mismatch(ValueType::Float)),
        }
    }

    pub fn into_duration(self) -> Result<DurationNode, AplError> {
        match self {
            Self::Duration(node) => Ok(node),
            other => Err(other.mismatch(ValueType::Duration)),
        }
    }

    fn mismatch(&self, expected: ValueType) -> AplError {
        AplError::KindMismatch {
            expected,
            found: self.value_type(),
            description: self.to_string(),
        }
    }
}

impl fmt::Display for AplValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(node) => fmt::Display::fmt(node, f),
            Self::Int(node) => fmt::Display::fmt(node, f),
            Self::Float(node) => fmt::Display::fmt(node, f),
            Self::Duration(node) => fmt::Display::fmt(node, f),
        }
    }
}

impl fmt::Debug for AplValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AplValue::{}({})", self.value_type(), self)
    }
}
