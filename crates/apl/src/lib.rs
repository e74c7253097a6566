//! Action priority list (APL) evaluation.
//!
//! A rotation is an ordered list of `(condition, action)` entries written
//! as configuration ([`RotationConfig`]). This crate compiles that
//! configuration against a [`sim_core::Simulation`] into typed value nodes
//! and evaluates them at every decision point of a trial.
//!
//! # Modules
//!
//! - [`config`]: serialized rotation, value and action descriptions
//! - [`value`]: typed value nodes and the built-in node families
//! - [`catalog`]: expression kind → constructor registry
//! - [`reference`]: deferred handles to units and periodic effects
//! - [`rotation`]: priority evaluation and its state machine
//! - [`trial`]: running a rotation to the end of an encounter
//!
//! Configuration mistakes never abort a trial. They are collected in a
//! [`Diagnostics`] sink and the affected entry is skipped.
pub mod action;
pub mod catalog;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod reference;
pub mod rotation;
pub mod trial;
pub mod value;

pub use action::{ActionOutcome, AplAction, CastSpell, Wait};
pub use catalog::{ValueCatalog, ValueConstructor};
pub use config::{
    ActionConfig, CompareOp, ConstValue, ListItem, RotationConfig, UnitReference, ValueConfig,
};
pub use context::CompileContext;
pub use diagnostics::{Diagnostics, LogLevel, ValidationMessage};
pub use error::AplError;
pub use reference::{DotReference, UnitCell};
pub use rotation::{AplEntry, AplRotation, Decision, RotationState};
pub use trial::{TrialReport, run_trial};
pub use value::{AplValue, Evaluated, ValueNode, ValueType};
