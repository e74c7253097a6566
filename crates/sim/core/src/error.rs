//! Common error infrastructure for sim-core.
//!
//! Domain errors (casting, rune spending) are defined here and share the
//! [`SimError`] trait so the rotation layer can decide how loudly to report
//! them.
//!
//! # Design Principles
//!
//! - **Type Safety**: each failing operation has its own error type
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Never fatal to a trial**: a failed cast leaves the simulation untouched

use crate::runes::RuneType;
use crate::spell::ActionId;
use crate::unit::UnitId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Temporary condition that may succeed at a later decision point.
    ///
    /// Examples: spell on cooldown, runes still regenerating
    Recoverable,

    /// Invalid input that will never succeed without a configuration change.
    ///
    /// Examples: unknown spell, unknown target
    Validation,

    /// Unexpected state inconsistency.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

/// Common trait for all sim-core errors.
pub trait SimError: std::fmt::Display + std::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, used in logs and tests.
    fn error_code(&self) -> &'static str;
}

/// Failure to spend runes from a rune bar.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuneError {
    #[error("not enough {rune_type} runes: need {needed}, have {available}")]
    Insufficient {
        rune_type: RuneType,
        needed: u8,
        available: u8,
    },
}

impl SimError for RuneError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Insufficient { .. } => "RUNE_INSUFFICIENT",
        }
    }
}

/// Failure to cast a spell.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CastError {
    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),

    #[error("{caster} does not know spell {spell}")]
    UnknownSpell { caster: UnitId, spell: ActionId },

    #[error("no target selected")]
    NoTarget,

    #[error("target {0} is not an enabled encounter target")]
    InvalidTarget(UnitId),

    #[error("{spell} is on cooldown for another {remaining:?}")]
    OnCooldown {
        spell: ActionId,
        remaining: std::time::Duration,
    },

    #[error("global cooldown active for another {0:?}")]
    GlobalCooldown(std::time::Duration),

    #[error("{caster} has no rune bar but {spell} costs runes")]
    NoRuneBar { caster: UnitId, spell: ActionId },

    #[error(transparent)]
    Runes(#[from] RuneError),
}

impl SimError for CastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownUnit(_) | Self::UnknownSpell { .. } | Self::NoRuneBar { .. } => {
                ErrorSeverity::Validation
            }
            Self::NoTarget | Self::InvalidTarget(_) => ErrorSeverity::Recoverable,
            Self::OnCooldown { .. } | Self::GlobalCooldown(_) => ErrorSeverity::Recoverable,
            Self::Runes(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownUnit(_) => "CAST_UNKNOWN_UNIT",
            Self::UnknownSpell { .. } => "CAST_UNKNOWN_SPELL",
            Self::NoTarget => "CAST_NO_TARGET",
            Self::InvalidTarget(_) => "CAST_INVALID_TARGET",
            Self::OnCooldown { .. } => "CAST_ON_COOLDOWN",
            Self::GlobalCooldown(_) => "CAST_GLOBAL_COOLDOWN",
            Self::NoRuneBar { .. } => "CAST_NO_RUNE_BAR",
            Self::Runes(inner) => inner.error_code(),
        }
    }
}
