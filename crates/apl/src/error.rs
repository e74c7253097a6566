//! Errors raised while compiling or evaluating a rotation.
//!
//! Most configuration problems are not errors: they become validation
//! messages in [`crate::Diagnostics`] and the offending node is skipped.
//! The variants here cover misuse that cannot be recovered from.

use sim_core::{ErrorSeverity, SimError, UnitId};

use crate::value::ValueType;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AplError {
    /// A node was requested as a kind it does not produce.
    #[error("`{description}` is a {found} value, expected {expected}")]
    KindMismatch {
        expected: ValueType,
        found: ValueType,
        description: String,
    },

    #[error("rotation caster {0} does not exist")]
    UnknownCaster(UnitId),
}

impl SimError for AplError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::KindMismatch { .. } => ErrorSeverity::Validation,
            Self::UnknownCaster(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::KindMismatch { .. } => "APL_KIND_MISMATCH",
            Self::UnknownCaster(_) => "APL_UNKNOWN_CASTER",
        }
    }
}
