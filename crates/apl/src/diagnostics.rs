//! Validation messages collected while compiling a rotation.
//!
//! A [`Diagnostics`] sink is owned by whoever builds the rotation and is
//! passed in explicitly, one per trial. Nothing is shared between trials.

use std::fmt;

use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// One message about a priority list entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationMessage {
    pub level: LogLevel,
    /// Entry the message belongs to, if the entry has an id.
    pub entry: Option<Uuid>,
    pub message: String,
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry {
            Some(uuid) => write!(f, "[{}] {}: {}", self.level, uuid, self.message),
            None => write!(f, "[{}] {}", self.level, self.message),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    messages: Vec<ValidationMessage>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message and mirrors it to the tracing subscriber.
    pub fn push(&mut self, level: LogLevel, entry: Option<Uuid>, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Info => info!(entry = ?entry, "{message}"),
            LogLevel::Warning | LogLevel::Error => warn!(entry = ?entry, %level, "{message}"),
        }
        self.messages.push(ValidationMessage {
            level,
            entry,
            message,
        });
    }

    pub fn warn(&mut self, entry: Option<Uuid>, message: impl Into<String>) {
        self.push(LogLevel::Warning, entry, message);
    }

    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.messages
            .iter()
            .filter(|m| m.level == LogLevel::Warning)
    }

    pub fn for_entry(&self, uuid: Uuid) -> impl Iterator<Item = &ValidationMessage> {
        self.messages
            .iter()
            .filter(move |m| m.entry == Some(uuid))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<ValidationMessage> {
        self.messages
    }
}
