//! Warnings shown to the user when the sync layer had to fall back to local
//! data.

use std::fmt::Display;

/// A dismissible warning describing why the local data may differ from the
/// server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncWarning {
    /// A short summary, e.g. "Could not load transactions from the server".
    pub message: String,
    /// The underlying error.
    pub details: String,
}

impl SyncWarning {
    /// Create a new warning.
    pub fn new(message: impl Into<String>, details: impl Display) -> Self {
        Self {
            message: message.into(),
            details: details.to_string(),
        }
    }
}

impl Display for SyncWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.details.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} ({})", self.message, self.details)
        }
    }
}
