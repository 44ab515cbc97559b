//! Error classification shared by every Steward crate.
//!
//! Each crate defines its own `thiserror` enums close to the code that can
//! fail. Every one of those errors maps onto an [`ErrorKind`] so callers can
//! react to the class of failure without matching on module-specific
//! variants.

use serde::{Deserialize, Serialize};

/// Classification of Steward errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A referenced entity does not exist or has been deleted.
    NotFound,
    /// The operation is not permitted in the entity's current lifecycle state.
    InvalidState,
    /// Completing the operation would break a bookkeeping invariant.
    InvariantViolation,
    /// Required configuration is absent.
    ConfigurationMissing,
}

impl ErrorKind {
    /// Stable machine-readable code for logs and API payloads.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidState => "INVALID_STATE",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::ConfigurationMissing => "CONFIGURATION_MISSING",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
