//! Reconciliation error types.

use rust_decimal::Decimal;
use steward_shared::ErrorKind;
use thiserror::Error;

/// Errors raised by match validation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A manual match request must carry at least one entry.
    #[error("Manual match request contains no entries")]
    NoEntries,

    /// Match amounts must be strictly positive.
    #[error("Match amount must be positive, got {0}")]
    NonPositiveMatchAmount(Decimal),

    /// The combined match total would exceed the line's amount.
    #[error("Matched total {attempted} exceeds statement line amount {line_amount}")]
    AmountExceedsLine {
        /// Absolute amount of the statement line.
        line_amount: Decimal,
        /// Total that the request would have produced.
        attempted: Decimal,
    },
}

impl ReconcileError {
    /// Maps this error onto the shared classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoEntries | Self::NonPositiveMatchAmount(_) | Self::AmountExceedsLine { .. } => {
                ErrorKind::InvariantViolation
            }
        }
    }
}
