//! Ledger error types.

use rust_decimal::Decimal;
use steward_shared::{AccountId, ErrorKind};
use thiserror::Error;

/// Errors raised by posting validation and balance arithmetic.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transaction amounts must be strictly positive.
    #[error("Posting amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// A posting must move money between two distinct accounts.
    #[error("Debit and credit account are the same: {0}")]
    SameAccount(AccountId),
}

impl LedgerError {
    /// Maps this error onto the shared classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NonPositiveAmount(_) | Self::SameAccount(_) => ErrorKind::InvariantViolation,
        }
    }
}
