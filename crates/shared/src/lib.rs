//! Shared types, errors, and configuration for Steward.
//!
//! This crate has no knowledge of storage or bookkeeping rules. It holds
//! the typed identifiers, money helpers, error classification, and runtime
//! configuration that every other crate builds on.

pub mod config;
pub mod error;
pub mod types;

pub use config::{CoreConfig, MatchingConfig};
pub use error::ErrorKind;
pub use types::{
    amounts_equal, round_money, AccountId, ActorId, FiscalPeriodId, LineMatchId, OrganizationId,
    StatementId, StatementLineId, TransactionId, VersionId, AMOUNT_EPSILON,
};
