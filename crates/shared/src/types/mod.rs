//! Shared primitive types used across Steward crates.

pub mod id;
pub mod money;

pub use id::{
    AccountId, ActorId, FiscalPeriodId, LineMatchId, OrganizationId, StatementId,
    StatementLineId, TransactionId, VersionId,
};
pub use money::{amounts_equal, round_money, AMOUNT_EPSILON};
