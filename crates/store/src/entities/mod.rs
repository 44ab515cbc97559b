//! Versioned entity payloads.
//!
//! Each payload carries only business fields; temporal bookkeeping lives
//! on the [`Versioned`](crate::version::Versioned) wrapper.

pub mod account;
pub mod fiscal_period;
pub mod line_match;
pub mod organization;
pub mod statement;
pub mod transaction;

pub use account::Account;
pub use fiscal_period::FiscalPeriod;
pub use line_match::LineMatch;
pub use organization::Organization;
pub use statement::{Statement, StatementLine, StatementStatus};
pub use transaction::Transaction;
