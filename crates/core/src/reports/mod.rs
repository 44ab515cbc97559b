//! Balance reporting.
//!
//! Read-only aggregation over account snapshots: category totals, net
//! income, and the balance sheet equation check.

pub mod service;
pub mod types;

pub use service::summarize_accounts;
pub use types::BalanceSummary;
