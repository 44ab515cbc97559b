//! Fiscal period closing computation.
//!
//! This module computes the batch of closing entries that zero temporary
//! (revenue and expense) accounts into the fund balance account at period
//! end. Executing the batch, recording the created transactions, and
//! reversing them on reopen are the storage crate's job.

pub mod period;
pub mod plan;

#[cfg(test)]
mod plan_props;

pub use period::{contains_date, periods_overlap, PeriodStatus};
pub use plan::{plan_close, ClosingEntry, ClosingPreview};
