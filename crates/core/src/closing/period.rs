//! Fiscal period lifecycle and date arithmetic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a fiscal period.
///
/// Periods move `Open -> Closed` at close and `Closed -> Open` on reopen.
/// `Closing` only exists inside an executing close batch; a committed store
/// never leaves a period in that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodStatus {
    /// Accepting transactions.
    Open,
    /// Close in progress.
    Closing,
    /// Closed; transactions dated inside the period are rejected.
    Closed,
}

impl PeriodStatus {
    /// Returns true when transactions may be dated inside the period.
    #[must_use]
    pub const fn allows_posting(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Returns true when two date ranges share at least one day.
///
/// Ranges are inclusive on both ends, matching how fiscal periods are
/// defined.
#[must_use]
pub fn periods_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// Returns true when `date` falls inside the inclusive period range.
#[must_use]
pub fn contains_date(start: NaiveDate, end: NaiveDate, date: NaiveDate) -> bool {
    date >= start && date <= end
}
