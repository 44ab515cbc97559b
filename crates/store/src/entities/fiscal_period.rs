//! Fiscal period entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use steward_core::closing::PeriodStatus;
use steward_shared::{ActorId, FiscalPeriodId, OrganizationId, TransactionId};

use crate::version::Entity;

/// A fiscal period with inclusive date bounds.
///
/// Closing records the generated closing transactions so that a reopen
/// can void exactly those and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalPeriod {
    /// Logical id, stable across versions.
    pub id: FiscalPeriodId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Display name, e.g. "FY2026".
    pub name: String,
    /// First day of the period, inclusive.
    pub start_date: NaiveDate,
    /// Last day of the period, inclusive.
    pub end_date: NaiveDate,
    /// Lifecycle state.
    pub status: PeriodStatus,
    /// Closing transactions generated by the last close, in posting order.
    pub closing_transaction_ids: Vec<TransactionId>,
    /// When the period was last closed.
    pub closed_at: Option<DateTime<Utc>>,
    /// Who closed it.
    pub closed_by: Option<ActorId>,
}

impl FiscalPeriod {
    /// Returns true when `date` falls inside the period bounds.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        steward_core::closing::contains_date(self.start_date, self.end_date, date)
    }
}

impl Entity for FiscalPeriod {
    type Id = FiscalPeriodId;
    const NAME: &'static str = "fiscal period";

    fn id(&self) -> FiscalPeriodId {
        self.id
    }
}
