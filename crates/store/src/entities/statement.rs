//! Bank statement and statement line entities.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use steward_core::reconcile::{LineStatus, StatementLineView};
use steward_shared::{AccountId, OrganizationId, StatementId, StatementLineId};

use crate::version::Entity;

/// Lifecycle of an imported statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementStatus {
    /// Lines are still being matched.
    InProgress,
    /// Reconciliation was completed; the statement is frozen.
    Completed,
}

/// An imported bank statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    /// Logical id, stable across versions.
    pub id: StatementId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Ledger account this statement reconciles against.
    pub account_id: AccountId,
    /// Display name, e.g. "Checking April 2026".
    pub name: String,
    /// Closing date of the period the statement covers.
    pub statement_date: NaiveDate,
    /// Reconciliation lifecycle state.
    pub status: StatementStatus,
}

impl Entity for Statement {
    type Id = StatementId;
    const NAME: &'static str = "statement";

    fn id(&self) -> StatementId {
        self.id
    }
}

/// One movement on an imported statement.
///
/// Amounts keep the bank's sign: inflows positive, outflows negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    /// Logical id, stable across versions.
    pub id: StatementLineId,
    /// Statement this line belongs to.
    pub statement_id: StatementId,
    /// Date the bank recorded the movement.
    pub date: NaiveDate,
    /// Free-text description from the bank.
    pub description: String,
    /// Bank reference number, if the import carried one.
    pub reference: Option<String>,
    /// Signed amount as imported.
    pub amount: Decimal,
    /// Matching lifecycle state.
    pub status: LineStatus,
}

impl StatementLine {
    /// Projects the line into the matcher's view shape.
    #[must_use]
    pub fn matcher_view(&self) -> StatementLineView {
        StatementLineView {
            id: self.id,
            amount: self.amount,
            date: self.date,
            reference: self.reference.clone(),
            description: self.description.clone(),
        }
    }
}

impl Entity for StatementLine {
    type Id = StatementLineId;
    const NAME: &'static str = "statement line";

    fn id(&self) -> StatementLineId {
        self.id
    }
}
