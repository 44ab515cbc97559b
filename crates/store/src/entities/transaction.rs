//! Double-entry transaction entity.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use steward_core::ledger::TransactionKind;
use steward_core::reconcile::TransactionView;
use steward_shared::{AccountId, OrganizationId, TransactionId};

use crate::version::Entity;

/// A posted double-entry transaction.
///
/// The amount is always positive; direction is expressed entirely by
/// which account sits on the debit and credit leg. Voided transactions
/// stay in the ledger with `is_voided` set and their balance effects
/// reversed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Logical id, stable across versions.
    pub id: TransactionId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Business classification of the posting.
    pub kind: TransactionKind,
    /// Business date, checked against closed fiscal periods.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// External reference number, if any.
    pub reference: Option<String>,
    /// Positive amount moved between the two legs.
    pub amount: Decimal,
    /// Account debited.
    pub debit_account_id: AccountId,
    /// Account credited.
    pub credit_account_id: AccountId,
    /// Set once a completed reconciliation confirmed this transaction.
    pub is_reconciled: bool,
    /// Whether the transaction has been voided.
    pub is_voided: bool,
    /// Reason given when voiding.
    pub void_reason: Option<String>,
}

impl Transaction {
    /// Projects the transaction into the matcher's view shape.
    #[must_use]
    pub fn matcher_view(&self) -> TransactionView {
        TransactionView {
            id: self.id,
            amount: self.amount,
            date: self.date,
            reference: self.reference.clone(),
            description: self.description.clone(),
            is_reconciled: self.is_reconciled,
        }
    }
}

impl Entity for Transaction {
    type Id = TransactionId;
    const NAME: &'static str = "transaction";

    fn id(&self) -> TransactionId {
        self.id
    }
}
