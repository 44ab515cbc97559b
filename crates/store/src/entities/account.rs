//! Chart-of-accounts entity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use steward_core::ledger::{AccountCategory, AccountSnapshot};
use steward_shared::{AccountId, OrganizationId};

use crate::version::Entity;

/// One account in an organization's chart.
///
/// The `balance` field is a cached running balance maintained by the
/// posting path; it always reflects every non-voided transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Logical id, stable across versions.
    pub id: AccountId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Account code, unique among the organization's live accounts.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Classification driving the balance sign rule.
    pub category: AccountCategory,
    /// Cached running balance.
    pub balance: Decimal,
    /// Optional parent; must share this account's category.
    pub parent_account_id: Option<AccountId>,
    /// Inactive accounts reject new postings and are skipped by closes.
    pub is_active: bool,
}

impl Account {
    /// Projects the account into the pure-logic snapshot shape.
    #[must_use]
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
            category: self.category,
            balance: self.balance,
            is_active: self.is_active,
        }
    }
}

impl Entity for Account {
    type Id = AccountId;
    const NAME: &'static str = "account";

    fn id(&self) -> AccountId {
        self.id
    }
}
