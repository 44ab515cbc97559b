//! Organization registry entity.

use serde::{Deserialize, Serialize};
use steward_shared::{AccountId, OrganizationId};

use crate::version::Entity;

/// An organization owning a chart of accounts and its ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Logical id, stable across versions.
    pub id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Equity account that period closes settle into; must be configured
    /// before the first close.
    pub fund_balance_account_id: Option<AccountId>,
}

impl Entity for Organization {
    type Id = OrganizationId;
    const NAME: &'static str = "organization";

    fn id(&self) -> OrganizationId {
        self.id
    }
}
