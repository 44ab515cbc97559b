//! Organization registry operations.

use chrono::Utc;
use steward_core::ledger::AccountCategory;
use steward_shared::{AccountId, ActorId, ErrorKind, OrganizationId};
use thiserror::Error;
use tracing::info;

use crate::entities::Organization;
use crate::error::StoreError;
use crate::store::{LedgerStore, StoreInner};
use crate::version::Versioned;

/// Error types for organization operations.
#[derive(Debug, Error)]
pub enum OrganizationError {
    /// No fund balance account has been configured yet.
    #[error("organization {0} has no fund balance account configured")]
    FundBalanceNotConfigured(OrganizationId),

    /// The chosen fund balance account is not an equity account.
    #[error("account '{account_code}' cannot hold the fund balance, only equity accounts can")]
    FundBalanceNotEquity {
        /// Code of the rejected account.
        account_code: String,
    },

    /// The chosen account belongs to a different organization.
    #[error("account {0} belongs to a different organization")]
    ForeignAccount(AccountId),

    /// Underlying storage error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OrganizationError {
    /// Maps the error onto the shared taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::FundBalanceNotConfigured(_) => ErrorKind::ConfigurationMissing,
            Self::FundBalanceNotEquity { .. } | Self::ForeignAccount(_) => {
                ErrorKind::InvariantViolation
            }
            Self::Store(err) => err.kind(),
        }
    }
}

/// Repository for the organization registry.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    store: LedgerStore,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Registers a new organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the generated id collides with an existing one.
    pub fn create(
        &self,
        name: &str,
        actor: ActorId,
    ) -> Result<Versioned<Organization>, OrganizationError> {
        let organization = Organization {
            id: OrganizationId::new(),
            name: name.to_string(),
            fund_balance_account_id: None,
        };
        let created = self.store.transact(|inner| {
            inner
                .organizations
                .insert_first(organization, actor, Utc::now())
                .map(Clone::clone)
                .map_err(OrganizationError::from)
        })?;
        info!(organization_id = %created.entity.id, name = %created.entity.name, "Created organization");
        Ok(created)
    }

    /// Finds the current version of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization does not exist.
    pub fn find(&self, id: OrganizationId) -> Result<Versioned<Organization>, OrganizationError> {
        self.store.read(|inner| {
            inner
                .organizations
                .require_current(id)
                .map(Clone::clone)
                .map_err(OrganizationError::from)
        })
    }

    /// Designates the equity account that period closes settle into.
    ///
    /// # Errors
    ///
    /// Returns an error if either record is missing, if the account
    /// belongs to another organization, or if it is not an equity account.
    pub fn set_fund_balance_account(
        &self,
        organization_id: OrganizationId,
        account_id: AccountId,
        actor: ActorId,
    ) -> Result<Versioned<Organization>, OrganizationError> {
        let updated = self.store.transact(|inner| {
            let account = inner.accounts.require_current(account_id)?.entity.clone();
            if account.organization_id != organization_id {
                return Err(OrganizationError::ForeignAccount(account_id));
            }
            if account.category != AccountCategory::Equity {
                return Err(OrganizationError::FundBalanceNotEquity {
                    account_code: account.code,
                });
            }
            let version = inner
                .organizations
                .update(organization_id, actor, Utc::now(), |org| {
                    org.fund_balance_account_id = Some(account_id);
                })?;
            Ok(version.clone())
        })?;
        info!(
            organization_id = %organization_id,
            fund_balance_account_id = %account_id,
            "Configured fund balance account"
        );
        Ok(updated)
    }
}

/// Resolves the configured fund balance account inside a transaction.
pub(crate) fn fund_balance_account_id_in(
    inner: &StoreInner,
    organization_id: OrganizationId,
) -> Result<AccountId, OrganizationError> {
    let organization = inner.organizations.require_current(organization_id)?;
    organization
        .entity
        .fund_balance_account_id
        .ok_or(OrganizationError::FundBalanceNotConfigured(organization_id))
}
