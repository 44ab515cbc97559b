//! Chart of accounts operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use steward_core::ledger::{apply_posting, reverse_posting, AccountCategory};
use steward_shared::{AccountId, ActorId, ErrorKind, OrganizationId};
use thiserror::Error;
use tracing::info;

use crate::entities::Account;
use crate::error::StoreError;
use crate::store::{LedgerStore, StoreInner};
use crate::version::Versioned;

/// Error types for account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account code already exists in the organization.
    #[error("account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent account not found.
    #[error("parent account not found: {0}")]
    ParentNotFound(AccountId),

    /// Parent account belongs to a different organization.
    #[error("parent account belongs to a different organization")]
    ParentWrongOrganization,

    /// Parent account has a different category.
    #[error("parent account '{parent_code}' has a different category")]
    ParentCategoryMismatch {
        /// Code of the rejected parent.
        parent_code: String,
    },

    /// An account cannot be its own parent.
    #[error("account {0} cannot be its own parent")]
    OwnParent(AccountId),

    /// Cannot delete an account that still carries a balance.
    #[error("account '{code}' still has balance {balance}")]
    BalanceNotZero {
        /// Account code.
        code: String,
        /// Remaining balance.
        balance: Decimal,
    },

    /// Cannot delete an account referenced by live transactions.
    #[error("account '{0}' is referenced by transactions")]
    HasTransactions(String),

    /// Underlying storage error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccountError {
    /// Maps the error onto the shared taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateCode(_)
            | Self::ParentWrongOrganization
            | Self::ParentCategoryMismatch { .. }
            | Self::OwnParent(_)
            | Self::BalanceNotZero { .. }
            | Self::HasTransactions(_) => ErrorKind::InvariantViolation,
            Self::ParentNotFound(_) => ErrorKind::NotFound,
            Self::Store(err) => err.kind(),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Account code, unique among the organization's live accounts.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Account classification.
    pub category: AccountCategory,
    /// Optional parent for hierarchical charts; must share the category.
    pub parent_account_id: Option<AccountId>,
    /// Whether the account accepts postings right away.
    pub is_active: bool,
}

/// Input for updating an account.
///
/// `None` leaves a field untouched; the double `Option` on description
/// and parent distinguishes "leave as is" from "clear the value".
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New account code.
    pub code: Option<String>,
    /// New account name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New parent account.
    pub parent_account_id: Option<Option<AccountId>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Keep only accounts of this category.
    pub category: Option<AccountCategory>,
    /// Keep only accounts with this active flag.
    pub is_active: Option<bool>,
    /// Keep only children of this parent (`Some(None)` = root accounts).
    pub parent_account_id: Option<Option<AccountId>>,
}

impl AccountFilter {
    fn matches(&self, account: &Account) -> bool {
        self.category.is_none_or(|category| account.category == category)
            && self.is_active.is_none_or(|active| account.is_active == active)
            && self
                .parent_account_id
                .is_none_or(|parent| account.parent_account_id == parent)
    }
}

/// Repository for chart of accounts management.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    store: LedgerStore,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Creates an account with a zero opening balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization is missing, the code is
    /// already used, or parent validation fails.
    pub fn create(
        &self,
        input: CreateAccountInput,
        actor: ActorId,
    ) -> Result<Versioned<Account>, AccountError> {
        let created = self.store.transact(|inner| {
            inner.organizations.require_current(input.organization_id)?;
            validate_code_unique_in(inner, input.organization_id, &input.code, None)?;
            if let Some(parent_id) = input.parent_account_id {
                validate_parent_in(inner, input.organization_id, input.category, parent_id)?;
            }

            let account = Account {
                id: AccountId::new(),
                organization_id: input.organization_id,
                code: input.code.clone(),
                name: input.name.clone(),
                description: input.description.clone(),
                category: input.category,
                balance: Decimal::ZERO,
                parent_account_id: input.parent_account_id,
                is_active: input.is_active,
            };
            inner
                .accounts
                .insert_first(account, actor, Utc::now())
                .map(Clone::clone)
                .map_err(AccountError::from)
        })?;
        info!(
            account_id = %created.entity.id,
            code = %created.entity.code,
            "Created account"
        );
        Ok(created)
    }

    /// Finds the current version of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or was deleted.
    pub fn find(&self, id: AccountId) -> Result<Versioned<Account>, AccountError> {
        self.store.read(|inner| {
            inner
                .accounts
                .require_current(id)
                .map(Clone::clone)
                .map_err(AccountError::from)
        })
    }

    /// Lists an organization's live accounts in code order.
    #[must_use]
    pub fn list(
        &self,
        organization_id: OrganizationId,
        filter: AccountFilter,
    ) -> Vec<Versioned<Account>> {
        self.store.read(|inner| {
            let mut accounts: Vec<Versioned<Account>> = inner
                .accounts
                .current_all()
                .filter(|version| {
                    version.entity.organization_id == organization_id
                        && filter.matches(&version.entity)
                })
                .cloned()
                .collect();
            accounts.sort_by(|a, b| a.entity.code.cmp(&b.entity.code));
            accounts
        })
    }

    /// Updates an account's descriptive fields.
    ///
    /// The cached balance is never writable through this path; it only
    /// moves when transactions post or are voided.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing, the new code is
    /// already used, or parent validation fails.
    pub fn update(
        &self,
        id: AccountId,
        input: UpdateAccountInput,
        actor: ActorId,
    ) -> Result<Versioned<Account>, AccountError> {
        let updated = self.store.transact(|inner| {
            let current = inner.accounts.require_current(id)?.entity.clone();

            if let Some(new_code) = &input.code
                && *new_code != current.code
            {
                validate_code_unique_in(inner, current.organization_id, new_code, Some(id))?;
            }
            if let Some(Some(parent_id)) = input.parent_account_id {
                if parent_id == id {
                    return Err(AccountError::OwnParent(id));
                }
                validate_parent_in(inner, current.organization_id, current.category, parent_id)?;
            }

            let version = inner.accounts.update(id, actor, Utc::now(), |account| {
                if let Some(code) = input.code {
                    account.code = code;
                }
                if let Some(name) = input.name {
                    account.name = name;
                }
                if let Some(description) = input.description {
                    account.description = description;
                }
                if let Some(parent) = input.parent_account_id {
                    account.parent_account_id = parent;
                }
                if let Some(is_active) = input.is_active {
                    account.is_active = is_active;
                }
            })?;
            Ok(version.clone())
        })?;
        info!(account_id = %id, "Updated account");
        Ok(updated)
    }

    /// Deactivates an account so it rejects further postings.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist.
    pub fn deactivate(
        &self,
        id: AccountId,
        actor: ActorId,
    ) -> Result<Versioned<Account>, AccountError> {
        let input = UpdateAccountInput {
            is_active: Some(false),
            ..UpdateAccountInput::default()
        };
        self.update(id, input, actor)
    }

    /// Soft-deletes an account, keeping its full history.
    ///
    /// # Errors
    ///
    /// Returns an error if the account carries a balance or is still
    /// referenced by live transactions.
    pub fn soft_delete(&self, id: AccountId, actor: ActorId) -> Result<(), AccountError> {
        self.store.transact(|inner| {
            let current = inner.accounts.require_current(id)?.entity.clone();
            if current.balance != Decimal::ZERO {
                return Err(AccountError::BalanceNotZero {
                    code: current.code,
                    balance: current.balance,
                });
            }
            let referenced = inner.transactions.current_all().any(|version| {
                version.entity.debit_account_id == id || version.entity.credit_account_id == id
            });
            if referenced {
                return Err(AccountError::HasTransactions(current.code));
            }
            inner.accounts.soft_delete(id, actor, Utc::now())?;
            Ok(())
        })?;
        info!(account_id = %id, "Soft-deleted account");
        Ok(())
    }

    /// Returns the version of an account that was business-effective at
    /// the given instant, if any.
    #[must_use]
    pub fn find_as_of(&self, id: AccountId, at: DateTime<Utc>) -> Option<Versioned<Account>> {
        self.store
            .read(|inner| inner.accounts.as_of(id, at).cloned())
    }

    /// Returns the full version history of an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if no record ever existed for the id.
    pub fn history(&self, id: AccountId) -> Result<Vec<Versioned<Account>>, AccountError> {
        self.store.read(|inner| {
            inner
                .accounts
                .history(id)
                .map(|versions| versions.into_iter().cloned().collect())
                .map_err(AccountError::from)
        })
    }
}

fn validate_code_unique_in(
    inner: &StoreInner,
    organization_id: OrganizationId,
    code: &str,
    exclude: Option<AccountId>,
) -> Result<(), AccountError> {
    let taken = inner.accounts.current_all().any(|version| {
        version.entity.organization_id == organization_id
            && version.entity.code == code
            && Some(version.entity.id) != exclude
    });
    if taken {
        return Err(AccountError::DuplicateCode(code.to_string()));
    }
    Ok(())
}

fn validate_parent_in(
    inner: &StoreInner,
    organization_id: OrganizationId,
    category: AccountCategory,
    parent_id: AccountId,
) -> Result<(), AccountError> {
    let parent = inner
        .accounts
        .current(parent_id)
        .ok_or(AccountError::ParentNotFound(parent_id))?;
    if parent.entity.organization_id != organization_id {
        return Err(AccountError::ParentWrongOrganization);
    }
    if parent.entity.category != category {
        return Err(AccountError::ParentCategoryMismatch {
            parent_code: parent.entity.code.clone(),
        });
    }
    Ok(())
}

/// Applies one posting's balance effects to both accounts.
///
/// Each account gets a new version; the pair belongs inside the same
/// transaction as the posting that caused it.
pub(crate) fn apply_balances_in(
    inner: &mut StoreInner,
    debit_account_id: AccountId,
    credit_account_id: AccountId,
    amount: Decimal,
    actor: ActorId,
    now: DateTime<Utc>,
) -> Result<(), AccountError> {
    let debit = inner.accounts.require_current(debit_account_id)?.entity.clone();
    let credit = inner
        .accounts
        .require_current(credit_account_id)?
        .entity
        .clone();

    let posted = apply_posting(
        debit.balance,
        debit.category,
        credit.balance,
        credit.category,
        amount,
    );
    inner.accounts.update(debit_account_id, actor, now, |account| {
        account.balance = posted.debit_balance;
    })?;
    inner.accounts.update(credit_account_id, actor, now, |account| {
        account.balance = posted.credit_balance;
    })?;
    Ok(())
}

/// Reverses one posting's balance effects on both accounts.
pub(crate) fn reverse_balances_in(
    inner: &mut StoreInner,
    debit_account_id: AccountId,
    credit_account_id: AccountId,
    amount: Decimal,
    actor: ActorId,
    now: DateTime<Utc>,
) -> Result<(), AccountError> {
    let debit = inner.accounts.require_current(debit_account_id)?.entity.clone();
    let credit = inner
        .accounts
        .require_current(credit_account_id)?
        .entity
        .clone();

    let reversed = reverse_posting(
        debit.balance,
        debit.category,
        credit.balance,
        credit.category,
        amount,
    );
    inner.accounts.update(debit_account_id, actor, now, |account| {
        account.balance = reversed.debit_balance;
    })?;
    inner.accounts.update(credit_account_id, actor, now, |account| {
        account.balance = reversed.credit_balance;
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::organization::OrganizationRepository;
    use rust_decimal_macros::dec;

    fn setup() -> (LedgerStore, AccountRepository, OrganizationId, ActorId) {
        let store = LedgerStore::new();
        let actor = ActorId::new();
        let org = OrganizationRepository::new(store.clone())
            .create("Riverside Youth Club", actor)
            .unwrap()
            .entity;
        (store.clone(), AccountRepository::new(store), org.id, actor)
    }

    fn input(
        organization_id: OrganizationId,
        code: &str,
        category: AccountCategory,
    ) -> CreateAccountInput {
        CreateAccountInput {
            organization_id,
            code: code.to_string(),
            name: format!("Account {code}"),
            description: None,
            category,
            parent_account_id: None,
            is_active: true,
        }
    }

    #[test]
    fn test_create_rejects_duplicate_code() {
        let (_, repo, org, actor) = setup();
        repo.create(input(org, "1000", AccountCategory::Asset), actor)
            .unwrap();

        let err = repo
            .create(input(org, "1000", AccountCategory::Expense), actor)
            .unwrap_err();
        assert!(matches!(err, AccountError::DuplicateCode(_)));
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    }

    #[test]
    fn test_parent_must_share_category() {
        let (_, repo, org, actor) = setup();
        let parent = repo
            .create(input(org, "1000", AccountCategory::Asset), actor)
            .unwrap()
            .entity;

        let mut child = input(org, "5100", AccountCategory::Expense);
        child.parent_account_id = Some(parent.id);
        let err = repo.create(child, actor).unwrap_err();
        assert!(matches!(err, AccountError::ParentCategoryMismatch { .. }));

        let mut sibling = input(org, "1010", AccountCategory::Asset);
        sibling.parent_account_id = Some(parent.id);
        let created = repo.create(sibling, actor).unwrap();
        assert_eq!(created.entity.parent_account_id, Some(parent.id));
    }

    #[test]
    fn test_update_code_uniqueness_excludes_self() {
        let (_, repo, org, actor) = setup();
        let account = repo
            .create(input(org, "1000", AccountCategory::Asset), actor)
            .unwrap()
            .entity;
        repo.create(input(org, "2000", AccountCategory::Liability), actor)
            .unwrap();

        // Re-submitting the same code is a no-op, not a conflict.
        let same = UpdateAccountInput {
            code: Some("1000".to_string()),
            ..UpdateAccountInput::default()
        };
        repo.update(account.id, same, actor).unwrap();

        let clash = UpdateAccountInput {
            code: Some("2000".to_string()),
            ..UpdateAccountInput::default()
        };
        let err = repo.update(account.id, clash, actor).unwrap_err();
        assert!(matches!(err, AccountError::DuplicateCode(_)));
    }

    #[test]
    fn test_update_description_distinguishes_clear_from_keep() {
        let (_, repo, org, actor) = setup();
        let mut create = input(org, "1000", AccountCategory::Asset);
        create.description = Some("Till float".to_string());
        let account = repo.create(create, actor).unwrap().entity;

        let keep = UpdateAccountInput {
            name: Some("Cash Drawer".to_string()),
            ..UpdateAccountInput::default()
        };
        let kept = repo.update(account.id, keep, actor).unwrap();
        assert_eq!(kept.entity.description.as_deref(), Some("Till float"));

        let clear = UpdateAccountInput {
            description: Some(None),
            ..UpdateAccountInput::default()
        };
        let cleared = repo.update(account.id, clear, actor).unwrap();
        assert_eq!(cleared.entity.description, None);
    }

    #[test]
    fn test_update_rejects_self_parent() {
        let (_, repo, org, actor) = setup();
        let account = repo
            .create(input(org, "1000", AccountCategory::Asset), actor)
            .unwrap()
            .entity;

        let update = UpdateAccountInput {
            parent_account_id: Some(Some(account.id)),
            ..UpdateAccountInput::default()
        };
        let err = repo.update(account.id, update, actor).unwrap_err();
        assert!(matches!(err, AccountError::OwnParent(_)));
    }

    #[test]
    fn test_list_orders_by_code() {
        let (_, repo, org, actor) = setup();
        repo.create(input(org, "5000", AccountCategory::Expense), actor)
            .unwrap();
        repo.create(input(org, "1000", AccountCategory::Asset), actor)
            .unwrap();
        repo.create(input(org, "4000", AccountCategory::Revenue), actor)
            .unwrap();

        let codes: Vec<String> = repo
            .list(org, AccountFilter::default())
            .into_iter()
            .map(|v| v.entity.code)
            .collect();
        assert_eq!(codes, vec!["1000", "4000", "5000"]);
    }

    #[test]
    fn test_list_applies_category_and_active_filters() {
        let (_, repo, org, actor) = setup();
        repo.create(input(org, "1000", AccountCategory::Asset), actor)
            .unwrap();
        let dues = repo
            .create(input(org, "4000", AccountCategory::Revenue), actor)
            .unwrap()
            .entity;
        repo.create(input(org, "4100", AccountCategory::Revenue), actor)
            .unwrap();
        repo.deactivate(dues.id, actor).unwrap();

        let revenue = repo.list(
            org,
            AccountFilter {
                category: Some(AccountCategory::Revenue),
                ..AccountFilter::default()
            },
        );
        assert_eq!(revenue.len(), 2);

        let live_revenue = repo.list(
            org,
            AccountFilter {
                category: Some(AccountCategory::Revenue),
                is_active: Some(true),
                ..AccountFilter::default()
            },
        );
        assert_eq!(live_revenue.len(), 1);
        assert_eq!(live_revenue[0].entity.code, "4100");
    }

    #[test]
    fn test_list_filters_by_parent() {
        let (_, repo, org, actor) = setup();
        let parent = repo
            .create(input(org, "1000", AccountCategory::Asset), actor)
            .unwrap()
            .entity;
        let mut child = input(org, "1010", AccountCategory::Asset);
        child.parent_account_id = Some(parent.id);
        repo.create(child, actor).unwrap();

        let children = repo.list(
            org,
            AccountFilter {
                parent_account_id: Some(Some(parent.id)),
                ..AccountFilter::default()
            },
        );
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].entity.code, "1010");

        let roots = repo.list(
            org,
            AccountFilter {
                parent_account_id: Some(None),
                ..AccountFilter::default()
            },
        );
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].entity.code, "1000");
    }

    #[test]
    fn test_apply_then_reverse_restores_balances() {
        let (store, repo, org, actor) = setup();
        let cash = repo
            .create(input(org, "1000", AccountCategory::Asset), actor)
            .unwrap()
            .entity;
        let dues = repo
            .create(input(org, "4000", AccountCategory::Revenue), actor)
            .unwrap()
            .entity;

        store
            .transact(|inner| {
                apply_balances_in(inner, cash.id, dues.id, dec!(250), actor, Utc::now())
            })
            .unwrap();
        assert_eq!(repo.find(cash.id).unwrap().entity.balance, dec!(250));
        assert_eq!(repo.find(dues.id).unwrap().entity.balance, dec!(250));

        store
            .transact(|inner| {
                reverse_balances_in(inner, cash.id, dues.id, dec!(250), actor, Utc::now())
            })
            .unwrap();
        assert_eq!(repo.find(cash.id).unwrap().entity.balance, Decimal::ZERO);
        assert_eq!(repo.find(dues.id).unwrap().entity.balance, Decimal::ZERO);
    }

    #[test]
    fn test_soft_delete_requires_zero_balance() {
        let (store, repo, org, actor) = setup();
        let cash = repo
            .create(input(org, "1000", AccountCategory::Asset), actor)
            .unwrap()
            .entity;
        let dues = repo
            .create(input(org, "4000", AccountCategory::Revenue), actor)
            .unwrap()
            .entity;

        store
            .transact(|inner| {
                apply_balances_in(inner, cash.id, dues.id, dec!(10), actor, Utc::now())
            })
            .unwrap();
        let err = repo.soft_delete(cash.id, actor).unwrap_err();
        assert!(matches!(err, AccountError::BalanceNotZero { .. }));

        store
            .transact(|inner| {
                reverse_balances_in(inner, cash.id, dues.id, dec!(10), actor, Utc::now())
            })
            .unwrap();
        repo.soft_delete(cash.id, actor).unwrap();
        assert!(matches!(
            repo.find(cash.id).unwrap_err(),
            AccountError::Store(StoreError::NotFound { .. })
        ));
    }
}
