//! Transaction posting and voiding.
//!
//! Every mutation here is atomic across the transaction row and both
//! affected account balances: a posting that fails half-way leaves no
//! trace.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use steward_core::ledger::{validate_posting, LedgerError, TransactionKind};
use steward_shared::{AccountId, ActorId, ErrorKind, OrganizationId, TransactionId};
use thiserror::Error;
use tracing::info;

use crate::entities::Transaction;
use crate::error::StoreError;
use crate::repositories::{account, fiscal};
use crate::store::{LedgerStore, StoreInner};
use crate::version::Versioned;

/// Error types for transaction operations.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Posting validation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Balance maintenance failed.
    #[error(transparent)]
    Account(#[from] account::AccountError),

    /// The transaction was already voided.
    #[error("transaction {0} is already voided")]
    AlreadyVoided(TransactionId),

    /// One of the leg accounts is inactive.
    #[error("account '{0}' is inactive")]
    InactiveAccount(String),

    /// One of the leg accounts belongs to a different organization.
    #[error("account {0} belongs to a different organization")]
    ForeignAccount(AccountId),

    /// The transaction date falls inside a closed fiscal period.
    #[error("date {date} falls inside closed period '{period}'")]
    DateInClosedPeriod {
        /// The rejected business date.
        date: NaiveDate,
        /// Name of the closed period covering it.
        period: String,
    },

    /// Underlying storage error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TransactionError {
    /// Maps the error onto the shared taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Ledger(err) => err.kind(),
            Self::Account(err) => err.kind(),
            Self::AlreadyVoided(_) | Self::InactiveAccount(_) | Self::DateInClosedPeriod { .. } => {
                ErrorKind::InvalidState
            }
            Self::ForeignAccount(_) => ErrorKind::InvariantViolation,
            Self::Store(err) => err.kind(),
        }
    }
}

/// Input for posting a transaction.
#[derive(Debug, Clone)]
pub struct PostTransactionInput {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Business classification of the posting.
    pub kind: TransactionKind,
    /// Business date.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// External reference number, if any.
    pub reference: Option<String>,
    /// Positive amount.
    pub amount: Decimal,
    /// Account to debit.
    pub debit_account_id: AccountId,
    /// Account to credit.
    pub credit_account_id: AccountId,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Keep only transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Keep only transactions on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Keep only transactions on or before this date.
    pub date_to: Option<NaiveDate>,
    /// Keep only transactions with this reconciled flag.
    pub is_reconciled: Option<bool>,
}

impl TransactionFilter {
    fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.is_none_or(|kind| transaction.kind == kind)
            && self.date_from.is_none_or(|from| transaction.date >= from)
            && self.date_to.is_none_or(|to| transaction.date <= to)
            && self
                .is_reconciled
                .is_none_or(|flag| transaction.is_reconciled == flag)
    }
}

/// Repository for the transaction journal.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    store: LedgerStore,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Posts a transaction and applies its balance effects.
    ///
    /// # Errors
    ///
    /// Returns an error if posting validation fails, an account is
    /// missing, inactive, or foreign, or the date falls inside a closed
    /// fiscal period.
    pub fn post(
        &self,
        input: PostTransactionInput,
        actor: ActorId,
    ) -> Result<Versioned<Transaction>, TransactionError> {
        let posted = self
            .store
            .transact(|inner| post_in(inner, input, actor, Utc::now()))?;
        info!(
            transaction_id = %posted.entity.id,
            amount = %posted.entity.amount,
            "Posted transaction"
        );
        Ok(posted)
    }

    /// Voids a transaction and reverses its balance effects.
    ///
    /// The transaction stays in the journal as a new version with
    /// `is_voided` set and the reason recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is missing, already voided,
    /// or dated inside a closed fiscal period.
    pub fn void(
        &self,
        id: TransactionId,
        reason: &str,
        actor: ActorId,
    ) -> Result<Versioned<Transaction>, TransactionError> {
        let voided = self
            .store
            .transact(|inner| void_in(inner, id, reason, actor, Utc::now()))?;
        info!(transaction_id = %id, reason = %reason, "Voided transaction");
        Ok(voided)
    }

    /// Finds the current version of a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction does not exist.
    pub fn find(&self, id: TransactionId) -> Result<Versioned<Transaction>, TransactionError> {
        self.store.read(|inner| {
            inner
                .transactions
                .require_current(id)
                .map(Clone::clone)
                .map_err(TransactionError::from)
        })
    }

    /// Lists an organization's transactions ordered by date, then id.
    #[must_use]
    pub fn list(
        &self,
        organization_id: OrganizationId,
        filter: TransactionFilter,
    ) -> Vec<Versioned<Transaction>> {
        self.store.read(|inner| {
            let mut transactions: Vec<Versioned<Transaction>> = inner
                .transactions
                .current_all()
                .filter(|version| {
                    version.entity.organization_id == organization_id
                        && filter.matches(&version.entity)
                })
                .cloned()
                .collect();
            transactions
                .sort_by(|a, b| a.entity.date.cmp(&b.entity.date).then(a.entity.id.cmp(&b.entity.id)));
            transactions
        })
    }

    /// Returns the full version history of a transaction, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if no record ever existed for the id.
    pub fn history(
        &self,
        id: TransactionId,
    ) -> Result<Vec<Versioned<Transaction>>, TransactionError> {
        self.store.read(|inner| {
            inner
                .transactions
                .history(id)
                .map(|versions| versions.into_iter().cloned().collect())
                .map_err(TransactionError::from)
        })
    }
}

/// Posts a transaction inside an open store transaction.
pub(crate) fn post_in(
    inner: &mut StoreInner,
    input: PostTransactionInput,
    actor: ActorId,
    now: DateTime<Utc>,
) -> Result<Versioned<Transaction>, TransactionError> {
    validate_posting(input.debit_account_id, input.credit_account_id, input.amount)?;
    if let Some(period) =
        fiscal::closed_period_containing_in(inner, input.organization_id, input.date)
    {
        return Err(TransactionError::DateInClosedPeriod {
            date: input.date,
            period: period.name,
        });
    }

    let debit = inner
        .accounts
        .require_current(input.debit_account_id)?
        .entity
        .clone();
    let credit = inner
        .accounts
        .require_current(input.credit_account_id)?
        .entity
        .clone();
    for leg in [&debit, &credit] {
        if leg.organization_id != input.organization_id {
            return Err(TransactionError::ForeignAccount(leg.id));
        }
        if !leg.is_active {
            return Err(TransactionError::InactiveAccount(leg.code.clone()));
        }
    }

    account::apply_balances_in(
        inner,
        input.debit_account_id,
        input.credit_account_id,
        input.amount,
        actor,
        now,
    )?;

    let transaction = Transaction {
        id: TransactionId::new(),
        organization_id: input.organization_id,
        kind: input.kind,
        date: input.date,
        description: input.description,
        reference: input.reference,
        amount: input.amount,
        debit_account_id: input.debit_account_id,
        credit_account_id: input.credit_account_id,
        is_reconciled: false,
        is_voided: false,
        void_reason: None,
    };
    let version = inner.transactions.insert_first(transaction, actor, now)?;
    Ok(version.clone())
}

/// Voids a transaction inside an open store transaction.
pub(crate) fn void_in(
    inner: &mut StoreInner,
    id: TransactionId,
    reason: &str,
    actor: ActorId,
    now: DateTime<Utc>,
) -> Result<Versioned<Transaction>, TransactionError> {
    let current = inner.transactions.require_current(id)?.entity.clone();
    if current.is_voided {
        return Err(TransactionError::AlreadyVoided(id));
    }
    if let Some(period) =
        fiscal::closed_period_containing_in(inner, current.organization_id, current.date)
    {
        return Err(TransactionError::DateInClosedPeriod {
            date: current.date,
            period: period.name,
        });
    }

    account::reverse_balances_in(
        inner,
        current.debit_account_id,
        current.credit_account_id,
        current.amount,
        actor,
        now,
    )?;
    let version = inner.transactions.update(id, actor, now, |transaction| {
        transaction.is_voided = true;
        transaction.void_reason = Some(reason.to_string());
    })?;
    Ok(version.clone())
}

/// Marks a transaction reconciled inside an open store transaction.
pub(crate) fn mark_reconciled_in(
    inner: &mut StoreInner,
    id: TransactionId,
    actor: ActorId,
    now: DateTime<Utc>,
) -> Result<(), TransactionError> {
    inner.transactions.update(id, actor, now, |transaction| {
        transaction.is_reconciled = true;
    })?;
    Ok(())
}
