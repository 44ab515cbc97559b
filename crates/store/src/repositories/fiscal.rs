//! Fiscal period lifecycle: creation, close, reopen.

use chrono::{NaiveDate, Utc};
use steward_core::closing::{periods_overlap, plan_close, ClosingPreview, PeriodStatus};
use steward_core::ledger::{AccountSnapshot, TransactionKind};
use steward_shared::{ActorId, ErrorKind, FiscalPeriodId, OrganizationId};
use thiserror::Error;
use tracing::info;

use crate::entities::FiscalPeriod;
use crate::error::StoreError;
use crate::repositories::organization::{self, OrganizationError};
use crate::repositories::transaction::{self, PostTransactionInput, TransactionError};
use crate::store::{LedgerStore, StoreInner};
use crate::version::Versioned;

/// Error types for fiscal period operations.
#[derive(Debug, Error)]
pub enum FiscalError {
    /// Start date is after the end date.
    #[error("invalid period range: {start} is after {end}")]
    InvalidDateRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// The range overlaps an existing period of the organization.
    #[error("period range overlaps existing period '{0}'")]
    OverlappingPeriod(String),

    /// Close requires an open period.
    #[error("period is {0:?}, close requires an open period")]
    PeriodNotOpen(PeriodStatus),

    /// Reopen requires a closed period.
    #[error("period is {0:?}, reopen requires a closed period")]
    PeriodNotClosed(PeriodStatus),

    /// No active temporary account carries a balance to close.
    #[error("nothing to close: no temporary account carries a balance")]
    NothingToClose,

    /// Fund balance resolution failed.
    #[error(transparent)]
    Organization(#[from] OrganizationError),

    /// Posting or voiding a closing transaction failed.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Underlying storage error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FiscalError {
    /// Maps the error onto the shared taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDateRange { .. } | Self::OverlappingPeriod(_) => {
                ErrorKind::InvariantViolation
            }
            Self::PeriodNotOpen(_) | Self::PeriodNotClosed(_) | Self::NothingToClose => {
                ErrorKind::InvalidState
            }
            Self::Organization(err) => err.kind(),
            Self::Transaction(err) => err.kind(),
            Self::Store(err) => err.kind(),
        }
    }
}

/// Input for creating a fiscal period.
#[derive(Debug, Clone)]
pub struct CreatePeriodInput {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Display name, e.g. "FY2026".
    pub name: String,
    /// First day, inclusive.
    pub start_date: NaiveDate,
    /// Last day, inclusive.
    pub end_date: NaiveDate,
}

/// Repository for fiscal periods and the period close.
#[derive(Debug, Clone)]
pub struct FiscalRepository {
    store: LedgerStore,
}

impl FiscalRepository {
    /// Creates a new fiscal repository.
    #[must_use]
    pub const fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Creates an open fiscal period.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization is missing, the range is
    /// inverted, or the range overlaps an existing period.
    pub fn create_period(
        &self,
        input: CreatePeriodInput,
        actor: ActorId,
    ) -> Result<Versioned<FiscalPeriod>, FiscalError> {
        if input.start_date > input.end_date {
            return Err(FiscalError::InvalidDateRange {
                start: input.start_date,
                end: input.end_date,
            });
        }
        let created = self.store.transact(|inner| {
            inner.organizations.require_current(input.organization_id)?;
            let clash = inner
                .fiscal_periods
                .current_all()
                .filter(|version| version.entity.organization_id == input.organization_id)
                .find(|version| {
                    periods_overlap(
                        version.entity.start_date,
                        version.entity.end_date,
                        input.start_date,
                        input.end_date,
                    )
                });
            if let Some(existing) = clash {
                return Err(FiscalError::OverlappingPeriod(existing.entity.name.clone()));
            }

            let period = FiscalPeriod {
                id: FiscalPeriodId::new(),
                organization_id: input.organization_id,
                name: input.name.clone(),
                start_date: input.start_date,
                end_date: input.end_date,
                status: PeriodStatus::Open,
                closing_transaction_ids: Vec::new(),
                closed_at: None,
                closed_by: None,
            };
            inner
                .fiscal_periods
                .insert_first(period, actor, Utc::now())
                .map(Clone::clone)
                .map_err(FiscalError::from)
        })?;
        info!(
            period_id = %created.entity.id,
            name = %created.entity.name,
            "Created fiscal period"
        );
        Ok(created)
    }

    /// Finds the current version of a fiscal period.
    ///
    /// # Errors
    ///
    /// Returns an error if the period does not exist.
    pub fn find(&self, id: FiscalPeriodId) -> Result<Versioned<FiscalPeriod>, FiscalError> {
        self.store.read(|inner| {
            inner
                .fiscal_periods
                .require_current(id)
                .map(Clone::clone)
                .map_err(FiscalError::from)
        })
    }

    /// Lists an organization's periods ordered by start date.
    #[must_use]
    pub fn list(&self, organization_id: OrganizationId) -> Vec<Versioned<FiscalPeriod>> {
        self.store.read(|inner| {
            let mut periods: Vec<Versioned<FiscalPeriod>> = inner
                .fiscal_periods
                .current_all()
                .filter(|version| version.entity.organization_id == organization_id)
                .cloned()
                .collect();
            periods.sort_by(|a, b| a.entity.start_date.cmp(&b.entity.start_date));
            periods
        })
    }

    /// Computes the closing entries the period would generate, without
    /// mutating anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is missing or the organization has
    /// no fund balance account configured.
    pub fn preview_close(&self, period_id: FiscalPeriodId) -> Result<ClosingPreview, FiscalError> {
        self.store.read(|inner| {
            let period = inner.fiscal_periods.require_current(period_id)?;
            let organization_id = period.entity.organization_id;
            let fund_balance_account_id =
                organization::fund_balance_account_id_in(inner, organization_id)?;
            let snapshots = account_snapshots_in(inner, organization_id);
            Ok(plan_close(&snapshots, fund_balance_account_id))
        })
    }

    /// Closes the period: posts one closing transaction per planned entry
    /// and flips the period to closed, all atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is not open, nothing is left to
    /// close, the fund balance account is not configured, or any closing
    /// posting fails. On error the period stays open and no transaction
    /// is created.
    pub fn execute_close(
        &self,
        period_id: FiscalPeriodId,
        actor: ActorId,
    ) -> Result<Versioned<FiscalPeriod>, FiscalError> {
        let closed = self.store.transact(|inner| {
            let now = Utc::now();
            let period = inner.fiscal_periods.require_current(period_id)?.entity.clone();
            if period.status != PeriodStatus::Open {
                return Err(FiscalError::PeriodNotOpen(period.status));
            }
            let fund_balance_account_id =
                organization::fund_balance_account_id_in(inner, period.organization_id)?;
            let snapshots = account_snapshots_in(inner, period.organization_id);
            let plan = plan_close(&snapshots, fund_balance_account_id);
            if plan.is_empty() {
                return Err(FiscalError::NothingToClose);
            }

            let mut closing_transaction_ids = Vec::with_capacity(plan.entries.len());
            for entry in &plan.entries {
                let posted = transaction::post_in(
                    inner,
                    PostTransactionInput {
                        organization_id: period.organization_id,
                        kind: TransactionKind::Closing,
                        date: period.end_date,
                        description: entry.description.clone(),
                        reference: None,
                        amount: entry.amount,
                        debit_account_id: entry.debit_account_id,
                        credit_account_id: entry.credit_account_id,
                    },
                    actor,
                    now,
                )?;
                closing_transaction_ids.push(posted.entity.id);
            }

            let version = inner
                .fiscal_periods
                .update(period_id, actor, now, |period| {
                    period.status = PeriodStatus::Closed;
                    period.closing_transaction_ids = closing_transaction_ids.clone();
                    period.closed_at = Some(now);
                    period.closed_by = Some(actor);
                })?;
            Ok(version.clone())
        })?;
        info!(
            period_id = %period_id,
            closing_transactions = closed.entity.closing_transaction_ids.len(),
            "Closed fiscal period"
        );
        Ok(closed)
    }

    /// Reopens a closed period: voids every closing transaction recorded
    /// at close time, restoring each affected balance exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is missing, not closed, or any
    /// void fails. On error the period stays closed.
    pub fn reopen_period(
        &self,
        period_id: FiscalPeriodId,
        actor: ActorId,
    ) -> Result<Versioned<FiscalPeriod>, FiscalError> {
        let reopened = self.store.transact(|inner| {
            let now = Utc::now();
            let period = inner.fiscal_periods.require_current(period_id)?.entity.clone();
            if period.status != PeriodStatus::Closed {
                return Err(FiscalError::PeriodNotClosed(period.status));
            }

            // Flip first so the voids are not rejected by the
            // closed-period guard; the whole batch still commits as one.
            let version = inner
                .fiscal_periods
                .update(period_id, actor, now, |period| {
                    period.status = PeriodStatus::Open;
                    period.closing_transaction_ids = Vec::new();
                    period.closed_at = None;
                    period.closed_by = None;
                })?;
            let version = version.clone();

            for transaction_id in &period.closing_transaction_ids {
                transaction::void_in(inner, *transaction_id, "Period reopened", actor, now)?;
            }
            Ok(version)
        })?;
        info!(period_id = %period_id, "Reopened fiscal period");
        Ok(reopened)
    }

    /// Returns true when the date falls inside a closed period of the
    /// organization.
    ///
    /// Used as a guard before accepting new or edited transactions.
    #[must_use]
    pub fn is_date_in_closed_period(
        &self,
        organization_id: OrganizationId,
        date: NaiveDate,
    ) -> bool {
        self.store
            .read(|inner| closed_period_containing_in(inner, organization_id, date).is_some())
    }
}

/// Finds the closed period containing a date, if any.
pub(crate) fn closed_period_containing_in(
    inner: &StoreInner,
    organization_id: OrganizationId,
    date: NaiveDate,
) -> Option<FiscalPeriod> {
    inner
        .fiscal_periods
        .current_all()
        .filter(|version| {
            version.entity.organization_id == organization_id
                && version.entity.status == PeriodStatus::Closed
        })
        .find(|version| version.entity.contains(date))
        .map(|version| version.entity.clone())
}

fn account_snapshots_in(inner: &StoreInner, organization_id: OrganizationId) -> Vec<AccountSnapshot> {
    inner
        .accounts
        .current_all()
        .filter(|version| version.entity.organization_id == organization_id)
        .map(|version| version.entity.snapshot())
        .collect()
}
