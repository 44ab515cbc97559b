//! Statement import, matching, and reconciliation completion.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use steward_core::ledger::AccountCategory;
use steward_core::reconcile::{
    auto_match_lines, status_for_matched_total, validate_manual_entries, AutoMatchSummary,
    LineStatus, ManualMatchEntry, MatchConfidence, ReconcileError, StatementLineView,
    TransactionView,
};
use steward_shared::{
    round_money, AccountId, ActorId, ErrorKind, LineMatchId, MatchingConfig, OrganizationId,
    StatementId, StatementLineId, TransactionId,
};
use thiserror::Error;
use tracing::info;

use crate::entities::{LineMatch, Statement, StatementLine, StatementStatus};
use crate::error::StoreError;
use crate::repositories::transaction::{self, TransactionError};
use crate::store::{LedgerStore, StoreInner};
use crate::version::Versioned;

/// Error types for reconciliation operations.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// Match amount validation failed.
    #[error(transparent)]
    Matching(#[from] ReconcileError),

    /// Marking a transaction reconciled failed.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// The statement was already completed.
    #[error("statement {0} is already completed")]
    StatementCompleted(StatementId),

    /// The line's status does not allow the operation.
    #[error("statement line {line_id} is {status:?}")]
    LineNotOpen {
        /// The line in question.
        line_id: StatementLineId,
        /// Its current status.
        status: LineStatus,
    },

    /// A line with live matches cannot be skipped.
    #[error("statement line {0} still has matches, unmatch it before skipping")]
    LineHasMatches(StatementLineId),

    /// A voided transaction cannot take part in a match.
    #[error("transaction {0} is voided")]
    TransactionVoided(TransactionId),

    /// An already-reconciled transaction cannot take part in a match.
    #[error("transaction {0} is already reconciled")]
    TransactionReconciled(TransactionId),

    /// The record belongs to a different organization.
    #[error("record {0} belongs to a different organization")]
    ForeignRecord(String),

    /// Statements reconcile bank-style accounts only.
    #[error("account '{0}' is not an asset account")]
    NotAssetAccount(String),

    /// Underlying storage error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReconciliationError {
    /// Maps the error onto the shared taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Matching(err) => err.kind(),
            Self::Transaction(err) => err.kind(),
            Self::StatementCompleted(_)
            | Self::LineNotOpen { .. }
            | Self::LineHasMatches(_)
            | Self::TransactionVoided(_)
            | Self::TransactionReconciled(_) => ErrorKind::InvalidState,
            Self::ForeignRecord(_) | Self::NotAssetAccount(_) => ErrorKind::InvariantViolation,
            Self::Store(err) => err.kind(),
        }
    }
}

/// One line of a statement import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportLineInput {
    /// Date the bank recorded the movement.
    pub date: NaiveDate,
    /// Free-text description from the bank.
    pub description: String,
    /// Bank reference number, if any.
    pub reference: Option<String>,
    /// Signed amount as imported.
    pub amount: Decimal,
}

/// Input for importing a bank statement.
#[derive(Debug, Clone)]
pub struct ImportStatementInput {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Ledger account the statement reconciles against.
    pub account_id: AccountId,
    /// Display name.
    pub name: String,
    /// Closing date of the period the statement covers.
    pub statement_date: NaiveDate,
    /// The statement's movements.
    pub lines: Vec<ImportLineInput>,
}

/// Result of completing a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    /// Lines confirmed by this completion.
    pub confirmed_lines: usize,
    /// Distinct transactions newly marked reconciled.
    pub reconciled_transactions: usize,
}

/// Repository for bank reconciliation.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    store: LedgerStore,
    config: MatchingConfig,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository with matching settings.
    #[must_use]
    pub const fn new(store: LedgerStore, config: MatchingConfig) -> Self {
        Self { store, config }
    }

    /// Imports a statement with its lines, all starting unmatched.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization or account is missing, the
    /// account belongs to a different organization, or the account is
    /// not an asset account.
    pub fn import_statement(
        &self,
        input: ImportStatementInput,
        actor: ActorId,
    ) -> Result<Versioned<Statement>, ReconciliationError> {
        let line_count = input.lines.len();
        let imported = self.store.transact(|inner| {
            let now = Utc::now();
            inner.organizations.require_current(input.organization_id)?;
            let account = inner.accounts.require_current(input.account_id)?;
            if account.entity.organization_id != input.organization_id {
                return Err(ReconciliationError::ForeignRecord(
                    account.entity.code.clone(),
                ));
            }
            if account.entity.category != AccountCategory::Asset {
                return Err(ReconciliationError::NotAssetAccount(
                    account.entity.code.clone(),
                ));
            }

            let statement = Statement {
                id: StatementId::new(),
                organization_id: input.organization_id,
                account_id: input.account_id,
                name: input.name.clone(),
                statement_date: input.statement_date,
                status: StatementStatus::InProgress,
            };
            let statement_id = statement.id;
            let version = inner
                .statements
                .insert_first(statement, actor, now)?
                .clone();

            for line in &input.lines {
                let row = StatementLine {
                    id: StatementLineId::new(),
                    statement_id,
                    date: line.date,
                    description: line.description.clone(),
                    reference: line.reference.clone(),
                    // Bank feeds deliver cents; normalize anything finer.
                    amount: round_money(line.amount),
                    status: LineStatus::Unmatched,
                };
                inner.statement_lines.insert_first(row, actor, now)?;
            }
            Ok(version)
        })?;
        info!(
            statement_id = %imported.entity.id,
            lines = line_count,
            "Imported bank statement"
        );
        Ok(imported)
    }

    /// Finds the current version of a statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement does not exist.
    pub fn find_statement(
        &self,
        id: StatementId,
    ) -> Result<Versioned<Statement>, ReconciliationError> {
        self.store.read(|inner| {
            inner
                .statements
                .require_current(id)
                .map(Clone::clone)
                .map_err(ReconciliationError::from)
        })
    }

    /// Lists a statement's lines in chronological order.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement does not exist.
    pub fn lines(
        &self,
        statement_id: StatementId,
    ) -> Result<Vec<Versioned<StatementLine>>, ReconciliationError> {
        self.store.read(|inner| {
            inner.statements.require_current(statement_id)?;
            let mut lines: Vec<Versioned<StatementLine>> = inner
                .statement_lines
                .current_all()
                .filter(|version| version.entity.statement_id == statement_id)
                .cloned()
                .collect();
            lines.sort_by(|a, b| a.entity.date.cmp(&b.entity.date).then(a.entity.id.cmp(&b.entity.id)));
            Ok(lines)
        })
    }

    /// Lists the live matches covering a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist.
    pub fn matches_for_line(
        &self,
        line_id: StatementLineId,
    ) -> Result<Vec<Versioned<LineMatch>>, ReconciliationError> {
        self.store.read(|inner| {
            inner.statement_lines.require_current(line_id)?;
            Ok(inner
                .line_matches
                .current_all()
                .filter(|version| version.entity.statement_line_id == line_id)
                .cloned()
                .collect())
        })
    }

    /// Runs the two-pass auto matcher over the statement's unmatched
    /// lines and persists every produced match.
    ///
    /// Candidates are the organization's transactions that are neither
    /// voided, nor reconciled, nor already covering some line.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement is missing or already completed.
    pub fn auto_match(
        &self,
        statement_id: StatementId,
        actor: ActorId,
    ) -> Result<AutoMatchSummary, ReconciliationError> {
        let summary = self.store.transact(|inner| -> Result<AutoMatchSummary, ReconciliationError> {
            let now = Utc::now();
            let statement = inner.statements.require_current(statement_id)?.entity.clone();
            ensure_in_progress(&statement)?;

            let line_views: Vec<StatementLineView> = inner
                .statement_lines
                .current_all()
                .filter(|version| {
                    version.entity.statement_id == statement_id
                        && version.entity.status == LineStatus::Unmatched
                })
                .map(|version| version.entity.matcher_view())
                .collect();

            let already_used: HashSet<TransactionId> = inner
                .line_matches
                .current_all()
                .map(|version| version.entity.transaction_id)
                .collect();
            let candidates: Vec<TransactionView> = inner
                .transactions
                .current_all()
                .filter(|version| {
                    let transaction = &version.entity;
                    transaction.organization_id == statement.organization_id
                        && !transaction.is_voided
                        && !transaction.is_reconciled
                        && !already_used.contains(&transaction.id)
                })
                .map(|version| version.entity.matcher_view())
                .collect();

            let summary = auto_match_lines(&line_views, &candidates, &self.config);
            for proposed in &summary.matches {
                let row = LineMatch {
                    id: LineMatchId::new(),
                    statement_line_id: proposed.statement_line_id,
                    transaction_id: proposed.transaction_id,
                    amount: proposed.amount,
                    confidence: proposed.confidence,
                    reason: proposed.reason.clone(),
                };
                inner.line_matches.insert_first(row, actor, now)?;
                inner
                    .statement_lines
                    .update(proposed.statement_line_id, actor, now, |line| {
                        line.status = LineStatus::Matched;
                    })?;
            }
            Ok(summary)
        })?;
        info!(
            statement_id = %statement_id,
            exact = summary.exact_matches,
            fuzzy = summary.fuzzy_matches,
            unmatched = summary.unmatched,
            "Auto-matched statement"
        );
        Ok(summary)
    }

    /// Records manual matches against a line, possibly partial.
    ///
    /// The line flips to matched only once its matches cover the full
    /// absolute amount; otherwise it stays unmatched with the partial
    /// total retained.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement is completed, the line is
    /// settled, a referenced transaction is unusable, or the amounts
    /// would overshoot the line.
    pub fn manual_match(
        &self,
        line_id: StatementLineId,
        entries: &[ManualMatchEntry],
        actor: ActorId,
    ) -> Result<Versioned<StatementLine>, ReconciliationError> {
        let updated = self.store.transact(|inner| {
            let now = Utc::now();
            let line = inner.statement_lines.require_current(line_id)?.entity.clone();
            let statement = inner.statements.require_current(line.statement_id)?.entity.clone();
            ensure_in_progress(&statement)?;
            if line.status.is_settled() {
                return Err(ReconciliationError::LineNotOpen {
                    line_id,
                    status: line.status,
                });
            }

            let existing_total = matched_total_in(inner, line_id);
            let new_total = validate_manual_entries(
                line.amount,
                existing_total,
                entries,
                self.config.amount_epsilon,
            )?;

            for entry in entries {
                let transaction = inner
                    .transactions
                    .require_current(entry.transaction_id)?
                    .entity
                    .clone();
                if transaction.organization_id != statement.organization_id {
                    return Err(ReconciliationError::ForeignRecord(
                        transaction.id.to_string(),
                    ));
                }
                if transaction.is_voided {
                    return Err(ReconciliationError::TransactionVoided(transaction.id));
                }
                if transaction.is_reconciled {
                    return Err(ReconciliationError::TransactionReconciled(transaction.id));
                }
                let row = LineMatch {
                    id: LineMatchId::new(),
                    statement_line_id: line_id,
                    transaction_id: entry.transaction_id,
                    amount: entry.amount,
                    confidence: MatchConfidence::Manual,
                    reason: "Manual match".to_string(),
                };
                inner.line_matches.insert_first(row, actor, now)?;
            }

            let status =
                status_for_matched_total(line.amount, new_total, self.config.amount_epsilon);
            let version = inner
                .statement_lines
                .update(line_id, actor, now, |line| line.status = status)?;
            Ok(version.clone())
        })?;
        info!(
            line_id = %line_id,
            entries = entries.len(),
            status = ?updated.entity.status,
            "Recorded manual matches"
        );
        Ok(updated)
    }

    /// Removes one match and recomputes the line's status from the
    /// matches that remain.
    ///
    /// # Errors
    ///
    /// Returns an error if the match is missing or the statement is
    /// already completed.
    pub fn remove_match(
        &self,
        match_id: LineMatchId,
        actor: ActorId,
    ) -> Result<Versioned<StatementLine>, ReconciliationError> {
        let updated = self.store.transact(|inner| -> Result<Versioned<StatementLine>, ReconciliationError> {
            let now = Utc::now();
            let row = inner.line_matches.require_current(match_id)?.entity.clone();
            let line = inner
                .statement_lines
                .require_current(row.statement_line_id)?
                .entity
                .clone();
            let statement = inner.statements.require_current(line.statement_id)?.entity.clone();
            ensure_in_progress(&statement)?;

            inner.line_matches.soft_delete(match_id, actor, now)?;
            let remaining = matched_total_in(inner, line.id);
            let status =
                status_for_matched_total(line.amount, remaining, self.config.amount_epsilon);
            let version = inner
                .statement_lines
                .update(line.id, actor, now, |line| line.status = status)?;
            Ok(version.clone())
        })?;
        info!(match_id = %match_id, "Removed match");
        Ok(updated)
    }

    /// Removes every match of a line and resets it to unmatched.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is missing or the statement is
    /// already completed.
    pub fn unmatch_line(
        &self,
        line_id: StatementLineId,
        actor: ActorId,
    ) -> Result<Versioned<StatementLine>, ReconciliationError> {
        let updated = self.store.transact(|inner| -> Result<Versioned<StatementLine>, ReconciliationError> {
            let now = Utc::now();
            let line = inner.statement_lines.require_current(line_id)?.clone();
            let statement = inner
                .statements
                .require_current(line.entity.statement_id)?
                .entity
                .clone();
            ensure_in_progress(&statement)?;

            let match_ids: Vec<LineMatchId> = inner
                .line_matches
                .current_all()
                .filter(|version| version.entity.statement_line_id == line_id)
                .map(|version| version.entity.id)
                .collect();
            if match_ids.is_empty() && line.entity.status == LineStatus::Unmatched {
                return Ok(line);
            }
            for match_id in match_ids {
                inner.line_matches.soft_delete(match_id, actor, now)?;
            }
            let version = inner.statement_lines.update(line_id, actor, now, |line| {
                line.status = LineStatus::Unmatched;
            })?;
            Ok(version.clone())
        })?;
        info!(line_id = %line_id, "Unmatched line");
        Ok(updated)
    }

    /// Marks an unmatched line as intentionally ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is not unmatched, still has matches,
    /// or the statement is already completed.
    pub fn skip_line(
        &self,
        line_id: StatementLineId,
        actor: ActorId,
    ) -> Result<Versioned<StatementLine>, ReconciliationError> {
        let updated = self.store.transact(|inner| {
            let now = Utc::now();
            let line = inner.statement_lines.require_current(line_id)?.entity.clone();
            let statement = inner.statements.require_current(line.statement_id)?.entity.clone();
            ensure_in_progress(&statement)?;
            if line.status != LineStatus::Unmatched {
                return Err(ReconciliationError::LineNotOpen {
                    line_id,
                    status: line.status,
                });
            }
            let has_matches = inner
                .line_matches
                .current_all()
                .any(|version| version.entity.statement_line_id == line_id);
            if has_matches {
                return Err(ReconciliationError::LineHasMatches(line_id));
            }
            let version = inner.statement_lines.update(line_id, actor, now, |line| {
                line.status = LineStatus::Skipped;
            })?;
            Ok(version.clone())
        })?;
        info!(line_id = %line_id, "Skipped line");
        Ok(updated)
    }

    /// Completes the reconciliation: marks each matched line's distinct
    /// transactions reconciled exactly once, confirms the lines, and
    /// freezes the statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement is missing or already completed.
    pub fn complete_reconciliation(
        &self,
        statement_id: StatementId,
        actor: ActorId,
    ) -> Result<CompletionSummary, ReconciliationError> {
        let summary = self.store.transact(|inner| -> Result<CompletionSummary, ReconciliationError> {
            let now = Utc::now();
            let statement = inner.statements.require_current(statement_id)?.entity.clone();
            ensure_in_progress(&statement)?;

            let matched_line_ids: Vec<StatementLineId> = inner
                .statement_lines
                .current_all()
                .filter(|version| {
                    version.entity.statement_id == statement_id
                        && version.entity.status == LineStatus::Matched
                })
                .map(|version| version.entity.id)
                .collect();

            // One transaction may cover several lines; reconcile it once.
            let mut transaction_ids: Vec<TransactionId> = Vec::new();
            let mut seen: HashSet<TransactionId> = HashSet::new();
            let mut confirmed_lines = 0_usize;
            for line_id in &matched_line_ids {
                let covering: Vec<TransactionId> = inner
                    .line_matches
                    .current_all()
                    .filter(|version| version.entity.statement_line_id == *line_id)
                    .map(|version| version.entity.transaction_id)
                    .collect();
                if covering.is_empty() {
                    continue;
                }
                confirmed_lines += 1;
                for transaction_id in covering {
                    if seen.insert(transaction_id) {
                        transaction_ids.push(transaction_id);
                    }
                }
            }

            for transaction_id in &transaction_ids {
                transaction::mark_reconciled_in(inner, *transaction_id, actor, now)?;
            }
            for line_id in &matched_line_ids {
                inner.statement_lines.update(*line_id, actor, now, |line| {
                    line.status = LineStatus::Confirmed;
                })?;
            }
            inner.statements.update(statement_id, actor, now, |statement| {
                statement.status = StatementStatus::Completed;
            })?;

            Ok(CompletionSummary {
                confirmed_lines,
                reconciled_transactions: transaction_ids.len(),
            })
        })?;
        info!(
            statement_id = %statement_id,
            confirmed = summary.confirmed_lines,
            reconciled = summary.reconciled_transactions,
            "Completed reconciliation"
        );
        Ok(summary)
    }
}

fn ensure_in_progress(statement: &Statement) -> Result<(), ReconciliationError> {
    if statement.status == StatementStatus::Completed {
        return Err(ReconciliationError::StatementCompleted(statement.id));
    }
    Ok(())
}

fn matched_total_in(inner: &StoreInner, line_id: StatementLineId) -> Decimal {
    inner
        .line_matches
        .current_all()
        .filter(|version| version.entity.statement_line_id == line_id)
        .map(|version| version.entity.amount)
        .sum()
}
