//! Reconciliation domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use steward_shared::{StatementLineId, TransactionId};

/// Lifecycle state of a bank statement line.
///
/// Lines move `Unmatched -> Matched` as matches accumulate to the full line
/// amount, then `Matched -> Confirmed` at reconciliation completion. Removing
/// matches moves a line back to `Unmatched`. `Skipped` is an explicit
/// operator decision for lines that will never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineStatus {
    /// Not yet (fully) covered by matches.
    Unmatched,
    /// Fully covered by matches, awaiting confirmation.
    Matched,
    /// Confirmed by reconciliation completion.
    Confirmed,
    /// Operator chose to ignore this line.
    Skipped,
}

impl LineStatus {
    /// Returns true once the line no longer participates in matching.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Confirmed | Self::Skipped)
    }
}

/// How confident the system is in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchConfidence {
    /// Exact pass: amount, date, and reference all agreed.
    AutoExact,
    /// Fuzzy pass: scored on date proximity and description similarity.
    AutoFuzzy,
    /// Operator created the match by hand.
    Manual,
}

/// A statement line as seen by the matcher.
#[derive(Debug, Clone)]
pub struct StatementLineView {
    /// The line id.
    pub id: StatementLineId,
    /// Signed amount as imported (negative for outflows).
    pub amount: Decimal,
    /// Date the bank recorded the movement.
    pub date: NaiveDate,
    /// Bank reference number, if the import carried one.
    pub reference: Option<String>,
    /// Free-text description from the statement.
    pub description: String,
}

/// A ledger transaction as seen by the matcher.
#[derive(Debug, Clone)]
pub struct TransactionView {
    /// The transaction id.
    pub id: TransactionId,
    /// Positive transaction amount.
    pub amount: Decimal,
    /// Business date of the transaction.
    pub date: NaiveDate,
    /// Reference number, if any.
    pub reference: Option<String>,
    /// Transaction description.
    pub description: String,
    /// Whether a previous reconciliation already confirmed this transaction.
    pub is_reconciled: bool,
}

/// One match the auto-matcher proposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedMatch {
    /// The statement line being covered.
    pub statement_line_id: StatementLineId,
    /// The ledger transaction covering it.
    pub transaction_id: TransactionId,
    /// Matched amount (the full absolute line amount for auto matches).
    pub amount: Decimal,
    /// Which pass produced the match.
    pub confidence: MatchConfidence,
    /// Human-readable explanation for review.
    pub reason: String,
}

/// Result of one auto-match run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMatchSummary {
    /// Number of unmatched lines considered.
    pub total: usize,
    /// Lines matched by the exact pass.
    pub exact_matches: usize,
    /// Lines matched by the fuzzy pass.
    pub fuzzy_matches: usize,
    /// Lines left unmatched after both passes.
    pub unmatched: usize,
    /// Every match produced, in the order lines were processed.
    pub matches: Vec<ProposedMatch>,
}

/// One entry of a manual match request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualMatchEntry {
    /// Transaction to link.
    pub transaction_id: TransactionId,
    /// Portion of the line amount this transaction covers.
    pub amount: Decimal,
}
