//! Two-pass auto-matching and coverage arithmetic.

use std::collections::HashSet;

use rust_decimal::Decimal;
use steward_shared::{MatchingConfig, StatementLineId, TransactionId};

use super::error::ReconcileError;
use super::score::{candidate_score, date_score, description_score, normalize_reference};
use super::types::{
    AutoMatchSummary, LineStatus, ManualMatchEntry, MatchConfidence, ProposedMatch,
    StatementLineView, TransactionView,
};

/// Runs the exact pass, then the fuzzy pass, over unmatched statement lines.
///
/// Lines are processed in chronological order (ties broken by id) so that
/// repeated runs over identical input propose identical matches. Each
/// transaction is usable by at most one match per run, and transactions
/// already reconciled are never candidates.
///
/// Callers pass the statement's unmatched lines; matched lines keep their
/// full absolute amount as the match amount.
#[must_use]
pub fn auto_match_lines(
    lines: &[StatementLineView],
    transactions: &[TransactionView],
    config: &MatchingConfig,
) -> AutoMatchSummary {
    let mut ordered: Vec<&StatementLineView> = lines.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    let mut used: HashSet<TransactionId> = HashSet::new();
    let mut matched_lines: HashSet<StatementLineId> = HashSet::new();
    let mut matches = Vec::new();
    let mut exact_matches = 0;
    let mut fuzzy_matches = 0;

    // Exact pass: first candidate agreeing on amount, date, and reference wins.
    for line in &ordered {
        let Some(candidate) = find_exact(line, transactions, &used, config) else {
            continue;
        };
        used.insert(candidate.id);
        matched_lines.insert(line.id);
        exact_matches += 1;
        matches.push(ProposedMatch {
            statement_line_id: line.id,
            transaction_id: candidate.id,
            amount: line.amount.abs(),
            confidence: MatchConfidence::AutoExact,
            reason: "Exact match on amount, date, and reference".to_string(),
        });
    }

    // Fuzzy pass: highest-scoring candidate above the threshold wins.
    for line in &ordered {
        if matched_lines.contains(&line.id) {
            continue;
        }
        let Some((candidate, score)) = find_fuzzy(line, transactions, &used, config) else {
            continue;
        };
        let diff_days = (line.date - candidate.date).num_days().abs();
        used.insert(candidate.id);
        matched_lines.insert(line.id);
        fuzzy_matches += 1;
        matches.push(ProposedMatch {
            statement_line_id: line.id,
            transaction_id: candidate.id,
            amount: line.amount.abs(),
            confidence: MatchConfidence::AutoFuzzy,
            reason: format!("Fuzzy match (score {score:.2}), {diff_days} day(s) apart"),
        });
    }

    AutoMatchSummary {
        total: lines.len(),
        exact_matches,
        fuzzy_matches,
        unmatched: lines.len() - matched_lines.len(),
        matches,
    }
}

/// Returns true when a transaction amount covers a line amount.
///
/// Statement lines carry signed amounts; transactions are positive, so the
/// comparison is against the line's absolute amount.
fn amount_matches(transaction_amount: Decimal, line_amount: Decimal, epsilon: Decimal) -> bool {
    (transaction_amount - line_amount.abs()).abs() < epsilon
}

fn is_candidate(transaction: &TransactionView, used: &HashSet<TransactionId>) -> bool {
    !transaction.is_reconciled && !used.contains(&transaction.id)
}

fn find_exact<'a>(
    line: &StatementLineView,
    transactions: &'a [TransactionView],
    used: &HashSet<TransactionId>,
    config: &MatchingConfig,
) -> Option<&'a TransactionView> {
    let line_reference = line
        .reference
        .as_deref()
        .map(normalize_reference)
        .filter(|r| !r.is_empty())?;

    transactions.iter().find(|txn| {
        is_candidate(txn, used)
            && amount_matches(txn.amount, line.amount, config.amount_epsilon)
            && (line.date - txn.date).num_days().abs() <= config.exact_date_tolerance_days
            && txn
                .reference
                .as_deref()
                .is_some_and(|r| normalize_reference(r) == line_reference)
    })
}

fn find_fuzzy<'a>(
    line: &StatementLineView,
    transactions: &'a [TransactionView],
    used: &HashSet<TransactionId>,
    config: &MatchingConfig,
) -> Option<(&'a TransactionView, Decimal)> {
    let mut best: Option<(&TransactionView, Decimal)> = None;

    for txn in transactions {
        if !is_candidate(txn, used)
            || !amount_matches(txn.amount, line.amount, config.amount_epsilon)
            || (line.date - txn.date).num_days().abs() > config.fuzzy_date_tolerance_days
        {
            continue;
        }

        let score = candidate_score(
            date_score(line.date, txn.date, config.fuzzy_date_tolerance_days),
            description_score(&line.description, &txn.description),
            config,
        );
        if score > config.fuzzy_min_score && best.is_none_or(|(_, s)| score > s) {
            best = Some((txn, score));
        }
    }

    best
}

/// Returns true when match amounts fully cover the line's absolute amount.
#[must_use]
pub fn line_is_covered(line_amount: Decimal, matched_total: Decimal, epsilon: Decimal) -> bool {
    (line_amount.abs() - matched_total).abs() < epsilon
}

/// Derives a line's status from its current matched total.
///
/// Used after adding or removing matches: a fully covered line is
/// `Matched`, anything else (including partially covered) is `Unmatched`.
#[must_use]
pub fn status_for_matched_total(
    line_amount: Decimal,
    matched_total: Decimal,
    epsilon: Decimal,
) -> LineStatus {
    if line_is_covered(line_amount, matched_total, epsilon) {
        LineStatus::Matched
    } else {
        LineStatus::Unmatched
    }
}

/// Validates a manual match request against a line's remaining capacity.
///
/// Returns the new matched total on success.
///
/// # Errors
///
/// Rejects empty requests, non-positive entry amounts, and totals that
/// would exceed the line's absolute amount by more than the epsilon.
pub fn validate_manual_entries(
    line_amount: Decimal,
    existing_matched_total: Decimal,
    entries: &[ManualMatchEntry],
    epsilon: Decimal,
) -> Result<Decimal, ReconcileError> {
    if entries.is_empty() {
        return Err(ReconcileError::NoEntries);
    }

    let mut new_total = existing_matched_total;
    for entry in entries {
        if entry.amount <= Decimal::ZERO {
            return Err(ReconcileError::NonPositiveMatchAmount(entry.amount));
        }
        new_total += entry.amount;
    }

    if new_total > line_amount.abs() + epsilon {
        return Err(ReconcileError::AmountExceedsLine {
            line_amount: line_amount.abs(),
            attempted: new_total,
        });
    }

    Ok(new_total)
}
