//! Statement line matching.
//!
//! This module implements the matching heuristics that pair imported bank
//! statement lines with ledger transactions:
//! - An exact pass on amount, date, and normalized reference
//! - A fuzzy pass scoring date proximity and description similarity
//! - Coverage arithmetic for partial (split) matches
//!
//! Persistence of the resulting matches is the storage crate's job; this
//! module only decides what should match and why.

pub mod error;
pub mod matcher;
pub mod score;
pub mod types;

#[cfg(test)]
mod matcher_props;

pub use error::ReconcileError;
pub use matcher::{
    auto_match_lines, line_is_covered, status_for_matched_total, validate_manual_entries,
};
pub use score::{candidate_score, date_score, description_score, normalize_reference};
pub use types::{
    AutoMatchSummary, LineStatus, ManualMatchEntry, MatchConfidence, ProposedMatch,
    StatementLineView, TransactionView,
};
