//! Fuzzy match scoring.
//!
//! A candidate transaction already agrees with the line on amount; the
//! score expresses how plausible the pairing is from date proximity and
//! description similarity:
//!
//! ```text
//! score = date_weight * date_score + description_weight * description_score
//! ```
//!
//! All scoring is `Decimal` arithmetic so results are exact and the
//! acceptance threshold comparison is deterministic.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use steward_shared::MatchingConfig;

/// Score for a description contained in (or containing) the other.
const SUBSTRING_CONTAINMENT_SCORE: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

/// Normalizes a reference number for comparison.
///
/// Case and whitespace are insignificant: `" ref-1 "` and `"REF-1"`
/// normalize to the same string.
#[must_use]
pub fn normalize_reference(reference: &str) -> String {
    reference.to_lowercase().split_whitespace().collect()
}

/// Scores date proximity as `1 - diff_days / tolerance_days`.
///
/// Dates further apart than the tolerance score zero.
#[must_use]
pub fn date_score(line_date: NaiveDate, transaction_date: NaiveDate, tolerance_days: i64) -> Decimal {
    let diff_days = (line_date - transaction_date).num_days().abs();
    if tolerance_days <= 0 || diff_days > tolerance_days {
        return Decimal::ZERO;
    }
    Decimal::ONE - Decimal::from(diff_days) / Decimal::from(tolerance_days)
}

/// Scores description similarity.
///
/// After lowercasing and trimming: equal strings score `1.0`, substring
/// containment scores `0.8`, anything else scores the Jaccard ratio of the
/// two character sets (whitespace ignored). An empty description never
/// resembles a non-empty one.
#[must_use]
pub fn description_score(a: &str, b: &str) -> Decimal {
    let a_norm = a.trim().to_lowercase();
    let b_norm = b.trim().to_lowercase();

    if a_norm == b_norm {
        return Decimal::ONE;
    }
    if a_norm.is_empty() || b_norm.is_empty() {
        return Decimal::ZERO;
    }
    if a_norm.contains(&b_norm) || b_norm.contains(&a_norm) {
        return SUBSTRING_CONTAINMENT_SCORE;
    }

    let a_set: HashSet<char> = a_norm.chars().filter(|c| !c.is_whitespace()).collect();
    let b_set: HashSet<char> = b_norm.chars().filter(|c| !c.is_whitespace()).collect();
    let union = a_set.union(&b_set).count();
    if union == 0 {
        return Decimal::ZERO;
    }
    let intersection = a_set.intersection(&b_set).count();
    Decimal::from(intersection) / Decimal::from(union)
}

/// Combines the component scores with the configured weights.
#[must_use]
pub fn candidate_score(
    date_score: Decimal,
    description_score: Decimal,
    config: &MatchingConfig,
) -> Decimal {
    config.date_weight * date_score + config.description_weight * description_score
}
