//! Property-based tests for the auto-matcher.
//!
//! Inputs are drawn from small value pools so that amount, date, and
//! reference collisions actually occur.

use std::collections::HashSet;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use steward_shared::{MatchingConfig, StatementLineId, TransactionId};

use super::matcher::auto_match_lines;
use super::types::{MatchConfidence, StatementLineView, TransactionView};

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(dec!(10.00)),
        Just(dec!(250.00)),
        Just(dec!(99.95)),
        Just(dec!(1200.00)),
    ]
}

fn reference_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("REF-1".to_string())),
        Just(Some("ref-2".to_string())),
        Just(Some(" REF-1 ".to_string())),
    ]
}

fn description_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("grant payment".to_string()),
        Just("office rent".to_string()),
        Just("ACH grant payment Feb".to_string()),
        Just("xyz".to_string()),
    ]
}

fn day_strategy() -> impl Strategy<Value = NaiveDate> {
    (1u32..=12).prop_map(|day| NaiveDate::from_ymd_opt(2026, 2, day).unwrap())
}

fn line_strategy() -> impl Strategy<Value = StatementLineView> {
    (
        amount_strategy(),
        day_strategy(),
        reference_strategy(),
        description_strategy(),
        any::<bool>(),
    )
        .prop_map(|(amount, date, reference, description, outflow)| StatementLineView {
            id: StatementLineId::new(),
            amount: if outflow { -amount } else { amount },
            date,
            reference,
            description,
        })
}

fn transaction_strategy() -> impl Strategy<Value = TransactionView> {
    (
        amount_strategy(),
        day_strategy(),
        reference_strategy(),
        description_strategy(),
        prop::bool::weighted(0.2),
    )
        .prop_map(|(amount, date, reference, description, is_reconciled)| TransactionView {
            id: TransactionId::new(),
            amount,
            date,
            reference,
            description,
            is_reconciled,
        })
}

fn lines_strategy() -> impl Strategy<Value = Vec<StatementLineView>> {
    prop::collection::vec(line_strategy(), 0..8)
}

fn transactions_strategy() -> impl Strategy<Value = Vec<TransactionView>> {
    prop::collection::vec(transaction_strategy(), 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* input, each transaction appears in at most one match and
    /// each line is matched at most once.
    #[test]
    fn prop_no_double_use(
        lines in lines_strategy(),
        transactions in transactions_strategy(),
    ) {
        let summary = auto_match_lines(&lines, &transactions, &MatchingConfig::default());

        let mut used_transactions = HashSet::new();
        let mut matched_lines = HashSet::new();
        for m in &summary.matches {
            prop_assert!(used_transactions.insert(m.transaction_id));
            prop_assert!(matched_lines.insert(m.statement_line_id));
        }
    }

    /// *For any* input, the summary counters are consistent with the match
    /// list and the number of lines considered.
    #[test]
    fn prop_counters_consistent(
        lines in lines_strategy(),
        transactions in transactions_strategy(),
    ) {
        let summary = auto_match_lines(&lines, &transactions, &MatchingConfig::default());

        prop_assert_eq!(summary.total, lines.len());
        prop_assert_eq!(
            summary.exact_matches + summary.fuzzy_matches,
            summary.matches.len()
        );
        prop_assert_eq!(
            summary.unmatched,
            summary.total - summary.matches.len()
        );
    }

    /// *For any* proposed match, the paired transaction agrees on amount and
    /// sits inside the date window of the pass that produced the match, and
    /// was not previously reconciled.
    #[test]
    fn prop_matches_respect_windows(
        lines in lines_strategy(),
        transactions in transactions_strategy(),
    ) {
        let config = MatchingConfig::default();
        let summary = auto_match_lines(&lines, &transactions, &config);

        for m in &summary.matches {
            let line = lines
                .iter()
                .find(|l| l.id == m.statement_line_id)
                .expect("match refers to an input line");
            let txn = transactions
                .iter()
                .find(|t| t.id == m.transaction_id)
                .expect("match refers to an input transaction");

            prop_assert!(!txn.is_reconciled);
            prop_assert!((txn.amount - line.amount.abs()).abs() < config.amount_epsilon);
            prop_assert_eq!(m.amount, line.amount.abs());

            let diff_days = (line.date - txn.date).num_days().abs();
            match m.confidence {
                MatchConfidence::AutoExact => {
                    prop_assert!(diff_days <= config.exact_date_tolerance_days);
                }
                MatchConfidence::AutoFuzzy => {
                    prop_assert!(diff_days <= config.fuzzy_date_tolerance_days);
                }
                MatchConfidence::Manual => prop_assert!(false, "auto run produced MANUAL"),
            }
        }
    }

    /// *For any* input, repeated runs propose identical matches.
    #[test]
    fn prop_matching_is_deterministic(
        lines in lines_strategy(),
        transactions in transactions_strategy(),
    ) {
        let config = MatchingConfig::default();
        let first = auto_match_lines(&lines, &transactions, &config);
        let second = auto_match_lines(&lines, &transactions, &config);
        prop_assert_eq!(first, second);
    }
}
