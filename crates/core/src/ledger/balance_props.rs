//! Property-based tests for the balance sign rule and posting arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::{apply_posting, calculate_new_balance, reverse_posting};
use super::types::{AccountCategory, NormalBalance};

/// Strategy to generate a balance (may be negative).
fn any_balance() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a positive posting amount.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate an account category.
fn category_strategy() -> impl Strategy<Value = AccountCategory> {
    prop_oneof![
        Just(AccountCategory::Asset),
        Just(AccountCategory::Liability),
        Just(AccountCategory::Equity),
        Just(AccountCategory::Revenue),
        Just(AccountCategory::Expense),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A debit grows exactly the debit-normal categories.
    ///
    /// *For any* category and balance, a debit increases the balance when
    /// the category is debit-normal and decreases it otherwise, always by
    /// exactly the posted amount.
    #[test]
    fn prop_debit_follows_normal_side(
        category in category_strategy(),
        balance in any_balance(),
        amount in positive_amount(),
    ) {
        let new_balance = calculate_new_balance(balance, amount, category, true);
        let expected = match category.normal_balance() {
            NormalBalance::Debit => balance + amount,
            NormalBalance::Credit => balance - amount,
        };
        prop_assert_eq!(new_balance, expected);
    }

    /// A credit is the mirror image of a debit.
    ///
    /// *For any* category, balance, and amount, debit and credit move the
    /// balance by equal and opposite deltas.
    #[test]
    fn prop_credit_mirrors_debit(
        category in category_strategy(),
        balance in any_balance(),
        amount in positive_amount(),
    ) {
        let debited = calculate_new_balance(balance, amount, category, true);
        let credited = calculate_new_balance(balance, amount, category, false);
        prop_assert_eq!(debited - balance, balance - credited);
    }

    /// Applying amounts a then b equals applying a + b.
    #[test]
    fn prop_balance_application_is_additive(
        category in category_strategy(),
        balance in any_balance(),
        a in positive_amount(),
        b in positive_amount(),
        is_debit in any::<bool>(),
    ) {
        let stepped = calculate_new_balance(
            calculate_new_balance(balance, a, category, is_debit),
            b,
            category,
            is_debit,
        );
        let combined = calculate_new_balance(balance, a + b, category, is_debit);
        prop_assert_eq!(stepped, combined);
    }

    /// Apply-then-reverse restores both balances exactly.
    ///
    /// *For any* pair of account categories, starting balances, and amount,
    /// `reverse_posting` undoes `apply_posting` with no residue.
    #[test]
    fn prop_reverse_restores_original_balances(
        debit_category in category_strategy(),
        credit_category in category_strategy(),
        debit_balance in any_balance(),
        credit_balance in any_balance(),
        amount in positive_amount(),
    ) {
        let posted = apply_posting(
            debit_balance,
            debit_category,
            credit_balance,
            credit_category,
            amount,
        );
        let reversed = reverse_posting(
            posted.debit_balance,
            debit_category,
            posted.credit_balance,
            credit_category,
            amount,
        );

        prop_assert_eq!(reversed.debit_balance, debit_balance);
        prop_assert_eq!(reversed.credit_balance, credit_balance);
    }

    /// A posting never creates or destroys money.
    ///
    /// *For any* posting, the debit-side delta and credit-side delta are
    /// each exactly the posted amount in magnitude.
    #[test]
    fn prop_posting_moves_exact_amount(
        debit_category in category_strategy(),
        credit_category in category_strategy(),
        debit_balance in any_balance(),
        credit_balance in any_balance(),
        amount in positive_amount(),
    ) {
        let posted = apply_posting(
            debit_balance,
            debit_category,
            credit_balance,
            credit_category,
            amount,
        );

        prop_assert_eq!((posted.debit_balance - debit_balance).abs(), amount);
        prop_assert_eq!((posted.credit_balance - credit_balance).abs(), amount);
    }
}
