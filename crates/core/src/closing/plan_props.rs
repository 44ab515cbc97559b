//! Property-based tests for closing entry computation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use steward_shared::AccountId;

use super::plan::plan_close;
use crate::ledger::{calculate_new_balance, AccountCategory, AccountSnapshot};

fn category_strategy() -> impl Strategy<Value = AccountCategory> {
    prop_oneof![
        Just(AccountCategory::Asset),
        Just(AccountCategory::Liability),
        Just(AccountCategory::Equity),
        Just(AccountCategory::Revenue),
        Just(AccountCategory::Expense),
    ]
}

fn account_strategy() -> impl Strategy<Value = AccountSnapshot> {
    (
        category_strategy(),
        -10_000_000i64..10_000_000i64,
        100u32..999u32,
        prop::bool::weighted(0.9),
    )
        .prop_map(|(category, cents, code, is_active)| AccountSnapshot {
            id: AccountId::new(),
            code: code.to_string(),
            name: format!("Account {code}"),
            category,
            balance: Decimal::new(cents, 2),
            is_active,
        })
}

fn accounts_strategy() -> impl Strategy<Value = Vec<AccountSnapshot>> {
    prop::collection::vec(account_strategy(), 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* account list, every planned entry posts a positive amount
    /// between the closed account and the fund balance account.
    #[test]
    fn prop_entries_are_positive_fund_balance_postings(
        accounts in accounts_strategy(),
    ) {
        let fund = AccountId::new();
        let preview = plan_close(&accounts, fund);

        for entry in &preview.entries {
            prop_assert!(entry.amount > Decimal::ZERO);
            let legs = [entry.debit_account_id, entry.credit_account_id];
            prop_assert!(legs.contains(&fund));
            prop_assert!(legs.contains(&entry.account_id));
            prop_assert_ne!(entry.debit_account_id, entry.credit_account_id);
        }
    }

    /// *For any* account list, exactly the active temporary accounts with
    /// non-zero balances are planned, each once, in code order.
    #[test]
    fn prop_plan_covers_temporary_accounts_in_code_order(
        accounts in accounts_strategy(),
    ) {
        let preview = plan_close(&accounts, AccountId::new());

        let expected = accounts
            .iter()
            .filter(|a| a.is_active && a.category.is_temporary() && a.balance != Decimal::ZERO)
            .count();
        prop_assert_eq!(preview.entries.len(), expected);

        for window in preview.entries.windows(2) {
            prop_assert!(window[0].account_code <= window[1].account_code);
        }

        let mut seen = std::collections::HashSet::new();
        for entry in &preview.entries {
            prop_assert!(seen.insert(entry.account_id));
        }
    }

    /// *For any* account list, applying each entry's leg to its account
    /// zeroes the account, and the fund balance moves by exactly the net
    /// result.
    #[test]
    fn prop_entries_zero_accounts_and_move_net_into_fund(
        accounts in accounts_strategy(),
    ) {
        let fund = AccountId::new();
        let preview = plan_close(&accounts, fund);

        let mut fund_delta = Decimal::ZERO;
        for entry in &preview.entries {
            let account = accounts
                .iter()
                .find(|a| a.id == entry.account_id)
                .expect("entry refers to an input account");

            let account_is_debit_leg = entry.debit_account_id == account.id;
            let closed_balance = calculate_new_balance(
                account.balance,
                entry.amount,
                account.category,
                account_is_debit_leg,
            );
            prop_assert_eq!(closed_balance, Decimal::ZERO);

            // Fund balance is equity (credit-normal).
            let fund_is_debit_leg = entry.debit_account_id == fund;
            fund_delta = calculate_new_balance(
                fund_delta,
                entry.amount,
                AccountCategory::Equity,
                fund_is_debit_leg,
            );
        }

        prop_assert_eq!(fund_delta, preview.net_result);
        prop_assert_eq!(
            preview.net_result,
            preview.total_revenue - preview.total_expenses
        );
    }

    /// *For any* account list, planning twice gives identical previews.
    #[test]
    fn prop_plan_is_deterministic(accounts in accounts_strategy()) {
        let fund = AccountId::new();
        prop_assert_eq!(plan_close(&accounts, fund), plan_close(&accounts, fund));
    }
}
