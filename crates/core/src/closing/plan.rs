//! Closing entry computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use steward_shared::AccountId;

use crate::ledger::{AccountCategory, AccountSnapshot};

/// One leg pair that zeroes a temporary account into fund balance.
///
/// Revenue accounts close by debiting the revenue account and crediting
/// fund balance; expense accounts close by debiting fund balance and
/// crediting the expense account. An account carrying a balance on the
/// wrong side of its normal (a contra balance) closes with the legs
/// swapped, since transaction amounts are always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingEntry {
    /// The temporary account being zeroed.
    pub account_id: AccountId,
    /// Its code, used for ordering and display.
    pub account_code: String,
    /// Its name, used in the entry description.
    pub account_name: String,
    /// Revenue or Expense.
    pub category: AccountCategory,
    /// Positive amount to post.
    pub amount: Decimal,
    /// Debit leg of the closing transaction.
    pub debit_account_id: AccountId,
    /// Credit leg of the closing transaction.
    pub credit_account_id: AccountId,
    /// Description for the created transaction.
    pub description: String,
}

/// Everything a close would do, without doing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingPreview {
    /// Entries in account code order.
    pub entries: Vec<ClosingEntry>,
    /// Sum of revenue account balances (signed).
    pub total_revenue: Decimal,
    /// Sum of expense account balances (signed).
    pub total_expenses: Decimal,
    /// Surplus (positive) or deficit (negative) moved into fund balance.
    pub net_result: Decimal,
}

impl ClosingPreview {
    /// Returns true when there is nothing to close.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Computes the closing entries for one period.
///
/// Considers every active revenue or expense account with a non-zero
/// balance, in account code order. The result is deterministic for a given
/// account list.
#[must_use]
pub fn plan_close(accounts: &[AccountSnapshot], fund_balance_account_id: AccountId) -> ClosingPreview {
    let mut to_close: Vec<&AccountSnapshot> = accounts
        .iter()
        .filter(|account| {
            account.is_active
                && account.category.is_temporary()
                && account.balance != Decimal::ZERO
        })
        .collect();
    to_close.sort_by(|a, b| a.code.cmp(&b.code));

    let mut entries = Vec::with_capacity(to_close.len());
    let mut total_revenue = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;

    for account in to_close {
        let is_revenue = account.category == AccountCategory::Revenue;
        if is_revenue {
            total_revenue += account.balance;
        } else {
            total_expenses += account.balance;
        }

        // A normal-side balance closes toward fund balance; a contra
        // balance swaps the legs so the posted amount stays positive.
        let account_takes_debit = is_revenue == (account.balance > Decimal::ZERO);
        let (debit_account_id, credit_account_id) = if account_takes_debit {
            (account.id, fund_balance_account_id)
        } else {
            (fund_balance_account_id, account.id)
        };

        entries.push(ClosingEntry {
            account_id: account.id,
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            category: account.category,
            amount: account.balance.abs(),
            debit_account_id,
            credit_account_id,
            description: format!("Close {} - {}", account.code, account.name),
        });
    }

    ClosingPreview {
        entries,
        total_revenue,
        total_expenses,
        net_result: total_revenue - total_expenses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account(
        code: &str,
        category: AccountCategory,
        balance: Decimal,
        is_active: bool,
    ) -> AccountSnapshot {
        AccountSnapshot {
            id: AccountId::new(),
            code: code.to_string(),
            name: format!("Account {code}"),
            category,
            balance,
            is_active,
        }
    }

    #[test]
    fn test_revenue_and_expense_close_toward_fund_balance() {
        let fund = AccountId::new();
        let revenue = account("4000", AccountCategory::Revenue, dec!(2000.00), true);
        let expense = account("5000", AccountCategory::Expense, dec!(500.00), true);

        let preview = plan_close(&[revenue.clone(), expense.clone()], fund);

        assert_eq!(preview.entries.len(), 2);
        assert_eq!(preview.total_revenue, dec!(2000.00));
        assert_eq!(preview.total_expenses, dec!(500.00));
        assert_eq!(preview.net_result, dec!(1500.00));

        let rev_entry = &preview.entries[0];
        assert_eq!(rev_entry.debit_account_id, revenue.id);
        assert_eq!(rev_entry.credit_account_id, fund);
        assert_eq!(rev_entry.amount, dec!(2000.00));

        let exp_entry = &preview.entries[1];
        assert_eq!(exp_entry.debit_account_id, fund);
        assert_eq!(exp_entry.credit_account_id, expense.id);
        assert_eq!(exp_entry.amount, dec!(500.00));
    }

    #[test]
    fn test_skips_inactive_zero_and_permanent_accounts() {
        let fund = AccountId::new();
        let accounts = vec![
            account("1000", AccountCategory::Asset, dec!(9000.00), true),
            account("3000", AccountCategory::Equity, dec!(4000.00), true),
            account("4000", AccountCategory::Revenue, Decimal::ZERO, true),
            account("4100", AccountCategory::Revenue, dec!(100.00), false),
            account("5000", AccountCategory::Expense, dec!(250.00), true),
        ];

        let preview = plan_close(&accounts, fund);

        assert_eq!(preview.entries.len(), 1);
        assert_eq!(preview.entries[0].account_code, "5000");
        assert_eq!(preview.total_revenue, Decimal::ZERO);
    }

    #[test]
    fn test_entries_ordered_by_account_code() {
        let fund = AccountId::new();
        let accounts = vec![
            account("5200", AccountCategory::Expense, dec!(10.00), true),
            account("4100", AccountCategory::Revenue, dec!(20.00), true),
            account("5100", AccountCategory::Expense, dec!(30.00), true),
        ];

        let preview = plan_close(&accounts, fund);

        let codes: Vec<&str> = preview
            .entries
            .iter()
            .map(|entry| entry.account_code.as_str())
            .collect();
        assert_eq!(codes, vec!["4100", "5100", "5200"]);
    }

    #[test]
    fn test_contra_balance_swaps_legs() {
        let fund = AccountId::new();
        // A refund-heavy revenue account with a debit (negative) balance.
        let contra = account("4900", AccountCategory::Revenue, dec!(-150.00), true);

        let preview = plan_close(&[contra.clone()], fund);

        let entry = &preview.entries[0];
        assert_eq!(entry.debit_account_id, fund);
        assert_eq!(entry.credit_account_id, contra.id);
        assert_eq!(entry.amount, dec!(150.00));
        assert_eq!(preview.total_revenue, dec!(-150.00));
        assert_eq!(preview.net_result, dec!(-150.00));
    }

    #[test]
    fn test_empty_plan() {
        let preview = plan_close(&[], AccountId::new());
        assert!(preview.is_empty());
        assert_eq!(preview.net_result, Decimal::ZERO);
    }
}
