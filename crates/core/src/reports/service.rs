//! Balance summary computation.

use rust_decimal::Decimal;

use super::types::BalanceSummary;
use crate::ledger::{AccountCategory, AccountSnapshot};

/// Sums account balances by category.
///
/// Every provided snapshot participates; callers wanting active-only
/// figures filter before the call.
#[must_use]
pub fn summarize_accounts(accounts: &[AccountSnapshot]) -> BalanceSummary {
    let mut summary = BalanceSummary {
        total_assets: Decimal::ZERO,
        total_liabilities: Decimal::ZERO,
        total_equity: Decimal::ZERO,
        total_revenue: Decimal::ZERO,
        total_expenses: Decimal::ZERO,
        net_income: Decimal::ZERO,
    };

    for account in accounts {
        match account.category {
            AccountCategory::Asset => summary.total_assets += account.balance,
            AccountCategory::Liability => summary.total_liabilities += account.balance,
            AccountCategory::Equity => summary.total_equity += account.balance,
            AccountCategory::Revenue => summary.total_revenue += account.balance,
            AccountCategory::Expense => summary.total_expenses += account.balance,
        }
    }

    summary.net_income = summary.total_revenue - summary.total_expenses;
    summary
}
