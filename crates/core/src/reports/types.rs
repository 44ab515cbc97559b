//! Reporting types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use steward_shared::amounts_equal;

/// Category totals across one organization's accounts.
///
/// Balances are in each category's normal-balance convention, so a healthy
/// organization shows positive numbers everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Sum of asset account balances.
    pub total_assets: Decimal,
    /// Sum of liability account balances.
    pub total_liabilities: Decimal,
    /// Sum of equity account balances, before net income.
    pub total_equity: Decimal,
    /// Sum of revenue account balances for the period.
    pub total_revenue: Decimal,
    /// Sum of expense account balances for the period.
    pub total_expenses: Decimal,
    /// `total_revenue - total_expenses`, the synthetic equity line.
    pub net_income: Decimal,
}

impl BalanceSummary {
    /// Equity including current-period net income.
    #[must_use]
    pub fn equity_with_net_income(&self) -> Decimal {
        self.total_equity + self.net_income
    }

    /// Checks the balance sheet equation.
    ///
    /// `assets == liabilities + equity` holds only once equity carries the
    /// not-yet-closed net income as a synthetic line. Sub-cent drift from
    /// imported data is tolerated.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        amounts_equal(
            self.total_assets,
            self.total_liabilities + self.equity_with_net_income(),
        )
    }
}
