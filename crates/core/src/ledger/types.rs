//! Ledger domain types.
//!
//! This module defines the account classification and transaction
//! vocabulary used throughout the double-entry bookkeeping system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use steward_shared::AccountId;

/// The side of the ledger on which an account's balance grows.
///
/// In double-entry bookkeeping:
/// - Debit-normal accounts (asset, expense) increase on debit, decrease on credit
/// - Credit-normal accounts (liability, equity, revenue) increase on credit, decrease on debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Balance grows when debited.
    Debit,
    /// Balance grows when credited.
    Credit,
}

/// Account classification.
///
/// The category fixes both the sign rule for balance mutation and whether
/// the account is zeroed out at fiscal year end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountCategory {
    /// Resources owned (cash, receivables, equipment).
    Asset,
    /// Obligations owed (payables, loans).
    Liability,
    /// Net worth, including the fund balance account.
    Equity,
    /// Income earned during the period.
    Revenue,
    /// Costs incurred during the period.
    Expense,
}

impl AccountCategory {
    /// Returns the side on which this category's balance grows.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true for accounts that are zeroed into equity at period close.
    #[must_use]
    pub const fn is_temporary(self) -> bool {
        matches!(self, Self::Revenue | Self::Expense)
    }

    /// Returns true for balance sheet accounts that carry across periods.
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        !self.is_temporary()
    }
}

/// Transaction classification.
///
/// Categorizes transactions for reporting and lifecycle purposes. Closing
/// entries are the only kind the core itself creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Money coming in (donations, grants, sales).
    Income,
    /// Money going out (bills, payroll).
    Expense,
    /// Movement between two accounts of the same organization.
    Transfer,
    /// Manual correction entry.
    Adjustment,
    /// Initial balance load for a new account.
    OpeningBalance,
    /// Period-end entry zeroing a temporary account into fund balance.
    Closing,
}

impl TransactionKind {
    /// Returns true for entries created by the fiscal period closer.
    #[must_use]
    pub const fn is_closing(self) -> bool {
        matches!(self, Self::Closing)
    }
}

/// A read-only view of an account's current state.
///
/// Callers materialize these from the store's current versions; the pure
/// closing and reporting computations consume them without touching
/// storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// The logical account id.
    pub id: AccountId,
    /// Account code, unique within the organization.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Classification driving the sign rule.
    pub category: AccountCategory,
    /// Cached running balance.
    pub balance: Decimal,
    /// Whether the account accepts new postings.
    pub is_active: bool,
}
