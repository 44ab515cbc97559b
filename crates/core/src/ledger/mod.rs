//! Double-entry bookkeeping logic.
//!
//! This module implements the ledger arithmetic:
//! - Account categories and their normal balance side
//! - The sign rule for applying a debit or credit to a balance
//! - Paired posting application and its exact inverse
//! - Posting validation and error types

pub mod balance;
pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;

pub use balance::{apply_posting, calculate_new_balance, reverse_posting, PostedBalances};
pub use error::LedgerError;
pub use types::{AccountCategory, AccountSnapshot, NormalBalance, TransactionKind};
pub use validation::validate_posting;
