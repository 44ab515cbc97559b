//! Posting validation rules.

use rust_decimal::Decimal;
use steward_shared::AccountId;

use super::error::LedgerError;

/// Validates a double-entry posting before it touches any balance.
///
/// # Errors
///
/// Returns [`LedgerError::NonPositiveAmount`] for zero or negative amounts
/// and [`LedgerError::SameAccount`] when both legs name the same account.
pub fn validate_posting(
    debit_account_id: AccountId,
    credit_account_id: AccountId,
    amount: Decimal,
) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }
    if debit_account_id == credit_account_id {
        return Err(LedgerError::SameAccount(debit_account_id));
    }
    Ok(())
}
