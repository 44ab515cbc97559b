//! Balance arithmetic for double-entry postings.
//!
//! All arithmetic is exact `Decimal` math. Negative balances are permitted;
//! whether an overdraft is acceptable is a caller's business decision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{AccountCategory, NormalBalance};

/// Applies one debit or credit to a balance.
///
/// Sign rule: asset and expense accounts increase on debit and decrease on
/// credit; liability, equity, and revenue accounts increase on credit and
/// decrease on debit.
#[must_use]
pub fn calculate_new_balance(
    current_balance: Decimal,
    amount: Decimal,
    category: AccountCategory,
    is_debit: bool,
) -> Decimal {
    let increases = match category.normal_balance() {
        NormalBalance::Debit => is_debit,
        NormalBalance::Credit => !is_debit,
    };

    if increases {
        current_balance + amount
    } else {
        current_balance - amount
    }
}

/// The pair of balances produced by applying or reversing one posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedBalances {
    /// New balance of the account on the debit side of the posting.
    pub debit_balance: Decimal,
    /// New balance of the account on the credit side of the posting.
    pub credit_balance: Decimal,
}

/// Computes both sides of a double-entry posting.
///
/// The debit side is always treated as a debit and the credit side as a
/// credit, independent of either account's category. The category only
/// decides the sign of the effect.
#[must_use]
pub fn apply_posting(
    debit_balance: Decimal,
    debit_category: AccountCategory,
    credit_balance: Decimal,
    credit_category: AccountCategory,
    amount: Decimal,
) -> PostedBalances {
    PostedBalances {
        debit_balance: calculate_new_balance(debit_balance, amount, debit_category, true),
        credit_balance: calculate_new_balance(credit_balance, amount, credit_category, false),
    }
}

/// Computes the exact inverse of [`apply_posting`].
///
/// Applies a credit to the original debit account and a debit to the
/// original credit account, so that apply-then-reverse with identical
/// arguments restores both balances exactly.
#[must_use]
pub fn reverse_posting(
    debit_balance: Decimal,
    debit_category: AccountCategory,
    credit_balance: Decimal,
    credit_category: AccountCategory,
    amount: Decimal,
) -> PostedBalances {
    PostedBalances {
        debit_balance: calculate_new_balance(debit_balance, amount, debit_category, false),
        credit_balance: calculate_new_balance(credit_balance, amount, credit_category, true),
    }
}
