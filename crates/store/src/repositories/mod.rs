//! Repositories: the only write path into the store.
//!
//! Every repository mutation goes through [`LedgerStore::transact`]
//! (crate-private), so multi-record effects commit together or not at
//! all, and every write appends versions instead of editing rows.
//!
//! [`LedgerStore::transact`]: crate::store::LedgerStore

pub mod account;
pub mod fiscal;
pub mod organization;
pub mod reconciliation;
pub mod transaction;

pub use account::{
    AccountError, AccountFilter, AccountRepository, CreateAccountInput, UpdateAccountInput,
};
pub use fiscal::{CreatePeriodInput, FiscalError, FiscalRepository};
pub use organization::{OrganizationError, OrganizationRepository};
pub use reconciliation::{
    CompletionSummary, ImportLineInput, ImportStatementInput, ReconciliationError,
    ReconciliationRepository,
};
pub use transaction::{
    PostTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
};
