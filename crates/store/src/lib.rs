//! Bitemporal versioned storage for Steward.
//!
//! Every entity is stored as an append-only chain of versions carrying
//! both business effectivity (`valid_from`/`valid_to`) and system
//! knowledge (`system_from`/`system_to`) intervals. Business fields of a
//! stored row are never edited in place: each change closes the current
//! version and appends a successor, and deletion appends a marker
//! version instead of removing anything.
//!
//! Repositories are the public surface. Each mutating operation runs as
//! one all-or-nothing store transaction, so a posting and its two
//! balance updates, or a period close and its closing transactions,
//! always land together.

pub mod arena;
pub mod entities;
pub mod error;
pub mod repositories;
pub mod store;
pub mod version;

#[cfg(test)]
mod arena_props;

pub use arena::VersionArena;
pub use entities::StatementStatus;
pub use error::StoreError;
pub use repositories::{
    AccountError, AccountFilter, AccountRepository, CompletionSummary, CreateAccountInput,
    CreatePeriodInput, FiscalError, FiscalRepository, ImportLineInput, ImportStatementInput,
    OrganizationError, OrganizationRepository, PostTransactionInput, ReconciliationError,
    ReconciliationRepository, TransactionError, TransactionFilter, TransactionRepository,
    UpdateAccountInput,
};
pub use store::{LedgerStore, StoreInner};
pub use version::{max_date, Entity, Versioned};
