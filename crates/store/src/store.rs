//! The shared in-memory store and its transaction boundary.

use std::sync::{Arc, PoisonError, RwLock};

use crate::arena::VersionArena;
use crate::entities::{
    Account, FiscalPeriod, LineMatch, Organization, Statement, StatementLine, Transaction,
};

/// All version arenas behind one lock.
///
/// Repositories compose multi-arena writes against a single
/// [`StoreInner`] so that a posting and its balance effects, or a close
/// and its closing transactions, land together or not at all.
#[derive(Debug, Clone, Default)]
pub struct StoreInner {
    pub(crate) organizations: VersionArena<Organization>,
    pub(crate) accounts: VersionArena<Account>,
    pub(crate) transactions: VersionArena<Transaction>,
    pub(crate) statements: VersionArena<Statement>,
    pub(crate) statement_lines: VersionArena<StatementLine>,
    pub(crate) line_matches: VersionArena<LineMatch>,
    pub(crate) fiscal_periods: VersionArena<FiscalPeriod>,
}

/// Handle to the ledger store, cheap to clone and share across threads.
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl LedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a read against a consistent view of the store.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&StoreInner) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Runs a mutation with all-or-nothing semantics.
    ///
    /// The closure works on a copy of the store taken under the write
    /// lock. On `Ok` the copy replaces the shared state; on `Err` it is
    /// dropped and the store is left exactly as it was.
    pub(crate) fn transact<R, E>(
        &self,
        f: impl FnOnce(&mut StoreInner) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut working = guard.clone();
        let result = f(&mut working);
        if result.is_ok() {
            *guard = working;
        }
        result
    }
}
