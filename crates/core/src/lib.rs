//! Core bookkeeping logic for Steward.
//!
//! This crate contains pure business logic with ZERO storage or web
//! dependencies. Sign conventions, matching heuristics, closing-entry
//! computation, and reporting arithmetic live here; persistence and
//! atomicity are the storage crate's job.
//!
//! # Modules
//!
//! - `ledger` - Double-entry sign rules and posting arithmetic
//! - `reconcile` - Statement line matching (exact and fuzzy passes)
//! - `closing` - Year-end closing entry computation
//! - `reports` - Balance summaries and the balance sheet equation

pub mod closing;
pub mod ledger;
pub mod reconcile;
pub mod reports;
