//! Arena-level storage errors.

use steward_shared::{ErrorKind, VersionId};
use thiserror::Error;

/// Errors raised by the version arenas themselves.
///
/// Repository modules define their own richer error enums and wrap this
/// one with `#[from]`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No current version exists for the requested record.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name.
        entity: &'static str,
        /// Rendered logical id.
        id: String,
    },

    /// A record with this logical id already has a version chain.
    #[error("{entity} already exists: {id}")]
    AlreadyExists {
        /// Entity name.
        entity: &'static str,
        /// Rendered logical id.
        id: String,
    },

    /// No version row carries the requested version id.
    #[error("version not found: {0}")]
    VersionNotFound(VersionId),
}

impl StoreError {
    /// Maps the error onto the shared taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } | Self::VersionNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::InvariantViolation,
        }
    }
}
