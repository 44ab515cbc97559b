//! Bitemporal version records.
//!
//! A [`Versioned<T>`] wraps one entity payload with the temporal and
//! deletion bookkeeping shared by every versioned entity. The serialized
//! field names (`validFrom`, `validTo`, `systemFrom`, `systemTo`,
//! `isDeleted`) are a stable on-disk contract.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use steward_shared::{ActorId, VersionId};

/// Milliseconds of `9999-12-31T23:59:59.999Z`.
const MAX_DATE_MILLIS: i64 = 253_402_300_799_999;

/// Far-future sentinel marking a temporal interval as still open.
#[must_use]
pub fn max_date() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(MAX_DATE_MILLIS).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// A payload that can be stored as a chain of versions.
///
/// The logical id is stable across all versions of one record; the arena
/// keys its history by it.
pub trait Entity: Clone {
    /// Stable logical identifier type.
    type Id: Copy + Eq + Ord + Hash + Display + Debug;

    /// Entity name used in error messages and logs.
    const NAME: &'static str;

    /// Returns the logical id shared by all versions of this record.
    fn id(&self) -> Self::Id;
}

/// One stored version of an entity.
///
/// Business fields live in the flattened payload and never change on a
/// stored row; only the temporal close performed by the arena touches a
/// row after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Versioned<T> {
    /// Unique identifier of this specific version row.
    pub version_id: VersionId,
    /// The version this one supersedes, if any.
    pub previous_version_id: Option<VersionId>,
    /// Start of business effectivity.
    pub valid_from: DateTime<Utc>,
    /// End of business effectivity; the max-date sentinel while in effect.
    pub valid_to: DateTime<Utc>,
    /// When this version became the recorded truth.
    pub system_from: DateTime<Utc>,
    /// When it stopped being the recorded truth; sentinel while current.
    pub system_to: DateTime<Utc>,
    /// Soft-deletion marker.
    pub is_deleted: bool,
    /// When the record was soft-deleted, if it was.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Who soft-deleted it.
    pub deleted_by: Option<ActorId>,
    /// Actor responsible for this version.
    pub changed_by: ActorId,
    /// The entity payload.
    #[serde(flatten)]
    pub entity: T,
}

impl<T: Entity> Versioned<T> {
    /// Builds the first version of a record: no predecessor, both
    /// intervals open-ended.
    pub(crate) fn first(entity: T, actor: ActorId, now: DateTime<Utc>) -> Self {
        Self {
            version_id: VersionId::new(),
            previous_version_id: None,
            valid_from: now,
            valid_to: max_date(),
            system_from: now,
            system_to: max_date(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            changed_by: actor,
            entity,
        }
    }

    /// Builds the successor version carrying a changed payload.
    pub(crate) fn successor(&self, entity: T, actor: ActorId, now: DateTime<Utc>) -> Self {
        Self {
            version_id: VersionId::new(),
            previous_version_id: Some(self.version_id),
            valid_from: now,
            valid_to: max_date(),
            system_from: now,
            system_to: max_date(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            changed_by: actor,
            entity,
        }
    }

    /// Builds the successor version that soft-deletes the record.
    pub(crate) fn deletion(&self, actor: ActorId, now: DateTime<Utc>) -> Self {
        Self {
            version_id: VersionId::new(),
            previous_version_id: Some(self.version_id),
            valid_from: now,
            valid_to: max_date(),
            system_from: now,
            system_to: max_date(),
            is_deleted: true,
            deleted_at: Some(now),
            deleted_by: Some(actor),
            changed_by: actor,
            entity: self.entity.clone(),
        }
    }

    /// Closes both temporal intervals at `now`.
    ///
    /// This is the only mutation ever applied to a stored row.
    pub(crate) fn close(&mut self, now: DateTime<Utc>) {
        self.valid_to = now;
        self.system_to = now;
    }

    /// Returns true while this version is the single current one.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.valid_to == max_date() && self.system_to == max_date() && !self.is_deleted
    }

    /// Returns true when this version was business-effective at `at` and
    /// is still part of the recorded belief.
    ///
    /// Valid-time intervals are half-open: a version closed at instant `t`
    /// is no longer effective at `t` itself.
    #[must_use]
    pub fn was_effective_at(&self, at: DateTime<Utc>) -> bool {
        self.system_to == max_date() && self.valid_from <= at && at < self.valid_to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SecondsFormat;

    #[test]
    fn test_max_date_sentinel_value() {
        assert_eq!(
            max_date().to_rfc3339_opts(SecondsFormat::Millis, true),
            "9999-12-31T23:59:59.999Z"
        );
    }

    #[test]
    fn test_sentinel_is_far_future() {
        assert!(max_date() > Utc::now());
    }
}
