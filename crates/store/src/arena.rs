//! Append-only version arena.
//!
//! One arena holds the full version history of one entity type. Rows are
//! never removed or rewritten; every change appends a successor version
//! and closes the temporal intervals of the one it replaces.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use steward_shared::{ActorId, VersionId};

use crate::error::StoreError;
use crate::version::{Entity, Versioned};

/// Version chains keyed by logical id, with a secondary index from
/// version id to its position.
///
/// Chains are kept in append order, which is also system-time order.
/// Iteration over logical ids is ordered, so read APIs built on the
/// arena are deterministic.
#[derive(Debug, Clone)]
pub struct VersionArena<T: Entity> {
    versions: BTreeMap<T::Id, Vec<Versioned<T>>>,
    by_version: HashMap<VersionId, (T::Id, usize)>,
}

impl<T: Entity> Default for VersionArena<T> {
    fn default() -> Self {
        Self {
            versions: BTreeMap::new(),
            by_version: HashMap::new(),
        }
    }
}

impl<T: Entity> VersionArena<T> {
    /// Starts a version chain for a new record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] when the logical id already
    /// has a chain, even one ending in a soft deletion.
    pub fn insert_first(
        &mut self,
        entity: T,
        actor: ActorId,
        now: DateTime<Utc>,
    ) -> Result<&Versioned<T>, StoreError> {
        let id = entity.id();
        if self.versions.contains_key(&id) {
            return Err(StoreError::AlreadyExists {
                entity: T::NAME,
                id: id.to_string(),
            });
        }
        let version = Versioned::first(entity, actor, now);
        self.by_version.insert(version.version_id, (id, 0));
        let chain = self.versions.entry(id).or_default();
        chain.push(version);
        Ok(&chain[0])
    }

    /// Applies `mutate` to a copy of the current payload and appends the
    /// result as the new current version.
    ///
    /// The superseded version has both of its intervals closed at `now`
    /// in the same step, so the chain never holds two current versions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the record has no current
    /// version, including after a soft deletion.
    pub fn update<F>(
        &mut self,
        id: T::Id,
        actor: ActorId,
        now: DateTime<Utc>,
        mutate: F,
    ) -> Result<&Versioned<T>, StoreError>
    where
        F: FnOnce(&mut T),
    {
        let chain = self
            .versions
            .get_mut(&id)
            .ok_or_else(|| Self::not_found(id))?;
        let current_index = chain
            .iter()
            .rposition(Versioned::is_current)
            .ok_or_else(|| Self::not_found(id))?;

        let mut entity = chain[current_index].entity.clone();
        mutate(&mut entity);

        let next = chain[current_index].successor(entity, actor, now);
        chain[current_index].close(now);
        let next_index = chain.len();
        self.by_version.insert(next.version_id, (id, next_index));
        chain.push(next);
        Ok(&chain[next_index])
    }

    /// Appends a deletion marker version and closes the current one.
    ///
    /// The record keeps its full history but stops having a current
    /// version, so reads and further updates treat it as gone.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the record has no current
    /// version.
    pub fn soft_delete(
        &mut self,
        id: T::Id,
        actor: ActorId,
        now: DateTime<Utc>,
    ) -> Result<&Versioned<T>, StoreError> {
        let chain = self
            .versions
            .get_mut(&id)
            .ok_or_else(|| Self::not_found(id))?;
        let current_index = chain
            .iter()
            .rposition(Versioned::is_current)
            .ok_or_else(|| Self::not_found(id))?;

        let marker = chain[current_index].deletion(actor, now);
        chain[current_index].close(now);
        let marker_index = chain.len();
        self.by_version.insert(marker.version_id, (id, marker_index));
        chain.push(marker);
        Ok(&chain[marker_index])
    }

    /// Returns the single current version of a record, if it has one.
    #[must_use]
    pub fn current(&self, id: T::Id) -> Option<&Versioned<T>> {
        self.versions
            .get(&id)?
            .iter()
            .rev()
            .find(|version| version.is_current())
    }

    /// Like [`current`](Self::current) but maps absence to an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no current version exists.
    pub fn require_current(&self, id: T::Id) -> Result<&Versioned<T>, StoreError> {
        self.current(id).ok_or_else(|| Self::not_found(id))
    }

    /// Iterates the current versions of all live records in id order.
    pub fn current_all(&self) -> impl Iterator<Item = &Versioned<T>> {
        self.versions
            .values()
            .filter_map(|chain| chain.iter().rev().find(|version| version.is_current()))
    }

    /// Returns the full version history of a record, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no chain exists for the id.
    pub fn history(&self, id: T::Id) -> Result<Vec<&Versioned<T>>, StoreError> {
        let chain = self.versions.get(&id).ok_or_else(|| Self::not_found(id))?;
        Ok(chain.iter().rev().collect())
    }

    /// Returns the version that was business-effective at `at` under the
    /// currently recorded belief.
    #[must_use]
    pub fn as_of(&self, id: T::Id, at: DateTime<Utc>) -> Option<&Versioned<T>> {
        self.versions
            .get(&id)?
            .iter()
            .rev()
            .find(|version| version.was_effective_at(at))
    }

    /// Resolves a specific version row by its version id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VersionNotFound`] for unknown version ids.
    pub fn get_version(&self, version_id: VersionId) -> Result<&Versioned<T>, StoreError> {
        let (id, index) = self
            .by_version
            .get(&version_id)
            .ok_or(StoreError::VersionNotFound(version_id))?;
        self.versions
            .get(id)
            .and_then(|chain| chain.get(*index))
            .ok_or(StoreError::VersionNotFound(version_id))
    }

    /// Returns true when a chain exists for the id, deleted or not.
    #[must_use]
    pub fn contains(&self, id: T::Id) -> bool {
        self.versions.contains_key(&id)
    }

    fn not_found(id: T::Id) -> StoreError {
        StoreError::NotFound {
            entity: T::NAME,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steward_shared::AccountId;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    struct Widget {
        id: AccountId,
        label: String,
    }

    impl Entity for Widget {
        type Id = AccountId;
        const NAME: &'static str = "widget";

        fn id(&self) -> AccountId {
            self.id
        }
    }

    fn widget(raw: u128, label: &str) -> Widget {
        Widget {
            id: AccountId::from_uuid(Uuid::from_u128(raw)),
            label: label.to_string(),
        }
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn actor() -> ActorId {
        ActorId::from_uuid(Uuid::from_u128(0xA1))
    }

    #[test]
    fn test_insert_first_opens_both_intervals() {
        let mut arena = VersionArena::default();
        let created = arena
            .insert_first(widget(1, "cash"), actor(), ts(100))
            .unwrap();

        assert!(created.is_current());
        assert_eq!(created.previous_version_id, None);
        assert_eq!(created.valid_from, ts(100));
        assert_eq!(created.system_from, ts(100));
        assert!(!created.is_deleted);
    }

    #[test]
    fn test_insert_duplicate_id_rejected() {
        let mut arena = VersionArena::default();
        arena
            .insert_first(widget(1, "cash"), actor(), ts(100))
            .unwrap();

        let err = arena
            .insert_first(widget(1, "cash again"), actor(), ts(200))
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[test]
    fn test_update_closes_predecessor_and_links_chain() {
        let mut arena = VersionArena::default();
        let id = widget(1, "cash").id;
        let first_version = arena
            .insert_first(widget(1, "cash"), actor(), ts(100))
            .unwrap()
            .version_id;

        let updated = arena
            .update(id, actor(), ts(200), |w| w.label = "petty cash".to_string())
            .unwrap();
        assert_eq!(updated.entity.label, "petty cash");
        assert_eq!(updated.previous_version_id, Some(first_version));

        let history = arena.history(id).unwrap();
        assert_eq!(history.len(), 2);
        // Newest first.
        assert_eq!(history[0].entity.label, "petty cash");
        assert_eq!(history[1].entity.label, "cash");
        assert_eq!(history[1].valid_to, ts(200));
        assert_eq!(history[1].system_to, ts(200));
        assert!(!history[1].is_current());
    }

    #[test]
    fn test_exactly_one_current_version_after_many_updates() {
        let mut arena = VersionArena::default();
        let id = widget(1, "v0").id;
        arena.insert_first(widget(1, "v0"), actor(), ts(100)).unwrap();
        for step in 1..=5 {
            arena
                .update(id, actor(), ts(100 + step), |w| {
                    w.label = format!("v{step}");
                })
                .unwrap();
        }

        let history = arena.history(id).unwrap();
        assert_eq!(history.len(), 6);
        let current_count = history.iter().filter(|v| v.is_current()).count();
        assert_eq!(current_count, 1);
        assert_eq!(arena.current(id).unwrap().entity.label, "v5");
    }

    #[test]
    fn test_soft_delete_removes_record_from_reads() {
        let mut arena = VersionArena::default();
        let id = widget(1, "cash").id;
        arena.insert_first(widget(1, "cash"), actor(), ts(100)).unwrap();

        let marker = arena.soft_delete(id, actor(), ts(200)).unwrap();
        assert!(marker.is_deleted);
        assert_eq!(marker.deleted_at, Some(ts(200)));
        assert_eq!(marker.deleted_by, Some(actor()));

        assert!(arena.current(id).is_none());
        assert!(arena.contains(id));
        let err = arena.update(id, actor(), ts(300), |_| ()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        // History keeps both the closed version and the marker.
        assert_eq!(arena.history(id).unwrap().len(), 2);
    }

    #[test]
    fn test_as_of_answers_from_current_belief_only() {
        let mut arena = VersionArena::default();
        let id = widget(1, "cash").id;
        arena.insert_first(widget(1, "cash"), actor(), ts(100)).unwrap();

        assert!(arena.as_of(id, ts(50)).is_none());
        assert_eq!(arena.as_of(id, ts(150)).unwrap().entity.label, "cash");

        arena
            .update(id, actor(), ts(200), |w| w.label = "petty cash".to_string())
            .unwrap();

        // Superseding a version closes its system interval, so the old
        // payload is no longer part of any as-of answer.
        assert!(arena.as_of(id, ts(150)).is_none());
        assert_eq!(
            arena.as_of(id, ts(250)).unwrap().entity.label,
            "petty cash"
        );
        // The close instant itself belongs to the successor.
        assert_eq!(
            arena.as_of(id, ts(200)).unwrap().entity.label,
            "petty cash"
        );
    }

    #[test]
    fn test_get_version_resolves_every_row() {
        let mut arena = VersionArena::default();
        let id = widget(1, "cash").id;
        let v1 = arena
            .insert_first(widget(1, "cash"), actor(), ts(100))
            .unwrap()
            .version_id;
        let v2 = arena
            .update(id, actor(), ts(200), |w| w.label = "petty cash".to_string())
            .unwrap()
            .version_id;

        assert_eq!(arena.get_version(v1).unwrap().entity.label, "cash");
        assert_eq!(arena.get_version(v2).unwrap().entity.label, "petty cash");

        let missing = VersionId::new();
        assert!(matches!(
            arena.get_version(missing).unwrap_err(),
            StoreError::VersionNotFound(_)
        ));
    }

    #[test]
    fn test_current_all_iterates_in_id_order() {
        let mut arena = VersionArena::default();
        arena.insert_first(widget(3, "c"), actor(), ts(100)).unwrap();
        arena.insert_first(widget(1, "a"), actor(), ts(100)).unwrap();
        arena.insert_first(widget(2, "b"), actor(), ts(100)).unwrap();
        arena
            .soft_delete(widget(2, "b").id, actor(), ts(200))
            .unwrap();

        let labels: Vec<_> = arena
            .current_all()
            .map(|v| v.entity.label.clone())
            .collect();
        assert_eq!(labels, vec!["a", "c"]);
    }
}
