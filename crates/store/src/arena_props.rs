//! Property-based tests for version chain invariants.

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use steward_shared::{AccountId, ActorId};
use uuid::Uuid;

use crate::arena::VersionArena;
use crate::error::StoreError;
use crate::version::Entity;

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

fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn seeded_arena(labels: &[u32]) -> (VersionArena<Widget>, AccountId, ActorId) {
    let actor = ActorId::from_uuid(Uuid::from_u128(0xA1));
    let id = AccountId::from_uuid(Uuid::from_u128(1));
    let mut arena = VersionArena::default();
    arena
        .insert_first(
            Widget {
                id,
                label: "initial".to_string(),
            },
            actor,
            ts(100),
        )
        .unwrap();
    for (step, label) in labels.iter().enumerate() {
        arena
            .update(id, actor, ts(101 + step as i64), |w| {
                w.label = format!("v{label}");
            })
            .unwrap();
    }
    (arena, id, actor)
}

/// Strategy for arbitrary update sequences.
fn label_sequence() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..1000, 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Exactly one current version survives any update sequence.
    ///
    /// *For any* sequence of updates, the chain holds one row per change
    /// plus the original, exactly one row is current, and it carries the
    /// last written payload.
    #[test]
    fn prop_one_current_version_per_chain(labels in label_sequence()) {
        let (arena, id, _) = seeded_arena(&labels);

        let history = arena.history(id).unwrap();
        prop_assert_eq!(history.len(), labels.len() + 1);
        prop_assert_eq!(history.iter().filter(|v| v.is_current()).count(), 1);

        let expected = labels
            .last()
            .map_or_else(|| "initial".to_string(), |label| format!("v{label}"));
        prop_assert_eq!(&arena.current(id).unwrap().entity.label, &expected);
    }

    /// The backward chain is unbroken.
    ///
    /// *For any* sequence of updates, every version except the first names
    /// its immediate predecessor, and superseded rows have both intervals
    /// closed at the instant their successor began.
    #[test]
    fn prop_versions_chain_backward(labels in label_sequence()) {
        let (arena, id, _) = seeded_arena(&labels);

        let history = arena.history(id).unwrap();
        for pair in history.windows(2) {
            prop_assert_eq!(pair[0].previous_version_id, Some(pair[1].version_id));
            prop_assert_eq!(pair[1].valid_to, pair[0].valid_from);
            prop_assert_eq!(pair[1].system_to, pair[0].system_from);
        }
        prop_assert_eq!(history.last().unwrap().previous_version_id, None);
    }

    /// Soft deletion is terminal for reads and writes.
    ///
    /// *For any* prior update sequence, deleting the record removes its
    /// current version, blocks further updates, and keeps every historical
    /// row reachable.
    #[test]
    fn prop_soft_delete_is_terminal(labels in label_sequence()) {
        let (mut arena, id, actor) = seeded_arena(&labels);
        let delete_at = ts(200);

        let marker = arena.soft_delete(id, actor, delete_at).unwrap();
        prop_assert!(marker.is_deleted);
        prop_assert_eq!(marker.deleted_at, Some(delete_at));

        prop_assert!(arena.current(id).is_none());
        prop_assert!(arena.contains(id));
        prop_assert!(
            matches!(
                arena.update(id, actor, ts(300), |_| ()),
                Err(StoreError::NotFound { .. })
            ),
            "update after soft delete must return NotFound"
        );
        prop_assert_eq!(arena.history(id).unwrap().len(), labels.len() + 2);
    }

    /// As-of queries answer from the present belief.
    ///
    /// *For any* update sequence, a query after the last change returns
    /// the current payload, and a query before creation returns nothing.
    #[test]
    fn prop_as_of_tracks_current_belief(labels in label_sequence()) {
        let (arena, id, _) = seeded_arena(&labels);

        prop_assert!(arena.as_of(id, ts(50)).is_none());

        let after_everything = ts(10_000);
        let answered = arena.as_of(id, after_everything).unwrap();
        prop_assert_eq!(
            answered.version_id,
            arena.current(id).unwrap().version_id
        );
    }
}
