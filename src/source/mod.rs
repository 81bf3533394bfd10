//! Work item retrieval.
//!
//! The pipeline consumes work items through the narrow [`WorkItemSource`]
//! capability trait so the orchestration and its tests never need a live
//! Azure DevOps connection. The real implementation is [`ado::AdoClient`].

pub mod ado;
pub mod auth;

use crate::Result;
use crate::models::{FetchedItem, RelationKind, Relationship};

/// Maximum relationships retained per kind.
pub const MAX_RELATED_PER_KIND: usize = 8;

/// Fetch-by-ID capability over a work item backend.
pub trait WorkItemSource {
    /// Fetch one work item, its capped relationships, and its raw history.
    ///
    /// Fails with [`crate::Error::SourceUnavailable`] on network, auth, or
    /// malformed-response problems. Callers do not retry; a failed fetch
    /// skips the item.
    fn fetch(&self, id: u32) -> Result<FetchedItem>;
}

/// Enforce the per-kind relationship cap.
///
/// When a kind has more than [`MAX_RELATED_PER_KIND`] links, the ones kept
/// are the most recently changed; ties are broken by ascending ID. The result
/// is grouped by kind (in [`RelationKind::all`] order) and sorted most recent
/// first within each kind, so the selection is deterministic for any input
/// order.
pub fn cap_relationships(relationships: Vec<Relationship>) -> Vec<Relationship> {
    let mut out = Vec::new();
    for kind in RelationKind::all() {
        let mut of_kind: Vec<Relationship> = relationships
            .iter()
            .filter(|r| r.kind == *kind)
            .cloned()
            .collect();
        of_kind.sort_by(|a, b| {
            b.item
                .changed
                .cmp(&a.item.changed)
                .then(a.item.id.cmp(&b.item.id))
        });
        of_kind.truncate(MAX_RELATED_PER_KIND);
        out.extend(of_kind);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RelatedItem;
    use chrono::{TimeZone, Utc};

    fn rel(id: u32, kind: RelationKind, day: u32) -> Relationship {
        Relationship {
            kind,
            item: RelatedItem {
                id,
                title: format!("item {}", id),
                state: "Active".to_string(),
                changed: Utc.with_ymd_and_hms(2025, 2, day, 0, 0, 0).unwrap(),
            },
        }
    }

    #[test]
    fn test_cap_keeps_eight_most_recently_changed() {
        // Ten parents changed on days 1..=10; days 3..=10 survive.
        let rels: Vec<Relationship> = (1..=10)
            .map(|d| rel(d, RelationKind::Parent, d))
            .collect();

        let capped = cap_relationships(rels);
        assert_eq!(capped.len(), 8);

        let ids: Vec<u32> = capped.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![10, 9, 8, 7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_cap_is_per_kind_not_global() {
        let mut rels: Vec<Relationship> =
            (1..=10).map(|d| rel(d, RelationKind::Parent, d)).collect();
        rels.extend((11..=20).map(|d| rel(d, RelationKind::Child, d - 10)));

        let capped = cap_relationships(rels);
        assert_eq!(capped.len(), 16);
        assert_eq!(
            capped
                .iter()
                .filter(|r| r.kind == RelationKind::Parent)
                .count(),
            8
        );
        assert_eq!(
            capped
                .iter()
                .filter(|r| r.kind == RelationKind::Child)
                .count(),
            8
        );
    }

    #[test]
    fn test_cap_tie_break_is_ascending_id() {
        // Nine links all changed at the same instant: the eight lowest IDs win.
        let rels: Vec<Relationship> = (1..=9).map(|i| rel(i, RelationKind::Related, 1)).collect();

        let capped = cap_relationships(rels);
        let ids: Vec<u32> = capped.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_cap_is_deterministic_for_any_input_order() {
        let forward: Vec<Relationship> =
            (1..=10).map(|d| rel(d, RelationKind::Parent, d)).collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        let a: Vec<u32> = cap_relationships(forward)
            .iter()
            .map(|r| r.item.id)
            .collect();
        let b: Vec<u32> = cap_relationships(reversed)
            .iter()
            .map(|r| r.item.id)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cap_under_limit_is_identity_sized() {
        let rels = vec![
            rel(1, RelationKind::Parent, 1),
            rel(2, RelationKind::Child, 2),
        ];
        assert_eq!(cap_relationships(rels).len(), 2);
    }
}
