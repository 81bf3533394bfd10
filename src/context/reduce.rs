//! Reduction steps for over-budget contexts.
//!
//! Each step removes the smallest useful unit from one section and reports
//! whether it changed anything, so the builder can re-measure after every
//! application. Steps are applied in a fixed priority order (hints, then
//! history, then relationships, then description text) and never touch the
//! identity fields.

use crate::models::{HistoryEvent, Relationship, WorkItem};
use crate::text::{char_len, truncate_chars};

/// Marker appended wherever free text was cut to fit the budget.
pub const TRUNCATION_MARKER: &str = " [truncated]";

/// Mutable working set the reduction steps operate on.
///
/// Owned clones of the caller's data; the originals are never modified.
#[derive(Debug, Clone)]
pub(crate) struct ContextParts {
    pub work_item: WorkItem,
    pub relationships: Vec<Relationship>,
    pub history: Vec<HistoryEvent>,
    pub hints: Vec<String>,
}

/// Step (a): drop the derived-hints section entirely.
pub(crate) fn drop_hints(parts: &mut ContextParts) -> bool {
    if parts.hints.is_empty() {
        return false;
    }
    parts.hints.clear();
    true
}

/// Step (b): drop the single oldest history event.
///
/// History renders chronologically, so the oldest event is the front of the
/// vector and the least relevant to "recent activity".
pub(crate) fn drop_oldest_history(parts: &mut ContextParts) -> bool {
    if parts.history.is_empty() {
        return false;
    }
    parts.history.remove(0);
    true
}

/// Step (c): drop the single weakest relationship.
///
/// Weakest means least recently changed across all kinds; ties are broken by
/// dropping the larger ID first. This is the same recency ordering the
/// per-kind cap uses, extended across kinds.
pub(crate) fn drop_weakest_relationship(parts: &mut ContextParts) -> bool {
    let weakest = parts
        .relationships
        .iter()
        .enumerate()
        .min_by_key(|(_, r)| (r.item.changed, std::cmp::Reverse(r.item.id)))
        .map(|(i, _)| i);

    match weakest {
        Some(i) => {
            parts.relationships.remove(i);
            true
        }
        None => false,
    }
}

/// Step (d): hard-truncate a free-text field by `excess` characters,
/// appending [`TRUNCATION_MARKER`].
///
/// Returns false when the field is already reduced to the marker (or less),
/// meaning this step can make no further progress.
pub(crate) fn truncate_field(field: &mut String, excess: usize) -> bool {
    let marker_len = char_len(TRUNCATION_MARKER);
    let len = char_len(field);
    if len <= marker_len {
        return false;
    }

    let keep = len.saturating_sub(excess + marker_len);
    let mut cut = truncate_chars(field, keep);
    cut.push_str(TRUNCATION_MARKER);
    *field = cut;
    true
}
