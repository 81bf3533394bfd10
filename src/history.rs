//! Rolling-window filter over work item history.
//!
//! The summarizer only cares about recent activity, defined as the last 90
//! days relative to a reference time captured once at run start. The reference
//! is always injected by the caller, never read from the wall clock here, so
//! every item in a batch shares one consistent recency window and tests are
//! fully deterministic.

use crate::models::HistoryEvent;
use chrono::{DateTime, Duration, Utc};

/// Size of the recent-activity window in days.
pub const WINDOW_DAYS: i64 = 90;

/// Keep events no older than [`WINDOW_DAYS`] relative to `reference`.
///
/// The boundary is inclusive: an event exactly 90 days old is retained.
/// Input order is preserved; events are cloned, never mutated.
pub fn filter_recent(events: &[HistoryEvent], reference: DateTime<Utc>) -> Vec<HistoryEvent> {
    let cutoff = reference - Duration::days(WINDOW_DAYS);
    events
        .iter()
        .filter(|e| e.timestamp >= cutoff)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventKind;
    use chrono::TimeZone;

    fn event_at(ts: DateTime<Utc>, author: &str) -> HistoryEvent {
        HistoryEvent {
            timestamp: ts,
            author: author.to_string(),
            kind: EventKind::Comment {
                text: "noted".to_string(),
            },
        }
    }

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_boundary_inclusive_at_90_days() {
        let reference = reference();
        let events = vec![
            event_at(reference - Duration::days(89), "a"),
            event_at(reference - Duration::days(90), "b"),
            event_at(reference - Duration::days(91), "c"),
        ];

        let kept = filter_recent(&events, reference);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].author, "a");
        assert_eq!(kept[1].author, "b");
    }

    #[test]
    fn test_preserves_chronological_order() {
        let reference = reference();
        let events = vec![
            event_at(reference - Duration::days(60), "first"),
            event_at(reference - Duration::days(30), "second"),
            event_at(reference - Duration::days(1), "third"),
        ];

        let kept = filter_recent(&events, reference);
        let authors: Vec<&str> = kept.iter().map(|e| e.author.as_str()).collect();
        assert_eq!(authors, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(filter_recent(&[], reference()).is_empty());
    }

    #[test]
    fn test_future_events_are_kept() {
        // Clock skew between ADO and the local host shouldn't drop events.
        let reference = reference();
        let events = vec![event_at(reference + Duration::hours(1), "skewed")];
        assert_eq!(filter_recent(&events, reference).len(), 1);
    }

    #[test]
    fn test_same_reference_is_pure() {
        let reference = reference();
        let events = vec![
            event_at(reference - Duration::days(10), "a"),
            event_at(reference - Duration::days(100), "b"),
        ];
        assert_eq!(
            filter_recent(&events, reference),
            filter_recent(&events, reference)
        );
    }
}
