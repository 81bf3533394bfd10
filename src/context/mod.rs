//! Bounded context assembly for work item summarization.
//!
//! A context is a single plain-text block handed to the generation model. It
//! carries four sections in a fixed order: the work item fields, the related
//! items grouped by kind, the filtered history (chronological, oldest first,
//! so the model reads the activity as a narrative), and a short derived-notes
//! section. The whole block is capped at [`CONTEXT_BUDGET`] characters.
//!
//! When the naive concatenation exceeds the budget, sections are reduced in a
//! fixed priority order (see [`reduce`]): notes go first, then history from
//! the oldest end, then relationships, and as a last resort the description
//! and acceptance criteria are hard-truncated with a visible marker. The
//! identity fields are never touched.
//!
//! Building is deterministic: identical inputs produce a byte-identical
//! context, which is a precondition for deterministic downstream generation.

mod reduce;

pub use reduce::TRUNCATION_MARKER;

use crate::history::WINDOW_DAYS;
use crate::models::{EventKind, HistoryEvent, RelationKind, Relationship, WorkItem};
use crate::text::char_len;
use reduce::ContextParts;

/// Hard cap on context size in characters, sized to leave response headroom
/// inside a 128k-token-class local model's window.
pub const CONTEXT_BUDGET: usize = 120_000;

/// Build a bounded context from a work item, its relationships, and its
/// already-filtered history, using the production budget.
pub fn build(
    work_item: &WorkItem,
    relationships: &[Relationship],
    history: &[HistoryEvent],
) -> String {
    build_with_budget(work_item, relationships, history, CONTEXT_BUDGET)
}

/// Budget-parameterized variant of [`build`], used directly by tests.
///
/// Never fails: over-budget input is reduced, not rejected.
pub fn build_with_budget(
    work_item: &WorkItem,
    relationships: &[Relationship],
    history: &[HistoryEvent],
    budget: usize,
) -> String {
    let mut parts = ContextParts {
        work_item: work_item.clone(),
        relationships: relationships.to_vec(),
        history: history.to_vec(),
        hints: derive_hints(work_item, relationships, history),
    };

    let mut rendered = render(&parts);
    if char_len(&rendered) <= budget {
        return rendered;
    }

    // (a) drop derived notes
    if reduce::drop_hints(&mut parts) {
        rendered = render(&parts);
    }

    // (b) drop history from the oldest end, one event at a time
    while char_len(&rendered) > budget && reduce::drop_oldest_history(&mut parts) {
        rendered = render(&parts);
    }

    // (c) drop relationships, least recently changed first
    while char_len(&rendered) > budget && reduce::drop_weakest_relationship(&mut parts) {
        rendered = render(&parts);
    }

    // (d) last resort: hard-truncate the free-text fields
    let mut excess = char_len(&rendered).saturating_sub(budget);
    if excess > 0 && reduce::truncate_field(&mut parts.work_item.description, excess) {
        rendered = render(&parts);
    }
    excess = char_len(&rendered).saturating_sub(budget);
    if excess > 0 && reduce::truncate_field(&mut parts.work_item.acceptance_criteria, excess) {
        rendered = render(&parts);
    }

    // Invariant: only the fixed identity fields remain past this point, and
    // they are orders of magnitude below the production budget.
    debug_assert!(
        char_len(&rendered) <= budget,
        "context exceeds budget after all reduction steps"
    );

    rendered
}

/// Render the four sections in their fixed order.
fn render(parts: &ContextParts) -> String {
    let mut sections = vec![render_fields(&parts.work_item)];

    sections.push(render_relationships(&parts.relationships));
    sections.push(render_history(&parts.history));

    if !parts.hints.is_empty() {
        sections.push(render_hints(&parts.hints));
    }

    sections.join("\n\n")
}

fn render_fields(item: &WorkItem) -> String {
    let priority = match item.priority {
        Some(p) => p.to_string(),
        None => "Not set".to_string(),
    };
    let business_value = match item.business_value {
        Some(v) => v.to_string(),
        None => "Not set".to_string(),
    };
    let story_points = match item.story_points {
        Some(p) => p.to_string(),
        None => "Not estimated".to_string(),
    };
    let assigned_to = if item.assigned_to.is_empty() {
        "Unassigned"
    } else {
        &item.assigned_to
    };
    let tags = if item.tags.is_empty() {
        "None"
    } else {
        &item.tags
    };
    let iteration = if item.iteration_path.is_empty() {
        "Not assigned"
    } else {
        &item.iteration_path
    };
    let description = if item.description.is_empty() {
        "No description provided"
    } else {
        &item.description
    };
    let acceptance = if item.acceptance_criteria.is_empty() {
        "Not specified"
    } else {
        &item.acceptance_criteria
    };

    format!(
        "WORK ITEM:\n\
         ID: {}\n\
         Title: {}\n\
         Type: {}\n\
         State: {}\n\
         Priority: {}\n\
         Business Value: {}\n\
         Assigned To: {}\n\
         Area Path: {}\n\
         Iteration: {}\n\
         Tags: {}\n\
         Story Points: {}\n\
         \n\
         DESCRIPTION:\n\
         {}\n\
         \n\
         ACCEPTANCE CRITERIA:\n\
         {}",
        item.id,
        item.title,
        item.kind,
        item.state,
        priority,
        business_value,
        assigned_to,
        item.area_path,
        iteration,
        tags,
        story_points,
        description,
        acceptance,
    )
}

fn render_relationships(relationships: &[Relationship]) -> String {
    if relationships.is_empty() {
        return "RELATED ITEMS: None".to_string();
    }

    let mut lines = vec!["RELATED ITEMS:".to_string()];
    for kind in RelationKind::all() {
        let of_kind: Vec<&Relationship> =
            relationships.iter().filter(|r| r.kind == *kind).collect();
        if of_kind.is_empty() {
            continue;
        }
        lines.push(format!("{}:", kind));
        for r in of_kind {
            lines.push(format!(
                "  - {} — {} — {}",
                r.item.id, r.item.title, r.item.state
            ));
        }
    }
    lines.join("\n")
}

fn render_history(history: &[HistoryEvent]) -> String {
    if history.is_empty() {
        return format!("RECENT ACTIVITY (LAST {} DAYS): None", WINDOW_DAYS);
    }

    let mut lines = vec![format!("RECENT ACTIVITY (LAST {} DAYS):", WINDOW_DAYS)];
    for event in history {
        let stamp = event.timestamp.format("%Y-%m-%d %H:%M");
        let line = match &event.kind {
            EventKind::Comment { text } => {
                format!("[{}] {} commented: {}", stamp, event.author, text)
            }
            EventKind::FieldChange { field, old, new } => {
                format!(
                    "[{}] {} changed {}: '{}' -> '{}'",
                    stamp, event.author, field, old, new
                )
            }
        };
        lines.push(line);
    }
    lines.join("\n")
}

fn render_hints(hints: &[String]) -> String {
    let mut lines = vec!["NOTES:".to_string()];
    for hint in hints {
        lines.push(format!("- {}", hint));
    }
    lines.join("\n")
}

/// Short observations the model would otherwise have to infer.
fn derive_hints(
    work_item: &WorkItem,
    relationships: &[Relationship],
    history: &[HistoryEvent],
) -> Vec<String> {
    let mut hints = Vec::new();
    if history.is_empty() {
        hints.push(format!(
            "No recorded activity in the last {} days.",
            WINDOW_DAYS
        ));
    }
    if relationships.is_empty() {
        hints.push("No linked work items.".to_string());
    }
    if work_item.description.is_empty() {
        hints.push("Work item has no description.".to_string());
    }
    hints
}
