//! Data models for Adosum entities.
//!
//! This module defines the core data structures:
//! - `WorkItem` - An Azure DevOps work item snapshot
//! - `Relationship` - A typed link from a work item to a related item
//! - `RelatedItem` - Minimal projection of a linked work item
//! - `HistoryEvent` - One comment or field change from the item's history
//! - `FetchedItem` - The bundle returned by a work item source

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship kind, mapped from ADO `System.LinkTypes.*` rel strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Hierarchy-Reverse: the linked item contains this one
    Parent,
    /// Hierarchy-Forward: this item contains the linked one
    Child,
    /// Dependency-Reverse: the linked item must finish first
    Predecessor,
    /// Dependency-Forward: the linked item waits on this one
    Successor,
    /// Informational bidirectional link
    Related,
}

impl RelationKind {
    /// Map an ADO relation rel string to a kind.
    ///
    /// Returns `None` for non-work-item relations (attachments, hyperlinks).
    pub fn from_rel(rel: &str) -> Option<Self> {
        match rel {
            "System.LinkTypes.Hierarchy-Reverse" => Some(RelationKind::Parent),
            "System.LinkTypes.Hierarchy-Forward" => Some(RelationKind::Child),
            "System.LinkTypes.Dependency-Reverse" => Some(RelationKind::Predecessor),
            "System.LinkTypes.Dependency-Forward" => Some(RelationKind::Successor),
            "System.LinkTypes.Related" => Some(RelationKind::Related),
            _ => None,
        }
    }

    /// All kinds, in the fixed order used for context rendering.
    pub fn all() -> &'static [RelationKind] {
        &[
            RelationKind::Parent,
            RelationKind::Child,
            RelationKind::Predecessor,
            RelationKind::Successor,
            RelationKind::Related,
        ]
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelationKind::Parent => "Parent",
            RelationKind::Child => "Child",
            RelationKind::Predecessor => "Predecessor",
            RelationKind::Successor => "Successor",
            RelationKind::Related => "Related",
        };
        write!(f, "{}", s)
    }
}

/// An Azure DevOps work item snapshot, fetched once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Work item ID
    pub id: u32,

    /// Title (System.Title)
    pub title: String,

    /// Work item type, e.g. "User Story", "Bug" (System.WorkItemType)
    pub kind: String,

    /// Current state, e.g. "Active", "Closed" (System.State)
    pub state: String,

    /// Priority, lower is more urgent (Microsoft.VSTS.Common.Priority)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    /// Business value score (Microsoft.VSTS.Common.BusinessValue)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_value: Option<i64>,

    /// Description with HTML already stripped (System.Description)
    pub description: String,

    /// Acceptance criteria with HTML already stripped
    /// (Microsoft.VSTS.Common.AcceptanceCriteria)
    pub acceptance_criteria: String,

    /// Area path (System.AreaPath)
    pub area_path: String,

    /// Display name of the assignee, empty if unassigned (System.AssignedTo)
    pub assigned_to: String,

    /// Semicolon-separated tags (System.Tags)
    #[serde(default)]
    pub tags: String,

    /// Iteration path (System.IterationPath)
    #[serde(default)]
    pub iteration_path: String,

    /// Story points estimate (Microsoft.VSTS.Scheduling.StoryPoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<f64>,
}

/// Minimal projection of a linked work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedItem {
    /// Linked work item ID
    pub id: u32,

    /// Linked item title
    pub title: String,

    /// Linked item state
    pub state: String,

    /// When the linked item was last changed (System.ChangedDate).
    /// Used by the per-kind selection rule when more than 8 links exist.
    pub changed: DateTime<Utc>,
}

/// A typed link from one work item to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship kind
    pub kind: RelationKind,

    /// Projection of the linked item
    pub item: RelatedItem,
}

/// What kind of history event occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A discussion comment (System.History), HTML already stripped
    Comment { text: String },
    /// A field transition recorded in a revision
    FieldChange {
        field: String,
        old: String,
        new: String,
    },
}

/// One entry from a work item's update history.
///
/// Events are ordered ascending by timestamp and never mutated after creation;
/// the history filter only drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// When the revision was made
    pub timestamp: DateTime<Utc>,

    /// Display name of the author
    pub author: String,

    /// Comment or field change payload
    pub kind: EventKind,
}

/// The bundle a work item source returns for one ID: the item snapshot, its
/// capped relationships, and its raw (unfiltered) history.
#[derive(Debug, Clone)]
pub struct FetchedItem {
    pub work_item: WorkItem,
    pub relationships: Vec<Relationship>,
    pub history: Vec<HistoryEvent>,
}

impl WorkItem {
    /// A minimal work item with only identity fields set, used as a fallback
    /// snapshot and heavily in tests.
    pub fn bare(id: u32, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            kind: String::new(),
            state: String::new(),
            priority: None,
            business_value: None,
            description: String::new(),
            acceptance_criteria: String::new(),
            area_path: String::new(),
            assigned_to: String::new(),
            tags: String::new(),
            iteration_path: String::new(),
            story_points: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_kind_from_rel() {
        assert_eq!(
            RelationKind::from_rel("System.LinkTypes.Hierarchy-Reverse"),
            Some(RelationKind::Parent)
        );
        assert_eq!(
            RelationKind::from_rel("System.LinkTypes.Hierarchy-Forward"),
            Some(RelationKind::Child)
        );
        assert_eq!(
            RelationKind::from_rel("System.LinkTypes.Dependency-Reverse"),
            Some(RelationKind::Predecessor)
        );
        assert_eq!(
            RelationKind::from_rel("System.LinkTypes.Dependency-Forward"),
            Some(RelationKind::Successor)
        );
        assert_eq!(
            RelationKind::from_rel("System.LinkTypes.Related"),
            Some(RelationKind::Related)
        );
    }

    #[test]
    fn test_relation_kind_ignores_non_work_item_links() {
        assert_eq!(RelationKind::from_rel("AttachedFile"), None);
        assert_eq!(RelationKind::from_rel("Hyperlink"), None);
        assert_eq!(RelationKind::from_rel(""), None);
    }

    #[test]
    fn test_relation_kind_display() {
        assert_eq!(RelationKind::Parent.to_string(), "Parent");
        assert_eq!(RelationKind::Successor.to_string(), "Successor");
    }
}
