//! Azure DevOps REST client.
//!
//! Blocking `ureq` client for the two Work Item Tracking endpoints the
//! pipeline needs: the work item itself (with relations expanded) and its
//! update history. Linked items are fetched individually to build the minimal
//! projection the context renders.

use crate::models::{
    EventKind, FetchedItem, HistoryEvent, RelatedItem, RelationKind, Relationship, WorkItem,
};
use crate::source::{WorkItemSource, cap_relationships};
use crate::text::clean_html;
use crate::{Error, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Work Item Tracking API version.
const API_VERSION: &str = "6.0";

/// Timeout for individual ADO requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Revision bookkeeping fields that would only add noise to the history.
const SKIPPED_UPDATE_FIELDS: &[&str] = &[
    "System.Rev",
    "System.Watermark",
    "System.ChangedDate",
    "System.RevisedDate",
    "System.AuthorizedDate",
    "System.AuthorizedAs",
    "System.ChangedBy",
    "System.PersonId",
];

/// Blocking client for one ADO organization/project.
pub struct AdoClient {
    agent: ureq::Agent,
    base_url: String,
    auth: super::auth::AuthMethod,
}

impl AdoClient {
    /// Create a client for `org_url` (e.g. `https://dev.azure.com/contoso`)
    /// and a project within it.
    pub fn new(org_url: &str, project: &str, pat: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            agent,
            base_url: format!("{}/{}/_apis/wit", org_url.trim_end_matches('/'), project),
            auth: super::auth::AuthMethod::from_pat(pat),
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .agent
            .get(url)
            .set("Authorization", &self.auth.header()?)
            .set("Accept", "application/json")
            .call();

        match response {
            Ok(resp) => resp.into_json().map_err(|e| {
                Error::SourceUnavailable(format!("invalid response from {}: {}", url, e))
            }),
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(Error::SourceUnavailable(format!(
                    "HTTP {} from {}: {}",
                    code, url, body
                )))
            }
            Err(e) => Err(Error::SourceUnavailable(e.to_string())),
        }
    }

    fn fetch_related_item(&self, id: u32) -> Result<RelatedItem> {
        let url = format!(
            "{}/workitems/{}?api-version={}",
            self.base_url, id, API_VERSION
        );
        let response: WorkItemResponse = self.get_json(&url)?;
        Ok(RelatedItem {
            id: response.id,
            title: response.fields.title,
            state: response.fields.state,
            changed: response.fields.changed_date.unwrap_or(DateTime::UNIX_EPOCH),
        })
    }

    fn fetch_relationships(&self, relations: &[RelationEntry]) -> Vec<Relationship> {
        let mut relationships = Vec::new();
        for relation in relations {
            let Some(kind) = RelationKind::from_rel(&relation.rel) else {
                continue;
            };
            let Some(linked_id) = parse_linked_id(&relation.url) else {
                continue;
            };
            match self.fetch_related_item(linked_id) {
                Ok(item) => relationships.push(Relationship { kind, item }),
                // A dead link should not sink the whole item.
                Err(e) => warn!(linked_id, "skipping linked item: {}", e),
            }
        }
        cap_relationships(relationships)
    }

    fn fetch_history(&self, id: u32) -> Result<Vec<HistoryEvent>> {
        let url = format!(
            "{}/workItems/{}/updates?api-version={}",
            self.base_url, id, API_VERSION
        );
        let response: UpdatesResponse = self.get_json(&url)?;
        Ok(events_from_updates(response))
    }
}

impl WorkItemSource for AdoClient {
    fn fetch(&self, id: u32) -> Result<FetchedItem> {
        let url = format!(
            "{}/workitems/{}?$expand=relations&api-version={}",
            self.base_url, id, API_VERSION
        );
        let response: WorkItemResponse = self.get_json(&url)?;
        debug!(id = response.id, "fetched work item");

        let relationships = self.fetch_relationships(&response.relations);
        let history = self.fetch_history(id)?;

        Ok(FetchedItem {
            work_item: work_item_from_response(response),
            relationships,
            history,
        })
    }
}

/// Extract the work item ID from a relation URL
/// (`.../_apis/wit/workItems/4242`).
fn parse_linked_id(url: &str) -> Option<u32> {
    let (_, tail) = url.split_once("/workItems/")?;
    tail.parse().ok()
}

fn work_item_from_response(response: WorkItemResponse) -> WorkItem {
    let fields = response.fields;
    WorkItem {
        id: response.id,
        title: fields.title,
        kind: fields.work_item_type,
        state: fields.state,
        priority: fields.priority,
        business_value: fields.business_value,
        description: clean_html(&fields.description),
        acceptance_criteria: clean_html(&fields.acceptance_criteria),
        area_path: fields.area_path,
        assigned_to: fields
            .assigned_to
            .map(|a| a.display_name)
            .unwrap_or_default(),
        tags: fields.tags,
        iteration_path: fields.iteration_path,
        story_points: fields.story_points,
    }
}

/// Flatten ADO revision updates into history events.
///
/// One revision can carry a discussion comment (System.History) plus any
/// number of field transitions; the comment is emitted first, the field
/// changes in field-name order so output never depends on map iteration.
/// Events are sorted ascending by timestamp before returning.
fn events_from_updates(response: UpdatesResponse) -> Vec<HistoryEvent> {
    let mut events = Vec::new();

    for update in response.value {
        let Some(timestamp) = update_timestamp(&update) else {
            continue;
        };
        let author = update
            .revised_by
            .as_ref()
            .map(|a| a.display_name.clone())
            .unwrap_or_default();

        if let Some(history) = update.fields.get("System.History") {
            if let Some(serde_json::Value::String(comment)) = &history.new_value {
                let text = clean_html(comment);
                if !text.is_empty() {
                    events.push(HistoryEvent {
                        timestamp,
                        author: author.clone(),
                        kind: EventKind::Comment { text },
                    });
                }
            }
        }

        let mut changed: Vec<(&String, &FieldUpdate)> = update
            .fields
            .iter()
            .filter(|(name, _)| {
                name.as_str() != "System.History" && !SKIPPED_UPDATE_FIELDS.contains(&name.as_str())
            })
            .collect();
        changed.sort_by_key(|(name, _)| name.as_str());

        for (name, change) in changed {
            let old = display_value(change.old_value.as_ref());
            let new = display_value(change.new_value.as_ref());
            if old == new {
                continue;
            }
            events.push(HistoryEvent {
                timestamp,
                author: author.clone(),
                kind: EventKind::FieldChange {
                    field: name.clone(),
                    old,
                    new,
                },
            });
        }
    }

    events.sort_by_key(|e| e.timestamp);
    events
}

/// ADO stamps the newest revision with a sentinel 9999 `revisedDate`; the
/// ChangedDate field carried in the same revision is the real one.
fn update_timestamp(update: &UpdateEntry) -> Option<DateTime<Utc>> {
    if let Some(changed) = update.fields.get("System.ChangedDate") {
        if let Some(serde_json::Value::String(s)) = &changed.new_value {
            if let Ok(parsed) = s.parse::<DateTime<Utc>>() {
                return Some(parsed);
            }
        }
    }
    update.revised_date.filter(|d| d.year() != 9999)
}

/// Render a field value for a history line: strings are HTML-cleaned,
/// identities collapse to their display name, scalars print as-is.
fn display_value(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => clean_html(s),
        Some(serde_json::Value::Object(map)) => map
            .get("displayName")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct WorkItemResponse {
    id: u32,
    fields: WorkItemFields,
    #[serde(default)]
    relations: Vec<RelationEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct WorkItemFields {
    #[serde(rename = "System.Title", default)]
    title: String,
    #[serde(rename = "System.WorkItemType", default)]
    work_item_type: String,
    #[serde(rename = "System.State", default)]
    state: String,
    #[serde(rename = "Microsoft.VSTS.Common.Priority")]
    priority: Option<i64>,
    #[serde(rename = "Microsoft.VSTS.Common.BusinessValue")]
    business_value: Option<i64>,
    #[serde(rename = "System.Description", default)]
    description: String,
    #[serde(rename = "Microsoft.VSTS.Common.AcceptanceCriteria", default)]
    acceptance_criteria: String,
    #[serde(rename = "System.AreaPath", default)]
    area_path: String,
    #[serde(rename = "System.AssignedTo")]
    assigned_to: Option<IdentityRef>,
    #[serde(rename = "System.Tags", default)]
    tags: String,
    #[serde(rename = "System.IterationPath", default)]
    iteration_path: String,
    #[serde(rename = "Microsoft.VSTS.Scheduling.StoryPoints")]
    story_points: Option<f64>,
    #[serde(rename = "System.ChangedDate")]
    changed_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct IdentityRef {
    #[serde(rename = "displayName", default)]
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct RelationEntry {
    rel: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    #[serde(default)]
    value: Vec<UpdateEntry>,
}

#[derive(Debug, Deserialize)]
struct UpdateEntry {
    #[serde(rename = "revisedBy")]
    revised_by: Option<IdentityRef>,
    #[serde(rename = "revisedDate")]
    revised_date: Option<DateTime<Utc>>,
    #[serde(default)]
    fields: HashMap<String, FieldUpdate>,
}

#[derive(Debug, Deserialize)]
struct FieldUpdate {
    #[serde(rename = "oldValue")]
    old_value: Option<serde_json::Value>,
    #[serde(rename = "newValue")]
    new_value: Option<serde_json::Value>,
}
