//! Run report: the single markdown document a batch produces.
//!
//! The report is an append-only accumulator owned by the batch runner.
//! Outcomes are recorded in input order and rendered in that same order,
//! successes as full summary blocks and failures as explicit placeholder
//! blocks, followed by a failure list so a reader gets both views.

use crate::Error;
use crate::summary::Summary;
use chrono::{DateTime, Utc};

/// Outcome of one work item, in input order.
#[derive(Debug)]
pub enum ItemOutcome {
    Succeeded(Summary),
    Failed {
        id: u32,
        title: Option<String>,
        error: Error,
    },
}

impl ItemOutcome {
    /// Work item ID this outcome belongs to.
    pub fn id(&self) -> u32 {
        match self {
            ItemOutcome::Succeeded(summary) => summary.work_item_id,
            ItemOutcome::Failed { id, .. } => *id,
        }
    }
}

/// Accumulator for one batch run. Single writer, append-only.
#[derive(Debug)]
pub struct RunReport {
    started_at: DateTime<Utc>,
    outcomes: Vec<ItemOutcome>,
}

impl RunReport {
    /// Start an empty report at the injected run-start time.
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            outcomes: Vec::new(),
        }
    }

    /// Append one item's outcome.
    pub fn record(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of items processed so far.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of successful summaries.
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Succeeded(_)))
            .count()
    }

    /// Whether any item failed.
    pub fn has_failures(&self) -> bool {
        self.succeeded() < self.total()
    }

    /// IDs of failed items, in input order.
    pub fn failed_ids(&self) -> Vec<u32> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ItemOutcome::Failed { id, .. } => Some(*id),
                ItemOutcome::Succeeded(_) => None,
            })
            .collect()
    }

    /// Render the full markdown document.
    ///
    /// `finished_at` is injected like the start time, so the document is a
    /// pure function of the recorded outcomes and the two instants.
    pub fn render_markdown(&self, finished_at: DateTime<Utc>) -> String {
        let minutes = (finished_at - self.started_at).num_seconds() as f64 / 60.0;
        let mut doc = format!(
            "# ADO Work Items Summary Report\n\n\
             *Generated on {}*\n\n\
             **Items Processed**: {}\n\
             **Succeeded**: {}/{}\n\
             **Total Time**: {:.1} minutes\n\n\
             ---\n",
            self.started_at.format("%Y-%m-%d at %H:%M:%S"),
            self.total(),
            self.succeeded(),
            self.total(),
            minutes,
        );

        for outcome in &self.outcomes {
            doc.push('\n');
            match outcome {
                ItemOutcome::Succeeded(summary) => doc.push_str(&summary.render_block()),
                ItemOutcome::Failed { id, title, error } => {
                    let header = match title {
                        Some(title) => format!("## WORK ITEM {}: {}", id, title),
                        None => format!("## WORK ITEM {}", id),
                    };
                    doc.push_str(&format!(
                        "{}\n\n[generation failed: {}]\n",
                        header, error
                    ));
                }
            }
            doc.push_str("\n---\n");
        }

        let failed = self.failed_ids();
        if !failed.is_empty() {
            doc.push_str("\n## Failed Items\n\n");
            for outcome in &self.outcomes {
                if let ItemOutcome::Failed { id, error, .. } = outcome {
                    doc.push_str(&format!("- {}: {}\n", id, error));
                }
            }
            doc.push_str("\n---\n");
        }

        doc.push_str("\n*End of Report*\n");
        doc
    }
}
