//! Summary structure: the six required sections, validation, and rendering.
//!
//! A generation attempt only becomes a [`Summary`] after passing
//! [`validate_structure`], so everything downstream can assume the sections
//! are present and ordered.

use crate::models::WorkItem;
use crate::{Error, Result};

/// The six required section headers, in required order.
pub const SECTION_HEADERS: &[&str] = &[
    "**EXECUTIVE SUMMARY**",
    "**KEY METRICS**",
    "**TECHNICAL SOLUTION**",
    "**RECENT ACTIVITY (LAST 3 MONTHS)**",
    "**DEPENDENCIES & RISKS**",
    "**NEXT ACTIONS**",
];

/// A validated markdown summary for one work item. Immutable once created.
#[derive(Debug, Clone)]
pub struct Summary {
    /// ID of the summarized work item
    pub work_item_id: u32,
    /// Title of the summarized work item
    pub title: String,
    /// The validated six-section markdown body
    pub body: String,
}

impl Summary {
    /// Validate `text` and wrap it as the summary for `item`.
    pub fn from_generated(item: &WorkItem, text: String) -> Result<Self> {
        validate_structure(&text)?;
        Ok(Self {
            work_item_id: item.id,
            title: item.title.clone(),
            body: text,
        })
    }

    /// Render the per-item block for the run report.
    pub fn render_block(&self) -> String {
        format!(
            "## WORK ITEM {}: {}\n\n{}\n",
            self.work_item_id, self.title, self.body
        )
    }
}

/// Check that all six section headers appear, each after the previous one.
///
/// Returns [`Error::ValidationFailed`] naming the first problem found, so a
/// failed attempt logs something actionable.
pub fn validate_structure(text: &str) -> Result<()> {
    let mut position = 0;
    for header in SECTION_HEADERS {
        match text[position..].find(header) {
            Some(offset) => position += offset + header.len(),
            None => {
                let reason = if text.contains(header) {
                    format!("section {} is out of order", header)
                } else {
                    format!("missing section {}", header)
                };
                return Err(Error::ValidationFailed(reason));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal body containing all six sections in order.
    fn valid_body() -> String {
        SECTION_HEADERS
            .iter()
            .map(|h| format!("{}\nSome content.\n", h))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_valid_body_passes() {
        assert!(validate_structure(&valid_body()).is_ok());
    }

    #[test]
    fn test_missing_section_fails() {
        let body = valid_body().replace("**KEY METRICS**", "**KEY DETAILS**");
        let err = validate_structure(&body).unwrap_err();
        assert!(matches!(err, Error::ValidationFailed(_)));
        assert!(err.to_string().contains("**KEY METRICS**"));
    }

    #[test]
    fn test_out_of_order_sections_fail() {
        let body = format!(
            "{}\ncontent\n{}\ncontent\n",
            SECTION_HEADERS[1], SECTION_HEADERS[0]
        );
        // Remaining sections appended in order after the swapped pair.
        let body = format!(
            "{}{}",
            body,
            SECTION_HEADERS[2..]
                .iter()
                .map(|h| format!("{}\ncontent\n", h))
                .collect::<String>()
        );
        let err = validate_structure(&body).unwrap_err();
        assert!(err.to_string().contains("out of order"));
    }

    #[test]
    fn test_empty_text_fails() {
        assert!(validate_structure("").is_err());
    }

    #[test]
    fn test_surrounding_prose_is_allowed() {
        let body = format!("Here is the summary you asked for.\n\n{}", valid_body());
        assert!(validate_structure(&body).is_ok());
    }

    #[test]
    fn test_render_block_carries_id_and_title() {
        let item = WorkItem::bare(4242, "Improve login latency");
        let summary = Summary::from_generated(&item, valid_body()).unwrap();
        let block = summary.render_block();
        assert!(block.starts_with("## WORK ITEM 4242: Improve login latency\n"));
        assert!(block.contains("**NEXT ACTIONS**"));
    }

    #[test]
    fn test_from_generated_rejects_invalid_text() {
        let item = WorkItem::bare(1, "t");
        assert!(Summary::from_generated(&item, "not a summary".to_string()).is_err());
    }
}
