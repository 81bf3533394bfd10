//! Adosum - AI summaries for Azure DevOps work items.
//!
//! This library provides the core functionality for the `ados` CLI tool:
//! fetching work items and their recent activity history, assembling a bounded
//! textual context per item, and driving a locally hosted Ollama model to
//! produce structured markdown summaries.

pub mod agent;
pub mod cli;
pub mod context;
pub mod generate;
pub mod history;
pub mod models;
pub mod prompt;
pub mod report;
pub mod source;
pub mod summary;
pub mod text;

/// Library-level error type for Adosum operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Work item source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Generator unavailable: {0}")]
    GeneratorUnavailable(String),

    #[error("Generated text failed structural validation: {0}")]
    ValidationFailed(String),

    #[error("Generation failed for work item {id} after {attempts} attempts: {reason}")]
    GenerationFailed {
        id: u32,
        attempts: u32,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Adosum operations.
pub type Result<T> = std::result::Result<T, Error>;
