//! CLI argument definitions for Adosum.
//!
//! A single-purpose batch command, so there are no subcommands: `ados` takes
//! the work item IDs and connection settings and runs the batch. Every
//! argument can come from the environment, which keeps secrets out of shell
//! history and matches how the tool runs unattended.

use clap::Parser;
use std::path::PathBuf;

/// Adosum - AI summaries for Azure DevOps work items.
///
/// Fetches each work item with its relationships and 3 months of activity,
/// and generates a structured markdown summary with a local Ollama model.
#[derive(Parser, Debug)]
#[command(name = "ados")]
#[command(author, version, about = "Generate AI summaries of Azure DevOps work items", long_about = None)]
pub struct Cli {
    /// Work item IDs to summarize, comma-separated
    #[arg(
        long = "ids",
        env = "WORK_ITEM_IDS",
        value_delimiter = ',',
        required = true
    )]
    pub work_item_ids: Vec<u32>,

    /// Azure DevOps organization URL (e.g. https://dev.azure.com/contoso)
    #[arg(long, env = "ADO_URL")]
    pub ado_url: String,

    /// Azure DevOps project name
    #[arg(long, env = "ADO_PROJECT_NAME")]
    pub project: String,

    /// Personal Access Token. When unset, the Azure CLI (`az login`) is used.
    #[arg(long, env = "ADO_PAT", hide_env_values = true)]
    pub pat: Option<String>,

    /// Ollama host
    #[arg(long, env = "OLLAMA_HOST", default_value = "http://localhost:11434")]
    pub ollama_host: String,

    /// Ollama model name
    #[arg(
        long,
        env = "OLLAMA_MODEL",
        default_value = "phi3.5:3.8b-mini-instruct-q4_K_M"
    )]
    pub model: String,

    /// Output markdown file
    #[arg(short, long, default_value = "work_item_summaries.md")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_parse_comma_separated() {
        let cli = Cli::parse_from([
            "ados",
            "--ids",
            "3,1,2",
            "--ado-url",
            "https://dev.azure.com/contoso",
            "--project",
            "Platform",
        ]);
        assert_eq!(cli.work_item_ids, vec![3, 1, 2]);
        assert_eq!(cli.out, PathBuf::from("work_item_summaries.md"));
    }

    #[test]
    fn test_defaults_for_ollama() {
        let cli = Cli::parse_from([
            "ados",
            "--ids",
            "1",
            "--ado-url",
            "https://dev.azure.com/contoso",
            "--project",
            "Platform",
        ]);
        assert_eq!(cli.ollama_host, "http://localhost:11434");
        assert_eq!(cli.model, "phi3.5:3.8b-mini-instruct-q4_K_M");
        assert!(cli.pat.is_none());
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let result = Cli::try_parse_from([
            "ados",
            "--ids",
            "1,abc",
            "--ado-url",
            "https://dev.azure.com/contoso",
            "--project",
            "Platform",
        ]);
        assert!(result.is_err());
    }
}
