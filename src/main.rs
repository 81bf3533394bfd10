//! Adosum CLI - AI summaries for Azure DevOps work items.

use adosum::agent::SummaryAgent;
use adosum::cli::Cli;
use adosum::generate::ollama::OllamaClient;
use adosum::source::ado::AdoClient;
use chrono::Utc;
use clap::Parser;
use std::fs;
use std::process;
use tracing::{info, warn};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // One reference instant for the whole run: the history window and the
    // report header both derive from it.
    let started_at = Utc::now();

    let source = AdoClient::new(&cli.ado_url, &cli.project, cli.pat.clone());
    let generator = OllamaClient::new(&cli.ollama_host, &cli.model);

    if generator.is_available() {
        info!(model = %generator.model(), "Ollama model available");
    } else {
        // Not fatal: the host may still serve the model, and per-item retry
        // handles transient failures.
        warn!(model = %generator.model(), host = %cli.ollama_host,
            "model not reported by Ollama host, generation may fail");
    }

    info!(items = cli.work_item_ids.len(), "starting batch");
    let agent = SummaryAgent::new(source, generator, started_at);
    let report = agent.run(&cli.work_item_ids);

    let document = report.render_markdown(Utc::now());
    if let Err(e) = fs::write(&cli.out, &document) {
        eprintln!("Error: failed to write {}: {}", cli.out.display(), e);
        process::exit(2);
    }
    info!("summaries saved to {}", cli.out.display());

    if report.has_failures() {
        eprintln!(
            "{} of {} work items failed: {:?}",
            report.failed_ids().len(),
            report.total(),
            report.failed_ids()
        );
        process::exit(1);
    }
}
