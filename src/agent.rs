//! Batch orchestration: fetch, filter, build, generate, validate, retry.
//!
//! One `SummaryAgent` drives a whole run. Items are processed strictly in
//! input order, one at a time; a failed item is recorded and the batch moves
//! on. The per-item pipeline builds its context exactly once and reuses it
//! verbatim across generation retries, since context construction is
//! deterministic and the model is the only source of variability.

use crate::generate::{DecodingParams, Generator};
use crate::models::{FetchedItem, WorkItem};
use crate::prompt::{self, Prompt};
use crate::report::{ItemOutcome, RunReport};
use crate::source::WorkItemSource;
use crate::summary::Summary;
use crate::{Error, Result, context, history};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Generation attempts per item, validation failures and transient generator
/// errors combined.
pub const MAX_ATTEMPTS: u32 = 5;

/// Exponential backoff between generation attempts.
///
/// The schedule is a pure function of the attempt number so tests can assert
/// it; tests inject a zero base to run without sleeping.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
}

impl Backoff {
    pub fn new(base: Duration) -> Self {
        Self { base }
    }

    /// Delay to sleep after a failed `attempt` (1-based): base doubled per
    /// attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(2),
        }
    }
}

/// Outcome of a single generation attempt.
enum Attempt {
    Success(Summary),
    Retryable(String),
}

/// Orchestrates the summarization pipeline over injected collaborators.
pub struct SummaryAgent<S, G> {
    source: S,
    generator: G,
    /// Reference time for the recency window, captured once per run so every
    /// item in a batch shares the same window.
    reference_time: DateTime<Utc>,
    backoff: Backoff,
}

impl<S: WorkItemSource, G: Generator> SummaryAgent<S, G> {
    pub fn new(source: S, generator: G, reference_time: DateTime<Utc>) -> Self {
        Self {
            source,
            generator,
            reference_time,
            backoff: Backoff::default(),
        }
    }

    /// Replace the default backoff schedule.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Summarize one work item.
    ///
    /// Fails with [`Error::SourceUnavailable`] when the fetch fails and
    /// [`Error::GenerationFailed`] when the retry budget runs out.
    pub fn summarize(&self, id: u32) -> Result<Summary> {
        match self.process(id) {
            ItemOutcome::Succeeded(summary) => Ok(summary),
            ItemOutcome::Failed { error, .. } => Err(error),
        }
    }

    /// Process the whole batch, in input order, one item at a time.
    pub fn run(&self, ids: &[u32]) -> RunReport {
        let mut report = RunReport::new(self.reference_time);
        let total = ids.len();
        let mut elapsed: Vec<Duration> = Vec::with_capacity(total);

        for (index, &id) in ids.iter().enumerate() {
            info!("processing work item {}/{}: {}", index + 1, total, id);
            let item_start = Instant::now();

            report.record(self.process(id));

            elapsed.push(item_start.elapsed());
            let remaining = total - (index + 1);
            if remaining > 0 {
                let avg = elapsed.iter().sum::<Duration>() / elapsed.len() as u32;
                info!(
                    "estimated time remaining for {} items: approx {:.1} minutes",
                    remaining,
                    (avg * remaining as u32).as_secs_f64() / 60.0
                );
            }
        }
        report
    }

    fn process(&self, id: u32) -> ItemOutcome {
        let fetched = match self.source.fetch(id) {
            Ok(fetched) => fetched,
            Err(error) => {
                warn!(id, "skipping work item: {}", error);
                return ItemOutcome::Failed {
                    id,
                    title: None,
                    error,
                };
            }
        };

        let FetchedItem {
            work_item,
            relationships,
            history: raw_history,
        } = fetched;
        info!(id, title = %work_item.title, "fetched work item");

        let recent = history::filter_recent(&raw_history, self.reference_time);
        let built = context::build(&work_item, &relationships, &recent);
        let prompt = prompt::build(&built);

        match self.generate_validated(&work_item, &prompt) {
            Ok(summary) => ItemOutcome::Succeeded(summary),
            Err(error) => ItemOutcome::Failed {
                id,
                title: Some(work_item.title),
                error,
            },
        }
    }

    /// The bounded generation loop: same prompt every attempt, explicit
    /// attempt counter, backoff between failures.
    fn generate_validated(&self, item: &WorkItem, prompt: &Prompt) -> Result<Summary> {
        let params = DecodingParams::default();
        let mut last_reason = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            let started = Instant::now();
            match self.attempt(item, prompt, &params) {
                Attempt::Success(summary) => {
                    info!(
                        id = item.id,
                        attempt,
                        seconds = started.elapsed().as_secs(),
                        "summary generated and validated"
                    );
                    return Ok(summary);
                }
                Attempt::Retryable(reason) => {
                    warn!(
                        id = item.id,
                        attempt,
                        max = MAX_ATTEMPTS,
                        "attempt failed: {}",
                        reason
                    );
                    last_reason = reason;
                    if attempt < MAX_ATTEMPTS {
                        let delay = self.backoff.delay_after(attempt);
                        if !delay.is_zero() {
                            info!(id = item.id, "retrying in {}s", delay.as_secs());
                            std::thread::sleep(delay);
                        }
                    }
                }
            }
        }

        Err(Error::GenerationFailed {
            id: item.id,
            attempts: MAX_ATTEMPTS,
            reason: last_reason,
        })
    }

    fn attempt(&self, item: &WorkItem, prompt: &Prompt, params: &DecodingParams) -> Attempt {
        match self.generator.generate(prompt, params) {
            Ok(text) => match Summary::from_generated(item, text) {
                Ok(summary) => Attempt::Success(summary),
                Err(error) => Attempt::Retryable(error.to_string()),
            },
            Err(error) => Attempt::Retryable(error.to_string()),
        }
    }
}
