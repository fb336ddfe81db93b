// src/pipeline/batch.rs

//! Batch scheduling.
//!
//! Sources are split into consecutive batches. Everything inside a batch runs
//! concurrently; a batch starts only once the previous one has finished,
//! optionally after a fixed pause.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::models::{
    ArticleRecord, FeedSource, FetchResult, HealthConfig, SchedulerConfig, active_sources,
};
use crate::services::FeedFetcher;

/// How a list of sources is split and paced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Maximum operations in flight; zero behaves as one
    pub batch_size: usize,
    /// Pause between consecutive batches, never after the last
    pub pause: Option<Duration>,
}

impl BatchPolicy {
    /// Content fetching: 5 at a time, 100ms between batches.
    pub fn content() -> Self {
        Self {
            batch_size: 5,
            pause: Some(Duration::from_millis(100)),
        }
    }

    /// Health checks: 10 at a time, no pause.
    pub fn health() -> Self {
        Self {
            batch_size: 10,
            pause: None,
        }
    }

    pub fn from_scheduler(config: &SchedulerConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            pause: Some(Duration::from_millis(config.batch_delay_ms)),
        }
    }

    pub fn from_health(config: &HealthConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            pause: None,
        }
    }

    pub fn with_batch_size(self, batch_size: usize) -> Self {
        Self { batch_size, ..self }
    }
}

/// Run `op` over `items`, one batch at a time.
///
/// Results come back in input order.
pub async fn run_in_batches<'a, T, R, F, Fut>(items: &'a [T], policy: BatchPolicy, op: F) -> Vec<R>
where
    F: Fn(&'a T) -> Fut,
    Fut: Future<Output = R>,
{
    let batch_size = policy.batch_size.max(1);
    let batch_count = items.len().div_ceil(batch_size);
    let mut results = Vec::with_capacity(items.len());

    for (index, batch) in items.chunks(batch_size).enumerate() {
        log::debug!(
            "Batch {}/{} ({} items)",
            index + 1,
            batch_count,
            batch.len()
        );
        results.extend(join_all(batch.iter().map(&op)).await);

        let is_last = index + 1 == batch_count;
        if let Some(pause) = policy.pause.filter(|p| !p.is_zero() && !is_last) {
            tokio::time::sleep(pause).await;
        }
    }

    results
}

/// Aggregate of a batched content fetch.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub articles: Vec<ArticleRecord>,
    pub errors: Vec<String>,
    pub success_count: usize,
    pub error_count: usize,
    pub total_time_ms: u64,
}

impl BatchOutcome {
    fn record(&mut self, result: FetchResult) {
        match result.error {
            None => {
                self.success_count += 1;
                self.articles.extend(result.articles);
            }
            Some(error) => {
                self.error_count += 1;
                self.errors.push(format!("{}: {}", result.source.name, error));
            }
        }
    }
}

/// Fetch every active source and flatten the results.
pub async fn fetch_batch(
    fetcher: &FeedFetcher,
    sources: &[FeedSource],
    policy: BatchPolicy,
    max_retries: u32,
) -> BatchOutcome {
    let started = Instant::now();
    let active = active_sources(sources);

    let results = run_in_batches(&active, policy, |source| fetcher.fetch(source, max_retries)).await;

    let mut outcome = BatchOutcome::default();
    for result in results {
        outcome.record(result);
    }
    outcome.total_time_ms = started.elapsed().as_millis() as u64;

    log::info!(
        "Fetched {} articles from {}/{} sources in {}ms",
        outcome.articles.len(),
        outcome.success_count,
        active.len(),
        outcome.total_time_ms
    );
    outcome
}
