// src/services/health.rs

//! Health monitoring.
//!
//! A check runs the fetcher with the health retry budget and folds the
//! outcome into the source's [`FeedHealthRecord`]. Panics raised while
//! fetching are caught here and recorded as ordinary failures, so callers
//! never see one.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;

use crate::error::AppError;
use crate::models::{
    CheckOutcome, FeedHealthRecord, FeedSource, HealthStatus, HealthSummary, HealthThresholds,
    active_sources,
};
use crate::pipeline::batch::{BatchPolicy, run_in_batches};
use crate::services::FeedFetcher;
use crate::storage::HealthStore;

/// Checks sources and keeps their health records up to date.
#[derive(Clone)]
pub struct HealthMonitor {
    fetcher: FeedFetcher,
    store: Arc<dyn HealthStore>,
    thresholds: HealthThresholds,
    max_retries: u32,
}

impl HealthMonitor {
    pub fn new(
        fetcher: FeedFetcher,
        store: Arc<dyn HealthStore>,
        thresholds: HealthThresholds,
        max_retries: u32,
    ) -> Self {
        Self {
            fetcher,
            store,
            thresholds,
            max_retries,
        }
    }

    /// Check one source and store its updated record.
    pub async fn check(&self, source: &FeedSource) -> FeedHealthRecord {
        let outcome = self.probe(source).await;
        let previous = self.store.get(&source.id).await;
        let record = FeedHealthRecord::after_check(
            previous.as_ref(),
            source,
            &outcome,
            self.thresholds,
            Utc::now(),
        );

        let was_failed = previous.is_some_and(|r| r.status == HealthStatus::Failed);
        if record.status == HealthStatus::Failed && !was_failed {
            log::warn!(
                "{} marked failed after {} consecutive failures: {}",
                source.name,
                record.consecutive_failures,
                record.last_error.as_deref().unwrap_or_default()
            );
        }

        self.store.set(record.clone()).await;
        record
    }

    /// Check every active source in batches and summarize the results.
    pub async fn check_all(&self, sources: &[FeedSource], policy: BatchPolicy) -> HealthSummary {
        let active = active_sources(sources);
        log::info!(
            "Checking health of {} active sources ({} configured)",
            active.len(),
            sources.len()
        );

        let records = run_in_batches(&active, policy, |source| self.check(source)).await;
        let summary = HealthSummary::from_records(records);

        log::info!(
            "Health: {} healthy, {} degraded, {} failed (avg {:.0}ms)",
            summary.healthy,
            summary.degraded,
            summary.failed,
            summary.average_response_time_ms
        );
        summary
    }

    async fn probe(&self, source: &FeedSource) -> CheckOutcome {
        let fetch = AssertUnwindSafe(self.fetcher.fetch(source, self.max_retries));
        match fetch.catch_unwind().await {
            Ok(result) => match result.error {
                None => CheckOutcome::Success {
                    response_time_ms: result.response_time_ms,
                },
                Some(message) => CheckOutcome::Failure {
                    message,
                    response_time_ms: result.response_time_ms,
                },
            },
            Err(payload) => {
                let error = AppError::unexpected(panic_message(payload.as_ref()));
                log::error!("Health check for {} failed unexpectedly: {}", source.name, error);
                CheckOutcome::Failure {
                    message: error.to_string(),
                    response_time_ms: 0,
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "health check panicked".to_string())
}
