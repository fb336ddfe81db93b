//! Service layer for feed acquisition.
//!
//! This module contains the business logic for:
//! - Item normalization (`extractor`)
//! - Payload parsing (`parser`) and loading (`FeedLoader`)
//! - Retrying fetches (`FeedFetcher`)
//! - Health tracking (`HealthMonitor`)
//!
//! [`FeedService`] ties them together behind the operations that
//! collaborators call.

pub mod extractor;
mod fetcher;
mod health;
mod loader;
pub mod parser;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use fetcher::FeedFetcher;
pub use health::HealthMonitor;
pub use loader::{FeedLoader, HttpFeedLoader};

use crate::error::Result;
use crate::models::{Config, FeedHealthRecord, FeedSource, FetchResult, HealthSummary};
use crate::pipeline::batch::{self, BatchOutcome, BatchPolicy};
use crate::storage::{HealthStore, InMemoryHealthStore};

/// Entry point for content fetching and health monitoring.
#[derive(Clone)]
pub struct FeedService {
    fetcher: FeedFetcher,
    monitor: HealthMonitor,
    store: Arc<dyn HealthStore>,
    content_policy: BatchPolicy,
    health_policy: BatchPolicy,
    max_retries: u32,
}

impl FeedService {
    /// Create a service around the given loader and store.
    pub fn new(config: &Config, loader: Arc<dyn FeedLoader>, store: Arc<dyn HealthStore>) -> Self {
        let fetcher = FeedFetcher::from_config(loader, &config.fetcher);
        let monitor = HealthMonitor::new(
            fetcher.clone(),
            Arc::clone(&store),
            config.health.thresholds(),
            config.health.max_retries,
        );

        Self {
            fetcher,
            monitor,
            store,
            content_policy: BatchPolicy::from_scheduler(&config.scheduler),
            health_policy: BatchPolicy::from_health(&config.health),
            max_retries: config.fetcher.max_retries,
        }
    }

    /// Create a service that fetches over HTTP and keeps health in memory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let loader = HttpFeedLoader::from_config(&config.fetcher)?;
        Ok(Self::new(
            config,
            Arc::new(loader),
            Arc::new(InMemoryHealthStore::new()),
        ))
    }

    /// Fetch one source. Uses the configured retry budget unless overridden.
    pub async fn fetch_one(&self, source: &FeedSource, max_retries: Option<u32>) -> FetchResult {
        self.fetcher
            .fetch(source, max_retries.unwrap_or(self.max_retries))
            .await
    }

    /// Fetch all active sources in paced batches.
    pub async fn fetch_batch(&self, sources: &[FeedSource], batch_size: Option<usize>) -> BatchOutcome {
        let policy = match batch_size {
            Some(size) => self.content_policy.with_batch_size(size),
            None => self.content_policy,
        };
        batch::fetch_batch(&self.fetcher, sources, policy, self.max_retries).await
    }

    /// Run one health check and return the updated record.
    pub async fn check_health(&self, source: &FeedSource) -> FeedHealthRecord {
        self.monitor.check(source).await
    }

    /// Check every active source and summarize.
    pub async fn check_all_health(&self, sources: &[FeedSource]) -> HealthSummary {
        self.monitor.check_all(sources, self.health_policy).await
    }

    pub async fn get_health(&self, source_id: &str) -> Option<FeedHealthRecord> {
        self.store.get(source_id).await
    }

    /// Every stored record, ordered by source id.
    pub async fn health_records(&self) -> Vec<FeedHealthRecord> {
        self.store.list().await
    }

    /// Forget all health history.
    pub async fn reset_health_store(&self) {
        self.store.clear().await;
    }
}
