// src/services/fetcher.rs

//! Retrying feed fetcher.
//!
//! Wraps a [`FeedLoader`] with a per-attempt timeout and exponential
//! backoff. Every failure ends up in the returned [`FetchResult`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use crate::error::{AppError, Result};
use crate::models::{FeedSource, FetchResult, FetcherConfig, RawFeedItem};
use crate::services::FeedLoader;
use crate::services::extractor::extract_articles;

/// Largest backoff exponent; keeps the shift in range for huge retry counts.
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Fetches one source with bounded retries.
#[derive(Clone)]
pub struct FeedFetcher {
    loader: Arc<dyn FeedLoader>,
    timeout: Duration,
    backoff_base: Duration,
}

impl FeedFetcher {
    pub fn new(loader: Arc<dyn FeedLoader>, timeout: Duration, backoff_base: Duration) -> Self {
        Self {
            loader,
            timeout,
            backoff_base,
        }
    }

    /// Create a fetcher using the timeout and backoff from `config`.
    pub fn from_config(loader: Arc<dyn FeedLoader>, config: &FetcherConfig) -> Self {
        Self::new(loader, config.timeout(), config.backoff_base())
    }

    /// Delay slept after failed attempt number `attempt` (zero based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(1 << attempt.min(MAX_BACKOFF_EXPONENT))
    }

    /// Fetch and normalize a source, trying up to `max_retries` times.
    ///
    /// At least one attempt is always made. The response time covers all
    /// attempts and backoff sleeps.
    pub async fn fetch(&self, source: &FeedSource, max_retries: u32) -> FetchResult {
        let attempts = max_retries.max(1);
        let started = Instant::now();
        let mut last_error = String::new();

        for attempt in 0..attempts {
            match self.attempt(source).await {
                Ok(items) => {
                    let articles = extract_articles(&items, source, Utc::now());
                    log::debug!(
                        "Fetched {} articles from {} on attempt {}",
                        articles.len(),
                        source.name,
                        attempt + 1
                    );
                    return FetchResult::success(source.clone(), articles, elapsed_ms(started));
                }
                Err(error) => {
                    log::debug!(
                        "Attempt {}/{} for {} ({}) failed: {}",
                        attempt + 1,
                        attempts,
                        source.name,
                        source.url,
                        error
                    );
                    last_error = error.to_string();
                    if attempt + 1 < attempts {
                        tokio::time::sleep(self.backoff(attempt)).await;
                    }
                }
            }
        }

        let message = format!("Failed after {attempts} attempts: {last_error}");
        log::warn!("{}: {}", source.name, message);
        FetchResult::failure(source.clone(), message, elapsed_ms(started))
    }

    async fn attempt(&self, source: &FeedSource) -> Result<Vec<RawFeedItem>> {
        tokio::time::timeout(self.timeout, self.loader.load(&source.url))
            .await
            .map_err(|_| AppError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })?
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
