//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{FeedSource, HealthThresholds};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and retry behavior settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Content-path batching settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Health-check settings
    #[serde(default)]
    pub health: HealthConfig,

    /// Feed source definitions
    #[serde(default)]
    pub sources: Vec<FeedSource>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.max_retries == 0 {
            return Err(AppError::validation("fetcher.max_retries must be > 0"));
        }
        if self.scheduler.batch_size == 0 {
            return Err(AppError::validation("scheduler.batch_size must be > 0"));
        }
        if self.health.max_retries == 0 {
            return Err(AppError::validation("health.max_retries must be > 0"));
        }
        if self.health.batch_size == 0 {
            return Err(AppError::validation("health.batch_size must be > 0"));
        }
        if self.health.failed_after < 2 {
            return Err(AppError::validation("health.failed_after must be >= 2"));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.id.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "Source '{}' has an empty id",
                    source.name
                )));
            }
            if !seen.insert(source.id.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate source id '{}'",
                    source.id
                )));
            }
            let url = url::Url::parse(&source.url)?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(AppError::validation(format!(
                    "Source '{}' must use http or https, got {}",
                    source.id,
                    url.scheme()
                )));
            }
        }
        Ok(())
    }
}

/// HTTP client and retry behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-attempt timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Attempts per content fetch
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// First backoff delay; doubles after every failed attempt
    #[serde(default = "defaults::backoff_base")]
    pub backoff_base_ms: u64,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_retries: defaults::max_retries(),
            backoff_base_ms: defaults::backoff_base(),
        }
    }
}

/// Content fetch batching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Sources fetched concurrently per batch
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Pause between batches in milliseconds
    #[serde(default = "defaults::batch_delay")]
    pub batch_delay_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::batch_size(),
            batch_delay_ms: defaults::batch_delay(),
        }
    }
}

/// Health check settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Attempts per health check
    #[serde(default = "defaults::health_max_retries")]
    pub max_retries: u32,

    /// Sources checked concurrently per batch
    #[serde(default = "defaults::health_batch_size")]
    pub batch_size: usize,

    /// Consecutive failures after which a source is marked failed.
    ///
    /// Counts from 1 up to `failed_after - 1` are degraded, so the default of
    /// 4 gives degraded for 1..=3. Must be at least 2.
    #[serde(default = "defaults::failed_after")]
    pub failed_after: u32,
}

impl HealthConfig {
    pub fn thresholds(&self) -> HealthThresholds {
        HealthThresholds {
            failed_after: self.failed_after,
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_retries: defaults::health_max_retries(),
            batch_size: defaults::health_batch_size(),
            failed_after: defaults::failed_after(),
        }
    }
}

mod defaults {
    // Fetcher defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; feedwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        8
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn backoff_base() -> u64 {
        500
    }

    // Scheduler defaults
    pub fn batch_size() -> usize {
        5
    }
    pub fn batch_delay() -> u64 {
        100
    }

    // Health defaults
    pub fn health_max_retries() -> u32 {
        2
    }
    pub fn health_batch_size() -> usize {
        10
    }
    pub fn failed_after() -> u32 {
        4
    }
}
