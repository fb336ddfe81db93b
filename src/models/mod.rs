// src/models/mod.rs

//! Domain models for feed acquisition and health tracking.

mod article;
mod config;
mod health;
mod source;

// Re-export all public types
pub use article::{ArticleRecord, FetchResult, RawFeedItem};
pub use config::{Config, FetcherConfig, HealthConfig, SchedulerConfig};
pub use health::{CheckOutcome, FeedHealthRecord, HealthStatus, HealthSummary, HealthThresholds};
pub use source::{FeedSource, active_sources};
