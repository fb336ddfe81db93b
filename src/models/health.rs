// src/models/health.rs

//! Per-source reliability records and the aggregate summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::FeedSource;

/// Health classification of a source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Failed,
}

/// Consecutive-failure threshold that separates `Degraded` from `Failed`.
///
/// A count of zero is always `Healthy`; any other count below
/// `failed_after` is `Degraded`. The default of 4 yields degraded for
/// 1..=3 failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthThresholds {
    pub failed_after: u32,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self { failed_after: 4 }
    }
}

impl HealthThresholds {
    pub fn classify(&self, consecutive_failures: u32) -> HealthStatus {
        match consecutive_failures {
            0 => HealthStatus::Healthy,
            n if n >= self.failed_after => HealthStatus::Failed,
            _ => HealthStatus::Degraded,
        }
    }
}

/// What a single health check observed.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Success { response_time_ms: u64 },
    Failure { message: String, response_time_ms: u64 },
}

/// Rolling reliability state for one source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedHealthRecord {
    pub source_id: String,
    pub source_name: String,
    pub status: HealthStatus,
    pub last_checked_at: DateTime<Utc>,
    pub last_successful_fetch_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub average_response_time_ms: f64,
    pub last_error: Option<String>,
}

impl FeedHealthRecord {
    /// Compute the record that follows `previous` after one check.
    pub fn after_check(
        previous: Option<&FeedHealthRecord>,
        source: &FeedSource,
        outcome: &CheckOutcome,
        thresholds: HealthThresholds,
        now: DateTime<Utc>,
    ) -> Self {
        let previous_average = previous.map(|r| r.average_response_time_ms);
        let previous_failures = previous.map_or(0, |r| r.consecutive_failures);
        let previous_success = previous.and_then(|r| r.last_successful_fetch_at);

        match outcome {
            CheckOutcome::Success { response_time_ms } => Self {
                source_id: source.id.clone(),
                source_name: source.name.clone(),
                status: HealthStatus::Healthy,
                last_checked_at: now,
                last_successful_fetch_at: Some(now),
                consecutive_failures: 0,
                average_response_time_ms: blend(previous_average, *response_time_ms as f64),
                last_error: None,
            },
            CheckOutcome::Failure {
                message,
                response_time_ms,
            } => {
                let consecutive_failures = previous_failures.saturating_add(1);
                Self {
                    source_id: source.id.clone(),
                    source_name: source.name.clone(),
                    status: thresholds.classify(consecutive_failures),
                    last_checked_at: now,
                    last_successful_fetch_at: previous_success,
                    consecutive_failures,
                    average_response_time_ms: blend(
                        previous_average,
                        *response_time_ms as f64,
                    ),
                    last_error: Some(message.clone()),
                }
            }
        }
    }
}

/// Two-sample blend with the previous average.
///
/// A previous average of zero counts as no previous value.
fn blend(previous: Option<f64>, sample: f64) -> f64 {
    match previous {
        Some(avg) if avg != 0.0 => (avg + sample) / 2.0,
        _ => sample,
    }
}

/// Aggregate view across all checked sources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub total: usize,
    pub healthy: usize,
    pub degraded: usize,
    pub failed: usize,
    /// Mean of the per-source averages; `0.0` when there are no records
    pub average_response_time_ms: f64,
    pub records: Vec<FeedHealthRecord>,
}

impl HealthSummary {
    pub fn from_records(records: Vec<FeedHealthRecord>) -> Self {
        let count = |status| records.iter().filter(|r| r.status == status).count();
        let healthy = count(HealthStatus::Healthy);
        let degraded = count(HealthStatus::Degraded);
        let failed = count(HealthStatus::Failed);

        let average_response_time_ms = if records.is_empty() {
            0.0
        } else {
            records
                .iter()
                .map(|r| r.average_response_time_ms)
                .sum::<f64>()
                / records.len() as f64
        };

        Self {
            total: records.len(),
            healthy,
            degraded,
            failed,
            average_response_time_ms,
            records,
        }
    }
}
