// src/pipeline/health.rs

//! Health check pipeline.

use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::models::{Config, HealthStatus, HealthSummary};
use crate::services::FeedService;
use crate::utils::fs::write_json;

/// Check every configured source `rounds` times, sleeping `interval`
/// between rounds, and optionally save the final summary as JSON.
///
/// Records carry over between rounds, so repeated failures can reach the
/// failed status within a single run.
pub async fn run_health(
    config: &Config,
    service: &FeedService,
    rounds: u32,
    interval: Duration,
    output: Option<&Path>,
) -> Result<HealthSummary> {
    let rounds = rounds.max(1);
    let mut summary = service.check_all_health(&config.sources).await;
    for round in 2..=rounds {
        if !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
        log::debug!("Health round {}/{}", round, rounds);
        summary = service.check_all_health(&config.sources).await;
    }

    for record in summary
        .records
        .iter()
        .filter(|r| r.status != HealthStatus::Healthy)
    {
        log::warn!(
            "{} is {:?} ({} consecutive failures): {}",
            record.source_name,
            record.status,
            record.consecutive_failures,
            record.last_error.as_deref().unwrap_or_default()
        );
    }

    if let Some(path) = output {
        write_json(path, &summary).await?;
        log::info!("Saved health summary to {}", path.display());
    }

    Ok(summary)
}
