// src/pipeline/fetch.rs

//! Content fetching pipeline.

use std::path::Path;

use crate::error::Result;
use crate::models::{Config, active_sources};
use crate::pipeline::batch::BatchOutcome;
use crate::services::FeedService;
use crate::utils::fs::write_json;

/// Fetch every configured source and optionally save the outcome as JSON.
pub async fn run_fetch(
    config: &Config,
    service: &FeedService,
    output: Option<&Path>,
) -> Result<BatchOutcome> {
    let active = active_sources(&config.sources).len();
    log::info!(
        "Fetching {} active sources ({} configured)",
        active,
        config.sources.len()
    );

    let outcome = service.fetch_batch(&config.sources, None).await;

    for error in &outcome.errors {
        log::warn!("{}", error);
    }
    log::info!(
        "Fetch complete: {} articles, {} succeeded, {} failed, {}ms",
        outcome.articles.len(),
        outcome.success_count,
        outcome.error_count,
        outcome.total_time_ms
    );

    if let Some(path) = output {
        write_json(path, &outcome).await?;
        log::info!("Saved fetch outcome to {}", path.display());
    }

    Ok(outcome)
}
