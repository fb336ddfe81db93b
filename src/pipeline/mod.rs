//! Batch scheduling and pipeline entry points.
//!
//! - `run_fetch`: Fetch articles from all configured sources
//! - `run_health`: Check and summarize source health

pub mod batch;
mod fetch;
mod health;

pub use batch::{BatchOutcome, BatchPolicy, fetch_batch, run_in_batches};
pub use fetch::run_fetch;
pub use health::run_health;
