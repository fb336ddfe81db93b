//! Storage abstractions for health records.
//!
//! Records are keyed by source id. A store has no expiry and no capacity
//! bound; it only shrinks through [`HealthStore::clear`].

pub mod memory;

use async_trait::async_trait;

use crate::models::FeedHealthRecord;

// Re-export for convenience
pub use memory::InMemoryHealthStore;

/// Trait for health record storage backends.
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Look up the record of one source.
    async fn get(&self, source_id: &str) -> Option<FeedHealthRecord>;

    /// Insert or replace the record for `record.source_id`.
    async fn set(&self, record: FeedHealthRecord);

    /// All records, ordered by source id.
    async fn list(&self) -> Vec<FeedHealthRecord>;

    /// Drop every record.
    async fn clear(&self);
}
