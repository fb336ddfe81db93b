//! In-process health store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::FeedHealthRecord;
use crate::storage::HealthStore;

/// Health store held in memory; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryHealthStore {
    records: RwLock<HashMap<String, FeedHealthRecord>>,
}

impl InMemoryHealthStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HealthStore for InMemoryHealthStore {
    async fn get(&self, source_id: &str) -> Option<FeedHealthRecord> {
        self.records.read().await.get(source_id).cloned()
    }

    async fn set(&self, record: FeedHealthRecord) {
        self.records
            .write()
            .await
            .insert(record.source_id.clone(), record);
    }

    async fn list(&self) -> Vec<FeedHealthRecord> {
        let mut records: Vec<_> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.source_id.cmp(&b.source_id));
        records
    }

    async fn clear(&self) {
        self.records.write().await.clear();
    }
}
