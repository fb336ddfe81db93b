// src/models/source.rs

//! Feed source definitions.

use serde::{Deserialize, Serialize};

/// A configured remote feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedSource {
    /// Unique source identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Feed URL
    pub url: String,

    /// Category copied onto every article from this source
    #[serde(default)]
    pub category: String,

    /// Inactive sources are skipped by batch operations
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl FeedSource {
    /// Create an active source.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            category: category.into(),
            active: true,
        }
    }

    /// Return the same source marked inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Keep only the sources whose `active` flag is set.
pub fn active_sources(sources: &[FeedSource]) -> Vec<FeedSource> {
    sources.iter().filter(|s| s.active).cloned().collect()
}
