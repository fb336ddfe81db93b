// src/models/article.rs

//! Raw feed items, normalized articles and fetch results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::FeedSource;

/// A feed item as produced by the parser, before normalization.
///
/// Every field is optional; the extractor decides the fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedItem {
    pub guid: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
    /// Date string as it appeared in the feed
    pub published: Option<String>,
    pub author: Option<String>,
    /// Main body (RSS `description`, Atom `content`)
    pub content: Option<String>,
    /// Plain-text summary, when the feed provides one
    pub snippet: Option<String>,
    /// RSS `content:encoded`
    pub encoded_content: Option<String>,
    /// `url` attribute of `media:content`
    pub media_content_url: Option<String>,
    /// `url` attribute of `media:thumbnail`
    pub media_thumbnail_url: Option<String>,
    pub enclosure_url: Option<String>,
}

/// One normalized item from a feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub id: String,
    pub title: String,
    pub link: String,
    /// Raw publication date from the feed
    pub published_at: String,
    pub iso_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub content: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub source_id: String,
    pub source_name: String,
    pub category: String,
}

/// Outcome of one fetch-and-retry cycle for a source.
///
/// Either `articles` or `error` carries information, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult {
    pub source: FeedSource,
    pub articles: Vec<ArticleRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub response_time_ms: u64,
}

impl FetchResult {
    /// A successful fetch.
    pub fn success(source: FeedSource, articles: Vec<ArticleRecord>, response_time_ms: u64) -> Self {
        Self {
            source,
            articles,
            error: None,
            response_time_ms,
        }
    }

    /// A failed fetch. The article list is always empty.
    pub fn failure(source: FeedSource, error: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            source,
            articles: Vec::new(),
            error: Some(error.into()),
            response_time_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
