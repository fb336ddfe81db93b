// src/services/extractor.rs

//! Content extraction.
//!
//! Turns raw feed items into [`ArticleRecord`]s. Nothing here performs I/O
//! and nothing here fails: every missing field has a fallback.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::models::{ArticleRecord, FeedSource, RawFeedItem};

/// Title used when an item has none.
pub const UNTITLED: &str = "Untitled";

/// Length of a derived snippet, in grapheme clusters.
pub const SNIPPET_LENGTH: usize = 200;

/// `src` must follow whitespace so `data-src` and friends never match; the
/// value runs to the matching quote.
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\ssrc\s*=\s*(?:"([^"]+)"|'([^']+)')"#).expect("valid img regex")
});

/// Normalize every item of a feed.
pub fn extract_articles(
    items: &[RawFeedItem],
    source: &FeedSource,
    now: DateTime<Utc>,
) -> Vec<ArticleRecord> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| extract_article(item, index, source, now))
        .collect()
}

/// Normalize one item. `index` is the item's position in the feed and
/// `now` stands in for a missing date.
pub fn extract_article(
    item: &RawFeedItem,
    index: usize,
    source: &FeedSource,
    now: DateTime<Utc>,
) -> ArticleRecord {
    let id = non_empty(&item.guid)
        .or_else(|| non_empty(&item.link))
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}-{}", source.id, index));

    let content = non_empty(&item.content)
        .or_else(|| non_empty(&item.encoded_content))
        .unwrap_or_default()
        .to_string();

    let snippet = non_empty(&item.snippet)
        .map(str::to_string)
        .unwrap_or_else(|| truncate(&content, SNIPPET_LENGTH));

    let published = non_empty(&item.published);
    let iso_date = published.and_then(parse_date).unwrap_or(now);
    let published_at = published
        .map(str::to_string)
        .unwrap_or_else(|| now.to_rfc3339());

    ArticleRecord {
        id,
        title: non_empty(&item.title).unwrap_or(UNTITLED).to_string(),
        link: non_empty(&item.link).unwrap_or_default().to_string(),
        published_at,
        iso_date,
        author: non_empty(&item.author).map(str::to_string),
        image_url: select_image(item),
        content,
        snippet,
        source_id: source.id.clone(),
        source_name: source.name.clone(),
        category: source.category.clone(),
    }
}

/// Pick the article image, highest priority first:
/// `media:content`, `media:thumbnail`, enclosure, an `<img>` in the content,
/// an `<img>` in the encoded content.
pub fn select_image(item: &RawFeedItem) -> Option<String> {
    non_empty(&item.media_content_url)
        .or_else(|| non_empty(&item.media_thumbnail_url))
        .or_else(|| non_empty(&item.enclosure_url))
        .map(str::to_string)
        .or_else(|| item.content.as_deref().and_then(first_img_src))
        .or_else(|| item.encoded_content.as_deref().and_then(first_img_src))
}

/// Find the `src` of the first `<img>` tag in an HTML fragment.
pub fn first_img_src(html: &str) -> Option<String> {
    IMG_SRC
        .captures(html)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|src| !src.is_empty())
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn truncate(text: &str, max: usize) -> String {
    text.graphemes(true).take(max).collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
