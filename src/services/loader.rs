// src/services/loader.rs

//! The fetch-and-parse primitive used by the fetcher.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FetcherConfig, RawFeedItem};
use crate::services::parser::parse_feed_bytes;
use crate::utils::http;

/// Fetches a feed URL and parses it into raw items.
///
/// Implementations report transport, status and parse failures as errors;
/// retrying and timeouts are the caller's concern.
#[async_trait]
pub trait FeedLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<Vec<RawFeedItem>>;
}

/// Loader backed by a `reqwest` client.
#[derive(Clone)]
pub struct HttpFeedLoader {
    client: reqwest::Client,
}

impl HttpFeedLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a loader with a client configured from `config`.
    pub fn from_config(config: &FetcherConfig) -> Result<Self> {
        Ok(Self::new(http::create_async_client(config)?))
    }
}

#[async_trait]
impl FeedLoader for HttpFeedLoader {
    async fn load(&self, url: &str) -> Result<Vec<RawFeedItem>> {
        let body = http::fetch_bytes(&self.client, url).await?;
        parse_feed_bytes(&body)
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;

    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::error::AppError;
    use crate::models::FeedSource;
    use crate::services::FeedFetcher;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>t</title><link>https://example.com</link><description>d</description>
<item><title>One</title><link>https://example.com/1</link></item>
<item><title>Two</title><link>https://example.com/2</link></item>
</channel></rss>"#;

    async fn spawn_test_server() -> (String, tokio::task::JoinHandle<()>) {
        let app = Router::new()
            .route("/feed.xml", get(|| async { FEED }))
            .route("/broken.xml", get(|| async { "this is not xml" }))
            .route(
                "/down.xml",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        let join_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        (format!("http://{address}"), join_handle)
    }

    #[tokio::test]
    async fn loads_and_parses_feed() {
        let (base, server) = spawn_test_server().await;
        let loader = HttpFeedLoader::from_config(&FetcherConfig::default()).unwrap();

        let items = loader.load(&format!("{base}/feed.xml")).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].title.as_deref(), Some("Two"));

        server.abort();
    }

    #[tokio::test]
    async fn reports_status_and_parse_errors() {
        let (base, server) = spawn_test_server().await;
        let loader = HttpFeedLoader::from_config(&FetcherConfig::default()).unwrap();

        let down = loader.load(&format!("{base}/down.xml")).await;
        assert!(matches!(down, Err(AppError::Status { status: 503, .. })));

        let broken = loader.load(&format!("{base}/broken.xml")).await;
        assert!(matches!(broken, Err(AppError::Parse(_))));

        server.abort();
    }

    #[tokio::test]
    async fn fetch_over_http_never_fails_for_unreachable_urls() {
        let loader = HttpFeedLoader::from_config(&FetcherConfig::default()).unwrap();
        let fetcher = FeedFetcher::new(
            Arc::new(loader),
            Duration::from_secs(2),
            Duration::from_millis(10),
        );

        let closed = FeedSource::new("closed", "Closed Port", "http://127.0.0.1:1/feed", "");
        let result = fetcher.fetch(&closed, 3).await;
        assert!(result.articles.is_empty());
        assert!(!result.is_success());
        let error = result.error.unwrap();
        assert!(error.starts_with("Failed after 3 attempts: "), "{error}");

        let malformed = FeedSource::new("bad", "Malformed", "not a url", "");
        let result = fetcher.fetch(&malformed, 2).await;
        assert!(result.articles.is_empty());
        assert!(result.error.unwrap().starts_with("Failed after 2 attempts: "));
    }
}
