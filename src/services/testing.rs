//! Scripted loader shared by the service and pipeline tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::{AppError, Result};
use crate::models::{FeedSource, RawFeedItem};
use crate::services::FeedLoader;

/// What a scripted URL does when loaded.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Return this many items
    Items(usize),
    /// Sleep, then return this many items
    Slow(Duration, usize),
    /// Fail with a transport-style error
    Fail(&'static str),
    /// Sleep far beyond any timeout
    Hang,
    /// Panic inside the loader
    Panic,
}

/// A [`FeedLoader`] whose answers are scripted per URL.
///
/// When a URL has several queued behaviors they are used in order and the
/// last one repeats.
pub struct ScriptedLoader {
    default: Behavior,
    scripts: Mutex<HashMap<String, VecDeque<Behavior>>>,
    calls: Mutex<Vec<(String, Instant)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedLoader {
    pub fn new(default: Behavior) -> Self {
        Self {
            default,
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn script(self, url: &str, behaviors: Vec<Behavior>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), behaviors.into());
        self
    }

    /// Every call made so far, with the instant it started.
    pub fn calls(&self) -> Vec<(String, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_behavior(&self, url: &str) -> Behavior {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => self.default.clone(),
        }
    }
}

#[async_trait]
impl FeedLoader for ScriptedLoader {
    async fn load(&self, url: &str) -> Result<Vec<RawFeedItem>> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));
        let behavior = self.next_behavior(url);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let result = match behavior {
            Behavior::Items(n) => Ok(items(url, n)),
            Behavior::Slow(delay, n) => {
                tokio::time::sleep(delay).await;
                Ok(items(url, n))
            }
            Behavior::Fail(message) => Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                message,
            ))),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
            Behavior::Panic => panic!("scripted loader panic for {url}"),
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn items(url: &str, n: usize) -> Vec<RawFeedItem> {
    (0..n)
        .map(|i| RawFeedItem {
            guid: Some(format!("{url}#{i}")),
            title: Some(format!("Item {i}")),
            ..RawFeedItem::default()
        })
        .collect()
}

/// `count` active sources with URLs `https://feed-<i>.example/rss`.
pub fn sources(count: usize) -> Vec<FeedSource> {
    (0..count)
        .map(|i| {
            FeedSource::new(
                format!("feed-{i}"),
                format!("Feed {i}"),
                format!("https://feed-{i}.example/rss"),
                "test",
            )
        })
        .collect()
}
