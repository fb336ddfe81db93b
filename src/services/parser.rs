// src/services/parser.rs

//! Feed payload parsing.
//!
//! RSS 2.0 is read with the `rss` crate so that the `media:*` extensions,
//! `content:encoded` and enclosures stay distinguishable. Anything that is
//! not RSS (Atom, JSON Feed) goes through `feed-rs`.

use std::collections::BTreeMap;

use rss::extension::Extension;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::RawFeedItem;

/// Parse a feed payload into raw items.
pub fn parse_feed_bytes(raw: &[u8]) -> Result<Vec<RawFeedItem>> {
    let trimmed = raw.trim_ascii_start();
    if trimmed.is_empty() {
        return Err(AppError::parse("feed payload is empty"));
    }

    match rss::Channel::read_from(trimmed) {
        Ok(channel) => Ok(channel.items().iter().map(item_from_rss).collect()),
        Err(rss_error) => {
            log::debug!("Not an RSS channel ({rss_error}), trying Atom/JSON Feed");
            let feed = feed_rs::parser::parse(trimmed).map_err(AppError::parse)?;
            Ok(feed.entries.iter().map(item_from_entry).collect())
        }
    }
}

fn item_from_rss(item: &rss::Item) -> RawFeedItem {
    let author = item.author().map(str::to_string).or_else(|| {
        item.dublin_core_ext()
            .and_then(|dc| dc.creators().first())
            .cloned()
    });
    let media = item.extensions().get("media");

    RawFeedItem {
        guid: item.guid().map(|g| g.value().to_string()),
        link: item.link().map(str::to_string),
        title: item.title().map(str::to_string),
        published: item.pub_date().map(str::to_string),
        author,
        content: item.description().map(str::to_string),
        snippet: item.description().map(strip_html).filter(|s| !s.is_empty()),
        encoded_content: item.content().map(str::to_string),
        media_content_url: media.and_then(|m| media_url(m, "content")),
        media_thumbnail_url: media.and_then(|m| media_url(m, "thumbnail")),
        enclosure_url: item.enclosure().map(|e| e.url().to_string()),
    }
}

/// `url` attribute of the first `media:<name>` element, looking inside
/// `media:group` when the element is not at the top level.
fn media_url(media: &BTreeMap<String, Vec<Extension>>, name: &str) -> Option<String> {
    let url_of = |extensions: Option<&Vec<Extension>>| {
        extensions
            .into_iter()
            .flatten()
            .find_map(|ext| ext.attrs().get("url").cloned())
    };

    url_of(media.get(name)).or_else(|| {
        media
            .get("group")
            .into_iter()
            .flatten()
            .find_map(|group| {
                let children = group.children();
                url_of(children.get(name))
                    .or_else(|| url_of(children.get(&format!("media:{name}"))))
            })
    })
}

fn item_from_entry(entry: &feed_rs::model::Entry) -> RawFeedItem {
    let summary = entry.summary.as_ref().map(|text| text.content.clone());
    let content = entry
        .content
        .as_ref()
        .and_then(|content| content.body.clone())
        .or_else(|| summary.clone());

    RawFeedItem {
        guid: Some(entry.id.clone()).filter(|id| !id.trim().is_empty()),
        link: entry.links.first().map(|link| link.href.clone()),
        title: entry.title.as_ref().map(|text| text.content.clone()),
        published: entry
            .published
            .or(entry.updated)
            .map(|timestamp| timestamp.to_rfc3339()),
        author: entry.authors.first().map(|person| person.name.clone()),
        content,
        snippet: summary
            .as_deref()
            .map(strip_html)
            .filter(|s| !s.is_empty()),
        encoded_content: None,
        media_content_url: entry
            .media
            .iter()
            .flat_map(|media| media.content.iter())
            .find_map(|content| content.url.as_ref().map(|url| url.to_string())),
        media_thumbnail_url: entry
            .media
            .iter()
            .flat_map(|media| media.thumbnails.iter())
            .map(|thumbnail| thumbnail.image.uri.clone())
            .next(),
        enclosure_url: None,
    }
}

/// Reduce an HTML fragment to its whitespace-normalized text.
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
     xmlns:media="http://search.yahoo.com/mrss/"
     xmlns:content="http://purl.org/rss/1.0/modules/content/"
     xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Example</title>
    <link>https://example.com</link>
    <description>Example feed</description>
    <item>
      <title>With media</title>
      <link>https://example.com/1</link>
      <guid>guid-1</guid>
      <pubDate>Mon, 02 Feb 2026 10:00:00 +0000</pubDate>
      <dc:creator>Jane Doe</dc:creator>
      <description><![CDATA[<p>Hello <b>world</b></p>]]></description>
      <content:encoded><![CDATA[<p><img src="https://img.example/enc.png"/></p>]]></content:encoded>
      <media:content url="https://img.example/media.jpg" medium="image"/>
      <media:thumbnail url="https://img.example/thumb.jpg"/>
      <enclosure url="https://img.example/enc.jpg" length="10" type="image/jpeg"/>
    </item>
    <item>
      <title>Grouped</title>
      <link>https://example.com/2</link>
      <media:group>
        <media:thumbnail url="https://img.example/group-thumb.jpg"/>
      </media:group>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Example</title>
  <id>urn:uuid:feed</id>
  <updated>2026-02-02T10:00:00Z</updated>
  <entry>
    <title>Atom entry</title>
    <id>urn:uuid:entry-1</id>
    <link href="https://example.com/atom/1"/>
    <updated>2026-02-02T10:00:00Z</updated>
    <author><name>John</name></author>
    <summary>Short &amp; sweet</summary>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss_with_extensions() {
        let items = parse_feed_bytes(RSS.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.guid.as_deref(), Some("guid-1"));
        assert_eq!(first.title.as_deref(), Some("With media"));
        assert_eq!(first.author.as_deref(), Some("Jane Doe"));
        assert_eq!(first.snippet.as_deref(), Some("Hello world"));
        assert_eq!(first.media_content_url.as_deref(), Some("https://img.example/media.jpg"));
        assert_eq!(first.media_thumbnail_url.as_deref(), Some("https://img.example/thumb.jpg"));
        assert_eq!(first.enclosure_url.as_deref(), Some("https://img.example/enc.jpg"));
        assert!(first.encoded_content.as_deref().unwrap().contains("enc.png"));
    }

    #[test]
    fn reads_media_group_children() {
        let items = parse_feed_bytes(RSS.as_bytes()).unwrap();
        let grouped = &items[1];
        assert!(grouped.guid.is_none());
        assert!(grouped.media_content_url.is_none());
        assert_eq!(
            grouped.media_thumbnail_url.as_deref(),
            Some("https://img.example/group-thumb.jpg")
        );
    }

    #[test]
    fn falls_back_to_atom() {
        let items = parse_feed_bytes(ATOM.as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        let entry = &items[0];
        assert_eq!(entry.guid.as_deref(), Some("urn:uuid:entry-1"));
        assert_eq!(entry.link.as_deref(), Some("https://example.com/atom/1"));
        assert_eq!(entry.author.as_deref(), Some("John"));
        assert_eq!(entry.snippet.as_deref(), Some("Short & sweet"));
        assert!(entry.published.is_some());
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(matches!(parse_feed_bytes(b"  \n "), Err(AppError::Parse(_))));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_feed_bytes(b"<html><body>not a feed</body></html>"),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn strip_html_normalizes_whitespace() {
        assert_eq!(strip_html("<p>a\n  <i>b</i></p>  c"), "a b c");
    }
}
