//! RSS/Atom feed fetcher.
//!
//! Each configured feed is requested once with the site's User-Agent. A feed
//! that fails to download or parse is logged and skipped; the remaining feeds
//! still contribute their entries.

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::models::{FeedEntry, NewsItem};
use crate::translate::{Translate, translate_or_original};
use feed_rs::model::Entry;
use reqwest::Client;
use std::collections::HashSet;
use url::Url;
use tracing::{debug, info, instrument, warn};

/// Fetches the configured feeds and prepares news items for one language.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    urls: Vec<String>,
    max_items: usize,
}

impl FeedFetcher {
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(FeedError::Client)?;
        Ok(Self {
            client,
            urls: config.urls.clone(),
            max_items: config.max_items,
        })
    }

    /// Download and parse a single feed, keeping at most `max_items` entries.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_feed(&self, url: &str) -> Result<Vec<FeedEntry>, FeedError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FeedError::Request {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(|source| FeedError::Request {
            url: url.to_string(),
            source,
        })?;
        let entries = parse_entries(&body, self.max_items)?;
        debug!(count = entries.len(), "Parsed feed entries");
        Ok(entries)
    }

    /// Fetch every feed and return its entries as [`NewsItem`]s translated
    /// into `lang`.
    ///
    /// Items keep feed-then-entry order. Entries with an empty link, or with a
    /// link already seen during this call, are dropped. Returns an empty list
    /// when every feed fails.
    #[instrument(level = "info", skip(self, translator))]
    pub async fn fetch_latest_news<T: Translate>(&self, translator: &T, lang: &str) -> Vec<NewsItem> {
        let mut items = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for url in &self.urls {
            let entries = match self.fetch_feed(url).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(%url, error = %e, "Feed fetch failed; skipping feed");
                    continue;
                }
            };

            for entry in entries {
                if entry.link.is_empty() || !seen.insert(entry.link.clone()) {
                    continue;
                }
                let title = translate_or_original(translator, &entry.title, lang).await;
                let summary = translate_or_original(translator, &entry.summary, lang).await;
                items.push(NewsItem {
                    title,
                    summary,
                    url: entry.link,
                    raw_title: entry.title,
                    raw_summary: entry.summary,
                });
            }
        }

        info!(count = items.len(), "Collected news items");
        items
    }
}

/// Parse RSS or Atom bytes into at most `cap` entries, in document order.
pub fn parse_entries(body: &[u8], cap: usize) -> Result<Vec<FeedEntry>, FeedError> {
    let feed = feed_rs::parser::parse(body)?;
    Ok(feed.entries.iter().take(cap).map(to_feed_entry).collect())
}

fn to_feed_entry(entry: &Entry) -> FeedEntry {
    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.clone())
        .unwrap_or_default();
    let summary = entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
        .unwrap_or_default();
    FeedEntry {
        link: select_entry_link(entry),
        title,
        summary,
    }
}

/// Prefer an `alternate` (or untyped) link, then any non-empty link, then an
/// entry id that is itself a web URL (RSS `<guid isPermaLink="true">`).
fn select_entry_link(entry: &Entry) -> String {
    let non_empty = || entry.links.iter().filter(|l| !l.href.trim().is_empty());
    non_empty()
        .find(|l| {
            l.rel
                .as_deref()
                .is_none_or(|rel| rel.is_empty() || rel.eq_ignore_ascii_case("alternate"))
        })
        .or_else(|| non_empty().next())
        .map(|l| l.href.trim().to_string())
        .or_else(|| permalink_id(&entry.id))
        .unwrap_or_default()
}

fn permalink_id(id: &str) -> Option<String> {
    let url = Url::parse(id.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::Passthrough;
    use httpmock::prelude::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Human evolution</title>
    <link>https://news.example/</link>
    <description>Test feed</description>
    <item>
      <title>New fossils found near Hadar, Ethiopia</title>
      <link>https://news.example/hadar</link>
      <description>A partial skeleton was recovered in the Afar region.</description>
    </item>
    <item>
      <title>Untitled link-less entry</title>
      <description>No link here.</description>
    </item>
    <item>
      <title>Stone tools from Olduvai</title>
      <link>https://news.example/olduvai</link>
    </item>
    <item>
      <title>Ancient DNA from Denisova</title>
      <link>https://news.example/denisova</link>
      <description>Genomes sequenced.</description>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Phys</title>
  <id>urn:example:feed</id>
  <updated>2025-05-06T10:00:00Z</updated>
  <entry>
    <title>Same story syndicated</title>
    <id>urn:example:1</id>
    <updated>2025-05-06T10:00:00Z</updated>
    <link rel="alternate" href="https://news.example/hadar"/>
    <summary>Duplicate of the first feed.</summary>
  </entry>
  <entry>
    <title>Footprints in South Africa</title>
    <id>urn:example:2</id>
    <updated>2025-05-06T10:00:00Z</updated>
    <link rel="enclosure" href="https://cdn.example/photo.jpg"/>
    <link rel="alternate" href="https://phys.example/footprints"/>
    <summary>Tracks near Blombos.</summary>
  </entry>
</feed>"#;

    fn feed_config(urls: Vec<String>, max_items: usize) -> FeedConfig {
        FeedConfig {
            urls,
            max_items,
            user_agent: "Mozilla/5.0 (GenesiBot)".to_string(),
        }
    }

    #[test]
    fn test_parse_rss_entries() {
        let entries = parse_entries(RSS.as_bytes(), 10).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].title, "New fossils found near Hadar, Ethiopia");
        assert_eq!(entries[0].link, "https://news.example/hadar");
        assert_eq!(
            entries[0].summary,
            "A partial skeleton was recovered in the Afar region."
        );
        assert_eq!(entries[1].link, "");
        assert_eq!(entries[2].summary, "");
    }

    #[test]
    fn test_parse_respects_cap() {
        let entries = parse_entries(RSS.as_bytes(), 2).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_parse_atom_prefers_alternate_link() {
        let entries = parse_entries(ATOM.as_bytes(), 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].link, "https://phys.example/footprints");
        assert_eq!(entries[1].summary, "Tracks near Blombos.");
    }

    #[test]
    fn test_parse_falls_back_to_permalink_guid() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Human evolution</title>
    <link>https://news.example/</link>
    <description>Test feed</description>
    <item>
      <title>Guid-only story</title>
      <guid isPermaLink="true">https://news.example/guid-only</guid>
      <description>Teeth dated.</description>
    </item>
    <item>
      <title>Opaque guid</title>
      <guid isPermaLink="false">tag:news.example,2025:42</guid>
    </item>
  </channel>
</rss>"#;
        let entries = parse_entries(rss.as_bytes(), 10).unwrap();
        assert_eq!(entries[0].link, "https://news.example/guid-only");
        assert_eq!(entries[1].link, "");
    }

    #[test]
    fn test_parse_rejects_non_feed() {
        assert!(matches!(
            parse_entries(b"<html><body>nope</body></html>", 6),
            Err(FeedError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rss.xml")
                    .header("user-agent", "Mozilla/5.0 (GenesiBot)");
                then.status(200).body(RSS);
            })
            .await;

        let fetcher = FeedFetcher::new(&feed_config(vec![], 6)).unwrap();
        let entries = fetcher.fetch_feed(&server.url("/rss.xml")).await.unwrap();
        assert_eq!(entries.len(), 4);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_reports_http_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/down.xml");
                then.status(503);
            })
            .await;

        let fetcher = FeedFetcher::new(&feed_config(vec![], 6)).unwrap();
        let err = fetcher.fetch_feed(&server.url("/down.xml")).await.unwrap_err();
        assert!(matches!(err, FeedError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_latest_news_skips_failures_and_duplicates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rss.xml");
                then.status(200).body(RSS);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/broken.xml");
                then.status(500);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/atom.xml");
                then.status(200).body(ATOM);
            })
            .await;

        let urls = vec![
            server.url("/rss.xml"),
            server.url("/broken.xml"),
            server.url("/atom.xml"),
        ];
        let fetcher = FeedFetcher::new(&feed_config(urls, 6)).unwrap();
        let items = fetcher.fetch_latest_news(&Passthrough, "it").await;

        let links: Vec<&str> = items.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://news.example/hadar",
                "https://news.example/olduvai",
                "https://news.example/denisova",
                "https://phys.example/footprints",
            ]
        );
    }

    #[tokio::test]
    async fn test_latest_news_without_translation_keeps_raw_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rss.xml");
                then.status(200).body(RSS);
            })
            .await;

        let fetcher = FeedFetcher::new(&feed_config(vec![server.url("/rss.xml")], 6)).unwrap();
        let items = fetcher.fetch_latest_news(&Passthrough, "de").await;
        assert!(!items.is_empty());
        for item in &items {
            assert_eq!(item.title, item.raw_title);
            assert_eq!(item.summary, item.raw_summary);
        }
        assert_eq!(items[0].title, "New fossils found near Hadar, Ethiopia");
    }

    #[tokio::test]
    async fn test_latest_news_all_feeds_down() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(404);
            })
            .await;

        let urls = vec![server.url("/a.xml"), server.url("/b.xml")];
        let fetcher = FeedFetcher::new(&feed_config(urls, 6)).unwrap();
        assert!(fetcher.fetch_latest_news(&Passthrough, "en").await.is_empty());
    }
}
