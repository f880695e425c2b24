//! Data models shared by the pipeline stages.
//!
//! - [`FeedEntry`]: an entry as read from a feed, before translation
//! - [`NewsItem`]: a feed entry with its text translated for one language
//! - [`Marker`]: a map marker with its popup markup
//! - [`ChapterRecord`]: the row persisted per (date, language)
//! - [`ArchiveEntry`] / [`ArchiveExport`]: the JSON archive embedded in the page

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A raw feed entry. Missing fields are empty strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedEntry {
    pub link: String,
    pub title: String,
    pub summary: String,
}

/// A news item prepared for one language.
///
/// `title` and `summary` hold the translated text; the `raw_*` fields keep
/// what the feed published so geotagging does not depend on translation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub raw_title: String,
    pub raw_summary: String,
}

/// A marker on the page map.
///
/// `code` is the country code for fixed markers and empty for markers derived
/// from news items. `title` is the HTML shown in the popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub code: String,
    pub title: String,
    pub lat: f64,
    pub lon: f64,
}

/// One persisted chapter: key is (`date`, `lang`).
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterRecord {
    pub date: String,
    pub lang: String,
    pub title: String,
    pub content: String,
    pub sources: Vec<String>,
}

/// Archive data for one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub date: String,
    pub lang: String,
    /// Chapter HTML.
    pub global: String,
    pub markers: Vec<Marker>,
}

/// The whole archive of a run, keyed by language code.
///
/// Serializes as a JSON object whose keys keep insertion order, which is the
/// configured language order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveExport {
    entries: Vec<ArchiveEntry>,
}

impl ArchiveExport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `entry.lang`.
    pub fn insert(&mut self, entry: ArchiveEntry) {
        match self.entries.iter_mut().find(|e| e.lang == entry.lang) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, lang: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.lang == lang)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for ArchiveExport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.lang, entry)?;
        }
        map.end()
    }
}
