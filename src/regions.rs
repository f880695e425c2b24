//! Geotagging of news items against an ordered list of regional hints.
//!
//! Each hint is a regular expression paired with a label and coordinates.
//! Hints are evaluated in definition order and the first match wins, so a
//! story mentioning both Kenya and Tanzania lands on whichever hint is listed
//! first. Items that match nothing are placed at [`UNSPECIFIED_LAT`],
//! [`UNSPECIFIED_LON`].
//!
//! Matching uses the untranslated feed text only, markup included: image
//! `alt` text and URLs in a summary often name the site.

use crate::chapter::LocalizedPhrases;
use crate::config::RegionHint;
use crate::error::ConfigError;
use crate::models::{Marker, NewsItem};
use crate::translate::{Translate, translate_or_original};
use itertools::Itertools;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, instrument};

pub const UNSPECIFIED_LAT: f64 = 20.0;
pub const UNSPECIFIED_LON: f64 = 0.0;

/// A compiled hint.
#[derive(Debug, Clone)]
pub struct RegionRule {
    regex: Regex,
    pub label: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone)]
pub struct RegionClassifier {
    rules: Vec<RegionRule>,
}

impl RegionClassifier {
    pub fn new(hints: &[RegionHint]) -> Result<Self, ConfigError> {
        let rules = hints
            .iter()
            .map(|hint| {
                let regex = Regex::new(&hint.pattern).map_err(|source| ConfigError::Pattern {
                    pattern: hint.pattern.clone(),
                    source,
                })?;
                Ok(RegionRule {
                    regex,
                    label: hint.label.clone(),
                    lat: hint.lat,
                    lon: hint.lon,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { rules })
    }

    /// First rule matching `text` (compared lower-cased).
    pub fn classify(&self, text: &str) -> Option<&RegionRule> {
        let text = text.to_lowercase();
        self.rules.iter().find(|rule| rule.regex.is_match(&text))
    }

    /// Build one marker per item, in item order.
    ///
    /// A (label, url) pair is emitted once; labels are translated into
    /// `lang` before the comparison.
    #[instrument(level = "info", skip_all, fields(%lang, items = items.len()))]
    pub async fn detect_markers<T: Translate>(
        &self,
        items: &[NewsItem],
        translator: &T,
        lang: &str,
        phrases: &LocalizedPhrases,
    ) -> Vec<Marker> {
        let mut labels: HashMap<&str, String> = HashMap::new();
        let mut candidates = Vec::with_capacity(items.len());

        for item in items {
            let marker = match self.classify(&classification_text(item)) {
                Some(rule) => {
                    let label = match labels.get(rule.label.as_str()) {
                        Some(label) => label.clone(),
                        None => {
                            let label = translate_or_original(translator, &rule.label, lang).await;
                            labels.insert(rule.label.as_str(), label.clone());
                            label
                        }
                    };
                    debug!(url = %item.url, %label, "Item geotagged");
                    let title = popup_html(item, &label, phrases);
                    (label, item.url.clone(), Marker {
                        code: String::new(),
                        title,
                        lat: rule.lat,
                        lon: rule.lon,
                    })
                }
                None => {
                    debug!(url = %item.url, "No region hint matched");
                    let label = format!("<i>({})</i>", phrases.unspecified_location);
                    let title = popup_html(item, &label, phrases);
                    (label, item.url.clone(), Marker {
                        code: String::new(),
                        title,
                        lat: UNSPECIFIED_LAT,
                        lon: UNSPECIFIED_LON,
                    })
                }
            };
            candidates.push(marker);
        }

        candidates
            .into_iter()
            .unique_by(|(label, url, _)| (label.clone(), url.clone()))
            .map(|(_, _, marker)| marker)
            .collect()
    }
}

/// Raw title and summary joined by a space, markup included.
pub fn classification_text(item: &NewsItem) -> String {
    format!("{} {}", item.raw_title, item.raw_summary)
}

fn popup_html(item: &NewsItem, label: &str, phrases: &LocalizedPhrases) -> String {
    format!(
        "<b>{}</b><br/>{}<br/><a href='{}' target='_blank' rel='noopener'>🔗 {}</a>",
        item.title, label, item.url, phrases.source_link
    )
}
