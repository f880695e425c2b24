//! Site configuration.
//!
//! Everything the pipeline needs to know about the site lives in one
//! [`SiteConfig`] value that is passed down to each stage. The defaults
//! reproduce the Genesi site; a YAML file can override any subset of fields:
//!
//! ```yaml
//! site_url: https://example.org
//! languages:
//!   - { code: en, name: English }
//!   - { code: it, name: Italiano }
//! feeds:
//!   max_items: 3
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, instrument};
use url::Url;

/// A language the site is published in. The first configured language is
/// the one the page opens with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
}

impl Language {
    fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// A marker that appears on the map in every language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryMarker {
    /// ISO 3166 alpha-2 code.
    pub code: String,
    /// Popup text, translated per language.
    pub label: String,
    pub lat: f64,
    pub lon: f64,
}

impl CountryMarker {
    fn new(code: &str, label: &str, lat: f64, lon: f64) -> Self {
        Self {
            code: code.to_string(),
            label: label.to_string(),
            lat,
            lon,
        }
    }
}

/// One geotagging rule. Rules are tried in the order they are listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionHint {
    /// Regular expression matched against lower-cased item text.
    pub pattern: String,
    pub label: String,
    pub lat: f64,
    pub lon: f64,
}

impl RegionHint {
    fn new(pattern: &str, label: &str, lat: f64, lon: f64) -> Self {
        Self {
            pattern: pattern.to_string(),
            label: label.to_string(),
            lat,
            lon,
        }
    }
}

/// Fixed sentences, written in the source language and translated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phrases {
    pub header: String,
    pub no_news: String,
    pub unspecified_location: String,
    /// Text of the link pointing at an item's source.
    pub source_link: String,
}

impl Default for Phrases {
    fn default() -> Self {
        Self {
            header: "Oggi, un nuovo capitolo della nostra origine.".to_string(),
            no_news: "Nessuna notizia disponibile oggi.".to_string(),
            unspecified_location: "Località non specificata".to_string(),
            source_link: "Fonte".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub urls: Vec<String>,
    /// Entries considered per feed, per language.
    pub max_items: usize,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            urls: vec![
                "https://www.sciencedaily.com/rss/fossils_ruins/human_evolution.xml".to_string(),
                "https://phys.org/rss-feed/tags/human+evolution/".to_string(),
            ],
            max_items: 6,
            user_agent: "Mozilla/5.0 (GenesiBot)".to_string(),
        }
    }
}

/// File names written inside the output directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    pub archive: String,
    pub index: String,
    pub sitemap: String,
    pub robots: String,
    pub rewrites: String,
    pub logo: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            archive: "archive.json".to_string(),
            index: "index.html".to_string(),
            sitemap: "sitemap.xml".to_string(),
            robots: "robots.txt".to_string(),
            rewrites: "vercel.json".to_string(),
            logo: "genesi_logo.svg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Canonical URL of the published page, without trailing slash.
    pub site_url: String,
    pub languages: Vec<Language>,
    pub feeds: FeedConfig,
    pub countries: Vec<CountryMarker>,
    pub region_hints: Vec<RegionHint>,
    pub phrases: Phrases,
    /// Title stored with every chapter row.
    pub chapter_title: String,
    /// Base URL of the translation endpoint.
    pub translator_endpoint: String,
    /// Sitemap submission endpoints; the encoded sitemap URL is appended.
    pub ping_endpoints: Vec<String>,
    pub files: OutputFiles,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: "https://genesi.vrabo.it".to_string(),
            languages: vec![
                Language::new("it", "Italiano"),
                Language::new("en", "English"),
                Language::new("fr", "Français"),
                Language::new("es", "Español"),
                Language::new("de", "Deutsch"),
            ],
            feeds: FeedConfig::default(),
            countries: vec![
                CountryMarker::new("GR", "Grecia: Petralona", 40.6, 23.0),
                CountryMarker::new("ET", "Etiopia: Lucy", 9.1, 38.7),
                CountryMarker::new("IT", "Italia: Neanderthal", 42.5, 12.5),
            ],
            region_hints: default_region_hints(),
            phrases: Phrases::default(),
            chapter_title: "Capitolo Globale".to_string(),
            translator_endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            ping_endpoints: vec![
                "https://www.google.com/ping?sitemap=".to_string(),
                "https://www.bing.com/ping?sitemap=".to_string(),
            ],
            files: OutputFiles::default(),
        }
    }
}

fn default_region_hints() -> Vec<RegionHint> {
    vec![
        RegionHint::new(r"\b(etio(pia|pia)|ethiopia|afar|hadar)\b", "Etiopia (Afar/Hadar)", 9.1, 38.7),
        RegionHint::new(r"\b(israele|israel|skhul|levant(e)?)\b", "Israele (Skhul/Levant)", 31.8, 35.2),
        RegionHint::new(r"\b(denisov(a|an)|altai|siberia)\b", "Siberia (Grotta di Denisova)", 51.4, 84.7),
        RegionHint::new(r"\b(tibet|himalaya|alt(o|a)\s*quota|tibetan)\b", "Tibet/Himalaya", 30.0, 90.0),
        RegionHint::new(r"\b(sud\s*africa|south\s*africa|blombos|sterkfontein)\b", "Sudafrica", -29.0, 24.0),
        RegionHint::new(r"\b(kenya|turkana|olorgesa(il|ilie))\b", "Kenya (Turkana)", 3.5, 36.0),
        RegionHint::new(r"\b(tanzania|olduvai|old(u|o)vai)\b", "Tanzania (Olduvai)", -3.0, 35.4),
        RegionHint::new(r"\b(grecia|greece|petralona)\b", "Grecia (Petralona)", 40.6, 23.0),
        RegionHint::new(r"\b(italia|italy|grotta)\b", "Italia (siti vari)", 42.5, 12.5),
        RegionHint::new(r"\b(cina|china|xiahe)\b", "Cina (Xiahe/altro)", 35.0, 103.0),
        RegionHint::new(r"\b(georgia|dmanisi)\b", "Georgia (Dmanisi)", 41.5, 44.8),
        RegionHint::new(r"\b(marocco|jebel\s*irhoud)\b", "Marocco (Jebel Irhoud)", 31.95, -4.0),
        RegionHint::new(r"\b(australia|sahul)\b", "Australia (Sahul)", -25.0, 133.0),
        RegionHint::new(r"\b(america(s)?|and(es|ini)|amazon(as)?)\b", "Americhe", 0.0, -60.0),
    ]
}

impl SiteConfig {
    /// Load the configuration, starting from the defaults and applying the
    /// YAML file at `path` when one is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_string(),
                    source,
                })?;
                let config = Self::from_yaml(&raw)?;
                info!(path, "Loaded site configuration");
                config
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.is_empty() {
            return Err(ConfigError::NoLanguages);
        }
        self.parsed_site_url()?;
        Ok(())
    }

    /// Language selected when the page loads.
    pub fn default_language(&self) -> Option<&Language> {
        self.languages.first()
    }

    pub fn site_host(&self) -> Result<String, ConfigError> {
        self.parsed_site_url()?
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::SiteUrl(self.site_url.clone()))
    }

    pub fn sitemap_url(&self) -> Result<String, ConfigError> {
        self.page_asset_url(&self.files.sitemap)
    }

    pub fn page_asset_url(&self, file: &str) -> Result<String, ConfigError> {
        let base = format!("{}/", self.site_url.trim_end_matches('/'));
        Url::parse(&base)
            .and_then(|u| u.join(file))
            .map(|u| u.to_string())
            .map_err(|_| ConfigError::SiteUrl(self.site_url.clone()))
    }

    fn parsed_site_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.site_url).map_err(|_| ConfigError::SiteUrl(self.site_url.clone()))
    }
}
