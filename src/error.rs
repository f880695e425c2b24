//! Error types for each stage of the generator.
//!
//! Recoverable failures (a feed, a translation, a sitemap ping) have their own
//! enums so the calling stage can decide the fallback. Everything that must
//! abort the run funnels into [`SiteError`].

use thiserror::Error;

/// Failure while fetching or parsing one syndication feed.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not parse feed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// Failure reported by a translation provider.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("translation provider answered with HTTP {0}")]
    Status(u16),

    #[error("unexpected translation payload: {0}")]
    Payload(String),
}

/// Failure while notifying a search engine about the sitemap.
#[derive(Error, Debug)]
pub enum PingError {
    #[error("ping to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },
}

/// Invalid configuration (bad YAML, bad regex, bad site URL).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid region pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid site URL {0:?}")]
    SiteUrl(String),

    #[error("at least one language must be configured")]
    NoLanguages,
}

/// Fatal error: the run stops and the process exits with failure.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("file operation failed on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl SiteError {
    pub fn io<P: Into<String>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SiteResult<T> = std::result::Result<T, SiteError>;
