//! Machine translation of feed text and fixed site phrases.
//!
//! # Architecture
//!
//! - [`Translate`]: capability trait implemented by every provider
//! - [`GoogleTranslator`]: calls the public Google Translate endpoint with `sl=auto`
//! - [`Passthrough`]: returns text unchanged, used when translation is disabled
//! - [`Translator`]: the provider chosen at startup
//!
//! Providers report failures as [`TranslateError`]. The pipeline calls
//! [`translate_or_original`], which logs the failure and keeps the original
//! text, so a translation problem never stops a run.

use crate::error::TranslateError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Translate text into a target language.
pub trait Translate {
    /// Translate `text` into the language identified by `target`
    /// (an ISO 639-1 code such as `"en"`).
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError>;
}

/// Provider backed by the public Google Translate endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    fn request_url(&self, text: &str, target: &str) -> String {
        format!(
            "{}?client=gtx&sl=auto&tl={}&dt=t&q={}",
            self.endpoint,
            urlencoding::encode(target),
            urlencoding::encode(text)
        )
    }
}

impl Translate for GoogleTranslator {
    #[instrument(level = "debug", skip_all, fields(%target, chars = text.len()))]
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let t0 = Instant::now();
        let response = self.client.get(self.request_url(text, target)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        let translated = parse_translation(&body)?;
        debug!(elapsed_ms = t0.elapsed().as_millis(), "Translated text");
        Ok(translated)
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The payload looks like `[[["Hello","Ciao",...],["world","mondo",...]],...]`.
fn parse_translation(body: &str) -> Result<String, TranslateError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|_| TranslateError::Payload(truncate_for_log(body, 120)))?;
    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Payload(truncate_for_log(body, 120)))?;
    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        return Err(TranslateError::Payload("no translated segments".to_string()));
    }
    Ok(text)
}

/// Provider used when translation is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Translate for Passthrough {
    async fn translate(&self, text: &str, _target: &str) -> Result<String, TranslateError> {
        Ok(text.to_string())
    }
}

/// The translation provider selected for a run.
#[derive(Debug, Clone)]
pub enum Translator {
    Google(GoogleTranslator),
    Passthrough(Passthrough),
}

impl Translator {
    pub fn new(enabled: bool, endpoint: &str) -> Self {
        if enabled {
            Self::Google(GoogleTranslator::new(endpoint))
        } else {
            Self::Passthrough(Passthrough)
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Google(_))
    }
}

impl Translate for Translator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        match self {
            Self::Google(inner) => inner.translate(text, target).await,
            Self::Passthrough(inner) => inner.translate(text, target).await,
        }
    }
}

/// Translate `text`, falling back to the original on any provider error.
///
/// Empty text is returned as-is without calling the provider.
pub async fn translate_or_original<T: Translate>(translator: &T, text: &str, target: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    match translator.translate(text, target).await {
        Ok(translated) => translated,
        Err(e) => {
            warn!(
                %target,
                error = %e,
                text = %truncate_for_log(text, 80),
                "Translation failed; keeping original text"
            );
            text.to_string()
        }
    }
}
