//! Per-language chapter assembly.
//!
//! A chapter is the HTML block shown for one language on one day:
//!
//! ```text
//! <p>{header} ({date})</p>
//! <details><summary><h3>{title}</h3></summary><p>{summary}</p><p><a ...>🔗 {source}</a></p></details>
//! ...
//! ```
//!
//! or, when no item was fetched, the header followed by the "no news"
//! sentence. The chapter also carries the map markers for the language: the
//! fixed country markers first, then one marker per item.

use crate::config::{CountryMarker, Phrases, SiteConfig};
use crate::models::{Marker, NewsItem};
use crate::regions::RegionClassifier;
use crate::translate::{Translate, translate_or_original};
use tracing::{info, instrument};

/// Site phrases translated into one language.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedPhrases {
    pub header: String,
    pub no_news: String,
    pub unspecified_location: String,
    pub source_link: String,
}

impl LocalizedPhrases {
    pub async fn resolve<T: Translate>(phrases: &Phrases, translator: &T, lang: &str) -> Self {
        Self {
            header: translate_or_original(translator, &phrases.header, lang).await,
            no_news: translate_or_original(translator, &phrases.no_news, lang).await,
            unspecified_location: translate_or_original(translator, &phrases.unspecified_location, lang)
                .await,
            source_link: translate_or_original(translator, &phrases.source_link, lang).await,
        }
    }
}

/// The assembled content for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub lang: String,
    pub html: String,
    pub markers: Vec<Marker>,
    /// Item URLs, in item order.
    pub sources: Vec<String>,
}

#[instrument(level = "info", skip_all, fields(%lang, %date, items = items.len()))]
pub async fn assemble_chapter<T: Translate>(
    items: &[NewsItem],
    lang: &str,
    date: &str,
    config: &SiteConfig,
    classifier: &RegionClassifier,
    translator: &T,
) -> Chapter {
    let phrases = LocalizedPhrases::resolve(&config.phrases, translator, lang).await;
    let html = render_chapter_html(items, date, &phrases);

    let mut markers = country_markers(&config.countries, translator, lang).await;
    let auto_markers = classifier
        .detect_markers(items, translator, lang, &phrases)
        .await;
    let auto_count = auto_markers.len();
    markers.extend(auto_markers);

    info!(
        markers = markers.len(),
        auto_markers = auto_count,
        "Chapter assembled"
    );

    Chapter {
        lang: lang.to_string(),
        html,
        markers,
        sources: items.iter().map(|item| item.url.clone()).collect(),
    }
}

/// Chapter HTML for already-translated items and phrases.
pub fn render_chapter_html(items: &[NewsItem], date: &str, phrases: &LocalizedPhrases) -> String {
    let mut html = format!("<p>{} ({})</p>", phrases.header, date);

    if items.is_empty() {
        html.push_str(&format!("<p>{}</p>", phrases.no_news));
        return html;
    }

    for item in items {
        html.push_str(&format!(
            "<details><summary><h3>{}</h3></summary><p>{}</p>\
             <p><a href='{}' target='_blank' rel='noopener'>🔗 {}</a></p></details>",
            item.title, item.summary, item.url, phrases.source_link
        ));
    }
    html
}

/// Fixed markers with their labels translated into `lang`.
pub async fn country_markers<T: Translate>(
    countries: &[CountryMarker],
    translator: &T,
    lang: &str,
) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(countries.len());
    for country in countries {
        markers.push(Marker {
            code: country.code.clone(),
            title: translate_or_original(translator, &country.label, lang).await,
            lat: country.lat,
            lon: country.lon,
        });
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use crate::translate::Passthrough;

    /// Prefixes every text with the target language.
    struct Tagging;

    impl Translate for Tagging {
        async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
            Ok(format!("[{target}] {text}"))
        }
    }

    fn news(title: &str, url: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            summary: format!("About {title}."),
            url: url.to_string(),
            raw_title: title.to_string(),
            raw_summary: format!("About {title}."),
        }
    }

    #[tokio::test]
    async fn test_empty_chapter_uses_fallback_and_fixed_markers() {
        let config = SiteConfig::default();
        let classifier = RegionClassifier::new(&config.region_hints).unwrap();
        let chapter = assemble_chapter(&[], "it", "2025-05-06", &config, &classifier, &Passthrough).await;

        assert_eq!(
            chapter.html,
            "<p>Oggi, un nuovo capitolo della nostra origine. (2025-05-06)</p>\
             <p>Nessuna notizia disponibile oggi.</p>"
        );
        let expected = country_markers(&config.countries, &Passthrough, "it").await;
        assert_eq!(chapter.markers, expected);
        assert_eq!(chapter.markers.len(), 3);
        assert!(chapter.sources.is_empty());
    }

    #[tokio::test]
    async fn test_chapter_with_items() {
        let config = SiteConfig::default();
        let classifier = RegionClassifier::new(&config.region_hints).unwrap();
        let items = vec![
            news("Lucy's cousin found in Afar", "https://n.example/afar"),
            news("Brain evolution model", "https://n.example/brain"),
        ];
        let chapter =
            assemble_chapter(&items, "it", "2025-05-06", &config, &classifier, &Passthrough).await;

        assert!(chapter.html.starts_with("<p>Oggi, un nuovo capitolo della nostra origine. (2025-05-06)</p>"));
        assert_eq!(chapter.html.matches("<details>").count(), 2);
        assert!(chapter.html.contains(
            "<details><summary><h3>Lucy's cousin found in Afar</h3></summary>\
             <p>About Lucy's cousin found in Afar.</p>\
             <p><a href='https://n.example/afar' target='_blank' rel='noopener'>🔗 Fonte</a></p></details>"
        ));
        assert!(!chapter.html.contains("Nessuna notizia"));
        assert_eq!(chapter.sources, vec!["https://n.example/afar", "https://n.example/brain"]);

        // 3 fixed + 2 derived
        assert_eq!(chapter.markers.len(), 5);
        assert_eq!(chapter.markers[0].code, "GR");
        assert_eq!((chapter.markers[3].lat, chapter.markers[3].lon), (9.1, 38.7));
        assert_eq!((chapter.markers[4].lat, chapter.markers[4].lon), (20.0, 0.0));
    }

    #[tokio::test]
    async fn test_phrases_and_labels_are_translated() {
        let config = SiteConfig::default();
        let classifier = RegionClassifier::new(&config.region_hints).unwrap();
        let chapter = assemble_chapter(&[], "en", "2025-05-06", &config, &classifier, &Tagging).await;

        assert!(chapter.html.starts_with("<p>[en] Oggi, un nuovo capitolo"));
        assert!(chapter.html.contains("<p>[en] Nessuna notizia disponibile oggi.</p>"));
        assert_eq!(chapter.markers[1].title, "[en] Etiopia: Lucy");
        assert_eq!((chapter.markers[1].lat, chapter.markers[1].lon), (9.1, 38.7));
    }

    #[test]
    fn test_render_chapter_html_fallback() {
        let phrases = LocalizedPhrases {
            header: "Today, a new chapter of our origin.".to_string(),
            no_news: "No news available today.".to_string(),
            unspecified_location: "Unspecified location".to_string(),
            source_link: "Source".to_string(),
        };
        assert_eq!(
            render_chapter_html(&[], "2025-01-02", &phrases),
            "<p>Today, a new chapter of our origin. (2025-01-02)</p><p>No news available today.</p>"
        );
    }
}
