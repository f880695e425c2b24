//! The daily run: fetch → translate → geotag → assemble → persist → render.
//!
//! Languages are processed one after another in configured order. A failing
//! feed or translation degrades to a fallback inside its stage; database and
//! file errors abort the run.

use crate::chapter::assemble_chapter;
use crate::config::SiteConfig;
use crate::error::SiteResult;
use crate::models::{ArchiveEntry, ArchiveExport, ChapterRecord};
use crate::outputs::{self, archive::write_archive};
use crate::ping::ping_search_engines;
use crate::regions::RegionClassifier;
use crate::scrapers::feeds::FeedFetcher;
use crate::storage::ChapterStore;
use crate::translate::Translate;
use reqwest::Client;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Per-invocation settings that are not part of the site itself.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Calendar date of the run, `YYYY-MM-DD`.
    pub date: String,
    pub output_dir: PathBuf,
    pub db_path: PathBuf,
    /// Submit the sitemap to search engines after writing the site.
    pub ping: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub date: String,
    /// (language code, item count) in processing order.
    pub items_per_lang: Vec<(String, usize)>,
    pub written: Vec<PathBuf>,
    pub pings_ok: usize,
}

#[instrument(level = "info", skip_all, fields(date = %options.date, languages = config.languages.len()))]
pub async fn run<T: Translate>(
    config: &SiteConfig,
    options: &RunOptions,
    translator: &T,
) -> SiteResult<RunSummary> {
    config.validate()?;
    let fetcher = FeedFetcher::new(&config.feeds)?;
    let classifier = RegionClassifier::new(&config.region_hints)?;
    let store = ChapterStore::open(&options.db_path)?;

    let mut archive = ArchiveExport::new();
    let mut items_per_lang = Vec::with_capacity(config.languages.len());

    for lang in &config.languages {
        let items = fetcher.fetch_latest_news(translator, &lang.code).await;
        let chapter = assemble_chapter(
            &items,
            &lang.code,
            &options.date,
            config,
            &classifier,
            translator,
        )
        .await;

        store.upsert(&ChapterRecord {
            date: options.date.clone(),
            lang: lang.code.clone(),
            title: config.chapter_title.clone(),
            content: chapter.html.clone(),
            sources: chapter.sources.clone(),
        })?;

        archive.insert(ArchiveEntry {
            date: options.date.clone(),
            lang: chapter.lang,
            global: chapter.html,
            markers: chapter.markers,
        });
        info!(lang = %lang.code, items = items.len(), "Language done");
        items_per_lang.push((lang.code.clone(), items.len()));
    }

    let rows = store.count_for_date(&options.date)?;
    info!(rows, "Chapters stored");

    let archive_path = options.output_dir.join(&config.files.archive);
    write_archive(&archive, &archive_path).await?;

    let mut written = vec![archive_path];
    written.extend(outputs::write_site(&archive, config, &options.date, &options.output_dir).await?);

    let mut pings_ok = 0;
    if options.ping {
        let results =
            ping_search_engines(&Client::new(), &config.ping_endpoints, &config.sitemap_url()?).await;
        pings_ok = results.iter().filter(|r| r.is_ok()).count();
    }

    Ok(RunSummary {
        date: options.date.clone(),
        items_per_lang,
        written,
        pings_ok,
    })
}
