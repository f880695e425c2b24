//! # Genesi site generator
//!
//! Builds the daily multilingual Genesi page: reads human-evolution news from
//! syndication feeds, translates it into each site language, pins each story
//! on a map, and writes a static single-page site.
//!
//! ## Usage
//!
//! ```sh
//! genesi_site -o ./public
//! ```
//!
//! ## Architecture
//!
//! One sequential pass per run:
//! 1. **Fetching**: read the configured RSS/Atom feeds ([`scrapers::feeds`])
//! 2. **Translation**: translate titles, summaries and site phrases ([`translate`])
//! 3. **Geotagging**: match raw item text against region hints ([`regions`])
//! 4. **Assembly**: build one HTML chapter per language ([`chapter`])
//! 5. **Persistence**: upsert chapters into SQLite and write `archive.json`
//!    ([`storage`], [`outputs::archive`])
//! 6. **Rendering**: write `index.html`, sitemap, robots, rewrites and logo ([`outputs`])
//! 7. **Notification**: optionally ping search engines ([`ping`])

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod chapter;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod ping;
mod pipeline;
mod regions;
mod scrapers;
mod storage;
mod translate;
mod utils;

use cli::Cli;
use config::SiteConfig;
use pipeline::{RunOptions, run};
use translate::Translator;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("genesi_site starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = match SiteConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid site configuration");
            return Err(e.into());
        }
    };
    if let Some(max_items) = args.max_items {
        config.feeds.max_items = max_items;
    }

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let translator = Translator::new(!args.no_translate, &config.translator_endpoint);
    let date = args
        .date
        .unwrap_or_else(|| Local::now().date_naive())
        .to_string();
    info!(%date, translation = translator.is_enabled(), "Generating edition");

    let options = RunOptions {
        date,
        output_dir: PathBuf::from(&args.output_dir),
        db_path: PathBuf::from(&args.db_path),
        ping: args.ping,
    };

    let summary = match run(&config, &options, &translator).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Run failed");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        date = %summary.date,
        languages = summary.items_per_lang.len(),
        files = summary.written.len(),
        pings_ok = summary.pings_ok,
        "Execution complete"
    );
    println!(
        "✅ Genesi {}: {} languages, {} files written to {}",
        summary.date,
        summary.items_per_lang.len(),
        summary.written.len(),
        options.output_dir.display()
    );

    Ok(())
}
