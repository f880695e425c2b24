//! Command-line interface definitions for the Genesi site generator.
//!
//! Every option can also be supplied through an environment variable, which
//! is how the scheduled job configures it.

use chrono::NaiveDate;
use clap::Parser;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Regenerate the site in ./public
/// genesi_site -o ./public
///
/// # Without machine translation, for a specific day
/// genesi_site -o ./public --no-translate --date 2025-05-06
///
/// # With a site config and sitemap pings
/// genesi_site -o ./public -c genesi.yaml --ping
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory receiving index.html, archive.json and the support files
    #[arg(short, long, env = "GENESI_OUTPUT_DIR", default_value = ".")]
    pub output_dir: String,

    /// SQLite database holding one chapter per (date, language)
    #[arg(short, long, env = "GENESI_DB_PATH", default_value = "genesi.db")]
    pub db_path: String,

    /// Optional path to a YAML site configuration
    #[arg(short, long, env = "GENESI_CONFIG")]
    pub config: Option<String>,

    /// Publish the feed text as-is instead of translating it
    #[arg(long, env = "GENESI_NO_TRANSLATE")]
    pub no_translate: bool,

    /// Entries read from each feed, per language (overrides the config)
    #[arg(long, env = "GENESI_MAX_ITEMS")]
    pub max_items: Option<usize>,

    /// Date of the edition, YYYY-MM-DD (defaults to today, local time)
    #[arg(long, env = "GENESI_DATE")]
    pub date: Option<NaiveDate>,

    /// Submit the sitemap to search engines after writing the site
    #[arg(long, env = "GENESI_PING")]
    pub ping: bool,
}
