//! Output generation for the published site.
//!
//! # Submodules
//!
//! - [`archive`]: writes the run's [`ArchiveExport`] as JSON
//! - [`page`]: renders the single-page `index.html`
//! - [`seo`]: sitemap, robots, rewrite rules and the logo
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── archive.json
//! ├── index.html
//! ├── sitemap.xml
//! ├── robots.txt
//! ├── vercel.json
//! └── genesi_logo.svg
//! ```
//!
//! Every file is rewritten on each run.

pub mod archive;
pub mod page;
pub mod seo;

use crate::config::SiteConfig;
use crate::error::{SiteError, SiteResult};
use crate::models::ArchiveExport;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Render and write the page and its support files into `output_dir`.
///
/// Returns the paths written, in write order.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), %date))]
pub async fn write_site(
    archive: &ArchiveExport,
    config: &SiteConfig,
    date: &str,
    output_dir: &Path,
) -> SiteResult<Vec<PathBuf>> {
    let files = &config.files;
    let outputs = [
        (&files.index, page::render_page(archive, config, date)?),
        (&files.sitemap, seo::render_sitemap(&config.site_url, date)?),
        (&files.robots, seo::render_robots(&config.sitemap_url()?)),
        (&files.rewrites, seo::render_rewrites(&files.index)?),
        (&files.logo, seo::LOGO_SVG.to_string()),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (name, contents) in outputs {
        let path = output_dir.join(name);
        if let Err(e) = fs::write(&path, contents).await {
            error!(path = %path.display(), error = %e, "Failed writing site file");
            return Err(SiteError::io(path.display().to_string(), e));
        }
        info!(path = %path.display(), "Wrote site file");
        written.push(path);
    }
    Ok(written)
}
