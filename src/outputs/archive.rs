//! JSON archive of a run.
//!
//! The archive maps each language code to its chapter and markers:
//!
//! ```text
//! {
//!   "it": { "date": "2025-05-06", "lang": "it", "global": "<p>…</p>", "markers": [ … ] },
//!   "en": { … }
//! }
//! ```
//!
//! It is rebuilt from scratch on every run and overwrites the previous file.

use crate::error::{SiteError, SiteResult};
use crate::models::ArchiveExport;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize the archive as indented JSON (non-ASCII kept as-is).
pub fn archive_to_json(archive: &ArchiveExport) -> SiteResult<String> {
    Ok(serde_json::to_string_pretty(archive)?)
}

/// Write the archive to `path`, replacing any previous file.
#[instrument(level = "info", skip_all, fields(path = %path.display(), languages = archive.len()))]
pub async fn write_archive(archive: &ArchiveExport, path: &Path) -> SiteResult<()> {
    let json = archive_to_json(archive)?;
    if let Err(e) = fs::write(path, json).await {
        error!(error = %e, "Failed to write archive");
        return Err(SiteError::io(path.display().to_string(), e));
    }
    info!("Wrote JSON archive");
    Ok(())
}
