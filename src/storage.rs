//! SQLite persistence of daily chapters.
//!
//! One row per (date, language) in `chapters_global`. Writes replace any
//! existing row with the same key, so running the generator twice on the same
//! day leaves a single row per language. Each write is committed on its own.

use crate::error::SiteResult;
use crate::models::ChapterRecord;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use tracing::{debug, info, instrument};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS chapters_global (
    date TEXT,
    lang TEXT,
    title TEXT,
    content TEXT,
    sources TEXT,
    PRIMARY KEY(date, lang)
)";

#[derive(Debug)]
pub struct ChapterStore {
    conn: Connection,
}

impl ChapterStore {
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> SiteResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        let store = Self::init(conn)?;
        info!("Opened chapter store");
        Ok(store)
    }

    pub fn open_in_memory() -> SiteResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> SiteResult<Self> {
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// Insert or replace the row for (`record.date`, `record.lang`).
    #[instrument(level = "info", skip_all, fields(date = %record.date, lang = %record.lang))]
    pub fn upsert(&self, record: &ChapterRecord) -> SiteResult<()> {
        let sources = serde_json::to_string(&record.sources)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO chapters_global (date, lang, title, content, sources)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![record.date, record.lang, record.title, record.content, sources],
        )?;
        debug!(sources = record.sources.len(), "Chapter stored");
        Ok(())
    }

    pub fn load(&self, date: &str, lang: &str) -> SiteResult<Option<ChapterRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT date, lang, title, content, sources FROM chapters_global
                 WHERE date = ?1 AND lang = ?2",
                params![date, lang],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((date, lang, title, content, sources)) => Ok(Some(ChapterRecord {
                date,
                lang,
                title,
                content,
                sources: serde_json::from_str(&sources)?,
            })),
            None => Ok(None),
        }
    }

    pub fn count_for_date(&self, date: &str) -> SiteResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM chapters_global WHERE date = ?1",
            params![date],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
