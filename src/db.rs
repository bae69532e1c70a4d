use std::path::Path;

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::parser::HEADLINE_MISSING;

/// Status stamped on every machine-ingested article, distinguishing it from
/// manually authored records ('draft', 'published').
pub const STATUS_CRAWLED: &str = "crawled";

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS articles (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            headline    TEXT NOT NULL UNIQUE,
            text        TEXT NOT NULL,
            editor      TEXT,
            source      TEXT,
            lastUpdated TEXT,
            status      TEXT DEFAULT 'draft'
        );
        ",
    )?;
    Ok(())
}

/// Candidate record handed to the reconciler.
pub struct NewArticle<'a> {
    pub headline: &'a str,
    pub text: &'a str,
    pub source: &'a str,
    pub editor: &'a str,
    pub last_updated: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    /// Guard rejected the record; nothing was written.
    Skipped,
}

/// Idempotent upsert keyed by exact headline match, wrapped in its own
/// transaction. Records with an empty or sentinel headline, or empty text,
/// are discarded.
pub fn upsert_article(conn: &Connection, article: &NewArticle) -> Result<UpsertOutcome> {
    if article.headline.is_empty()
        || article.headline == HEADLINE_MISSING
        || article.text.is_empty()
    {
        info!("Skipping entry without usable headline or text");
        return Ok(UpsertOutcome::Skipped);
    }

    let tx = conn.unchecked_transaction()?;
    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM articles WHERE headline = ?1",
            [article.headline],
            |row| row.get(0),
        )
        .optional()?;

    let outcome = match existing {
        Some(id) => {
            tx.execute(
                "UPDATE articles
                 SET text = ?1, lastUpdated = ?2, editor = ?3, source = ?4, status = ?5
                 WHERE id = ?6",
                params![
                    article.text,
                    article.last_updated,
                    article.editor,
                    article.source,
                    STATUS_CRAWLED,
                    id
                ],
            )?;
            info!("Updated existing entry for '{}' (id {})", article.headline, id);
            UpsertOutcome::Updated
        }
        None => {
            tx.execute(
                "INSERT INTO articles (headline, text, lastUpdated, editor, source, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    article.headline,
                    article.text,
                    article.last_updated,
                    article.editor,
                    article.source,
                    STATUS_CRAWLED
                ],
            )?;
            info!("Inserted new entry for '{}'", article.headline);
            UpsertOutcome::Inserted
        }
    };
    tx.commit()?;
    Ok(outcome)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub crawled: usize,
    pub other: usize,
    pub last_updated: Option<String>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM articles", [], |r| r.get(0))?;
    let crawled: usize = conn.query_row(
        "SELECT COUNT(*) FROM articles WHERE status = ?1",
        [STATUS_CRAWLED],
        |r| r.get(0),
    )?;
    let last_updated: Option<String> =
        conn.query_row("SELECT MAX(lastUpdated) FROM articles", [], |r| r.get(0))?;
    Ok(Stats {
        total,
        crawled,
        other: total - crawled,
        last_updated,
    })
}

// ── Overview ──

pub struct OverviewRow {
    pub headline: String,
    pub status: String,
    pub editor: String,
    pub last_updated: String,
}

pub fn fetch_overview(
    conn: &Connection,
    status: Option<&str>,
    limit: usize,
) -> Result<Vec<OverviewRow>> {
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    let where_clause = match status {
        Some(s) => {
            params.push(Box::new(s.to_string()));
            " WHERE status = ?1"
        }
        None => "",
    };

    let sql = format!(
        "SELECT headline, COALESCE(status,''), COALESCE(editor,''), COALESCE(lastUpdated,'')
         FROM articles{} ORDER BY headline LIMIT {}",
        where_clause, limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(OverviewRow {
                headline: row.get(0)?,
                status: row.get(1)?,
                editor: row.get(2)?,
                last_updated: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Tests ──
