use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Deserialize;
use tracing::warn;

use crate::config::EDITOR_IMPORT;
use crate::db::{self, NewArticle, UpsertOutcome};

/// One pre-scraped entry. Both fields are required for a write; partial
/// records are skipped, not fatal.
#[derive(Debug, Deserialize)]
pub struct ImportRecord {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default)]
pub struct ImportTally {
    pub found: usize,
    pub imported: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl ImportTally {
    pub fn print(&self) {
        println!("\n--- Import finished ---");
        println!("Found:    {}", self.found);
        println!("Imported: {}", self.imported);
        println!("Updated:  {}", self.updated);
        println!("Skipped:  {}", self.skipped);
    }
}

/// Import a JSON array of `{headline, text}` objects, upserting each through
/// the reconciler. A missing or malformed file aborts before any write.
pub fn run(db_path: &Path, json_path: &Path) -> Result<ImportTally> {
    let raw = std::fs::read_to_string(json_path)
        .with_context(|| format!("failed to read import file {}", json_path.display()))?;
    let records: Vec<ImportRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid JSON in {}", json_path.display()))?;

    let file_name = json_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| json_path.display().to_string());

    let mut tally = ImportTally {
        found: records.len(),
        ..Default::default()
    };
    println!("Importing {} records from {}", records.len(), file_name);

    for record in records {
        let (headline, text) = match (record.headline, record.text) {
            (Some(h), Some(t)) if !h.is_empty() && !t.is_empty() => (h, t),
            _ => {
                warn!("Skipping record with missing headline or text");
                tally.skipped += 1;
                continue;
            }
        };

        let source = format!("json://{}/{}", file_name, headline.replace(' ', "_"));
        let timestamp = Local::now().to_rfc3339();

        let outcome = (|| -> Result<UpsertOutcome> {
            let conn = db::connect(db_path)?;
            db::upsert_article(
                &conn,
                &NewArticle {
                    headline: &headline,
                    text: &text,
                    source: &source,
                    editor: EDITOR_IMPORT,
                    last_updated: &timestamp,
                },
            )
        })();

        match outcome {
            Ok(UpsertOutcome::Inserted) => tally.imported += 1,
            Ok(UpsertOutcome::Updated) => tally.updated += 1,
            Ok(UpsertOutcome::Skipped) => tally.skipped += 1,
            Err(e) => {
                warn!("Database error for '{}': {}", headline, e);
                tally.skipped += 1;
            }
        }
    }

    Ok(tally)
}

// ── Tests ──
