mod config;
mod db;
mod discover;
mod fetch;
mod format;
mod import;
mod parser;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use config::Config;
use db::UpsertOutcome;
use discover::Candidate;
use parser::htw::HtwDresdenShape;
use parser::{ExtractedDetails, PageShape};

#[derive(Parser)]
#[command(name = "hochschul_crawler", about = "Study-program crawler for the Hochschul-ABC knowledge base")]
struct Cli {
    /// SQLite database file
    #[arg(long, default_value = config::DEFAULT_DB_PATH, global = true)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the study-program listing and upsert every entry
    Crawl {
        /// Local HTML listing file, one program per bullet line
        #[arg(long, default_value = config::DEFAULT_LISTING_FILE)]
        listing: PathBuf,
        /// Build placeholder records instead of fetching detail pages
        #[arg(long)]
        offline: bool,
        /// Max entries to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Import pre-scraped articles from a JSON file
    Import {
        /// JSON array of {headline, text} objects
        file: PathBuf,
    },
    /// Show article statistics
    Stats,
    /// Articles overview table
    Overview {
        /// Filter by status (e.g. crawled, published, draft)
        #[arg(short, long)]
        status: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            listing,
            offline,
            limit,
        } => {
            let cfg = Config::new(listing, cli.db, offline);
            run_crawl(&cfg, offline, limit).await
        }
        Commands::Import { file } => {
            {
                let conn = db::connect(&cli.db)?;
                db::init_schema(&conn)?;
            }
            let tally = import::run(&cli.db, &file)?;
            tally.print();
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Articles:    {}", s.total);
            println!("Crawled:     {}", s.crawled);
            println!("Other:       {}", s.other);
            println!("Last update: {}", s.last_updated.as_deref().unwrap_or("-"));
            Ok(())
        }
        Commands::Overview { status, limit } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, status.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No articles found.");
                return Ok(());
            }

            println!(
                "{:<42} | {:<9} | {:<26} | {:<25}",
                "Headline", "Status", "Editor", "Last updated"
            );
            println!("{}", "-".repeat(110));
            for r in &rows {
                println!(
                    "{:<42} | {:<9} | {:<26} | {:<25}",
                    truncate(&r.headline, 42),
                    r.status,
                    truncate(&r.editor, 26),
                    truncate(&r.last_updated, 25),
                );
            }
            println!("\n{} articles", rows.len());
            Ok(())
        }
    }
}

#[derive(Default)]
struct RunTally {
    discovered: usize,
    processed: usize,
    inserted: usize,
    updated: usize,
    skipped: usize,
    failed: usize,
}

impl RunTally {
    fn print(&self) {
        println!("Discovered: {}", self.discovered);
        println!("Processed:  {}", self.processed);
        println!("Inserted:   {}", self.inserted);
        println!("Updated:    {}", self.updated);
        println!("Skipped:    {}", self.skipped);
        println!("Failed:     {}", self.failed);
    }
}

/// Sequential pipeline: discover once, then fetch, extract, format and
/// upsert each entry. Per-entry failures are logged and never abort the batch.
async fn run_crawl(cfg: &Config, offline: bool, limit: Option<usize>) -> Result<()> {
    println!("--- Starting study-program crawl ---");
    println!("Reading listing file: {}", cfg.listing_file.display());

    let content = match discover::read_listing(&cfg.listing_file) {
        Ok(content) => content,
        Err(e) => {
            warn!("{:#}", e);
            println!("No program lines found in the listing. Exiting.");
            return Ok(());
        }
    };
    let mut candidates = if offline {
        discover::discover_offline(&content, &cfg.listing_name())
    } else {
        discover::discover(&content, &cfg.base_url)
    };
    if let Some(n) = limit {
        candidates.truncate(n);
    }

    if candidates.is_empty() {
        println!("No program lines found in the listing. Exiting.");
        return Ok(());
    }
    println!("Processing {} entries...", candidates.len());

    {
        let conn = db::connect(&cfg.db_path)?;
        db::init_schema(&conn)?;
    }

    let client = fetch::client(&cfg.user_agent)?;
    let shape = HtwDresdenShape;

    let pb = ProgressBar::new(candidates.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} (eta {eta})")?
            .progress_chars("=> "),
    );

    let mut tally = RunTally {
        discovered: candidates.len(),
        ..Default::default()
    };

    for candidate in candidates {
        let extracted = match candidate {
            Candidate::Placeholder {
                headline,
                anchor,
                body,
                source,
            } => Some((
                ExtractedDetails {
                    headline,
                    url: anchor,
                    facts: Vec::new(),
                    body,
                },
                source,
            )),
            Candidate::Remote { headline, url } => match fetch::page(&client, &url).await {
                Ok(Some(html)) => match shape.extract(&url, &html) {
                    Ok(details) => Some((details, url)),
                    Err(e) => {
                        warn!("Extraction failed for '{}': {}", headline, e);
                        tally.skipped += 1;
                        None
                    }
                },
                // Guessed URL does not exist; nothing to report
                Ok(None) => {
                    tally.skipped += 1;
                    None
                }
                Err(e) => {
                    warn!("Fetch failed for '{}': {}", headline, e);
                    tally.failed += 1;
                    None
                }
            },
        };

        if let Some((details, source)) = extracted {
            let text = format::format_article(&details);
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            match persist(cfg, &details.headline, &text, &source, &timestamp) {
                Ok(UpsertOutcome::Inserted) => {
                    tally.processed += 1;
                    tally.inserted += 1;
                }
                Ok(UpsertOutcome::Updated) => {
                    tally.processed += 1;
                    tally.updated += 1;
                }
                Ok(UpsertOutcome::Skipped) => tally.skipped += 1,
                Err(e) => {
                    warn!("Database error for '{}': {}", details.headline, e);
                    tally.failed += 1;
                }
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    println!("\n--- Crawl finished ---");
    tally.print();
    Ok(())
}

/// One connection per write; the transaction lives inside the upsert.
fn persist(
    cfg: &Config,
    headline: &str,
    text: &str,
    source: &str,
    timestamp: &str,
) -> Result<UpsertOutcome> {
    let conn = db::connect(&cfg.db_path)?;
    db::upsert_article(
        &conn,
        &db::NewArticle {
            headline,
            text,
            source,
            editor: &cfg.editor_tag,
            last_updated: timestamp,
        },
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
