use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://www.htw-dresden.de/studium/studienangebot/";
pub const DEFAULT_LISTING_FILE: &str = "htw-dresden.html";
pub const DEFAULT_DB_PATH: &str = "data/hochschul-abc.db";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const EDITOR_LIVE: &str = "Crawler_v7_Live";
pub const EDITOR_FALLBACK: &str = "Crawler_v6_Local_Fallback";
pub const EDITOR_IMPORT: &str = "Crawler_Importer_v1";

/// Run-wide settings, resolved once from CLI arguments and passed into each
/// component. Components never read configuration from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub listing_file: PathBuf,
    pub db_path: PathBuf,
    pub user_agent: String,
    pub editor_tag: String,
}

impl Config {
    pub fn new(listing_file: PathBuf, db_path: PathBuf, offline: bool) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_file,
            db_path,
            user_agent: USER_AGENT.to_string(),
            editor_tag: if offline { EDITOR_FALLBACK } else { EDITOR_LIVE }.to_string(),
        }
    }

    /// Name of the listing file as shown in placeholder `source` fields.
    pub fn listing_name(&self) -> String {
        self.listing_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.listing_file.display().to_string())
    }
}
