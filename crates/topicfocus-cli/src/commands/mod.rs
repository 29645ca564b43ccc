pub mod auth;
pub mod config;
pub mod focus;
pub mod notes;
pub mod progress;
pub mod stats;

use topicfocus_core::{Config, SqliteStore};

/// Open the SQLite store named by the config.
pub fn open_store(config: &Config) -> Result<SqliteStore, Box<dyn std::error::Error>> {
    let path = config.database_path()?;
    tracing::debug!(path = %path.display(), "opening store");
    Ok(SqliteStore::open(&path)?)
}
