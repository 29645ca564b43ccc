mod config;
pub mod gateway;
pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use config::{AutosaveConfig, Config, StorageConfig, TimerConfig};
pub use gateway::{ProgressStore, ProgressUpdate, TopicProgress, UserIdentity};
pub use memory::MemoryStore;
pub use sqlite::{ProgressRecord, SqliteStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/topicfocus[-dev]/` based on TOPICFOCUS_ENV.
///
/// Set TOPICFOCUS_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TOPICFOCUS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("topicfocus-dev")
    } else {
        base_dir.join("topicfocus")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}
