mod config;
pub mod collection;
pub mod migrations;
pub mod traits;

pub use collection::{CardRecord, Collection, DeckInfo, NewCard};
pub use config::{Config, ExportConfig, ExportMode, ForecastConfig, ScopeConfig};
pub use traits::{CardStore, ScopeFilter, ALL_DECKS};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/timewarp[-dev]/` based on TIMEWARP_ENV.
///
/// Set TIMEWARP_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TIMEWARP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("timewarp-dev")
    } else {
        base_dir.join("timewarp")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
