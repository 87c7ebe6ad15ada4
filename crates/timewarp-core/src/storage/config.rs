//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Forecast window (days before and after today)
//! - Export mode and the post-commit bulk mutations
//! - Default deck scope
//!
//! Configuration is stored at `~/.config/timewarp/config.toml`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::data_dir;
use super::traits::ALL_DECKS;
use crate::error::{ConfigError, ValidationError};
use crate::warp::{TransformParameters, DEFAULT_HORIZON_FUTURE, DEFAULT_HORIZON_PAST};

/// How a commit reaches the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportMode {
    /// Write transformed due dates onto the cards.
    #[default]
    #[serde(rename = "write")]
    WriteInPlace,
    /// Gather the cards into a filtered deck instead.
    #[serde(rename = "filtered")]
    FilteredDeck,
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportMode::WriteInPlace => f.write_str("write"),
            ExportMode::FilteredDeck => f.write_str("filtered"),
        }
    }
}

impl FromStr for ExportMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "write" => Ok(ExportMode::WriteInPlace),
            "filtered" => Ok(ExportMode::FilteredDeck),
            other => Err(ValidationError::InvalidValue {
                field: "export.mode".into(),
                message: format!("expected 'write' or 'filtered', got '{other}'"),
            }),
        }
    }
}

/// Forecast window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_horizon_past")]
    pub horizon_past: i64,
    #[serde(default = "default_horizon_future")]
    pub horizon_future: i64,
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub mode: ExportMode,
    #[serde(default = "default_filtered_deck_name")]
    pub filtered_deck_name: String,
    /// Shuffle the new cards of the committed set.
    #[serde(default)]
    pub shuffle_new: bool,
    /// Reset every committed card to new.
    #[serde(default)]
    pub set_new: bool,
    /// Fixed shuffle seed; a fresh one is drawn per commit when unset.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeConfig {
    #[serde(default = "default_deck")]
    pub default_deck: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timewarp/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub scope: ScopeConfig,
}

fn default_horizon_past() -> i64 {
    DEFAULT_HORIZON_PAST
}
fn default_horizon_future() -> i64 {
    DEFAULT_HORIZON_FUTURE
}
fn default_filtered_deck_name() -> String {
    "TimeWarpFiltered".into()
}
fn default_deck() -> String {
    ALL_DECKS.into()
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_past: default_horizon_past(),
            horizon_future: default_horizon_future(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            mode: ExportMode::default(),
            filtered_deck_name: default_filtered_deck_name(),
            shuffle_new: false,
            set_new: false,
            shuffle_seed: None,
        }
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            default_deck: default_deck(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let unknown = || ConfigError::UnknownKey(key.to_string());

        if key.is_empty() {
            return Err(unknown());
        }
        let mut parts = key.split('.').peekable();

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    // Optional integers serialize as null when unset.
                    serde_json::Value::Number(_) | serde_json::Value::Null => {
                        if value.is_empty() || value == "none" {
                            serde_json::Value::Null
                        } else {
                            serde_json::Value::Number(
                                value
                                    .parse::<i64>()
                                    .map_err(|_| {
                                        invalid(format!("cannot parse '{value}' as integer"))
                                    })?
                                    .into(),
                            )
                        }
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    ///
    /// # Errors
    /// See [`Config::load`].
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    /// See [`Config::save`].
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// # Errors
    /// Returns an error naming the first field out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.transform_defaults()
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "forecast".into(),
                message: e.to_string(),
            })?;
        if self.export.filtered_deck_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "export.filtered_deck_name".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Identity transform over the configured forecast window.
    pub fn transform_defaults(&self) -> TransformParameters {
        TransformParameters::default()
            .with_horizons(self.forecast.horizon_past, self.forecast.horizon_future)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}
