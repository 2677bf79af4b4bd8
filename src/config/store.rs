//! Shop configuration loading from config.toml
//!
//! The `[store]` table names the shop, picks the currency symbol used when
//! printing prices, sets the UTC offset used to decide which calendar day a
//! sale belongs to, caps the size of cover images and lists the genres offered
//! by autocomplete. Every field has a default, so a missing file or a missing
//! field is not an error.

use crate::errors::{Error, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_VAR: &str = "BOOK_BUDDY_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Shop settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// Settings for the shop itself
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Display name of the shop
    pub name: String,
    /// Symbol printed in front of prices
    pub currency_symbol: String,
    /// Offset from UTC, in minutes, of the shop's local time
    pub utc_offset_minutes: i32,
    /// Largest accepted cover image, in bytes
    pub max_image_bytes: usize,
    /// Genres suggested when adding or filtering books
    pub genres: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "BookBuddy".to_string(),
            currency_symbol: "$".to_string(),
            utc_offset_minutes: 0,
            max_image_bytes: 2 * 1024 * 1024,
            genres: vec!["fantasy".to_string(), "Action".to_string()],
        }
    }
}

impl StoreConfig {
    /// The shop's local offset from UTC.
    ///
    /// Returns an error if the configured offset is outside ±24 hours.
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| Error::Config {
                message: format!(
                    "utc_offset_minutes out of range: {}",
                    self.utc_offset_minutes
                ),
            })
    }
}

/// Loads shop configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - The UTC offset is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses shop configuration from TOML text
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.store.utc_offset()?;
    Ok(config)
}

/// Loads the config named by `BOOK_BUDDY_CONFIG`, or `./config.toml`.
///
/// A missing file is not an error: the defaults are used instead.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        warn!("No config file at {path}, using defaults");
        return Ok(Config::default());
    }
    debug!("Loading configuration from {path}");
    load_config(path)
}
