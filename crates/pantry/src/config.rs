//! Pantry configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PANTRY_STORE_PATH` - JSON file backing the store (default: comet-cupboard.json)
//! - `PANTRY_UTC_OFFSET_MINUTES` - Pantry's offset from UTC in minutes (default: 0)
//! - `PANTRY_SWEEP_INTERVAL_SECS` - Seconds between pickup sweeps (default: 60)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::clock::LocalZone;

const DEFAULT_STORE_PATH: &str = "comet-cupboard.json";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Pantry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PantryConfig {
    /// Where the JSON store lives
    pub store_path: PathBuf,
    /// The pantry's local time zone
    pub zone: LocalZone,
    /// How often the pickup sweep runs
    pub sweep_interval: Duration,
}

impl Default for PantryConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            zone: LocalZone::utc(),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

impl PantryConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store_path = lookup("PANTRY_STORE_PATH")
            .filter(|path| !path.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from);

        let offset = lookup("PANTRY_UTC_OFFSET_MINUTES")
            .map(|raw| {
                raw.trim().parse::<i32>().map_err(|e| {
                    ConfigError::InvalidEnvVar("PANTRY_UTC_OFFSET_MINUTES".to_string(), e.to_string())
                })
            })
            .transpose()?
            .unwrap_or(0);
        let zone = LocalZone::from_offset_minutes(offset).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "PANTRY_UTC_OFFSET_MINUTES".to_string(),
                format!("{offset} is outside -1439..=1439"),
            )
        })?;

        let secs = lookup("PANTRY_SWEEP_INTERVAL_SECS")
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("PANTRY_SWEEP_INTERVAL_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "PANTRY_SWEEP_INTERVAL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            store_path,
            zone,
            sweep_interval: Duration::from_secs(secs),
        })
    }
}
