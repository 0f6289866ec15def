//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use loan_ledger_core::DEFAULT_UPCOMING_WINDOW_DAYS;
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where the ledger records are read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    /// A PostgreSQL database reached through `DATABASE_URL`.
    Postgres { database_url: String },
    /// A built-in sample portfolio; nothing leaves the process.
    Demo,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub data_source: DataSource,
    pub log_level: Level,
    pub upcoming_window_days: u32,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Data Source ---
        let source_str = lookup("DATA_SOURCE").unwrap_or_else(|| "postgres".to_string());
        let data_source = match source_str.trim().to_lowercase().as_str() {
            "postgres" => DataSource::Postgres {
                database_url: lookup("DATABASE_URL")
                    .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?,
            },
            "demo" | "offline" => DataSource::Demo,
            other => {
                return Err(ConfigError::InvalidValue(
                    "DATA_SOURCE".to_string(),
                    format!("'{}' is not one of postgres, demo", other),
                ))
            }
        };

        // --- Report Settings ---
        let upcoming_window_days = match lookup("UPCOMING_WINDOW_DAYS") {
            Some(raw) => u32::from_str(raw.trim()).map_err(|e| {
                ConfigError::InvalidValue("UPCOMING_WINDOW_DAYS".to_string(), e.to_string())
            })?,
            None => DEFAULT_UPCOMING_WINDOW_DAYS,
        };

        Ok(Self {
            bind_address,
            data_source,
            log_level,
            upcoming_window_days,
        })
    }
}
