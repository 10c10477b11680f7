//! Process configuration loaded from environment variables.

use std::net::SocketAddr;

use beerstock_observability::LogFormat;
use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "BEERSTOCK_BIND_ADDR";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const LOG_FORMAT_VAR: &str = "BEERSTOCK_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBindAddr { var: &'static str, value: String },

    #[error("{var}: {reason}")]
    InvalidLogFormat { var: &'static str, reason: String },

    #[error("{var} is set but empty")]
    EmptyDatabaseUrl { var: &'static str },
}

/// Runtime configuration of the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Postgres connection string; the in-memory store is used when absent.
    pub database_url: Option<String>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr {
                var: BIND_ADDR_VAR,
                value: raw_addr.clone(),
            })?;

        let database_url = match lookup(DATABASE_URL_VAR) {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::EmptyDatabaseUrl {
                    var: DATABASE_URL_VAR,
                });
            }
            other => other,
        };

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| ConfigError::InvalidLogFormat {
                var: LOG_FORMAT_VAR,
                reason: e.to_string(),
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            database_url,
            log_format,
        })
    }
}
