//! Process configuration, read once from the environment at startup.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use chrono::TimeDelta;
use thiserror::Error;
use tracing::info;

/// Default upload limit for recipe images (5MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl: TimeDelta,
    pub frontend_url: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage: StorageBackend = parse_or("STORAGE", "postgres")?;

        let database_url = env::var("DATABASE_URL").ok();
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                value: String::new(),
                reason: "secret cannot be empty".to_string(),
            });
        }

        let token_ttl = token_ttl(parse_or("TOKEN_TTL_HOURS", "24")?)?;

        Ok(Self {
            bind_addr: parse_or("BIND_ADDR", "0.0.0.0:3000")?,
            storage,
            database_url,
            jwt_secret,
            token_ttl,
            frontend_url: parse_or("FRONTEND_URL", "http://localhost:5173")?,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())?,
        })
    }
}

/// Token lifetime in hours. Must be positive and small enough to add to a timestamp.
fn token_ttl(hours: i64) -> Result<TimeDelta, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        key: "TOKEN_TTL_HOURS",
        value: hours.to_string(),
        reason: reason.to_string(),
    };

    if hours <= 0 {
        return Err(invalid("must be positive"));
    }
    TimeDelta::try_hours(hours).ok_or_else(|| invalid("too large"))
}

fn parse_or<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}
