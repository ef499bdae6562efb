//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_MAX_ENTRY_BYTES};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

// == TTL Policy ==
/// Cache lifetime per resource class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub courses: Duration,
    pub sections: Duration,
    pub instructors: Duration,
    pub departments: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            courses: Duration::from_secs(2 * 60 * 60),
            sections: Duration::from_secs(15 * 60),
            instructors: Duration::from_secs(12 * 60 * 60),
            departments: Duration::from_secs(2 * 60 * 60),
        }
    }
}

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream base URL
    pub database_url: String,
    /// Upstream API key
    pub database_key: String,
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of cached responses; zero disables caching
    pub cache_capacity: usize,
    /// Largest body cached, in bytes; zero means unlimited
    pub cache_max_entry_bytes: usize,
    /// Seconds between expired-entry sweeps; zero disables the sweep
    pub sweep_interval: u64,
    pub ttl: TtlPolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` - Upstream base URL (required)
    /// - `DATABASE_KEY` - Upstream API key (required)
    /// - `PORT` - HTTP server port (default: 8080)
    /// - `CACHE_CAPACITY` - Cached responses; zero or negative disables caching (default: 124)
    /// - `CACHE_MAX_ENTRY_BYTES` - Per-entry body budget, 0 = unlimited (default: 8 MiB)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds, 0 = off (default: 0)
    /// - `COURSES_TTL`, `SECTIONS_TTL`, `INSTRUCTORS_TTL`, `DEPARTMENTS_TTL` - seconds
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let defaults = TtlPolicy::default();

        let capacity: i64 = parse_or(&lookup, "CACHE_CAPACITY", DEFAULT_CAPACITY as i64)?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_key: required("DATABASE_KEY")?,
            server_port: parse_or(&lookup, "PORT", 8080)?,
            cache_capacity: usize::try_from(capacity).unwrap_or(0),
            cache_max_entry_bytes: parse_or(
                &lookup,
                "CACHE_MAX_ENTRY_BYTES",
                DEFAULT_MAX_ENTRY_BYTES,
            )?,
            sweep_interval: parse_or(&lookup, "CACHE_SWEEP_INTERVAL", 0)?,
            ttl: TtlPolicy {
                courses: ttl_or(&lookup, "COURSES_TTL", defaults.courses)?,
                sections: ttl_or(&lookup, "SECTIONS_TTL", defaults.sections)?,
                instructors: ttl_or(&lookup, "INSTRUCTORS_TTL", defaults.instructors)?,
                departments: ttl_or(&lookup, "DEPARTMENTS_TTL", defaults.departments)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) if value.is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

fn ttl_or<F>(lookup: &F, name: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    parse_or(lookup, name, default.as_secs()).map(Duration::from_secs)
}
