//! Environment driven process configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by `dotenvy` in `main`. Only `API_BASE_URL` is required.

use std::time::Duration;

use tracing::info;

use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
/// Freshness window for cached API pages (30 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 1800;
pub const DEFAULT_CACHE_CAPACITY: usize = 256;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Uniques API base address, trailing slashes removed.
    pub api_base_url: String,
    pub bind_addr: String,
    /// Zero disables the response cache.
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = normalize_base_url(lookup("API_BASE_URL").as_deref())?;

        let bind_addr = lookup("BIND_ADDR")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let cache_ttl = Duration::from_secs(parse_or(
            &lookup,
            "CACHE_TTL_SECS",
            DEFAULT_CACHE_TTL_SECS,
        )?);
        let cache_capacity = parse_or(&lookup, "CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?;
        let request_timeout = Duration::from_secs(parse_or(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);

        let config = Self {
            api_base_url,
            bind_addr,
            cache_ttl,
            cache_capacity,
            request_timeout,
        };

        info!(
            "Configuration loaded: api={}, bind={}, cache_ttl={}s, cache_capacity={}",
            config.api_base_url,
            config.bind_addr,
            config.cache_ttl.as_secs(),
            config.cache_capacity
        );

        Ok(config)
    }
}

/// Strips trailing slashes; a missing or blank base is a configuration error.
pub fn normalize_base_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let base = raw.map(str::trim).unwrap_or_default().trim_end_matches('/');

    if base.is_empty() {
        return Err(ConfigError::MissingApiBase);
    }

    Ok(base.to_string())
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value: value.clone(),
                reason: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}
