//! Client and cache configuration.

use std::time::Duration;

use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the dashboard API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL the `/routes` and `/locations` paths are appended to.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Reads `DELIVERY_API_URL` and `DELIVERY_API_TIMEOUT_SECS`, loading a
    /// `.env` file first if one is present. Unset variables keep defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DELIVERY_API_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if url.is_empty() {
                return Err(Error::Config("DELIVERY_API_URL is empty".to_string()));
            }
            config.base_url = url;
        }

        if let Some(raw) = lookup("DELIVERY_API_TIMEOUT_SECS") {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "DELIVERY_API_TIMEOUT_SECS must be a number of seconds, got {:?}",
                    raw
                ))
            })?;
        }

        Ok(config)
    }
}

/// Freshness windows of [`crate::cache::CachedStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub routes_ttl: Duration,
    pub locations_ttl: Duration,
    pub route_locations_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            routes_ttl: Duration::from_secs(10 * 60),
            locations_ttl: Duration::from_secs(5 * 60),
            route_locations_ttl: Duration::from_secs(8 * 60),
        }
    }
}

impl CacheConfig {
    /// Every entry expires immediately; reads always hit the backend but
    /// stale data is still kept for fallback.
    pub fn no_caching() -> Self {
        Self {
            routes_ttl: Duration::ZERO,
            locations_ttl: Duration::ZERO,
            route_locations_ttl: Duration::ZERO,
        }
    }
}
