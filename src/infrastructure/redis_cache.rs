//! Redis-backed cache store.
//!
//! Provides a distributed cache backend, allowing fetched pages to be
//! shared across multiple application instances.
//!
//! ## Architecture
//!
//! A simple key-value model:
//! - Keys: `"{prefix}{source}:{page}:{per_page}"`
//! - Values: the JSON-serialized page, exactly as the in-memory store holds
//! - TTL: derived from the absolute expiry, enforced by Redis itself
//!
//! ## Fail-safe operation
//!
//! Redis failures never break a fetch: a read error degrades to a cache
//! miss and a write error drops the entry, both with a warning log. An
//! unavailable Redis costs quota, not availability.
//!
//! ## Example
//!
//! ```rust,ignore
//! use user_fanout::infrastructure::redis_cache::{RedisCache, RedisCacheConfig};
//! use user_fanout::SystemClock;
//! use std::sync::Arc;
//!
//! let cache = RedisCache::connect("redis://127.0.0.1/", Arc::new(SystemClock::new()))
//!     .expect("Failed to connect to Redis");
//! ```

use crate::application::ports::{Cache, Clock};
use redis::{Client, RedisError};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Configuration for the Redis cache backend.
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Prefix prepended to every cache key, to keep a shared Redis tidy.
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            key_prefix: "user_fanout:".to_string(),
        }
    }
}

/// Cache store backed by Redis.
pub struct RedisCache {
    client: Client,
    config: RedisCacheConfig,
    clock: Arc<dyn Clock>,
}

impl RedisCache {
    /// Connect with the default configuration.
    pub fn connect(url: &str, clock: Arc<dyn Clock>) -> Result<Self, RedisError> {
        Self::connect_with_config(url, RedisCacheConfig::default(), clock)
    }

    /// Connect with an explicit configuration.
    ///
    /// The connection is verified once up front so misconfiguration fails
    /// at construction rather than as silent cache misses later.
    pub fn connect_with_config(
        url: &str,
        config: RedisCacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RedisError> {
        let client = Client::open(url)?;
        client.get_connection()?;
        Ok(Self {
            client,
            config,
            clock,
        })
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.config.key_prefix, key)
    }
}

impl Cache for RedisCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut connection = match self.client.get_connection() {
            Ok(connection) => connection,
            Err(err) => {
                warn!(key, error = %err, "redis unavailable; treating as cache miss");
                return None;
            }
        };
        match redis::cmd("GET")
            .arg(self.prefixed(key))
            .query::<Option<String>>(&mut connection)
        {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "redis read failed; treating as cache miss");
                None
            }
        }
    }

    fn set(&self, key: &str, value: String, expires_at: Instant) {
        let lifetime = expires_at.saturating_duration_since(self.clock.now());
        if lifetime.is_zero() {
            return;
        }
        let mut connection = match self.client.get_connection() {
            Ok(connection) => connection,
            Err(err) => {
                warn!(key, error = %err, "redis unavailable; dropping cache write");
                return;
            }
        };
        if let Err(err) = redis::cmd("SET")
            .arg(self.prefixed(key))
            .arg(value)
            .arg("PX")
            .arg(lifetime.as_millis().max(1) as u64)
            .query::<()>(&mut connection)
        {
            warn!(key, error = %err, "redis write failed; dropping cache write");
        }
    }
}
