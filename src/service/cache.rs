//! Redis cache service for collaborator responses

use std::env;

use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};

// Environment variable names
const ENV_REDIS_HOST: &str = "MARKET_INTEL_REDIS_HOST";
const ENV_REDIS_PORT: &str = "MARKET_INTEL_REDIS_PORT";
const ENV_REDIS_PASSWORD: &str = "MARKET_INTEL_REDIS_PASSWORD";
const ENV_REDIS_DB: &str = "MARKET_INTEL_REDIS_DB";

// Default values
const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
const DEFAULT_REDIS_PORT: &str = "6379";
const DEFAULT_REDIS_DB: &str = "0";

const SERP_TTL_SECONDS: u64 = 24 * 60 * 60; // 1 day
const DISCOVERY_TTL_SECONDS: u64 = 7 * 24 * 60 * 60; // 7 days

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Cache miss for key: {0}")]
    Miss(String),
}

// Cache key prefixes
const PREFIX_SERP: &str = "serp:";
const PREFIX_DISCOVERY: &str = "discovery:";

/// Redis-based cache for SERP responses and discovered candidates
#[derive(Clone)]
pub struct IntelCache {
    client: Client,
}

impl IntelCache {
    /// Create a new cache instance and verify connection
    ///
    /// Configuration via environment variables:
    /// - `MARKET_INTEL_REDIS_HOST` - Redis host (default: 127.0.0.1)
    /// - `MARKET_INTEL_REDIS_PORT` - Redis port (default: 6379)
    /// - `MARKET_INTEL_REDIS_PASSWORD` - Redis password (default: none)
    /// - `MARKET_INTEL_REDIS_DB` - Redis database number (default: 0)
    pub async fn new() -> Result<Self, CacheError> {
        let host = env::var(ENV_REDIS_HOST).unwrap_or_else(|_| DEFAULT_REDIS_HOST.to_string());
        let port = env::var(ENV_REDIS_PORT).unwrap_or_else(|_| DEFAULT_REDIS_PORT.to_string());
        let password = env::var(ENV_REDIS_PASSWORD).ok();
        let db = env::var(ENV_REDIS_DB).unwrap_or_else(|_| DEFAULT_REDIS_DB.to_string());

        let redis_url = redis_url(&host, &port, password.as_deref(), &db);

        tracing::debug!(host = %host, port = %port, db = %db, "Connecting to Redis");

        let client = Client::open(redis_url)?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        tracing::info!(host = %host, port = %port, "Redis connection established");

        Ok(Self { client })
    }

    /// Get a cached SERP response by key hash
    pub async fn get_serp<T: DeserializeOwned>(&self, key_hash: &str) -> Result<T, CacheError> {
        self.get_with_prefix(PREFIX_SERP, key_hash).await
    }

    /// Cache a SERP response by key hash
    pub async fn set_serp<T: Serialize>(&self, key_hash: &str, data: &T) -> Result<(), CacheError> {
        self.set_with_prefix(PREFIX_SERP, key_hash, data, SERP_TTL_SECONDS)
            .await
    }

    /// Get cached discovery candidates by key hash
    pub async fn get_discovery<T: DeserializeOwned>(
        &self,
        key_hash: &str,
    ) -> Result<T, CacheError> {
        self.get_with_prefix(PREFIX_DISCOVERY, key_hash).await
    }

    /// Cache discovery candidates by key hash
    pub async fn set_discovery<T: Serialize>(
        &self,
        key_hash: &str,
        data: &T,
    ) -> Result<(), CacheError> {
        self.set_with_prefix(PREFIX_DISCOVERY, key_hash, data, DISCOVERY_TTL_SECONDS)
            .await
    }

    /// Round-trip a PING, used by the readiness probe
    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn get_with_prefix<T: DeserializeOwned>(
        &self,
        prefix: &str,
        key: &str,
    ) -> Result<T, CacheError> {
        let full_key = format!("{}{}", prefix, key);
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let data: Option<String> = conn.get(&full_key).await?;

        match data {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| CacheError::Serialization(e.to_string()))
            }
            None => Err(CacheError::Miss(key.to_string())),
        }
    }

    async fn set_with_prefix<T: Serialize>(
        &self,
        prefix: &str,
        key: &str,
        data: &T,
        ttl: u64,
    ) -> Result<(), CacheError> {
        let full_key = format!("{}{}", prefix, key);
        let json =
            serde_json::to_string(data).map_err(|e| CacheError::Serialization(e.to_string()))?;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(&full_key, json, ttl).await?;

        tracing::debug!(key = %full_key, ttl = ttl, "Cached data");
        Ok(())
    }
}

/// Build `redis://[:password@]host:port/db`
fn redis_url(host: &str, port: &str, password: Option<&str>, db: &str) -> String {
    match password {
        Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
        _ => format!("redis://{}:{}/{}", host, port, db),
    }
}
