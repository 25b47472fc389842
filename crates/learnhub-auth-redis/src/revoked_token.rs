//! Redis revoked token storage.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Pool, Runtime};
use redis::AsyncCommands;

use learnhub_auth::AuthResult;
use learnhub_auth::error::AuthError;
use learnhub_auth::storage::RevokedTokenStorage;

use crate::{RedisConfig, RedisStorageError};

/// Namespace for revocation keys.
pub const KEY_PREFIX: &str = "learnhub:revoked:";

/// Revoked token storage on a shared Redis instance.
#[derive(Clone)]
pub struct RedisRevokedTokenStorage {
    pool: Pool,
}

impl RedisRevokedTokenStorage {
    /// Wraps an existing connection pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Builds a pool from `config` and checks that Redis answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or the first connection
    /// fails.
    pub async fn connect(config: &RedisConfig) -> Result<Self, RedisStorageError> {
        tracing::info!(url = %config.url, "Connecting to Redis revocation store");

        let mut redis_config = deadpool_redis::Config::from_url(&config.url);
        if let Some(ref mut pool_config) = redis_config.pool {
            pool_config.max_size = config.pool_size;
            pool_config.timeouts.wait = Some(config.timeout());
            pool_config.timeouts.create = Some(config.timeout());
            pool_config.timeouts.recycle = Some(config.timeout());
        }

        let pool = redis_config.create_pool(Some(Runtime::Tokio1))?;
        drop(pool.get().await?);

        tracing::info!("Connected to Redis revocation store");
        Ok(Self::new(pool))
    }

    fn key(token: &str) -> String {
        format!("{KEY_PREFIX}{token}")
    }

    async fn connection(&self) -> AuthResult<deadpool_redis::Connection> {
        self.pool.get().await.map_err(|e| {
            tracing::warn!(error = %e, "Redis pool exhausted or unreachable");
            AuthError::store_unavailable(e.to_string())
        })
    }
}

/// Converts a TTL to whole seconds, rounding up, with a floor of one second.
fn ttl_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

#[async_trait]
impl RevokedTokenStorage for RedisRevokedTokenStorage {
    async fn revoke(&self, token: &str, ttl: Duration) -> AuthResult<()> {
        let mut conn = self.connection().await?;
        let key = Self::key(token);
        let secs = ttl_secs(ttl);

        // An existing entry may already carry a longer TTL. The token's own
        // expiry bounds both, so a plain overwrite is still long enough.
        conn.set_ex::<_, _, ()>(&key, 1u8, secs)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Redis SET EX failed");
                AuthError::store_unavailable(e.to_string())
            })?;

        tracing::debug!(ttl_secs = secs, "Token revocation recorded in Redis");
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> AuthResult<bool> {
        let mut conn = self.connection().await?;
        conn.exists::<_, bool>(Self::key(token)).await.map_err(|e| {
            tracing::warn!(error = %e, "Redis EXISTS failed");
            AuthError::store_unavailable(e.to_string())
        })
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        // Redis expires the keys itself.
        Ok(0)
    }
}
