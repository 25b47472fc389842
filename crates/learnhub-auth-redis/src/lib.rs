//! Redis storage backend for learnhub-auth.
//!
//! Provides a [`RevokedTokenStorage`] that every API process can share.
//! Each revoked token is stored as a plain key with a native Redis TTL, so
//! records disappear on their own once the token would have expired and
//! [`cleanup_expired`](RevokedTokenStorage::cleanup_expired) has nothing to do.
//!
//! # Example
//!
//! ```ignore
//! use learnhub_auth_redis::{RedisConfig, RedisRevokedTokenStorage};
//!
//! let storage = RedisRevokedTokenStorage::connect(&RedisConfig::default()).await?;
//! ```

mod config;
mod revoked_token;

pub use config::RedisConfig;
pub use revoked_token::{KEY_PREFIX, RedisRevokedTokenStorage};

/// Errors raised while setting up the Redis connection pool.
#[derive(Debug, thiserror::Error)]
pub enum RedisStorageError {
    /// The pool could not be built from the configuration.
    #[error("failed to create Redis pool: {0}")]
    CreatePool(#[from] deadpool_redis::CreatePoolError),

    /// The initial connection could not be established.
    #[error("failed to connect to Redis: {0}")]
    Connect(#[from] deadpool_redis::PoolError),
}
