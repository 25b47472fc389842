//! Revoked session token storage trait.
//!
//! A token is revoked by recording its raw string until the moment it would
//! have expired on its own. Validation consults this store on every request.
//!
//! # Requirements on implementations
//!
//! - The store must be shared by every process that verifies tokens. A
//!   process-local store only works when exactly one process serves requests.
//! - `revoke` must return `Ok` only once the entry is durably recorded. Logout
//!   reports success on the strength of that `Ok`.
//! - An entry must stay visible for at least the `ttl` it was written with.
//!   Stores with native expiry use `ttl` as the entry TTL, never shorter.

use std::time::Duration;

use async_trait::async_trait;

use crate::AuthResult;

/// Storage trait for revoked session tokens.
///
/// # Implementations
///
/// - [`InMemoryRevokedTokenStorage`](super::InMemoryRevokedTokenStorage) for
///   tests and single-process development
/// - `learnhub-auth-redis` for deployments with several API processes
#[async_trait]
pub trait RevokedTokenStorage: Send + Sync {
    /// Marks a token as revoked for at least `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StoreUnavailable`](crate::AuthError::StoreUnavailable)
    /// if the entry could not be recorded.
    ///
    /// # Idempotency
    ///
    /// Revoking an already-revoked token succeeds.
    async fn revoke(&self, token: &str, ttl: Duration) -> AuthResult<()>;

    /// Checks if a token has been revoked.
    ///
    /// Called on every protected request, after the signature and expiry have
    /// been checked.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StoreUnavailable`](crate::AuthError::StoreUnavailable)
    /// if the store cannot be reached. Callers must treat that as "cannot
    /// authenticate", never as "not revoked".
    async fn is_revoked(&self, token: &str) -> AuthResult<bool>;

    /// Deletes revocation records whose tokens have expired on their own.
    ///
    /// Stores with native key expiry have nothing to do and return `Ok(0)`.
    ///
    /// # Returns
    ///
    /// Returns the number of records deleted.
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
