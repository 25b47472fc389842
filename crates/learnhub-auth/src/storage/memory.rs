//! Process-local revocation store.
//!
//! Entries live in this process only, so a token revoked here stays usable
//! against any other process. Use it for tests and single-instance
//! development; deployments with more than one API process need the Redis
//! store from `learnhub-auth-redis`.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;

use super::RevokedTokenStorage;
use crate::AuthResult;

/// In-memory revoked token storage backed by a `DashMap`.
///
/// Maps the raw token to the instant its revocation record may be dropped.
#[derive(Debug, Default)]
pub struct InMemoryRevokedTokenStorage {
    revoked: DashMap<String, OffsetDateTime>,
}

impl InMemoryRevokedTokenStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    /// Returns `true` if no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

#[async_trait]
impl RevokedTokenStorage for InMemoryRevokedTokenStorage {
    async fn revoke(&self, token: &str, ttl: Duration) -> AuthResult<()> {
        let expires_at = OffsetDateTime::now_utc() + ttl;
        self.revoked
            .entry(token.to_string())
            .and_modify(|existing| {
                if expires_at > *existing {
                    *existing = expires_at;
                }
            })
            .or_insert(expires_at);
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> AuthResult<bool> {
        Ok(self.revoked.contains_key(token))
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now = OffsetDateTime::now_utc();
        let before = self.revoked.len();
        self.revoked.retain(|_, expires_at| *expires_at > now);
        Ok(before.saturating_sub(self.revoked.len()) as u64)
    }
}
