//! Authentication context types.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;

use crate::types::Principal;

/// Authenticated request context.
///
/// Produced by [`TokenVerifier`](crate::token::TokenVerifier) and handed to
/// handlers through the [`BearerAuth`](super::BearerAuth) extractor. The raw
/// token is kept so logout can revoke exactly the credential that was
/// presented.
#[derive(Clone)]
pub struct AuthContext {
    /// The verified identity.
    pub principal: Principal,

    /// The bearer token the request was authenticated with.
    pub token: Arc<str>,

    /// When the token expires on its own.
    pub expires_at: OffsetDateTime,
}

impl AuthContext {
    /// Gets the authenticated user's identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.principal.id
    }

    /// Gets the authenticated user's login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.principal.username
    }

    /// Gets the raw bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Time left until the token expires on its own, measured from `now`.
    ///
    /// Rounded up to whole seconds and never less than one second, so a
    /// revocation entry written with this TTL outlives the token.
    #[must_use]
    pub fn remaining_lifetime(&self, now: OffsetDateTime) -> Duration {
        let remaining = self.expires_at.unix_timestamp() - now.unix_timestamp();
        Duration::from_secs(remaining.max(1).unsigned_abs())
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("principal", &self.principal)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(expires_at: OffsetDateTime) -> AuthContext {
        AuthContext {
            principal: Principal::new("u1", "alice"),
            token: Arc::from("header.claims.signature"),
            expires_at,
        }
    }

    #[test]
    fn test_accessors() {
        let ctx = context(OffsetDateTime::now_utc());
        assert_eq!(ctx.user_id(), "u1");
        assert_eq!(ctx.username(), "alice");
        assert_eq!(ctx.token(), "header.claims.signature");
    }

    #[test]
    fn test_remaining_lifetime() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let ctx = context(now + time::Duration::hours(2));
        assert_eq!(ctx.remaining_lifetime(now), Duration::from_secs(7200));
    }

    #[test]
    fn test_remaining_lifetime_rounds_up_subsecond_now() {
        let expires_at = OffsetDateTime::from_unix_timestamp(1_700_000_100).unwrap();
        let now = expires_at - time::Duration::milliseconds(99_500);
        assert_eq!(
            context(expires_at).remaining_lifetime(now),
            Duration::from_secs(100)
        );
    }

    #[test]
    fn test_remaining_lifetime_floor() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let ctx = context(now);
        assert_eq!(ctx.remaining_lifetime(now), Duration::from_secs(1));
    }

    #[test]
    fn test_debug_does_not_print_token() {
        let ctx = context(OffsetDateTime::now_utc());
        assert!(!format!("{ctx:?}").contains("signature"));
    }
}
