//! Session token verification.
//!
//! Each verification walks the same fixed sequence and stops at the first
//! failing step:
//!
//! 1. the token is present
//! 2. the signature, structure and algorithm are valid
//! 3. the embedded expiry has not passed
//! 4. the token is not in the revocation store
//! 5. the service claims match and `id`/`username` are present
//!
//! Expiry is checked before revocation so an expired token is always reported
//! as expired. Revocation is checked before any claim is trusted, and the
//! store is consulted on every call with no local cache. A store failure fails
//! closed.

use std::sync::Arc;

use time::OffsetDateTime;

use super::jwt::{JwtError, JwtService};
use crate::error::Rejection;
use crate::middleware::AuthContext;
use crate::storage::RevokedTokenStorage;

/// Verifies session tokens and resolves them to an [`AuthContext`].
#[derive(Clone)]
pub struct TokenVerifier {
    jwt: Arc<JwtService>,
    revoked_tokens: Arc<dyn RevokedTokenStorage>,
}

impl TokenVerifier {
    /// Creates a verifier.
    #[must_use]
    pub fn new(jwt: Arc<JwtService>, revoked_tokens: Arc<dyn RevokedTokenStorage>) -> Self {
        Self {
            jwt,
            revoked_tokens,
        }
    }

    /// Verifies `token` against the current time.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] for the first check that fails.
    pub async fn verify(&self, token: &str) -> Result<AuthContext, Rejection> {
        self.verify_at(token, OffsetDateTime::now_utc()).await
    }

    /// Verifies `token` as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] for the first check that fails.
    pub async fn verify_at(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> Result<AuthContext, Rejection> {
        if token.is_empty() {
            tracing::debug!("Rejected token: missing");
            return Err(Rejection::MissingToken);
        }

        let claims = self.jwt.decode(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected token: decode failed");
            match e {
                JwtError::InvalidClaims { .. } => Rejection::MalformedClaims,
                _ => Rejection::InvalidSignature,
            }
        })?;

        let Some(exp) = claims.exp else {
            tracing::debug!("Rejected token: no exp claim");
            return Err(Rejection::MalformedClaims);
        };
        let Ok(expires_at) = OffsetDateTime::from_unix_timestamp(exp) else {
            tracing::debug!(exp, "Rejected token: exp out of range");
            return Err(Rejection::MalformedClaims);
        };
        // A token is expired from the instant `exp` names onwards.
        if now >= expires_at {
            tracing::debug!(user_id = %claims.id, exp, "Rejected token: expired");
            return Err(Rejection::Expired);
        }

        match self.revoked_tokens.is_revoked(token).await {
            Ok(false) => {}
            Ok(true) => {
                tracing::debug!(user_id = %claims.id, "Rejected token: revoked");
                return Err(Rejection::Revoked);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Revocation store unavailable, rejecting token");
                return Err(Rejection::StoreUnavailable);
            }
        }

        if !claims.is_for_this_service() {
            tracing::debug!(
                iss = %claims.iss,
                aud = %claims.aud,
                sub = %claims.sub,
                "Rejected token: issued for another service"
            );
            return Err(Rejection::MalformedClaims);
        }

        let Some(principal) = claims.principal() else {
            tracing::debug!("Rejected token: missing id or username claim");
            return Err(Rejection::MalformedClaims);
        };

        tracing::debug!(user_id = %principal.id, "Token validated successfully");

        Ok(AuthContext {
            principal,
            token: token.into(),
            expires_at,
        })
    }
}
