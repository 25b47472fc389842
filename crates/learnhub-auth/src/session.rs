//! Login and logout.
//!
//! Login resolves a username, checks the password against the stored digest
//! and mints a token. Logout records the presented token in the revocation
//! store for the rest of its lifetime, and only reports success once the store
//! has accepted the write.

use std::sync::{Arc, OnceLock};

use time::OffsetDateTime;

use crate::AuthResult;
use crate::error::{AuthError, Rejection};
use crate::middleware::AuthContext;
use crate::password::CredentialHasher;
use crate::storage::{RevokedTokenStorage, UserStorage};
use crate::token::{IssuedToken, TokenIssuer};
use crate::types::Principal;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginSession {
    /// The user that logged in.
    pub principal: Principal,

    /// The session token issued to them.
    pub token: IssuedToken,
}

/// Orchestrates the login and logout flows.
#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserStorage>,
    hasher: Arc<dyn CredentialHasher>,
    issuer: TokenIssuer,
    revoked_tokens: Arc<dyn RevokedTokenStorage>,
    /// Digest checked against when the username is unknown, so both failure
    /// paths pay for one password verification.
    decoy_digest: Arc<OnceLock<String>>,
}

/// Plaintext behind the decoy digest. A match against it is never a login.
const DECOY_PASSWORD: &str = "learnhub-decoy-password";

impl SessionService {
    /// Creates a new session service.
    pub fn new(
        users: Arc<dyn UserStorage>,
        hasher: Arc<dyn CredentialHasher>,
        issuer: TokenIssuer,
        revoked_tokens: Arc<dyn RevokedTokenStorage>,
    ) -> Self {
        Self {
            users,
            hasher,
            issuer,
            revoked_tokens,
            decoy_digest: Arc::new(OnceLock::new()),
        }
    }

    /// Authenticates a username/password pair and issues a session token.
    ///
    /// An unknown username and a wrong password produce the same
    /// `InvalidCredentials` rejection.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidRequest`] if either field is empty
    /// - [`AuthError::Unauthenticated`] with [`Rejection::InvalidCredentials`]
    ///   on any credential mismatch
    /// - the user storage error if the lookup fails
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<LoginSession> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::invalid_request("missing username or password"));
        }

        let user = self.users.find_by_username(username).await?;

        // Argon2 verification is CPU-bound; keep it off the async workers.
        let hasher = self.hasher.clone();
        let decoy = self.decoy_digest.clone();
        let password = password.to_string();
        let digest = user.as_ref().map(|u| u.password_hash.clone());
        let matches = tokio::task::spawn_blocking(move || match digest {
            Some(digest) => hasher.verify(&password, &digest),
            None => {
                let decoy = decoy.get_or_init(|| hasher.hash(DECOY_PASSWORD).unwrap_or_default());
                let _ = hasher.verify(&password, decoy);
                false
            }
        })
        .await
        .map_err(|e| AuthError::internal(format!("password verification task failed: {e}")))?;

        let Some(user) = user else {
            tracing::debug!(username = %username, "Login failed: unknown user");
            return Err(Rejection::InvalidCredentials.into());
        };
        if !matches {
            tracing::debug!(user_id = %user.principal.id, "Login failed: password mismatch");
            return Err(Rejection::InvalidCredentials.into());
        }

        let token = self.issuer.issue(&user.principal)?;
        tracing::info!(user_id = %user.principal.id, "User logged in");

        Ok(LoginSession {
            principal: user.principal,
            token,
        })
    }

    /// Revokes the token `ctx` was authenticated with.
    ///
    /// Returns the revoked token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StoreUnavailable`] if the revocation could not be
    /// recorded. The token is still usable in that case and the caller must
    /// be told logout did not happen.
    pub async fn logout(&self, ctx: &AuthContext) -> AuthResult<Arc<str>> {
        let ttl = ctx.remaining_lifetime(OffsetDateTime::now_utc());

        self.revoked_tokens
            .revoke(ctx.token(), ttl)
            .await
            .map_err(|e| {
                tracing::warn!(user_id = %ctx.user_id(), error = %e, "Logout failed: token not revoked");
                match e {
                    AuthError::StoreUnavailable { .. } => e,
                    other => AuthError::store_unavailable(other.to_string()),
                }
            })?;

        tracing::info!(user_id = %ctx.user_id(), ttl_secs = ttl.as_secs(), "User logged out");
        Ok(ctx.token.clone())
    }
}
