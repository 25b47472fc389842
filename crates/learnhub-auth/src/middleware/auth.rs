//! Bearer token authentication extractor.
//!
//! # Example
//!
//! ```ignore
//! use learnhub_auth::middleware::BearerAuth;
//!
//! async fn protected_handler(BearerAuth(auth): BearerAuth) -> String {
//!     format!("Hello, {}!", auth.username())
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::config::AuthConfig;
use crate::error::{AuthError, Rejection};
use crate::password::CredentialHasher;
use crate::session::SessionService;
use crate::storage::{RevokedTokenStorage, UserStorage};
use crate::token::{JwtService, TokenIssuer, TokenVerifier};

use super::types::AuthContext;

// =============================================================================
// Auth State
// =============================================================================

/// State required for bearer authentication and the session handlers.
///
/// Include it in the application state and expose it with `FromRef`:
///
/// ```ignore
/// impl FromRef<AppState> for AuthState {
///     fn from_ref(state: &AppState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthState {
    /// Verifies bearer tokens on protected requests.
    pub verifier: Arc<TokenVerifier>,

    /// Login and logout.
    pub sessions: Arc<SessionService>,
}

impl AuthState {
    /// Creates a new auth state.
    pub fn new(verifier: Arc<TokenVerifier>, sessions: Arc<SessionService>) -> Self {
        Self { verifier, sessions }
    }

    /// Wires issuer, verifier and session service around one signing key.
    ///
    /// The verifier and logout share `revoked_tokens`, so a revocation made
    /// by logout is visible to the very next verification.
    pub fn from_config(
        config: &AuthConfig,
        users: Arc<dyn UserStorage>,
        hasher: Arc<dyn CredentialHasher>,
        revoked_tokens: Arc<dyn RevokedTokenStorage>,
    ) -> Self {
        let jwt = Arc::new(JwtService::new(config.jwt_secret.as_bytes()));
        let verifier = TokenVerifier::new(jwt.clone(), revoked_tokens.clone());
        let sessions = SessionService::new(users, hasher, TokenIssuer::new(jwt), revoked_tokens);

        Self::new(Arc::new(verifier), Arc::new(sessions))
    }
}

// =============================================================================
// Bearer Auth Extractor
// =============================================================================

/// Axum extractor that verifies the `Authorization: Bearer <token>` header.
///
/// A missing header, a non-bearer scheme and an empty token are all
/// [`Rejection::MissingToken`]. Every rejection becomes
/// [`AuthError::Unauthenticated`], which renders as a uniform 401.
pub struct BearerAuth(pub AuthContext);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let Some(token) = bearer_token(parts) else {
            tracing::debug!(path = %parts.uri.path(), "Missing bearer token");
            return Err(Rejection::MissingToken.into());
        };

        // The verifier has already logged the reason.
        let ctx = auth_state
            .verifier
            .verify(token)
            .await
            .map_err(AuthError::Unauthenticated)?;

        Ok(BearerAuth(ctx))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
