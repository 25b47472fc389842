//! Session token issuance.

use std::sync::Arc;

use time::OffsetDateTime;

use super::jwt::{JwtService, SessionClaims};
use crate::AuthResult;
use crate::error::AuthError;
use crate::types::Principal;

/// A freshly minted session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// The signed JWT.
    pub token: String,

    /// When the token was issued.
    pub issued_at: OffsetDateTime,

    /// When the token stops being valid on its own.
    pub expires_at: OffsetDateTime,
}

/// Mints signed session tokens. Issuance is stateless.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    jwt: Arc<JwtService>,
}

impl TokenIssuer {
    /// Creates an issuer signing with `jwt`.
    #[must_use]
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self { jwt }
    }

    /// Issues a token for `principal`, valid for 12 hours from now.
    ///
    /// # Errors
    ///
    /// Only fails if the claims cannot be serialized, which does not happen
    /// for a well-formed principal.
    pub fn issue(&self, principal: &Principal) -> AuthResult<IssuedToken> {
        self.issue_at(principal, OffsetDateTime::now_utc())
    }

    /// Issues a token for `principal` as if the current time were `issued_at`.
    ///
    /// # Errors
    ///
    /// See [`issue`](Self::issue).
    pub fn issue_at(
        &self,
        principal: &Principal,
        issued_at: OffsetDateTime,
    ) -> AuthResult<IssuedToken> {
        let claims = SessionClaims::for_principal(principal, issued_at);
        let expires_at = claims
            .exp
            .and_then(|exp| OffsetDateTime::from_unix_timestamp(exp).ok())
            .ok_or_else(|| AuthError::internal("token expiry out of range"))?;

        let token = self
            .jwt
            .encode(&claims)
            .map_err(|e| AuthError::internal(e.to_string()))?;

        tracing::debug!(user_id = %principal.id, exp = %expires_at, "Session token issued");

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }
}
