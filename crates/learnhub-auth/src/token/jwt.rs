//! JWT encoding and decoding for session tokens.
//!
//! Session tokens are HS512-signed JWTs keyed by the process-wide secret from
//! [`AuthConfig`](crate::config::AuthConfig). This module only deals with the
//! wire format and the signature. Expiry, revocation and claim checks live in
//! [`TokenVerifier`](super::TokenVerifier) so they run in a fixed order.

use std::collections::HashSet;
use std::fmt;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::types::Principal;

/// Issuer claim stamped into every session token.
pub const TOKEN_ISSUER: &str = "learnhub-api";

/// Audience claim stamped into every session token.
pub const TOKEN_AUDIENCE: &str = "user";

/// Subject claim stamped into every session token.
pub const TOKEN_SUBJECT: &str = "user-login";

/// Lifetime of a session token.
pub const TOKEN_LIFETIME: Duration = Duration::hours(12);

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during JWT operations.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to encode a token.
    #[error("Failed to encode token: {message}")]
    EncodingError {
        /// Description of the encoding error.
        message: String,
    },

    /// The token signature, structure, or algorithm is invalid.
    #[error("Invalid signature: {message}")]
    InvalidSignature {
        /// Description of what failed.
        message: String,
    },

    /// The signature is valid but the claims could not be read.
    #[error("Invalid claims: {message}")]
    InvalidClaims {
        /// Description of why claims are invalid.
        message: String,
    },
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            // Only reached once `decode_header` has accepted the header, so a
            // JSON error here is about the claims.
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => Self::InvalidClaims {
                message: err.to_string(),
            },
            _ => Self::InvalidSignature {
                message: err.to_string(),
            },
        }
    }
}

// ============================================================================
// Token Claims
// ============================================================================

/// Claims carried by a session token.
///
/// Every field has a serde default so a signed token with missing claims still
/// decodes and is rejected by the verifier with a precise reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// User identifier.
    #[serde(default)]
    pub id: String,

    /// Login name.
    #[serde(default)]
    pub username: String,

    /// Issuer.
    #[serde(default)]
    pub iss: String,

    /// Audience.
    #[serde(default)]
    pub aud: String,

    /// Subject.
    #[serde(default)]
    pub sub: String,

    /// Issued at (Unix timestamp).
    #[serde(default)]
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Unique token id. Keeps two tokens minted for the same user in the same
    /// second distinct, so revoking one never revokes the other.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jti: String,
}

impl SessionClaims {
    /// Builds the claims for `principal` issued at `issued_at`.
    #[must_use]
    pub fn for_principal(principal: &Principal, issued_at: OffsetDateTime) -> Self {
        let iat = issued_at.unix_timestamp();
        Self {
            id: principal.id.clone(),
            username: principal.username.clone(),
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            sub: TOKEN_SUBJECT.to_string(),
            iat,
            exp: Some(iat + TOKEN_LIFETIME.whole_seconds()),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Returns `true` if the fixed service claims match this service.
    #[must_use]
    pub fn is_for_this_service(&self) -> bool {
        self.iss == TOKEN_ISSUER && self.aud == TOKEN_AUDIENCE && self.sub == TOKEN_SUBJECT
    }

    /// Returns the principal if both identity claims are present.
    #[must_use]
    pub fn principal(&self) -> Option<Principal> {
        if self.id.is_empty() || self.username.is_empty() {
            return None;
        }
        Some(Principal::new(self.id.clone(), self.username.clone()))
    }
}

// ============================================================================
// JWT Service
// ============================================================================

/// Service for encoding and decoding session JWTs.
///
/// This service is thread-safe (`Send + Sync`) and is shared behind an `Arc`
/// by the issuer and the verifier.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Creates a new JWT service keyed by `secret`.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Only the signature and structure are checked here.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Encodes claims into a signed JWT string.
    ///
    /// # Errors
    /// Returns an error if the claims cannot be serialized.
    pub fn encode(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding_key).map_err(|e| {
            JwtError::EncodingError {
                message: e.to_string(),
            }
        })
    }

    /// Checks the signature of a JWT and returns its claims.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidSignature`] for tampered, truncated or
    /// foreign-algorithm tokens and [`JwtError::InvalidClaims`] when the payload
    /// is not a claims object.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, JwtError> {
        decode_header(token).map_err(|e| JwtError::InvalidSignature {
            message: format!("bad header: {e}"),
        })?;

        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(JwtError::from)
    }
}

impl fmt::Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("algorithm", &SIGNING_ALGORITHM)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
