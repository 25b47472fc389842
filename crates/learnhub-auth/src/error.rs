//! Authentication and authorization error types.
//!
//! Two layers are defined here:
//!
//! - [`Rejection`] is the internal reason a credential was refused. It is
//!   logged for operators and never returned to the caller.
//! - [`AuthError`] is what crosses the HTTP boundary. Every authentication
//!   rejection collapses into [`AuthError::Unauthenticated`], which renders as
//!   the same generic 401 regardless of the reason it carries.

use std::fmt;

/// Reason a bearer token or a set of login credentials was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// No token was supplied with the request.
    MissingToken,
    /// Signature, structure, or algorithm of the token is invalid.
    InvalidSignature,
    /// The token's embedded expiry has passed.
    Expired,
    /// The token was revoked by a logout.
    Revoked,
    /// Required claims are missing, empty, or do not match this service.
    MalformedClaims,
    /// Username or password did not match.
    InvalidCredentials,
    /// The revocation store could not be consulted; verification fails closed.
    StoreUnavailable,
}

impl Rejection {
    /// Returns a stable identifier for logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
            Self::MalformedClaims => "malformed_claims",
            Self::InvalidCredentials => "invalid_credentials",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during authentication and authorization operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The caller could not be authenticated.
    ///
    /// The display text is deliberately the same for every reason.
    #[error("authentication failed")]
    Unauthenticated(Rejection),

    /// The caller is authenticated but does not own the resource.
    #[error("forbidden: not the owner of this resource")]
    NotOwner,

    /// The revocation store rejected a write or could not be reached.
    #[error("revocation store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the storage failure.
        message: String,
    },

    /// The request is missing required input.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Description of what is missing or invalid.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `StoreUnavailable` error.
    #[must_use]
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the rejection reason if this is an authentication failure.
    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Unauthenticated(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Returns `true` if this is an authentication error.
    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. } | Self::Internal { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthenticated(Rejection::InvalidCredentials) => ErrorCategory::Authentication,
            Self::Unauthenticated(Rejection::StoreUnavailable) => ErrorCategory::Infrastructure,
            Self::Unauthenticated(_) => ErrorCategory::Token,
            Self::NotOwner => ErrorCategory::Authorization,
            Self::StoreUnavailable { .. } => ErrorCategory::Infrastructure,
            Self::InvalidRequest { .. } => ErrorCategory::Validation,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<Rejection> for AuthError {
    fn from(reason: Rejection) -> Self {
        Self::Unauthenticated(reason)
    }
}

/// Categories of authentication/authorization errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Login credential failures.
    Authentication,
    /// Ownership checks.
    Authorization,
    /// Bearer token validation failures.
    Token,
    /// Request validation errors.
    Validation,
    /// Revocation store failures.
    Infrastructure,
    /// Internal server errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Authorization => write!(f, "authorization"),
            Self::Token => write!(f, "token"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_display_is_undifferentiated() {
        let reasons = [
            Rejection::MissingToken,
            Rejection::InvalidSignature,
            Rejection::Expired,
            Rejection::Revoked,
            Rejection::MalformedClaims,
            Rejection::InvalidCredentials,
            Rejection::StoreUnavailable,
        ];

        for reason in reasons {
            assert_eq!(
                AuthError::Unauthenticated(reason).to_string(),
                "authentication failed"
            );
        }
    }

    #[test]
    fn test_error_predicates() {
        let err = AuthError::from(Rejection::Revoked);
        assert!(err.is_authentication_error());
        assert!(!err.is_server_error());
        assert_eq!(err.rejection(), Some(Rejection::Revoked));

        let err = AuthError::NotOwner;
        assert!(!err.is_authentication_error());
        assert!(err.rejection().is_none());

        let err = AuthError::store_unavailable("connection refused");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::from(Rejection::InvalidCredentials).category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            AuthError::from(Rejection::Expired).category(),
            ErrorCategory::Token
        );
        assert_eq!(
            AuthError::from(Rejection::StoreUnavailable).category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(AuthError::NotOwner.category(), ErrorCategory::Authorization);
        assert_eq!(ErrorCategory::Token.to_string(), "token");
    }

    #[test]
    fn test_rejection_as_str() {
        assert_eq!(Rejection::MissingToken.as_str(), "missing_token");
        assert_eq!(Rejection::Revoked.to_string(), "revoked");
    }
}
