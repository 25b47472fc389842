//! # learnhub-auth
//!
//! Session authentication for the LearnHub API.
//!
//! This crate provides:
//! - Stateless issuance of signed, time-limited session tokens
//! - Token verification backed by a revocation store
//! - Logout through revocation
//! - A resource ownership guard
//!
//! ## Overview
//!
//! A user logs in with a username and password and receives an HS512 JWT
//! valid for 12 hours. Every protected request presents that token as a
//! bearer credential; the verifier checks signature, expiry and revocation
//! before any claim is trusted. Logout writes the token into the revocation
//! store with a TTL equal to its remaining lifetime, so the store never holds
//! entries for tokens that could not be used anyway.
//!
//! ## Modules
//!
//! - [`config`] - Signing secret configuration
//! - [`token`] - Token issuance and verification
//! - [`storage`] - Revocation and user lookup storage traits
//! - [`session`] - Login and logout
//! - [`ownership`] - Owner-only access checks
//! - [`password`] - Password digests
//! - [`middleware`] - Axum bearer extractor and error responses
//! - [`http`] - Axum handlers for login and logout

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod session;
pub mod storage;
pub mod token;
pub mod types;

pub use config::{AuthConfig, ConfigError, DEFAULT_SIGNING_SECRET};
pub use error::{AuthError, ErrorCategory, Rejection};
pub use http::{LoginRequest, LoginResponse, LogoutResponse, login_handler, logout_handler};
pub use middleware::{AuthContext, AuthState, BearerAuth};
pub use ownership::{AccessDecision, Action, DenyReason, authorize};
pub use password::{Argon2Hasher, CredentialHasher};
pub use session::{LoginSession, SessionService};
pub use storage::{InMemoryRevokedTokenStorage, RevokedTokenStorage, UserCredentials, UserStorage};
pub use token::{IssuedToken, JwtService, SessionClaims, TokenIssuer, TokenVerifier};
pub use types::Principal;

/// Type alias for authentication/authorization results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use learnhub_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::config::AuthConfig;
    pub use crate::error::{AuthError, Rejection};
    pub use crate::middleware::{AuthContext, AuthState, BearerAuth};
    pub use crate::ownership::{Action, authorize};
    pub use crate::storage::{RevokedTokenStorage, UserCredentials, UserStorage};
    pub use crate::types::Principal;
}
