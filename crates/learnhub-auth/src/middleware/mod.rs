//! HTTP middleware for authentication.
//!
//! This module provides:
//!
//! - Bearer token extraction and verification
//! - Authentication context injection
//! - JSON error responses for [`AuthError`](crate::AuthError)
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use learnhub_auth::middleware::{AuthState, BearerAuth};
//!
//! async fn whoami(BearerAuth(auth): BearerAuth) -> String {
//!     format!("Hello, {}!", auth.username())
//! }
//!
//! let app = Router::new()
//!     .route("/whoami", get(whoami))
//!     .with_state(auth_state);
//! ```

pub mod auth;
pub mod error;
pub mod types;

pub use auth::{AuthState, BearerAuth};
pub use error::error_json;
pub use types::AuthContext;
