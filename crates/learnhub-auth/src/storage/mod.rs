//! Storage traits for authentication data.
//!
//! This module defines storage interfaces for:
//!
//! - Revoked session tokens
//! - User credential lookup
//!
//! # Implementations
//!
//! - [`InMemoryRevokedTokenStorage`] - process-local revocation store
//! - `learnhub-auth-redis` - Redis revocation store shared across processes

pub mod memory;
pub mod revoked_token;
pub mod user;

pub use memory::InMemoryRevokedTokenStorage;
pub use revoked_token::RevokedTokenStorage;
pub use user::{UserCredentials, UserStorage};
