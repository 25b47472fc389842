//! User credential lookup.
//!
//! The session service only needs to resolve a username to an identity and a
//! stored password digest. Persistence of users is owned by the application.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::Principal;

/// A user as seen by the login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    /// Identity to embed in the token on successful login.
    pub principal: Principal,

    /// Password digest produced by a [`CredentialHasher`](crate::password::CredentialHasher).
    pub password_hash: String,
}

/// Lookup of users by login name.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Finds a user by username.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no such user exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<UserCredentials>>;
}
