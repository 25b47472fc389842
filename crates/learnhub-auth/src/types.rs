//! Core identity types.

use serde::{Deserialize, Serialize};

/// The authenticated identity carried inside a session token.
///
/// Only these two fields ever enter a token. Anything else about a user is
/// looked up from storage when needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque user identifier assigned by the persistence layer.
    pub id: String,

    /// Login name.
    pub username: String,
}

impl Principal {
    /// Creates a new principal.
    #[must_use]
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}
