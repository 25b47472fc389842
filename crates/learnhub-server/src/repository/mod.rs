//! Persistence for users and posted content.
//!
//! Handlers depend on the [`UserRepository`] and [`ContentRepository`] traits.
//! The in-memory implementations in [`memory`] back the default server and
//! the tests.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use learnhub_auth::{AuthError, AuthResult, Principal, UserCredentials, UserStorage};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub use memory::{InMemoryContentRepository, InMemoryUserRepository};

/// Errors raised by repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("username already taken: {0}")]
    UsernameTaken(String),

    #[error("storage error: {0}")]
    Internal(String),
}

impl RepositoryError {
    pub fn content_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "content",
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A registered user, including the stored password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub registered_at: OffsetDateTime,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            name: self.name.clone(),
            registered_at: self.registered_at,
        }
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.id.clone(), self.username.clone())
    }
}

/// Input for [`UserRepository::create_user`]. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub password_hash: String,
}

/// Public view of a user. Never carries the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

/// oEmbed details of a posted video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub video_title: String,
    pub thumbnail_url: String,
    pub creator_name: String,
    pub creator_url: String,
}

/// A posted video with the poster's review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: i64,
    pub video_url: String,
    pub comment: String,
    pub rating: u8,
    #[serde(flatten)]
    pub metadata: VideoMetadata,
    pub posted_by: UserProfile,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Content {
    /// Identifier of the user that owns this content.
    pub fn owner_id(&self) -> &str {
        &self.posted_by.id
    }
}

#[derive(Debug, Clone)]
pub struct NewContent {
    pub video_url: String,
    pub comment: String,
    pub rating: u8,
    pub metadata: VideoMetadata,
    pub posted_by: UserProfile,
}

#[derive(Debug, Clone)]
pub struct ContentUpdate {
    pub comment: String,
    pub rating: u8,
}

// =============================================================================
// Traits
// =============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::UsernameTaken`] if the username is already registered.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError>;
}

#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn create_content(&self, content: NewContent) -> Result<Content, RepositoryError>;

    async fn list_contents(&self) -> Result<Vec<Content>, RepositoryError>;

    async fn get_content(&self, id: i64) -> Result<Option<Content>, RepositoryError>;

    /// Replaces comment and rating.
    ///
    /// Ownership is the caller's concern; the repository does not check it.
    async fn update_content(
        &self,
        id: i64,
        update: ContentUpdate,
    ) -> Result<Content, RepositoryError>;

    /// Removes a record and returns it.
    async fn delete_content(&self, id: i64) -> Result<Content, RepositoryError>;
}

// =============================================================================
// Login lookup
// =============================================================================

/// Exposes a [`UserRepository`] to the login flow.
#[derive(Clone)]
pub struct RepositoryUserStorage {
    users: Arc<dyn UserRepository>,
}

impl RepositoryUserStorage {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserStorage for RepositoryUserStorage {
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<UserCredentials>> {
        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(|e| AuthError::internal(e.to_string()))?;

        Ok(user.map(|user| UserCredentials {
            principal: user.principal(),
            password_hash: user.password_hash,
        }))
    }
}
