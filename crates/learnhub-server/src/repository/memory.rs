//! In-memory repositories backed by `DashMap`.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    Content, ContentRepository, ContentUpdate, NewContent, NewUser, RepositoryError, User,
    UserRepository,
};

/// Users keyed by id, with a username index.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    by_id: DashMap<String, User>,
    by_username: DashMap<String, String>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        // The username entry is the uniqueness lock.
        let Entry::Vacant(slot) = self.by_username.entry(user.username.clone()) else {
            return Err(RepositoryError::UsernameTaken(user.username));
        };

        let created = User {
            id: Uuid::new_v4().to_string(),
            username: user.username,
            name: user.name,
            password_hash: user.password_hash,
            registered_at: OffsetDateTime::now_utc(),
        };
        self.by_id.insert(created.id.clone(), created.clone());
        slot.insert(created.id.clone());

        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let Some(id) = self.by_username.get(username).map(|id| id.value().clone()) else {
            return Ok(None);
        };
        Ok(self.by_id.get(&id).map(|user| user.value().clone()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.by_id.get(id).map(|user| user.value().clone()))
    }
}

/// Content keyed by a sequential numeric id starting at 1.
#[derive(Debug)]
pub struct InMemoryContentRepository {
    contents: DashMap<i64, Content>,
    next_id: AtomicI64,
}

impl Default for InMemoryContentRepository {
    fn default() -> Self {
        Self {
            contents: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn create_content(&self, content: NewContent) -> Result<Content, RepositoryError> {
        let now = OffsetDateTime::now_utc();
        let created = Content {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            video_url: content.video_url,
            comment: content.comment,
            rating: content.rating,
            metadata: content.metadata,
            posted_by: content.posted_by,
            created_at: now,
            updated_at: now,
        };
        self.contents.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_contents(&self) -> Result<Vec<Content>, RepositoryError> {
        let mut contents: Vec<Content> = self
            .contents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        contents.sort_by_key(|c| c.id);
        Ok(contents)
    }

    async fn get_content(&self, id: i64) -> Result<Option<Content>, RepositoryError> {
        Ok(self.contents.get(&id).map(|c| c.value().clone()))
    }

    async fn update_content(
        &self,
        id: i64,
        update: ContentUpdate,
    ) -> Result<Content, RepositoryError> {
        let mut entry = self
            .contents
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::content_not_found(id))?;

        entry.comment = update.comment;
        entry.rating = update.rating;
        entry.updated_at = OffsetDateTime::now_utc();
        Ok(entry.value().clone())
    }

    async fn delete_content(&self, id: i64) -> Result<Content, RepositoryError> {
        self.contents
            .remove(&id)
            .map(|(_, content)| content)
            .ok_or_else(|| RepositoryError::content_not_found(id))
    }
}
