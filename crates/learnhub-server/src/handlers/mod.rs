//! HTTP handlers for the LearnHub API.
//!
//! Login and logout live in `learnhub-auth`; this module adds the health
//! check, registration and the content routes.

pub mod content;
pub mod health;
pub mod user;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use learnhub_auth::AuthError;
use learnhub_auth::middleware::error_json;

use crate::metadata::MetadataError;
use crate::repository::RepositoryError;

pub use content::{
    ContentUpdateRequest, CreateContentRequest, create_content, delete_content, get_content,
    list_contents, update_content,
};
pub use health::root;
pub use user::{RegisterRequest, register};

/// Error type for application handlers.
///
/// Authentication and ownership failures are delegated to [`AuthError`] so
/// they render exactly as the auth extractor renders them.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Bad gateway: {0}")]
    BadGateway(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(err) => err.status_code(),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("no such {entity}: {id}"))
            }
            RepositoryError::UsernameTaken(username) => {
                ApiError::Conflict(format!("username {username} is already taken"))
            }
            RepositoryError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<MetadataError> for ApiError {
    fn from(err: MetadataError) -> Self {
        tracing::warn!(error = %err, "Video metadata lookup failed");
        ApiError::BadGateway("failed to fetch video details".into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::Auth(err) => return err.into_response(),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                "internal server error".to_string()
            }
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::BadGateway(msg) => msg,
        };

        (status, Json(error_json(&message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_map_to_statuses() {
        let not_found: ApiError = RepositoryError::content_not_found(7).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Not found: no such content: 7");

        let taken: ApiError = RepositoryError::UsernameTaken("alice".into()).into();
        assert_eq!(taken.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_auth_errors_keep_their_status() {
        let not_owner = ApiError::from(AuthError::NotOwner);
        assert_eq!(not_owner.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(not_owner.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let response = ApiError::internal("db exploded").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
