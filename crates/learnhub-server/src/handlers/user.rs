//! User registration.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use super::ApiError;
use crate::repository::{NewUser, UserProfile};
use crate::server::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// `POST /user/register`
///
/// Responds with the created user, without the password digest.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
    let (Some(username), Some(password), Some(name)) = (
        non_empty(request.username),
        non_empty(request.password),
        non_empty(request.name),
    ) else {
        return Err(ApiError::bad_request("missing username, name or password"));
    };

    let hasher = state.hasher.clone();
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::internal(format!("password hashing task failed: {e}")))??;

    let user = state
        .users
        .create_user(NewUser {
            username,
            name,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(user.profile())))
}
