//! Content routes.
//!
//! Every route requires a bearer token. Reads are open to any authenticated
//! user; update and delete go through the ownership guard against the owner
//! stored with the record.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use learnhub_auth::{Action, AuthContext, BearerAuth, Rejection, authorize};
use serde::Deserialize;

use super::ApiError;
use crate::repository::{Content, ContentUpdate, NewContent, UserProfile};
use crate::server::AppState;

/// Highest accepted rating.
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentUpdateRequest {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("id {raw} is not a number")))
}

fn parse_rating(rating: i64) -> Result<u8, ApiError> {
    u8::try_from(rating)
        .ok()
        .filter(|r| i64::from(*r) <= MAX_RATING)
        .ok_or_else(|| ApiError::bad_request(format!("rating must be between 0 and {MAX_RATING}")))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(v)| v)
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

async fn load(state: &AppState, id: i64) -> Result<Content, ApiError> {
    state
        .contents
        .get_content(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no such content: {id}")))
}

async fn poster_profile(state: &AppState, auth: &AuthContext) -> Result<UserProfile, ApiError> {
    match state.users.find_by_id(auth.user_id()).await? {
        Some(user) => Ok(user.profile()),
        None => {
            tracing::warn!(user_id = %auth.user_id(), "Token identity has no matching user");
            Err(ApiError::Auth(Rejection::MalformedClaims.into()))
        }
    }
}

/// `POST /content`
pub async fn create_content(
    State(state): State<AppState>,
    BearerAuth(auth): BearerAuth,
    body: Result<Json<CreateContentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Content>), ApiError> {
    let request = json_body(body)?;
    let (Some(video_url), Some(comment), Some(rating)) = (
        request.video_url.filter(|s| !s.is_empty()),
        request.comment.filter(|s| !s.is_empty()),
        request.rating,
    ) else {
        return Err(ApiError::bad_request("missing videoUrl, comment or rating"));
    };
    let rating = parse_rating(rating)?;

    let posted_by = poster_profile(&state, &auth).await?;
    let metadata = state.metadata.fetch(&video_url).await?;

    let content = state
        .contents
        .create_content(NewContent {
            video_url,
            comment,
            rating,
            metadata,
            posted_by,
        })
        .await?;

    tracing::info!(content_id = content.id, user_id = %auth.user_id(), "Content created");
    Ok((StatusCode::CREATED, Json(content)))
}

/// `GET /content`
pub async fn list_contents(
    State(state): State<AppState>,
    BearerAuth(_auth): BearerAuth,
) -> Result<Json<Vec<Content>>, ApiError> {
    Ok(Json(state.contents.list_contents().await?))
}

/// `GET /content/{id}`
pub async fn get_content(
    State(state): State<AppState>,
    BearerAuth(auth): BearerAuth,
    Path(id): Path<String>,
) -> Result<Json<Content>, ApiError> {
    let id = parse_id(&id)?;
    let content = load(&state, id).await?;
    authorize(&auth.principal, content.owner_id(), Action::Read).into_result()?;
    Ok(Json(content))
}

/// `PATCH /content/{id}`
pub async fn update_content(
    State(state): State<AppState>,
    BearerAuth(auth): BearerAuth,
    Path(id): Path<String>,
    body: Result<Json<ContentUpdateRequest>, JsonRejection>,
) -> Result<Json<Content>, ApiError> {
    let id = parse_id(&id)?;
    let request = json_body(body)?;
    let (Some(comment), Some(rating)) = (request.comment.filter(|s| !s.is_empty()), request.rating)
    else {
        return Err(ApiError::bad_request("missing comment or rating"));
    };
    let rating = parse_rating(rating)?;

    let content = load(&state, id).await?;
    authorize(&auth.principal, content.owner_id(), Action::Update).into_result()?;

    let updated = state
        .contents
        .update_content(id, ContentUpdate { comment, rating })
        .await?;

    tracing::info!(content_id = id, user_id = %auth.user_id(), "Content updated");
    Ok(Json(updated))
}

/// `DELETE /content/{id}`
pub async fn delete_content(
    State(state): State<AppState>,
    BearerAuth(auth): BearerAuth,
    Path(id): Path<String>,
) -> Result<Json<Content>, ApiError> {
    let id = parse_id(&id)?;
    let content = load(&state, id).await?;
    authorize(&auth.principal, content.owner_id(), Action::Delete).into_result()?;

    let deleted = state.contents.delete_content(id).await?;

    tracing::info!(content_id = id, user_id = %auth.user_id(), "Content deleted");
    Ok(Json(deleted))
}
