//! Login endpoint handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::middleware::AuthState;

/// Login request body.
///
/// Both fields are optional at the wire level so a missing field is reported
/// as a 400 with a readable message rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Always `"logged in"`.
    pub status: String,
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Handler for `POST /user/login`.
///
/// # Errors
///
/// - 400 if the body is not JSON or a field is missing
/// - 401 for any credential mismatch
pub async fn login_handler(
    State(state): State<AuthState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected login body");
        AuthError::invalid_request("request body must be a JSON object")
    })?;

    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(AuthError::invalid_request("missing username or password"));
    };

    let session = state.sessions.login(&username, &password).await?;

    Ok(Json(LoginResponse {
        status: "logged in".to_string(),
        id: session.principal.id,
        username: session.principal.username,
        token: session.token.token,
    }))
}
