//! Error response handling for authentication middleware.
//!
//! Every authentication failure renders the same 401 body regardless of the
//! underlying [`Rejection`](crate::error::Rejection), so callers cannot tell
//! an expired token from a revoked or forged one.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

const WWW_AUTHENTICATE: &str = "Bearer realm=\"learnhub\"";

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Auth request failed");
        }

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            headers.insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(WWW_AUTHENTICATE),
            );
        }

        (status, headers, Json(error_json(self.client_message()))).into_response()
    }
}

impl AuthError {
    /// HTTP status this error renders with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AuthError::NotOwner => StatusCode::FORBIDDEN,
            AuthError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            AuthError::StoreUnavailable { .. } | AuthError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the caller. Server-side details are never exposed.
    fn client_message(&self) -> &str {
        match self {
            AuthError::Unauthenticated(_) => "authentication failed",
            AuthError::NotOwner => "you are not authorized to perform this action",
            AuthError::StoreUnavailable { .. } => "could not log out",
            AuthError::InvalidRequest { message } => message,
            AuthError::Internal { .. } => "internal server error",
        }
    }
}

/// Builds the `{"error": ...}` body used by every error response.
#[must_use]
pub fn error_json(message: &str) -> serde_json::Value {
    json!({ "error": message })
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;
    use crate::error::Rejection;

    async fn render(error: AuthError) -> (StatusCode, HeaderMap, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_all_rejections_render_identically() {
        let mut bodies = Vec::new();
        for reason in [
            Rejection::MissingToken,
            Rejection::InvalidSignature,
            Rejection::Expired,
            Rejection::Revoked,
            Rejection::MalformedClaims,
            Rejection::InvalidCredentials,
            Rejection::StoreUnavailable,
        ] {
            let (status, headers, body) = render(AuthError::Unauthenticated(reason)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(headers[header::WWW_AUTHENTICATE], WWW_AUTHENTICATE);
            bodies.push(body);
        }

        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(bodies[0], json!({ "error": "authentication failed" }));
    }

    #[tokio::test]
    async fn test_not_owner_is_forbidden() {
        let (status, headers, _) = render(AuthError::NotOwner).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(headers.get(header::WWW_AUTHENTICATE).is_none());
    }

    #[tokio::test]
    async fn test_store_unavailable_hides_details() {
        let (status, _, body) = render(AuthError::store_unavailable("redis: connection refused")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "could not log out" }));
    }

    #[tokio::test]
    async fn test_invalid_request_is_bad_request() {
        let (status, _, body) = render(AuthError::invalid_request("missing username")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "missing username" }));
    }
}
