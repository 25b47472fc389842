//! Logout endpoint handler.
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use learnhub_auth::http::logout_handler;
//!
//! let app = Router::new()
//!     .route("/user/logout", get(logout_handler))
//!     .with_state(auth_state);
//! ```

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::middleware::{AuthState, BearerAuth};

/// Successful logout response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Always `"logged out"`.
    pub status: String,

    /// The token that was revoked.
    pub token: String,
}

/// Handler for `GET /user/logout`.
///
/// Requires a valid bearer token, so logging out twice with the same token
/// fails authentication on the second call.
///
/// # Errors
///
/// - 401 if the presented token does not authenticate
/// - 500 if the revocation store rejected the write
pub async fn logout_handler(
    State(state): State<AuthState>,
    BearerAuth(auth): BearerAuth,
) -> Result<Json<LogoutResponse>, AuthError> {
    let token = state.sessions.logout(&auth).await?;

    Ok(Json(LogoutResponse {
        status: "logged out".to_string(),
        token: token.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::{get, post},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::AuthResult;
    use crate::config::AuthConfig;
    use crate::http::{LoginResponse, login_handler};
    use crate::password::{Argon2Hasher, CredentialHasher};
    use crate::storage::{InMemoryRevokedTokenStorage, UserCredentials, UserStorage};
    use crate::types::Principal;

    struct Users(HashMap<String, UserCredentials>);

    #[async_trait::async_trait]
    impl UserStorage for Users {
        async fn find_by_username(&self, username: &str) -> AuthResult<Option<UserCredentials>> {
            Ok(self.0.get(username).cloned())
        }
    }

    fn app() -> Router {
        let mut users = HashMap::new();
        users.insert(
            "alice".to_string(),
            UserCredentials {
                principal: Principal::new("u1", "alice"),
                password_hash: Argon2Hasher.hash("pw").unwrap(),
            },
        );
        let state = AuthState::from_config(
            &AuthConfig::with_secret("handler-test"),
            Arc::new(Users(users)),
            Arc::new(Argon2Hasher),
            Arc::new(InMemoryRevokedTokenStorage::new()),
        );

        Router::new()
            .route("/user/login", post(login_handler))
            .route("/user/logout", get(logout_handler))
            .with_state(state)
    }

    fn login_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/user/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn logout_request(token: &str) -> Request<Body> {
        Request::builder()
            .uri("/user/logout")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_login_then_logout_twice() {
        let app = app();

        let response = app
            .clone()
            .oneshot(login_request(r#"{"username":"alice","password":"pw"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let login: LoginResponse = json(response).await;
        assert_eq!(login.status, "logged in");
        assert_eq!(login.id, "u1");
        assert_eq!(login.username, "alice");

        let response = app.clone().oneshot(logout_request(&login.token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let logout: LogoutResponse = json(response).await;
        assert_eq!(logout.status, "logged out");
        assert_eq!(logout.token, login.token);

        let response = app.oneshot(logout_request(&login.token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        for body in [
            r#"{"username":"alice","password":"nope"}"#,
            r#"{"username":"bob","password":"pw"}"#,
        ] {
            let response = app().oneshot(login_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{body}");
        }
    }

    #[tokio::test]
    async fn test_login_missing_fields_is_bad_request() {
        for body in [r#"{"username":"alice"}"#, r#"{}"#, "not json"] {
            let response = app().oneshot(login_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        }
    }
}
