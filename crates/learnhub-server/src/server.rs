use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
};
use learnhub_auth::{
    Argon2Hasher, AuthState, CredentialHasher, InMemoryRevokedTokenStorage, RevokedTokenStorage,
    login_handler, logout_handler,
};
use learnhub_auth_redis::RedisRevokedTokenStorage;
use tokio::task::JoinHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers;
use crate::metadata::{MetadataFetcher, OEmbedClient};
use crate::repository::{
    ContentRepository, InMemoryContentRepository, InMemoryUserRepository, RepositoryUserStorage,
    UserRepository,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub users: Arc<dyn UserRepository>,
    pub contents: Arc<dyn ContentRepository>,
    pub metadata: Arc<dyn MetadataFetcher>,
    pub hasher: Arc<dyn CredentialHasher>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Everything needed to assemble [`AppState`].
pub struct StateParts {
    pub users: Arc<dyn UserRepository>,
    pub contents: Arc<dyn ContentRepository>,
    pub revoked_tokens: Arc<dyn RevokedTokenStorage>,
    pub metadata: Arc<dyn MetadataFetcher>,
    pub hasher: Arc<dyn CredentialHasher>,
}

impl AppState {
    /// Wires auth around the given repositories and stores.
    pub fn new(cfg: &AppConfig, parts: StateParts) -> Self {
        let auth = AuthState::from_config(
            &cfg.auth,
            Arc::new(RepositoryUserStorage::new(parts.users.clone())),
            parts.hasher.clone(),
            parts.revoked_tokens,
        );

        Self {
            auth,
            users: parts.users,
            contents: parts.contents,
            metadata: parts.metadata,
            hasher: parts.hasher,
        }
    }
}

pub fn build_router(cfg: &AppConfig, state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        // User API
        .route("/user/register", post(handlers::register))
        .route("/user/login", post(login_handler))
        .route("/user/logout", get(logout_handler))
        // Content API
        .route(
            "/content",
            get(handlers::list_contents).post(handlers::create_content),
        )
        .route(
            "/content/{id}",
            get(handlers::get_content)
                .patch(handlers::update_content)
                .delete(handlers::delete_content),
        )
        .layer(DefaultBodyLimit::max(cfg.server.body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Picks the revocation backend.
///
/// With Redis enabled, a connection failure is fatal: a process-local store
/// would let tokens revoked on other instances keep working here.
pub async fn revocation_store(
    cfg: &AppConfig,
) -> anyhow::Result<(Arc<dyn RevokedTokenStorage>, Option<Arc<InMemoryRevokedTokenStorage>>)> {
    if cfg.redis.enabled {
        let store: Arc<dyn RevokedTokenStorage> =
            Arc::new(RedisRevokedTokenStorage::connect(&cfg.redis).await?);
        return Ok((store, None));
    }

    tracing::warn!("Redis disabled, revocations are only visible to this process");
    let local = Arc::new(InMemoryRevokedTokenStorage::new());
    let store: Arc<dyn RevokedTokenStorage> = local.clone();
    Ok((store, Some(local)))
}

/// Periodically drops revocation records whose tokens have expired.
pub fn spawn_revocation_cleanup(
    store: Arc<dyn RevokedTokenStorage>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match store.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Expired revocation records removed"),
                Err(e) => tracing::warn!(error = %e, "Revocation cleanup failed"),
            }
        }
    })
}

pub struct LearnhubServer {
    addr: SocketAddr,
    app: Router,
    cleanup: Option<JoinHandle<()>>,
}

impl LearnhubServer {
    /// Builds the production wiring for `cfg`.
    pub async fn build(cfg: &AppConfig) -> anyhow::Result<Self> {
        let addr: SocketAddr = cfg.addr().parse()?;

        if cfg.auth.uses_default_secret() {
            tracing::warn!("auth.jwt_secret is not set, using the built-in development secret");
        }

        let (revoked_tokens, local_store) = revocation_store(cfg).await?;
        let cleanup = local_store.map(|store| {
            spawn_revocation_cleanup(store, cfg.revocation.cleanup_interval)
        });

        let state = AppState::new(
            cfg,
            StateParts {
                users: Arc::new(InMemoryUserRepository::new()),
                contents: Arc::new(InMemoryContentRepository::new()),
                revoked_tokens,
                metadata: Arc::new(OEmbedClient::from_config(&cfg.metadata)?),
                hasher: Arc::new(Argon2Hasher),
            },
        );

        Ok(Self {
            addr,
            app: build_router(cfg, state),
            cleanup,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        if let Some(cleanup) = self.cleanup {
            cleanup.abort();
        }
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cleanup_task_sweeps_expired_records() {
        let store = Arc::new(InMemoryRevokedTokenStorage::new());
        store.revoke("old", Duration::ZERO).await.unwrap();
        store
            .revoke("live", Duration::from_secs(3600))
            .await
            .unwrap();

        let handle = spawn_revocation_cleanup(store.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert_eq!(store.len(), 1);
        assert!(store.is_revoked("live").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_when_redis_disabled() {
        let (_, local) = revocation_store(&AppConfig::default()).await.unwrap();
        assert!(local.is_some());
    }
}
