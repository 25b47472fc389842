//! Integration tests for the Redis revocation store.
//!
//! Tests use testcontainers to spin up a real Redis instance and are ignored
//! by default. Run them with `cargo test -p learnhub-auth-redis -- --ignored`.

use std::time::Duration;

use learnhub_auth::storage::RevokedTokenStorage;
use learnhub_auth_redis::{RedisConfig, RedisRevokedTokenStorage};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::redis::Redis;
use tokio::sync::OnceCell;

static SHARED_REDIS: OnceCell<(ContainerAsync<Redis>, String)> = OnceCell::const_new();

async fn redis_url() -> String {
    let (_, url) = SHARED_REDIS
        .get_or_init(|| async {
            let container = Redis::default()
                .start()
                .await
                .expect("start redis container");
            let host_port = container.get_host_port_ipv4(6379).await.expect("get port");
            (container, format!("redis://127.0.0.1:{host_port}"))
        })
        .await;
    url.clone()
}

async fn storage() -> RedisRevokedTokenStorage {
    let config = RedisConfig {
        enabled: true,
        url: redis_url().await,
        ..RedisConfig::default()
    };
    RedisRevokedTokenStorage::connect(&config)
        .await
        .expect("connect to redis")
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_revoke_and_check() {
    let store = storage().await;

    assert!(!store.is_revoked("token-a").await.unwrap());
    store
        .revoke("token-a", Duration::from_secs(60))
        .await
        .unwrap();
    assert!(store.is_revoked("token-a").await.unwrap());
    assert!(!store.is_revoked("token-b").await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_revocation_visible_across_instances() {
    let first = storage().await;
    let second = storage().await;

    first
        .revoke("shared-token", Duration::from_secs(60))
        .await
        .unwrap();
    assert!(second.is_revoked("shared-token").await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_entry_expires_with_ttl() {
    let store = storage().await;

    store
        .revoke("short-lived", Duration::from_secs(1))
        .await
        .unwrap();
    assert!(store.is_revoked("short-lived").await.unwrap());

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert!(!store.is_revoked("short-lived").await.unwrap());
    assert_eq!(store.cleanup_expired().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unreachable_redis_fails_to_connect() {
    let config = RedisConfig {
        enabled: true,
        url: "redis://127.0.0.1:1".to_string(),
        timeout_ms: 200,
        ..RedisConfig::default()
    };
    assert!(RedisRevokedTokenStorage::connect(&config).await.is_err());
}
