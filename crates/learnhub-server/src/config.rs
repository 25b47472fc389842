use std::time::Duration;

use learnhub_auth::AuthConfig;
use learnhub_auth_redis::RedisConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub revocation: RevocationConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
}

impl AppConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        self.auth.validate().map_err(|e| e.to_string())?;
        if self.redis.enabled && self.redis.url.trim().is_empty() {
            return Err("redis.enabled=true requires redis.url".into());
        }
        if self.revocation.cleanup_interval.is_zero() {
            return Err("revocation.cleanup_interval must be > 0".into());
        }
        if self.metadata.timeout.is_zero() {
            return Err("metadata.timeout must be > 0".into());
        }
        url::Url::parse(&self.metadata.oembed_endpoint)
            .map_err(|e| format!("metadata.oembed_endpoint is not a valid URL: {e}"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8000
}
fn default_body_limit() -> usize {
    64 * 1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

/// Housekeeping for the process-local revocation store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RevocationConfig {
    /// How often expired revocation records are swept.
    #[serde(default = "default_cleanup_interval", with = "humantime_serde")]
    pub cleanup_interval: Duration,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: default_cleanup_interval(),
        }
    }
}

fn default_cleanup_interval() -> Duration {
    Duration::from_secs(300)
}

/// oEmbed lookup for posted videos.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    #[serde(default = "default_oembed_endpoint")]
    pub oembed_endpoint: String,
    #[serde(default = "default_metadata_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            oembed_endpoint: default_oembed_endpoint(),
            timeout: default_metadata_timeout(),
        }
    }
}

fn default_oembed_endpoint() -> String {
    "https://www.youtube.com/oembed".into()
}
fn default_metadata_timeout() -> Duration {
    Duration::from_secs(5)
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
    use std::path::PathBuf;

    /// Default configuration file looked up in the working directory.
    pub const DEFAULT_CONFIG_PATH: &str = "learnhub.toml";

    /// Variables honoured outside the `LEARNHUB__` namespace.
    #[derive(Debug, Clone, Default)]
    pub struct CompatEnv {
        /// `JWT_SECRET`
        pub jwt_secret: Option<String>,
        /// `PORT`
        pub port: Option<String>,
    }

    impl CompatEnv {
        pub fn from_env() -> Self {
            Self {
                jwt_secret: std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
                port: std::env::var("PORT").ok().filter(|s| !s.is_empty()),
            }
        }
    }

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        load_config_with(path, CompatEnv::from_env())
    }

    /// Layers file, `LEARNHUB__SECTION__KEY` variables and `compat`, in
    /// increasing priority, then validates the result.
    pub fn load_config_with(path: Option<&str>, compat: CompatEnv) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_PATH));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., LEARNHUB__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("LEARNHUB")
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__"),
        );
        builder = apply_compat(builder, compat).map_err(|e| format!("config override error: {e}"))?;

        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }

    fn apply_compat(
        builder: ConfigBuilder<DefaultState>,
        compat: CompatEnv,
    ) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        builder
            .set_override_option("auth.jwt_secret", compat.jwt_secret)?
            .set_override_option("server.port", compat.port)
    }
}
