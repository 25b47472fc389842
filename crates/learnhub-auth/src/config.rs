//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Signing secret used when none is configured.
///
/// Anyone who reads this source can mint valid tokens with it. It exists so a
/// local checkout runs without setup and is refused when `production` is set.
pub const DEFAULT_SIGNING_SECRET: &str = "learnhub-api-secrets";

/// Authentication configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// jwt_secret = "change-me"
/// production = true
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for signing and verifying session tokens.
    pub jwt_secret: String,

    /// Refuse to start with the built-in fallback secret.
    pub production: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_SIGNING_SECRET.to_string(),
            production: false,
        }
    }
}

impl AuthConfig {
    /// Creates a configuration with an explicit secret.
    #[must_use]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if the built-in fallback secret is in use.
    #[must_use]
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_SIGNING_SECRET
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty, or if the fallback secret is
    /// used while `production` is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.production && self.uses_default_secret() {
            return Err(ConfigError::DefaultSecretInProduction);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The signing secret is empty.
    #[error("auth.jwt_secret must not be empty")]
    EmptySecret,

    /// The fallback secret is configured in production.
    #[error("auth.jwt_secret must be set explicitly when auth.production is enabled")]
    DefaultSecretInProduction,
}
