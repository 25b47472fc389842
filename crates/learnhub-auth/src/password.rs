//! Password hashing.
//!
//! The login flow depends on the [`CredentialHasher`] trait only. The default
//! implementation is [`Argon2Hasher`]: Argon2id with default parameters, a
//! random salt from `OsRng`, and PHC string output.
//!
//! # Example
//!
//! ```
//! use learnhub_auth::password::{Argon2Hasher, CredentialHasher};
//!
//! let hasher = Argon2Hasher;
//! let digest = hasher.hash("correct horse").unwrap();
//! assert!(digest.starts_with("$argon2id$"));
//! assert!(hasher.verify("correct horse", &digest));
//! assert!(!hasher.verify("battery staple", &digest));
//! ```

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::AuthResult;
use crate::error::AuthError;

/// One-way hashing and verification of passwords.
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plaintext password for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails.
    fn hash(&self, plaintext: &str) -> AuthResult<String>;

    /// Returns `true` if `plaintext` matches `digest`.
    ///
    /// A digest that cannot be parsed never matches.
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

/// Argon2id password hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password digest is not a valid PHC string");
                return false;
            }
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
