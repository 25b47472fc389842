//! Session token issuance and verification.
//!
//! This module provides:
//!
//! - JWT encoding and decoding (HS512)
//! - Stateless token issuance
//! - Token verification including the revocation check

pub mod issuer;
pub mod jwt;
pub mod verifier;

pub use issuer::{IssuedToken, TokenIssuer};
pub use jwt::{
    JwtError, JwtService, SessionClaims, TOKEN_AUDIENCE, TOKEN_ISSUER, TOKEN_LIFETIME,
    TOKEN_SUBJECT,
};
pub use verifier::TokenVerifier;
