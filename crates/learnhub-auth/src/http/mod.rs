//! HTTP handlers for session endpoints.
//!
//! # Available Handlers
//!
//! - [`login`] - `POST /user/login`
//! - [`logout`] - `GET /user/logout`

pub mod login;
pub mod logout;

pub use login::{LoginRequest, LoginResponse, login_handler};
pub use logout::{LogoutResponse, logout_handler};
