//! LearnHub API server.
//!
//! Users register and log in, then post videos with a rating and a comment.
//! Authentication, logout and the ownership guard come from `learnhub-auth`.

pub mod config;
pub mod handlers;
pub mod metadata;
pub mod observability;
pub mod repository;
pub mod server;

pub use config::AppConfig;
pub use observability::{apply_logging_level, init_tracing};
pub use server::{AppState, LearnhubServer, StateParts, build_router};
