// Tracing setup. The level starts at `info` and is replaced by the configured
// one once the configuration has been loaded.
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

const STARTUP_LOG_LEVEL: &str = "info";

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

/// Installs the global subscriber. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init_tracing() {
    let (filter, handle) = reload::Layer::new(build_filter(STARTUP_LOG_LEVEL));
    let _ = LOG_RELOAD_HANDLE.set(handle);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}

/// Apply the configured level at runtime. `RUST_LOG`, when set, keeps
/// precedence over the configuration file.
pub fn apply_logging_level(level: &str) {
    if let Some(handle) = LOG_RELOAD_HANDLE.get() {
        let _ = handle.modify(|f| *f = build_filter(level));
    }
}

fn build_filter(level: &str) -> EnvFilter {
    match std::env::var_os("RUST_LOG") {
        Some(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        None => EnvFilter::new(level),
    }
}
