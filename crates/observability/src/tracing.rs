//! Tracing/logging initialization.
//!
//! The engine itself only emits `tracing` events (dispatch outcomes, replay
//! results, flagged events); hosts call this once at startup for structured
//! JSON logs.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process.
///
/// Filter defaults to `info` and is overridable via `RUST_LOG`. Safe to call
/// multiple times (subsequent calls are no-ops), so tests can call it freely.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .with_current_span(false)
        .try_init();
}
