//! Tracing/logging setup shared by every binary in the workspace.

/// Initialize process-wide tracing with the format selected by
/// `CLAIMGATE_LOG_FORMAT` (`json`, the default, or `pretty`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let format = std::env::var("CLAIMGATE_LOG_FORMAT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();
    tracing::init(format);
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::LogFormat;
