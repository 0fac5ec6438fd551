//! Tracing/logging (shared setup).

/// Initialize process-wide tracing with JSON output at `info`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json, "info");
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use tracing::LogFormat;
