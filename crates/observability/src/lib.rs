//! Tracing/logging setup shared by stockflow binaries.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}

/// Initialize with human-readable output instead of JSON (interactive use).
pub fn init_pretty() {
    tracing::init(LogFormat::Pretty);
}

/// Output format of the log subscriber.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Tracing configuration (filters, layers).
pub mod tracing;
