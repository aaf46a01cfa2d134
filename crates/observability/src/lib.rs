//! Tracing setup shared by binaries and integration tests.

/// Initialize process-wide tracing with the format chosen by `USERDESK_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Subscriber configuration (filters, output format).
pub mod tracing;
