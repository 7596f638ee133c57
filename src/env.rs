/// Environment variable names used by this crate to bind a backend and
/// configure the `tracing` subscriber without code changes.
///
/// These are purely helpers; the facade and backend types remain decoupled
/// from environment access.

/// Backend to bind: `tracing` (default) or `nop`.
pub const LOG_FACADE_BACKEND_ENV: &str = "LOG_FACADE_BACKEND";

/// Maximum level shown by [`crate::init::init_tracing`]: `trace`, `debug`,
/// `info` (default), `warn`, `error` or `off`.
pub const LOG_FACADE_LEVEL_ENV: &str = "LOG_FACADE_LEVEL";

/// Whether [`crate::init::init_tracing`] colours its output (`true`/`false`).
pub const LOG_FACADE_ANSI_ENV: &str = "LOG_FACADE_ANSI";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
