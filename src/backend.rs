use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::env::{env_or, LOG_FACADE_BACKEND_ENV};
use crate::logger::LoggerFactory;
use crate::nop::NopLoggerFactory;
use crate::wrapper::LoggerWrapper;

/// Backend selected when `LOG_FACADE_BACKEND` is not set.
pub const DEFAULT_BACKEND: &str = "tracing";

/// Process-wide factory, bound from the environment on first use.
static FACTORY: Lazy<Arc<dyn LoggerFactory>> = Lazy::new(bind_from_env);

/// Supported backend kinds that can be selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Drop everything.
    Nop,
    /// Forward to the `tracing` ecosystem.
    Tracing,
}

/// Backend selection, as read from configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Selected backend implementation.
    pub kind: BackendKind,
    /// Raw name that was used to construct this config.
    pub raw: String,
}

impl BackendConfig {
    pub fn new(kind: BackendKind, raw: impl Into<String>) -> Self {
        BackendConfig { kind, raw: raw.into() }
    }

    /// Read the backend name from `LOG_FACADE_BACKEND`, defaulting to
    /// [`DEFAULT_BACKEND`].
    pub fn from_env() -> Result<Self, BindError> {
        parse_backend(&env_or(LOG_FACADE_BACKEND_ENV, DEFAULT_BACKEND))
    }
}

/// Parse a backend name. Case and surrounding whitespace are ignored.
///
/// Examples:
/// - "tracing"
/// - "nop" (also "none", "off")
pub fn parse_backend(name: &str) -> Result<BackendConfig, BindError> {
    let lower = name.trim().to_ascii_lowercase();

    match lower.as_str() {
        "tracing" => Ok(BackendConfig::new(BackendKind::Tracing, name)),
        "nop" | "none" | "off" => Ok(BackendConfig::new(BackendKind::Nop, name)),
        _ => Err(BindError::UnknownBackend(name.to_string())),
    }
}

/// Error type returned when reading the backend selection.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("unknown or unsupported logging backend: {0:?}")]
    UnknownBackend(String),
}

/// Error type returned when building a logger factory from configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendBuildError {
    #[error("tracing-backend feature is not enabled")]
    TracingFeatureDisabled,
}

/// Create the [`LoggerFactory`] a [`BackendConfig`] names.
///
/// **Errors**
/// - [`BackendBuildError::TracingFeatureDisabled`] if the tracing backend
///   was compiled out.
pub fn make_factory_from_config(
    cfg: &BackendConfig,
) -> Result<Arc<dyn LoggerFactory>, BackendBuildError> {
    match cfg.kind {
        BackendKind::Nop => Ok(Arc::new(NopLoggerFactory) as Arc<dyn LoggerFactory>),
        BackendKind::Tracing => {
            #[cfg(feature = "tracing-backend")]
            {
                use crate::tracing_backend::TracingLoggerFactory;

                Ok(Arc::new(TracingLoggerFactory) as Arc<dyn LoggerFactory>)
            }

            #[cfg(not(feature = "tracing-backend"))]
            {
                Err(BackendBuildError::TracingFeatureDisabled)
            }
        }
    }
}

/// Select a factory from the environment.
///
/// Never fails; see [`bind`].
pub fn bind_from_env() -> Arc<dyn LoggerFactory> {
    bind(&env_or(LOG_FACADE_BACKEND_ENV, DEFAULT_BACKEND))
}

/// Select the factory for a backend `name`.
///
/// Never fails: an unknown or unavailable backend is reported through
/// `tracing::warn!` and the NOP factory is bound instead, so the facade
/// keeps working with logging switched off.
pub fn bind(name: &str) -> Arc<dyn LoggerFactory> {
    let built = parse_backend(name)
        .map_err(|e| e.to_string())
        .and_then(|cfg| make_factory_from_config(&cfg).map_err(|e| e.to_string()));

    match built {
        Ok(factory) => factory,
        Err(reason) => {
            tracing::warn!(%reason, "unable to bind logging backend, falling back to NOP");
            Arc::new(NopLoggerFactory)
        }
    }
}

/// The process-wide bound factory.
pub fn factory() -> &'static Arc<dyn LoggerFactory> {
    &FACTORY
}

/// Look up `name` in the process-wide factory and wrap it.
pub fn get_logger(name: &str) -> LoggerWrapper {
    LoggerWrapper::new(FACTORY.logger(name))
}

/// Like [`get_logger`], for facades layered on top of the wrapper that
/// report themselves as the caller boundary.
pub fn get_logger_with_caller(name: &str, caller: &'static str) -> LoggerWrapper {
    LoggerWrapper::with_caller(FACTORY.logger(name), caller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use tracing_test::traced_test;

    #[test]
    fn parses_known_backends() {
        assert_eq!(parse_backend("tracing").unwrap().kind, BackendKind::Tracing);
        assert_eq!(parse_backend(" NOP ").unwrap().kind, BackendKind::Nop);
        assert_eq!(parse_backend("off").unwrap().kind, BackendKind::Nop);
        assert_eq!(
            parse_backend("log4j").unwrap_err(),
            BindError::UnknownBackend("log4j".to_string())
        );
    }

    #[test]
    fn nop_config_builds_a_silent_factory() {
        let factory = make_factory_from_config(&BackendConfig::new(BackendKind::Nop, "nop")).unwrap();
        let logger = factory.logger("app");
        assert!(Level::ALL.iter().all(|level| !logger.is_enabled(*level)));
    }

    #[cfg(feature = "tracing-backend")]
    #[test]
    fn tracing_config_builds_tracing_loggers() {
        let factory =
            make_factory_from_config(&BackendConfig::new(BackendKind::Tracing, "tracing")).unwrap();
        assert_eq!(factory.logger("app").name(), "app");
    }

    #[test]
    #[traced_test]
    fn unknown_backend_falls_back_to_nop() {
        let factory = bind("carrier-pigeon");

        assert_eq!(factory.logger("app").name(), "NOP");
        assert!(logs_contain("falling back to NOP"));
        assert!(logs_contain("carrier-pigeon"));
    }

    #[test]
    #[traced_test]
    fn known_backend_binds_without_warning() {
        let factory = bind("nop");
        assert_eq!(factory.logger("app").name(), "NOP");
        assert!(!logs_contain("falling back to NOP"));
    }
}
