use crate::env::{env_or, LOG_FACADE_ANSI_ENV, LOG_FACADE_LEVEL_ENV};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, Layer, Registry};

/// Configuration of the console subscriber installed by [`init_tracing`].
///
/// **Fields**
/// - `max_level`: most verbose level shown; anything finer is reported as
///   disabled to [`crate::tracing_backend::TracingLogger`], so the facade
///   skips formatting for it.
/// - `ansi`: colour the output.
/// - `with_target`: print the event target (module path).
#[derive(Clone, Debug)]
pub struct SubscriberConfig {
    pub max_level: LevelFilter,
    pub ansi: bool,
    pub with_target: bool,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            max_level: LevelFilter::INFO,
            ansi: true,
            with_target: true,
        }
    }
}

impl SubscriberConfig {
    /// Read `LOG_FACADE_LEVEL` and `LOG_FACADE_ANSI`. Unparseable values keep
    /// their defaults.
    pub fn from_env() -> Self {
        let defaults = SubscriberConfig::default();
        let max_level = env_or(LOG_FACADE_LEVEL_ENV, "info")
            .trim()
            .parse()
            .unwrap_or(defaults.max_level);
        let ansi = env_or(LOG_FACADE_ANSI_ENV, "true")
            .trim()
            .parse()
            .unwrap_or(defaults.ansi);
        SubscriberConfig {
            max_level,
            ansi,
            ..defaults
        }
    }
}

/// Install the global `tracing` subscriber described by `config`.
///
/// **Errors**
///
/// Returns the [`TryInitError`] if a global subscriber is already set;
/// the existing subscriber stays in place.
pub fn init_tracing_with_config(config: SubscriberConfig) -> Result<(), TryInitError> {
    let fmt_layer = fmt::layer()
        .with_ansi(config.ansi)
        .with_target(config.with_target)
        .with_filter(config.max_level);

    Registry::default().with(fmt_layer).try_init()
}

/// Initialize tracing from the environment.
///
/// Equivalent to calling [`init_tracing_with_config`] with
/// [`SubscriberConfig::from_env`]. This is the recommended entrypoint for
/// applications that use the `tracing` backend.
pub fn init_tracing() -> Result<(), TryInitError> {
    init_tracing_with_config(SubscriberConfig::from_env())
}
