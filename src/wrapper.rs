//! Capability-aware dispatch from the facade to a bound backend.
//!
//! A [`LoggerWrapper`] probes its backend once, when it is built, for the
//! richest protocol it speaks (see [`Capability`]) and routes every call
//! through that protocol from then on:
//!
//! - message-aware backends get the payload untouched, as a [`Message`];
//! - location-aware backends get final text plus the caller boundary;
//! - marker-aware and plain backends get their own per-level calls with the
//!   raw arguments, so they do their own formatting. Their output points at
//!   the wrapper rather than at the original caller.
//!
//! Every call first asks the backend whether its level is enabled and
//! returns straight away if not, before any formatting happens. Backend
//! errors come back to the caller unchanged.

use crate::error::BackendError;
use crate::formatter;
use crate::level::Level;
use crate::logger::{LocationAwareLogger, Logger, MarkerAwareLogger, MessageAwareLogger};
use crate::marker::Marker;
use crate::message::{Message, Param, ParameterizedMessage, SimpleMessage, StructuredMessage};
use crate::record::{RenderMode, StructuredRecord};
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// The richest protocol a bound backend speaks, least capable first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Plain,
    MarkerAware,
    LocationAware,
    MessageAware,
}

impl Capability {
    /// Probe `logger`, richest protocol first. A backend that advertises
    /// nothing is [`Capability::Plain`]; detection never fails.
    pub fn detect(logger: &dyn Logger) -> Capability {
        if logger.as_message_aware().is_some() {
            Capability::MessageAware
        } else if logger.as_location_aware().is_some() {
            Capability::LocationAware
        } else if logger.as_marker_aware().is_some() {
            Capability::MarkerAware
        } else {
            Capability::Plain
        }
    }
}

enum Route<'a> {
    Message(&'a dyn MessageAwareLogger),
    Location(&'a dyn LocationAwareLogger),
    Marker(&'a dyn MarkerAwareLogger),
    Plain(&'a dyn Logger),
}

/// The facade handed to application code.
///
/// Holds the shared backend, the capability detected for it and the caller
/// boundary, and nothing else: wrappers built independently around the same
/// kind of backend behave identically, so factories are free not to cache
/// them. A wrapper is as thread-safe as its backend.
#[derive(Clone)]
pub struct LoggerWrapper {
    logger: Arc<dyn Logger>,
    caller: Cow<'static, str>,
    capability: Capability,
}

impl LoggerWrapper {
    /// Wrap `logger`, using the wrapper itself as the caller boundary.
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self::with_caller(logger, std::any::type_name::<LoggerWrapper>())
    }

    /// Wrap `logger` on behalf of a higher-level facade named `caller`.
    pub fn with_caller(logger: Arc<dyn Logger>, caller: impl Into<Cow<'static, str>>) -> Self {
        let capability = Capability::detect(&*logger);
        tracing::debug!(
            logger = logger.name(),
            capability = ?capability,
            "bound backend logger"
        );
        LoggerWrapper {
            logger,
            caller: caller.into(),
            capability,
        }
    }

    pub fn name(&self) -> &str {
        self.logger.name()
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn caller(&self) -> &str {
        &self.caller
    }

    pub fn backend(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.logger.is_enabled(level)
    }

    pub fn is_enabled_for(&self, level: Level, marker: &Marker) -> bool {
        self.logger.is_enabled_for(level, marker)
    }

    /// Log finished text.
    pub fn dispatch(
        &self,
        level: Level,
        marker: Option<&Marker>,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        self.route_text(&self.caller, level, marker, msg, error)
    }

    /// Log a `{}` template with positional arguments.
    ///
    /// The template is only formatted here when the backend is
    /// location-aware; message-aware backends get a lazily formatted
    /// [`ParameterizedMessage`] and the rest format for themselves.
    pub fn dispatch_format(
        &self,
        level: Level,
        marker: Option<&Marker>,
        template: &str,
        args: &[Param],
    ) -> Result<(), BackendError> {
        self.route_format(&self.caller, level, marker, template, args)
    }

    /// Log any [`Message`]. `error` defaults to the message's own error
    /// context.
    pub fn dispatch_message(
        &self,
        level: Level,
        marker: Option<&Marker>,
        message: &dyn Message,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        self.route_message(&self.caller, level, marker, message, error)
    }

    /// Log a structured record.
    ///
    /// Backends that cannot take the record natively receive its rendering
    /// in `mode`, which is the empty string when the record lacks a type
    /// (full mode), an id or parameters.
    pub fn dispatch_structured(
        &self,
        level: Level,
        marker: Option<&Marker>,
        record: &StructuredRecord,
        mode: RenderMode,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        let message = StructuredMessage::new(record, mode, None);
        self.route_message(&self.caller, level, marker, &message, error)
    }

    fn route(&self) -> Route<'_> {
        let logger = &*self.logger;
        let route = match self.capability {
            Capability::MessageAware => logger.as_message_aware().map(Route::Message),
            Capability::LocationAware => logger.as_location_aware().map(Route::Location),
            Capability::MarkerAware => logger.as_marker_aware().map(Route::Marker),
            Capability::Plain => None,
        };
        route.unwrap_or(Route::Plain(logger))
    }

    fn route_text(
        &self,
        caller: &str,
        level: Level,
        marker: Option<&Marker>,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        if !self.logger.is_enabled(level) {
            return Ok(());
        }
        match self.route() {
            Route::Message(logger) => {
                logger.log_message(marker, caller, level, &SimpleMessage::new(msg), error)
            }
            Route::Location(logger) => logger.log_at(marker, caller, level, msg, error),
            Route::Marker(logger) => logger.log_marked(level, marker, msg, error),
            Route::Plain(logger) => logger.log(level, msg, error),
        }
    }

    fn route_format(
        &self,
        caller: &str,
        level: Level,
        marker: Option<&Marker>,
        template: &str,
        args: &[Param],
    ) -> Result<(), BackendError> {
        if !self.logger.is_enabled(level) {
            return Ok(());
        }
        match self.route() {
            Route::Message(logger) => {
                let message = ParameterizedMessage::new(template, args);
                logger.log_message(marker, caller, level, &message, message.throwable())
            }
            Route::Location(logger) => {
                let formatted = formatter::format(template, args);
                logger.log_at(marker, caller, level, &formatted.text, formatted.error)
            }
            Route::Marker(logger) => logger.log_format_marked(level, marker, template, args),
            Route::Plain(logger) => logger.log_format(level, template, args),
        }
    }

    fn route_message(
        &self,
        caller: &str,
        level: Level,
        marker: Option<&Marker>,
        message: &dyn Message,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        if !self.logger.is_enabled(level) {
            return Ok(());
        }
        let error = error.or_else(|| message.throwable());
        match self.route() {
            Route::Message(logger) => logger.log_message(marker, caller, level, message, error),
            Route::Location(logger) => {
                logger.log_at(marker, caller, level, &message.formatted_text(), error)
            }
            Route::Marker(logger) => {
                logger.log_marked(level, marker, &message.formatted_text(), error)
            }
            Route::Plain(logger) => logger.log(level, &message.formatted_text(), error),
        }
    }
}

/// Per-level shorthands, one row per level:
/// `level => is_enabled, msg, msg+error (`*_err`), marker+msg, format, marker+format, message, record`.
macro_rules! level_methods {
    ($($level:expr => $enabled:ident, $plain:ident, $error:ident, $marked:ident, $format:ident,
        $marked_format:ident, $message:ident, $structured:ident;)+) => {
        impl LoggerWrapper {
            $(
                pub fn $enabled(&self) -> bool {
                    self.is_enabled($level)
                }

                pub fn $plain(&self, msg: &str) -> Result<(), BackendError> {
                    self.dispatch($level, None, msg, None)
                }

                pub fn $error(
                    &self,
                    msg: &str,
                    error: &(dyn Error + 'static),
                ) -> Result<(), BackendError> {
                    self.dispatch($level, None, msg, Some(error))
                }

                pub fn $marked(&self, marker: &Marker, msg: &str) -> Result<(), BackendError> {
                    self.dispatch($level, Some(marker), msg, None)
                }

                pub fn $format(&self, template: &str, args: &[Param]) -> Result<(), BackendError> {
                    self.dispatch_format($level, None, template, args)
                }

                pub fn $marked_format(
                    &self,
                    marker: &Marker,
                    template: &str,
                    args: &[Param],
                ) -> Result<(), BackendError> {
                    self.dispatch_format($level, Some(marker), template, args)
                }

                pub fn $message(&self, message: &dyn Message) -> Result<(), BackendError> {
                    self.dispatch_message($level, None, message, None)
                }

                pub fn $structured(&self, record: &StructuredRecord) -> Result<(), BackendError> {
                    self.dispatch_structured($level, None, record, RenderMode::Full, None)
                }
            )+
        }
    };
}

level_methods! {
    Level::Trace => is_trace_enabled, trace, trace_err, trace_marked, trace_format,
        trace_marked_format, trace_message, trace_structured;
    Level::Debug => is_debug_enabled, debug, debug_err, debug_marked, debug_format,
        debug_marked_format, debug_message, debug_structured;
    Level::Info => is_info_enabled, info, info_err, info_marked, info_format,
        info_marked_format, info_message, info_structured;
    Level::Warn => is_warn_enabled, warn, warn_err, warn_marked, warn_format,
        warn_marked_format, warn_message, warn_structured;
    Level::Error => is_error_enabled, error, error_err, error_marked, error_format,
        error_marked_format, error_message, error_structured;
}

impl fmt::Debug for LoggerWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerWrapper")
            .field("name", &self.logger.name())
            .field("caller", &self.caller)
            .field("capability", &self.capability)
            .finish()
    }
}

// A wrapper speaks every protocol itself, so it can be bound as the backend
// of another facade. Calls that name their own caller boundary keep it.

impl Logger for LoggerWrapper {
    fn name(&self) -> &str {
        self.logger.name()
    }

    fn is_enabled(&self, level: Level) -> bool {
        self.logger.is_enabled(level)
    }

    fn is_enabled_for(&self, level: Level, marker: &Marker) -> bool {
        self.logger.is_enabled_for(level, marker)
    }

    fn log(
        &self,
        level: Level,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        self.dispatch(level, None, msg, error)
    }

    fn log_format(&self, level: Level, template: &str, args: &[Param]) -> Result<(), BackendError> {
        self.dispatch_format(level, None, template, args)
    }

    fn as_marker_aware(&self) -> Option<&dyn MarkerAwareLogger> {
        Some(self)
    }

    fn as_location_aware(&self) -> Option<&dyn LocationAwareLogger> {
        Some(self)
    }

    fn as_message_aware(&self) -> Option<&dyn MessageAwareLogger> {
        Some(self)
    }
}

impl MarkerAwareLogger for LoggerWrapper {
    fn log_marked(
        &self,
        level: Level,
        marker: Option<&Marker>,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        self.dispatch(level, marker, msg, error)
    }

    fn log_format_marked(
        &self,
        level: Level,
        marker: Option<&Marker>,
        template: &str,
        args: &[Param],
    ) -> Result<(), BackendError> {
        self.dispatch_format(level, marker, template, args)
    }
}

impl LocationAwareLogger for LoggerWrapper {
    fn log_at(
        &self,
        marker: Option<&Marker>,
        caller: &str,
        level: Level,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        self.route_text(caller, level, marker, msg, error)
    }
}

impl MessageAwareLogger for LoggerWrapper {
    fn log_message(
        &self,
        marker: Option<&Marker>,
        caller: &str,
        level: Level,
        message: &dyn Message,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        self.route_message(caller, level, marker, message, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nop::NopLogger;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    /// Plain backend keeping every line it is handed.
    #[derive(Default)]
    struct Lines {
        lines: Mutex<Vec<String>>,
    }

    impl Logger for Lines {
        fn name(&self) -> &str {
            "lines"
        }

        fn is_enabled(&self, level: Level) -> bool {
            level >= Level::Info
        }

        fn log(
            &self,
            level: Level,
            msg: &str,
            _error: Option<&(dyn Error + 'static)>,
        ) -> Result<(), BackendError> {
            self.lines.lock().unwrap().push(format!("{} {}", level, msg));
            Ok(())
        }
    }

    #[test]
    fn unclassified_backend_is_plain() {
        let wrapper = LoggerWrapper::new(Arc::new(Lines::default()));
        assert_eq!(wrapper.capability(), Capability::Plain);
        assert_eq!(wrapper.caller(), std::any::type_name::<LoggerWrapper>());
        assert_eq!(wrapper.name(), "lines");
    }

    #[test]
    fn nop_is_plain() {
        let wrapper = LoggerWrapper::new(Arc::new(NopLogger));
        assert_eq!(wrapper.capability(), Capability::Plain);
        assert!(!wrapper.is_error_enabled());
        assert!(wrapper.error("dropped").is_ok());
    }

    #[test]
    fn plain_backend_formats_for_itself() {
        let backend = Arc::new(Lines::default());
        let wrapper = LoggerWrapper::new(backend.clone());
        wrapper.info_format("{} + {}", &[Param::value(1), Param::value(2)]).unwrap();
        wrapper.debug("filtered").unwrap();
        wrapper.warn_marked(&Marker::new("M"), "marker dropped").unwrap();
        assert_eq!(
            *backend.lines.lock().unwrap(),
            vec!["INFO 1 + 2".to_string(), "WARN marker dropped".to_string()]
        );
    }

    #[test]
    fn nested_wrapper_is_message_aware_and_keeps_caller() {
        let backend = Arc::new(Lines::default());
        let inner = Arc::new(LoggerWrapper::new(backend.clone()));
        let outer = LoggerWrapper::with_caller(inner, "my::Facade");
        assert_eq!(outer.capability(), Capability::MessageAware);
        assert_eq!(outer.caller(), "my::Facade");

        outer.error("through two wrappers").unwrap();
        assert_eq!(
            *backend.lines.lock().unwrap(),
            vec!["ERROR through two wrappers".to_string()]
        );
    }

    #[test]
    fn capability_ordering() {
        assert!(Capability::Plain < Capability::MarkerAware);
        assert!(Capability::LocationAware < Capability::MessageAware);
    }

    #[test]
    #[traced_test]
    fn construction_logs_detected_capability() {
        let _wrapper = LoggerWrapper::new(Arc::new(Lines::default()));
        assert!(logs_contain("bound backend logger"));
        assert!(logs_contain("Plain"));
    }
}
