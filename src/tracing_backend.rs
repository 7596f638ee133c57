use crate::error::BackendError;
use crate::level::Level;
use crate::logger::{
    LocationAwareLogger, Logger, LoggerFactory, MarkerAwareLogger, MessageAwareLogger,
};
use crate::marker::Marker;
use crate::message::Message;
use crate::record::RenderMode;
use std::error::Error;
use std::sync::Arc;

/// Emit one `tracing` event at a runtime [`Level`].
///
/// `tracing` wants its level at compile time, hence the match.
macro_rules! emit {
    ($level:expr, $($fields:tt)+) => {
        match $level {
            Level::Trace => tracing::event!(tracing::Level::TRACE, $($fields)+),
            Level::Debug => tracing::event!(tracing::Level::DEBUG, $($fields)+),
            Level::Info => tracing::event!(tracing::Level::INFO, $($fields)+),
            Level::Warn => tracing::event!(tracing::Level::WARN, $($fields)+),
            Level::Error => tracing::event!(tracing::Level::ERROR, $($fields)+),
        }
    };
}

/// Message-aware backend forwarding every call to the `tracing` ecosystem.
///
/// Each log call becomes one event carrying these fields:
/// - `logger`: the name the backend was bound under;
/// - `marker`: the marker name, when there is one;
/// - `caller`: the caller boundary, for location-aware calls;
/// - `error`: the error's display text, when there is one;
/// - `structured`: the record in data-only form, completed with the
///   message's default id, for structured messages. The full rendering is
///   already the event's text.
///
/// Whether a level is enabled is whatever the installed subscriber says.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    name: String,
}

impl TracingLogger {
    pub fn new(name: impl Into<String>) -> Self {
        TracingLogger { name: name.into() }
    }

    fn emit(
        &self,
        level: Level,
        marker: Option<&Marker>,
        caller: Option<&str>,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
        structured: Option<&str>,
    ) {
        let marker = marker.map(Marker::name);
        let error = error.map(|e| e.to_string());
        let error = error.as_deref();
        emit!(
            level,
            logger = self.name.as_str(),
            marker,
            caller,
            error,
            structured,
            "{}",
            msg
        );
    }
}

impl Logger for TracingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: Level) -> bool {
        match level {
            Level::Trace => tracing::enabled!(tracing::Level::TRACE),
            Level::Debug => tracing::enabled!(tracing::Level::DEBUG),
            Level::Info => tracing::enabled!(tracing::Level::INFO),
            Level::Warn => tracing::enabled!(tracing::Level::WARN),
            Level::Error => tracing::enabled!(tracing::Level::ERROR),
        }
    }

    fn log(
        &self,
        level: Level,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        self.emit(level, None, None, msg, error, None);
        Ok(())
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

impl MarkerAwareLogger for TracingLogger {
    fn log_marked(
        &self,
        level: Level,
        marker: Option<&Marker>,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        self.emit(level, marker, None, msg, error, None);
        Ok(())
    }
}

impl LocationAwareLogger for TracingLogger {
    fn log_at(
        &self,
        marker: Option<&Marker>,
        caller: &str,
        level: Level,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        self.emit(level, marker, Some(caller), msg, error, None);
        Ok(())
    }
}

impl MessageAwareLogger for TracingLogger {
    fn log_message(
        &self,
        marker: Option<&Marker>,
        caller: &str,
        level: Level,
        message: &dyn Message,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        let structured = message
            .as_structured()
            .map(|record| record.render(RenderMode::DataOnly, message.default_id()));
        self.emit(
            level,
            marker,
            Some(caller),
            &message.formatted_text(),
            error,
            structured.as_deref(),
        );
        Ok(())
    }
}

/// Builds a [`TracingLogger`] per requested name.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLoggerFactory;

impl LoggerFactory for TracingLoggerFactory {
    fn logger(&self, name: &str) -> Arc<dyn Logger> {
        Arc::new(TracingLogger::new(name))
    }
}
