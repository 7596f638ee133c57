use crate::error::BackendError;
use crate::formatter;
use crate::level::Level;
use crate::marker::Marker;
use crate::message::{Message, Param};
use std::error::Error;
use std::sync::Arc;

/// A concrete logging backend bound behind the facade.
///
/// This is the plain protocol every backend speaks: per-level "is enabled"
/// queries and per-level log calls taking a string and an optional error.
/// Richer protocols are advertised through the `as_*` probes; a backend that
/// implements [`MessageAwareLogger`] should answer
/// `fn as_message_aware(&self) -> Option<&dyn MessageAwareLogger> { Some(self) }`
/// and likewise for the other protocols it speaks.
///
/// Implementations must be safe to call from several threads at once if the
/// facade is shared between threads; the facade adds no locking of its own.
pub trait Logger: Send + Sync {
    /// Name the backend was bound under.
    fn name(&self) -> &str;

    /// Would a call at `level` be logged?
    fn is_enabled(&self, level: Level) -> bool;

    /// Would a call at `level` tagged with `marker` be logged?
    fn is_enabled_for(&self, level: Level, _marker: &Marker) -> bool {
        self.is_enabled(level)
    }

    /// Log a finished message.
    ///
    /// **Returns**
    /// - `Ok(())` if the backend accepted the message.
    /// - `Err(..)` if the backend failed; callers get this error unchanged.
    fn log(&self, level: Level, msg: &str, error: Option<&(dyn Error + 'static)>)
        -> Result<(), BackendError>;

    /// Log a `{}` template with its arguments, formatting it here.
    ///
    /// The default implementation substitutes the arguments and splits off a
    /// trailing error before handing the text to [`Logger::log`].
    fn log_format(&self, level: Level, template: &str, args: &[Param]) -> Result<(), BackendError> {
        let formatted = formatter::format(template, args);
        self.log(level, &formatted.text, formatted.error)
    }

    fn as_marker_aware(&self) -> Option<&dyn MarkerAwareLogger> {
        None
    }

    fn as_location_aware(&self) -> Option<&dyn LocationAwareLogger> {
        None
    }

    fn as_message_aware(&self) -> Option<&dyn MessageAwareLogger> {
        None
    }
}

/// A backend that understands markers on its log calls.
pub trait MarkerAwareLogger: Logger {
    fn log_marked(
        &self,
        level: Level,
        marker: Option<&Marker>,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError>;

    fn log_format_marked(
        &self,
        level: Level,
        marker: Option<&Marker>,
        template: &str,
        args: &[Param],
    ) -> Result<(), BackendError> {
        let formatted = formatter::format(template, args);
        self.log_marked(level, marker, &formatted.text, formatted.error)
    }
}

/// A backend that can attribute a call to the code that called the facade.
///
/// `caller` is the caller boundary: the name of the facade type the call
/// came through. Backends use it to skip the facade's own frames when they
/// work out where a log call came from.
pub trait LocationAwareLogger: Logger {
    fn log_at(
        &self,
        marker: Option<&Marker>,
        caller: &str,
        level: Level,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError>;
}

/// A location-aware backend that takes whole [`Message`]s, structured ones
/// included, without needing them flattened to text first.
pub trait MessageAwareLogger: LocationAwareLogger {
    fn log_message(
        &self,
        marker: Option<&Marker>,
        caller: &str,
        level: Level,
        message: &dyn Message,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError>;
}

/// Resolves a logger name to a backend instance.
///
/// Factories need not cache: the facade keeps no per-name state, so two
/// backends obtained for the same name behave the same.
pub trait LoggerFactory: Send + Sync {
    fn logger(&self, name: &str) -> Arc<dyn Logger>;
}

impl<F> LoggerFactory for F
where
    F: Fn(&str) -> Arc<dyn Logger> + Send + Sync,
{
    fn logger(&self, name: &str) -> Arc<dyn Logger> {
        self(name)
    }
}
