//! Loggable payloads.
//!
//! Every [`Message`] can be reduced to `(formatted text, template,
//! parameters)`. Message-aware backends receive the message itself and can
//! look deeper (for instance at the [`StructuredRecord`] behind a
//! [`StructuredMessage`]); every other backend only ever sees the formatted
//! text.

use crate::formatter;
use crate::id::StructuredDataId;
use crate::record::{RenderMode, StructuredRecord};
use once_cell::sync::OnceCell;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Something that can be logged.
pub trait Message {
    /// The final text of the message.
    fn formatted_text(&self) -> Cow<'_, str>;

    /// The format portion of the message.
    fn template(&self) -> &str;

    /// Positional parameters, if any.
    fn parameters(&self) -> &[Param] {
        &[]
    }

    /// Error context carried by the message itself.
    fn throwable(&self) -> Option<&(dyn Error + 'static)> {
        None
    }

    /// The structured record behind this message, for backends that can
    /// take structured payloads natively.
    fn as_structured(&self) -> Option<&StructuredRecord> {
        None
    }

    /// The id filling in whatever the structured record's own id lacks.
    fn default_id(&self) -> Option<&StructuredDataId> {
        None
    }
}

/// A positional argument of a parameterized log call.
///
/// Values are kept unformatted until a message actually needs its text.
#[derive(Clone)]
pub enum Param {
    Value(Arc<dyn fmt::Display + Send + Sync>),
    Error(Arc<dyn Error + Send + Sync>),
}

impl Param {
    pub fn value<T: fmt::Display + Send + Sync + 'static>(value: T) -> Self {
        Param::Value(Arc::new(value))
    }

    pub fn error<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Param::Error(Arc::new(error))
    }

    pub fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Param::Error(error) => Some(&**error as &(dyn Error + 'static)),
            Param::Value(_) => None,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Value(value) => fmt::Display::fmt(&**value, f),
            Param::Error(error) => fmt::Display::fmt(&**error, f),
        }
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Value(_) => f.write_str("Param::Value(..)"),
            Param::Error(error) => f.debug_tuple("Param::Error").field(error).finish(),
        }
    }
}

/// Fixed text with no parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SimpleMessage<'a> {
    text: Cow<'a, str>,
}

impl<'a> SimpleMessage<'a> {
    pub fn new(text: impl Into<Cow<'a, str>>) -> Self {
        SimpleMessage { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Message for SimpleMessage<'_> {
    fn formatted_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn template(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for SimpleMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A `{}` template plus positional arguments, formatted on first use.
///
/// Nothing is formatted at construction: a call at a disabled level builds
/// no text at all.
pub struct ParameterizedMessage<'a> {
    template: Cow<'a, str>,
    params: Cow<'a, [Param]>,
    used: OnceCell<usize>,
    formatted: OnceCell<String>,
}

impl<'a> ParameterizedMessage<'a> {
    pub fn new(template: impl Into<Cow<'a, str>>, params: impl Into<Cow<'a, [Param]>>) -> Self {
        ParameterizedMessage {
            template: template.into(),
            params: params.into(),
            used: OnceCell::new(),
            formatted: OnceCell::new(),
        }
    }

    /// Has the text been built yet?
    pub fn is_formatted(&self) -> bool {
        self.formatted.get().is_some()
    }

    fn used(&self) -> usize {
        *self
            .used
            .get_or_init(|| formatter::substitution_count(&self.template, &self.params))
    }
}

impl Message for ParameterizedMessage<'_> {
    fn formatted_text(&self) -> Cow<'_, str> {
        let text = self
            .formatted
            .get_or_init(|| formatter::substitute(&self.template, &self.params[..self.used()]));
        Cow::Borrowed(text)
    }

    fn template(&self) -> &str {
        &self.template
    }

    fn parameters(&self) -> &[Param] {
        &self.params
    }

    fn throwable(&self) -> Option<&(dyn Error + 'static)> {
        if self.used() < self.params.len() {
            self.params.last().and_then(Param::as_error)
        } else {
            None
        }
    }
}

impl fmt::Debug for ParameterizedMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterizedMessage")
            .field("template", &self.template)
            .field("params", &self.params)
            .finish()
    }
}

/// A [`StructuredRecord`] presented as a [`Message`] in a given
/// [`RenderMode`], rendered on first use.
pub struct StructuredMessage<'a> {
    record: &'a StructuredRecord,
    mode: RenderMode,
    default_id: Option<&'a StructuredDataId>,
    rendered: OnceCell<String>,
}

impl<'a> StructuredMessage<'a> {
    pub fn new(
        record: &'a StructuredRecord,
        mode: RenderMode,
        default_id: Option<&'a StructuredDataId>,
    ) -> Self {
        StructuredMessage {
            record,
            mode,
            default_id,
            rendered: OnceCell::new(),
        }
    }

    pub fn record(&self) -> &StructuredRecord {
        self.record
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }
}

impl Message for StructuredMessage<'_> {
    fn formatted_text(&self) -> Cow<'_, str> {
        let text = self
            .rendered
            .get_or_init(|| self.record.render(self.mode, self.default_id));
        Cow::Borrowed(text)
    }

    fn template(&self) -> &str {
        self.record.message().unwrap_or("")
    }

    fn as_structured(&self) -> Option<&StructuredRecord> {
        Some(self.record)
    }

    fn default_id(&self) -> Option<&StructuredDataId> {
        self.default_id
    }
}

/// A bare record logs in [`RenderMode::Full`].
impl Message for StructuredRecord {
    fn formatted_text(&self) -> Cow<'_, str> {
        Cow::Owned(self.render(RenderMode::Full, None))
    }

    fn template(&self) -> &str {
        self.message().unwrap_or("")
    }

    fn as_structured(&self) -> Option<&StructuredRecord> {
        Some(self)
    }
}
