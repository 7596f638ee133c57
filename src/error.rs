use std::error::Error;
use std::num::ParseIntError;

/// Maximum length, in characters, of an SD-ID, a record type or a field value.
pub const MAX_LENGTH: usize = 32;

/// Failure surfaced by a backend logger during a delegated call.
///
/// The dispatcher hands these back to its caller untouched; it never wraps
/// or swallows them.
pub type BackendError = Box<dyn Error + Send + Sync>;

/// Raised synchronously when an identifier, type or field value breaks the
/// RFC 5424 limits at construction or mutation time.
///
/// Rendering never produces this error: a record that cannot be rendered
/// degrades to an empty string instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("length of id exceeds maximum of 32 characters: {0}")]
    IdTooLong(String),

    #[error("no structured id name was supplied")]
    MissingName,

    #[error("no enterprise number was supplied")]
    MissingEnterpriseNumber,

    #[error("enterprise number of id {id} is not an integer")]
    BadEnterpriseNumber {
        id: String,
        #[source]
        source: ParseIntError,
    },

    #[error("structured data type exceeds maximum length of 32 characters: {0}")]
    TypeTooLong(String),

    #[error("value of field {key} exceeds maximum length of 32 characters: {value}")]
    ValueTooLong { key: String, value: String },

    #[error("event date/time is not of the form yyyy-MM-ddTHH:mm:ss.SSS: {0}")]
    BadDateTime(String),
}

/// Error type returned when importing or exporting event data.
#[derive(thiserror::Error, Debug)]
pub enum EventError {
    #[cfg(feature = "json")]
    #[error("error decoding event data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("event data must be a map of string keys to values")]
    NotAnObject,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub(crate) fn check_length(value: &str) -> bool {
    value.chars().count() <= MAX_LENGTH
}
