//! A logging facade with RFC 5424 structured data.
//!
//! Application code talks to a [`LoggerWrapper`]; the wrapper adapts every
//! call to whatever protocol the bound backend speaks, from plain per-level
//! text calls up to whole [`Message`]s carrying [`StructuredRecord`]s.

pub mod error;
pub mod level;
pub mod marker;
pub mod id;
pub mod record;
pub mod formatter;
pub mod message;
pub mod logger;
pub mod wrapper;
pub mod event;
pub mod nop;

#[cfg(feature = "tracing-backend")]
pub mod tracing_backend;

pub mod backend;
pub mod env;
pub mod init;

pub use error::{BackendError, EventError, ValidationError};
pub use event::{EventData, EventFormat, EventLogger};
pub use id::StructuredDataId;
pub use level::Level;
pub use logger::{LocationAwareLogger, Logger, LoggerFactory, MarkerAwareLogger, MessageAwareLogger};
pub use marker::Marker;
pub use message::{Message, Param, ParameterizedMessage, SimpleMessage, StructuredMessage};
pub use record::{RenderMode, StructuredRecord};
pub use wrapper::{Capability, LoggerWrapper};
