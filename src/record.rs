use crate::error::{check_length, ValidationError};
use crate::id::StructuredDataId;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// How [`StructuredRecord::render`] lays out a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// `<type> [<id> <key>="<value>" ...] <message>`
    Full,
    /// `[<id> <key>="<value>" ...]`
    #[default]
    DataOnly,
}

impl RenderMode {
    /// Format name selecting [`RenderMode::Full`].
    pub const FULL: &'static str = "full";

    /// Interpret a format advice string: `"full"` selects [`RenderMode::Full`],
    /// anything else (or nothing) selects [`RenderMode::DataOnly`].
    pub fn from_format(format: Option<&str>) -> RenderMode {
        match format {
            Some(Self::FULL) => RenderMode::Full,
            _ => RenderMode::DataOnly,
        }
    }
}

impl FromStr for RenderMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RenderMode::from_format(Some(s)))
    }
}

/// A structured log entry: a type, an SD-ID, a message and a keyed set of
/// string parameters.
///
/// Field values and the type are limited to 32 characters; the limits are
/// enforced by the mutators, so a record that exists is always valid. Fields
/// keep insertion order, which is the order they are rendered in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuredRecord {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<StructuredDataId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(rename = "data")]
    fields: IndexMap<String, String>,
}

impl StructuredRecord {
    /// Create a record with an id, message and type.
    ///
    /// **Errors**
    /// - [`ValidationError::TypeTooLong`] if `type_` exceeds 32 characters.
    pub fn new(
        id: StructuredDataId,
        message: impl Into<String>,
        type_: &str,
    ) -> Result<Self, ValidationError> {
        let mut record = StructuredRecord::default();
        record.set_id(id);
        record.set_message(message);
        record.set_type(type_)?;
        Ok(record)
    }

    /// Create a record whose id is given in combined `name[@number]` form.
    pub fn with_id_str(
        id: &str,
        message: impl Into<String>,
        type_: &str,
    ) -> Result<Self, ValidationError> {
        Self::new(StructuredDataId::parse(id, &[], &[])?, message, type_)
    }

    pub fn type_(&self) -> Option<&str> {
        self.type_.as_deref()
    }

    /// **Errors**
    /// - [`ValidationError::TypeTooLong`] if `type_` exceeds 32 characters.
    pub fn set_type(&mut self, type_: &str) -> Result<(), ValidationError> {
        if !check_length(type_) {
            return Err(ValidationError::TypeTooLong(type_.to_string()));
        }
        self.type_ = Some(type_.to_string());
        Ok(())
    }

    pub fn id(&self) -> Option<&StructuredDataId> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: StructuredDataId) {
        self.id = Some(id);
    }

    /// Set the id from its combined `name[@number]` form.
    pub fn set_id_str(&mut self, id: &str) -> Result<(), ValidationError> {
        self.id = Some(StructuredDataId::parse(id, &[], &[])?);
        Ok(())
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Set a parameter, replacing any previous value for `key` in place.
    ///
    /// **Errors**
    /// - [`ValidationError::ValueTooLong`] if `value` exceeds 32 characters;
    ///   the record is left unchanged.
    pub fn set_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let key = key.into();
        let value = value.into();
        if !check_length(&value) {
            return Err(ValidationError::ValueTooLong { key, value });
        }
        self.fields.insert(key, value);
        Ok(())
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Remove a parameter, keeping the order of the remaining ones.
    pub fn remove_field(&mut self, key: &str) -> Option<String> {
        self.fields.shift_remove(key)
    }

    /// Drop every parameter. Type, id and message are kept.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Read-only view of the parameters, in insertion order.
    pub fn fields(&self) -> &IndexMap<String, String> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the record as RFC 5424 structured data.
    ///
    /// `default_id` fills in whatever the record's own id lacks (see
    /// [`StructuredDataId::merge_with`]), or stands in for it when the record
    /// has none.
    ///
    /// Returns the empty string, not an error, when [`RenderMode::Full`] is
    /// asked of a record without a type, or when there is no usable id or no
    /// parameters. Callers treat empty output as "nothing to log".
    pub fn render(&self, mode: RenderMode, default_id: Option<&StructuredDataId>) -> String {
        let full = mode == RenderMode::Full;
        let mut buf = String::new();
        if full {
            match &self.type_ {
                Some(type_) => {
                    buf.push_str(type_);
                    buf.push(' ');
                }
                None => return String::new(),
            }
        }

        let id = match &self.id {
            Some(id) => Some(id.merge_with(default_id)),
            None => default_id.cloned(),
        };
        let id = match id {
            Some(id) if id.name().is_some() && !self.fields.is_empty() => id,
            _ => return String::new(),
        };

        // Writing into a String cannot fail.
        let _ = write!(buf, "[{}", id);
        for (key, value) in &self.fields {
            let _ = write!(buf, " {}=\"{}\"", key, value);
        }
        buf.push(']');

        if full {
            if let Some(message) = &self.message {
                buf.push(' ');
                buf.push_str(message);
            }
        }
        buf
    }
}

impl fmt::Display for StructuredRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(RenderMode::DataOnly, None))
    }
}

impl Hash for StructuredRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_.hash(state);
        self.id.hash(state);
        self.message.hash(state);
        // Equality ignores field order, so the hash must too.
        let mut fields: Vec<_> = self.fields.iter().collect();
        fields.sort();
        fields.hash(state);
    }
}
