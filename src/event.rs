//! Business events: structured records with well-known metadata.
//!
//! An [`EventData`] is a [`StructuredRecord`] whose id, message, type and
//! timestamp are addressable as reserved keys. Whenever the event is
//! iterated or exported, those reserved entries come first, in the order
//! `EventId`, `EventMessage`, `EventType`, `EventDateTime`, followed by the
//! ordinary fields in insertion order. Consumers of the exported form rely
//! on that order.

#[cfg(feature = "json")]
use crate::error::EventError;
use crate::error::{BackendError, ValidationError};
use crate::id::StructuredDataId;
use crate::level::Level;
use crate::logger::{Logger, LoggerFactory};
use crate::marker::EVENT;
use crate::message::Message;
use crate::record::{RenderMode, StructuredRecord};
use crate::wrapper::LoggerWrapper;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::sync::Arc;

pub const EVENT_ID: &str = "EventId";
pub const EVENT_MESSAGE: &str = "EventMessage";
pub const EVENT_TYPE: &str = "EventType";
pub const EVENT_DATETIME: &str = "EventDateTime";

/// Reserved keys, in presentation order.
pub const RESERVED_KEYS: [&str; 4] = [EVENT_ID, EVENT_MESSAGE, EVENT_TYPE, EVENT_DATETIME];

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventData {
    record: StructuredRecord,
}

impl EventData {
    pub fn new() -> Self {
        EventData::default()
    }

    /// Build an event from key/value pairs. Reserved keys go to their typed
    /// setters; everything else becomes an ordinary field.
    pub fn from_map<I, K, V>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut event = EventData::new();
        event.put_all(entries)?;
        Ok(event)
    }

    /// The id in combined `name[@number]` form.
    pub fn event_id(&self) -> Option<String> {
        self.record.id().map(StructuredDataId::render)
    }

    /// **Errors**
    /// - [`ValidationError::MissingName`] if `id` is empty.
    /// - whatever [`StructuredDataId::parse`] rejects.
    pub fn set_event_id(&mut self, id: &str) -> Result<(), ValidationError> {
        if id.is_empty() {
            return Err(ValidationError::MissingName);
        }
        self.record.set_id_str(id)
    }

    pub fn message(&self) -> Option<&str> {
        self.record.message()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.record.set_message(message)
    }

    pub fn event_type(&self) -> Option<&str> {
        self.record.type_()
    }

    pub fn set_event_type(&mut self, event_type: &str) -> Result<(), ValidationError> {
        self.record.set_type(event_type)
    }

    /// The event timestamp, at millisecond precision.
    pub fn event_date_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.record.field(EVENT_DATETIME)?;
        NaiveDateTime::parse_from_str(raw, DATE_FORMAT)
            .ok()
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    pub fn set_event_date_time(&mut self, at: DateTime<Utc>) -> Result<(), ValidationError> {
        self.record
            .set_field(EVENT_DATETIME, at.format(DATE_FORMAT).to_string())
    }

    /// Set an entry. Reserved keys are routed to their typed setters, so
    /// `put(EVENT_TYPE, ..)` is `set_event_type(..)`.
    ///
    /// **Errors**
    /// - whatever the typed setter rejects for reserved keys;
    /// - [`ValidationError::ValueTooLong`] for oversized ordinary values.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), ValidationError> {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            EVENT_ID => self.set_event_id(&value),
            EVENT_MESSAGE => {
                self.set_message(value);
                Ok(())
            }
            EVENT_TYPE => self.set_event_type(&value),
            EVENT_DATETIME => {
                let naive = NaiveDateTime::parse_from_str(&value, DATE_FORMAT)
                    .map_err(|_| ValidationError::BadDateTime(value.clone()))?;
                self.set_event_date_time(Utc.from_utc_datetime(&naive))
            }
            _ => self.record.set_field(key, value),
        }
    }

    pub fn put_all<I, K, V>(&mut self, entries: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in entries {
            self.put(key, value)?;
        }
        Ok(())
    }

    /// Look an entry up, reserved keys included.
    pub fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            EVENT_ID => self.event_id().map(Cow::Owned),
            EVENT_MESSAGE => self.message().map(Cow::Borrowed),
            EVENT_TYPE => self.event_type().map(Cow::Borrowed),
            _ => self.record.field(key).map(Cow::Borrowed),
        }
    }

    /// Number of entries, counting only the reserved ones actually set.
    pub fn len(&self) -> usize {
        let header = [
            self.record.id().is_some(),
            self.record.message().is_some(),
            self.record.type_().is_some(),
        ];
        header.iter().filter(|present| **present).count() + self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, reserved ones first in [`RESERVED_KEYS`] order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> + '_ {
        let header = [
            (EVENT_ID, self.event_id().map(Cow::Owned)),
            (EVENT_MESSAGE, self.message().map(Cow::Borrowed)),
            (EVENT_TYPE, self.event_type().map(Cow::Borrowed)),
            (EVENT_DATETIME, self.record.field(EVENT_DATETIME).map(Cow::Borrowed)),
        ];
        header
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .chain(
                self.record
                    .fields()
                    .iter()
                    .filter(|(key, _)| key.as_str() != EVENT_DATETIME)
                    .map(|(key, value)| (key.as_str(), Cow::Borrowed(value.as_str()))),
            )
    }

    /// Owned snapshot of [`EventData::iter`].
    pub fn event_map(&self) -> IndexMap<String, String> {
        self.iter()
            .map(|(key, value)| (key.to_string(), value.into_owned()))
            .collect()
    }

    /// The underlying structured record.
    pub fn record(&self) -> &StructuredRecord {
        &self.record
    }

    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, EventError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a JSON object produced by [`EventData::to_json`]. Non-string
    /// scalar values are kept in their JSON text form; `null` values are
    /// treated as absent entries.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, EventError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = match value {
            serde_json::Value::Object(object) => object,
            _ => return Err(EventError::NotAnObject),
        };
        let entries = object.into_iter().filter_map(|(key, value)| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        });
        Ok(EventData::from_map(entries)?)
    }
}

impl Serialize for EventData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl PartialEq<IndexMap<String, String>> for EventData {
    fn eq(&self, other: &IndexMap<String, String>) -> bool {
        self.event_map() == *other
    }
}

/// How [`EventLogger`] hands an event to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFormat {
    /// The exported reserved-first JSON object, as text.
    #[cfg(feature = "json")]
    Json,
    /// The event's structured record, rendered in full mode for backends
    /// that cannot take it natively.
    Structured,
}

impl Default for EventFormat {
    fn default() -> Self {
        #[cfg(feature = "json")]
        {
            EventFormat::Json
        }
        #[cfg(not(feature = "json"))]
        {
            EventFormat::Structured
        }
    }
}

/// Logs business events at INFO, tagged with the [`EVENT`] marker.
#[derive(Debug, Clone)]
pub struct EventLogger {
    logger: LoggerWrapper,
}

impl EventLogger {
    /// Name the event backend is looked up under.
    pub const NAME: &'static str = "EventLogger";

    pub fn new(factory: &dyn LoggerFactory) -> Self {
        Self::with_backend(factory.logger(Self::NAME))
    }

    pub fn with_backend(logger: Arc<dyn Logger>) -> Self {
        EventLogger {
            logger: LoggerWrapper::with_caller(logger, std::any::type_name::<EventLogger>()),
        }
    }

    pub fn wrapper(&self) -> &LoggerWrapper {
        &self.logger
    }

    pub fn log_event(&self, data: &EventData) -> Result<(), BackendError> {
        self.log_event_as(data, EventFormat::default())
    }

    pub fn log_event_as(&self, data: &EventData, format: EventFormat) -> Result<(), BackendError> {
        match format {
            #[cfg(feature = "json")]
            EventFormat::Json => {
                if !self.logger.is_info_enabled() {
                    return Ok(());
                }
                let text = data.to_json()?;
                self.logger.dispatch(Level::Info, Some(&**EVENT), &text, None)
            }
            EventFormat::Structured => self.logger.dispatch_structured(
                Level::Info,
                Some(&**EVENT),
                data.record(),
                RenderMode::Full,
                None,
            ),
        }
    }

    pub fn log_message(&self, message: &dyn Message) -> Result<(), BackendError> {
        self.logger
            .dispatch_message(Level::Info, Some(&**EVENT), message, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn transfer() -> EventData {
        let mut event = EventData::new();
        event.put("amount", "100").unwrap();
        event.set_event_id("transfer@18060").unwrap();
        event.put("currency", "EUR").unwrap();
        event.set_event_type("Audit").unwrap();
        event.set_message("funds moved");
        event
    }

    #[test]
    fn reserved_entries_come_first() {
        let keys: Vec<_> = transfer().iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(
            keys,
            vec!["EventId", "EventMessage", "EventType", "amount", "currency"]
        );
    }

    #[test]
    fn put_routes_reserved_keys() {
        let mut event = EventData::new();
        event.put(EVENT_TYPE, "Login").unwrap();
        event.put(EVENT_ID, "login").unwrap();
        event.put(EVENT_MESSAGE, "user signed in").unwrap();
        assert_eq!(event.event_type(), Some("Login"));
        assert_eq!(event.event_id(), Some("login".to_string()));
        assert_eq!(event.message(), Some("user signed in"));
        assert!(event.record().is_empty());
    }

    #[test]
    fn date_time_is_stored_at_millisecond_precision() {
        let mut event = EventData::new();
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap()
            + chrono::Duration::milliseconds(123);
        event.set_event_date_time(at).unwrap();
        assert_eq!(
            event.get(EVENT_DATETIME).as_deref(),
            Some("2024-03-09T14:30:05.123")
        );
        let back = event.event_date_time().unwrap();
        assert_eq!(back, at);
        assert_eq!(back.nanosecond(), 123_000_000);

        assert_eq!(
            event.put(EVENT_DATETIME, "yesterday"),
            Err(ValidationError::BadDateTime("yesterday".to_string()))
        );
    }

    #[test]
    fn date_time_follows_type() {
        let mut event = transfer();
        event
            .put(EVENT_DATETIME, "2024-03-09T14:30:05.000")
            .unwrap();
        let keys: Vec<_> = event.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(
            keys,
            vec!["EventId", "EventMessage", "EventType", "EventDateTime", "amount", "currency"]
        );
    }

    #[test]
    fn empty_event_id_is_rejected() {
        let mut event = EventData::new();
        assert_eq!(event.put(EVENT_ID, ""), Err(ValidationError::MissingName));
        assert_eq!(event.event_id(), None);
        assert!(event.is_empty());
    }

    #[test]
    fn len_counts_only_present_reserved_entries() {
        let mut event = EventData::new();
        assert!(event.is_empty());
        event.set_message("only a message");
        assert_eq!(event.len(), 1);
        event.put("k", "v").unwrap();
        assert_eq!(event.len(), 2);
        assert_eq!(transfer().len(), 5);
    }

    #[test]
    fn compares_with_maps() {
        let mut expected = IndexMap::new();
        expected.insert("EventId".to_string(), "transfer@18060".to_string());
        expected.insert("EventMessage".to_string(), "funds moved".to_string());
        expected.insert("EventType".to_string(), "Audit".to_string());
        expected.insert("amount".to_string(), "100".to_string());
        expected.insert("currency".to_string(), "EUR".to_string());
        assert!(transfer() == expected);
    }

    #[test]
    fn from_map_validates() {
        let event = EventData::from_map([("EventType", "Audit"), ("user", "bob")]).unwrap();
        assert_eq!(event.event_type(), Some("Audit"));
        assert_eq!(event.get("user").as_deref(), Some("bob"));

        let long = "x".repeat(33);
        assert!(EventData::from_map([("user", long.as_str())]).is_err());
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_round_trip_keeps_reserved_first() {
        let json = transfer().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"EventId":"transfer@18060","EventMessage":"funds moved","EventType":"Audit","amount":"100","currency":"EUR"}"#
        );
        assert_eq!(EventData::from_json(&json).unwrap(), transfer());
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_must_be_an_object() {
        assert!(matches!(
            EventData::from_json("[1, 2]"),
            Err(EventError::NotAnObject)
        ));
        assert!(matches!(
            EventData::from_json("{"),
            Err(EventError::Decode(_))
        ));
        let event = EventData::from_json(r#"{"count": 3}"#).unwrap();
        assert_eq!(event.get("count").as_deref(), Some("3"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_nulls_are_absent() {
        let event = EventData::from_json(r#"{"EventMessage": null, "k": null, "user": "bob"}"#).unwrap();
        assert_eq!(event.message(), None);
        assert_eq!(event.get("k"), None);
        assert_eq!(event.get("user").as_deref(), Some("bob"));
        assert_eq!(event.len(), 1);
    }
}
