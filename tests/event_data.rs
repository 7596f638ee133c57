use std::error::Error;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use structured_log_facade::event::{EVENT_DATETIME, EVENT_ID, EVENT_MESSAGE, EVENT_TYPE};
use structured_log_facade::marker::EVENT_MARKER_NAME;
use structured_log_facade::nop::NopLoggerFactory;
use structured_log_facade::{
    BackendError, EventData, EventFormat, EventLogger, Level, LocationAwareLogger, Logger,
    Marker, SimpleMessage,
};

/// Location-aware backend keeping `(level, marker, caller, text)`.
#[derive(Default)]
struct Captured {
    lines: Mutex<Vec<(Level, Option<String>, String, String)>>,
}

impl Logger for Captured {
    fn name(&self) -> &str {
        "captured"
    }

    fn is_enabled(&self, level: Level) -> bool {
        level >= Level::Info
    }

    fn log(
        &self,
        level: Level,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        self.log_at(None, "", level, msg, error)
    }

    fn as_location_aware(&self) -> Option<&dyn LocationAwareLogger> {
        Some(self)
    }
}

impl LocationAwareLogger for Captured {
    fn log_at(
        &self,
        marker: Option<&Marker>,
        caller: &str,
        level: Level,
        msg: &str,
        _error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        self.lines.lock().unwrap().push((
            level,
            marker.map(|m| m.name().to_string()),
            caller.to_string(),
            msg.to_string(),
        ));
        Ok(())
    }
}

fn order_event() -> EventData {
    let mut event = EventData::new();
    event.put("sku", "A-17").unwrap();
    event.put(EVENT_TYPE, "Order").unwrap();
    event.put("qty", "3").unwrap();
    event.put(EVENT_ID, "order@18060").unwrap();
    event.put(EVENT_MESSAGE, "order placed").unwrap();
    event
        .set_event_date_time(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())
        .unwrap();
    event
}

#[test]
fn iteration_puts_reserved_keys_first_in_fixed_order() {
    let keys: Vec<String> = order_event().iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(
        keys,
        vec![EVENT_ID, EVENT_MESSAGE, EVENT_TYPE, EVENT_DATETIME, "sku", "qty"]
    );
    assert_eq!(order_event().len(), 6);
}

#[test]
fn event_map_is_an_owned_snapshot() {
    let map = order_event().event_map();
    assert_eq!(map.get(EVENT_ID).map(String::as_str), Some("order@18060"));
    assert_eq!(map.get(EVENT_DATETIME).map(String::as_str), Some("2024-05-01T08:00:00.000"));
    assert!(order_event() == map);
}

#[cfg(feature = "json")]
#[test]
fn json_form_is_logged_with_event_marker() {
    let backend = Arc::new(Captured::default());
    let events = EventLogger::with_backend(backend.clone());

    events.log_event_as(&order_event(), EventFormat::Json).unwrap();

    let lines = backend.lines.lock().unwrap();
    assert_eq!(lines.len(), 1);
    let (level, marker, caller, text) = &lines[0];
    assert_eq!(*level, Level::Info);
    assert_eq!(marker.as_deref(), Some(EVENT_MARKER_NAME));
    assert_eq!(caller, "structured_log_facade::event::EventLogger");
    assert!(text.starts_with(r#"{"EventId":"order@18060","EventMessage":"order placed""#));
    assert_eq!(EventData::from_json(text).unwrap(), order_event());
}

#[test]
fn structured_form_renders_full_record() {
    let backend = Arc::new(Captured::default());
    let events = EventLogger::with_backend(backend.clone());

    events.log_event_as(&order_event(), EventFormat::Structured).unwrap();

    let lines = backend.lines.lock().unwrap();
    assert_eq!(
        lines[0].3,
        "Order [order@18060 sku=\"A-17\" qty=\"3\" EventDateTime=\"2024-05-01T08:00:00.000\"] order placed"
    );
}

#[test]
fn arbitrary_messages_share_the_event_marker() {
    let backend = Arc::new(Captured::default());
    let events = EventLogger::with_backend(backend.clone());

    events.log_message(&SimpleMessage::new("batch closed")).unwrap();

    let lines = backend.lines.lock().unwrap();
    assert_eq!(lines[0].1.as_deref(), Some(EVENT_MARKER_NAME));
    assert_eq!(lines[0].3, "batch closed");
}

#[test]
fn nop_factory_drops_events() {
    let events = EventLogger::new(&NopLoggerFactory);
    assert!(!events.wrapper().is_info_enabled());
    assert!(events.log_event(&order_event()).is_ok());
}
