use chrono::Utc;
use structured_log_facade::backend::factory;
use structured_log_facade::init::init_tracing;
use structured_log_facade::{BackendError, EventData, EventFormat, EventLogger};

fn main() -> Result<(), BackendError> {
    init_tracing()?;

    let events = EventLogger::new(&**factory());

    let mut transfer = EventData::new();
    transfer.set_event_id("transfer@18060")?;
    transfer.set_event_type("Audit")?;
    transfer.set_message("funds moved");
    transfer.set_event_date_time(Utc::now())?;
    transfer.put("amount", "100")?;
    transfer.put("currency", "EUR")?;

    // Reserved keys first, then the ordinary fields in insertion order.
    println!("{}", transfer.to_json()?);

    events.log_event(&transfer)?;
    events.log_event_as(&transfer, EventFormat::Structured)?;
    Ok(())
}
