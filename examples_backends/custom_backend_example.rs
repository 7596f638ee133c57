use std::error::Error;
use std::sync::Arc;

use structured_log_facade::marker::EVENT;
use structured_log_facade::{
    BackendError, Level, LocationAwareLogger, Logger, LoggerWrapper, Marker, Param,
};

/// Example of integrating a completely custom backend by implementing the
/// backend traits directly. Imagine this talks to some proprietary log
/// store for which this crate does not provide a built-in backend.
///
/// Being location-aware, it receives finished text plus the caller
/// boundary, which it could use to find the real call site.
struct MyCustomStore;

impl Logger for MyCustomStore {
    fn name(&self) -> &str {
        "my-custom-store"
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

impl LocationAwareLogger for MyCustomStore {
    fn log_at(
        &self,
        marker: Option<&Marker>,
        caller: &str,
        level: Level,
        msg: &str,
        error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        // Here you would call your own client library for the target store.
        // For the sake of example we just print the call.
        println!(
            "[my-custom-store] level={} marker={:?} caller={} msg={:?} error={:?}",
            level.as_int(),
            marker.map(Marker::name),
            caller,
            msg,
            error.map(|e| e.to_string())
        );
        Ok(())
    }
}

fn main() -> Result<(), BackendError> {
    let logger = LoggerWrapper::new(Arc::new(MyCustomStore));
    println!("bound {} as {:?}", logger.name(), logger.capability());

    logger.info("custom backend example started")?;
    logger.debug("filtered out by the backend")?;
    logger.warn_marked(&EVENT, "tagged with the EVENT marker")?;

    let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
    logger.error_format(
        "simulated failure talking to {}",
        &[Param::value("my-custom-store"), Param::error(io)],
    )?;
    Ok(())
}
