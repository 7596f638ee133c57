use structured_log_facade::backend::get_logger;
use structured_log_facade::init::init_tracing;
use structured_log_facade::{BackendError, Param, StructuredRecord};

fn main() -> Result<(), BackendError> {
    // LOG_FACADE_LEVEL / LOG_FACADE_ANSI tune the console output;
    // LOG_FACADE_BACKEND=nop silences everything.
    init_tracing()?;

    let logger = get_logger("tracing-example");
    logger.info("tracing backend example started")?;
    logger.debug_format("hidden unless LOG_FACADE_LEVEL=debug: {}", &[Param::value(42)])?;

    let mut record = StructuredRecord::with_id_str("login@32473", "user signed in", "Audit")?;
    record.set_field("user", "bob")?;
    record.set_field("ip", "10.0.0.7")?;
    logger.info_structured(&record)?;
    Ok(())
}
