use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use structured_log_facade::{
    BackendError, Level, Logger, LoggerWrapper, StructuredRecord,
};

/// Plain backend that only counts the bytes it is handed, so the loop
/// measures rendering rather than I/O.
#[derive(Default)]
struct CountingLogger {
    bytes: AtomicU64,
}

impl Logger for CountingLogger {
    fn name(&self) -> &str {
        "counting"
    }

    fn is_enabled(&self, _level: Level) -> bool {
        true
    }

    fn log(
        &self,
        _level: Level,
        msg: &str,
        _error: Option<&(dyn Error + 'static)>,
    ) -> Result<(), BackendError> {
        self.bytes.fetch_add(msg.len() as u64, Ordering::Relaxed);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let backend = Arc::new(CountingLogger::default());
    let logger = LoggerWrapper::new(backend.clone());

    let mut record = StructuredRecord::with_id_str("request@32473", "request served", "Access")?;
    record.set_field("method", "GET")?;
    record.set_field("status", "200")?;

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        record.set_field("seq", i.to_string())?;
        logger.info_structured(&record).map_err(|e| e.to_string())?;
    }

    let elapsed = start.elapsed();
    println!(
        "structured load: rendered {} records ({} bytes) in {:?} (~{:.0} rec/s)",
        n,
        backend.bytes.load(Ordering::Relaxed),
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
