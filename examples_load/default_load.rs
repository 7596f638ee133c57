use std::sync::Arc;
use std::time::Instant;

use structured_log_facade::nop::NopLogger;
use structured_log_facade::{LoggerWrapper, Param};

fn main() {
    let logger = LoggerWrapper::new(Arc::new(NopLogger));

    let n: u64 = 1_000_000;
    let start = Instant::now();

    for i in 0..n {
        // Disabled level: the template is never formatted.
        let _ = logger.error_format("default load test iteration {}", &[Param::value(i)]);
    }

    let elapsed = start.elapsed();
    println!(
        "disabled backend: dispatched {} calls in {:?} (~{:.0} calls/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
