use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Millisecond wall-clock timestamps for interval measurement
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    /// Milliseconds since the UNIX epoch, with sub-millisecond precision
    fn now_ms(&self) -> f64;
}

/// Clock backed by the system wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_secs_f64() * 1000.0,
            Err(e) => {
                // Only differences between readings are used
                warn!(error = %e, "System clock is before the UNIX epoch");
                0.0
            }
        }
    }
}
