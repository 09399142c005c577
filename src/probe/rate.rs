use std::time::{Duration, Instant};

/// Average reply frequency over a fixed window.
///
/// Gaps between consecutive replies are accumulated; once the window has
/// elapsed the average is handed out and the accumulators reset.
#[derive(Debug, Clone)]
pub struct RateTracker {
    window: Duration,
    last: Instant,
    next_report: Instant,
    replies: u64,
    total: Duration,
}

impl RateTracker {
    pub fn new(window: Duration, start: Instant) -> Self {
        Self {
            window,
            last: start,
            next_report: start + window,
            replies: 0,
            total: Duration::ZERO,
        }
    }

    /// Record a reply arriving at `now`, returning the rate in Hz when a
    /// window closes
    pub fn record(&mut self, now: Instant) -> Option<f64> {
        self.total += now.saturating_duration_since(self.last);
        self.replies += 1;
        self.last = now;

        if now < self.next_report {
            return None;
        }

        let secs = self.total.as_secs_f64();
        let hz = if secs > 0.0 {
            self.replies as f64 / secs
        } else {
            0.0
        };
        self.replies = 0;
        self.total = Duration::ZERO;
        self.next_report = now + self.window;
        Some(hz)
    }
}
