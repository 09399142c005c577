use crate::probe::constants::*;
use crate::probe::error::{ProbeError, Result};
use hdrhistogram::Histogram;
use tracing::{debug, warn};

/// Interval statistics using an HDR histogram over microseconds
pub struct Statistics {
    hist: Histogram<u64>,
    real_min: u64,
    real_max: u64,
    clamped_count: usize,
}

impl Statistics {
    /// Create a new Statistics instance from intervals in milliseconds
    pub fn new(intervals_ms: &[f64]) -> Result<Self> {
        debug!(
            sample_count = intervals_ms.len(),
            "Creating statistics from interval samples"
        );
        let mut hist = Histogram::<u64>::new_with_bounds(
            HISTOGRAM_LOW_BOUND_US,
            HISTOGRAM_HIGH_BOUND_US,
            HISTOGRAM_SIGNIFICANT_DIGITS,
        )
        .map_err(|e| ProbeError::Measurement(format!("Failed to create histogram: {}", e)))?;

        let mut real_min = u64::MAX;
        let mut real_max = 0;
        let mut clamped_count = 0;

        for &interval in intervals_ms {
            // Wall-clock steps can make an interval negative
            let micros = (interval.max(0.0) * 1000.0).round() as u64;
            real_min = real_min.min(micros);
            real_max = real_max.max(micros);

            let clamped = micros.clamp(HISTOGRAM_LOW_BOUND_US, HISTOGRAM_HIGH_BOUND_US);
            if micros != clamped {
                clamped_count += 1;
            }

            hist.record(clamped).map_err(|e| {
                warn!(interval_ms = interval, error = %e, "Failed to record interval");
                ProbeError::Measurement(format!("Failed to record interval: {}", e))
            })?;
        }

        if clamped_count > 0 {
            warn!(
                clamped_count,
                total_count = intervals_ms.len(),
                "Some intervals were clamped to histogram bounds"
            );
        }

        Ok(Self {
            hist,
            real_min: if real_min == u64::MAX { 0 } else { real_min },
            real_max,
            clamped_count,
        })
    }

    /// Mean interval in milliseconds
    pub fn mean_ms(&self) -> f64 {
        self.hist.mean() / 1000.0
    }

    /// Shortest interval in milliseconds (unclamped)
    pub fn min_ms(&self) -> f64 {
        self.real_min as f64 / 1000.0
    }

    /// Longest interval in milliseconds (unclamped)
    pub fn max_ms(&self) -> f64 {
        self.real_max as f64 / 1000.0
    }

    pub fn percentile_ms(&self, quantile: f64) -> f64 {
        self.hist.value_at_quantile(quantile) as f64 / 1000.0
    }

    pub fn clamped_count(&self) -> usize {
        self.clamped_count
    }

    pub fn count(&self) -> u64 {
        self.hist.len()
    }
}
