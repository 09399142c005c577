use crate::probe::channel::Channel;
use crate::probe::clock::Clock;
use crate::probe::error::{ProbeError, Result};
use crate::probe::rate::RateTracker;
use crate::probe::reporter::Reporter;
use crate::protocol::{Frame, FRAME_SIZE, REPLY_BUFFER_SIZE};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Send and receive timestamps of one probe cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingSample {
    pub send_ms: f64,
    pub recv_ms: f64,
    pub bytes_received: usize,
}

impl TimingSample {
    pub fn interval_ms(&self) -> f64 {
        self.recv_ms - self.send_ms
    }
}

/// Cooperative stop request, checked between cycles
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How long the probe loop runs and what it reports besides intervals
#[derive(Debug, Clone, Default)]
pub struct LoopOptions {
    /// Stop after this many cycles; `None` runs until stopped
    pub count: Option<u64>,
    /// Print the reply rate once per window
    pub rate_window: Option<Duration>,
    /// Keep every interval for the end-of-run summary
    pub keep_intervals: bool,
}

/// Totals from a finished probe loop
#[derive(Debug, Clone, Default)]
pub struct ProbeSummary {
    pub cycles: u64,
    pub errors: u64,
    pub empty_replies: u64,
    pub intervals_ms: Vec<f64>,
    pub elapsed: Duration,
}

/// Run one request/reply exchange and time it.
///
/// The send timestamp is taken before the frame is built. The reply is not
/// parsed; any bytes, or none at all once the read timeout expires, end the
/// cycle.
pub fn measure_single_probe<C, K>(channel: &mut C, clock: &K) -> Result<TimingSample>
where
    C: Channel + ?Sized,
    K: Clock + ?Sized,
{
    let send_ms = clock.now_ms();
    let frame = Frame::probe().encode();

    let written = channel.send_frame(&frame)?;
    if written != FRAME_SIZE {
        return Err(ProbeError::ShortWrite {
            expected: FRAME_SIZE,
            written,
        });
    }

    let mut reply = [0u8; REPLY_BUFFER_SIZE];
    let bytes_received = channel.recv_reply(&mut reply)?;
    let recv_ms = clock.now_ms();

    Ok(TimingSample {
        send_ms,
        recv_ms,
        bytes_received,
    })
}

/// Probe repeatedly until `stop` is raised or the cycle count is reached.
///
/// Each successful cycle writes one interval line to `out`. Send and receive
/// failures are written to `err` and the loop moves on to a fresh cycle; any
/// other error ends the loop.
pub fn probe_loop<C, K, W, E>(
    channel: &mut C,
    clock: &K,
    options: &LoopOptions,
    stop: &StopFlag,
    out: &mut W,
    err: &mut E,
) -> Result<ProbeSummary>
where
    C: Channel + ?Sized,
    K: Clock + ?Sized,
    W: Write,
    E: Write,
{
    let start = Instant::now();
    let mut rate = options
        .rate_window
        .map(|window| RateTracker::new(window, start));
    let mut summary = ProbeSummary::default();

    info!(count = ?options.count, "Probe loop started");

    while !stop.is_stopped() && options.count.map_or(true, |n| summary.cycles < n) {
        summary.cycles += 1;

        match measure_single_probe(channel, clock) {
            Ok(sample) => {
                let interval_ms = sample.interval_ms();
                debug!(
                    cycle = summary.cycles,
                    interval_ms,
                    bytes_received = sample.bytes_received,
                    "Probe cycle completed"
                );
                if sample.bytes_received == 0 {
                    summary.empty_replies += 1;
                }
                if options.keep_intervals {
                    summary.intervals_ms.push(interval_ms);
                }

                writeln!(out, "{}", Reporter::format_interval(interval_ms))?;
                if let Some(hz) = rate.as_mut().and_then(|r| r.record(Instant::now())) {
                    writeln!(out, "{}", Reporter::format_rate(hz))?;
                }
            }
            Err(e) if e.is_recoverable() => {
                summary.errors += 1;
                debug!(cycle = summary.cycles, error = %e, "Probe cycle abandoned");
                writeln!(err, "{}", e)?;
            }
            Err(e) => return Err(e),
        }
    }

    summary.elapsed = start.elapsed();
    info!(
        cycles = summary.cycles,
        errors = summary.errors,
        "Probe loop finished"
    );
    Ok(summary)
}
