//! Probe loop and serial plumbing for the round-trip measurement

pub mod channel;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod measurement;
pub mod rate;
pub mod reporter;
pub mod statistics;

pub use channel::{configure, Channel, SerialChannel, SerialSettings};
pub use clock::{Clock, SystemClock};
pub use config::ProbeConfig;
pub use constants::*;
pub use error::{ProbeError, Result, EXIT_CONFIG_FAILURE, EXIT_DEVICE_FAILURE};
pub use logging::init_logging;
pub use measurement::{
    measure_single_probe, probe_loop, LoopOptions, ProbeSummary, StopFlag, TimingSample,
};
pub use rate::RateTracker;
pub use reporter::Reporter;
pub use statistics::Statistics;
