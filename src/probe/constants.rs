//! Constants used throughout the probe

/// Serial device probed when none is configured
pub const DEFAULT_DEVICE: &str = "/dev/serial/by-id/usb-1a86_USB_Serial-if00-port0";

/// Environment variable overriding the device path
pub const DEVICE_ENV_VAR: &str = "RTU_PROBE_DEVICE";

/// Line rate in bit/s
pub const DEFAULT_BAUD_RATE: u32 = 1_000_000;

/// Read timeout in milliseconds (one termios decisecond)
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 100;

/// Window over which the reply rate is averaged, in milliseconds
pub const DEFAULT_RATE_WINDOW_MS: u64 = 1000;

/// Label printed ahead of each interval
pub const INTERVAL_LABEL: &str = "send-to-receive interval";

/// Histogram lower bound in microseconds
pub const HISTOGRAM_LOW_BOUND_US: u64 = 1;

/// Histogram upper bound in microseconds
pub const HISTOGRAM_HIGH_BOUND_US: u64 = 60_000_000;

/// Histogram significant digits for precision
pub const HISTOGRAM_SIGNIFICANT_DIGITS: u8 = 3;

/// Intervals below this are shown in green
pub const FAST_INTERVAL_MS: f64 = 5.0;

/// Intervals at or above this are shown in red
pub const SLOW_INTERVAL_MS: f64 = 50.0;
