use crate::probe::channel::SerialSettings;
use crate::probe::constants::*;
use crate::probe::error::{ProbeError, Result};
use clap::Parser;
use std::time::Duration;
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(name = "rtu-probe")]
#[command(about = "Modbus-RTU serial round-trip latency probe")]
pub struct ProbeConfig {
    /// Serial device to probe
    #[arg(long, env = DEVICE_ENV_VAR, default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// Baud rate (8N1, raw mode)
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Reply read timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Stop after this many cycles (runs until interrupted if omitted)
    #[arg(long)]
    pub count: Option<u64>,

    /// Print the reply rate once per rate window
    #[arg(long)]
    pub rate: bool,

    /// Reply rate window in milliseconds
    #[arg(long, default_value_t = DEFAULT_RATE_WINDOW_MS)]
    pub rate_interval_ms: u64,

    /// Print latency statistics when a bounded run finishes
    #[arg(long)]
    pub summary: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Log format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub log_format: String,
}

impl ProbeConfig {
    /// Returns the configured read timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the reply rate window as a Duration
    pub fn rate_window(&self) -> Duration {
        Duration::from_millis(self.rate_interval_ms)
    }

    /// Line settings for opening the device
    pub fn serial_settings(&self) -> SerialSettings {
        SerialSettings {
            path: self.device.clone(),
            baud_rate: self.baud,
            timeout: self.timeout(),
        }
    }

    /// Returns true if JSON format logging is enabled
    pub fn is_json_format(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// Validates the configuration values
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        if self.device.trim().is_empty() {
            return Err(ProbeError::Config("device path must not be empty".into()));
        }
        if self.baud == 0 {
            return Err(ProbeError::Config("baud must be > 0".into()));
        }
        if self.timeout_ms == 0 {
            return Err(ProbeError::Config("timeout must be > 0".into()));
        }
        if self.count == Some(0) {
            return Err(ProbeError::Config("count must be > 0".into()));
        }
        if self.rate && self.rate_interval_ms == 0 {
            return Err(ProbeError::Config("rate interval must be > 0".into()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ProbeError::Config(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        debug!("Configuration validated successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ProbeConfig {
        let mut argv = vec!["rtu-probe"];
        argv.extend_from_slice(args);
        ProbeConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_match_line_parameters() {
        let config = parse(&["--device", "/dev/ttyUSB0"]);
        assert_eq!(config.baud, 1_000_000);
        assert_eq!(config.timeout(), Duration::from_millis(100));
        assert_eq!(config.count, None);
        assert!(!config.is_json_format());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serial_settings() {
        let config = parse(&["--device", "/dev/ttyACM1", "--baud", "115200"]);
        let settings = config.serial_settings();
        assert_eq!(settings.path, "/dev/ttyACM1");
        assert_eq!(settings.baud_rate, 115_200);
        assert_eq!(settings.timeout, Duration::from_millis(100));
    }

    #[test]
    fn test_invalid_values() {
        assert!(parse(&["--device", "/dev/x", "--timeout-ms", "0"]).validate().is_err());
        assert!(parse(&["--device", "/dev/x", "--count", "0"]).validate().is_err());
        assert!(parse(&["--device", "/dev/x", "--baud", "0"]).validate().is_err());
        assert!(parse(&["--device", "  "]).validate().is_err());
        assert!(parse(&["--device", "/dev/x", "--log-level", "loud"])
            .validate()
            .is_err());
        assert!(
            parse(&["--device", "/dev/x", "--rate", "--rate-interval-ms", "0"])
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let result = ProbeConfig::try_parse_from(["rtu-probe", "--log-format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_format() {
        let config = parse(&["--device", "/dev/x", "--log-format", "json"]);
        assert!(config.is_json_format());
    }
}
