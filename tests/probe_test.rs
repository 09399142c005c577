use rtu_probe::probe::{
    measure_single_probe, probe_loop, Channel, LoopOptions, ProbeConfig, ProbeError, Result,
    StopFlag, SystemClock, EXIT_CONFIG_FAILURE, EXIT_DEVICE_FAILURE,
};
use rtu_probe::protocol::{crc16_modbus, Frame, FRAME_SIZE, REPLY_BUFFER_SIZE};
use std::process::Command;
use std::thread;
use std::time::Duration;

/// Test helper: device that answers every valid request after a fixed delay
struct DelayedResponder {
    delay: Duration,
    requests: Vec<[u8; FRAME_SIZE]>,
}

impl DelayedResponder {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            requests: Vec::new(),
        }
    }
}

impl Channel for DelayedResponder {
    fn send_frame(&mut self, frame: &[u8; FRAME_SIZE]) -> Result<usize> {
        self.requests.push(*frame);
        Ok(frame.len())
    }

    fn recv_reply(&mut self, buf: &mut [u8]) -> Result<usize> {
        let last = self.requests.last().copied().unwrap_or_default();
        if Frame::decode(&last).is_err() {
            return Ok(0);
        }
        thread::sleep(self.delay);
        let reply = [0x01, 0x03, 0x04, 0x00, 0x0A, 0x00, 0x0B, 0x00, 0x00, 0x00];
        let n = reply.len().min(buf.len());
        buf[..n].copy_from_slice(&reply[..n]);
        Ok(n)
    }
}

/// Test helper: device whose writes always fail
struct UnpluggedDevice {
    sends: usize,
}

impl Channel for UnpluggedDevice {
    fn send_frame(&mut self, _frame: &[u8; FRAME_SIZE]) -> Result<usize> {
        self.sends += 1;
        Err(ProbeError::Send(std::io::ErrorKind::BrokenPipe.into()))
    }

    fn recv_reply(&mut self, _buf: &mut [u8]) -> Result<usize> {
        panic!("receive must not run after a failed send");
    }
}

#[test]
fn test_end_to_end_delayed_reply() -> Result<()> {
    let mut device = DelayedResponder::new(Duration::from_millis(5));
    let options = LoopOptions {
        count: Some(3),
        keep_intervals: true,
        ..Default::default()
    };

    let mut out = Vec::new();
    let mut err = Vec::new();
    let summary = probe_loop(
        &mut device,
        &SystemClock,
        &options,
        &StopFlag::new(),
        &mut out,
        &mut err,
    )?;

    assert_eq!(summary.cycles, 3);
    assert_eq!(summary.errors, 0);
    assert!(err.is_empty());
    for interval in &summary.intervals_ms {
        assert!(*interval >= 5.0, "interval {interval} below reply delay");
    }

    let crc = crc16_modbus(&[0x01, 0x03, 0x00, 0x42, 0x00, 0x02]);
    let [crc_lo, crc_hi] = crc.to_le_bytes();
    for request in &device.requests {
        assert_eq!(
            *request,
            [0x01, 0x03, 0x00, 0x42, 0x00, 0x02, crc_lo, crc_hi]
        );
    }
    assert_eq!(device.requests.len(), 3);

    let out = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines {
        let value = line
            .strip_prefix("send-to-receive interval: ")
            .and_then(|rest| rest.strip_suffix(" ms"))
            .expect("interval line format");
        let (_, decimals) = value.split_once('.').expect("decimal point");
        assert_eq!(decimals.len(), 3);
    }
    Ok(())
}

#[test]
fn test_single_probe_reads_into_reply_buffer() -> Result<()> {
    let mut device = DelayedResponder::new(Duration::from_millis(1));
    let sample = measure_single_probe(&mut device, &SystemClock)?;
    assert_eq!(sample.bytes_received, REPLY_BUFFER_SIZE);
    assert!(sample.interval_ms() >= 1.0);
    Ok(())
}

#[test]
fn test_send_failures_never_print_intervals() -> Result<()> {
    let mut device = UnpluggedDevice { sends: 0 };
    let options = LoopOptions {
        count: Some(5),
        ..Default::default()
    };

    let mut out = Vec::new();
    let mut err = Vec::new();
    let summary = probe_loop(
        &mut device,
        &SystemClock,
        &options,
        &StopFlag::new(),
        &mut out,
        &mut err,
    )?;

    assert_eq!(device.sends, 5);
    assert_eq!(summary.errors, 5);
    assert!(out.is_empty());
    // Reported on every occurrence, no deduplication
    assert_eq!(String::from_utf8(err).unwrap().lines().count(), 5);
    Ok(())
}

#[test]
fn test_config_device_flag() {
    use clap::Parser;

    let config = ProbeConfig::try_parse_from([
        "rtu-probe",
        "--device",
        "/dev/ttyUSB3",
        "--count",
        "10",
        "--summary",
    ])
    .unwrap();
    assert_eq!(config.device, "/dev/ttyUSB3");
    assert_eq!(config.count, Some(10));
    assert!(config.summary);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_device_exits_without_probing() {
    let output = Command::new(env!("CARGO_BIN_EXE_rtu-probe"))
        .args(["--device", "/dev/rtu-probe-missing", "--count", "1"])
        .output()
        .expect("failed to run binary");

    assert_eq!(output.status.code(), Some(EXIT_DEVICE_FAILURE));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("interval"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/dev/rtu-probe-missing"));
}

#[test]
fn test_invalid_config_exit_code() {
    let output = Command::new(env!("CARGO_BIN_EXE_rtu-probe"))
        .args(["--device", "/dev/rtu-probe-missing", "--timeout-ms", "0"])
        .output()
        .expect("failed to run binary");

    assert_eq!(output.status.code(), Some(EXIT_CONFIG_FAILURE));
    assert!(output.stdout.is_empty());
}
