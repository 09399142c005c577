//! RTU Probe - Modbus-RTU serial round-trip latency diagnostic tool
//!
//! This library sends a fixed read-holding-registers request over a serial
//! line, waits for any reply bytes, and reports the time between the two.

pub mod probe;
pub mod protocol;
