use crate::probe::error::{ProbeError, Result};
use crate::protocol::FRAME_SIZE;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;
use tracing::{debug, warn};

/// Byte-level request/reply exchange with a device
pub trait Channel {
    /// Write one request frame, returning how many bytes the device accepted
    fn send_frame(&mut self, frame: &[u8; FRAME_SIZE]) -> Result<usize>;

    /// Read whatever reply bytes arrive before the read timeout.
    ///
    /// Returns `Ok(0)` when the timeout elapses with nothing received.
    fn recv_reply(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// Line settings for a serial device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    pub path: String,
    pub baud_rate: u32,
    pub timeout: Duration,
}

/// Serial device in raw 8N1 mode.
///
/// The device is closed when the channel is dropped.
pub struct SerialChannel {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialChannel {
    /// Open and configure the device named in `settings`
    pub fn open(settings: &SerialSettings) -> Result<Self> {
        debug!(device = %settings.path, baud = settings.baud_rate, "Opening serial device");
        let mut port = serialport::new(&settings.path, settings.baud_rate)
            .timeout(settings.timeout)
            .open()
            .map_err(|e| {
                warn!(device = %settings.path, error = %e, "Failed to open serial device");
                ProbeError::Open {
                    path: settings.path.clone(),
                    source: e,
                }
            })?;

        configure(port.as_mut(), settings)?;
        debug!(device = %settings.path, "Serial device ready");

        Ok(Self {
            port,
            name: settings.path.clone(),
        })
    }

    /// Wrap an already configured port
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        let name = port.name().unwrap_or_else(|| "<unnamed>".to_string());
        Self { port, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Apply baud rate, 8N1 framing, no flow control and the read timeout.
///
/// Every setting is re-applied explicitly so a failure names the one that
/// the driver refused.
pub fn configure(port: &mut dyn SerialPort, settings: &SerialSettings) -> Result<()> {
    let fail = |setting: &'static str| {
        move |e: serialport::Error| {
            warn!(setting, error = %e, "Failed to configure serial device");
            ProbeError::Configure { setting, source: e }
        }
    };

    port.set_baud_rate(settings.baud_rate)
        .map_err(fail("baud rate"))?;
    port.set_data_bits(DataBits::Eight).map_err(fail("data bits"))?;
    port.set_parity(Parity::None).map_err(fail("parity"))?;
    port.set_stop_bits(StopBits::One).map_err(fail("stop bits"))?;
    port.set_flow_control(FlowControl::None)
        .map_err(fail("flow control"))?;
    port.set_timeout(settings.timeout).map_err(fail("read timeout"))?;

    debug!(
        baud = settings.baud_rate,
        timeout_ms = settings.timeout.as_millis() as u64,
        "Serial line configured"
    );
    Ok(())
}

impl Channel for SerialChannel {
    fn send_frame(&mut self, frame: &[u8; FRAME_SIZE]) -> Result<usize> {
        let bytes_sent = self.port.write(frame).map_err(ProbeError::Send)?;
        if bytes_sent == frame.len() {
            // Wait until the frame has left the UART
            self.port.flush().map_err(ProbeError::Send)?;
        }
        debug!(bytes_sent, "Frame sent");
        Ok(bytes_sent)
    }

    fn recv_reply(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.port.read(buf) {
            Ok(bytes_received) => {
                debug!(bytes_received, "Reply received");
                Ok(bytes_received)
            }
            Err(e) if e.kind() == ErrorKind::TimedOut => {
                debug!("Reply read timed out");
                Ok(0)
            }
            Err(e) => Err(ProbeError::Receive(e)),
        }
    }
}

impl Drop for SerialChannel {
    fn drop(&mut self) {
        debug!(device = %self.name, "Closing serial device");
    }
}


#[cfg(test)]
pub use tests::MockChannel;
