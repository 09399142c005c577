use crate::protocol::crc::crc16_modbus;
use crate::protocol::error::{ProtocolError, Result};
use tracing::debug;

/// Size of a request frame on the wire, checksum included
pub const FRAME_SIZE: usize = 8;

/// Size of the buffer a reply is read into
pub const REPLY_BUFFER_SIZE: usize = 10;

/// Bytes covered by the checksum
const PAYLOAD_SIZE: usize = FRAME_SIZE - 2;

/// Read-holding-registers request sent by every probe cycle.
///
/// Multi-byte fields are big-endian on the wire; the trailing checksum is
/// little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub address: u8,
    pub function: u8,
    pub register: u16,
    pub count: u16,
}

impl Frame {
    /// Slave 1, function 0x03, two registers starting at 0x0042
    pub const fn probe() -> Self {
        Self {
            address: 0x01,
            function: 0x03,
            register: 0x0042,
            count: 0x0002,
        }
    }

    /// Payload bytes ahead of the checksum
    pub fn payload(&self) -> [u8; PAYLOAD_SIZE] {
        let [reg_hi, reg_lo] = self.register.to_be_bytes();
        let [cnt_hi, cnt_lo] = self.count.to_be_bytes();
        [self.address, self.function, reg_hi, reg_lo, cnt_hi, cnt_lo]
    }

    pub fn encode(&self) -> [u8; FRAME_SIZE] {
        let payload = self.payload();
        let mut buf = [0u8; FRAME_SIZE];
        buf[..PAYLOAD_SIZE].copy_from_slice(&payload);
        buf[PAYLOAD_SIZE..].copy_from_slice(&checksum_bytes(&payload));
        buf
    }

    /// Parses a request frame, rejecting bad lengths and checksums.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != FRAME_SIZE {
            debug!(
                expected = FRAME_SIZE,
                actual = bytes.len(),
                "Invalid frame size"
            );
            return Err(ProtocolError::InvalidFrameSize {
                expected: FRAME_SIZE,
                actual: bytes.len(),
            });
        }

        let expected = crc16_modbus(&bytes[..PAYLOAD_SIZE]);
        let actual = u16::from_le_bytes([bytes[6], bytes[7]]);
        if expected != actual {
            debug!(expected, actual, "Frame checksum mismatch");
            return Err(ProtocolError::ChecksumMismatch { expected, actual });
        }

        Ok(Self {
            address: bytes[0],
            function: bytes[1],
            register: u16::from_be_bytes([bytes[2], bytes[3]]),
            count: u16::from_be_bytes([bytes[4], bytes[5]]),
        })
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::probe()
    }
}

/// CRC16-Modbus of `payload`, low byte first
pub fn checksum_bytes(payload: &[u8]) -> [u8; 2] {
    crc16_modbus(payload).to_le_bytes()
}
