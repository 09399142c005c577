//! Modbus-RTU request framing for the probe

pub mod crc;
pub mod error;
pub mod frame;

pub use crc::crc16_modbus;
pub use error::{ProtocolError, Result as ProtocolResult};
pub use frame::{checksum_bytes, Frame, FRAME_SIZE, REPLY_BUFFER_SIZE};
