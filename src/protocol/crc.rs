/// Reflected Modbus polynomial (0x8005 bit-reversed)
const POLYNOMIAL: u16 = 0xA001;

/// Computes the CRC16 (Modbus variant) of `data`.
///
/// Initial value 0xFFFF, reflected polynomial 0xA001, no final XOR. The
/// result goes on the wire low byte first.
pub fn crc16_modbus(data: &[u8]) -> u16 {
    let mut crc = 0xFFFFu16;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ POLYNOMIAL;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}
