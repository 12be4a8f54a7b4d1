//! Word transaction framing for the LC709203F.
//!
//! Every word access is protected by a CRC-8/SMBUS byte computed over the
//! full SMBus frame, including the address bytes the transport puts on the
//! wire itself:
//!
//! ```text
//! read:  [addr<<1 | W] [cmd] [addr<<1 | R] [lo] [hi] [crc]   (device sends lo, hi, crc)
//! write: [addr<<1 | W] [cmd] [lo] [hi] [crc]                 (host sends cmd, lo, hi, crc)
//! ```
//!
//! The functions here are pure; the driver performs the bus exchange.

/// CRC-8/SMBUS polynomial: x^8 + x^2 + x + 1.
pub const CRC8_POLYNOMIAL: u8 = 0x07;

/// Number of bytes the device returns for a word read (lo, hi, crc).
pub const READ_REPLY_LEN: usize = 3;
/// Number of bytes placed on the wire for a word write (cmd, lo, hi, crc).
pub const WRITE_FRAME_LEN: usize = 4;

/// CRC-8/SMBUS: polynomial 0x07, initial value 0x00, no reflection, no output xor.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if (crc & 0x80) != 0 {
                crc = (crc << 1) ^ CRC8_POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Checksum computed locally did not match the one received from the device.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CrcMismatch {
    /// CRC computed over the frame.
    pub expected: u8,
    /// CRC byte sent by the device.
    pub received: u8,
}

/// Write-direction address byte used as CRC seed.
const fn write_address(address: u8) -> u8 {
    address << 1
}

/// Build the wire bytes for writing `value` to `command`.
///
/// The address byte takes part in the checksum but is not returned: the
/// transport addresses the device out of band.
pub fn encode_write(address: u8, command: u8, value: u16) -> [u8; WRITE_FRAME_LEN] {
    let [lo, hi] = value.to_le_bytes();
    let crc = crc8(&[write_address(address), command, lo, hi]);
    [command, lo, hi, crc]
}

/// Validate a word-read reply and extract the little-endian value.
pub fn decode_read(address: u8, command: u8, reply: [u8; READ_REPLY_LEN]) -> Result<u16, CrcMismatch> {
    let [lo, hi, received] = reply;
    let wr = write_address(address);
    let expected = crc8(&[wr, command, wr | 0x01, lo, hi]);
    if expected != received {
        return Err(CrcMismatch { expected, received });
    }
    Ok(u16::from_le_bytes([lo, hi]))
}
