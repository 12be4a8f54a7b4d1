//! Error definitions for LC709203F driver.

use crate::codec::CrcMismatch;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug)]
pub enum Error<I2cError> {
    /// Underlying I2C transaction failed (probe, write or write-read).
    I2c(I2cError),
    /// Read response failed its CRC-8 check.
    Crc(CrcMismatch),
    /// Bus operation attempted before `begin` or after `end`.
    NotInitialized,
    /// Provided parameter does not fit the target register.
    OutOfRange,
    /// Register held a code with no defined meaning.
    InvalidValue(u16),
}

impl<I2cError> From<CrcMismatch> for Error<I2cError> {
    fn from(e: CrcMismatch) -> Self {
        Error::Crc(e)
    }
}

impl<I2cError: core::fmt::Debug> core::fmt::Display for Error<I2cError> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Error::Crc(m) => write!(
                f,
                "CRC mismatch: expected {:#04x}, received {:#04x}",
                m.expected, m.received
            ),
            Error::NotInitialized => write!(f, "device session not open"),
            Error::OutOfRange => write!(f, "parameter out of range"),
            Error::InvalidValue(v) => write!(f, "undefined register value {:#06x}", v),
        }
    }
}
