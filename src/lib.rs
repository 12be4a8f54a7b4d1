//! LC709203F Rust Driver
//!
//! `no_std` driver for the onsemi LC709203F single-cell fuel gauge. Every register
//! access is a 16-bit word protected by a CRC-8/SMBUS byte; the [`codec`] module
//! builds and checks those frames and [`Lc709203f`] maps named operations onto them.
//! Optional async (`async`), `defmt` and `log` support.

#![no_std]

#[macro_use]
mod fmt;

pub mod codec;
pub mod data_types;
pub mod driver;
pub mod error;
pub mod registers;

pub use codec::CrcMismatch;
pub use data_types::{ChargeReport, Config, InitConfig, InitPolicy};
pub use driver::Lc709203f;
pub use error::Error;
pub use registers::DEFAULT_I2C_ADDRESS;
