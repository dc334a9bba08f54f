//! Common registers
//!
//! Registers shared by both transceivers and both baseband cores: the chip reset
//! and the part/version identification used during board bring-up.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Value of `RF_RST` that resets the whole chip
const CHIP_RESET_COMMAND: u8 = 0x07;

/// Chip reset register (address: 0x0005)
///
/// Writing the reset command resets every register of the chip to its reset value,
/// both transceivers end up in TRXOFF.
///
/// # Important Notes
/// - All configuration, including the modulation profile, is lost
/// - The IRQ line signals WAKEUP once the reset has completed
#[register(0x0005u16)]
#[derive(Debug, Clone, Copy, WritableRegister, Default)]
pub struct ChipReset;

/// Error type for part number conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidPartNumber(pub u8);

/// Part number register (address: 0x000D)
///
/// Identifies which member of the AT86RF215 family is fitted.
#[register(0x000Du16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PartNumber {
    /// AT86RF215: sub-GHz and 2.4GHz transceiver with baseband cores
    At86rf215 = 0x34,
    /// AT86RF215IQ: I/Q radio only, no baseband cores
    At86rf215Iq = 0x35,
    /// AT86RF215M: sub-GHz only
    At86rf215M = 0x36,
}

/// Version number register (address: 0x000E)
#[register(0x000Eu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct VersionNumber {
    /// Silicon revision
    pub value: u8,
}

impl ToByteArray for ChipReset {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([CHIP_RESET_COMMAND])
    }
}

impl FromByteArray for PartNumber {
    type Error = InvalidPartNumber;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        match bytes[0] {
            0x34 => Ok(Self::At86rf215),
            0x35 => Ok(Self::At86rf215Iq),
            0x36 => Ok(Self::At86rf215M),
            invalid => Err(InvalidPartNumber(invalid)),
        }
    }
}

impl FromByteArray for VersionNumber {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}
