//! Sub-GHz transceiver registers (RF09)
//!
//! This module contains the RF09 registers the driver touches:
//! - Command strobes and the transceiver state
//! - Channel spacing, center frequency and channel number
//! - Energy detection result
//!
//! Frequencies are programmed in 25kHz steps. The effective channel frequency is
//! `CCF0 + CN * CS`, all three in 25kHz units.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Transceiver command codes written to RF09_CMD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Strobe {
    /// No operation
    Nop = 0x0,
    /// Go to SLEEP
    Sleep = 0x1,
    /// Go to TRXOFF
    TrxOff = 0x2,
    /// Prepare for transmission or reception, raises TRXRDY
    TxPrep = 0x3,
    /// Start transmitting the frame buffer content
    Tx = 0x4,
    /// Start listening
    Rx = 0x5,
    /// Reset the transceiver, registers keep their values
    Reset = 0x7,
}

/// Transceiver command register (address: 0x0103)
///
/// Writing a [`Strobe`] triggers the matching state transition immediately.
#[register(0x0103u16)]
#[derive(Debug, Clone, Copy, WritableRegister)]
pub struct RadioCommand {
    /// Command to execute
    pub strobe: Strobe,
}

/// Error type for transceiver state conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidTransceiverState(pub u8);

/// Transceiver state register (address: 0x0102)
///
/// The chip's own view of the transceiver state, independent of the driver state.
#[register(0x0102u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransceiverState {
    /// Transceiver off, SPI active
    TrxOff = 0x2,
    /// Transceiver prepared, PLL locked
    TxPrep = 0x3,
    /// Transmitting
    Tx = 0x4,
    /// Receiving or listening
    Rx = 0x5,
    /// State transition in progress
    Transition = 0x6,
    /// Transceiver reset in progress
    Reset = 0x7,
}

/// Channel spacing register (address: 0x0104)
#[register(0x0104u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct ChannelSpacing {
    /// Channel spacing in 25kHz steps
    pub value: u8,
}

/// Channel center frequency F0, low byte (address: 0x0105)
#[register(0x0105u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct CenterFrequencyLow {
    /// Bits 7:0 of F0 in 25kHz steps
    pub value: u8,
}

/// Channel center frequency F0, high byte (address: 0x0106)
#[register(0x0106u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct CenterFrequencyHigh {
    /// Bits 15:8 of F0 in 25kHz steps
    pub value: u8,
}

/// Channel number, low byte (address: 0x0107)
#[register(0x0107u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct ChannelNumberLow {
    /// Bits 7:0 of the channel number
    pub value: u8,
}

/// Channel number, high bit and channel mode (address: 0x0108)
///
/// # Important Notes
/// - Writing this register applies the new channel settings
/// - Bit 0 is bit 8 of the channel number, bits 7:6 select the channel mode
#[register(0x0108u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct ChannelNumberHigh {
    /// Raw register value
    pub value: u8,
}

/// Energy detection value register (address: 0x0110)
///
/// Result of the last energy detection, updated at the end of every received frame.
#[register(0x0110u16)]
#[derive(Debug, Clone, Copy, ReadableRegister)]
pub struct EnergyDetectionValue {
    /// Receiver energy in dBm, 127 if no measurement is available
    pub dbm: i8,
}

impl ToByteArray for RadioCommand {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.strobe as u8])
    }
}

impl FromByteArray for TransceiverState {
    type Error = InvalidTransceiverState;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        match bytes[0] & 0x07 {
            0x2 => Ok(Self::TrxOff),
            0x3 => Ok(Self::TxPrep),
            0x4 => Ok(Self::Tx),
            0x5 => Ok(Self::Rx),
            0x6 => Ok(Self::Transition),
            0x7 => Ok(Self::Reset),
            invalid => Err(InvalidTransceiverState(invalid)),
        }
    }
}

macro_rules! byte_register {
    ($($name:ident),+) => {
        $(
            impl FromByteArray for $name {
                type Error = Infallible;
                type Array = [u8; 1];

                fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
                    Ok(Self { value: bytes[0] })
                }
            }

            impl ToByteArray for $name {
                type Error = Infallible;
                type Array = [u8; 1];

                fn to_bytes(self) -> Result<Self::Array, Self::Error> {
                    Ok([self.value])
                }
            }
        )+
    };
}

byte_register!(
    ChannelSpacing,
    CenterFrequencyLow,
    CenterFrequencyHigh,
    ChannelNumberLow,
    ChannelNumberHigh
);

impl FromByteArray for EnergyDetectionValue {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            dbm: bytes[0] as i8,
        })
    }
}
