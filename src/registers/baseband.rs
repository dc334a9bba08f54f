//! Baseband core 0 registers (BBC0)
//!
//! The baseband core owns the PHY configuration, the frame lengths and the two
//! frame buffers. Frame buffers are plain memory ranges accessed with SPI bursts.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Start of the BBC0 receive frame buffer
pub const RX_FRAME_BUFFER: u16 = 0x2000;

/// Start of the BBC0 transmit frame buffer
pub const TX_FRAME_BUFFER: u16 = 0x2800;

/// Capacity of each frame buffer in bytes
pub const FRAME_BUFFER_SIZE: usize = 2047;

const FRAME_LENGTH_MASK: u16 = 0x07FF;

/// PHY control register (address: 0x0301)
///
/// # Important Notes
/// - Bits 1:0 select the PHY (0 = off, 1 = MR-FSK, 2 = MR-OFDM, 3 = MR-O-QPSK)
/// - FCSOK is read-only and reflects the last received frame
#[register(0x0301u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct PhyControl {
    /// Raw register value
    pub value: u8,
}

impl PhyControl {
    /// Baseband enabled
    pub const BBEN: u8 = 1 << 2;
    /// FCS type, set for a 16-bit FCS
    pub const FCST: u8 = 1 << 3;
    /// Transmitter appends the FCS automatically
    pub const TXAFCS: u8 = 1 << 4;
    /// The FCS of the last received frame was valid
    pub const FCSOK: u8 = 1 << 5;
    /// Frames with an invalid FCS are dropped
    pub const FCSFE: u8 = 1 << 6;

    /// Returns true if the FCS of the last received frame checked
    pub fn fcs_ok(&self) -> bool {
        self.value & Self::FCSOK != 0
    }
}

/// Receive frame length (addresses: 0x0304 - 0x0305)
///
/// Length of the last received frame, FCS included.
#[register(0x0304u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, Default)]
pub struct RxFrameLength {
    /// Frame length in bytes (11 bits)
    pub len: u16,
}

/// Transmit frame length (addresses: 0x0306 - 0x0307)
///
/// Must be written before the TX command. With automatic FCS the length includes
/// the FCS bytes appended by the chip.
#[register(0x0306u16)]
#[derive(Debug, Clone, Copy, WritableRegister, Default)]
pub struct TxFrameLength {
    /// Frame length in bytes (11 bits)
    pub len: u16,
}

impl FromByteArray for PhyControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for PhyControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for RxFrameLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            len: u16::from_le_bytes(bytes) & FRAME_LENGTH_MASK,
        })
    }
}

impl ToByteArray for TxFrameLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok((self.len & FRAME_LENGTH_MASK).to_le_bytes())
    }
}
