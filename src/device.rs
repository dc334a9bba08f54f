//! AT86RF215 Register Transport
//!
//! This module provides the SPI register interface of the AT86RF215. It supports both
//! synchronous and asynchronous operations.
//!
//! Every SPI access starts with a two byte, big-endian command header:
//! - Bit 15: access mode (1 = write, 0 = read)
//! - Bit 14: reserved, always 0
//! - Bits 13:0: register address
//!
//! The data bytes follow the header. The chip auto-increments the address for every
//! further byte, which is how the frame buffers and the IRQ status block are read
//! and written in one burst.
//!
//! # Example
//! ```ignore
//! use at86rf215::{Device, PartNumber};
//!
//! // Create device with SPI interface
//! let spi = // ... SPI implementation
//! let mut device = Device::new(spi);
//!
//! // Read a register
//! let part: PartNumber = device.read_register()?;
//!
//! // Write to the transmit frame buffer
//! device.write_bytes(0x2800, &[0x01, 0x02, 0x03])?;
//! ```

use core::convert::Infallible;

use regiface::{errors::Error as RegifaceError, ByteArray, ReadableRegister, WritableRegister};

const WRITE_ACCESS: u16 = 0x8000;
const ADDRESS_MASK: u16 = 0x3FFF;

/// Builds the command header for a read access at `address`
pub(crate) fn read_header(address: u16) -> [u8; 2] {
    (address & ADDRESS_MASK).to_be_bytes()
}

/// Builds the command header for a write access at `address`
pub(crate) fn write_header(address: u16) -> [u8; 2] {
    ((address & ADDRESS_MASK) | WRITE_ACCESS).to_be_bytes()
}

/// Main device interface for the AT86RF215.
///
/// This struct wraps an SPI interface and provides methods to access the chip registers
/// and frame buffers. It supports both synchronous operations through the embedded-hal
/// traits and asynchronous operations through embedded-hal-async.
pub struct Device<SPI> {
    spi: SPI,
}

impl<SPI> Device<SPI> {
    /// Creates a new Device instance wrapping the provided SPI interface.
    ///
    /// # Arguments
    /// * `spi` - An SPI interface implementing the required embedded-hal traits
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Device<SPI>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    /// Reads a register value from the device.
    ///
    /// Registers wider than one byte are read as a burst starting at the register address.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    /// * `RegifaceError::DeserializationError` - Failed to parse register value
    pub fn read_register<R>(&mut self) -> Result<R, RegifaceError>
    where
        R: ReadableRegister<IdType = u16>,
    {
        let header = read_header(R::id());
        let mut raw_value = R::Array::new();

        self.spi
            .transaction(&mut [
                embedded_hal::spi::Operation::Write(header.as_slice()),
                embedded_hal::spi::Operation::Read(raw_value.as_mut()),
            ])
            .map_err(|_| RegifaceError::BusError)?;

        R::from_bytes(raw_value).map_err(|_| RegifaceError::DeserializationError)
    }

    /// Writes a value to a device register.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn write_register<R>(&mut self, register: R) -> Result<(), RegifaceError>
    where
        R: WritableRegister<IdType = u16, Error = Infallible>,
    {
        let header = write_header(R::id());
        let raw_value = register.to_bytes().unwrap_or_else(|never| match never {});

        self.spi
            .transaction(&mut [
                embedded_hal::spi::Operation::Write(header.as_slice()),
                embedded_hal::spi::Operation::Write(raw_value.as_ref()),
            ])
            .map_err(|_| RegifaceError::BusError)
    }

    /// Writes a burst of bytes starting at `address`.
    ///
    /// Used for the frame buffers and for the raw settings of a modulation profile.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn write_bytes(&mut self, address: u16, bytes: &[u8]) -> Result<(), RegifaceError> {
        let header = write_header(address);

        self.spi
            .transaction(&mut [
                embedded_hal::spi::Operation::Write(header.as_slice()),
                embedded_hal::spi::Operation::Write(bytes),
            ])
            .map_err(|_| RegifaceError::BusError)
    }

    /// Reads a burst of bytes starting at `address`.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn read_bytes(&mut self, address: u16, bytes: &mut [u8]) -> Result<(), RegifaceError> {
        let header = read_header(address);

        self.spi
            .transaction(&mut [
                embedded_hal::spi::Operation::Write(header.as_slice()),
                embedded_hal::spi::Operation::Read(bytes),
            ])
            .map_err(|_| RegifaceError::BusError)
    }
}

impl<SPI> Device<SPI>
where
    SPI: embedded_hal_async::spi::SpiDevice,
{
    /// Asynchronously reads a register value from the device.
    ///
    /// This is the async version of [`read_register`](Device::read_register).
    pub async fn read_register_async<R>(&mut self) -> Result<R, RegifaceError>
    where
        R: ReadableRegister<IdType = u16>,
    {
        let header = read_header(R::id());
        let mut raw_value = R::Array::new();

        self.spi
            .transaction(&mut [
                embedded_hal_async::spi::Operation::Write(header.as_slice()),
                embedded_hal_async::spi::Operation::Read(raw_value.as_mut()),
            ])
            .await
            .map_err(|_| RegifaceError::BusError)?;

        R::from_bytes(raw_value).map_err(|_| RegifaceError::DeserializationError)
    }

    /// Asynchronously writes a value to a device register.
    ///
    /// This is the async version of [`write_register`](Device::write_register).
    pub async fn write_register_async<R>(&mut self, register: R) -> Result<(), RegifaceError>
    where
        R: WritableRegister<IdType = u16, Error = Infallible>,
    {
        let header = write_header(R::id());
        let raw_value = register.to_bytes().unwrap_or_else(|never| match never {});

        self.spi
            .transaction(&mut [
                embedded_hal_async::spi::Operation::Write(header.as_slice()),
                embedded_hal_async::spi::Operation::Write(raw_value.as_ref()),
            ])
            .await
            .map_err(|_| RegifaceError::BusError)
    }

    /// Asynchronously writes a burst of bytes starting at `address`.
    ///
    /// This is the async version of [`write_bytes`](Device::write_bytes).
    pub async fn write_bytes_async(
        &mut self,
        address: u16,
        bytes: &[u8],
    ) -> Result<(), RegifaceError> {
        let header = write_header(address);

        self.spi
            .transaction(&mut [
                embedded_hal_async::spi::Operation::Write(header.as_slice()),
                embedded_hal_async::spi::Operation::Write(bytes),
            ])
            .await
            .map_err(|_| RegifaceError::BusError)
    }

    /// Asynchronously reads a burst of bytes starting at `address`.
    ///
    /// This is the async version of [`read_bytes`](Device::read_bytes).
    pub async fn read_bytes_async(
        &mut self,
        address: u16,
        bytes: &mut [u8],
    ) -> Result<(), RegifaceError> {
        let header = read_header(address);

        self.spi
            .transaction(&mut [
                embedded_hal_async::spi::Operation::Write(header.as_slice()),
                embedded_hal_async::spi::Operation::Read(bytes),
            ])
            .await
            .map_err(|_| RegifaceError::BusError)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::vec;
    use crate::registers::{ChannelNumberLow, IrqStatus, PartNumber, RadioCommand, Strobe};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    #[test]
    fn headers_carry_access_mode_in_bit_15() {
        assert_eq!(read_header(0x0110), [0x01, 0x10]);
        assert_eq!(write_header(0x0103), [0x81, 0x03]);
        assert_eq!(write_header(0x2800), [0xA8, 0x00]);
        // bit 14 is reserved and never set
        assert_eq!(read_header(0xFFFF), [0x3F, 0xFF]);
    }

    #[test]
    fn write_register_sends_header_then_value() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x81, 0x03]),
            SpiTransaction::write_vec(vec![0x03]),
            SpiTransaction::transaction_end(),
        ];
        let mut device = Device::new(SpiMock::new(&expectations));

        device
            .write_register(RadioCommand {
                strobe: Strobe::TxPrep,
            })
            .unwrap();

        device.release().done();
    }

    #[test]
    fn read_register_bursts_the_irq_status_block() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x00, 0x00]),
            SpiTransaction::read_vec(vec![0x02, 0x00, 0x11, 0x00]),
            SpiTransaction::transaction_end(),
        ];
        let mut device = Device::new(SpiMock::new(&expectations));

        let status: IrqStatus = device.read_register().unwrap();
        assert_eq!(status.rf09.bits(), 0x02);
        assert_eq!(status.bbc0.bits(), 0x11);

        device.release().done();
    }

    #[test]
    fn unknown_part_number_fails_to_deserialize() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x00, 0x0D]),
            SpiTransaction::read_vec(vec![0x99]),
            SpiTransaction::transaction_end(),
        ];
        let mut device = Device::new(SpiMock::new(&expectations));

        let result = device.read_register::<PartNumber>();
        assert!(matches!(result, Err(RegifaceError::DeserializationError)));

        device.release().done();
    }

    #[test]
    fn frame_buffer_burst_write() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0xA8, 0x00]),
            SpiTransaction::write_vec(vec![0xDE, 0xAD, 0xBE, 0xEF]),
            SpiTransaction::transaction_end(),
        ];
        let mut device = Device::new(SpiMock::new(&expectations));

        device.write_bytes(0x2800, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();

        device.release().done();
    }

    #[tokio::test]
    async fn async_transport_uses_the_same_framing() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x81, 0x07]),
            SpiTransaction::write_vec(vec![0x2A]),
            SpiTransaction::transaction_end(),
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x20, 0x00]),
            SpiTransaction::read_vec(vec![0x01, 0x02]),
            SpiTransaction::transaction_end(),
        ];
        let mut device = Device::new(SpiMock::new(&expectations));

        device
            .write_register_async(ChannelNumberLow { value: 0x2A })
            .await
            .unwrap();

        let mut frame = [0u8; 2];
        device.read_bytes_async(0x2000, &mut frame).await.unwrap();
        assert_eq!(frame, [0x01, 0x02]);

        device.release().done();
    }
}
