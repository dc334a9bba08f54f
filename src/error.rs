//! Driver error type

use regiface::errors::Error as RegifaceError;

use crate::radio::RadioState;

/// Errors returned by the radio controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// SPI communication with the chip failed
    Bus,

    /// A register read returned a value the driver cannot decode
    Deserialization,

    /// Driving the debug pin or the radio LED failed
    Indicator,

    /// The frame does not fit the 2047 byte transmit frame buffer
    FrameTooLong {
        /// Length of the rejected frame
        len: usize,
    },

    /// A bounded wait ran out of spins before the chip raised the expected
    /// interrupt. Only returned when [`Config::spin_limit`](crate::Config) is set.
    Unresponsive {
        /// State the driver was waiting for
        waiting_for: RadioState,
    },
}

impl From<RegifaceError> for Error {
    fn from(err: RegifaceError) -> Self {
        match err {
            RegifaceError::DeserializationError => Self::Deserialization,
            _ => Self::Bus,
        }
    }
}
