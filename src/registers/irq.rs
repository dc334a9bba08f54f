//! Interrupt status registers
//!
//! The AT86RF215 latches interrupt causes in four status registers, one per
//! transceiver (RF09, RF24) and one per baseband core (BBC0, BBC1). The four
//! registers are contiguous and are read as a single burst.
//!
//! # Important Notes
//! - Reading a status register clears it
//! - Only causes enabled in the matching IRQM register drive the IRQ line
//! - Several causes can be latched by the time the status is read

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister};

bitflags! {
    /// Transceiver interrupt causes (RFn_IRQS)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RadioIrq: u8 {
        /// Wake-up or reset completed
        const WAKEUP = 1 << 0;
        /// Transceiver reached TXPREP after a TXPREP command, or the PLL
        /// settled after a frequency change in TXPREP
        const TRXRDY = 1 << 1;
        /// Energy detection completed
        const EDC = 1 << 2;
        /// Battery low
        const BATLOW = 1 << 3;
        /// Transceiver error (PLL unlock, etc)
        const TRXERR = 1 << 4;
        /// I/Q interface synchronization failure
        const IQIFSF = 1 << 5;
    }
}

bitflags! {
    /// Baseband interrupt causes (BBCn_IRQS)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BasebandIrq: u8 {
        /// Receiver frame start
        const RXFS = 1 << 0;
        /// Receiver frame end
        const RXFE = 1 << 1;
        /// Receiver address match
        const RXAM = 1 << 2;
        /// Receiver extended match
        const RXEM = 1 << 3;
        /// Transmitter frame end
        const TXFE = 1 << 4;
        /// AGC hold
        const AGCH = 1 << 5;
        /// AGC release
        const AGCR = 1 << 6;
        /// Frame buffer level indication
        const FBLI = 1 << 7;
    }
}

/// IRQ status block (addresses: 0x0000 - 0x0003)
///
/// RF09_IRQS, RF24_IRQS, BBC0_IRQS and BBC1_IRQS read in one burst.
#[register(0x0000u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister)]
pub struct IrqStatus {
    /// Sub-GHz transceiver causes
    pub rf09: RadioIrq,
    /// 2.4GHz transceiver causes
    pub rf24: RadioIrq,
    /// Baseband core 0 causes
    pub bbc0: BasebandIrq,
    /// Baseband core 1 causes
    pub bbc1: BasebandIrq,
}

impl IrqStatus {
    /// Returns true when no cause is latched
    pub fn is_empty(&self) -> bool {
        self.rf09.is_empty() && self.rf24.is_empty() && self.bbc0.is_empty() && self.bbc1.is_empty()
    }
}

impl FromByteArray for IrqStatus {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            rf09: RadioIrq::from_bits_retain(bytes[0]),
            rf24: RadioIrq::from_bits_retain(bytes[1]),
            bbc0: BasebandIrq::from_bits_retain(bytes[2]),
            bbc1: BasebandIrq::from_bits_retain(bytes[3]),
        })
    }
}
