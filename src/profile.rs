//! Modulation profiles
//!
//! A profile is an ordered table of raw register settings written to the chip by
//! [`Radio::init`](crate::Radio::init). Each entry names the datasheet register it
//! programs so a table can be audited against the datasheet line by line.

/// One register write of a modulation profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSetting {
    /// Datasheet register name
    pub name: &'static str,
    /// Register address
    pub address: u16,
    /// Value written to the register
    pub value: u8,
}

impl RegisterSetting {
    const fn new(name: &'static str, address: u16, value: u8) -> Self {
        Self {
            name,
            address,
            value,
        }
    }
}

/// Sub-GHz MR-OFDM option 1, MCS3 (IEEE 802.15.4g)
///
/// - 16-bit FCS, appended automatically on transmit
/// - RF09 interrupts: TRXRDY
/// - BBC0 interrupts: RXFS, RXFE, TXFE
/// - IRQ line active high, masked causes still latched in IRQS
pub const OFDM_OPTION_1_MCS3: &[RegisterSetting] = &[
    RegisterSetting::new("RF_CFG", 0x0006, 0x08),
    RegisterSetting::new("RF09_IRQM", 0x0100, 0x02),
    RegisterSetting::new("RF24_IRQM", 0x0200, 0x00),
    RegisterSetting::new("BBC0_IRQM", 0x0300, 0x13),
    RegisterSetting::new("BBC1_IRQM", 0x0400, 0x00),
    RegisterSetting::new("RF09_RXBWC", 0x0109, 0x19),
    RegisterSetting::new("RF09_RXDFE", 0x010A, 0x83),
    RegisterSetting::new("RF09_AGCC", 0x010B, 0x11),
    RegisterSetting::new("RF09_AGCS", 0x010C, 0x37),
    RegisterSetting::new("RF09_EDD", 0x010F, 0x7A),
    RegisterSetting::new("RF09_TXCUTC", 0x0112, 0x0B),
    RegisterSetting::new("RF09_TXDFE", 0x0113, 0x83),
    RegisterSetting::new("RF09_PAC", 0x0114, 0x7C),
    RegisterSetting::new("BBC0_PC", 0x0301, 0x1E),
    RegisterSetting::new("BBC0_OFDMPHRTX", 0x030C, 0x03),
    RegisterSetting::new("BBC0_OFDMC", 0x030E, 0x00),
    RegisterSetting::new("BBC0_OFDMSW", 0x030F, 0x10),
];
