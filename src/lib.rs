#![no_std]
//! AT86RF215 Radio Driver
//!
//! This crate drives the sub-GHz transceiver of the Microchip AT86RF215 for an IEEE 802.15.4
//! MAC layer. It sequences the chip over SPI, follows its IRQ line and keeps a driver-level
//! radio state the MAC uses to time its slots.
//!
//! # Features
//! - Sub-GHz transceiver (RF09) with baseband core 0
//! - MR-OFDM option 1 profile out of the box, custom register tables supported
//! - Start and end of frame callbacks carrying the captured timer value
//! - Blocking TX sequencing with optional bounded waits
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: SPI register transport
//!   - Typed register reads and writes through `regiface`
//!   - Raw bursts for the frame buffers
//!
//! - [`registers`]: Register definitions for direct hardware access
//!
//! - [`profile`]: Modulation register tables written at init
//!
//! - [`platform`]: Timer and IRQ line interfaces the board provides
//!
//! - [`radio`]: The radio controller, its state machine and the IRQ handler
//!
//! # Usage
//! Operation follows a fixed sequence:
//!
//! 1. Create a [`Radio`] with the SPI device, radio timer, IRQ line and indicator pins
//! 2. [`Radio::init`] to reset the chip and load the modulation profile
//! 3. Register the start and end of frame callbacks
//! 4. [`Radio::set_frequency`] to select the channel
//! 5. Transmit with [`Radio::load_packet`], [`Radio::tx_enable`], [`Radio::tx_now`]
//! 6. Or receive with [`Radio::rx_enable`] and [`Radio::get_received_frame`] once the
//!    end of frame callback fired
//! 7. [`Radio::rf_off`] between operations
//!
//! The IRQ line handler of the board calls [`Radio::handle_interrupt`] and wakes the
//! scheduler when it returns [`KickScheduler::Kick`].
//!
//! # Important Notes
//! - Frame callbacks run in interrupt context
//! - A missing frame callback is fatal once a frame boundary is reported
//! - Blocking commands spin until the chip answers unless a spin limit is configured
//!
//! # Example
//! ```ignore
//! use at86rf215::{Config, Radio};
//!
//! fn on_frame_start(captured: u16) { /* ... */ }
//! fn on_frame_end(captured: u16) { /* ... */ }
//!
//! let mut radio = Radio::new(spi, timer, irq_line, debug_pin, led, Config::default());
//! radio.init()?;
//! radio.set_start_frame_callback(on_frame_start);
//! radio.set_end_frame_callback(on_frame_end);
//!
//! // 863.125MHz, 200kHz spacing, channel 0
//! radio.set_frequency(200, 863_125, 0)?;
//!
//! radio.load_packet(&frame)?;
//! radio.tx_enable()?;
//! radio.tx_now()?;
//! ```

#[macro_use]
mod fmt;

pub mod device;
mod error;
pub mod platform;
pub mod profile;
pub mod radio;
pub mod registers;

pub use device::Device;
pub use error::Error;
pub use platform::*;
pub use profile::RegisterSetting;
pub use radio::{center_frequency_steps, Config, KickScheduler, Radio, RadioState, ReceivedFrame};
pub use registers::*;
