//! Register definitions for the AT86RF215
//! Generated from the AT86RF215 datasheet register summary

mod baseband;
mod common;
mod irq;
mod rf;

pub use baseband::*;
pub use common::*;
pub use irq::*;
pub use rf::*;
