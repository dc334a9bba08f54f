//! Radio controller
//!
//! Sequences the sub-GHz transceiver (RF09) and baseband core 0 of the AT86RF215 and
//! keeps a driver-level [`RadioState`] that the upper MAC layer uses to track progress.
//!
//! # Execution model
//! The controller is used from two contexts that never run in parallel:
//! - the foreground, calling the command API
//! - the IRQ line handler, calling [`Radio::handle_interrupt`]
//!
//! Firmware typically keeps the controller in a critical-section mutex shared with the
//! interrupt handler. The blocking commands ([`Radio::rf_on`], [`Radio::tx_enable`] and
//! [`Radio::tx_now`]) spin until the chip raises the interrupt they wait for, and
//! service the IRQ line themselves on every spin, so they make progress even while the
//! interrupt handler is locked out. Once the foreground releases the controller, the
//! deferred interrupt finds the line already cleared and does nothing.
//!
//! # Interrupt dispatch
//! Each interrupt reads the four IRQ status registers in one burst and applies the
//! first matching transition, in this order:
//!
//! | Cause      | New state      | Callback       |
//! |------------|----------------|----------------|
//! | RF09 TRXRDY| `TxEnabled`    | none           |
//! | BBC0 RXFS  | `Receiving`    | start of frame |
//! | BBC0 TXFE  | `TxRxDone`     | end of frame   |
//! | BBC0 RXFE  | `TxRxDone`     | end of frame   |
//!
//! At most one transition is applied per interrupt. Causes latched together with the
//! applied one are dropped, the chip clears its status registers on read.
//!
//! # Important Notes
//! - Frame callbacks run in interrupt context and must not call back into the
//!   blocking commands
//! - A frame boundary without a registered callback is fatal and panics
//! - Without [`Config::spin_limit`] a chip that never answers hangs the blocking
//!   commands forever
//! - `TxRxDone` is shared by the end of a transmission and the end of a reception

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::device::Device;
use crate::error::Error;
use crate::platform::{CaptureCallback, InterruptLine, RadioTimer, Ticks, TimerCallback};
use crate::profile::{RegisterSetting, OFDM_OPTION_1_MCS3};
use crate::registers::{
    BasebandIrq, CenterFrequencyHigh, CenterFrequencyLow, ChannelNumberHigh, ChannelNumberLow,
    ChannelSpacing, ChipReset, EnergyDetectionValue, IrqStatus, PartNumber, PhyControl,
    RadioCommand, RadioIrq, RxFrameLength, Strobe, TransceiverState, TxFrameLength,
    VersionNumber, FRAME_BUFFER_SIZE, RX_FRAME_BUFFER, TX_FRAME_BUFFER,
};

/// Frequency resolution of the center frequency registers, in Hz
const FREQUENCY_STEP_HZ: u64 = 25_000;

/// Driver-level radio state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioState {
    /// Not initialized
    #[default]
    Stopped,
    /// Initialized, transceiver off
    RfOff,
    /// Channel programmed
    FrequencySet,
    /// Going to TRXOFF
    TurningOff,
    /// TXPREP requested for a transmission
    EnablingTx,
    /// Transceiver prepared (TRXRDY received)
    TxEnabled,
    /// Frame buffer being written
    LoadingPacket,
    /// Frame buffer holds the next frame
    PacketLoaded,
    /// TX requested, waiting for the end of the frame
    Transmitting,
    /// RX being requested
    EnablingRx,
    /// Listening for a frame
    Listening,
    /// A frame is being received
    Receiving,
    /// A frame was sent or received
    TxRxDone,
}

/// Tells the interrupt dispatcher whether the scheduler has work to do
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KickScheduler {
    /// A frame callback ran, the scheduler must be woken
    Kick,
    /// Nothing for the scheduler
    DoNotKick,
}

impl KickScheduler {
    /// Returns true for [`KickScheduler::Kick`]
    pub fn is_kick(self) -> bool {
        self == Self::Kick
    }
}

/// Controller configuration
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Register table written by [`Radio::init`]
    pub profile: &'static [RegisterSetting],

    /// Maximum number of spins of a blocking command before it fails with
    /// [`Error::Unresponsive`]. `None` spins forever.
    pub spin_limit: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: OFDM_OPTION_1_MCS3,
            spin_limit: None,
        }
    }
}

/// Metadata of a frame copied out of the receive frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceivedFrame {
    /// Number of bytes copied into the caller's buffer
    pub len: usize,
    /// Energy measured during the frame, in dBm
    pub rssi: i8,
    /// Link quality indicator, not reported by the OFDM PHY
    pub lqi: Option<u8>,
    /// The frame check sequence was valid
    pub crc_ok: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameBoundary {
    Start,
    End,
}

#[derive(Debug, Clone, Copy)]
enum Cause {
    Radio(RadioIrq),
    Baseband(BasebandIrq),
}

impl Cause {
    fn is_latched(self, status: &IrqStatus) -> bool {
        match self {
            Cause::Radio(mask) => status.rf09.intersects(mask),
            Cause::Baseband(mask) => status.bbc0.intersects(mask),
        }
    }
}

#[derive(Debug)]
struct Transition {
    cause: Cause,
    next: RadioState,
    boundary: Option<FrameBoundary>,
}

/// Interrupt transitions, highest priority first
const TRANSITIONS: [Transition; 4] = [
    Transition {
        cause: Cause::Radio(RadioIrq::TRXRDY),
        next: RadioState::TxEnabled,
        boundary: None,
    },
    Transition {
        cause: Cause::Baseband(BasebandIrq::RXFS),
        next: RadioState::Receiving,
        boundary: Some(FrameBoundary::Start),
    },
    Transition {
        cause: Cause::Baseband(BasebandIrq::TXFE),
        next: RadioState::TxRxDone,
        boundary: Some(FrameBoundary::End),
    },
    Transition {
        cause: Cause::Baseband(BasebandIrq::RXFE),
        next: RadioState::TxRxDone,
        boundary: Some(FrameBoundary::End),
    },
];

fn select_transition(status: &IrqStatus) -> Option<&'static Transition> {
    TRANSITIONS
        .iter()
        .find(|transition| transition.cause.is_latched(status))
}

/// Converts a frequency in kHz to the 25kHz steps of the CCF0 registers.
///
/// Truncates toward zero.
pub fn center_frequency_steps(frequency_khz: u32) -> u32 {
    (u64::from(frequency_khz) * 1000 / FREQUENCY_STEP_HZ) as u32
}

/// AT86RF215 radio controller
///
/// Owns the register transport, the radio timer, the IRQ line and the two activity
/// indicators (debug pin and LED).
pub struct Radio<SPI, TIM, IRQ, DBG, LED> {
    device: Device<SPI>,
    timer: TIM,
    irq: IRQ,
    debug_pin: DBG,
    led: LED,
    config: Config,
    state: RadioState,
    start_frame_cb: Option<CaptureCallback>,
    end_frame_cb: Option<CaptureCallback>,
    shadow: IrqStatus,
    deferred_kick: bool,
}

impl<SPI, TIM, IRQ, DBG, LED> Radio<SPI, TIM, IRQ, DBG, LED> {
    /// Creates a stopped controller. Call [`Radio::init`] before anything else.
    pub fn new(spi: SPI, timer: TIM, irq: IRQ, debug_pin: DBG, led: LED, config: Config) -> Self {
        Self {
            device: Device::new(spi),
            timer,
            irq,
            debug_pin,
            led,
            config,
            state: RadioState::Stopped,
            start_frame_cb: None,
            end_frame_cb: None,
            shadow: IrqStatus::default(),
            deferred_kick: false,
        }
    }

    /// Releases the collaborators in constructor order
    pub fn release(self) -> (SPI, TIM, IRQ, DBG, LED) {
        (
            self.device.release(),
            self.timer,
            self.irq,
            self.debug_pin,
            self.led,
        )
    }

    /// Current driver state
    pub fn state(&self) -> RadioState {
        self.state
    }

    /// Interrupt causes read by the last interrupt and not yet consumed
    pub fn shadow(&self) -> IrqStatus {
        self.shadow
    }

    /// Registers the start-of-frame callback, replacing any previous one
    pub fn set_start_frame_callback(&mut self, callback: CaptureCallback) {
        self.start_frame_cb = Some(callback);
    }

    /// Registers the end-of-frame callback, replacing any previous one
    pub fn set_end_frame_callback(&mut self, callback: CaptureCallback) {
        self.end_frame_cb = Some(callback);
    }

    /// Returns [`KickScheduler::Kick`] once if a blocking command serviced an
    /// interrupt that fired a frame callback
    pub fn take_deferred_kick(&mut self) -> KickScheduler {
        if core::mem::take(&mut self.deferred_kick) {
            KickScheduler::Kick
        } else {
            KickScheduler::DoNotKick
        }
    }

    /// The no-op partner of [`Radio::tx_now`]: the chip starts receiving on its own
    /// once listening.
    pub fn rx_now(&mut self) {}
}

impl<SPI, TIM, IRQ, DBG, LED> Radio<SPI, TIM, IRQ, DBG, LED>
where
    TIM: RadioTimer,
{
    /// Forwards the overflow callback to the radio timer
    pub fn set_overflow_callback(&mut self, callback: TimerCallback) {
        self.timer.set_overflow_callback(callback);
    }

    /// Forwards the compare callback to the radio timer
    pub fn set_compare_callback(&mut self, callback: TimerCallback) {
        self.timer.set_compare_callback(callback);
    }

    /// Starts the radio timer
    pub fn start_timer(&mut self, period: Ticks) {
        self.timer.start(period);
    }

    /// Current radio timer value
    pub fn timer_value(&mut self) -> Ticks {
        self.timer.value()
    }

    /// Changes the radio timer period
    pub fn set_timer_period(&mut self, period: Ticks) {
        self.timer.set_period(period);
    }

    /// Current radio timer period
    pub fn timer_period(&mut self) -> Ticks {
        self.timer.period()
    }
}

impl<SPI, TIM, IRQ, DBG, LED> Radio<SPI, TIM, IRQ, DBG, LED>
where
    SPI: SpiDevice,
    TIM: RadioTimer,
    IRQ: InterruptLine,
    DBG: OutputPin,
    LED: OutputPin,
{
    /// Resets the chip and loads the configured modulation profile.
    ///
    /// Clears both frame callbacks. Leaves the controller in [`RadioState::RfOff`].
    pub fn init(&mut self) -> Result<(), Error> {
        self.start_frame_cb = None;
        self.end_frame_cb = None;
        self.shadow = IrqStatus::default();
        self.deferred_kick = false;
        self.state = RadioState::Stopped;

        self.reset()?;
        self.state = RadioState::RfOff;

        self.irq.enable_rising_edge();

        for setting in self.config.profile {
            self.device.write_bytes(setting.address, &[setting.value])?;
        }

        // Drop whatever the reset latched
        self.device.read_register::<IrqStatus>()?;

        debug!("at86rf215: initialized");
        Ok(())
    }

    /// Resets the chip and forces the transceiver to TRXOFF. The driver state is
    /// left untouched.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.device.write_register(ChipReset)?;
        self.strobe(Strobe::TrxOff)
    }

    /// Programs the channel.
    ///
    /// # Arguments
    /// * `channel_spacing` - channel spacing in kHz
    /// * `frequency_0` - center frequency of channel 0 in kHz
    /// * `channel` - channel number, up to 511
    ///
    /// The channel spacing register receives `channel_spacing / 256`. The channel
    /// number high register is only written for channels above 255.
    pub fn set_frequency(
        &mut self,
        channel_spacing: u16,
        frequency_0: u32,
        channel: u16,
    ) -> Result<(), Error> {
        let steps = center_frequency_steps(frequency_0);

        self.device.write_register(ChannelSpacing {
            value: (channel_spacing / 256) as u8,
        })?;
        self.device.write_register(CenterFrequencyLow {
            value: (steps % 256) as u8,
        })?;
        self.device.write_register(CenterFrequencyHigh {
            value: (steps / 256) as u8,
        })?;
        self.device.write_register(ChannelNumberLow {
            value: (channel % 256) as u8,
        })?;
        if channel > 255 {
            self.device.write_register(ChannelNumberHigh { value: 0x01 })?;
        }

        self.set_state(RadioState::FrequencySet);
        Ok(())
    }

    /// Prepares the transceiver and blocks until the chip reports TRXRDY
    pub fn rf_on(&mut self) -> Result<(), Error> {
        self.strobe(Strobe::TxPrep)?;
        self.wait_for(RadioState::TxEnabled)
    }

    /// Turns the transceiver off and clears the activity indicators
    pub fn rf_off(&mut self) -> Result<(), Error> {
        self.set_state(RadioState::TurningOff);
        self.strobe(Strobe::TrxOff)?;
        self.indicators_off()?;
        self.set_state(RadioState::RfOff);
        Ok(())
    }

    /// Copies a frame into the transmit frame buffer.
    ///
    /// The frame length register receives `frame.len()`. When the profile enables the
    /// automatic FCS, the last FCS-sized bytes of `frame` are overwritten by the chip.
    pub fn load_packet(&mut self, frame: &[u8]) -> Result<(), Error> {
        if frame.len() > FRAME_BUFFER_SIZE {
            return Err(Error::FrameTooLong { len: frame.len() });
        }

        self.set_state(RadioState::LoadingPacket);
        self.device.write_register(TxFrameLength {
            len: frame.len() as u16,
        })?;
        self.device.write_bytes(TX_FRAME_BUFFER, frame)?;
        self.set_state(RadioState::PacketLoaded);
        Ok(())
    }

    /// Prepares a transmission and blocks until the chip reports TRXRDY
    pub fn tx_enable(&mut self) -> Result<(), Error> {
        self.set_state(RadioState::EnablingTx);
        self.strobe(Strobe::TxPrep)?;
        self.indicators_on()?;
        self.wait_for(RadioState::TxEnabled)
    }

    /// Sends the loaded frame and blocks until the end of the frame, then turns the
    /// transceiver off
    pub fn tx_now(&mut self) -> Result<(), Error> {
        self.set_state(RadioState::Transmitting);
        self.strobe(Strobe::Tx)?;
        self.wait_for(RadioState::TxRxDone)?;
        self.strobe(Strobe::TrxOff)
    }

    /// Starts listening. Returns immediately, the start-of-frame callback reports
    /// incoming frames.
    pub fn rx_enable(&mut self) -> Result<(), Error> {
        self.set_state(RadioState::EnablingRx);
        self.indicators_on()?;
        self.strobe(Strobe::Rx)?;
        self.set_state(RadioState::Listening);
        Ok(())
    }

    /// Copies the last received frame into `buffer`, truncating it to the buffer length.
    ///
    /// The receive frame buffer is left as is and the transceiver is not re-armed.
    pub fn get_received_frame(&mut self, buffer: &mut [u8]) -> Result<ReceivedFrame, Error> {
        let frame_len: RxFrameLength = self.device.read_register()?;
        let len = usize::from(frame_len.len).min(buffer.len());
        if len > 0 {
            self.device.read_bytes(RX_FRAME_BUFFER, &mut buffer[..len])?;
        }

        let energy: EnergyDetectionValue = self.device.read_register()?;
        let phy: PhyControl = self.device.read_register()?;

        Ok(ReceivedFrame {
            len,
            rssi: energy.dbm,
            lqi: None,
            crc_ok: phy.fcs_ok(),
        })
    }

    /// Reads the chip identification
    pub fn part_number(&mut self) -> Result<(PartNumber, VersionNumber), Error> {
        let part = self.device.read_register()?;
        let version = self.device.read_register()?;
        Ok((part, version))
    }

    /// Reads the transceiver state as seen by the chip
    pub fn chip_state(&mut self) -> Result<TransceiverState, Error> {
        Ok(self.device.read_register()?)
    }

    /// IRQ line handler.
    ///
    /// Returns [`KickScheduler::Kick`] when a frame callback ran.
    ///
    /// # Panics
    /// Panics if a frame boundary is reported while the matching callback is not
    /// registered.
    pub fn handle_interrupt(&mut self) -> Result<KickScheduler, Error> {
        // as close to the edge as possible
        let captured = self.timer.captured_time();

        if !self.irq.is_pending() {
            return Ok(KickScheduler::DoNotKick);
        }
        self.irq.clear_pending();

        self.shadow = self.device.read_register()?;
        trace!(
            "at86rf215: irqs rf09={=u8:#x} bbc0={=u8:#x}",
            self.shadow.rf09.bits(),
            self.shadow.bbc0.bits()
        );

        let Some(transition) = select_transition(&self.shadow) else {
            return Ok(KickScheduler::DoNotKick);
        };

        self.shadow = IrqStatus::default();
        self.set_state(transition.next);

        let callback = match transition.boundary {
            None => return Ok(KickScheduler::DoNotKick),
            Some(FrameBoundary::Start) => self
                .start_frame_cb
                .unwrap_or_else(|| panic!("start-of-frame callback not registered")),
            Some(FrameBoundary::End) => self
                .end_frame_cb
                .unwrap_or_else(|| panic!("end-of-frame callback not registered")),
        };
        callback(captured);

        Ok(KickScheduler::Kick)
    }

    fn wait_for(&mut self, target: RadioState) -> Result<(), Error> {
        let mut spins: u32 = 0;

        loop {
            if self.state == target {
                return Ok(());
            }

            if let Some(limit) = self.config.spin_limit {
                if spins >= limit {
                    warn!("at86rf215: no interrupt while waiting for {}", target);
                    return Err(Error::Unresponsive {
                        waiting_for: target,
                    });
                }
                spins += 1;
            }

            if self.handle_interrupt()?.is_kick() {
                self.deferred_kick = true;
            }
            core::hint::spin_loop();
        }
    }

    fn strobe(&mut self, strobe: Strobe) -> Result<(), Error> {
        trace!("at86rf215: strobe {}", strobe);
        self.device.write_register(RadioCommand { strobe })?;
        Ok(())
    }

    fn set_state(&mut self, state: RadioState) {
        trace!("at86rf215: {} -> {}", self.state, state);
        self.state = state;
    }

    fn indicators_on(&mut self) -> Result<(), Error> {
        self.debug_pin.set_high().map_err(|_| Error::Indicator)?;
        self.led.set_high().map_err(|_| Error::Indicator)
    }

    fn indicators_off(&mut self) -> Result<(), Error> {
        self.debug_pin.set_low().map_err(|_| Error::Indicator)?;
        self.led.set_low().map_err(|_| Error::Indicator)
    }
}
