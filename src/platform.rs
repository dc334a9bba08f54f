//! Platform collaborators
//!
//! The radio controller does not own a timer or the interrupt pin configuration.
//! Boards provide them through the traits in this module. The debug pin and the
//! radio LED are plain [`embedded_hal::digital::OutputPin`]s.

/// Timer ticks of the radio timer
pub type Ticks = u16;

/// Frame boundary notification, called from interrupt context with the captured time
pub type CaptureCallback = fn(Ticks);

/// Timer overflow or compare notification
pub type TimerCallback = fn();

/// Timer/capture peripheral used to timestamp frame boundaries.
///
/// Callbacks registered here are invoked by the timer's own interrupt handler,
/// never by the radio.
pub trait RadioTimer {
    /// Starts the timer with the given period
    fn start(&mut self, period: Ticks);

    /// Current counter value
    fn value(&mut self) -> Ticks;

    /// Changes the period of a running timer
    fn set_period(&mut self, period: Ticks);

    /// Current period
    fn period(&mut self) -> Ticks;

    /// Registers the callback fired when the counter wraps
    fn set_overflow_callback(&mut self, callback: TimerCallback);

    /// Registers the callback fired on a compare match
    fn set_compare_callback(&mut self, callback: TimerCallback);

    /// Counter value latched by the capture unit on the last IRQ edge
    fn captured_time(&mut self) -> Ticks;
}

/// GPIO line wired to the chip's IRQ output.
///
/// The line may share its interrupt vector with other sources. A line that is
/// not pending when the radio handler runs means the vector fired for another
/// cause.
pub trait InterruptLine {
    /// Configures the pin as an input triggering on the rising edge, clears any
    /// stale pending flag and enables the interrupt
    fn enable_rising_edge(&mut self);

    /// Returns true if an edge was latched and not yet cleared
    fn is_pending(&mut self) -> bool;

    /// Clears the latched edge
    fn clear_pending(&mut self);
}
