//! Collaborator capabilities consumed by the control loop.
//!
//! Register-level ADC/GPIO drivers live outside this crate. Firmware and test
//! doubles implement these traits so the same sequencing logic runs against
//! real peripherals on the MCU and against mocks on the host.

use core::fmt;

/// Logical identifier for a digital pin, as enumerated by the board config.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PinId(pub u8);

/// Logical identifier for an analog input channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AdcChannelId(pub u8);

/// Interrupt priority as understood by the platform. Lower values preempt
/// higher ones.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct InterruptPriority(pub u8);

impl InterruptPriority {
    /// Returns `true` when `self` may preempt code running at `other`.
    #[must_use]
    pub const fn preempts(self, other: InterruptPriority) -> bool {
        self.0 < other.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pin{}", self.0)
    }
}

impl fmt::Display for AdcChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adc{}", self.0)
    }
}

/// Electrical level of a digital line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum PinLevel {
    #[default]
    Low,
    High,
}

impl PinLevel {
    /// Maps an on/off request onto an active-high line.
    #[must_use]
    pub const fn from_on(on: bool) -> Self {
        if on { PinLevel::High } else { PinLevel::Low }
    }

    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, PinLevel::High)
    }
}

/// Bounded, non-blocking access to raw ADC conversions.
pub trait RawSampleSource {
    /// Returns the latest raw conversion for `channel`, nominally `0..=4095`.
    fn read_raw_sample(&mut self, channel: AdcChannelId) -> u16;
}

/// Output side of the GPIO collaborator.
pub trait DigitalOutputs {
    /// Drives `pin` to `level`. Writing the current level again is harmless.
    fn set_digital_output(&mut self, pin: PinId, level: PinLevel);
}

/// Input side of the GPIO collaborator.
pub trait DigitalInputs {
    /// Samples the current level of `pin`.
    fn get_digital_input(&self, pin: PinId) -> PinLevel;
}

/// Callback invoked from interrupt context for every raw edge on a pin.
///
/// Implementations must be safe to call while the periodic task is
/// preempted at an arbitrary instruction boundary.
pub trait EdgeHandler: Sync {
    /// Feeds the level sampled right after the edge.
    fn on_edge(&self, level: PinLevel);

    /// Returns `true` once the recent samples agree on a single level, so the
    /// interrupt side can stop re-sampling the pin.
    fn is_settled(&self) -> bool {
        true
    }
}

/// Registers edge-triggered interrupt handlers with the platform.
pub trait EdgeInterruptRegistrar {
    /// Platform-specific failure reported when a pin cannot be armed.
    type Error;

    /// Arms both edges of `pin` at `priority` and routes them to `handler`.
    ///
    /// Called exactly once per button pin during initialization.
    ///
    /// # Errors
    ///
    /// Returns the platform error when the pin is unknown, already claimed, or
    /// the priority cannot be honoured.
    fn register_edge_interrupt(
        &mut self,
        pin: PinId,
        priority: InterruptPriority,
        handler: &'static dyn EdgeHandler,
    ) -> Result<(), Self::Error>;
}
