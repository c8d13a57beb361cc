//! Adapters that bind the `seat-heater-core` collaborator traits to the
//! STM32G0 peripherals.
//!
//! The controller addresses lines by logical [`PinId`]; this module owns the
//! concrete embassy drivers and routes each logical id to its pin.

use embassy_stm32::gpio::{Level, Output};
use seat_heater_core::hal::{AdcChannelId, DigitalOutputs, PinId, PinLevel, RawSampleSource};

use crate::board::{self, LINE_COUNT};

pub mod buttons;
pub mod sensors;

pub use buttons::ExtiRegistrar;
pub use sensors::SensorAdc;

/// Push-pull outputs indexed by logical pin id.
pub struct OutputBank {
    lines: [Option<Output<'static>>; LINE_COUNT],
}

impl OutputBank {
    pub const fn new() -> Self {
        Self {
            lines: [const { None }; LINE_COUNT],
        }
    }

    /// Routes `pin` to `output`, replacing any previous driver.
    pub fn attach(&mut self, pin: PinId, output: Output<'static>) {
        match self.lines.get_mut(usize::from(pin.0)) {
            Some(slot) => *slot = Some(output),
            None => defmt::warn!("hw: no slot for output pin {}", pin.0),
        }
    }
}

impl DigitalOutputs for OutputBank {
    fn set_digital_output(&mut self, pin: PinId, level: PinLevel) {
        let Some(output) = self
            .lines
            .get_mut(usize::from(pin.0))
            .and_then(Option::as_mut)
        else {
            defmt::warn!("hw: write to unattached pin {} ({})", pin.0, board::mcu_pin(pin));
            return;
        };
        output.set_level(match level {
            PinLevel::High => Level::High,
            PinLevel::Low => Level::Low,
        });
    }
}

/// Everything the periodic tick touches: seat sensors plus output lines.
pub struct SeatIo {
    sensors: SensorAdc,
    outputs: OutputBank,
}

impl SeatIo {
    pub fn new(sensors: SensorAdc, outputs: OutputBank) -> Self {
        Self { sensors, outputs }
    }
}

impl RawSampleSource for SeatIo {
    fn read_raw_sample(&mut self, channel: AdcChannelId) -> u16 {
        self.sensors.read_raw_sample(channel)
    }
}

impl DigitalOutputs for SeatIo {
    fn set_digital_output(&mut self, pin: PinId, level: PinLevel) {
        self.outputs.set_digital_output(pin, level);
    }
}

/// Converts an embassy GPIO level into the controller's representation.
pub fn pin_level(level: Level) -> PinLevel {
    match level {
        Level::High => PinLevel::High,
        Level::Low => PinLevel::Low,
    }
}
