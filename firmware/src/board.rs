//! Reference board wiring.
//!
//! The controller only knows logical pin numbers. This catalog ties each of
//! them to the STM32G0 pin that carries it so boot logs and warnings can name
//! real hardware.

use seat_heater_core::config::ControllerConfig;
use seat_heater_core::hal::{AdcChannelId, PinId};

/// Metadata describing how a logical line is routed on the board.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PinAssignment {
    pub id: PinId,
    pub mcu_pin: &'static str,
    pub role: &'static str,
}

impl PinAssignment {
    const fn new(id: u8, mcu_pin: &'static str, role: &'static str) -> Self {
        Self {
            id: PinId(id),
            mcu_pin,
            role,
        }
    }
}

/// Compile-time catalog of every digital line.
pub const PIN_MAP: [PinAssignment; 10] = [
    PinAssignment::new(0, "PA8", "driver button"),
    PinAssignment::new(1, "PA9", "passenger button"),
    PinAssignment::new(2, "PB3", "driver heater"),
    PinAssignment::new(3, "PB4", "passenger heater"),
    PinAssignment::new(4, "PB5", "driver led red"),
    PinAssignment::new(5, "PB6", "driver led green"),
    PinAssignment::new(6, "PB7", "driver led blue"),
    PinAssignment::new(7, "PB8", "passenger led red"),
    PinAssignment::new(8, "PB9", "passenger led green"),
    PinAssignment::new(9, "PB10", "passenger led blue"),
];

/// MCU pins feeding each ADC channel, indexed by channel number.
pub const SENSOR_PINS: [&str; 2] = ["PA0", "PA1"];

/// Number of logical digital lines on the board.
pub const LINE_COUNT: usize = PIN_MAP.len();

/// Looks up the MCU pin name for a logical line.
pub fn mcu_pin(pin: PinId) -> &'static str {
    PIN_MAP
        .iter()
        .find(|assignment| assignment.id == pin)
        .map_or("?", |assignment| assignment.mcu_pin)
}

/// Looks up the MCU pin name for an ADC channel.
pub fn sensor_pin(channel: AdcChannelId) -> &'static str {
    SENSOR_PINS.get(usize::from(channel.0)).copied().unwrap_or("?")
}

/// Controller configuration matching [`PIN_MAP`].
pub fn controller_config() -> ControllerConfig {
    ControllerConfig::default()
}
