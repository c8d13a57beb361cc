//! Board configuration handed to the controller at initialization.
//!
//! Pin assignments, interrupt priorities and level settings are plain data
//! here rather than compiled-in constants, so the firmware and tests can
//! describe different boards with the same control logic.

use core::{fmt, time::Duration};

use heapless::Vec;

use crate::hal::{AdcChannelId, InterruptPriority, PinId, PinLevel};
use crate::indicator::{IndicatorPattern, IndicatorPins};
use crate::level::{HeatLevel, LevelTable};
use crate::seat::{SEAT_COUNT, SeatId};
use crate::sensor::DEFAULT_DISCONNECT_ZERO_SAMPLES;

/// Periodic control tick used by the reference board.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);

/// Button interrupt priority used by the reference board.
pub const DEFAULT_BUTTON_PRIORITY: InterruptPriority = InterruptPriority(1);

/// Upper bound on distinct output lines across both seats.
const MAX_OUTPUT_PINS: usize = 4 * SEAT_COUNT;

/// Wiring of one seat.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SeatPins {
    pub sensor_channel: AdcChannelId,
    pub button_pin: PinId,
    pub button_priority: InterruptPriority,
    /// Level the button input reads while held.
    pub button_pressed_level: PinLevel,
    pub heater_pin: PinId,
    pub indicator: IndicatorPins,
}

impl SeatPins {
    /// Output lines driven for this seat, heater first.
    pub fn outputs(&self) -> impl Iterator<Item = PinId> {
        core::iter::once(self.heater_pin).chain(self.indicator.wired().map(|(_, pin)| pin))
    }
}

/// Full controller configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControllerConfig {
    /// Indexed by [`SeatId::as_index`].
    pub seats: [SeatPins; SEAT_COUNT],
    pub levels: LevelTable,
    pub tick_period: Duration,
    /// Consecutive zero conversions that mean the sensor is unplugged.
    pub disconnect_zero_samples: u8,
    /// Pattern shown while a seat's sensor fault is latched and its level is
    /// not Off. `None` keeps showing the level pattern.
    pub fault_indicator: Option<IndicatorPattern>,
}

/// Reason a [`ControllerConfig`] was rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    DuplicateOutputPin(PinId),
    ButtonPinIsOutput(PinId),
    DuplicateButtonPin(PinId),
    DuplicateSensorChannel(AdcChannelId),
    ButtonPolarityMismatch(SeatId),
    InvalidBand(HeatLevel),
    ZeroDisconnectThreshold,
    ZeroTickPeriod,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateOutputPin(pin) => write!(f, "{pin} driven by two outputs"),
            ConfigError::ButtonPinIsOutput(pin) => write!(f, "button {pin} is also an output"),
            ConfigError::DuplicateButtonPin(pin) => write!(f, "{pin} shared by both buttons"),
            ConfigError::DuplicateSensorChannel(channel) => {
                write!(f, "{channel} shared by both sensors")
            }
            ConfigError::ButtonPolarityMismatch(seat) => {
                write!(f, "{seat} button detector disagrees with configured polarity")
            }
            ConfigError::InvalidBand(level) => write!(f, "invalid target/tolerance for {level}"),
            ConfigError::ZeroDisconnectThreshold => {
                f.write_str("disconnect threshold must be at least one sample")
            }
            ConfigError::ZeroTickPeriod => f.write_str("tick period must be non-zero"),
        }
    }
}

impl ControllerConfig {
    /// Wiring for `seat`.
    #[must_use]
    pub const fn seat(&self, seat: SeatId) -> &SeatPins {
        &self.seats[seat.as_index()]
    }

    /// Checks the configuration for conflicting assignments.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period.is_zero() {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.disconnect_zero_samples == 0 {
            return Err(ConfigError::ZeroDisconnectThreshold);
        }
        for (level, setting) in self.levels.settings() {
            if !setting.band.is_valid() {
                return Err(ConfigError::InvalidBand(level));
            }
        }

        let [driver, passenger] = &self.seats;
        if driver.sensor_channel == passenger.sensor_channel {
            return Err(ConfigError::DuplicateSensorChannel(driver.sensor_channel));
        }
        if driver.button_pin == passenger.button_pin {
            return Err(ConfigError::DuplicateButtonPin(driver.button_pin));
        }

        let mut outputs: Vec<PinId, MAX_OUTPUT_PINS> = Vec::new();
        for pin in self.seats.iter().flat_map(SeatPins::outputs) {
            if outputs.contains(&pin) {
                return Err(ConfigError::DuplicateOutputPin(pin));
            }
            outputs
                .push(pin)
                .map_err(|_| ConfigError::DuplicateOutputPin(pin))?;
        }
        for seat in &self.seats {
            if outputs.contains(&seat.button_pin) {
                return Err(ConfigError::ButtonPinIsOutput(seat.button_pin));
            }
        }

        Ok(())
    }
}

impl Default for ControllerConfig {
    /// Logical wiring of the reference board: buttons on pins 0-1, heaters
    /// on 2-3, driver RGB on 4-6, passenger RGB on 7-9, sensors on ADC 0-1.
    fn default() -> Self {
        Self {
            seats: [
                SeatPins {
                    sensor_channel: AdcChannelId(0),
                    button_pin: PinId(0),
                    button_priority: DEFAULT_BUTTON_PRIORITY,
                    button_pressed_level: PinLevel::Low,
                    heater_pin: PinId(2),
                    indicator: IndicatorPins::rgb(PinId(4), PinId(5), PinId(6)),
                },
                SeatPins {
                    sensor_channel: AdcChannelId(1),
                    button_pin: PinId(1),
                    button_priority: DEFAULT_BUTTON_PRIORITY,
                    button_pressed_level: PinLevel::Low,
                    heater_pin: PinId(3),
                    indicator: IndicatorPins::rgb(PinId(7), PinId(8), PinId(9)),
                },
            ],
            levels: LevelTable::default(),
            tick_period: DEFAULT_TICK_PERIOD,
            disconnect_zero_samples: DEFAULT_DISCONNECT_ZERO_SAMPLES,
            fault_indicator: Some(IndicatorPattern::RED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ControllerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_shared_output_lines() {
        let mut config = ControllerConfig::default();
        config.seats[1].heater_pin = PinId(5);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateOutputPin(PinId(5)))
        );
    }

    #[test]
    fn rejects_button_wired_to_an_output() {
        let mut config = ControllerConfig::default();
        config.seats[0].button_pin = PinId(9);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ButtonPinIsOutput(PinId(9)))
        );
    }

    #[test]
    fn rejects_shared_sensor_channel_and_button() {
        let mut config = ControllerConfig::default();
        config.seats[1].sensor_channel = AdcChannelId(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateSensorChannel(AdcChannelId(0)))
        );

        let mut config = ControllerConfig::default();
        config.seats[1].button_pin = PinId(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateButtonPin(PinId(0)))
        );
    }

    #[test]
    fn rejects_bad_levels_and_timing() {
        let mut config = ControllerConfig::default();
        config.levels.medium.band.tolerance_c = -0.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBand(HeatLevel::Medium))
        );

        let mut config = ControllerConfig::default();
        config.levels.low.band.target_c = -10.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBand(HeatLevel::Low))
        );

        let config = ControllerConfig {
            tick_period: Duration::ZERO,
            ..ControllerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickPeriod));

        let config = ControllerConfig {
            disconnect_zero_samples: 0,
            ..ControllerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDisconnectThreshold));
    }

    #[test]
    fn seat_outputs_list_heater_then_indicator() {
        let config = ControllerConfig::default();
        let mut outputs = config.seat(SeatId::Passenger).outputs();
        assert_eq!(outputs.next(), Some(PinId(3)));
        assert_eq!(outputs.next(), Some(PinId(7)));
        assert_eq!(outputs.count(), 2);
    }
}
