//! On/off heater control with a dead band around the level target.

use crate::level::LevelDefinition;
use crate::sensor::SensorError;

/// Decides the heater state for one cycle.
///
/// Off always yields `false`. Below the band the heater runs, above it the
/// heater stops, and inside the band (edges included) `previous` is kept so
/// the output does not chatter around the target.
#[must_use]
pub fn decide(definition: &LevelDefinition, temperature_c: f32, previous: bool) -> bool {
    let Some(band) = definition.band else {
        return false;
    };

    if temperature_c < band.lower_c() {
        true
    } else if temperature_c > band.upper_c() {
        false
    } else {
        previous
    }
}

/// Per-seat actuator state: the last heater decision and the fault latch.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct HysteresisActuator {
    heater_on: bool,
    sensor_fault: bool,
}

impl HysteresisActuator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            heater_on: false,
            sensor_fault: false,
        }
    }

    #[must_use]
    pub const fn heater_on(&self) -> bool {
        self.heater_on
    }

    #[must_use]
    pub const fn sensor_fault(&self) -> bool {
        self.sensor_fault
    }

    /// Applies one fresh sample and returns the new heater state.
    ///
    /// A failed sample forces the heater off and latches the fault; the latch
    /// is released by the next successful sample, which is then evaluated
    /// from a heater-off starting point.
    pub fn update(
        &mut self,
        definition: &LevelDefinition,
        sample: Result<f32, SensorError>,
    ) -> bool {
        match sample {
            Ok(temperature_c) => {
                self.sensor_fault = false;
                self.heater_on = decide(definition, temperature_c, self.heater_on);
            }
            Err(SensorError::Disconnected) => {
                self.sensor_fault = true;
                self.heater_on = false;
            }
        }
        self.heater_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{HeatLevel, LevelTable};

    fn low() -> LevelDefinition {
        LevelTable::default().definition(HeatLevel::Low)
    }

    #[test]
    fn off_never_heats() {
        let off = LevelDefinition::OFF;
        assert!(!decide(&off, -40.0, true));
        assert!(!decide(&off, 0.0, false));
    }

    #[test]
    fn heats_below_and_stops_above_the_band() {
        let low = low();
        assert!(decide(&low, 22.9, false));
        assert!(!decide(&low, 27.1, true));
    }

    #[test]
    fn dead_band_retains_previous_state() {
        let low = low();
        for temperature in [23.0, 24.5, 25.0, 26.9, 27.0] {
            assert!(decide(&low, temperature, true));
            assert!(!decide(&low, temperature, false));
        }
    }

    #[test]
    fn repeated_in_band_samples_never_toggle() {
        let low = low();
        let mut actuator = HysteresisActuator::new();
        assert!(actuator.update(&low, Ok(20.0)));

        for _ in 0..32 {
            assert!(actuator.update(&low, Ok(25.5)));
        }
    }

    #[test]
    fn disconnect_forces_off_and_latches() {
        let low = low();
        let mut actuator = HysteresisActuator::new();
        assert!(actuator.update(&low, Ok(10.0)));

        assert!(!actuator.update(&low, Err(SensorError::Disconnected)));
        assert!(actuator.sensor_fault());
        assert!(!actuator.update(&low, Err(SensorError::Disconnected)));
        assert!(actuator.sensor_fault());

        assert!(actuator.update(&low, Ok(10.0)));
        assert!(!actuator.sensor_fault());
    }

    #[test]
    fn recovery_inside_the_band_stays_off() {
        let low = low();
        let mut actuator = HysteresisActuator::new();
        actuator.update(&low, Ok(10.0));
        actuator.update(&low, Err(SensorError::Disconnected));

        assert!(!actuator.update(&low, Ok(25.0)));
    }

    #[test]
    fn fault_applies_even_when_off() {
        let mut actuator = HysteresisActuator::new();
        actuator.update(&LevelDefinition::OFF, Err(SensorError::Disconnected));
        assert!(actuator.sensor_fault());
        assert!(!actuator.heater_on());
    }
}
