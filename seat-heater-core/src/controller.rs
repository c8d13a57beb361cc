//! Per-seat coordination of the control loop.
//!
//! A [`SeatCoordinator`] owns one instance of every control component for
//! its seat and runs them in a fixed order once per periodic tick:
//!
//! 1. drain the button mailbox and advance the level,
//! 2. sample the seat temperature,
//! 3. decide the heater state,
//! 4. render the indicator pattern,
//! 5. write heater and indicator outputs.
//!
//! The only state shared with interrupt context is the button detector,
//! which the coordinator borrows. [`HeaterController`] groups both seats;
//! neither seat ever reads or writes the other's state.

use crate::button::ButtonEdgeDetector;
use crate::config::{ConfigError, ControllerConfig, SeatPins};
use crate::hal::{
    DigitalInputs, DigitalOutputs, EdgeInterruptRegistrar, PinLevel, RawSampleSource,
};
use crate::hysteresis::HysteresisActuator;
use crate::indicator::{self, IndicatorPattern};
use crate::level::LevelTable;
use crate::seat::{ALL_SEATS, SEAT_COUNT, SeatChannel, SeatId};
use crate::sensor::SensorReader;
use crate::telemetry::{TelemetryEventKind, TelemetrySink, TimestampMicros};

/// Builds one detector per seat with the polarity from `config`.
///
/// The firmware places the result in static storage before handing it to
/// [`HeaterController::new`].
#[must_use]
pub const fn button_detectors(config: &ControllerConfig) -> [ButtonEdgeDetector; SEAT_COUNT] {
    [
        ButtonEdgeDetector::new(config.seats[0].button_pressed_level),
        ButtonEdgeDetector::new(config.seats[1].button_pressed_level),
    ]
}

/// Control loop for a single seat.
pub struct SeatCoordinator<'a> {
    channel: SeatChannel,
    pins: SeatPins,
    levels: LevelTable,
    fault_indicator: Option<IndicatorPattern>,
    button: &'a ButtonEdgeDetector,
    sensor: SensorReader,
    actuator: HysteresisActuator,
    indicator: IndicatorPattern,
}

impl<'a> SeatCoordinator<'a> {
    /// Creates the coordinator for `seat` in its power-on state.
    #[must_use]
    pub fn new(seat: SeatId, config: &ControllerConfig, button: &'a ButtonEdgeDetector) -> Self {
        let pins = *config.seat(seat);
        Self {
            channel: SeatChannel::new(seat),
            pins,
            levels: config.levels,
            fault_indicator: config.fault_indicator,
            button,
            sensor: SensorReader::new(pins.sensor_channel, config.disconnect_zero_samples),
            actuator: HysteresisActuator::new(),
            indicator: IndicatorPattern::NONE,
        }
    }

    #[must_use]
    pub const fn id(&self) -> SeatId {
        self.channel.id
    }

    /// Copy of the seat state after the most recent tick.
    #[must_use]
    pub const fn channel(&self) -> SeatChannel {
        self.channel
    }

    /// Indicator pattern written by the most recent tick.
    #[must_use]
    pub const fn indicator(&self) -> IndicatorPattern {
        self.indicator
    }

    #[must_use]
    pub const fn pins(&self) -> &SeatPins {
        &self.pins
    }

    #[must_use]
    pub const fn button(&self) -> &'a ButtonEdgeDetector {
        self.button
    }

    /// Runs one control cycle and returns the resulting seat state.
    pub fn tick<IO, T>(
        &mut self,
        io: &mut IO,
        telemetry: &mut T,
        now: TimestampMicros,
    ) -> SeatChannel
    where
        IO: RawSampleSource + DigitalOutputs,
        T: TelemetrySink,
    {
        let seat = self.channel.id;

        if self.button.take_advance() {
            self.channel.current_level = self.channel.current_level.advance();
            telemetry.record(
                TelemetryEventKind::LevelChanged(seat, self.channel.current_level),
                now,
            );
        }

        let sample = self.sensor.sample_temperature(io);
        if let Ok(temperature_c) = sample {
            self.channel.last_temperature_c = Some(temperature_c);
        }

        let definition = self.levels.definition(self.channel.current_level);
        let was_faulted = self.actuator.sensor_fault();
        let was_on = self.actuator.heater_on();
        let heater_on = self.actuator.update(&definition, sample);
        let sensor_fault = self.actuator.sensor_fault();

        match (was_faulted, sensor_fault) {
            (false, true) => {
                telemetry.record(TelemetryEventKind::SensorFault(seat), now);
            }
            (true, false) => {
                telemetry.record(TelemetryEventKind::SensorRecovered(seat), now);
            }
            _ => {}
        }
        if heater_on != was_on {
            telemetry.record(TelemetryEventKind::HeaterSwitched(seat, heater_on), now);
        }

        self.channel.heater_on = heater_on;
        self.channel.sensor_fault = sensor_fault;

        self.indicator = self.indicator_pattern();

        io.set_digital_output(self.pins.heater_pin, PinLevel::from_on(heater_on));
        self.pins.indicator.drive(io, self.indicator);

        self.channel
    }

    fn indicator_pattern(&self) -> IndicatorPattern {
        let level = self.channel.current_level;
        match self.fault_indicator {
            Some(fault) if self.channel.sensor_fault && !level.is_off() => fault,
            _ => indicator::render(&self.levels, level),
        }
    }
}

/// Both seat coordinators plus the configuration they were built from.
pub struct HeaterController<'a> {
    config: ControllerConfig,
    seats: [SeatCoordinator<'a>; SEAT_COUNT],
}

impl<'a> HeaterController<'a> {
    /// Validates `config` and builds a coordinator per seat.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration is inconsistent or a
    /// detector's polarity disagrees with its seat's wiring.
    pub fn new(
        config: ControllerConfig,
        buttons: &'a [ButtonEdgeDetector; SEAT_COUNT],
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        for seat in ALL_SEATS {
            let expected = config.seat(seat).button_pressed_level;
            if buttons[seat.as_index()].pressed_level() != expected {
                return Err(ConfigError::ButtonPolarityMismatch(seat));
            }
        }

        let seats =
            ALL_SEATS.map(|seat| SeatCoordinator::new(seat, &config, &buttons[seat.as_index()]));
        Ok(Self { config, seats })
    }

    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub const fn seat(&self, seat: SeatId) -> &SeatCoordinator<'a> {
        &self.seats[seat.as_index()]
    }

    #[must_use]
    pub const fn channel(&self, seat: SeatId) -> SeatChannel {
        self.seats[seat.as_index()].channel()
    }

    /// Runs one periodic tick: driver first, then passenger.
    pub fn tick<IO, T>(&mut self, io: &mut IO, telemetry: &mut T, now: TimestampMicros)
    where
        IO: RawSampleSource + DigitalOutputs,
        T: TelemetrySink,
    {
        for seat in &mut self.seats {
            seat.tick(io, telemetry, now);
        }
    }

    /// Drives every output to its safe state (heaters and indicators off).
    pub fn release_outputs<O: DigitalOutputs>(&self, outputs: &mut O) {
        for pin in self.config.seats.iter().flat_map(SeatPins::outputs) {
            outputs.set_digital_output(pin, PinLevel::Low);
        }
    }
}

impl HeaterController<'static> {
    /// Seeds each detector with the current button level and arms the
    /// seat's edge interrupt at its configured priority.
    ///
    /// Call once at boot, before the first tick.
    ///
    /// # Errors
    ///
    /// Propagates the first registration failure; seats registered before it
    /// stay armed.
    pub fn arm_buttons<R>(&self, registrar: &mut R) -> Result<(), R::Error>
    where
        R: EdgeInterruptRegistrar + DigitalInputs,
    {
        for coordinator in &self.seats {
            let pins = coordinator.pins();
            let button = coordinator.button();
            button.seed(registrar.get_digital_input(pins.button_pin));
            registrar.register_edge_interrupt(pins.button_pin, pins.button_priority, button)?;
        }
        Ok(())
    }
}
