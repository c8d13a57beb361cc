use seat_heater_core::config::ControllerConfig;
use seat_heater_core::controller::{HeaterController, button_detectors};
use seat_heater_core::hal::{AdcChannelId, DigitalOutputs, PinId, PinLevel, RawSampleSource};
use seat_heater_core::indicator::IndicatorPattern;
use seat_heater_core::level::HeatLevel;
use seat_heater_core::seat::SeatId;
use seat_heater_core::telemetry::{TelemetryEventKind, TelemetryRing};

const COLD: u16 = 455; // 5 °C
const UNPLUGGED: u16 = 0;

#[test]
fn disconnect_forces_heater_off_until_a_valid_sample() {
    let config = ControllerConfig::default();
    let threshold = usize::from(config.disconnect_zero_samples);
    let buttons = button_detectors(&config);
    let mut controller = HeaterController::new(config, &buttons).unwrap();
    let mut bench = Bench::new([COLD, COLD]);
    let mut telemetry: TelemetryRing = TelemetryRing::new();

    select_high(&buttons[SeatId::Driver.as_index()], &mut controller, &mut bench, &mut telemetry);
    assert!(controller.channel(SeatId::Driver).heater_on);

    bench.raw[0] = UNPLUGGED;
    let mut tick = 10;
    for _ in 1..threshold {
        controller.tick(&mut bench, &mut telemetry, tick);
        tick += 1;
    }
    assert!(
        controller.channel(SeatId::Driver).heater_on,
        "a short run of zero samples is still a reading"
    );

    for _ in 0..5 {
        controller.tick(&mut bench, &mut telemetry, tick);
        tick += 1;
        let state = controller.channel(SeatId::Driver);
        assert!(state.sensor_fault);
        assert!(!state.heater_on);
        assert_eq!(state.current_level, HeatLevel::High);
        assert_eq!(bench.outputs[2], PinLevel::Low);
        assert_eq!(
            controller.seat(SeatId::Driver).indicator(),
            IndicatorPattern::RED
        );
    }

    bench.raw[0] = COLD;
    controller.tick(&mut bench, &mut telemetry, tick);
    let state = controller.channel(SeatId::Driver);
    assert!(!state.sensor_fault);
    assert!(state.heater_on);
    assert_eq!(
        controller.seat(SeatId::Driver).indicator(),
        IndicatorPattern::CYAN
    );

    let faults: Vec<_> = telemetry
        .oldest_first()
        .filter(|record| {
            matches!(
                record.event,
                TelemetryEventKind::SensorFault(_) | TelemetryEventKind::SensorRecovered(_)
            )
        })
        .map(|record| record.event)
        .collect();
    assert_eq!(
        faults,
        [
            TelemetryEventKind::SensorFault(SeatId::Driver),
            TelemetryEventKind::SensorRecovered(SeatId::Driver),
        ],
        "fault edges are reported once each"
    );
}

#[test]
fn fault_on_one_seat_leaves_the_other_heating() {
    let config = ControllerConfig::default();
    let buttons = button_detectors(&config);
    let mut controller = HeaterController::new(config, &buttons).unwrap();
    let mut bench = Bench::new([COLD, COLD]);
    let mut telemetry: TelemetryRing = TelemetryRing::new();

    select_high(&buttons[0], &mut controller, &mut bench, &mut telemetry);
    select_high(&buttons[1], &mut controller, &mut bench, &mut telemetry);

    bench.raw[1] = UNPLUGGED;
    for tick in 0..8 {
        controller.tick(&mut bench, &mut telemetry, 100 + tick);
    }

    assert!(controller.channel(SeatId::Driver).heater_on);
    assert!(!controller.channel(SeatId::Driver).sensor_fault);
    assert!(!controller.channel(SeatId::Passenger).heater_on);
    assert!(controller.channel(SeatId::Passenger).sensor_fault);
    assert_eq!(bench.outputs[2], PinLevel::High);
    assert_eq!(bench.outputs[3], PinLevel::Low);
}

#[test]
fn fault_indicator_can_be_disabled() {
    let config = ControllerConfig {
        fault_indicator: None,
        ..ControllerConfig::default()
    };
    let buttons = button_detectors(&config);
    let mut controller = HeaterController::new(config, &buttons).unwrap();
    let mut bench = Bench::new([UNPLUGGED, COLD]);
    let mut telemetry: TelemetryRing = TelemetryRing::new();

    for level in [PinLevel::Low; 3] {
        buttons[0].on_raw_edge(level);
    }
    for tick in 0..4 {
        controller.tick(&mut bench, &mut telemetry, tick);
    }

    assert!(controller.channel(SeatId::Driver).sensor_fault);
    assert_eq!(
        controller.seat(SeatId::Driver).indicator(),
        IndicatorPattern::GREEN
    );
}

fn select_high(
    button: &seat_heater_core::button::ButtonEdgeDetector,
    controller: &mut HeaterController<'_>,
    bench: &mut Bench,
    telemetry: &mut TelemetryRing,
) {
    for _ in 0..3 {
        for level in [PinLevel::Low; 3] {
            button.on_raw_edge(level);
        }
        for level in [PinLevel::High; 3] {
            button.on_raw_edge(level);
        }
        controller.tick(bench, telemetry, 0);
    }
}

struct Bench {
    raw: [u16; 2],
    outputs: [PinLevel; 10],
}

impl Bench {
    fn new(raw: [u16; 2]) -> Self {
        Self {
            raw,
            outputs: [PinLevel::Low; 10],
        }
    }
}

impl RawSampleSource for Bench {
    fn read_raw_sample(&mut self, channel: AdcChannelId) -> u16 {
        self.raw[usize::from(channel.0)]
    }
}

impl DigitalOutputs for Bench {
    fn set_digital_output(&mut self, pin: PinId, level: PinLevel) {
        self.outputs[usize::from(pin.0)] = level;
    }
}
