use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::adc::{Adc, AdcChannel};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use embassy_stm32::interrupt::Priority;
use seat_heater_core::button::ButtonEdgeDetector;
use seat_heater_core::controller::{self, HeaterController};
use seat_heater_core::hal::PinId;
use seat_heater_core::seat::SEAT_COUNT;
use static_cell::StaticCell;

use crate::board;
use crate::hw::{ExtiRegistrar, OutputBank, SeatIo, SensorAdc};
use crate::telemetry::TelemetryRecorder;

mod control_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

static BUTTONS: StaticCell<[ButtonEdgeDetector; SEAT_COUNT]> = StaticCell::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let mut config = hal::Config::default();
    // Button executors must be able to preempt the tick's timer.
    config.time_interrupt_priority = Priority::P3;
    let p = hal::init(config);

    let heater_config = board::controller_config();
    let buttons = BUTTONS.init(controller::button_detectors(&heater_config));
    let controller =
        HeaterController::new(heater_config, buttons).expect("invalid heater configuration");

    let sensors = SensorAdc::new(
        Adc::new(p.ADC1),
        [p.PA0.degrade_adc(), p.PA1.degrade_adc()],
    );

    let mut outputs = OutputBank::new();
    outputs.attach(PinId(2), Output::new(p.PB3, Level::Low, Speed::Low));
    outputs.attach(PinId(3), Output::new(p.PB4, Level::Low, Speed::Low));
    outputs.attach(PinId(4), Output::new(p.PB5, Level::Low, Speed::Low));
    outputs.attach(PinId(5), Output::new(p.PB6, Level::Low, Speed::Low));
    outputs.attach(PinId(6), Output::new(p.PB7, Level::Low, Speed::Low));
    outputs.attach(PinId(7), Output::new(p.PB8, Level::Low, Speed::Low));
    outputs.attach(PinId(8), Output::new(p.PB9, Level::Low, Speed::Low));
    outputs.attach(PinId(9), Output::new(p.PB10, Level::Low, Speed::Low));
    controller.release_outputs(&mut outputs);

    let mut registrar = ExtiRegistrar::new([
        (PinId(0), ExtiInput::new(p.PA8, p.EXTI8, Pull::Up)),
        (PinId(1), ExtiInput::new(p.PA9, p.EXTI9, Pull::Up)),
    ]);
    controller
        .arm_buttons(&mut registrar)
        .expect("failed to arm seat buttons");

    for seat in &controller.config().seats {
        defmt::info!(
            "boot: heater {} button {} sensor {}",
            board::mcu_pin(seat.heater_pin),
            board::mcu_pin(seat.button_pin),
            board::sensor_pin(seat.sensor_channel)
        );
    }

    spawner
        .spawn(control_task::run(
            controller,
            SeatIo::new(sensors, outputs),
            TelemetryRecorder::new(),
        ))
        .expect("failed to spawn control task");

    core::future::pending::<()>().await;
}
