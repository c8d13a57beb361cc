#![no_std]

// Seat-heater control logic shared by the firmware and host tests.
//
// Everything here stays free of MCU specifics: the firmware supplies the
// ADC, GPIO and interrupt plumbing through the traits in `hal`.

pub mod button;
pub mod config;
pub mod controller;
pub mod hal;
pub mod hysteresis;
pub mod indicator;
pub mod level;
pub mod seat;
pub mod sensor;
pub mod telemetry;
