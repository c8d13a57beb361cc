//! Edge-interrupt plumbing for the seat buttons.
//!
//! Every button is an [`ExtiInput`] serviced by a task on an
//! [`InterruptExecutor`]. The executor's NVIC priority comes from the seat
//! configuration, so button handling preempts the thread-mode control tick.
//! After an edge the task keeps sampling the pin at a short interval until
//! the debouncer's history agrees on one level.

use embassy_executor::{InterruptExecutor, SendSpawner};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_time::{Duration, Timer};
use seat_heater_core::hal::{
    DigitalInputs, EdgeHandler, EdgeInterruptRegistrar, InterruptPriority, PinId, PinLevel,
};
use seat_heater_core::seat::SEAT_COUNT;

use super::pin_level;
use crate::board;
use crate::irq::{BUTTON_EXECUTOR_SLOTS, PrioritySlots, RegistrationError};

/// Spacing between follow-up samples while a press is still bouncing.
const DEBOUNCE_RESAMPLE_INTERVAL: Duration = Duration::from_millis(5);

static BUTTON_EXECUTOR_A: InterruptExecutor = InterruptExecutor::new();
static BUTTON_EXECUTOR_B: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SPI1() {
    unsafe { BUTTON_EXECUTOR_A.on_interrupt() }
}

#[interrupt]
unsafe fn I2C1() {
    unsafe { BUTTON_EXECUTOR_B.on_interrupt() }
}

/// Maps a configured priority onto the two-bit NVIC levels.
pub fn nvic_priority(priority: InterruptPriority) -> Option<Priority> {
    match priority.0 {
        0 => Some(Priority::P0),
        1 => Some(Priority::P1),
        2 => Some(Priority::P2),
        3 => Some(Priority::P3),
        _ => None,
    }
}

fn start_executor(slot: usize, priority: Priority) -> SendSpawner {
    if slot == 0 {
        interrupt::SPI1.set_priority(priority);
        BUTTON_EXECUTOR_A.start(interrupt::SPI1)
    } else {
        interrupt::I2C1.set_priority(priority);
        BUTTON_EXECUTOR_B.start(interrupt::I2C1)
    }
}

/// Owns the button inputs until they are handed to their interrupt tasks.
pub struct ExtiRegistrar {
    inputs: [(PinId, Option<ExtiInput<'static>>); SEAT_COUNT],
    slots: PrioritySlots,
    spawners: [Option<SendSpawner>; BUTTON_EXECUTOR_SLOTS],
}

impl ExtiRegistrar {
    pub fn new(inputs: [(PinId, ExtiInput<'static>); SEAT_COUNT]) -> Self {
        Self {
            inputs: inputs.map(|(pin, input)| (pin, Some(input))),
            slots: PrioritySlots::new(),
            spawners: [None; BUTTON_EXECUTOR_SLOTS],
        }
    }

    fn slot_for(&mut self, pin: PinId) -> Result<usize, RegistrationError> {
        let index = self
            .inputs
            .iter()
            .position(|(candidate, _)| *candidate == pin)
            .ok_or(RegistrationError::UnknownPin(pin))?;
        if self.inputs[index].1.is_none() {
            return Err(RegistrationError::AlreadyRegistered(pin));
        }
        Ok(index)
    }

    fn spawner(
        &mut self,
        priority: InterruptPriority,
    ) -> Result<SendSpawner, RegistrationError> {
        let nvic =
            nvic_priority(priority).ok_or(RegistrationError::PriorityNotAboveTick(priority))?;
        let claim = self.slots.claim(priority)?;
        if claim.fresh {
            self.spawners[claim.index] = Some(start_executor(claim.index, nvic));
        }
        self.spawners[claim.index].ok_or(RegistrationError::NoExecutorSlot(priority))
    }
}

impl DigitalInputs for ExtiRegistrar {
    /// Inputs already handed to a task read as released (pull-up idle).
    fn get_digital_input(&self, pin: PinId) -> PinLevel {
        self.inputs
            .iter()
            .find(|(candidate, _)| *candidate == pin)
            .and_then(|(_, input)| input.as_ref())
            .map_or(PinLevel::High, |input| pin_level(input.get_level()))
    }
}

impl EdgeInterruptRegistrar for ExtiRegistrar {
    type Error = RegistrationError;

    fn register_edge_interrupt(
        &mut self,
        pin: PinId,
        priority: InterruptPriority,
        handler: &'static dyn EdgeHandler,
    ) -> Result<(), Self::Error> {
        let index = self.slot_for(pin)?;
        let spawner = self.spawner(priority)?;
        let Some(input) = self.inputs[index].1.take() else {
            return Err(RegistrationError::AlreadyRegistered(pin));
        };

        spawner
            .spawn(button_task(input, handler))
            .map_err(|_| RegistrationError::SpawnFailed(pin))?;

        defmt::info!(
            "buttons: armed {} ({}) at priority {}",
            pin.0,
            board::mcu_pin(pin),
            priority.0
        );
        Ok(())
    }
}

#[embassy_executor::task(pool_size = 2)]
async fn button_task(mut input: ExtiInput<'static>, handler: &'static dyn EdgeHandler) -> ! {
    loop {
        input.wait_for_any_edge().await;
        loop {
            handler.on_edge(pin_level(input.get_level()));
            if handler.is_settled() {
                break;
            }
            Timer::after(DEBOUNCE_RESAMPLE_INTERVAL).await;
        }
    }
}
