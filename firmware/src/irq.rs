//! Interrupt priority bookkeeping for the button executors.
//!
//! Each distinct button priority gets its own interrupt executor. The
//! Cortex-M0+ NVIC only has four levels and the periodic tick's timer sits on
//! the lowest, so buttons must be configured strictly above it.

use core::fmt;

use heapless::Vec;
use seat_heater_core::hal::{InterruptPriority, PinId};

/// Priority levels implemented by the NVIC.
pub const NVIC_LEVELS: u8 = 4;

/// Priority of the time-driver interrupt that paces the control tick.
pub const TICK_TIMER_PRIORITY: InterruptPriority = InterruptPriority(NVIC_LEVELS - 1);

/// Interrupt executors reserved for button handling.
pub const BUTTON_EXECUTOR_SLOTS: usize = 2;

/// Failure reported while arming a button interrupt.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RegistrationError {
    UnknownPin(PinId),
    AlreadyRegistered(PinId),
    PriorityNotAboveTick(InterruptPriority),
    NoExecutorSlot(InterruptPriority),
    SpawnFailed(PinId),
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::UnknownPin(pin) => write!(f, "{pin} is not a button input"),
            RegistrationError::AlreadyRegistered(pin) => write!(f, "{pin} already armed"),
            RegistrationError::PriorityNotAboveTick(priority) => write!(
                f,
                "priority {} does not preempt the tick timer ({})",
                priority.0, TICK_TIMER_PRIORITY.0
            ),
            RegistrationError::NoExecutorSlot(priority) => {
                write!(f, "no executor left for priority {}", priority.0)
            }
            RegistrationError::SpawnFailed(pin) => write!(f, "button task for {pin} not spawned"),
        }
    }
}

/// Result of claiming an executor slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SlotClaim {
    pub index: usize,
    /// `true` when the slot's executor still has to be started.
    pub fresh: bool,
}

/// Maps button priorities onto a fixed set of executor slots.
#[derive(Clone, Debug, Default)]
pub struct PrioritySlots<const N: usize = BUTTON_EXECUTOR_SLOTS> {
    slots: Vec<InterruptPriority, N>,
}

impl<const N: usize> PrioritySlots<N> {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Reuses the slot already running at `priority` or claims a new one.
    pub fn claim(&mut self, priority: InterruptPriority) -> Result<SlotClaim, RegistrationError> {
        check_button_priority(priority)?;

        if let Some(index) = self.slots.iter().position(|slot| *slot == priority) {
            return Ok(SlotClaim {
                index,
                fresh: false,
            });
        }

        let index = self.slots.len();
        self.slots
            .push(priority)
            .map_err(|_| RegistrationError::NoExecutorSlot(priority))?;
        Ok(SlotClaim { index, fresh: true })
    }
}

/// Button handlers must run above the tick timer.
pub fn check_button_priority(priority: InterruptPriority) -> Result<(), RegistrationError> {
    if priority.preempts(TICK_TIMER_PRIORITY) {
        Ok(())
    } else {
        Err(RegistrationError::PriorityNotAboveTick(priority))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_priority_shares_a_slot() {
        let mut slots: PrioritySlots = PrioritySlots::new();
        let first = slots.claim(InterruptPriority(1)).unwrap();
        let second = slots.claim(InterruptPriority(1)).unwrap();

        assert_eq!(first, SlotClaim { index: 0, fresh: true });
        assert_eq!(second, SlotClaim { index: 0, fresh: false });
    }

    #[test]
    fn distinct_priorities_exhaust_slots() {
        let mut slots: PrioritySlots<2> = PrioritySlots::new();
        assert_eq!(slots.claim(InterruptPriority(0)).unwrap().index, 0);
        assert_eq!(slots.claim(InterruptPriority(2)).unwrap().index, 1);
        assert_eq!(
            slots.claim(InterruptPriority(1)),
            Err(RegistrationError::NoExecutorSlot(InterruptPriority(1)))
        );
    }

    #[test]
    fn tick_level_and_below_are_rejected() {
        assert_eq!(
            check_button_priority(TICK_TIMER_PRIORITY),
            Err(RegistrationError::PriorityNotAboveTick(TICK_TIMER_PRIORITY))
        );
        assert!(check_button_priority(InterruptPriority(7)).is_err());
        assert!(check_button_priority(InterruptPriority(0)).is_ok());
    }

    #[test]
    fn default_board_priorities_are_accepted() {
        let config = crate::board::controller_config();
        let mut slots: PrioritySlots = PrioritySlots::new();
        for seat in &config.seats {
            assert!(slots.claim(seat.button_priority).is_ok());
        }
    }
}
