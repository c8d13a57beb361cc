//! Seat identity and the per-seat state record.

use core::fmt;

use crate::level::HeatLevel;

/// Number of independently controlled seats.
pub const SEAT_COUNT: usize = 2;

/// Physical seat served by a control channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SeatId {
    Driver,
    Passenger,
}

/// Every seat in tick order.
pub const ALL_SEATS: [SeatId; SEAT_COUNT] = [SeatId::Driver, SeatId::Passenger];

impl SeatId {
    /// Deterministic index for per-seat arrays.
    #[must_use]
    pub const fn as_index(self) -> usize {
        match self {
            SeatId::Driver => 0,
            SeatId::Passenger => 1,
        }
    }

    /// Attempts to construct a [`SeatId`] from a raw index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SeatId::Driver),
            1 => Some(SeatId::Passenger),
            _ => None,
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SeatId::Driver => "driver",
            SeatId::Passenger => "passenger",
        }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Observable state of one seat channel.
///
/// Owned by that seat's coordinator; callers only ever see copies.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SeatChannel {
    pub id: SeatId,
    pub current_level: HeatLevel,
    /// Last successfully sampled temperature, `None` until the first one.
    pub last_temperature_c: Option<f32>,
    pub heater_on: bool,
    pub sensor_fault: bool,
}

impl SeatChannel {
    /// Power-on state: level Off, heater off, no fault recorded.
    #[must_use]
    pub const fn new(id: SeatId) -> Self {
        Self {
            id,
            current_level: HeatLevel::Off,
            last_temperature_c: None,
            heater_on: false,
            sensor_fault: false,
        }
    }
}
