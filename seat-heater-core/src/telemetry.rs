//! Telemetry event catalog shared by firmware and host targets.
//!
//! Events are emitted only when a seat's observable state changes. Each kind
//! maps to a compact numeric code so it can be logged or shipped over a
//! diagnostics channel without carrying strings.

use core::fmt;

use heapless::{HistoryBuf, OldestOrdered};

use crate::level::HeatLevel;
use crate::seat::SeatId;

/// Identifier assigned to each recorded event.
pub type EventId = u32;

/// Canonical timestamp units for telemetry records (microseconds).
pub type TimestampMicros = u64;

/// Default number of records retained by a [`TelemetryRing`].
pub const TELEMETRY_RING_CAPACITY: usize = 64;

/// State changes reported by the control loop.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TelemetryEventKind {
    LevelChanged(SeatId, HeatLevel),
    HeaterSwitched(SeatId, bool),
    SensorFault(SeatId),
    SensorRecovered(SeatId),
}

impl fmt::Display for TelemetryEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryEventKind::LevelChanged(seat, level) => write!(f, "level {seat} {level}"),
            TelemetryEventKind::HeaterSwitched(seat, true) => write!(f, "heater-on {seat}"),
            TelemetryEventKind::HeaterSwitched(seat, false) => write!(f, "heater-off {seat}"),
            TelemetryEventKind::SensorFault(seat) => write!(f, "sensor-fault {seat}"),
            TelemetryEventKind::SensorRecovered(seat) => write!(f, "sensor-recovered {seat}"),
        }
    }
}

impl TelemetryEventKind {
    const LEVEL_BASE: u16 = 0x0000;
    const HEATER_ON_BASE: u16 = 0x0010;
    const HEATER_OFF_BASE: u16 = 0x0012;
    const SENSOR_FAULT_BASE: u16 = 0x0014;
    const SENSOR_RECOVERED_BASE: u16 = 0x0016;
    const END: u16 = 0x0018;

    /// Encodes the event into a compact transport-friendly discriminant.
    #[must_use]
    pub const fn to_raw(self) -> u16 {
        match self {
            TelemetryEventKind::LevelChanged(seat, level) => {
                Self::LEVEL_BASE + seat_index(seat) * 4 + level.as_index()
            }
            TelemetryEventKind::HeaterSwitched(seat, true) => {
                Self::HEATER_ON_BASE + seat_index(seat)
            }
            TelemetryEventKind::HeaterSwitched(seat, false) => {
                Self::HEATER_OFF_BASE + seat_index(seat)
            }
            TelemetryEventKind::SensorFault(seat) => Self::SENSOR_FAULT_BASE + seat_index(seat),
            TelemetryEventKind::SensorRecovered(seat) => {
                Self::SENSOR_RECOVERED_BASE + seat_index(seat)
            }
        }
    }

    /// Decodes a raw discriminant. Codes outside the catalog yield `None`.
    #[must_use]
    pub fn from_raw(code: u16) -> Option<Self> {
        match code {
            value if value < Self::LEVEL_BASE + 8 => {
                let offset = value - Self::LEVEL_BASE;
                seat_from_index(offset / 4).zip(HeatLevel::from_index(offset % 4)).map(
                    |(seat, level)| TelemetryEventKind::LevelChanged(seat, level),
                )
            }
            value if (Self::HEATER_ON_BASE..Self::HEATER_OFF_BASE).contains(&value) => {
                seat_from_index(value - Self::HEATER_ON_BASE)
                    .map(|seat| TelemetryEventKind::HeaterSwitched(seat, true))
            }
            value if (Self::HEATER_OFF_BASE..Self::SENSOR_FAULT_BASE).contains(&value) => {
                seat_from_index(value - Self::HEATER_OFF_BASE)
                    .map(|seat| TelemetryEventKind::HeaterSwitched(seat, false))
            }
            value if (Self::SENSOR_FAULT_BASE..Self::SENSOR_RECOVERED_BASE).contains(&value) => {
                seat_from_index(value - Self::SENSOR_FAULT_BASE).map(TelemetryEventKind::SensorFault)
            }
            value if (Self::SENSOR_RECOVERED_BASE..Self::END).contains(&value) => {
                seat_from_index(value - Self::SENSOR_RECOVERED_BASE)
                    .map(TelemetryEventKind::SensorRecovered)
            }
            _ => None,
        }
    }

    /// Seat the event refers to.
    #[must_use]
    pub const fn seat(self) -> SeatId {
        match self {
            TelemetryEventKind::LevelChanged(seat, _)
            | TelemetryEventKind::HeaterSwitched(seat, _)
            | TelemetryEventKind::SensorFault(seat)
            | TelemetryEventKind::SensorRecovered(seat) => seat,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn seat_index(seat: SeatId) -> u16 {
    seat.as_index() as u16
}

fn seat_from_index(index: u16) -> Option<SeatId> {
    SeatId::from_index(usize::from(index))
}

/// Telemetry record stored in the ring buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TelemetryRecord {
    pub id: EventId,
    pub timestamp_us: TimestampMicros,
    pub event: TelemetryEventKind,
}

/// Destination for events produced by the control loop.
pub trait TelemetrySink {
    /// Records `event` observed at `timestamp_us` and returns its identifier.
    fn record(&mut self, event: TelemetryEventKind, timestamp_us: TimestampMicros) -> EventId;
}

/// Fixed-capacity history of the most recent records.
pub struct TelemetryRing<const CAPACITY: usize = TELEMETRY_RING_CAPACITY> {
    ring: HistoryBuf<TelemetryRecord, CAPACITY>,
    next_event_id: EventId,
}

impl<const CAPACITY: usize> TelemetryRing<CAPACITY> {
    /// Creates a new ring with an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            next_event_id: 0,
        }
    }

    /// Returns an iterator over the recorded telemetry in chronological order.
    #[must_use]
    pub fn oldest_first(&self) -> OldestOrdered<'_, TelemetryRecord> {
        self.ring.oldest_ordered()
    }

    /// Returns the most recent telemetry record, if available.
    #[must_use]
    pub fn latest(&self) -> Option<&TelemetryRecord> {
        self.ring.recent()
    }

    /// Returns the number of records currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` when no telemetry records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

impl<const CAPACITY: usize> Default for TelemetryRing<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAPACITY: usize> TelemetrySink for TelemetryRing<CAPACITY> {
    fn record(&mut self, event: TelemetryEventKind, timestamp_us: TimestampMicros) -> EventId {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);

        self.ring.write(TelemetryRecord {
            id,
            timestamp_us,
            event,
        });

        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::ALL_LEVELS;
    use crate::seat::ALL_SEATS;

    #[test]
    fn every_event_round_trips_through_its_code() {
        for seat in ALL_SEATS {
            for level in ALL_LEVELS {
                let event = TelemetryEventKind::LevelChanged(seat, level);
                assert_eq!(TelemetryEventKind::from_raw(event.to_raw()), Some(event));
            }
            for event in [
                TelemetryEventKind::HeaterSwitched(seat, true),
                TelemetryEventKind::HeaterSwitched(seat, false),
                TelemetryEventKind::SensorFault(seat),
                TelemetryEventKind::SensorRecovered(seat),
            ] {
                assert_eq!(TelemetryEventKind::from_raw(event.to_raw()), Some(event));
            }
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(TelemetryEventKind::from_raw(0x0042), None);
        assert_eq!(TelemetryEventKind::from_raw(0x0009), None);
        assert_eq!(TelemetryEventKind::from_raw(0x0018), None);
    }

    #[test]
    fn ring_assigns_sequential_ids_and_keeps_latest() {
        let mut ring: TelemetryRing<2> = TelemetryRing::new();
        assert!(ring.is_empty());

        let first = ring.record(TelemetryEventKind::SensorFault(SeatId::Driver), 10);
        let second = ring.record(TelemetryEventKind::SensorRecovered(SeatId::Driver), 20);
        let third = ring.record(
            TelemetryEventKind::HeaterSwitched(SeatId::Passenger, true),
            30,
        );

        assert_eq!((first, second, third), (0, 1, 2));
        assert_eq!(ring.len(), 2);
        let latest = ring.latest().copied().unwrap();
        assert_eq!(latest.id, 2);
        assert_eq!(latest.timestamp_us, 30);
        assert_eq!(
            ring.oldest_first().next().map(|record| record.id),
            Some(1)
        );
    }

    #[test]
    fn events_report_their_seat() {
        assert_eq!(
            TelemetryEventKind::LevelChanged(SeatId::Passenger, HeatLevel::High).seat(),
            SeatId::Passenger
        );
        assert_eq!(
            TelemetryEventKind::SensorFault(SeatId::Driver).seat(),
            SeatId::Driver
        );
    }
}
