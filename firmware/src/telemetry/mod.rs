//! Telemetry ring and logging glue.
//!
//! Wraps the shared [`TelemetryRing`] so every state change the control loop
//! reports is also mirrored to defmt on the MCU (stdout on the host) for
//! quick inspection during bring-up.

use seat_heater_core::telemetry::{
    EventId, TelemetryEventKind, TelemetryRecord, TelemetryRing, TelemetrySink, TimestampMicros,
};

/// Total number of telemetry entries retained in memory.
pub const TELEMETRY_RING_CAPACITY: usize = 128;

/// Records control-loop events and echoes them to the log.
pub struct TelemetryRecorder {
    ring: TelemetryRing<TELEMETRY_RING_CAPACITY>,
}

impl TelemetryRecorder {
    /// Creates a new telemetry recorder with an empty history.
    pub const fn new() -> Self {
        Self {
            ring: TelemetryRing::new(),
        }
    }

    /// Returns the most recent telemetry record, if available.
    pub fn latest(&self) -> Option<&TelemetryRecord> {
        self.ring.latest()
    }

    /// Returns the number of records currently stored.
    pub fn len(&self) -> usize {
        self.ring.len()
    }
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySink for TelemetryRecorder {
    fn record(&mut self, event: TelemetryEventKind, timestamp_us: TimestampMicros) -> EventId {
        let id = self.ring.record(event, timestamp_us);
        emit_log(id, event, timestamp_us);
        id
    }
}

#[cfg(target_os = "none")]
fn emit_log(id: EventId, event: TelemetryEventKind, timestamp_us: TimestampMicros) {
    match event {
        TelemetryEventKind::SensorFault(_) => defmt::warn!(
            "telemetry:seat #{} {} code={=u16:#x} t={}us",
            id,
            defmt::Display2Format(&event),
            event.to_raw(),
            timestamp_us
        ),
        _ => defmt::info!(
            "telemetry:seat #{} {} code={=u16:#x} t={}us",
            id,
            defmt::Display2Format(&event),
            event.to_raw(),
            timestamp_us
        ),
    }
}

#[cfg(not(target_os = "none"))]
fn emit_log(id: EventId, event: TelemetryEventKind, timestamp_us: TimestampMicros) {
    println!(
        "telemetry:seat #{id} {event} code={:#06x} t={timestamp_us}us",
        event.to_raw()
    );
}
