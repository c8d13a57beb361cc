//! Seat temperature sampling.
//!
//! The seat sensor is read through a 12-bit ADC and mapped linearly onto
//! `0.0..=45.0` °C. A sensor that has come loose pulls the input to ground,
//! so a run of exact-zero conversions is reported as a disconnect instead of
//! a very cold seat.

use core::fmt;

use crate::hal::{AdcChannelId, RawSampleSource};

/// Largest raw conversion produced by the ADC.
pub const ADC_MAX: u16 = 4095;

/// Temperature reported at full-scale input.
pub const T_MAX_C: f32 = 45.0;

/// Default run of zero conversions treated as an open circuit.
pub const DEFAULT_DISCONNECT_ZERO_SAMPLES: u8 = 3;

/// Failure reported by [`SensorReader::sample_temperature`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SensorError {
    /// The reading is implausible for an attached sensor.
    Disconnected,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::Disconnected => f.write_str("sensor disconnected"),
        }
    }
}

/// Converts a raw conversion to °C, clamping values above [`ADC_MAX`].
#[must_use]
pub fn raw_to_celsius(raw: u16) -> f32 {
    let raw = raw.min(ADC_MAX);
    f32::from(raw) * T_MAX_C / f32::from(ADC_MAX)
}

/// Per-seat sensor front end.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SensorReader {
    channel: AdcChannelId,
    disconnect_after: u8,
    zero_streak: u8,
}

impl SensorReader {
    /// `disconnect_after` is clamped to at least one sample.
    #[must_use]
    pub const fn new(channel: AdcChannelId, disconnect_after: u8) -> Self {
        Self {
            channel,
            disconnect_after: if disconnect_after == 0 {
                1
            } else {
                disconnect_after
            },
            zero_streak: 0,
        }
    }

    #[must_use]
    pub const fn channel(&self) -> AdcChannelId {
        self.channel
    }

    /// Consecutive zero conversions observed so far.
    #[must_use]
    pub const fn zero_streak(&self) -> u8 {
        self.zero_streak
    }

    /// Reads one conversion and converts it. No retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::Disconnected`] once the input has read exactly
    /// zero for the configured number of consecutive samples, and keeps
    /// returning it until a non-zero conversion arrives.
    pub fn sample_temperature<S: RawSampleSource>(
        &mut self,
        source: &mut S,
    ) -> Result<f32, SensorError> {
        let raw = source.read_raw_sample(self.channel);
        self.classify(raw)
    }

    fn classify(&mut self, raw: u16) -> Result<f32, SensorError> {
        if raw == 0 {
            self.zero_streak = self.zero_streak.saturating_add(1);
            if self.zero_streak >= self.disconnect_after {
                return Err(SensorError::Disconnected);
            }
        } else {
            self.zero_streak = 0;
        }
        Ok(raw_to_celsius(raw))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    struct FixedSource(u16);

    impl RawSampleSource for FixedSource {
        fn read_raw_sample(&mut self, _: AdcChannelId) -> u16 {
            self.0
        }
    }

    #[test]
    fn conversion_hits_both_ends_of_the_range() {
        assert_eq!(raw_to_celsius(0), 0.0);
        assert_eq!(raw_to_celsius(ADC_MAX), T_MAX_C);
    }

    #[test]
    fn conversion_is_monotone_and_bounded() {
        let mut previous = raw_to_celsius(0);
        for raw in 1..=ADC_MAX {
            let current = raw_to_celsius(raw);
            assert!(current >= previous, "dropped at raw={raw}");
            assert!((0.0..=T_MAX_C).contains(&current));
            previous = current;
        }
    }

    #[test]
    fn out_of_range_samples_saturate() {
        assert_eq!(raw_to_celsius(ADC_MAX + 1), T_MAX_C);
        assert_eq!(raw_to_celsius(u16::MAX), T_MAX_C);
    }

    #[test]
    fn isolated_zero_reads_as_zero_degrees() {
        let mut reader = SensorReader::new(AdcChannelId(0), 3);
        let mut source = FixedSource(0);

        assert_eq!(reader.sample_temperature(&mut source), Ok(0.0));
        assert_eq!(reader.sample_temperature(&mut source), Ok(0.0));
        assert_eq!(
            reader.sample_temperature(&mut source),
            Err(SensorError::Disconnected)
        );
        assert_eq!(
            reader.sample_temperature(&mut source),
            Err(SensorError::Disconnected)
        );
    }

    #[test]
    fn non_zero_sample_clears_the_streak() {
        let mut reader = SensorReader::new(AdcChannelId(1), 2);

        assert!(reader.sample_temperature(&mut FixedSource(0)).is_ok());
        assert!(reader.sample_temperature(&mut FixedSource(0)).is_err());
        assert!(reader.sample_temperature(&mut FixedSource(910)).is_ok());
        assert_eq!(reader.zero_streak(), 0);
        assert!(reader.sample_temperature(&mut FixedSource(0)).is_ok());
    }

    #[test]
    fn zero_threshold_is_clamped_to_one() {
        let mut reader = SensorReader::new(AdcChannelId(0), 0);
        assert_eq!(
            reader.sample_temperature(&mut FixedSource(0)),
            Err(SensorError::Disconnected)
        );
    }
}
