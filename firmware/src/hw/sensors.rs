//! ADC front end for the seat temperature sensors.

use embassy_stm32::adc::{Adc, AnyAdcChannel, SampleTime};
use embassy_stm32::peripherals::ADC1;
use seat_heater_core::hal::{AdcChannelId, RawSampleSource};

use crate::board;

/// Number of sensor inputs wired to ADC1.
pub const SENSOR_CHANNELS: usize = board::SENSOR_PINS.len();

/// Embassy ADC wrapper producing raw 12-bit conversions per seat channel.
pub struct SensorAdc {
    adc: Adc<'static, ADC1>,
    channels: [AnyAdcChannel<ADC1>; SENSOR_CHANNELS],
    discard_next: bool,
}

impl SensorAdc {
    /// Configures a long sample time to suit the sensors' source impedance.
    pub fn new(mut adc: Adc<'static, ADC1>, channels: [AnyAdcChannel<ADC1>; SENSOR_CHANNELS]) -> Self {
        adc.set_sample_time(SampleTime::CYCLES160_5);
        Self {
            adc,
            channels,
            discard_next: true,
        }
    }
}

impl RawSampleSource for SensorAdc {
    fn read_raw_sample(&mut self, channel: AdcChannelId) -> u16 {
        let Some(input) = self.channels.get_mut(usize::from(channel.0)) else {
            defmt::warn!("hw: unknown ADC channel {}", channel.0);
            // Reads as an unplugged sensor, which fails safe.
            return 0;
        };

        if self.discard_next {
            let _ = self.adc.blocking_read(input);
            self.discard_next = false;
        }

        self.adc.blocking_read(input)
    }
}
