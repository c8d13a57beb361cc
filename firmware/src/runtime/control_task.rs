use embassy_time::{Duration, Instant, Ticker};
use seat_heater_core::controller::HeaterController;

use crate::hw::SeatIo;
use crate::telemetry::TelemetryRecorder;

#[embassy_executor::task]
pub async fn run(
    mut controller: HeaterController<'static>,
    mut io: SeatIo,
    mut telemetry: TelemetryRecorder,
) -> ! {
    let period = core_duration_to_embassy(controller.config().tick_period);
    defmt::info!("control: ticking every {}ms", period.as_millis());

    let mut ticker = Ticker::every(period);
    loop {
        controller.tick(&mut io, &mut telemetry, Instant::now().as_micros());
        ticker.next().await;
    }
}

fn core_duration_to_embassy(duration: core::time::Duration) -> Duration {
    let micros = duration.as_micros();
    let micros = u64::try_from(micros).unwrap_or(u64::MAX);
    Duration::from_micros(micros)
}
