use crate::{
    hardware::{buzzer::BuzzerHandle, indicator::IndicatorHandle, PIPELINE},
    spawner::Spawners,
};
use defmt::info;
use embassy_time::Delay;
use rover_core::{
    config,
    indicator::{Alert, Heartbeat},
    task,
};

#[embassy_executor::task]
async fn heartbeat_task(interval_ms: u32, tune: bool) {
    Heartbeat::new(&PIPELINE.bus, interval_ms, tune)
        .run(&mut IndicatorHandle, &mut BuzzerHandle, &mut Delay)
        .await;
}

#[embassy_executor::task]
async fn alert_task(on_ms: u32, off_ms: u32, tune: bool) {
    Alert::new(&PIPELINE.bus, on_ms, off_ms, tune)
        .run(&mut IndicatorHandle, &mut BuzzerHandle, &mut Delay)
        .await;
}

pub async fn init(spawners: &Spawners) {
    info!("Starting indicators");

    let config = config::snapshot().await;

    spawners.must_spawn(task::HEARTBEAT, heartbeat_task(config.heartbeat_ms, config.alert_tune));
    spawners.must_spawn(
        task::ALERT,
        alert_task(config.alert_on_ms, config.alert_off_ms, config.alert_tune),
    );
}
