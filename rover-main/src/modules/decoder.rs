use crate::{hardware::PIPELINE, spawner::Spawners};
use defmt::info;
use embassy_time::Delay;
use rover_core::{command::Decoder, get_config, task};

#[embassy_executor::task]
async fn decoder_task(poll_ms: u32) {
    Decoder::new(&PIPELINE).run(&mut Delay, poll_ms).await;
}

pub async fn init(spawners: &Spawners) {
    info!("Starting decoder");

    let poll_ms = get_config!(poll_ms);

    spawners.must_spawn(task::DECODER, decoder_task(poll_ms));
}
