use crate::{pipeline::Pipeline, signal::Signals};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use log::warn;

/// Moves bytes from the interrupt-fed queue into the raw cell, one per
/// scheduling quantum, announcing each with "new data".
pub struct Receiver<'a, M: RawMutex, const W: usize> {
    pipeline: &'a Pipeline<M, W>,
    dropped_seen: u32,
}

impl<'a, M: RawMutex, const W: usize> Receiver<'a, M, W> {
    pub fn new(pipeline: &'a Pipeline<M, W>) -> Self {
        Self {
            pipeline,
            dropped_seen: pipeline.rx.dropped(),
        }
    }

    pub fn poll(&mut self) -> Option<u8> {
        let dropped = self.pipeline.rx.dropped();
        if dropped != self.dropped_seen {
            warn!(
                "Receive queue overflowed, {} bytes lost",
                dropped.wrapping_sub(self.dropped_seen)
            );
            self.dropped_seen = dropped;
        }

        let byte = self.pipeline.rx.try_pop()?;
        self.pipeline.raw.publish(byte);
        self.pipeline.bus.set(Signals::NEW_DATA);

        Some(byte)
    }

    pub async fn run<D: DelayNs>(mut self, delay: &mut D, poll_ms: u32) {
        loop {
            self.poll();
            delay.delay_ms(poll_ms).await;
        }
    }
}
