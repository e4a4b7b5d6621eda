use crate::{
    backend::{AudioBackend, Indicator, IndicatorBackend, Level, Note},
    signal::{SignalBus, Signals},
};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

pub const RUNNING_TUNE: &[Note] = &[Note::C];
pub const FINISH_TUNE: &[Note] = &[Note::G, Note::A, Note::B];

/// Blinks the heartbeat indicator and raises "alert" once per cycle.
pub struct Heartbeat<'a, M: RawMutex, const W: usize> {
    bus: &'a SignalBus<M, W>,
    interval_ms: u32,
    tune: bool,
}

impl<'a, M: RawMutex, const W: usize> Heartbeat<'a, M, W> {
    pub fn new(bus: &'a SignalBus<M, W>, interval_ms: u32, tune: bool) -> Self {
        Self {
            bus,
            interval_ms,
            tune,
        }
    }

    pub async fn cycle<I, A, D>(&mut self, leds: &mut I, audio: &mut A, delay: &mut D)
    where
        I: IndicatorBackend,
        A: AudioBackend,
        D: DelayNs,
    {
        leds.set(Indicator::Heartbeat, Level::On);
        if self.tune {
            play(audio, RUNNING_TUNE, self.interval_ms, delay).await;
        } else {
            delay.delay_ms(self.interval_ms).await;
        }

        leds.set(Indicator::Heartbeat, Level::Off);
        delay.delay_ms(self.interval_ms).await;

        self.bus.set(Signals::ALERT);
    }

    pub async fn run<I, A, D>(mut self, leds: &mut I, audio: &mut A, delay: &mut D)
    where
        I: IndicatorBackend,
        A: AudioBackend,
        D: DelayNs,
    {
        loop {
            self.cycle(leds, audio, delay).await;
        }
    }
}

/// Pulses the alert indicator whenever "alert" is raised.
pub struct Alert<'a, M: RawMutex, const W: usize> {
    bus: &'a SignalBus<M, W>,
    on_ms: u32,
    off_ms: u32,
    tune: bool,
}

impl<'a, M: RawMutex, const W: usize> Alert<'a, M, W> {
    pub fn new(bus: &'a SignalBus<M, W>, on_ms: u32, off_ms: u32, tune: bool) -> Self {
        Self {
            bus,
            on_ms,
            off_ms,
            tune,
        }
    }

    pub async fn pulse<I, A, D>(&mut self, leds: &mut I, audio: &mut A, delay: &mut D)
    where
        I: IndicatorBackend,
        A: AudioBackend,
        D: DelayNs,
    {
        leds.set(Indicator::Alert, Level::On);
        if self.tune {
            play(audio, FINISH_TUNE, self.on_ms, delay).await;
        } else {
            delay.delay_ms(self.on_ms).await;
        }

        leds.set(Indicator::Alert, Level::Off);
        delay.delay_ms(self.off_ms).await;
    }

    pub async fn run<I, A, D>(mut self, leds: &mut I, audio: &mut A, delay: &mut D)
    where
        I: IndicatorBackend,
        A: AudioBackend,
        D: DelayNs,
    {
        loop {
            self.bus.wait_any(Signals::ALERT).await;
            self.pulse(leds, audio, delay).await;
        }
    }
}

// Splits `total_ms` evenly across the notes, then goes quiet.
async fn play<A: AudioBackend, D: DelayNs>(
    audio: &mut A,
    tune: &[Note],
    total_ms: u32,
    delay: &mut D,
) {
    let step_ms = total_ms / tune.len().max(1) as u32;

    for note in tune {
        audio.set_tone(*note);
        delay.delay_ms(step_ms).await;
    }

    audio.stop_tone();

    let rest_ms = total_ms - step_ms * tune.len() as u32;
    if rest_ms > 0 {
        delay.delay_ms(rest_ms).await;
    }
}
