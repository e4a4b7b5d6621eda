use crate::peripherals::PeripheralsIndicator;
use core::cell::RefCell;
use defmt::info;
use embassy_rp::gpio::{self, AnyPin, Output};
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use rover_core::backend::{Indicator, IndicatorBackend, Level};

struct Leds {
    heartbeat: Output<'static, AnyPin>,
    alert: Output<'static, AnyPin>,
}

static LEDS: Mutex<CriticalSectionRawMutex, RefCell<Option<Leds>>> =
    Mutex::new(RefCell::new(None));

/// Handle to the shared status LEDs, usable from any priority. Both LEDs
/// are active-low.
pub struct IndicatorHandle;

impl IndicatorBackend for IndicatorHandle {
    fn set(&mut self, indicator: Indicator, level: Level) {
        LEDS.lock(|leds| {
            let mut leds = leds.borrow_mut();
            let Some(leds) = leds.as_mut() else {
                return;
            };

            let pin = match indicator {
                Indicator::Heartbeat => &mut leds.heartbeat,
                Indicator::Alert => &mut leds.alert,
            };

            match level {
                Level::On => pin.set_low(),
                Level::Off => pin.set_high(),
            }
        });
    }
}

pub fn init(p: PeripheralsIndicator) {
    info!("Starting indicators");

    let leds = Leds {
        heartbeat: Output::new(AnyPin::from(p.PIN_18), gpio::Level::High),
        alert: Output::new(AnyPin::from(p.PIN_19), gpio::Level::High),
    };

    LEDS.lock(|cell| cell.replace(Some(leds)));
}
