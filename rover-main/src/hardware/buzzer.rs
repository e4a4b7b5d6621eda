use crate::peripherals::PeripheralsBuzzer;
use core::cell::RefCell;
use defmt::info;
use embassy_rp::{
    peripherals::PWM_CH0,
    pwm::{Config, Pwm},
};
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use fixed::types::U12F4;
use rover_core::backend::{AudioBackend, Note};

// 125 MHz / 333 is close to a 375 kHz tone clock
const DIVIDER: u16 = 333;

/// Counter top and compare level for each note.
const fn note_config(note: Note) -> (u16, u16) {
    match note {
        Note::C => (1432, 716),
        Note::D => (1276, 319),
        Note::E => (1136, 284),
        Note::F => (1075, 268),
        Note::G => (956, 239),
        Note::A => (852, 213),
        Note::B => (759, 189),
    }
}

fn config(top: u16, compare: u16) -> Config {
    let mut config = Config::default();

    config.top = top;
    config.divider = U12F4::from_num(DIVIDER);
    config.compare_a = compare;

    config
}

static BUZZER: Mutex<CriticalSectionRawMutex, RefCell<Option<Pwm<'static, PWM_CH0>>>> =
    Mutex::new(RefCell::new(None));

fn with_buzzer(f: impl FnOnce(&mut Pwm<'static, PWM_CH0>)) {
    BUZZER.lock(|cell| {
        if let Some(pwm) = cell.borrow_mut().as_mut() {
            f(pwm);
        }
    });
}

pub struct BuzzerHandle;

impl AudioBackend for BuzzerHandle {
    fn set_tone(&mut self, note: Note) {
        let (top, compare) = note_config(note);
        with_buzzer(|pwm| pwm.set_config(&config(top, compare)));
    }

    fn stop_tone(&mut self) {
        with_buzzer(|pwm| pwm.set_config(&config(0, 0)));
    }
}

pub fn init(p: PeripheralsBuzzer) {
    info!("Starting buzzer");

    let pwm = Pwm::new_output_a(p.PWM_CH0, p.PIN_0, config(0, 0));

    BUZZER.lock(|cell| cell.replace(Some(pwm)));
}
