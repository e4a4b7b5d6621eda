use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use rover_core::{constants::SIGNAL_WAITERS, Pipeline};

pub mod buzzer;
pub mod indicator;
pub mod motor;
pub mod uart;

pub static PIPELINE: Pipeline<CriticalSectionRawMutex, SIGNAL_WAITERS> = Pipeline::new();
