use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};

macro_rules! init_config {
    ($($name:ident: $type:ty = $value:literal),*,) => {
        pub static CONFIG: Mutex<CriticalSectionRawMutex, Config> = Mutex::new(Config::DEFAULT);

        #[derive(Clone, Copy, Debug, PartialEq)]
        pub struct Config {
            $(
                pub $name: $type,
            )*
        }

        impl Config {
            pub const DEFAULT: Config = Config {
                $(
                    $name: $value,
                )*
            };
        }
    };
}

init_config! {
    // drive
    drive_scale: i32 = 1000,
    pwm_period: u16 = 6000,
    // indicators
    heartbeat_ms: u32 = 1000,
    alert_on_ms: u32 = 250,
    alert_off_ms: u32 = 250,
    alert_tune: bool = false,
    // serial
    baud_rate: u32 = 19200,
    poll_ms: u32 = 1,
}

#[macro_export]
macro_rules! get_config {
    ($name:ident) => {{
        let config = $crate::config::CONFIG.lock().await;
        config.$name
    }};
}

#[macro_export]
macro_rules! set_config {
    ($name:ident, $value:expr) => {{
        let mut config = $crate::config::CONFIG.lock().await;
        config.$name = $value;
    }};
}

pub async fn snapshot() -> Config {
    *CONFIG.lock().await
}

/// The serial peripheral's clock: half the core clock.
pub const fn bus_clock(core_clock_hz: u32) -> u32 {
    core_clock_hz / 2
}

/// Integer baud divisor, `bus_clock / (16 * baud)`. Peers expect the rate
/// this truncation produces, so it must not be rounded.
pub const fn baud_divisor(bus_clock_hz: u32, baud: u32) -> u16 {
    (bus_clock_hz / (16 * baud)) as u16
}
