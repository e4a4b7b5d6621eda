use embassy_executor::Spawner;
use embassy_rp::{
    bind_interrupts,
    peripherals::USB,
    usb::{Driver, InterruptHandler},
};
use embassy_time::Timer;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

/// Forwards the `log` output of the core tasks over USB serial.
#[embassy_executor::task]
async fn logger_task(driver: Driver<'static, USB>) {
    embassy_usb_logger::run!(1024, log::LevelFilter::Info, driver);
}

pub async fn init(spawner: &Spawner, usb: USB) {
    let driver = Driver::new(usb, Irqs);

    spawner.must_spawn(logger_task(driver));

    // give the host a moment to enumerate
    Timer::after_millis(1000).await;
}
