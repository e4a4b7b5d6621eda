use crate::{hardware::PIPELINE, peripherals::PeripheralsUart, spawner::Spawners};
use defmt::info;
use embassy_rp::{
    clocks,
    interrupt,
    interrupt::{InterruptExt, Priority},
    pac,
    peripherals::UART1,
    uart::{Blocking, Config, Uart},
};
use embassy_time::Delay;
use rover_core::{config::baud_divisor, get_config, receiver::Receiver, ring_buffer::ByteSink, task};
use static_cell::StaticCell;

static UART: StaticCell<Uart<'static, UART1, Blocking>> = StaticCell::new();

#[allow(non_snake_case)]
#[interrupt]
fn UART1_IRQ() {
    let regs = pac::UART1;

    while !regs.uartfr().read().rxfe() {
        PIPELINE.rx.on_byte_received(regs.uartdr().read().data());
    }

    regs.uarticr().write(|w| {
        w.set_rxic(true);
        w.set_rtic(true);
    });
}

/// Integer divisor only, so the line runs at the rate peers were built for.
fn set_baud_rate(clock_hz: u32, baud: u32) {
    let regs = pac::UART1;
    let divisor = baud_divisor(clock_hz, baud);

    info!("Uart divisor {} for {} baud", divisor, baud);

    regs.uartibrd()
        .write_value(pac::uart::regs::Uartibrd(u32::from(divisor)));
    regs.uartfbrd().write_value(pac::uart::regs::Uartfbrd(0));
    // divisor latches on the next line control write
    regs.uartlcr_h().modify(|_| {});
}

#[embassy_executor::task]
async fn receiver_task(poll_ms: u32) {
    Receiver::new(&PIPELINE).run(&mut Delay, poll_ms).await;
}

pub async fn init(spawners: &Spawners, p: PeripheralsUart) {
    info!("Starting uart");

    let baud_rate = get_config!(baud_rate);
    let poll_ms = get_config!(poll_ms);

    let mut config = Config::default();
    config.baudrate = baud_rate;

    UART.init(Uart::new_blocking(p.UART1, p.PIN_20, p.PIN_21, config));
    set_baud_rate(clocks::clk_peri_freq(), baud_rate);

    pac::UART1.uartimsc().modify(|w| {
        w.set_rxim(true);
        w.set_rtim(true);
    });

    interrupt::UART1_IRQ.set_priority(Priority::P1);
    interrupt::UART1_IRQ.unpend();
    unsafe { interrupt::UART1_IRQ.enable() };

    spawners.must_spawn(task::RECEIVER, receiver_task(poll_ms));
}
