#![no_std]
#![no_main]
#![feature(impl_trait_in_assoc_type, type_alias_impl_trait)]

use crate::{
    peripherals::{get_peripherals, Board},
    spawner::Spawners,
};
use core::panic::PanicInfo;
use cortex_m_rt::ExceptionFrame;
use defmt::info;
use defmt_rtt as _;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::{
    config::Config,
    interrupt,
    interrupt::{InterruptExt, Priority},
};
use static_cell::StaticCell;

mod hardware;
mod logger;
mod modules;
mod peripherals;
mod spawner;

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_NORMAL: StaticCell<Executor> = StaticCell::new();

#[allow(non_snake_case)]
#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[embassy_executor::task]
async fn main_task(spawners: Spawners, p: Board) {
    logger::init(&spawners.normal, p.usb).await;

    info!(
        "Starting up {} {}",
        built_info::PKG_NAME,
        built_info::PKG_VERSION
    );

    hardware::indicator::init(p.indicator);
    hardware::buzzer::init(p.buzzer);
    hardware::motor::init(&spawners, p.motor).await;
    hardware::uart::init(&spawners, p.uart).await;

    modules::decoder::init(&spawners).await;
    modules::indicator::init(&spawners).await;

    info!("Waiting for commands");
}

#[cortex_m_rt::entry]
fn main() -> ! {
    info!("Starting up");

    // spinlocks survive a soft reset and would deadlock the critical section
    unsafe {
        const SIO_BASE: u32 = 0xd000_0000;
        const SPINLOCK_PTR: *mut u32 = (SIO_BASE + 0x100) as *mut u32;
        const SPINLOCK_COUNT: usize = 32;
        for i in 0..SPINLOCK_COUNT {
            SPINLOCK_PTR.wrapping_add(i).write_volatile(1);
        }
    }

    let p = embassy_rp::init(Config::default());
    let board = get_peripherals(p);

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);

    let executor = EXECUTOR_NORMAL.init(Executor::new());
    executor.run(|spawner| spawner.must_spawn(main_task(Spawners::new(spawner, high), board)))
}

#[cortex_m_rt::exception]
unsafe fn HardFault(_: &ExceptionFrame) -> ! {
    cortex_m::peripheral::SCB::sys_reset();
}

#[panic_handler]
fn panic(_: &PanicInfo) -> ! {
    cortex_m::asm::udf();
}
