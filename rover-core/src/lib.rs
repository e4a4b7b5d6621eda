//! Command pipeline for the rover: serial bytes in, motor duties and indicator
//! pulses out. Everything here is hardware-agnostic; the board crate supplies
//! the backends, the interrupt handler and the executors.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod command;
pub mod config;
pub mod constants;
pub mod drive;
pub mod indicator;
pub mod mailbox;
pub mod pipeline;
pub mod receiver;
pub mod ring_buffer;
pub mod signal;
pub mod task;

pub use pipeline::Pipeline;
pub use signal::{SignalBus, Signals, Timeout};
