use crate::{
    command::DecodedCommand, constants::RX_QUEUE_CAPACITY, mailbox::Mailbox,
    ring_buffer::RingBuffer, signal::SignalBus,
};
use embassy_sync::blocking_mutex::raw::RawMutex;

/// Shared state of the command pipeline. The board keeps one in a static.
///
/// Each cell has exactly one writer: the serial interrupt owns the producer
/// side of `rx`, the receiver owns `raw`, the decoder owns `command`.
pub struct Pipeline<M: RawMutex, const W: usize> {
    pub rx: RingBuffer<RX_QUEUE_CAPACITY>,
    pub raw: Mailbox<u8>,
    pub command: Mailbox<DecodedCommand>,
    pub bus: SignalBus<M, W>,
}

impl<M: RawMutex, const W: usize> Pipeline<M, W> {
    pub const fn new() -> Self {
        Self {
            rx: RingBuffer::new(),
            raw: Mailbox::new(),
            command: Mailbox::new(),
            bus: SignalBus::new(),
        }
    }
}

impl<M: RawMutex, const W: usize> Default for Pipeline<M, W> {
    fn default() -> Self {
        Self::new()
    }
}
