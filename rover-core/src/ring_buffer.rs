use core::cell::UnsafeCell;
use portable_atomic::{AtomicU32, AtomicUsize, Ordering};

/// Where the serial interrupt hands off each received byte.
pub trait ByteSink {
    fn on_byte_received(&self, byte: u8);
}

/// Fixed-capacity byte queue shared between the serial interrupt and one task.
///
/// `try_push` must only be called from the interrupt handler and `try_pop`
/// from a single consumer task. `count` is the only field both sides modify,
/// and it is updated with atomic read-modify-write operations so a push that
/// interrupts a pop cannot lose an update.
pub struct RingBuffer<const N: usize> {
    data: UnsafeCell<[u8; N]>,
    head: AtomicUsize,
    tail: AtomicUsize,
    count: AtomicUsize,
    dropped: AtomicU32,
}

// SAFETY: a slot is written only by the producer before `count` publishes it
// and read only by the consumer before `count` releases it.
unsafe impl<const N: usize> Sync for RingBuffer<N> {}

impl<const N: usize> RingBuffer<N> {
    pub const fn new() -> Self {
        Self {
            data: UnsafeCell::new([0; N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            count: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Bytes discarded because the buffer was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Appends `byte`, or drops it and returns `false` when the buffer is full.
    pub fn try_push(&self, byte: u8) -> bool {
        if self.is_full() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let tail = self.tail.load(Ordering::Relaxed);
        // SAFETY: the consumer never reads slot `tail` while it is outside `count`.
        unsafe { self.data.get().cast::<u8>().add(tail).write(byte) };
        self.tail.store((tail + 1) % N, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Release);

        true
    }

    pub fn try_pop(&self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }

        let head = self.head.load(Ordering::Relaxed);
        // SAFETY: slot `head` is inside `count`, so the producer will not touch it.
        let byte = unsafe { self.data.get().cast::<u8>().add(head).read() };
        self.head.store((head + 1) % N, Ordering::Relaxed);
        self.count.fetch_sub(1, Ordering::Release);

        Some(byte)
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteSink for RingBuffer<N> {
    fn on_byte_received(&self, byte: u8) {
        let _ = self.try_push(byte);
    }
}
