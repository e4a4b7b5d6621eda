use core::marker::PhantomData;
use portable_atomic::{AtomicU16, Ordering};

/// A value that fits losslessly in one byte.
pub trait Slot: Copy {
    fn into_byte(self) -> u8;
    fn from_byte(byte: u8) -> Self;
}

impl Slot for u8 {
    fn into_byte(self) -> u8 {
        self
    }

    fn from_byte(byte: u8) -> Self {
        byte
    }
}

const FRESH: u16 = 1 << 8;

/// Single-slot, last-write-wins cell.
///
/// The value and its unread flag share one atomic word. `publish` is a release
/// store, so a writer that publishes and then sets a signal guarantees the
/// waiter's acquire load sees the value. At most one unread value exists; a
/// second publish before a `take` overwrites the first.
pub struct Mailbox<T> {
    slot: AtomicU16,
    _value: PhantomData<fn() -> T>,
}

impl<T: Slot> Mailbox<T> {
    pub const fn new() -> Self {
        Self {
            slot: AtomicU16::new(0),
            _value: PhantomData,
        }
    }

    pub fn publish(&self, value: T) {
        self.slot
            .store(FRESH | u16::from(value.into_byte()), Ordering::Release);
    }

    /// The unread value, marking it read.
    pub fn take(&self) -> Option<T> {
        let previous = self.slot.fetch_and(!FRESH, Ordering::AcqRel);
        (previous & FRESH != 0).then(|| T::from_byte(previous as u8))
    }

    /// The most recent value, read or not.
    pub fn latest(&self) -> T {
        T::from_byte(self.slot.load(Ordering::Acquire) as u8)
    }

    pub fn has_unread(&self) -> bool {
        self.slot.load(Ordering::Acquire) & FRESH != 0
    }
}

impl<T: Slot> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}
