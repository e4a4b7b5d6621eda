use core::{
    cell::RefCell,
    future::{poll_fn, Future},
    ops::{BitAnd, BitOr, BitOrAssign, Not},
    task::Poll,
};
use embassy_futures::select::{select, Either};
use embassy_sync::{
    blocking_mutex::{raw::RawMutex, Mutex},
    waitqueue::MultiWakerRegistration,
};
use embedded_hal_async::delay::DelayNs;

/// A set of named, payload-free event bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Signals(u32);

impl Signals {
    pub const NONE: Self = Self(0);
    pub const NEW_DATA: Self = Self(1 << 0);
    pub const MOVE: Self = Self(1 << 1);
    pub const ALERT: Self = Self(1 << 2);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Signals {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Signals {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Signals {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for Signals {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

/// Returned by a bounded wait when none of the requested signals arrived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout;

#[derive(Clone, Copy)]
enum Match {
    Any,
    All,
}

struct State<const W: usize> {
    latched: Signals,
    wakers: MultiWakerRegistration<W>,
}

/// Latched event flags shared by every task.
///
/// `set` ORs bits in and never blocks, so it is safe from interrupt context.
/// A wait that matches clears exactly the bits it returns. Repeated sets
/// between two waits collapse into one.
pub struct SignalBus<M: RawMutex, const W: usize> {
    state: Mutex<M, RefCell<State<W>>>,
}

impl<M: RawMutex, const W: usize> SignalBus<M, W> {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(State {
                latched: Signals::NONE,
                wakers: MultiWakerRegistration::new(),
            })),
        }
    }

    pub fn set(&self, signals: Signals) {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            state.latched |= signals;
            state.wakers.wake();
        });
    }

    /// Bits currently latched. Does not consume anything.
    pub fn peek(&self) -> Signals {
        self.state.lock(|state| state.borrow().latched)
    }

    pub fn try_wait_any(&self, signals: Signals) -> Option<Signals> {
        self.state
            .lock(|state| Self::take(&mut state.borrow_mut(), signals, Match::Any))
    }

    pub fn try_wait_all(&self, signals: Signals) -> Option<Signals> {
        self.state
            .lock(|state| Self::take(&mut state.borrow_mut(), signals, Match::All))
    }

    /// Resolves once any of `signals` is latched, with the bits it consumed.
    pub fn wait_any(&self, signals: Signals) -> impl Future<Output = Signals> + '_ {
        self.wait(signals, Match::Any)
    }

    /// Resolves once all of `signals` are latched, consuming all of them.
    pub fn wait_all(&self, signals: Signals) -> impl Future<Output = Signals> + '_ {
        self.wait(signals, Match::All)
    }

    pub async fn wait_any_timeout<D: DelayNs>(
        &self,
        signals: Signals,
        delay: &mut D,
        timeout_ms: u32,
    ) -> Result<Signals, Timeout> {
        match select(self.wait_any(signals), delay.delay_ms(timeout_ms)).await {
            Either::First(matched) => Ok(matched),
            Either::Second(()) => Err(Timeout),
        }
    }

    pub async fn wait_all_timeout<D: DelayNs>(
        &self,
        signals: Signals,
        delay: &mut D,
        timeout_ms: u32,
    ) -> Result<Signals, Timeout> {
        match select(self.wait_all(signals), delay.delay_ms(timeout_ms)).await {
            Either::First(matched) => Ok(matched),
            Either::Second(()) => Err(Timeout),
        }
    }

    fn wait(&self, signals: Signals, mode: Match) -> impl Future<Output = Signals> + '_ {
        poll_fn(move |cx| {
            self.state.lock(|state| {
                let mut state = state.borrow_mut();
                match Self::take(&mut state, signals, mode) {
                    Some(matched) => Poll::Ready(matched),
                    None => {
                        state.wakers.register(cx.waker());
                        Poll::Pending
                    }
                }
            })
        })
    }

    fn take(state: &mut State<W>, signals: Signals, mode: Match) -> Option<Signals> {
        let matched = state.latched & signals;
        let ready = match mode {
            Match::Any => !matched.is_empty(),
            Match::All => !signals.is_empty() && matched == signals,
        };

        if !ready {
            return None;
        }

        state.latched = state.latched & !matched;
        Some(matched)
    }
}

impl<M: RawMutex, const W: usize> Default for SignalBus<M, W> {
    fn default() -> Self {
        Self::new()
    }
}
