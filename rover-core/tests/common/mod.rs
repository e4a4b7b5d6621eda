#![allow(dead_code)]

use embedded_hal_async::delay::DelayNs;
use rover_core::{
    backend::{ActuatorBackend, AudioBackend, Indicator, IndicatorBackend, Level, MotorSide, Note},
    task::TaskDescriptor,
};
use std::{
    cell::{Cell, RefCell},
    future::{poll_fn, Future},
    pin::Pin,
    rc::Rc,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    task::{Context, Poll, Wake, Waker},
};

const NS_PER_MS: u64 = 1_000_000;

/// Virtual time, in nanoseconds. Only advances when every task is blocked.
#[derive(Default)]
pub struct Clock {
    now: Cell<u64>,
    sleepers: RefCell<Vec<(u64, Waker)>>,
}

impl Clock {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn now_ms(&self) -> u64 {
        self.now.get() / NS_PER_MS
    }

    pub fn delay(self: &Rc<Self>) -> SimDelay {
        SimDelay(self.clone())
    }

    fn next_deadline(&self) -> Option<u64> {
        self.sleepers.borrow().iter().map(|(at, _)| *at).min()
    }

    fn advance_to(&self, at: u64) {
        self.now.set(at);

        let due: Vec<Waker> = {
            let mut sleepers = self.sleepers.borrow_mut();
            let (due, pending): (Vec<_>, Vec<_>) =
                sleepers.drain(..).partition(|(deadline, _)| *deadline <= at);
            *sleepers = pending;
            due.into_iter().map(|(_, waker)| waker).collect()
        };

        for waker in due {
            waker.wake();
        }
    }

    async fn sleep_until(&self, deadline: u64) {
        poll_fn(|cx| {
            if self.now.get() >= deadline {
                Poll::Ready(())
            } else {
                self.sleepers.borrow_mut().push((deadline, cx.waker().clone()));
                Poll::Pending
            }
        })
        .await
    }
}

#[derive(Clone)]
pub struct SimDelay(Rc<Clock>);

impl DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        let deadline = self.0.now.get() + u64::from(ns);
        self.0.sleep_until(deadline).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        let deadline = self.0.now.get() + u64::from(ms) * NS_PER_MS;
        self.0.sleep_until(deadline).await;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
    Motor(MotorSide, u16, u16),
    Led(Indicator, Level),
    Tone(Note),
    Quiet,
    Mark(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    pub at_ms: u64,
    pub output: Output,
}

/// Records every backend write with the virtual time it happened at.
#[derive(Clone)]
pub struct Recorder {
    clock: Rc<Clock>,
    events: Rc<RefCell<Vec<Event>>>,
}

impl Recorder {
    pub fn new(clock: &Rc<Clock>) -> Self {
        Self {
            clock: clock.clone(),
            events: Rc::default(),
        }
    }

    pub fn push(&self, output: Output) {
        self.events.borrow_mut().push(Event {
            at_ms: self.clock.now_ms(),
            output,
        });
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn first(&self, output: Output) -> Option<u64> {
        self.find(output).next()
    }

    pub fn find(&self, output: Output) -> impl Iterator<Item = u64> {
        self.events()
            .into_iter()
            .filter(move |event| event.output == output)
            .map(|event| event.at_ms)
    }

    pub fn motor_writes(&self) -> Vec<Output> {
        self.events()
            .into_iter()
            .map(|event| event.output)
            .filter(|output| matches!(output, Output::Motor(..)))
            .collect()
    }
}

impl ActuatorBackend for Recorder {
    fn set_motor(&mut self, side: MotorSide, forward: u16, backward: u16) {
        self.push(Output::Motor(side, forward, backward));
    }
}

impl IndicatorBackend for Recorder {
    fn set(&mut self, indicator: Indicator, level: Level) {
        self.push(Output::Led(indicator, level));
    }
}

impl AudioBackend for Recorder {
    fn set_tone(&mut self, note: Note) {
        self.push(Output::Tone(note));
    }

    fn stop_tone(&mut self) {
        self.push(Output::Quiet);
    }
}

struct Ready(AtomicBool);

impl Wake for Ready {
    fn wake(self: Arc<Self>) {
        self.0.store(true, Ordering::SeqCst);
    }
}

struct Slot<'a> {
    descriptor: TaskDescriptor,
    future: Pin<Box<dyn Future<Output = ()> + 'a>>,
    ready: Arc<Ready>,
    done: bool,
}

/// Single-core, fixed-priority runner over virtual time.
///
/// A task runs from one await point to the next. After every step the
/// highest-priority ready task is picked, round-robin among equals.
pub struct Runner<'a> {
    clock: Rc<Clock>,
    slots: Vec<Slot<'a>>,
    last: usize,
}

impl<'a> Runner<'a> {
    pub fn new(clock: &Rc<Clock>) -> Self {
        Self {
            clock: clock.clone(),
            slots: Vec::new(),
            last: 0,
        }
    }

    pub fn spawn(&mut self, descriptor: TaskDescriptor, future: impl Future<Output = ()> + 'a) {
        self.slots.push(Slot {
            descriptor,
            future: Box::pin(future),
            ready: Arc::new(Ready(AtomicBool::new(true))),
            done: false,
        });
    }

    pub fn run_for_ms(&mut self, duration_ms: u64) {
        let limit = self.clock.now.get() + duration_ms * NS_PER_MS;

        loop {
            if let Some(index) = self.pick() {
                self.step(index);
                continue;
            }

            match self.clock.next_deadline() {
                Some(at) if at <= limit => self.clock.advance_to(at),
                _ => {
                    self.clock.advance_to(limit);
                    return;
                }
            }
        }
    }

    fn pick(&self) -> Option<usize> {
        let count = self.slots.len();
        let ready = |slot: &Slot| !slot.done && slot.ready.0.load(Ordering::SeqCst);

        let top = self
            .slots
            .iter()
            .filter(|slot| ready(*slot))
            .map(|slot| slot.descriptor.priority)
            .max()?;

        (1..=count)
            .map(|offset| (self.last + offset) % count)
            .find(|&index| {
                let slot = &self.slots[index];
                ready(slot) && slot.descriptor.priority == top
            })
    }

    fn step(&mut self, index: usize) {
        self.last = index;
        let slot = &mut self.slots[index];
        slot.ready.0.store(false, Ordering::SeqCst);

        let waker = Waker::from(slot.ready.clone());
        let mut cx = Context::from_waker(&waker);
        if slot.future.as_mut().poll(&mut cx).is_ready() {
            slot.done = true;
        }
    }
}
