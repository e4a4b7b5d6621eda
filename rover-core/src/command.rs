use crate::{
    constants::AXIS_MAGNITUDE_MAX,
    mailbox::Slot,
    pipeline::Pipeline,
    signal::Signals,
};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use log::debug;

// Wire layout of a command byte. Bit 7 is unused.
const STOP_BIT: u8 = 1 << 0;
const X_SHIFT: u8 = 1;
const X_SIGN: u8 = 1 << 3;
const Y_SHIFT: u8 = 4;
const Y_SIGN: u8 = 1 << 6;
const MAGNITUDE_MASK: u8 = 0b11;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedCommand {
    pub stop: bool,
    /// Turn, in `-3..=3`. Negative turns left.
    pub x: i8,
    /// Forward velocity, in `-3..=3`.
    pub y: i8,
}

impl DecodedCommand {
    pub const IDLE: Self = Self {
        stop: false,
        x: 0,
        y: 0,
    };

    /// Every byte decodes; there is no malformed input at this layer.
    pub const fn decode(byte: u8) -> Self {
        Self {
            stop: byte & STOP_BIT != 0,
            x: decode_axis(byte, X_SHIFT, X_SIGN),
            y: decode_axis(byte, Y_SHIFT, Y_SIGN),
        }
    }

    /// Canonical byte for this command. Magnitudes beyond 3 saturate and a
    /// zero axis never carries its sign bit.
    pub const fn encode(self) -> u8 {
        let stop = if self.stop { STOP_BIT } else { 0 };
        stop | encode_axis(self.x, X_SHIFT, X_SIGN) | encode_axis(self.y, Y_SHIFT, Y_SIGN)
    }
}

const fn decode_axis(byte: u8, shift: u8, sign: u8) -> i8 {
    let magnitude = ((byte >> shift) & MAGNITUDE_MASK) as i8;
    if byte & sign != 0 {
        -magnitude
    } else {
        magnitude
    }
}

const fn encode_axis(value: i8, shift: u8, sign: u8) -> u8 {
    let mut magnitude = value.unsigned_abs();
    if magnitude > AXIS_MAGNITUDE_MAX as u8 {
        magnitude = AXIS_MAGNITUDE_MAX as u8;
    }

    let bits = magnitude << shift;
    if value < 0 {
        bits | sign
    } else {
        bits
    }
}

impl From<u8> for DecodedCommand {
    fn from(byte: u8) -> Self {
        Self::decode(byte)
    }
}

impl Slot for DecodedCommand {
    fn into_byte(self) -> u8 {
        self.encode()
    }

    fn from_byte(byte: u8) -> Self {
        Self::decode(byte)
    }
}

/// Turns "new data" into a published command plus "move", and "alert" when
/// the stop bit is set.
pub struct Decoder<'a, M: RawMutex, const W: usize> {
    pipeline: &'a Pipeline<M, W>,
}

impl<'a, M: RawMutex, const W: usize> Decoder<'a, M, W> {
    pub fn new(pipeline: &'a Pipeline<M, W>) -> Self {
        Self { pipeline }
    }

    pub async fn next(&mut self) -> DecodedCommand {
        loop {
            self.pipeline.bus.wait_any(Signals::NEW_DATA).await;

            if let Some(byte) = self.pipeline.raw.take() {
                return self.dispatch(byte);
            }
        }
    }

    pub fn dispatch(&self, byte: u8) -> DecodedCommand {
        let command = DecodedCommand::decode(byte);
        self.pipeline.command.publish(command);

        let mut signals = Signals::MOVE;
        if command.stop {
            signals |= Signals::ALERT;
        }
        self.pipeline.bus.set(signals);

        debug!("Decoded {:#04x} into {:?}", byte, command);

        command
    }

    pub async fn run<D: DelayNs>(mut self, delay: &mut D, poll_ms: u32) {
        loop {
            self.next().await;
            delay.delay_ms(poll_ms).await;
        }
    }
}
