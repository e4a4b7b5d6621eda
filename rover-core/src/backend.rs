//! Seams to the board. Writes through these are assumed to always succeed.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorSide {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    Heartbeat,
    Alert,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    On,
    Off,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Note {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

pub trait ActuatorBackend {
    /// Drives one motor. Duties are already clamped to the PWM period, and at
    /// most one of them is non-zero.
    fn set_motor(&mut self, side: MotorSide, forward: u16, backward: u16);
}

pub trait IndicatorBackend {
    fn set(&mut self, indicator: Indicator, level: Level);
}

pub trait AudioBackend {
    fn set_tone(&mut self, note: Note);
    fn stop_tone(&mut self);
}

/// Audio backend for boards without a buzzer.
pub struct Silent;

impl AudioBackend for Silent {
    fn set_tone(&mut self, _note: Note) {}

    fn stop_tone(&mut self) {}
}
