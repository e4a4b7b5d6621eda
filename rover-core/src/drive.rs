use crate::{
    backend::{ActuatorBackend, MotorSide},
    command::DecodedCommand,
    pipeline::Pipeline,
    signal::Signals,
};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use log::debug;

/// Duties for the two PWM lines of one motor. At most one is non-zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelDuty {
    pub forward: u16,
    pub backward: u16,
}

impl ChannelDuty {
    pub const IDLE: Self = Self {
        forward: 0,
        backward: 0,
    };

    /// Splits a signed drive value into line duties, clamped to `[0, period]`.
    pub fn from_value(value: i32, period: u16) -> Self {
        let duty = value.unsigned_abs().min(u32::from(period)) as u16;

        match value.signum() {
            1 => Self {
                forward: duty,
                backward: 0,
            },
            -1 => Self {
                forward: 0,
                backward: duty,
            },
            _ => Self::IDLE,
        }
    }
}

/// Signed wheel drive values, saturated to `[-period, period]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorCommand {
    pub left: i32,
    pub right: i32,
}

impl MotorCommand {
    /// Differential drive mix: forward velocity plus or minus turn.
    pub fn mix(command: DecodedCommand, scale: i32, period: u16) -> Self {
        let x = i32::from(command.x).saturating_mul(scale);
        let y = i32::from(command.y).saturating_mul(scale);
        let limit = i32::from(period);

        Self {
            left: y.saturating_add(x).clamp(-limit, limit),
            right: y.saturating_sub(x).clamp(-limit, limit),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.left == 0 && self.right == 0
    }

    pub fn duties(&self, period: u16) -> (ChannelDuty, ChannelDuty) {
        if self.is_idle() {
            return (ChannelDuty::IDLE, ChannelDuty::IDLE);
        }

        (
            ChannelDuty::from_value(self.left, period),
            ChannelDuty::from_value(self.right, period),
        )
    }
}

pub fn actuate<B: ActuatorBackend>(backend: &mut B, motion: MotorCommand, period: u16) {
    let (left, right) = motion.duties(period);

    backend.set_motor(MotorSide::Left, left.forward, left.backward);
    backend.set_motor(MotorSide::Right, right.forward, right.backward);
}

/// Applies the latest command every time "move" is raised.
pub struct Actuator<'a, M: RawMutex, const W: usize> {
    pipeline: &'a Pipeline<M, W>,
    scale: i32,
    period: u16,
}

impl<'a, M: RawMutex, const W: usize> Actuator<'a, M, W> {
    pub fn new(pipeline: &'a Pipeline<M, W>, scale: i32, period: u16) -> Self {
        Self {
            pipeline,
            scale,
            period,
        }
    }

    pub async fn step<B: ActuatorBackend>(&mut self, backend: &mut B) -> MotorCommand {
        self.pipeline.bus.wait_any(Signals::MOVE).await;

        let command = self
            .pipeline
            .command
            .take()
            .unwrap_or_else(|| self.pipeline.command.latest());
        let motion = MotorCommand::mix(command, self.scale, self.period);
        actuate(backend, motion, self.period);

        debug!("Driving left {} right {}", motion.left, motion.right);

        motion
    }

    pub async fn run<B: ActuatorBackend, D: DelayNs>(
        mut self,
        backend: &mut B,
        delay: &mut D,
        poll_ms: u32,
    ) {
        loop {
            self.step(backend).await;
            delay.delay_ms(poll_ms).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    const SCALE: i32 = 1000;
    const PERIOD: u16 = 6000;

    #[derive(Default)]
    struct Motors {
        writes: Vec<(MotorSide, u16, u16)>,
    }

    impl ActuatorBackend for Motors {
        fn set_motor(&mut self, side: MotorSide, forward: u16, backward: u16) {
            self.writes.push((side, forward, backward));
        }
    }

    fn command(x: i8, y: i8) -> DecodedCommand {
        DecodedCommand { stop: false, x, y }
    }

    #[test]
    fn every_command_is_saturated_and_signed() {
        for period in [PERIOD, 2500, 0] {
            for x in -3..=3 {
                for y in -3..=3 {
                    let motion = MotorCommand::mix(command(x, y), SCALE, period);
                    let (left, right) = motion.duties(period);

                    for (value, duty) in [(motion.left, left), (motion.right, right)] {
                        assert!(duty.forward <= period && duty.backward <= period);
                        assert!(duty.forward == 0 || duty.backward == 0);
                        assert_eq!(duty.forward > 0, value > 0);
                        assert_eq!(duty.backward > 0, value < 0);
                    }
                }
            }
        }
    }

    #[test]
    fn mix_follows_differential_law() {
        let motion = MotorCommand::mix(command(1, 2), SCALE, PERIOD);
        assert_eq!(motion, MotorCommand { left: 3000, right: 1000 });

        let motion = MotorCommand::mix(command(3, 3), SCALE, 5000);
        assert_eq!(motion, MotorCommand { left: 5000, right: 0 });

        let motion = MotorCommand::mix(command(3, -3), SCALE, 5000);
        assert_eq!(motion, MotorCommand { left: 0, right: -5000 });
    }

    #[test]
    fn negative_value_drives_backward_with_magnitude() {
        assert_eq!(
            ChannelDuty::from_value(-1000, PERIOD),
            ChannelDuty {
                forward: 0,
                backward: 1000
            }
        );
        assert_eq!(
            ChannelDuty::from_value(-9000, PERIOD),
            ChannelDuty {
                forward: 0,
                backward: PERIOD
            }
        );
        assert_eq!(ChannelDuty::from_value(0, PERIOD), ChannelDuty::IDLE);
    }

    #[test]
    fn idle_command_zeroes_all_lines() {
        let mut motors = Motors::default();
        actuate(&mut motors, MotorCommand::mix(command(0, 0), SCALE, PERIOD), PERIOD);

        assert_eq!(
            motors.writes,
            [(MotorSide::Left, 0, 0), (MotorSide::Right, 0, 0)]
        );
    }

    #[test]
    fn turn_left_spins_wheels_apart() {
        let pipeline = Pipeline::<CriticalSectionRawMutex, 4>::new();
        let mut actuator = Actuator::new(&pipeline, SCALE, PERIOD);
        let mut motors = Motors::default();

        pipeline.command.publish(DecodedCommand::decode(0x0a));
        pipeline.bus.set(Signals::MOVE);

        let motion = block_on(actuator.step(&mut motors));
        assert_eq!(motion, MotorCommand { left: -1000, right: 1000 });
        assert_eq!(
            motors.writes,
            [(MotorSide::Left, 0, 1000), (MotorSide::Right, 1000, 0)]
        );
        assert!(!pipeline.command.has_unread());
    }

    #[test]
    fn one_move_signal_is_one_actuation() {
        let pipeline = Pipeline::<CriticalSectionRawMutex, 4>::new();
        let mut actuator = Actuator::new(&pipeline, SCALE, PERIOD);
        let mut motors = Motors::default();

        pipeline.command.publish(command(0, 1));
        pipeline.command.publish(command(0, 2));
        pipeline.bus.set(Signals::MOVE);
        pipeline.bus.set(Signals::MOVE);

        let motion = block_on(actuator.step(&mut motors));
        assert_eq!(motion, MotorCommand { left: 2000, right: 2000 });
        assert_eq!(motors.writes.len(), 2);
        assert_eq!(pipeline.bus.try_wait_any(Signals::MOVE), None);
    }
}
