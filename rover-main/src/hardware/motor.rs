use crate::{hardware::PIPELINE, peripherals::PeripheralsMotor, spawner::Spawners};
use defmt::info;
use embassy_rp::{
    peripherals::{PWM_CH3, PWM_CH7},
    pwm::{Channel, Config, Pwm, PwmPinA, PwmPinB},
    Peripheral,
};
use embassy_time::Delay;
use rover_core::{
    backend::{ActuatorBackend, MotorSide},
    drive::Actuator,
    get_config, task,
};

// 125 MHz / 83 counts at 1.5 MHz, 250 Hz at the default period
const DIVIDER: u8 = 83;

struct Motor<T: Channel> {
    pwm: Pwm<'static, T>,
    period: u16,
}

impl<T: Channel> Motor<T> {
    fn new(
        inner: impl Peripheral<P = T> + 'static,
        a: impl Peripheral<P = impl PwmPinA<T>> + 'static,
        b: impl Peripheral<P = impl PwmPinB<T>> + 'static,
        period: u16,
    ) -> Self {
        let pwm = Pwm::new_output_ab(inner, a, b, Self::config(period, 0, 0));

        Self { pwm, period }
    }

    fn config(period: u16, forward: u16, backward: u16) -> Config {
        let mut config = Config::default();

        config.top = period;
        config.divider = DIVIDER.into();
        config.compare_a = forward;
        config.compare_b = backward;

        config
    }

    fn set_duty(&mut self, forward: u16, backward: u16) {
        self.pwm
            .set_config(&Self::config(self.period, forward, backward));
    }
}

pub struct DriveMotors {
    left: Motor<PWM_CH7>,
    right: Motor<PWM_CH3>,
}

impl ActuatorBackend for DriveMotors {
    fn set_motor(&mut self, side: MotorSide, forward: u16, backward: u16) {
        match side {
            MotorSide::Left => self.left.set_duty(forward, backward),
            MotorSide::Right => self.right.set_duty(forward, backward),
        }
    }
}

#[embassy_executor::task]
async fn motor_task(mut motors: DriveMotors, scale: i32, period: u16, poll_ms: u32) {
    Actuator::new(&PIPELINE, scale, period)
        .run(&mut motors, &mut Delay, poll_ms)
        .await;
}

pub async fn init(spawners: &Spawners, p: PeripheralsMotor) {
    info!("Starting motor");

    let scale = get_config!(drive_scale);
    let period = get_config!(pwm_period);
    let poll_ms = get_config!(poll_ms);

    // left = 14, 15
    // right = 6, 7
    let motors = DriveMotors {
        left: Motor::new(p.PWM_CH7, p.PIN_14, p.PIN_15, period),
        right: Motor::new(p.PWM_CH3, p.PIN_6, p.PIN_7, period),
    };

    spawners.must_spawn(task::ACTUATOR, motor_task(motors, scale, period, poll_ms));
}
