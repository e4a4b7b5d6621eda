use embassy_rp::{peripherals::USB, Peripherals};

macro_rules! make_peripherals {
    ($name:ident, ($($pin:ident), *)) => {
        paste::paste! {
            #[allow(non_snake_case)]
            pub struct $name {
                $(pub $pin: embassy_rp::peripherals::$pin,)*
            }

            macro_rules! [<$name:snake>] {
                ($p:ident) => {{
                    use crate::peripherals::*;
                    $name {
                        $($pin: $p.$pin,)*
                    }
                }}
            }
        }
    };
}

make_peripherals! {
    PeripheralsBuzzer,
    (PIN_0, PWM_CH0)
}

make_peripherals! {
    PeripheralsIndicator,
    (PIN_18, PIN_19)
}

make_peripherals! {
    PeripheralsMotor,
    (PIN_6, PIN_7, PIN_14, PIN_15, PWM_CH3, PWM_CH7)
}

make_peripherals! {
    PeripheralsUart,
    (UART1, PIN_20, PIN_21)
}

pub struct Board {
    pub buzzer: PeripheralsBuzzer,
    pub indicator: PeripheralsIndicator,
    pub motor: PeripheralsMotor,
    pub uart: PeripheralsUart,
    pub usb: USB,
}

pub fn get_peripherals(p: Peripherals) -> Board {
    Board {
        buzzer: peripherals_buzzer!(p),
        indicator: peripherals_indicator!(p),
        motor: peripherals_motor!(p),
        uart: peripherals_uart!(p),
        usb: p.USB,
    }
}
