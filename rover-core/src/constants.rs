pub const RX_QUEUE_CAPACITY: usize = 32;

// Tasks that may block on the bus at the same time.
pub const SIGNAL_WAITERS: usize = 4;

pub const AXIS_MAGNITUDE_MAX: i8 = 3;
