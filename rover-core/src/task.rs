/// Fixed scheduling priority. A higher priority task that becomes runnable
/// preempts a lower one at its next await point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Priority {
    Normal,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskDescriptor {
    pub name: &'static str,
    pub priority: Priority,
}

impl TaskDescriptor {
    pub const fn new(name: &'static str, priority: Priority) -> Self {
        Self { name, priority }
    }

    pub fn preempts(&self, other: &TaskDescriptor) -> bool {
        self.priority > other.priority
    }
}

pub const RECEIVER: TaskDescriptor = TaskDescriptor::new("receiver", Priority::Normal);
pub const DECODER: TaskDescriptor = TaskDescriptor::new("decoder", Priority::Normal);
pub const ACTUATOR: TaskDescriptor = TaskDescriptor::new("actuator", Priority::Normal);
pub const HEARTBEAT: TaskDescriptor = TaskDescriptor::new("heartbeat", Priority::Normal);
pub const ALERT: TaskDescriptor = TaskDescriptor::new("alert", Priority::High);

pub const TASKS: [TaskDescriptor; 5] = [RECEIVER, DECODER, ACTUATOR, HEARTBEAT, ALERT];
