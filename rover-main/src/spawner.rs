use defmt::info;
use embassy_executor::{SendSpawner, SpawnToken, Spawner};
use rover_core::task::{Priority, TaskDescriptor};

/// One spawner per priority level. Normal tasks share the thread executor,
/// high tasks run on the interrupt executor and preempt them.
#[derive(Clone, Copy)]
pub struct Spawners {
    pub normal: Spawner,
    pub high: SendSpawner,
}

impl Spawners {
    pub fn new(normal: Spawner, high: SendSpawner) -> Self {
        Self { normal, high }
    }

    pub fn must_spawn<S: Send>(&self, task: TaskDescriptor, token: SpawnToken<S>) {
        info!("Spawning {} task ({})", task.name, task.priority);

        match task.priority {
            Priority::Normal => self.normal.must_spawn(token),
            Priority::High => self.high.must_spawn(token),
        }
    }
}
