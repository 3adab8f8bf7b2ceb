mod engine;
mod scheduler;

pub use engine::{CountdownTimer, TimerPurpose, TimerState};
pub use scheduler::RitualScheduler;
