//! Port definitions: the seams between the core logic and the outside world.

mod execution;
mod platform;

pub use execution::{ExecutionError, ExecutionPort, RunOutcome};
pub use platform::{Landmarks, PlatformPolicy};

#[cfg(test)]
pub use execution::MockExecutionPort;
