#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod bootstrap;
pub mod config;
pub mod paths;
pub mod ports;

// Re-export commonly used types for convenience
pub use bootstrap::{Orchestrator, RunMode};
pub use config::RuntimeConfig;
pub use paths::{
    BuildConstants, OsPlatform, PathConfiguration, PathError, PathResult, SearchOutcome,
    StepError, calculate,
};
pub use ports::{ExecutionError, ExecutionPort, Landmarks, PlatformPolicy, RunOutcome};
