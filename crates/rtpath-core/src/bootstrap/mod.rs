//! Bootstrap orchestration: what runs once paths are known.
//!
//! Decides the run mode from the process configuration, computes the
//! leading module search path entry for it, and dispatches to an
//! [`ExecutionPort`](crate::ports::ExecutionPort).

mod orchestrator;
mod run_mode;

pub use orchestrator::{
    EXIT_CANNOT_OPEN, EXIT_FAILURE, EXIT_FINALIZE_FAILED, EXIT_INTERRUPTED, EXIT_SUCCESS,
    Orchestrator,
};
pub use run_mode::{RunMode, compute_leading_entry, determine_run_mode, leading_search_path_entry};
