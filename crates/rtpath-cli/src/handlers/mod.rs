//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Thin wrappers that:
//!   1. Turn CLI input into core configuration
//!   2. Call rtpath-core
//!   3. Format output for the terminal
//!
//! Handlers should NOT contain resolution logic.

pub mod paths;
pub mod run;
