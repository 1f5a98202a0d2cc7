//! Execution collaborator port.
//!
//! The orchestrator decides *what* runs; an implementation of this trait
//! does the running (compiling, evaluating, driving a REPL). Implementations
//! live in adapters.

use std::path::Path;

use thiserror::Error;

/// Errors raised by an execution collaborator outside of user code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Probing a path for an importer failed.
    #[error("importer lookup failed for {path}: {reason}")]
    ImporterLookup { path: String, reason: String },

    /// Runtime finalization failed.
    #[error("finalization failed: {0}")]
    Finalize(String),
}

/// How a single execution step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Ran to completion.
    Completed,
    /// Raised an unhandled error (already reported by the collaborator).
    Failed,
    /// User code requested exit with a status.
    SystemExit(i32),
    /// The target file could not be opened.
    CannotOpen,
    /// An interrupt signal went unhandled.
    Interrupted,
}

/// Port for running code once paths are configured.
#[cfg_attr(test, mockall::automock)]
pub trait ExecutionPort {
    /// Whether `path` is itself importable (a directory or archive with a
    /// loader for its entry point).
    fn is_importable(&self, path: &str) -> Result<bool, ExecutionError>;

    /// Run a command string.
    fn run_command(&mut self, command: &str) -> RunOutcome;

    /// Run a module as the main program.
    fn run_module(&mut self, module: &str, set_argv0: bool) -> RunOutcome;

    /// Run a source file.
    fn run_file(&mut self, path: &Path) -> RunOutcome;

    /// Run an interactive startup file.
    fn run_startup_file(&mut self, path: &Path) -> RunOutcome;

    /// Invoke the interactive setup hook.
    fn run_interactive_hook(&mut self) -> RunOutcome;

    /// Read and run statements from standard input.
    fn run_stdin(&mut self) -> RunOutcome;

    /// Whether standard input is a terminal.
    fn stdin_is_tty(&self) -> bool;

    /// Tear the runtime down.
    fn finalize(&mut self) -> Result<(), ExecutionError>;
}
