//! Drives startup after path configuration: mode, leading entry, dispatch,
//! the optional interactive fallback and finalization.

use std::path::Path;

use super::run_mode::{RunMode, determine_run_mode, leading_search_path_entry};
use crate::config::{INSPECT_ENV, RuntimeConfig, STARTUP_ENV};
use crate::paths::PathConfiguration;
use crate::ports::{ExecutionPort, PlatformPolicy, RunOutcome};

/// Normal exit.
pub const EXIT_SUCCESS: i32 = 0;

/// Unhandled error in user code or during startup.
pub const EXIT_FAILURE: i32 = 1;

/// The file to run could not be opened.
pub const EXIT_CANNOT_OPEN: i32 = 2;

/// Runtime finalization failed.
pub const EXIT_FINALIZE_FAILED: i32 = 120;

/// An interrupt signal went unhandled (`128 + SIGINT`).
#[cfg(not(windows))]
pub const EXIT_INTERRUPTED: i32 = 128 + 2;

/// An interrupt signal went unhandled (`STATUS_CONTROL_C_EXIT`).
#[cfg(windows)]
#[allow(clippy::cast_possible_wrap)]
pub const EXIT_INTERRUPTED: i32 = 0xC000_013A_u32 as i32;

/// Runs the main program once paths are configured.
pub struct Orchestrator<'a, P: PlatformPolicy + ?Sized> {
    config: RuntimeConfig,
    paths: PathConfiguration,
    platform: &'a P,
    interrupted: bool,
}

impl<'a, P: PlatformPolicy + ?Sized> Orchestrator<'a, P> {
    /// Create an orchestrator over an initialized path configuration.
    pub const fn new(config: RuntimeConfig, paths: PathConfiguration, platform: &'a P) -> Self {
        Self {
            config,
            paths,
            platform,
            interrupted: false,
        }
    }

    /// The path configuration, including any inserted leading entry.
    pub const fn paths(&self) -> &PathConfiguration {
        &self.paths
    }

    /// The process configuration as modified by the run.
    pub const fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run the main program and tear down. Returns the process exit code.
    pub fn run<E>(&mut self, exec: &mut E) -> i32
    where
        E: ExecutionPort + ?Sized,
    {
        let mut exit_code = self.run_main(exec);

        if let Err(e) = exec.finalize() {
            tracing::error!(error = %e, "finalization failed");
            exit_code = EXIT_FINALIZE_FAILED;
        }
        if self.interrupted {
            exit_code = EXIT_INTERRUPTED;
        }
        exit_code
    }

    fn run_main<E>(&mut self, exec: &mut E) -> i32
    where
        E: ExecutionPort + ?Sized,
    {
        let mode = match determine_run_mode(&self.config, exec) {
            Ok(mode) => mode,
            Err(e) => {
                eprintln!("Failed checking if argv[0] is an import path entry");
                tracing::debug!(error = %e, "importer probe failed");
                return EXIT_FAILURE;
            }
        };
        tracing::debug!(?mode, "selected run mode");

        match leading_search_path_entry(&mode, &self.config, self.platform) {
            Ok(Some(entry)) => {
                tracing::debug!(entry = %entry, "inserting leading search path entry");
                self.paths
                    .module_search_path
                    .get_or_insert_with(Vec::new)
                    .insert(0, entry);
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("Fatal error: computing leading search path entry: {e}");
                return EXIT_FAILURE;
            }
        }

        let mut exit_code = match &mode {
            RunMode::Command(command) => {
                let outcome = exec.run_command(command);
                self.exit_code(outcome)
            }
            RunMode::Module(module) => {
                let outcome = exec.run_module(module, true);
                self.exit_code(outcome)
            }
            RunMode::ImportablePackage(_) => {
                let outcome = exec.run_module("__main__", false);
                self.exit_code(outcome)
            }
            RunMode::File(filename) => {
                let outcome = exec.run_file(Path::new(filename));
                self.exit_code(outcome)
            }
            RunMode::InteractiveStdin => self.run_stdin(exec),
        };

        self.run_repl(exec, &mode, &mut exit_code);
        exit_code
    }

    fn stdin_is_interactive<E>(&self, exec: &E) -> bool
    where
        E: ExecutionPort + ?Sized,
    {
        exec.stdin_is_tty() || self.config.interactive
    }

    fn run_stdin<E>(&mut self, exec: &mut E) -> i32
    where
        E: ExecutionPort + ?Sized,
    {
        if self.stdin_is_interactive(exec) {
            // SystemExit ends the session from here on.
            self.config.inspect = false;

            if let Some(code) = self.run_startup(exec) {
                return code;
            }
            if let Some(code) = self.run_hook(exec) {
                return code;
            }
        }

        let outcome = exec.run_stdin();
        self.exit_code(outcome)
    }

    /// After the main program: drop into an interactive session if
    /// inspection was requested, possibly by the program itself through
    /// the environment.
    fn run_repl<E>(&mut self, exec: &mut E, mode: &RunMode, exit_code: &mut i32)
    where
        E: ExecutionPort + ?Sized,
    {
        if !self.config.inspect
            && matches!(self.config.env_value(INSPECT_ENV), Ok(Some(_)) | Err(_))
        {
            self.config.inspect = true;
        }

        if !(self.config.inspect && self.stdin_is_interactive(exec) && mode.runs_code()) {
            return;
        }

        self.config.inspect = false;
        if let Some(code) = self.run_hook(exec) {
            *exit_code = code;
            return;
        }

        let outcome = exec.run_stdin();
        *exit_code = self.exit_code(outcome);
    }

    /// Run the startup file named in the environment. Only an explicit
    /// exit request stops startup.
    fn run_startup<E>(&mut self, exec: &mut E) -> Option<i32>
    where
        E: ExecutionPort + ?Sized,
    {
        let startup = match self.config.env_value(STARTUP_ENV) {
            Ok(Some(path)) => path,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring {STARTUP_ENV}");
                return None;
            }
        };

        match exec.run_startup_file(Path::new(&startup)) {
            RunOutcome::SystemExit(code) => Some(code),
            RunOutcome::CannotOpen => {
                eprintln!("Could not open {STARTUP_ENV}");
                None
            }
            RunOutcome::Interrupted => {
                self.interrupted = true;
                None
            }
            RunOutcome::Completed | RunOutcome::Failed => None,
        }
    }

    fn run_hook<E>(&mut self, exec: &mut E) -> Option<i32>
    where
        E: ExecutionPort + ?Sized,
    {
        match exec.run_interactive_hook() {
            RunOutcome::SystemExit(code) => Some(code),
            RunOutcome::Failed | RunOutcome::CannotOpen => {
                eprintln!("Failed calling the interactive hook");
                None
            }
            RunOutcome::Interrupted => {
                self.interrupted = true;
                None
            }
            RunOutcome::Completed => None,
        }
    }

    fn exit_code(&mut self, outcome: RunOutcome) -> i32 {
        match outcome {
            RunOutcome::Completed => EXIT_SUCCESS,
            RunOutcome::Failed => EXIT_FAILURE,
            RunOutcome::SystemExit(code) => code,
            RunOutcome::CannotOpen => EXIT_CANNOT_OPEN,
            RunOutcome::Interrupted => {
                self.interrupted = true;
                EXIT_FAILURE
            }
        }
    }
}
