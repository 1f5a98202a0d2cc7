//! Run command handler.
//!
//! Resolves paths and drives the orchestrator exactly as a runtime would at
//! startup, but against [`ReportingExecutor`], which describes each action
//! instead of executing code.

use std::fs::{self, File};
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;

use anyhow::Result;

use rtpath_core::{
    BuildConstants, ExecutionError, ExecutionPort, Orchestrator, OsPlatform, PathConfiguration,
    PlatformPolicy, RunOutcome, RuntimeConfig,
};

use crate::commands::RunArgs;
use crate::error::CliError;

/// Leading bytes of a zip archive.
const ZIP_MAGIC: [u8; 4] = *b"PK\x03\x04";

/// Execution collaborator that reports actions to a writer.
pub struct ReportingExecutor<W: Write> {
    out: W,
}

impl<W: Write> ReportingExecutor<W> {
    /// Report to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn report(&mut self, action: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{action}") {
            tracing::warn!(error = %e, "failed to write report");
        }
    }
}

fn has_zip_magic(path: &Path) -> io::Result<bool> {
    let mut head = [0u8; 4];
    match File::open(path)?.read_exact(&mut head) {
        Ok(()) => Ok(head == ZIP_MAGIC),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

impl<W: Write> ExecutionPort for ReportingExecutor<W> {
    /// A directory with a `__main__.py`, or a zip archive.
    fn is_importable(&self, path: &str) -> Result<bool, ExecutionError> {
        let lookup_error = |e: io::Error| ExecutionError::ImporterLookup {
            path: path.to_string(),
            reason: e.to_string(),
        };

        let target = Path::new(path);
        match fs::metadata(target) {
            Ok(meta) if meta.is_dir() => Ok(target.join("__main__.py").is_file()),
            Ok(meta) if meta.is_file() => has_zip_magic(target).map_err(lookup_error),
            Ok(_) => Ok(false),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(lookup_error(e)),
        }
    }

    fn run_command(&mut self, command: &str) -> RunOutcome {
        self.report(format_args!("run command {command:?}"));
        RunOutcome::Completed
    }

    fn run_module(&mut self, module: &str, set_argv0: bool) -> RunOutcome {
        self.report(format_args!("run module {module} (set argv[0]: {set_argv0})"));
        RunOutcome::Completed
    }

    fn run_file(&mut self, path: &Path) -> RunOutcome {
        if let Err(e) = File::open(path) {
            eprintln!("rtpath: can't open file '{}': {e}", path.display());
            return RunOutcome::CannotOpen;
        }
        self.report(format_args!("run file {}", path.display()));
        RunOutcome::Completed
    }

    fn run_startup_file(&mut self, path: &Path) -> RunOutcome {
        if File::open(path).is_err() {
            return RunOutcome::CannotOpen;
        }
        self.report(format_args!("run startup file {}", path.display()));
        RunOutcome::Completed
    }

    fn run_interactive_hook(&mut self) -> RunOutcome {
        self.report(format_args!("run interactive hook"));
        RunOutcome::Completed
    }

    fn run_stdin(&mut self) -> RunOutcome {
        self.report(format_args!("read statements from <stdin>"));
        RunOutcome::Completed
    }

    fn stdin_is_tty(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn finalize(&mut self) -> Result<(), ExecutionError> {
        self.report(format_args!("finalize"));
        Ok(())
    }
}

/// Resolve paths for `config` and run the orchestrator against `exec`.
///
/// Returns the exit code and the final path configuration, including the
/// leading search path entry.
pub fn run_with<P, E>(
    mut config: RuntimeConfig,
    platform: &P,
    constants: &BuildConstants,
    exec: &mut E,
) -> Result<(i32, PathConfiguration), CliError>
where
    P: PlatformPolicy + ?Sized,
    E: ExecutionPort + ?Sized,
{
    config.read_environment()?;
    let paths =
        PathConfiguration::initialize(&PathConfiguration::new(), &config, platform, constants)?;
    config.absorb_path_config(&paths);

    let mut orchestrator = Orchestrator::new(config, paths, platform);
    let exit_code = orchestrator.run(exec);
    Ok((exit_code, orchestrator.paths().clone()))
}

/// Execute the run command. Returns the process exit code.
pub fn execute(args: &RunArgs, verbose: bool, program_name: Option<String>) -> Result<i32> {
    let mut config = args.to_runtime_config(program_name);
    config.verbose = verbose;
    let quiet = config.quiet;

    let platform = OsPlatform::new();
    let mut exec = ReportingExecutor::new(io::stdout());
    let (exit_code, paths) = run_with(config, &platform, &BuildConstants::compiled(), &mut exec)?;

    if !quiet {
        let mut out = exec.into_inner();
        if let Some(entries) = paths.module_search_path() {
            writeln!(out, "module_search_path = [{}]", entries.join(", "))?;
        }
    }
    Ok(exit_code)
}
