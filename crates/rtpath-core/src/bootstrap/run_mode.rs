//! Run-mode selection and the leading search-path entry.

use crate::config::RuntimeConfig;
use crate::paths::{PathResult, bounded_copy, join};
use crate::ports::{ExecutionError, ExecutionPort, PlatformPolicy};

/// What the process runs as its main program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// A command string (`-c`).
    Command(String),
    /// A module run as `__main__` (`-m`).
    Module(String),
    /// A source file.
    File(String),
    /// A directory or archive with its own `__main__` entry point.
    ImportablePackage(String),
    /// Statements read from standard input.
    InteractiveStdin,
}

impl RunMode {
    /// Whether the mode runs code named on the command line.
    pub const fn runs_code(&self) -> bool {
        !matches!(self, Self::InteractiveStdin)
    }
}

/// Pick the run mode: command, then module, then file, then stdin.
///
/// A configured file is probed with the collaborator; if it is importable
/// the mode becomes [`RunMode::ImportablePackage`].
pub fn determine_run_mode<E>(config: &RuntimeConfig, exec: &E) -> Result<RunMode, ExecutionError>
where
    E: ExecutionPort + ?Sized,
{
    if let Some(command) = &config.run_command {
        return Ok(RunMode::Command(command.clone()));
    }
    if let Some(module) = &config.run_module {
        return Ok(RunMode::Module(module.clone()));
    }
    if let Some(filename) = &config.run_filename {
        if exec.is_importable(filename)? {
            return Ok(RunMode::ImportablePackage(filename.clone()));
        }
        return Ok(RunMode::File(filename.clone()));
    }
    Ok(RunMode::InteractiveStdin)
}

/// Entry to insert at the front of the module search path, if any.
///
/// An importable package always contributes itself. Otherwise isolation
/// suppresses the entry and it is derived from `argv` by
/// [`compute_leading_entry`].
pub fn leading_search_path_entry<P>(
    mode: &RunMode,
    config: &RuntimeConfig,
    platform: &P,
) -> PathResult<Option<String>>
where
    P: PlatformPolicy + ?Sized,
{
    match mode {
        RunMode::ImportablePackage(path) => Ok(Some(bounded_copy(path)?)),
        _ if config.isolated => Ok(None),
        _ => compute_leading_entry(&config.argv, platform),
    }
}

/// Derive the leading search-path entry from the program arguments.
///
/// `argv[0]` is `-m` for a module (the working directory), `-c` for a
/// command (the empty string), or the script path (its directory, after
/// following one symlink). Empty `argv` yields nothing.
pub fn compute_leading_entry<P>(argv: &[String], platform: &P) -> PathResult<Option<String>>
where
    P: PlatformPolicy + ?Sized,
{
    let Some(arg0) = argv.first() else {
        return Ok(None);
    };

    match arg0.as_str() {
        "-m" => return Ok(platform.current_dir()),
        "-c" => return Ok(Some(String::new())),
        _ => {}
    }

    let sep = platform.separator();
    let mut script = bounded_copy(arg0)?;
    if let Some(link) = platform.read_link(&script)? {
        if platform.is_absolute(&link) {
            script = link;
        } else if link.contains(sep) {
            if let Some(idx) = script.rfind(sep) {
                script = join(platform, &script[..=idx], &link)?;
            } else {
                script = link;
            }
        }
    }

    if let Some(real) = platform.real_path(&script) {
        script = real;
    }
    Ok(Some(platform.script_directory(&script)))
}
