//! Path resolution engine.
//!
//! Computes the still-unset fields of a [`PathConfiguration`] from the
//! build layout, the process configuration and what is on disk. The steps
//! run in a fixed order:
//!
//! 1. Resolve the executable's full path
//! 2. Follow symlinks to find the executable's real directory
//! 3. Apply an env config `home` redirect
//! 4. Search for the prefix (stdlib root)
//! 5. Derive the stdlib directory
//! 6. Derive the zip archive path
//! 7. Search for the exec prefix (dynamic modules root)
//! 8. Assemble the module search path
//! 9. Trim the public prefixes
//! 10. Warn if either search came up empty
//!
//! Every step either succeeds or aborts the whole calculation with a
//! [`StepError`] naming it.

use std::env;

use super::bounded::{absolutize, bounded_copy, join, normalize, reduce, reduce_n};
use super::error::{PathError, PathResult, StepContext, StepError};
use super::landmarks::{is_build_dir, is_dynload_dir, is_module_root, read_build_dir_marker};
use super::layout::BuildConstants;
use super::pathconfig::PathConfiguration;
use super::venv::read_venv_home;
use crate::config::RuntimeConfig;
use crate::ports::PlatformPolicy;

/// Symlink hops followed before giving up on the executable path.
pub const MAX_SYMLINK_HOPS: usize = 40;

/// Result of a prefix or exec prefix search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// No tier matched; the compiled-in default is used.
    NotFound,
    /// Found in an installed layout (or via a home override).
    FoundInstalled,
    /// Found in an uninstalled build tree.
    FoundBuildTree,
}

impl SearchOutcome {
    /// Whether any tier matched.
    pub const fn is_found(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Working state for one engine run. Dropped when the run finishes.
#[derive(Debug)]
struct CalculationContext<'a> {
    constants: &'a BuildConstants,
    path_env: Option<String>,
    pythonpath_env: Option<String>,
    platlibdir: String,
    /// `<platlibdir>/<runtime><version>`, e.g. `lib/py3.9`.
    lib_python: String,
    argv0_dir: String,
    warnings: bool,
}

impl<'a> CalculationContext<'a> {
    fn new<P>(
        platform: &P,
        constants: &'a BuildConstants,
        config: &RuntimeConfig,
    ) -> PathResult<Self>
    where
        P: PlatformPolicy + ?Sized,
    {
        let path_env = match env::var_os("PATH") {
            Some(raw) => Some(
                raw.into_string()
                    .map_err(|_| PathError::decode("PATH environment variable"))?,
            ),
            None => None,
        };

        let platlibdir = config
            .platlibdir
            .clone()
            .unwrap_or_else(|| constants.platlibdir.clone());
        let lib_python = join(platform, &platlibdir, &constants.versioned_dir())?;

        Ok(Self {
            constants,
            path_env,
            pythonpath_env: config.pythonpath_env.clone(),
            platlibdir,
            lib_python,
            argv0_dir: String::new(),
            warnings: config.pathconfig_warnings,
        })
    }
}

/// Compute every field still unset in `prior`.
///
/// Fields already present in `prior` are copied through untouched; the
/// searches still run because later steps depend on their results.
pub fn calculate<P>(
    platform: &P,
    constants: &BuildConstants,
    config: &RuntimeConfig,
    prior: &PathConfiguration,
) -> Result<PathConfiguration, StepError>
where
    P: PlatformPolicy + ?Sized,
{
    let mut ctx = CalculationContext::new(platform, constants, config).step("environment")?;
    let mut paths = prior.clone();

    let program_name = prior
        .program_name
        .clone()
        .or_else(|| config.program_name.clone())
        .unwrap_or_else(|| constants.default_program_name());
    let home = prior.home.clone().or_else(|| config.home.clone());

    let program_full_path = match &prior.program_full_path {
        Some(path) => path.clone(),
        None => resolve_program_full_path(platform, ctx.path_env.as_deref(), &program_name)
            .step("program full path")?,
    };
    tracing::debug!(program_full_path = %program_full_path, "resolved executable");

    let resolved = resolve_symlinks(platform, &program_full_path).step("symlinks")?;
    ctx.argv0_dir = reduce(platform, &resolved);

    if let Some(venv_home) = read_venv_home(platform, &ctx.argv0_dir).step("env config")? {
        tracing::debug!(home = %venv_home, "env config redirects executable directory");
        ctx.argv0_dir = venv_home;
    }

    let (prefix, prefix_outcome) =
        search_for_prefix(platform, &ctx, home.as_deref()).step("prefix")?;
    tracing::debug!(prefix = %prefix, outcome = ?prefix_outcome, "prefix search finished");

    let stdlib_dir = if prefix_outcome.is_found() {
        Some(
            absolutize(platform, &prefix)
                .and_then(|abs| normalize(platform, &abs))
                .step("stdlib dir")?,
        )
    } else {
        None
    };

    let zip_path = zip_path(platform, &ctx, &prefix, prefix_outcome).step("zip path")?;

    let (exec_prefix, exec_outcome) =
        search_for_exec_prefix(platform, &ctx, home.as_deref()).step("exec prefix")?;
    tracing::debug!(exec_prefix = %exec_prefix, outcome = ?exec_outcome, "exec prefix search finished");

    let search_path =
        module_search_path(platform, &ctx, &zip_path, &prefix, &exec_prefix).step("search path")?;

    let public_prefix = public_root(platform, &prefix, prefix_outcome, 2, &constants.prefix);
    let public_exec_prefix =
        public_root(platform, &exec_prefix, exec_outcome, 3, &constants.exec_prefix);

    if ctx.warnings {
        warn_missing(prefix_outcome, exec_outcome);
    }

    fill(&mut paths.program_full_path, program_full_path);
    fill(&mut paths.program_name, program_name);
    fill(&mut paths.prefix, public_prefix);
    fill(&mut paths.exec_prefix, public_exec_prefix);
    if let Some(dir) = stdlib_dir {
        fill(&mut paths.stdlib_dir, dir);
    }
    if paths.module_search_path.is_none() {
        paths.module_search_path = Some(search_path);
    }
    Ok(paths)
}

fn fill(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

/// Find the executable: a name with a separator is a path, otherwise ask
/// the OS, then search `PATH`. Returns an absolute path or empty.
fn resolve_program_full_path<P>(
    platform: &P,
    path_env: Option<&str>,
    program_name: &str,
) -> PathResult<String>
where
    P: PlatformPolicy + ?Sized,
{
    let found = if program_name.contains(platform.separator()) {
        bounded_copy(program_name)?
    } else if let Some(native) = platform.native_executable_path() {
        bounded_copy(&native)?
    } else if let Some(path_env) = path_env {
        search_path_env(platform, path_env, program_name)?.unwrap_or_default()
    } else {
        String::new()
    };

    if found.is_empty() {
        return Ok(found);
    }

    let mut full = absolutize(platform, &found)?;
    if !platform.is_absolute(&full) {
        // No working directory to anchor a relative name.
        return Ok(String::new());
    }

    if let Some(suffix) = platform.executable_suffix()
        && !full.ends_with(suffix)
    {
        let suffixed = bounded_copy(&format!("{full}{suffix}"))?;
        if platform.is_executable_file(&suffixed) {
            full = suffixed;
        }
    }
    Ok(full)
}

fn search_path_env<P>(platform: &P, path_env: &str, program_name: &str) -> PathResult<Option<String>>
where
    P: PlatformPolicy + ?Sized,
{
    for dir in path_env.split(platform.delimiter()) {
        let candidate = join(platform, dir, program_name)?;
        if platform.is_executable_file(&candidate) {
            tracing::debug!(candidate = %candidate, "found executable on PATH");
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Follow the full path through symlinks; relative targets resolve against
/// the directory of the link.
fn resolve_symlinks<P>(platform: &P, full_path: &str) -> PathResult<String>
where
    P: PlatformPolicy + ?Sized,
{
    let mut current = bounded_copy(full_path)?;
    let mut hops = 0;

    while let Some(target) = platform.read_link(&current)? {
        hops += 1;
        if hops > MAX_SYMLINK_HOPS {
            return Err(PathError::SymlinkLoop {
                path: full_path.to_string(),
                hops,
            });
        }
        current = if platform.is_absolute(&target) {
            bounded_copy(&target)?
        } else {
            join(platform, &reduce(platform, &current), &target)?
        };
    }
    Ok(current)
}

fn search_for_prefix<P>(
    platform: &P,
    ctx: &CalculationContext<'_>,
    home: Option<&str>,
) -> PathResult<(String, SearchOutcome)>
where
    P: PlatformPolicy + ?Sized,
{
    if let Some(home) = home {
        let root = home
            .split_once(platform.delimiter())
            .map_or(home, |(prefix, _)| prefix);
        let prefix = join(platform, root, &ctx.lib_python)?;
        return Ok((prefix, SearchOutcome::FoundInstalled));
    }

    if is_build_dir(platform, &ctx.argv0_dir)? {
        let source = join(platform, &ctx.argv0_dir, &ctx.constants.vpath)?;
        let lib = join(platform, &source, platform.landmarks().source_lib)?;
        if is_module_root(platform, &lib)? {
            return Ok((lib, SearchOutcome::FoundBuildTree));
        }
    }

    let mut candidate = absolutize(platform, &ctx.argv0_dir)?;
    loop {
        let probe = join(platform, &candidate, &ctx.lib_python)?;
        if is_module_root(platform, &probe)? {
            return Ok((probe, SearchOutcome::FoundInstalled));
        }
        candidate = reduce(platform, &candidate);
        if candidate.is_empty() {
            break;
        }
    }

    let fallback = join(platform, &ctx.constants.prefix, &ctx.lib_python)?;
    if is_module_root(platform, &fallback)? {
        return Ok((fallback, SearchOutcome::FoundInstalled));
    }
    Ok((fallback, SearchOutcome::NotFound))
}

fn search_for_exec_prefix<P>(
    platform: &P,
    ctx: &CalculationContext<'_>,
    home: Option<&str>,
) -> PathResult<(String, SearchOutcome)>
where
    P: PlatformPolicy + ?Sized,
{
    let dynload = platform.landmarks().dynload_dir;

    if let Some(home) = home {
        let root = home
            .split_once(platform.delimiter())
            .map_or(home, |(_, exec)| exec);
        let lib = join(platform, root, &ctx.lib_python)?;
        return Ok((join(platform, &lib, dynload)?, SearchOutcome::FoundInstalled));
    }

    if let Some(rel) = read_build_dir_marker(platform, &ctx.argv0_dir)? {
        let exec_prefix = join(platform, &ctx.argv0_dir, &rel)?;
        return Ok((exec_prefix, SearchOutcome::FoundBuildTree));
    }

    let mut candidate = absolutize(platform, &ctx.argv0_dir)?;
    loop {
        let lib = join(platform, &candidate, &ctx.lib_python)?;
        let probe = join(platform, &lib, dynload)?;
        if is_dynload_dir(platform, &probe) {
            return Ok((probe, SearchOutcome::FoundInstalled));
        }
        candidate = reduce(platform, &candidate);
        if candidate.is_empty() {
            break;
        }
    }

    let lib = join(platform, &ctx.constants.exec_prefix, &ctx.lib_python)?;
    let fallback = join(platform, &lib, dynload)?;
    if is_dynload_dir(platform, &fallback) {
        return Ok((fallback, SearchOutcome::FoundInstalled));
    }

    let lib = join(platform, &ctx.constants.exec_prefix, &ctx.platlibdir)?;
    Ok((join(platform, &lib, dynload)?, SearchOutcome::NotFound))
}

fn zip_path<P>(
    platform: &P,
    ctx: &CalculationContext<'_>,
    prefix: &str,
    outcome: SearchOutcome,
) -> PathResult<String>
where
    P: PlatformPolicy + ?Sized,
{
    let root = if outcome == SearchOutcome::FoundInstalled {
        reduce_n(platform, prefix, 2)
    } else {
        bounded_copy(&ctx.constants.prefix)?
    };
    let lib = join(platform, &root, &ctx.platlibdir)?;
    join(platform, &lib, &ctx.constants.zip_name())
}

/// Assemble the search path: environment entries, the zip archive, the
/// default list resolved against `prefix`, then `exec_prefix`.
fn module_search_path<P>(
    platform: &P,
    ctx: &CalculationContext<'_>,
    zip_path: &str,
    prefix: &str,
    exec_prefix: &str,
) -> PathResult<Vec<String>>
where
    P: PlatformPolicy + ?Sized,
{
    let delimiter = platform.delimiter();
    let mut entries = Vec::new();

    if let Some(extra) = &ctx.pythonpath_env {
        for entry in extra.split(delimiter).filter(|e| !e.is_empty()) {
            entries.push(bounded_copy(entry)?);
        }
    }

    entries.push(bounded_copy(zip_path)?);

    for entry in ctx.constants.default_search_path.split(delimiter) {
        let resolved = if entry.is_empty() {
            bounded_copy(prefix)?
        } else {
            join(platform, prefix, entry)?
        };
        entries.push(resolved);
    }

    entries.push(bounded_copy(exec_prefix)?);
    Ok(entries)
}

/// Public form of a search result: an installed match is trimmed by
/// `levels` components, anything else reports the compiled-in default.
fn public_root<P>(
    platform: &P,
    found: &str,
    outcome: SearchOutcome,
    levels: usize,
    default: &str,
) -> String
where
    P: PlatformPolicy + ?Sized,
{
    if outcome != SearchOutcome::FoundInstalled {
        return default.to_string();
    }
    let trimmed = reduce_n(platform, found, levels);
    if trimmed.is_empty() {
        platform.separator().to_string()
    } else {
        trimmed
    }
}

fn warn_missing(prefix: SearchOutcome, exec_prefix: SearchOutcome) {
    if !prefix.is_found() {
        tracing::warn!("Could not find platform independent libraries <prefix>");
    }
    if !exec_prefix.is_found() {
        tracing::warn!("Could not find platform dependent libraries <exec_prefix>");
    }
    if !prefix.is_found() || !exec_prefix.is_found() {
        tracing::warn!("Consider setting $PYHOME to <prefix>[:<exec_prefix>]");
    }
}
