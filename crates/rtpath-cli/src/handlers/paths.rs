//! Paths command handler.
//!
//! Displays the resolved path configuration for diagnostics and debugging.

use std::io::Write;

use anyhow::Result;

use rtpath_core::{BuildConstants, OsPlatform, PathConfiguration, PlatformPolicy, RuntimeConfig};

use crate::commands::PathsArgs;
use crate::error::CliError;

/// Resolve the configuration `args` describe.
///
/// Options become override API calls; everything else comes from the
/// environment and the engine.
pub fn resolve<P>(
    args: &PathsArgs,
    program_name: Option<String>,
    platform: &P,
    constants: &BuildConstants,
) -> Result<PathConfiguration, CliError>
where
    P: PlatformPolicy + ?Sized,
{
    let mut overrides = PathConfiguration::new();
    overrides.set_home(args.home.as_deref());
    overrides.set_program_name(args.program_name.as_deref());
    if let Some(search_path) = &args.search_path {
        overrides.set_module_search_path(Some(search_path), platform.delimiter());
    }

    let mut config = RuntimeConfig {
        program_name,
        ..RuntimeConfig::new()
    };
    config.read_environment()?;

    PathConfiguration::initialize(&overrides, &config, platform, constants)
        .map_err(CliError::from)
}

/// Write `paths` as `key = value` lines or pretty JSON.
pub fn render<W: Write>(paths: &PathConfiguration, json: bool, out: &mut W) -> Result<(), CliError> {
    if json {
        serde_json::to_writer_pretty(&mut *out, paths)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{paths}")?;
    }
    Ok(())
}

/// Execute the paths command.
pub fn execute(args: &PathsArgs, program_name: Option<String>) -> Result<()> {
    let platform = OsPlatform::new();
    let paths = resolve(args, program_name, &platform, &BuildConstants::compiled())?;
    tracing::debug!(?paths, "resolved path configuration");

    render(&paths, args.json, &mut std::io::stdout().lock())?;
    Ok(())
}
