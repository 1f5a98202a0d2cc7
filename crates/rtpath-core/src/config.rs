//! Process configuration consumed by path calculation and bootstrap.
//!
//! Argument parsing lives in adapters; this module only holds the result
//! and knows how to fill gaps from the environment. All path fields are
//! optional so that "unset" is distinguishable from "set to empty".

use std::env;

use serde::{Deserialize, Serialize};

use crate::paths::{PathConfiguration, PathError, PathResult};

/// Overrides both library roots: `<prefix>[<delimiter><exec_prefix>]`.
pub const HOME_ENV: &str = "PYHOME";

/// Extra module search entries, prepended to the computed list.
pub const SEARCH_PATH_ENV: &str = "PYPATH";

/// Overrides the platform library directory name.
pub const PLATLIBDIR_ENV: &str = "PYPLATLIBDIR";

/// Script run before an interactive session starts.
pub const STARTUP_ENV: &str = "PYSTARTUP";

/// Forces an interactive session after the main program.
pub const INSPECT_ENV: &str = "PYINSPECT";

/// Runtime configuration for one initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Program name as invoked (argv\[0\] of the runtime itself).
    pub program_name: Option<String>,
    /// Absolute path of the executable.
    pub executable: Option<String>,
    /// Library root override.
    pub home: Option<String>,
    /// Explicit module search path; skips computation when set.
    pub module_search_paths: Option<Vec<String>>,
    /// Installation prefix.
    pub prefix: Option<String>,
    /// Platform-dependent installation prefix.
    pub exec_prefix: Option<String>,
    /// Standard library source directory.
    pub stdlib_dir: Option<String>,
    /// Prefix of the base installation (outside any virtual environment).
    pub base_prefix: Option<String>,
    /// Exec prefix of the base installation.
    pub base_exec_prefix: Option<String>,
    /// Executable of the base installation.
    pub base_executable: Option<String>,
    /// Search path taken from the environment.
    pub pythonpath_env: Option<String>,
    /// Platform library directory name.
    pub platlibdir: Option<String>,
    /// Report failed library searches.
    pub pathconfig_warnings: bool,
    /// Read `PY*` environment variables.
    pub use_environment: bool,
    /// Isolated mode: no environment, no leading search-path entry.
    pub isolated: bool,
    /// Enter interactive mode after running the main program.
    pub inspect: bool,
    /// Treat standard input as interactive even when it is not a terminal.
    pub interactive: bool,
    /// Suppress informational output.
    pub quiet: bool,
    /// Verbose diagnostics.
    pub verbose: bool,
    /// Command string to run.
    pub run_command: Option<String>,
    /// Module to run as the main program.
    pub run_module: Option<String>,
    /// File to run.
    pub run_filename: Option<String>,
    /// Program arguments as seen by user code; `argv[0]` encodes the mode.
    pub argv: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program_name: None,
            executable: None,
            home: None,
            module_search_paths: None,
            prefix: None,
            exec_prefix: None,
            stdlib_dir: None,
            base_prefix: None,
            base_exec_prefix: None,
            base_executable: None,
            pythonpath_env: None,
            platlibdir: None,
            pathconfig_warnings: true,
            use_environment: true,
            isolated: false,
            inspect: false,
            interactive: false,
            quiet: false,
            verbose: false,
            run_command: None,
            run_module: None,
            run_filename: None,
            argv: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    /// Configuration with defaults: environment enabled, warnings on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to isolated mode, which also ignores the environment.
    #[must_use]
    pub const fn into_isolated(mut self) -> Self {
        self.isolated = true;
        self.use_environment = false;
        self
    }

    /// Whether a command, module or file was requested.
    pub const fn runs_code(&self) -> bool {
        self.run_command.is_some() || self.run_module.is_some() || self.run_filename.is_some()
    }

    /// Read an environment variable the way the runtime does.
    ///
    /// Returns `None` when the environment is disabled, the variable is
    /// unset, or it is empty. Non-UTF-8 values are a decode error.
    pub fn env_value(&self, name: &str) -> PathResult<Option<String>> {
        if !self.use_environment {
            return Ok(None);
        }
        match env::var_os(name) {
            None => Ok(None),
            Some(raw) => {
                let value = raw
                    .into_string()
                    .map_err(|_| PathError::decode(format!("{name} environment variable")))?;
                Ok(Some(value).filter(|v| !v.is_empty()))
            }
        }
    }

    /// Fill still-unset fields from the environment.
    ///
    /// Resolution order for each field:
    /// 1. Value already present in the config (highest priority)
    /// 2. The corresponding `PY*` environment variable
    pub fn read_environment(&mut self) -> PathResult<()> {
        if self.home.is_none() {
            self.home = self.env_value(HOME_ENV)?;
        }
        if self.pythonpath_env.is_none() {
            self.pythonpath_env = self.env_value(SEARCH_PATH_ENV)?;
        }
        if self.platlibdir.is_none() {
            self.platlibdir = self.env_value(PLATLIBDIR_ENV)?;
        }
        if !self.inspect && self.env_value(INSPECT_ENV)?.is_some() {
            self.inspect = true;
        }
        Ok(())
    }

    /// Copy computed path fields into the fields still unset here.
    ///
    /// `base_*` fields default to their non-base counterparts.
    pub fn absorb_path_config(&mut self, paths: &PathConfiguration) {
        fn fill(slot: &mut Option<String>, value: Option<&str>) {
            if slot.is_none() {
                *slot = value.map(str::to_string);
            }
        }

        if self.module_search_paths.is_none() {
            self.module_search_paths = paths.module_search_path().map(<[String]>::to_vec);
        }
        fill(&mut self.executable, paths.program_full_path());
        fill(&mut self.prefix, paths.prefix());
        fill(&mut self.exec_prefix, paths.exec_prefix());
        fill(&mut self.stdlib_dir, paths.stdlib_dir());

        let (prefix, exec_prefix, executable) = (
            self.prefix.clone(),
            self.exec_prefix.clone(),
            self.executable.clone(),
        );
        fill(&mut self.base_prefix, prefix.as_deref());
        fill(&mut self.base_exec_prefix, exec_prefix.as_deref());
        fill(&mut self.base_executable, executable.as_deref());
    }
}
