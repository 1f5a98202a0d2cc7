//! Main commands enum and their arguments.
//!
//! This module defines the available commands for the CLI tool.

use clap::{Args, Subcommand};

use rtpath_core::RuntimeConfig;

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resolved path configuration
    Paths(PathsArgs),

    /// Resolve paths, then report how the runtime would start
    Run(RunArgs),
}

/// Arguments for `rtpath paths`.
///
/// Each option goes through the override API, so it takes priority over the
/// environment and the computed values.
#[derive(Args, Debug, Default)]
pub struct PathsArgs {
    /// Print JSON instead of `key = value` lines
    #[arg(long)]
    pub json: bool,

    /// Library root override (`<prefix>[:<exec_prefix>]`)
    #[arg(long)]
    pub home: Option<String>,

    /// Program name used to locate the executable
    #[arg(long = "program-name")]
    pub program_name: Option<String>,

    /// Explicit module search path; skips the search entirely
    #[arg(long = "search-path")]
    pub search_path: Option<String>,
}

/// Arguments for `rtpath run`, mirroring a runtime's own command line.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Program passed in as a string
    #[arg(short = 'c', value_name = "CMD", conflicts_with = "module")]
    pub command: Option<String>,

    /// Run a library module as a script
    #[arg(short = 'm', value_name = "MOD")]
    pub module: Option<String>,

    /// Isolate: ignore the environment and add no leading search path entry
    #[arg(short = 'I')]
    pub isolated: bool,

    /// Ignore `PY*` environment variables
    #[arg(short = 'E')]
    pub ignore_environment: bool,

    /// Inspect interactively after running the program
    #[arg(short = 'i')]
    pub inspect: bool,

    /// Don't print informational messages
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Script file (unless -c or -m is given) followed by its arguments
    #[arg(value_name = "FILE | ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl RunArgs {
    /// Build the process configuration these arguments describe.
    ///
    /// `argv[0]` becomes `-c`, `-m`, the script path, or the empty string
    /// when reading from standard input.
    pub fn to_runtime_config(&self, program_name: Option<String>) -> RuntimeConfig {
        let mut config = RuntimeConfig::new();
        if self.isolated {
            config = config.into_isolated();
        }
        if self.ignore_environment {
            config.use_environment = false;
        }
        config.inspect = self.inspect;
        config.interactive = self.inspect;
        config.quiet = self.quiet;
        config.program_name = program_name;

        let (argv0, rest) = match (&self.command, &self.module) {
            (Some(command), _) => {
                config.run_command = Some(command.clone());
                ("-c".to_string(), self.args.as_slice())
            }
            (None, Some(module)) => {
                config.run_module = Some(module.clone());
                ("-m".to_string(), self.args.as_slice())
            }
            (None, None) => match self.args.split_first() {
                Some((file, rest)) => {
                    config.run_filename = Some(file.clone());
                    (file.clone(), rest)
                }
                None => (String::new(), &[][..]),
            },
        };

        config.argv = std::iter::once(argv0).chain(rest.iter().cloned()).collect();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Cli;
    use clap::Parser;

    fn run_args(argv: &[&str]) -> RunArgs {
        let full = ["rtpath", "run"].iter().chain(argv).copied();
        match Cli::parse_from(full).command {
            Commands::Run(args) => args,
            Commands::Paths(_) => panic!("expected run"),
        }
    }

    #[test]
    fn paths_options_parse() {
        let cli = Cli::parse_from([
            "rtpath",
            "paths",
            "--json",
            "--home",
            "/opt/py",
            "--search-path",
            "/a:/b",
        ]);
        let Commands::Paths(args) = cli.command else {
            panic!("expected paths");
        };
        assert!(args.json);
        assert_eq!(args.home.as_deref(), Some("/opt/py"));
        assert_eq!(args.search_path.as_deref(), Some("/a:/b"));
        assert_eq!(args.program_name, None);
    }

    #[test]
    fn command_mode_keeps_trailing_args() {
        let config = run_args(&["-c", "print(1)", "a", "-x"]).to_runtime_config(None);
        assert_eq!(config.run_command.as_deref(), Some("print(1)"));
        assert_eq!(config.argv, ["-c", "a", "-x"]);
        assert_eq!(config.run_filename, None);
    }

    #[test]
    fn module_mode_sets_argv0() {
        let config = run_args(&["-m", "pkg.tool", "arg"]).to_runtime_config(None);
        assert_eq!(config.run_module.as_deref(), Some("pkg.tool"));
        assert_eq!(config.argv, ["-m", "arg"]);
    }

    #[test]
    fn first_positional_is_the_script() {
        let config = run_args(&["-I", "app.py", "--flag"]).to_runtime_config(Some("py".into()));
        assert_eq!(config.run_filename.as_deref(), Some("app.py"));
        assert_eq!(config.argv, ["app.py", "--flag"]);
        assert!(config.isolated);
        assert!(!config.use_environment);
        assert_eq!(config.program_name.as_deref(), Some("py"));
    }

    #[test]
    fn no_program_reads_stdin() {
        let config = run_args(&["-i", "-E"]).to_runtime_config(None);
        assert!(!config.runs_code());
        assert_eq!(config.argv, [""]);
        assert!(config.inspect && config.interactive);
        assert!(!config.use_environment);
    }

    #[test]
    fn command_and_module_conflict() {
        assert!(Cli::try_parse_from(["rtpath", "run", "-c", "x", "-m", "y"]).is_err());
    }
}
