//! CLI entry point.
//!
//! Parses arguments, installs logging, and maps handler errors to the
//! runtime's exit statuses.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rtpath_cli::{Cli, CliError, Commands, handlers};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

fn dispatch(cli: &Cli, program_name: Option<String>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Paths(args) => {
            handlers::paths::execute(args, program_name)?;
            Ok(0)
        }
        Commands::Run(args) => handlers::run::execute(args, cli.verbose, program_name),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let program_name = std::env::args().next();
    let code = match dispatch(&cli, program_name) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
        }
    };
    std::process::exit(code);
}
