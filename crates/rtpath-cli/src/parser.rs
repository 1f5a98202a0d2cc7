//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for inspecting runtime path configuration.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "rtpath")]
#[command(about = "Resolve and inspect a runtime's library paths")]
#[command(version = rtpath_build_info::LONG_VERSION)]
pub struct Cli {
    /// Log every resolution step
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        // Verify the CLI parser can be constructed
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["rtpath", "paths", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Paths(_)));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["rtpath"]).is_err());
    }
}
