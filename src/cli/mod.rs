// CLI module
// Command-line interface, argument parsing and command pipelines

mod args;
pub mod commands;

pub use args::{ApiArgs, CliArgs, Command, ProductArg, StatementArgs};
pub use commands::run;

use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing subcommand, or `--help`),
/// clap prints the error or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
