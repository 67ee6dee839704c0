use anyhow::Result;
use clap::{App, ArgMatches};

/// A subcommand of the `replabel` binary.
///
/// The [`CliManager`](super::cli_manager::CliManager) registers the clap description of every command
/// and dispatches the parsed arguments to the one whose name matches the subcommand.
pub(crate) trait Command<'a> {
    /// The subcommand name, as typed on the command line.
    fn name(&self) -> &str;

    /// The clap description of the subcommand and its arguments.
    fn clap_subcommand(&self) -> App<'a, 'a>;

    /// Runs the command on its parsed arguments.
    ///
    /// An error makes the binary log its causes and exit with status 1.
    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()>;
}
