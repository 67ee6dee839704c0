use super::{common, logging_level_cli_arg, Command};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use log::info;
use replabel::LabellingError;

const CMD_NAME: &str = "check";

pub(crate) struct CheckCommand;

impl CheckCommand {
    pub(crate) fn new() -> Self {
        CheckCommand
    }
}

impl<'a> Command<'a> for CheckCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks input match, replay and profile files for errors")
            .setting(AppSettings::DisableVersion)
            .args(&common::input_args())
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let (matches, replays) = common::read_inputs(arg_matches)?;
        if matches.is_empty() {
            return Err(LabellingError::EmptyInput("match").into());
        }
        if replays.is_empty() {
            return Err(LabellingError::EmptyInput("replay").into());
        }
        for setup in replays.setups() {
            info!(
                r#"setup "{}" recorded {} replays"#,
                setup.name(),
                setup.n_replays()
            );
        }
        let n_games = matches.iter().map(|m| m.n_games()).sum::<usize>();
        info!(
            "the bracket has {} games for {} recorded replays",
            n_games,
            replays.len()
        );
        Ok(())
    }
}
