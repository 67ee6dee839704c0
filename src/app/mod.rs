mod app_helper;
pub(crate) use app_helper::AppHelper;

mod authors_command;
pub(crate) use authors_command::AuthorsCommand;

mod check_command;
pub(crate) use check_command::CheckCommand;

mod cli_manager;
pub(crate) use cli_manager::logging_level_cli_arg;

mod command;
pub(crate) use command::Command;

pub(crate) mod common;

mod label_command;
pub(crate) use label_command::LabelCommand;
