use super::{logging_level_cli_arg, Command};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};

const CMD_NAME: &str = "authors";

/// Prints the name and the version of the binary, then its authors on a single line.
pub(crate) struct AuthorsCommand<'a> {
    name: &'a str,
    version: &'a str,
    cargo_authors: &'a str,
}

impl<'a> AuthorsCommand<'a> {
    /// Builds the command; `cargo_authors` is the colon-separated list Cargo exports.
    pub(crate) fn new(name: &'a str, version: &'a str, cargo_authors: &'a str) -> Self {
        AuthorsCommand {
            name,
            version,
            cargo_authors,
        }
    }

    fn credits(&self) -> String {
        let authors = self
            .cargo_authors
            .split(':')
            .map(str::trim)
            .collect::<Vec<&str>>()
            .join(", ");
        format!("{} {}\n{}", self.name, self.version, authors)
    }
}

impl<'a> Command<'a> for AuthorsCommand<'a> {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Prints the version of replabel and its authors")
            .setting(AppSettings::DisableVersion)
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, _arg_matches: &ArgMatches<'_>) -> Result<()> {
        println!("{}", self.credits());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credits() {
        let cmd = AuthorsCommand::new("replabel", "0.1.0", "Ann <ann@a.org>:Bob <bob@b.org>");
        assert_eq!(
            "replabel 0.1.0\nAnn <ann@a.org>, Bob <bob@b.org>",
            cmd.credits()
        );
    }

    #[test]
    fn test_single_author() {
        let cmd = AuthorsCommand::new("replabel", "0.1.0", "Ann <ann@a.org>");
        assert_eq!("replabel 0.1.0\nAnn <ann@a.org>", cmd.credits());
    }
}
