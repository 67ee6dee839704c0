use super::{AppHelper, AuthorsCommand, CheckCommand, Command, LabelCommand};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches};
use log::{info, warn};
use replabel::{
    bracket::{MatchSet, ProfileBook, ReplaySet},
    ilp::{SolvingListener, SolvingResult},
    io::{InstanceReader, MatchReader, ProfileReader, ReplayReader},
};
use std::{
    fs::{self, File},
    io::{BufReader, Read},
    path::PathBuf,
};

pub(crate) fn create_app_helper() -> AppHelper<'static> {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let authors = option_env!("CARGO_PKG_AUTHORS").unwrap_or("unknown authors");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        authors,
        "Replabel, a tool matching recorded replays to tournament bracket matches.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(AuthorsCommand::new(app_name, app_version, authors)),
        Box::new(CheckCommand::new()),
        Box::new(LabelCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app
}

pub(crate) const ARG_MATCHES: &str = "MATCHES";
pub(crate) const ARG_REPLAYS: &str = "REPLAYS";
pub(crate) const ARG_PROFILES: &str = "PROFILES";

pub(crate) fn input_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_MATCHES)
            .short("m")
            .long("matches")
            .empty_values(false)
            .multiple(false)
            .help("the input file that contains the bracket matches")
            .required(true),
        Arg::with_name(ARG_REPLAYS)
            .short("r")
            .long("replays")
            .empty_values(false)
            .multiple(false)
            .help("the input file that contains the replays")
            .required(true),
        Arg::with_name(ARG_PROFILES)
            .short("p")
            .long("profiles")
            .empty_values(false)
            .multiple(false)
            .help("a CSV file giving the characters played by the players")
            .required(false),
    ]
}

/// Reads the matches and the replays given on the command line, and attaches the player profiles if a profile file is given.
pub(crate) fn read_inputs(arg_matches: &ArgMatches<'_>) -> Result<(MatchSet, ReplaySet)> {
    let mut matches = read_file_path(
        arg_matches.value_of(ARG_MATCHES).unwrap(),
        &mut MatchReader::default(),
    )?;
    info!("read {} matches", matches.len());
    let replays = read_file_path(
        arg_matches.value_of(ARG_REPLAYS).unwrap(),
        &mut ReplayReader::default(),
    )?;
    info!(
        "read {} replays recorded on {} setups",
        replays.len(),
        replays.setups().len()
    );
    match arg_matches.value_of(ARG_PROFILES) {
        Some(path) => {
            let book: ProfileBook = read_file_path(path, &mut ProfileReader::default())?;
            info!("read {} player profiles", book.len());
            matches.attach_profiles(&book);
        }
        None => info!("no profile file given; player characters are not taken into account"),
    }
    Ok((matches, replays))
}

pub(crate) fn read_file_path<T>(file_path: &str, reader: &mut dyn InstanceReader<T>) -> Result<T> {
    let file_name = file_path.to_string();
    reader.add_warning_handler(Box::new(move |line, msg| {
        warn!("{} at line {}: {}", file_name, line, msg)
    }));
    read_file_path_with(file_path, &|r| reader.read(r))
}

pub(crate) fn read_file_path_with<F, R>(file_path: &str, reader: &F) -> Result<R>
where
    F: Fn(&mut dyn Read) -> Result<R>,
{
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut file_reader = BufReader::new(
        File::open(&canonicalized)
            .with_context(|| format!(r#"while opening file "{}""#, file_path))?,
    );
    (reader)(&mut file_reader).with_context(|| format!(r#"while reading file "{}""#, file_path))
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}

#[derive(Default)]
pub(crate) struct IlpSolvingLogger;

impl SolvingListener for IlpSolvingLogger {
    fn solving_start(&self, n_vars: usize, n_rows: usize) {
        info!(
            "launching ILP solver on a program with {} variables and {} constraints",
            n_vars, n_rows
        );
    }

    fn solving_end(&self, result: &SolvingResult) {
        let r = match result {
            SolvingResult::Optimal(_) => "OPTIMAL",
            SolvingResult::Infeasible => "INFEASIBLE",
            SolvingResult::Timeout => "TIMEOUT",
            SolvingResult::Failed(_) => "FAILED",
        };
        info!("ILP solver ended with result {}", r);
    }
}
