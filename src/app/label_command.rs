use super::{
    common::{self, IlpSolvingLogger},
    logging_level_cli_arg, Command,
};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use replabel::{
    io::{LabellingWriter, TextWriter, TsvWriter},
    model::{GapDistribution, LabellingConfig},
    solvers::ReplayLabeller,
};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

const CMD_NAME: &str = "label";

const ARG_OUTPUT_DIR: &str = "OUTPUT_DIR";
const ARG_OUTPUT_FORMAT: &str = "OUTPUT_FORMAT";
const ARG_PREGAME_MEAN: &str = "PREGAME_MEAN";
const ARG_PREGAME_SD: &str = "PREGAME_SD";
const ARG_POSTGAME_MEAN: &str = "POSTGAME_MEAN";
const ARG_POSTGAME_SD: &str = "POSTGAME_SD";
const ARG_MAIN_PROBABILITY: &str = "MAIN_PROBABILITY";
const ARG_SECONDARY_PROBABILITY: &str = "SECONDARY_PROBABILITY";
const ARG_NO_LABEL_SCORE: &str = "NO_LABEL_SCORE";
const ARG_PRUNING_WIDTH: &str = "PRUNING_WIDTH";
const ARG_PRUNE_DOMINATED: &str = "PRUNE_DOMINATED";
const ARG_SETUP_OFFSET: &str = "SETUP_OFFSET";
const ARG_TIME_BUDGET: &str = "TIME_BUDGET";

const FULL_OUTPUT_FILE: &str = "full_output.txt";
const SINGLE_OUTPUT_FILE: &str = "single_output.txt";

pub(crate) struct LabelCommand;

impl LabelCommand {
    pub(crate) fn new() -> Self {
        LabelCommand
    }
}

fn number_arg(name: &'static str, long: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(long)
        .empty_values(false)
        .multiple(false)
        .allow_hyphen_values(true)
        .help(help)
        .required(false)
}

impl<'a> Command<'a> for LabelCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Assigns the replays to the matches of a bracket")
            .setting(AppSettings::DisableVersion)
            .args(&common::input_args())
            .arg(
                Arg::with_name(ARG_OUTPUT_DIR)
                    .short("o")
                    .long("output-dir")
                    .empty_values(false)
                    .multiple(false)
                    .help("the directory the candidate listing and the labelling are written to")
                    .required(true),
            )
            .arg(
                Arg::with_name(ARG_OUTPUT_FORMAT)
                    .long("output-format")
                    .empty_values(false)
                    .multiple(false)
                    .possible_values(&["text", "tsv"])
                    .default_value("text")
                    .help("the format of the output files")
                    .required(false),
            )
            .arg(number_arg(
                ARG_PREGAME_MEAN,
                "pregame-mean",
                "the mean delay (in seconds) between a match start and its first game",
            ))
            .arg(number_arg(
                ARG_PREGAME_SD,
                "pregame-sd",
                "the standard deviation of the delay between a match start and its first game",
            ))
            .arg(number_arg(
                ARG_POSTGAME_MEAN,
                "postgame-mean",
                "the mean delay (in seconds) between the last game of a match and its report",
            ))
            .arg(number_arg(
                ARG_POSTGAME_SD,
                "postgame-sd",
                "the standard deviation of the delay between the last game of a match and its report",
            ))
            .arg(number_arg(
                ARG_MAIN_PROBABILITY,
                "main-probability",
                "the probability a player picks one of their mains",
            ))
            .arg(number_arg(
                ARG_SECONDARY_PROBABILITY,
                "secondary-probability",
                "the probability a player picks one of their secondaries",
            ))
            .arg(number_arg(
                ARG_NO_LABEL_SCORE,
                "no-label-score",
                "the score of leaving a match without replays",
            ))
            .arg(number_arg(
                ARG_PRUNING_WIDTH,
                "pruning-width",
                "the number of standard deviations around the mean delays outside of which windows are discarded",
            ))
            .arg(
                Arg::with_name(ARG_PRUNE_DOMINATED)
                    .long("prune-dominated")
                    .takes_value(false)
                    .help("discard the windows scoring below the no-label score")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_SETUP_OFFSET)
                    .long("setup-offset")
                    .empty_values(false)
                    .multiple(true)
                    .number_of_values(1)
                    .allow_hyphen_values(true)
                    .value_name("SETUP=SECONDS")
                    .help("a clock offset subtracted from the timestamps of the replays of a setup")
                    .required(false),
            )
            .arg(number_arg(
                ARG_TIME_BUDGET,
                "time-budget",
                "the time (in seconds) the ILP solver is allowed to run",
            ))
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let config = read_config(arg_matches)?;
        let (matches, replays) = common::read_inputs(arg_matches)?;
        let writer: Box<dyn LabellingWriter> =
            match arg_matches.value_of(ARG_OUTPUT_FORMAT).unwrap_or("text") {
                "tsv" => Box::<TsvWriter>::default(),
                _ => Box::<TextWriter>::default(),
            };
        let output_dir = PathBuf::from(arg_matches.value_of(ARG_OUTPUT_DIR).unwrap());
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("while creating the output directory {:?}", output_dir))?;
        let mut labeller = ReplayLabeller::new(&matches, &replays, &config)
            .context("while initializing the labelling")?;
        labeller.add_solving_listener(Box::<IlpSolvingLogger>::default());
        info!("computing the candidates of {} matches", matches.len());
        let candidates = labeller.compute_candidates();
        let full_output = output_dir.join(FULL_OUTPUT_FILE);
        write_output_file(&full_output, |w| {
            writer.write_candidates(w, &matches, &replays, &candidates)
        })?;
        let labelling = labeller
            .compute_labelling(&candidates)
            .context("while computing the labelling")?;
        let single_output = output_dir.join(SINGLE_OUTPUT_FILE);
        write_output_file(&single_output, |w| {
            writer.write_labelling(w, &matches, &replays, &labelling)
        })?;
        info!(
            "wrote label output to {:?} and {:?}",
            full_output, single_output
        );
        Ok(())
    }
}

fn write_output_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let file =
        File::create(path).with_context(|| format!("while creating the output file {:?}", path))?;
    let mut buffered = BufWriter::new(file);
    write(&mut buffered).with_context(|| format!("while writing the output file {:?}", path))
}

fn read_config(arg_matches: &ArgMatches<'_>) -> Result<LabellingConfig> {
    let mut config = LabellingConfig::default();
    let number = |name: &str| -> Result<Option<f64>> {
        arg_matches
            .value_of(name)
            .map(|v| {
                v.parse::<f64>()
                    .with_context(|| format!(r#"invalid number "{}""#, v))
            })
            .transpose()
    };
    config.pregame_gap = GapDistribution::new(
        number(ARG_PREGAME_MEAN)?.unwrap_or_else(|| config.pregame_gap.mean()),
        number(ARG_PREGAME_SD)?.unwrap_or_else(|| config.pregame_gap.sd()),
    );
    config.postgame_gap = GapDistribution::new(
        number(ARG_POSTGAME_MEAN)?.unwrap_or_else(|| config.postgame_gap.mean()),
        number(ARG_POSTGAME_SD)?.unwrap_or_else(|| config.postgame_gap.sd()),
    );
    if let Some(p) = number(ARG_MAIN_PROBABILITY)? {
        config.main_probability = p;
    }
    if let Some(p) = number(ARG_SECONDARY_PROBABILITY)? {
        config.secondary_probability = p;
    }
    if let Some(s) = number(ARG_NO_LABEL_SCORE)? {
        config.no_label_score = s;
    }
    if let Some(w) = number(ARG_PRUNING_WIDTH)? {
        config.pruning_width = w;
    }
    config.prune_dominated = arg_matches.is_present(ARG_PRUNE_DOMINATED);
    for offset in arg_matches.values_of(ARG_SETUP_OFFSET).into_iter().flatten() {
        let (setup, seconds) = parse_setup_offset(offset)?;
        config.setup_clock_offsets.insert(setup, seconds);
    }
    if let Some(t) = number(ARG_TIME_BUDGET)? {
        config.time_budget = Some(
            Duration::try_from_secs_f64(t)
                .with_context(|| format!("invalid time budget {}", t))?,
        );
    }
    config
        .check()
        .context("while reading the labelling parameters")?;
    Ok(config)
}

fn parse_setup_offset(arg: &str) -> Result<(String, f64)> {
    let (setup, seconds) = arg
        .rsplit_once('=')
        .ok_or_else(|| anyhow!(r#"expected SETUP=SECONDS for a setup offset, got "{}""#, arg))?;
    if setup.trim().is_empty() {
        return Err(anyhow!(r#"missing setup name in setup offset "{}""#, arg));
    }
    let seconds = seconds
        .trim()
        .parse::<f64>()
        .with_context(|| format!(r#"invalid number of seconds in setup offset "{}""#, arg))?;
    Ok((setup.trim().to_string(), seconds))
}
