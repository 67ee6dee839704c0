use super::LabellingWriter;
use crate::{
    bracket::{MatchSet, ReplaySet},
    candidates::{Candidate, CandidateSet},
    solvers::Labelling,
};
use anyhow::{Context, Result};
use std::io::Write;

/// The value written in place of a setup name for matches without label.
pub const NO_LABEL: &str = "NO_LABEL";

/// A writer producing tab-separated records, for use by other programs.
///
/// Both outputs begin with a header line.
/// The candidates are written one per line, with the identifier of their match, their rank among the candidates of the match,
/// their score and its gap terms, their setup and the identifiers of their replays (comma-separated).
/// The labelling gives one line per match, with its setup, replays and score;
/// matches without label have [`NO_LABEL`] as setup and empty replays and score.
#[derive(Default)]
pub struct TsvWriter;

fn candidate_setup_and_replays<'a>(replays: &'a ReplaySet, candidate: &Candidate) -> (&'a str, String) {
    let range = candidate.replay_range();
    let setup = replays.setups()[replays.setup_index_of(range.start)].name();
    let ids = replays
        .window(range)
        .iter()
        .map(|r| r.id())
        .collect::<Vec<&str>>()
        .join(",");
    (setup, ids)
}

impl LabellingWriter for TsvWriter {
    fn write_candidates(
        &self,
        writer: &mut dyn Write,
        matches: &MatchSet,
        replays: &ReplaySet,
        candidates: &CandidateSet,
    ) -> Result<()> {
        let context = "while writing the candidates";
        writeln!(
            writer,
            "match_id\trank\tscore\tpregame_gap\tpostgame_gap\tsetup\treplay_ids"
        )
        .context(context)?;
        for (i, m) in matches.iter().enumerate() {
            for (rank, id) in candidates.ranked_ids_for_match(i).into_iter().enumerate() {
                let candidate = candidates.get(id);
                let (setup, ids) = candidate_setup_and_replays(replays, candidate);
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    m.id(),
                    rank + 1,
                    candidate.score(),
                    candidate.terms().pregame_gap,
                    candidate.terms().postgame_gap,
                    setup,
                    ids
                )
                .context(context)?;
            }
        }
        writer.flush().context(context)
    }

    fn write_labelling(
        &self,
        writer: &mut dyn Write,
        matches: &MatchSet,
        replays: &ReplaySet,
        labelling: &Labelling,
    ) -> Result<()> {
        let context = "while writing a labelling";
        writeln!(writer, "match_id\tsetup\treplay_ids\tscore").context(context)?;
        for (i, m) in matches.iter().enumerate() {
            let written = match labelling.assigned_candidate(i) {
                Some(candidate) => {
                    let (setup, ids) = candidate_setup_and_replays(replays, candidate);
                    writeln!(writer, "{}\t{}\t{}\t{}", m.id(), setup, ids, candidate.score())
                }
                None => writeln!(writer, "{}\t{}\t\t", m.id(), NO_LABEL),
            };
            written.context(context)?;
        }
        writer.flush().context(context)
    }
}
