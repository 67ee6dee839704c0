use super::{specs::display_time, LabellingWriter};
use crate::{
    bracket::{Match, MatchSet, Replay, ReplaySet},
    candidates::{Candidate, CandidateSet},
    solvers::Labelling,
};
use anyhow::{Context, Result};
use std::io::Write;

/// A writer producing human-readable reports.
///
/// Each match is introduced by a header line.
/// Candidates are written below with their score, their setup, the indices of their replays on the setup and their time range,
/// followed by one line per replay.
/// Dates are written in UTC.
///
/// # Example
///
/// ```
/// # use replabel::bracket::{MatchSet, ReplaySet};
/// # use replabel::candidates::CandidateSet;
/// # use replabel::io::{LabellingWriter, TextWriter};
/// # use anyhow::Result;
/// fn write_candidates_to_stdout(matches: &MatchSet, replays: &ReplaySet, candidates: &CandidateSet) -> Result<()> {
///     let writer = TextWriter::default();
///     writer.write_candidates(&mut std::io::stdout(), matches, replays, candidates)
/// }
/// ```
#[derive(Default)]
pub struct TextWriter;

impl TextWriter {
    fn write_match_header(
        &self,
        writer: &mut dyn Write,
        match_index: usize,
        m: &Match,
    ) -> Result<()> {
        let result = match m.scores() {
            Some((s0, s1)) => format!("{}-{}", s0, s1),
            None => format!("{} games", m.n_games()),
        };
        writeln!(
            writer,
            "Match {} ({}): {} vs {} [{}],  from {} to {}",
            match_index,
            m.id(),
            m.players()[0],
            m.players()[1],
            result,
            display_time(m.started_at()),
            display_time(m.reported_at()),
        )?;
        Ok(())
    }

    fn write_candidate(
        &self,
        writer: &mut dyn Write,
        replays: &ReplaySet,
        candidate: &Candidate,
    ) -> Result<()> {
        let range = candidate.replay_range();
        let setup_index = replays.setup_index_of(range.start);
        let setup = &replays.setups()[setup_index];
        let offset = setup.replay_range().start;
        let window = replays.window(range.clone());
        writeln!(
            writer,
            "    {:.3}: s{} {} Games {}-{}:  {} to {}",
            candidate.score(),
            setup_index,
            setup.name(),
            range.start - offset,
            range.end - 1 - offset,
            display_time(window[0].started_at()),
            display_time(window[window.len() - 1].ended_at()),
        )?;
        for r in window {
            self.write_replay(writer, r)?;
        }
        Ok(())
    }

    fn write_replay(&self, writer: &mut dyn Write, replay: &Replay) -> Result<()> {
        let ports = replay
            .ports()
            .iter()
            .map(|p| {
                let status = match p.won() {
                    Some(true) => "W",
                    Some(false) => "L",
                    None => "?",
                };
                format!("{} ({})", p.character(), status)
            })
            .collect::<Vec<String>>()
            .join(" vs. ");
        writeln!(
            writer,
            "        {} to {}:  [{}]  {}",
            display_time(replay.started_at()),
            display_time(replay.ended_at()),
            replay.id(),
            ports
        )?;
        Ok(())
    }
}

impl LabellingWriter for TextWriter {
    fn write_candidates(
        &self,
        writer: &mut dyn Write,
        matches: &MatchSet,
        replays: &ReplaySet,
        candidates: &CandidateSet,
    ) -> Result<()> {
        let context = "while writing the candidates";
        for (i, m) in matches.iter().enumerate() {
            self.write_match_header(writer, i, m).context(context)?;
            for id in candidates.ranked_ids_for_match(i) {
                self.write_candidate(writer, replays, candidates.get(id))
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
        let mut labelled = (0..matches.len())
            .filter_map(|i| labelling.assigned_candidate(i).map(|c| (i, c)))
            .collect::<Vec<_>>();
        labelled.sort_by(|(_, c1), (_, c2)| c2.score().total_cmp(&c1.score()));
        for (i, c) in labelled {
            self.write_match_header(writer, i, matches.get(i))
                .context(context)?;
            self.write_candidate(writer, replays, c).context(context)?;
            writeln!(writer).context(context)?;
        }
        let missed = (0..matches.len())
            .filter(|i| labelling.assigned_candidate(*i).is_none())
            .collect::<Vec<usize>>();
        writeln!(writer, "\nMissed {} matches:", missed.len()).context(context)?;
        for i in missed {
            self.write_match_header(writer, i, matches.get(i))
                .context(context)?;
        }
        writeln!(
            writer,
            "\nObjective value: {:.3} ({} matches labelled out of {})",
            labelling.objective(),
            labelling.n_labelled(),
            matches.len()
        )
        .context(context)?;
        writer.flush().context(context)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        bracket::{PortEntry, Timestamp},
        candidates::scored,
        encodings::LabellingEncoder,
        ilp::Assignment,
        solvers::extract_labelling,
    };
    use chrono::{TimeZone, Utc};

    fn ts(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    pub(crate) fn fixture() -> (MatchSet, ReplaySet, CandidateSet) {
        let matches = MatchSet::new(vec![
            Match::new(
                "m0".to_string(),
                ["alice".to_string(), "bob".to_string()],
                2,
                ts(0),
                ts(700),
            )
            .with_scores((2, 0)),
            Match::new(
                "m1".to_string(),
                ["carol".to_string(), "dave".to_string()],
                1,
                ts(0),
                ts(400),
            ),
        ]);
        let game = |id: &str, setup: &str, start: i64| {
            Replay::new(
                id.to_string(),
                setup.to_string(),
                ts(start),
                ts(start + 300),
                vec![
                    PortEntry::new(1, "Fox".to_string(), Some(true)),
                    PortEntry::new(2, "Marth".to_string(), Some(false)),
                ],
            )
        };
        let replays = ReplaySet::new(vec![
            game("a0", "A", 60),
            game("b0", "B", 60),
            game("b1", "B", 365),
        ]);
        let candidates = CandidateSet::new(vec![
            vec![scored(0, 1, 2, -15.5)],
            vec![scored(1, 0, 1, -12.25), scored(1, 1, 1, -13.)],
        ]);
        (matches, replays, candidates)
    }

    #[test]
    fn test_write_candidates() {
        let (matches, replays, candidates) = fixture();
        let mut buffer = Vec::new();
        TextWriter::default()
            .write_candidates(&mut buffer, &matches, &replays, &candidates)
            .unwrap();
        let expected = "\
Match 0 (m0): alice vs bob [2-0],  from 2023-11-14 22:13:20 to 2023-11-14 22:25:00
    -15.500: s1 B Games 0-1:  2023-11-14 22:14:20 to 2023-11-14 22:24:25
        2023-11-14 22:14:20 to 2023-11-14 22:19:20:  [b0]  Fox (W) vs. Marth (L)
        2023-11-14 22:19:25 to 2023-11-14 22:24:25:  [b1]  Fox (W) vs. Marth (L)
Match 1 (m1): carol vs dave [1 games],  from 2023-11-14 22:13:20 to 2023-11-14 22:20:00
    -12.250: s0 A Games 0-0:  2023-11-14 22:14:20 to 2023-11-14 22:19:20
        2023-11-14 22:14:20 to 2023-11-14 22:19:20:  [a0]  Fox (W) vs. Marth (L)
    -13.000: s1 B Games 0-0:  2023-11-14 22:14:20 to 2023-11-14 22:19:20
        2023-11-14 22:14:20 to 2023-11-14 22:19:20:  [b0]  Fox (W) vs. Marth (L)
";
        assert_eq!(expected, String::from_utf8(buffer).unwrap());
    }

    #[test]
    fn test_write_labelling() {
        let (matches, replays, candidates) = fixture();
        let encoding = LabellingEncoder::new(-25.).encode(&candidates, replays.len());
        let assignment = Assignment::new(vec![0., 1., 0., 1., 0.]);
        let labelling = extract_labelling(&candidates, &encoding, &assignment).unwrap();
        let mut buffer = Vec::new();
        TextWriter::default()
            .write_labelling(&mut buffer, &matches, &replays, &labelling)
            .unwrap();
        let expected = "\
Match 1 (m1): carol vs dave [1 games],  from 2023-11-14 22:13:20 to 2023-11-14 22:20:00
    -12.250: s0 A Games 0-0:  2023-11-14 22:14:20 to 2023-11-14 22:19:20
        2023-11-14 22:14:20 to 2023-11-14 22:19:20:  [a0]  Fox (W) vs. Marth (L)


Missed 1 matches:
Match 0 (m0): alice vs bob [2-0],  from 2023-11-14 22:13:20 to 2023-11-14 22:25:00

Objective value: -37.250 (1 matches labelled out of 2)
";
        assert_eq!(expected, String::from_utf8(buffer).unwrap());
    }
}
