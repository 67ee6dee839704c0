use super::{
    specs::{self, notify_malformed, notify_warnings},
    warning_result::WarningResult,
    InstanceReader, WarningHandler,
};
use crate::bracket::{Match, MatchSet};
use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::{collections::HashSet, io::Read};

lazy_static! {
    static ref SCORE_PATTERN: Regex = Regex::new(r"^(\d+)\s*-\s*(\d+)$").unwrap();
}

const N_MANDATORY_FIELDS: usize = 6;

fn parse_score(field: &str, n_games: usize) -> Result<(usize, usize), String> {
    let invalid = || format!(r#"invalid score "{}""#, field);
    let captures = SCORE_PATTERN.captures(field).ok_or_else(invalid)?;
    let s0 = captures[1].parse::<usize>().map_err(|_| invalid())?;
    let s1 = captures[2].parse::<usize>().map_err(|_| invalid())?;
    if s0.checked_add(s1) != Some(n_games) {
        return Err(format!(
            "the score {}-{} does not sum to the number of games ({})",
            s0, s1, n_games
        ));
    }
    Ok((s0, s1))
}

fn parse_match_line(line: &str) -> Result<WarningResult<Match, String>, String> {
    let fields = specs::split_fields(line);
    if fields.len() < N_MANDATORY_FIELDS {
        return Err(format!(
            "expected at least {} fields, got {}",
            N_MANDATORY_FIELDS,
            fields.len()
        ));
    }
    if let Some(i) = fields[..3].iter().position(|f| f.is_empty()) {
        return Err(["empty match id", "empty first player", "empty second player"][i].to_string());
    }
    let n_games = match fields[3].parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => return Err(format!(r#"invalid number of games "{}""#, fields[3])),
    };
    let started_at = specs::parse_timestamp(fields[4], "start date")?;
    let reported_at = specs::parse_timestamp(fields[5], "report date")?;
    if reported_at < started_at {
        return Err("the match is reported before it starts".to_string());
    }
    let mut m = Match::new(
        fields[0].to_string(),
        [fields[1].to_string(), fields[2].to_string()],
        n_games,
        started_at,
        reported_at,
    );
    let mut warnings = Vec::new();
    match fields.get(N_MANDATORY_FIELDS) {
        Some(f) if !f.is_empty() => m = m.with_scores(parse_score(f, n_games)?),
        _ => {}
    }
    if fields.len() > N_MANDATORY_FIELDS + 1 {
        warnings.push(format!(
            "ignoring {} extra fields",
            fields.len() - N_MANDATORY_FIELDS - 1
        ));
    }
    Ok(WarningResult::new(m, warnings))
}

/// A reader for bracket matches.
///
/// Each line describes a match with tab-separated fields:
/// its identifier, the tags of the two players, the number of games played,
/// the date the match was announced, the date its result was reported, and optionally the score.
/// Dates follow RFC 3339.
/// The score is given as `s1-s2` and must sum to the number of games.
///
/// Empty lines and lines beginning with `#` are ignored.
///
/// ```text
/// # id	player1	player2	games	started_at	reported_at	score
/// 101	alice	bob	3	2024-03-01T10:00:00Z	2024-03-01T10:20:00Z	2-1
/// 102	carol	dave	2	2024-03-01T10:05:00Z	2024-03-01T10:18:00Z
/// ```
///
/// # Example
///
/// ```
/// # use replabel::bracket::MatchSet;
/// # use replabel::io::{InstanceReader, MatchReader};
/// fn read_matches_from_str(s: &str) -> MatchSet {
///     let reader = MatchReader::default();
///     reader.read(&mut s.as_bytes()).expect("cannot read matches")
/// }
/// # read_matches_from_str("m\ta\tb\t1\t2024-03-01T10:00:00Z\t2024-03-01T10:10:00Z");
/// ```
#[derive(Default)]
pub struct MatchReader {
    warning_handlers: Vec<WarningHandler>,
}

impl InstanceReader<MatchSet> for MatchReader {
    fn read(&self, reader: &mut dyn Read) -> Result<MatchSet> {
        let mut matches = Vec::new();
        let mut ids = HashSet::new();
        for (line_number, line) in specs::read_data_lines(reader)? {
            match parse_match_line(&line) {
                Ok(result) => {
                    let m = result.consume_warnings(|w| {
                        notify_warnings(&self.warning_handlers, line_number, w)
                    });
                    if !ids.insert(m.id().to_string()) {
                        notify_warnings(
                            &self.warning_handlers,
                            line_number,
                            vec![format!(r#"duplicate match id "{}""#, m.id())],
                        );
                    }
                    matches.push(m);
                }
                Err(reason) => notify_malformed(&self.warning_handlers, line_number, reason),
            }
        }
        Ok(MatchSet::new(matches))
    }

    fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }
}
