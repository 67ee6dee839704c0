use super::{
    specs::{self, notify_malformed, notify_warnings},
    warning_result::WarningResult,
    InstanceReader, WarningHandler,
};
use crate::bracket::{PortEntry, Replay, ReplaySet};
use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::{collections::HashSet, io::Read};

lazy_static! {
    static ref PORT_PATTERN: Regex = Regex::new(r"^(\d+):([^:]+?)(?::([WLwl]))?$").unwrap();
}

const N_MANDATORY_FIELDS: usize = 4;

fn parse_port(field: &str) -> Result<PortEntry, String> {
    let invalid = || format!(r#"invalid port entry "{}""#, field);
    let captures = PORT_PATTERN.captures(field).ok_or_else(invalid)?;
    let port = captures[1].parse::<u8>().map_err(|_| invalid())?;
    let character = captures[2].trim();
    if character.is_empty() {
        return Err(invalid());
    }
    let won = captures
        .get(3)
        .map(|c| c.as_str().eq_ignore_ascii_case("W"));
    Ok(PortEntry::new(port, character.to_string(), won))
}

fn parse_replay_line(line: &str) -> Result<WarningResult<Replay, String>, String> {
    let fields = specs::split_fields(line);
    if fields.len() < N_MANDATORY_FIELDS {
        return Err(format!(
            "expected at least {} fields, got {}",
            N_MANDATORY_FIELDS,
            fields.len()
        ));
    }
    if fields[0].is_empty() {
        return Err("empty replay id".to_string());
    }
    if fields[1].is_empty() {
        return Err("empty setup name".to_string());
    }
    let started_at = specs::parse_timestamp(fields[2], "start date")?;
    let ended_at = specs::parse_timestamp(fields[3], "end date")?;
    if ended_at < started_at {
        return Err("the replay ends before it starts".to_string());
    }
    let mut warnings = Vec::new();
    let mut ports = Vec::with_capacity(fields.len() - N_MANDATORY_FIELDS);
    let mut used_ports = HashSet::new();
    for f in fields[N_MANDATORY_FIELDS..].iter().filter(|f| !f.is_empty()) {
        let entry = parse_port(f)?;
        if !used_ports.insert(entry.port()) {
            return Err(format!("port {} is used twice", entry.port()));
        }
        ports.push(entry);
    }
    if ports.len() != 2 {
        warnings.push(format!(
            "the replay has {} players; it cannot be the game of a match",
            ports.len()
        ));
    }
    let replay = Replay::new(
        fields[0].to_string(),
        fields[1].to_string(),
        started_at,
        ended_at,
        ports,
    );
    Ok(WarningResult::new(replay, warnings))
}

/// A reader for recorded replays.
///
/// Each line describes a replay with tab-separated fields:
/// its identifier, the name of the setup it was recorded on, its start and end dates (RFC 3339),
/// then one field per occupied port.
/// A port field is made of the port number and the character, separated by a colon,
/// optionally followed by `:W` or `:L` when the winner of the game is known.
///
/// Empty lines and lines beginning with `#` are ignored.
///
/// ```text
/// # id	setup	started_at	ended_at	ports...
/// g1	stream	2024-03-01T10:01:00Z	2024-03-01T10:05:30Z	1:fox:W	2:marth:L
/// g2	stream	2024-03-01T10:06:00Z	2024-03-01T10:10:10Z	1:fox	2:marth
/// ```
///
/// # Example
///
/// ```
/// # use replabel::bracket::ReplaySet;
/// # use replabel::io::{InstanceReader, ReplayReader};
/// fn read_replays_from_str(s: &str) -> ReplaySet {
///     let reader = ReplayReader::default();
///     reader.read(&mut s.as_bytes()).expect("cannot read replays")
/// }
/// # read_replays_from_str("g\ts\t2024-03-01T10:00:00Z\t2024-03-01T10:05:00Z\t1:fox\t2:marth");
/// ```
#[derive(Default)]
pub struct ReplayReader {
    warning_handlers: Vec<WarningHandler>,
}

impl InstanceReader<ReplaySet> for ReplayReader {
    fn read(&self, reader: &mut dyn Read) -> Result<ReplaySet> {
        let mut replays = Vec::new();
        let mut ids = HashSet::new();
        for (line_number, line) in specs::read_data_lines(reader)? {
            match parse_replay_line(&line) {
                Ok(result) => {
                    let replay = result.consume_warnings(|w| {
                        notify_warnings(&self.warning_handlers, line_number, w)
                    });
                    if !ids.insert(replay.id().to_string()) {
                        notify_warnings(
                            &self.warning_handlers,
                            line_number,
                            vec![format!(r#"duplicate replay id "{}""#, replay.id())],
                        );
                    }
                    replays.push(replay);
                }
                Err(reason) => notify_malformed(&self.warning_handlers, line_number, reason),
            }
        }
        Ok(ReplaySet::new(replays))
    }

    fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }
}
