use crate::{
    bracket::{MatchSet, ReplaySet, Timestamp},
    candidates::CandidateSet,
    solvers::Labelling,
    LabellingError,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::{BufRead, BufReader, Read, Write};

/// The type of callback functions to call when warnings are raised while reading an input collection.
///
/// The first parameter is the line (starting at 1) the warning refers to.
pub type WarningHandler = Box<dyn Fn(usize, String)>;

/// A trait implemented by objects able to read an input collection.
pub trait InstanceReader<T> {
    /// Reads a collection.
    ///
    /// Malformed records are skipped.
    /// For each of them, and for each other warning, the callback functions registered by [add_warning_handler](Self::add_warning_handler) are triggered.
    /// An error is returned only if the underlying reader fails or if the collection as a whole cannot be interpreted.
    fn read(&self, reader: &mut dyn Read) -> Result<T>;

    /// Adds a callback function to call when warnings are raised while reading a collection.
    fn add_warning_handler(&mut self, h: WarningHandler);
}

/// A trait implemented by objects that write the results of the labelling process.
pub trait LabellingWriter {
    /// Writes all the candidates of the matches, by decreasing score for each match.
    fn write_candidates(
        &self,
        writer: &mut dyn Write,
        matches: &MatchSet,
        replays: &ReplaySet,
        candidates: &CandidateSet,
    ) -> Result<()>;

    /// Writes a labelling.
    fn write_labelling(
        &self,
        writer: &mut dyn Write,
        matches: &MatchSet,
        replays: &ReplaySet,
        labelling: &Labelling,
    ) -> Result<()>;
}

// returns the non-empty, non-comment lines of a tab-separated input, with their line numbers
pub(crate) fn read_data_lines(reader: &mut dyn Read) -> Result<Vec<(usize, String)>> {
    let mut lines = Vec::new();
    for (i, line) in BufReader::new(reader).lines().enumerate() {
        let l = line.with_context(|| format!("while reading line {}", i + 1))?;
        let trimmed = l.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        lines.push((i + 1, l));
    }
    Ok(lines)
}

pub(crate) fn split_fields(line: &str) -> Vec<&str> {
    line.split('\t').map(|f| f.trim()).collect()
}

pub(crate) fn parse_timestamp(field: &str, name: &str) -> Result<Timestamp, String> {
    DateTime::parse_from_rfc3339(field)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!(r#"invalid {} "{}" ({})"#, name, field, e))
}

pub(crate) fn notify_malformed(handlers: &[WarningHandler], line: usize, reason: String) {
    let message = LabellingError::MalformedInput { line, reason }.to_string();
    handlers.iter().for_each(|h| (h)(line, message.clone()));
}

pub(crate) fn notify_warnings(handlers: &[WarningHandler], line: usize, warnings: Vec<String>) {
    for w in warnings {
        handlers.iter().for_each(|h| (h)(line, w.clone()));
    }
}

pub(crate) fn display_time(t: &Timestamp) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}
