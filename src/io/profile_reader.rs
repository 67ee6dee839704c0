use super::{
    specs::{notify_malformed, notify_warnings},
    InstanceReader, WarningHandler,
};
use crate::bracket::{CharacterProfile, ProfileBook};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::io::Read;

lazy_static! {
    static ref CHARACTER_SEPARATOR_PATTERN: Regex =
        Regex::new(r"(?i)\s*(?:[/,;&+]|\band\b)\s*").unwrap();
}

const TAG_COLUMN: &str = "TAG";
const MAINS_COLUMN: &str = "Main";
const SECONDARIES_COLUMN: &str = "Secondaries";

fn split_characters(field: &str) -> Vec<&str> {
    CHARACTER_SEPARATOR_PATTERN
        .split(field.trim())
        .filter(|c| !c.is_empty())
        .collect()
}

/// A reader for player profiles.
///
/// Profiles are read from a CSV file with a header.
/// The columns `TAG`, `Main` and `Secondaries` give the tag of a player and the characters they usually pick;
/// other columns are ignored.
/// Several characters may be listed in a cell, separated by `/`, `,`, `;`, `&`, `+` or `and`.
///
/// Rows without tag are skipped.
/// If a tag appears more than once, the last occurrence is kept.
///
/// ```text
/// TAG,Main,Secondaries,Region
/// alice,Fox,Falco / Marth,north
/// bob,Peach and Sheik,,south
/// ```
///
/// # Example
///
/// ```
/// # use replabel::bracket::ProfileBook;
/// # use replabel::io::{InstanceReader, ProfileReader};
/// fn read_profiles_from_str(s: &str) -> ProfileBook {
///     let reader = ProfileReader::default();
///     reader.read(&mut s.as_bytes()).expect("cannot read profiles")
/// }
/// # read_profiles_from_str("TAG,Main,Secondaries\nalice,fox,falco");
/// ```
#[derive(Default)]
pub struct ProfileReader {
    warning_handlers: Vec<WarningHandler>,
}

impl InstanceReader<ProfileBook> for ProfileReader {
    fn read(&self, reader: &mut dyn Read) -> Result<ProfileBook> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader
            .headers()
            .context("while reading the profile header")?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| anyhow!(r#"missing column "{}" in the profile header"#, name))
        };
        let tag_column = column(TAG_COLUMN)?;
        let mains_column = column(MAINS_COLUMN)?;
        let secondaries_column = column(SECONDARIES_COLUMN)?;
        let mut book = ProfileBook::default();
        for result in csv_reader.records() {
            let record = result.context("while reading a profile")?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or_default();
            let tag = record.get(tag_column).unwrap_or_default();
            if tag.is_empty() {
                notify_malformed(&self.warning_handlers, line, "missing tag".to_string());
                continue;
            }
            let profile = CharacterProfile::new(
                split_characters(record.get(mains_column).unwrap_or_default()),
                split_characters(record.get(secondaries_column).unwrap_or_default()),
            );
            if book.insert(tag, profile).is_some() {
                notify_warnings(
                    &self.warning_handlers,
                    line,
                    vec![format!(
                        r#"duplicate tag "{}"; taking later occurrence"#,
                        tag
                    )],
                );
            }
        }
        Ok(book)
    }

    fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    fn read_with_warnings(content: &str) -> (ProfileBook, Vec<(usize, String)>) {
        let warnings = Rc::new(RefCell::new(vec![]));
        let mut reader = ProfileReader::default();
        let handler_warnings = Rc::clone(&warnings);
        reader.add_warning_handler(Box::new(move |line, w| {
            handler_warnings.borrow_mut().push((line, w))
        }));
        let book = reader.read(&mut content.as_bytes()).unwrap();
        let w = warnings.borrow().clone();
        (book, w)
    }

    #[test]
    fn test_split_characters() {
        assert_eq!(
            vec!["Fox", "Falco", "Marth", "Sheik", "Peach", "Puff"],
            split_characters(" Fox/Falco, Marth; Sheik & Peach AND Puff ")
        );
        assert_eq!(vec!["Ice Climbers"], split_characters("Ice Climbers"));
        assert_eq!(vec!["Ganondorf"], split_characters("Ganondorf"));
        assert!(split_characters("").is_empty());
    }

    #[test]
    fn test_read_ok() {
        let content = "Region,TAG,Main,Secondaries\n\
            north,Alice,Fox,Falco / Marth\n\
            south,B o b,Peach and Sheik,\n";
        let (book, warnings) = read_with_warnings(content);
        assert!(warnings.is_empty());
        assert_eq!(2, book.len());
        let alice = book.get("alice").unwrap();
        assert!(alice.is_main("fox"));
        assert!(alice.is_secondary("Falco"));
        assert!(alice.is_secondary("marth"));
        let bob = book.get("Bob").unwrap();
        assert!(bob.is_main("peach"));
        assert!(bob.is_main("sheik"));
        assert!(!bob.is_secondary("fox"));
    }

    #[test]
    fn test_missing_tag_and_duplicates() {
        let content = "TAG,Main,Secondaries\n\
            alice,Fox,\n\
            ,Marth,\n\
            ALICE,Falco,\n";
        let (book, warnings) = read_with_warnings(content);
        assert_eq!(1, book.len());
        assert!(book.get("alice").unwrap().is_main("falco"));
        assert_eq!(2, warnings.len());
        assert_eq!(3, warnings[0].0);
        assert!(warnings[0].1.contains("missing tag"));
        assert_eq!(
            (4, r#"duplicate tag "ALICE"; taking later occurrence"#.to_string()),
            warnings[1]
        );
    }

    #[test]
    fn test_missing_column() {
        let reader = ProfileReader::default();
        assert!(reader
            .read(&mut "TAG,Main\nalice,fox\n".as_bytes())
            .is_err());
    }
}
