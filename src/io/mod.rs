//! Objects used to read bracket matches, replays and player profiles, and to write labellings.

mod match_reader;
pub use match_reader::MatchReader;

mod profile_reader;
pub use profile_reader::ProfileReader;

mod replay_reader;
pub use replay_reader::ReplayReader;

mod specs;
pub use specs::InstanceReader;
pub use specs::LabellingWriter;
pub use specs::WarningHandler;

mod text_writer;
pub use text_writer::TextWriter;

mod tsv_writer;
pub use tsv_writer::TsvWriter;
pub use tsv_writer::NO_LABEL;

mod warning_result;
