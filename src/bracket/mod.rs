//! The data handled by the labeller: bracket matches, recorded replays and player profiles.

mod matches;
pub use matches::Match;
pub use matches::MatchSet;

mod profiles;
pub use profiles::character_fingerprint;
pub use profiles::tag_fingerprint;
pub use profiles::CharacterProfile;
pub use profiles::ProfileBook;

mod replays;
pub use replays::PortEntry;
pub use replays::Replay;
pub use replays::ReplaySet;
pub use replays::Setup;

use chrono::{DateTime, Utc};

/// The type used for every timestamp.
pub type Timestamp = DateTime<Utc>;

/// Returns the signed number of seconds elapsed from `from` to `to`.
pub fn seconds_between(from: &Timestamp, to: &Timestamp) -> f64 {
    (*to - *from).num_milliseconds() as f64 / 1000.
}
