use super::Timestamp;
use std::ops::Range;

/// A controller port occupied during a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    port: u8,
    character: String,
    won: Option<bool>,
}

impl PortEntry {
    /// Builds a new port entry.
    ///
    /// The outcome of the game for this port may be unknown.
    pub fn new(port: u8, character: String, won: Option<bool>) -> Self {
        Self {
            port,
            character,
            won,
        }
    }

    /// Returns the port number.
    pub fn port(&self) -> u8 {
        self.port
    }

    /// Returns the character played on this port.
    pub fn character(&self) -> &str {
        &self.character
    }

    /// Returns whether the player on this port won the game, if known.
    pub fn won(&self) -> Option<bool> {
        self.won
    }
}

/// A recorded game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    id: String,
    setup: String,
    started_at: Timestamp,
    ended_at: Timestamp,
    ports: Vec<PortEntry>,
}

impl Replay {
    /// Builds a new replay.
    ///
    /// Port entries are sorted by port number.
    pub fn new(
        id: String,
        setup: String,
        started_at: Timestamp,
        ended_at: Timestamp,
        mut ports: Vec<PortEntry>,
    ) -> Self {
        ports.sort_unstable_by_key(|p| p.port);
        Self {
            id,
            setup,
            started_at,
            ended_at,
            ports,
        }
    }

    /// Returns the identifier of the replay.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the name of the setup the replay was recorded on.
    pub fn setup(&self) -> &str {
        &self.setup
    }

    /// Returns the time the game started.
    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    /// Returns the time the game ended.
    pub fn ended_at(&self) -> &Timestamp {
        &self.ended_at
    }

    /// Returns the occupied ports, sorted by port number.
    pub fn ports(&self) -> &[PortEntry] {
        &self.ports
    }

    /// Returns the entry of the given port, if it is occupied.
    pub fn port(&self, port: u8) -> Option<&PortEntry> {
        self.ports.iter().find(|p| p.port == port)
    }
}

/// A physical setup, producing a chronological stream of replays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setup {
    name: String,
    replays: Range<usize>,
}

impl Setup {
    /// Returns the name of the setup.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the range of the indices of the setup replays in its [`ReplaySet`].
    pub fn replay_range(&self) -> Range<usize> {
        self.replays.clone()
    }

    /// Returns the number of replays recorded on this setup.
    pub fn n_replays(&self) -> usize {
        self.replays.len()
    }
}

/// The collection of all the replays, grouped by setup.
///
/// Replays are stored in a single vector, sorted by setup name and then by start time.
/// The replays of a setup hence occupy a contiguous range of indices,
/// and any window of consecutive replays on a setup is a slice of this vector.
#[derive(Debug, Clone, Default)]
pub struct ReplaySet {
    replays: Vec<Replay>,
    setups: Vec<Setup>,
}

impl ReplaySet {
    /// Builds the collection from a list of replays given in any order.
    pub fn new(mut replays: Vec<Replay>) -> Self {
        replays.sort_by(|r1, r2| {
            r1.setup
                .cmp(&r2.setup)
                .then_with(|| r1.started_at.cmp(&r2.started_at))
                .then_with(|| r1.id.cmp(&r2.id))
        });
        let mut setups: Vec<Setup> = Vec::new();
        for (i, r) in replays.iter().enumerate() {
            match setups.last_mut() {
                Some(s) if s.name == r.setup => s.replays.end = i + 1,
                _ => setups.push(Setup {
                    name: r.setup.clone(),
                    replays: i..i + 1,
                }),
            }
        }
        Self { replays, setups }
    }

    /// Returns the replay at the given index.
    pub fn get(&self, index: usize) -> &Replay {
        &self.replays[index]
    }

    /// Returns the replays whose indices are in the given range.
    pub fn window(&self, range: Range<usize>) -> &[Replay] {
        &self.replays[range]
    }

    /// Returns the setups, sorted by name.
    pub fn setups(&self) -> &[Setup] {
        &self.setups
    }

    /// Returns the index of the setup which recorded the replay at the given index.
    pub fn setup_index_of(&self, replay_index: usize) -> usize {
        self.setups
            .partition_point(|s| s.replays.end <= replay_index)
    }

    /// Returns the number of replays.
    pub fn len(&self) -> usize {
        self.replays.len()
    }

    /// Returns `true` iff the collection contains no replay.
    pub fn is_empty(&self) -> bool {
        self.replays.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn replay(id: &str, setup: &str, start: i64) -> Replay {
        Replay::new(
            id.to_string(),
            setup.to_string(),
            Utc.timestamp_opt(start, 0).unwrap(),
            Utc.timestamp_opt(start + 100, 0).unwrap(),
            vec![
                PortEntry::new(3, "marth".to_string(), None),
                PortEntry::new(1, "fox".to_string(), Some(true)),
            ],
        )
    }

    #[test]
    fn test_ports_are_sorted() {
        let r = replay("r", "s", 0);
        assert_eq!(vec![1, 3], r.ports().iter().map(|p| p.port()).collect::<Vec<u8>>());
        assert_eq!("marth", r.port(3).unwrap().character());
        assert!(r.port(2).is_none());
    }

    #[test]
    fn test_grouped_by_setup_and_sorted() {
        let set = ReplaySet::new(vec![
            replay("b2", "B", 300),
            replay("a1", "A", 200),
            replay("b1", "B", 100),
            replay("a0", "A", 0),
            replay("b3", "B", 500),
        ]);
        assert_eq!(5, set.len());
        let setups = set.setups();
        assert_eq!(2, setups.len());
        assert_eq!("A", setups[0].name());
        assert_eq!(0..2, setups[0].replay_range());
        assert_eq!("B", setups[1].name());
        assert_eq!(2..5, setups[1].replay_range());
        let ids = set
            .window(0..5)
            .iter()
            .map(|r| r.id())
            .collect::<Vec<&str>>();
        assert_eq!(vec!["a0", "a1", "b1", "b2", "b3"], ids);
    }

    #[test]
    fn test_setup_index_of() {
        let set = ReplaySet::new(vec![
            replay("a0", "A", 0),
            replay("b0", "B", 0),
            replay("b1", "B", 200),
            replay("c0", "C", 0),
        ]);
        assert_eq!(0, set.setup_index_of(0));
        assert_eq!(1, set.setup_index_of(1));
        assert_eq!(1, set.setup_index_of(2));
        assert_eq!(2, set.setup_index_of(3));
    }

    #[test]
    fn test_empty() {
        let set = ReplaySet::new(vec![]);
        assert!(set.is_empty());
        assert!(set.setups().is_empty());
    }
}
