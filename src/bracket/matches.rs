use super::{CharacterProfile, ProfileBook, Timestamp};
use log::info;

/// A match of the bracket.
///
/// A match opposes two players and is made of a known number of games.
/// The bracket records when the match was announced and when its result was reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    id: String,
    players: [String; 2],
    n_games: usize,
    started_at: Timestamp,
    reported_at: Timestamp,
    scores: Option<(usize, usize)>,
    profiles: [Option<CharacterProfile>; 2],
}

impl Match {
    /// Builds a new match without reported scores nor character profiles.
    ///
    /// # Panics
    ///
    /// If the number of games is zero.
    pub fn new(
        id: String,
        players: [String; 2],
        n_games: usize,
        started_at: Timestamp,
        reported_at: Timestamp,
    ) -> Self {
        assert!(n_games > 0, "a match must have at least one game");
        Self {
            id,
            players,
            n_games,
            started_at,
            reported_at,
            scores: None,
            profiles: [None, None],
        }
    }

    /// Sets the scores reported by the bracket, in the order of the players.
    ///
    /// # Panics
    ///
    /// If the scores do not sum to the number of games.
    pub fn with_scores(mut self, scores: (usize, usize)) -> Self {
        assert_eq!(
            self.n_games,
            scores.0 + scores.1,
            "scores must sum to the number of games"
        );
        self.scores = Some(scores);
        self
    }

    /// Sets the character profile of the player at the given index (0 or 1).
    pub fn with_profile(mut self, player: usize, profile: CharacterProfile) -> Self {
        self.profiles[player] = Some(profile);
        self
    }

    /// Returns the identifier of the match.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the players, in bracket order.
    pub fn players(&self) -> &[String; 2] {
        &self.players
    }

    /// Returns the number of games of the match.
    pub fn n_games(&self) -> usize {
        self.n_games
    }

    /// Returns the time the match was announced.
    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    /// Returns the time the match result was reported.
    pub fn reported_at(&self) -> &Timestamp {
        &self.reported_at
    }

    /// Returns the reported scores, if known.
    pub fn scores(&self) -> Option<(usize, usize)> {
        self.scores
    }

    /// Returns the character profile of the player at the given index (0 or 1), if known.
    pub fn profile(&self, player: usize) -> Option<&CharacterProfile> {
        self.profiles[player].as_ref()
    }
}

/// The matches of one or more brackets.
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    matches: Vec<Match>,
}

impl MatchSet {
    /// Builds a set from a list of matches.
    pub fn new(matches: Vec<Match>) -> Self {
        Self { matches }
    }

    /// Attaches the profiles of the book to the players of the matches.
    ///
    /// Returns the number of players for which a profile was found.
    pub fn attach_profiles(&mut self, book: &ProfileBook) -> usize {
        let mut n_found = 0;
        for m in self.matches.iter_mut() {
            for (i, p) in m.players.iter().enumerate() {
                m.profiles[i] = book.get(p).filter(|p| !p.is_empty()).cloned();
                if m.profiles[i].is_some() {
                    n_found += 1;
                }
            }
        }
        info!(
            "found character profiles for {} of the {} match players",
            n_found,
            2 * self.matches.len()
        );
        n_found
    }

    /// Returns the match at the given index.
    pub fn get(&self, index: usize) -> &Match {
        &self.matches[index]
    }

    /// Iterates over the matches.
    pub fn iter(&self) -> impl Iterator<Item = &Match> + '_ {
        self.matches.iter()
    }

    /// Returns the matches as a slice.
    pub fn as_slice(&self) -> &[Match] {
        &self.matches
    }

    /// Returns the number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Returns `true` iff the set contains no match.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn new_match(id: &str, p1: &str, p2: &str) -> Match {
        Match::new(
            id.to_string(),
            [p1.to_string(), p2.to_string()],
            3,
            Utc.timestamp_opt(1_000, 0).unwrap(),
            Utc.timestamp_opt(2_000, 0).unwrap(),
        )
    }

    #[test]
    fn test_accessors() {
        let m = new_match("m0", "a", "b").with_scores((2, 1));
        assert_eq!("m0", m.id());
        assert_eq!(3, m.n_games());
        assert_eq!(Some((2, 1)), m.scores());
        assert!(m.profile(0).is_none());
    }

    #[test]
    #[should_panic]
    fn test_inconsistent_scores() {
        new_match("m0", "a", "b").with_scores((2, 2));
    } // kcov-ignore

    #[test]
    fn test_attach_profiles() {
        let mut book = ProfileBook::default();
        book.insert("Alice", CharacterProfile::new(["fox"], ["falco"]));
        book.insert("Bob", CharacterProfile::default());
        let mut matches = MatchSet::new(vec![
            new_match("m0", "alice", "bob"),
            new_match("m1", "carol", "ALICE"),
        ]);
        assert_eq!(2, matches.attach_profiles(&book));
        assert!(matches.get(0).profile(0).unwrap().is_main("fox"));
        assert!(matches.get(0).profile(1).is_none());
        assert!(matches.get(1).profile(0).is_none());
        assert!(matches.get(1).profile(1).is_some());
    }
}
