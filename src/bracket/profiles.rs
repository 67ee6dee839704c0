use std::collections::{HashMap, HashSet};

/// Computes the fingerprint of a player tag.
///
/// Two tags are considered the same if their fingerprints are equal.
/// The fingerprint is the lowercase tag without its whitespaces.
pub fn tag_fingerprint(tag: &str) -> String {
    tag.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Computes the fingerprint of a character name.
///
/// The fingerprint is the lowercase name keeping only alphanumeric characters,
/// so that `Captain Falcon`, `captain_falcon` and `CAPTAIN_FALCON` are the same character.
pub fn character_fingerprint(character: &str) -> String {
    character
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// The characters a player is known to play.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterProfile {
    mains: HashSet<String>,
    secondaries: HashSet<String>,
}

impl CharacterProfile {
    /// Builds a profile from the names of the main and secondary characters.
    ///
    /// Names are stored as fingerprints.
    /// A character declared both as a main and as a secondary is considered as a main.
    pub fn new<I, J, S, T>(mains: I, secondaries: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mains: HashSet<String> = mains
            .into_iter()
            .map(|c| character_fingerprint(c.as_ref()))
            .filter(|c| !c.is_empty())
            .collect();
        let secondaries = secondaries
            .into_iter()
            .map(|c| character_fingerprint(c.as_ref()))
            .filter(|c| !c.is_empty() && !mains.contains(c))
            .collect();
        Self { mains, secondaries }
    }

    /// Returns `true` iff the character is one of the player's mains.
    pub fn is_main(&self, character: &str) -> bool {
        self.mains.contains(&character_fingerprint(character))
    }

    /// Returns `true` iff the character is one of the player's secondaries.
    pub fn is_secondary(&self, character: &str) -> bool {
        self.secondaries.contains(&character_fingerprint(character))
    }

    /// Returns `true` iff neither mains nor secondaries are known.
    pub fn is_empty(&self) -> bool {
        self.mains.is_empty() && self.secondaries.is_empty()
    }
}

/// A collection of character profiles indexed by tag fingerprints.
#[derive(Debug, Clone, Default)]
pub struct ProfileBook {
    profiles: HashMap<String, CharacterProfile>,
}

impl ProfileBook {
    /// Sets the profile of a player, returning the one previously registered for the same fingerprint.
    pub fn insert(&mut self, tag: &str, profile: CharacterProfile) -> Option<CharacterProfile> {
        self.profiles.insert(tag_fingerprint(tag), profile)
    }

    /// Returns the profile of a player, if any.
    pub fn get(&self, tag: &str) -> Option<&CharacterProfile> {
        self.profiles.get(&tag_fingerprint(tag))
    }

    /// Returns the number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns `true` iff the book contains no profile.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
