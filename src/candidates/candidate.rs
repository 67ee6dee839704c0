use crate::model::ScoreTerms;
use std::ops::Range;

/// A window of consecutive replays of a setup, proposed as the replays of a match.
///
/// The replays are referred to by their indices in the [`ReplaySet`](crate::bracket::ReplaySet)
/// the candidate was generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    match_index: usize,
    first_replay: usize,
    len: usize,
    terms: ScoreTerms,
}

impl Candidate {
    pub(crate) fn new(match_index: usize, first_replay: usize, len: usize, terms: ScoreTerms) -> Self {
        Self {
            match_index,
            first_replay,
            len,
            terms,
        }
    }

    /// Returns the index of the match.
    pub fn match_index(&self) -> usize {
        self.match_index
    }

    /// Returns the indices of the replays of the window.
    pub fn replay_range(&self) -> Range<usize> {
        self.first_replay..self.first_replay + self.len
    }

    /// Returns `true` iff the replay at the given index is one of the window.
    pub fn spans(&self, replay_index: usize) -> bool {
        self.replay_range().contains(&replay_index)
    }

    /// Returns the terms of the log-likelihood of the window.
    pub fn terms(&self) -> &ScoreTerms {
        &self.terms
    }

    /// Returns the log-likelihood of the window.
    pub fn score(&self) -> f64 {
        self.terms.total()
    }
}

/// The candidates of all the matches.
///
/// Candidates are stored by match: the candidates of the match `i` occupy a contiguous range of identifiers,
/// and the identifier of a candidate is its index in the set.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
    match_ranges: Vec<Range<usize>>,
}

impl CandidateSet {
    /// Builds a set from the candidates of each match, in match order.
    pub(crate) fn new(candidates_by_match: Vec<Vec<Candidate>>) -> Self {
        let mut candidates = Vec::with_capacity(candidates_by_match.iter().map(Vec::len).sum());
        let mut match_ranges = Vec::with_capacity(candidates_by_match.len());
        for (i, match_candidates) in candidates_by_match.into_iter().enumerate() {
            debug_assert!(match_candidates.iter().all(|c| c.match_index == i));
            let start = candidates.len();
            candidates.extend(match_candidates);
            match_ranges.push(start..candidates.len());
        }
        Self {
            candidates,
            match_ranges,
        }
    }

    /// Returns the candidate with the given identifier.
    pub fn get(&self, id: usize) -> &Candidate {
        &self.candidates[id]
    }

    /// Returns the identifiers of the candidates of a match.
    pub fn ids_for_match(&self, match_index: usize) -> Range<usize> {
        self.match_ranges[match_index].clone()
    }

    /// Returns the identifiers of the candidates of a match, by decreasing score.
    pub fn ranked_ids_for_match(&self, match_index: usize) -> Vec<usize> {
        let mut ids = self.ids_for_match(match_index).collect::<Vec<usize>>();
        ids.sort_by(|i, j| self.candidates[*j].score().total_cmp(&self.candidates[*i].score()));
        ids
    }

    /// Iterates over the couples of identifiers and candidates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Candidate)> + '_ {
        self.candidates.iter().enumerate()
    }

    /// Returns the number of matches the candidates were generated for.
    pub fn n_matches(&self) -> usize {
        self.match_ranges.len()
    }

    /// Returns the number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns `true` iff the set contains no candidate.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
