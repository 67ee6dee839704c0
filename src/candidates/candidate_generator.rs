use super::{Candidate, CandidateSet};
use crate::{
    bracket::{Match, MatchSet, ReplaySet},
    model::{InfeasibilityReason, LabellingConfig, Likelihood, LikelihoodModel, ScoreTerms},
};
use log::{debug, info};
use rayon::prelude::*;
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Statistics about the windows examined by a [`CandidateGenerator`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// the number of windows scored
    pub n_windows: usize,
    /// the number of infeasible windows, by reason
    pub n_infeasible: HashMap<InfeasibilityReason, usize>,
    /// the number of feasible windows whose gaps are outside the plausibility window
    pub n_implausible: usize,
    /// the number of plausible windows scoring below the no-label score (when such windows are pruned)
    pub n_dominated: usize,
    /// the number of candidates, by setup index
    pub n_candidates_by_setup: Vec<usize>,
}

impl GenerationStats {
    fn new(n_setups: usize) -> Self {
        Self {
            n_candidates_by_setup: vec![0; n_setups],
            ..Default::default()
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.n_windows += other.n_windows;
        other
            .n_infeasible
            .into_iter()
            .for_each(|(r, n)| *self.n_infeasible.entry(r).or_default() += n);
        self.n_implausible += other.n_implausible;
        self.n_dominated += other.n_dominated;
        self.n_candidates_by_setup
            .iter_mut()
            .zip(other.n_candidates_by_setup)
            .for_each(|(n, m)| *n += m);
        self
    }
}

/// Enumerates the candidates of the matches.
///
/// For each match needing `n` games, every window of `n` consecutive replays of each setup is scored.
/// Infeasible windows are discarded,
/// as well as windows whose gaps are too far from the means of their distributions
/// (more than [`pruning_width`](LabellingConfig::pruning_width) standard deviations).
/// The plausibility window is the only bound on the size of the candidate set.
///
/// Matches are processed in parallel.
pub struct CandidateGenerator<'a> {
    config: &'a LabellingConfig,
    model: LikelihoodModel<'a>,
}

impl<'a> CandidateGenerator<'a> {
    /// Builds a new generator.
    pub fn new(config: &'a LabellingConfig) -> Self {
        Self {
            config,
            model: LikelihoodModel::new(config),
        }
    }

    /// Computes the candidates of all the matches.
    pub fn generate(&self, matches: &MatchSet, replays: &ReplaySet) -> CandidateSet {
        self.generate_with_stats(matches, replays).0
    }

    /// Computes the candidates of all the matches, returning statistics about the examined windows.
    pub fn generate_with_stats(
        &self,
        matches: &MatchSet,
        replays: &ReplaySet,
    ) -> (CandidateSet, GenerationStats) {
        let n_setups = replays.setups().len();
        let (candidates_by_match, stats): (Vec<Vec<Candidate>>, Vec<GenerationStats>) = matches
            .as_slice()
            .par_iter()
            .enumerate()
            .map(|(i, m)| self.generate_for_match(i, m, replays))
            .unzip();
        let stats = stats
            .into_iter()
            .fold(GenerationStats::new(n_setups), GenerationStats::merge);
        let candidates = CandidateSet::new(candidates_by_match);
        log_stats(&stats, replays, &candidates, matches.len());
        (candidates, stats)
    }

    fn generate_for_match(
        &self,
        match_index: usize,
        m: &Match,
        replays: &ReplaySet,
    ) -> (Vec<Candidate>, GenerationStats) {
        let n = m.n_games();
        let mut stats = GenerationStats::new(replays.setups().len());
        let mut candidates = Vec::new();
        for (setup_index, setup) in replays.setups().iter().enumerate() {
            let range = setup.replay_range();
            if range.len() < n {
                continue;
            }
            for first in range.start..=range.end - n {
                stats.n_windows += 1;
                let terms = match self.model.score(m, replays.window(first..first + n)) {
                    Likelihood::Feasible(terms) => terms,
                    Likelihood::Infeasible(reason) => {
                        *stats.n_infeasible.entry(reason).or_default() += 1;
                        continue;
                    }
                };
                if !self.is_plausible(&terms) {
                    stats.n_implausible += 1;
                    continue;
                }
                if self.config.prune_dominated && terms.total() < self.config.no_label_score {
                    stats.n_dominated += 1;
                    continue;
                }
                stats.n_candidates_by_setup[setup_index] += 1;
                candidates.push(Candidate::new(match_index, first, n, terms));
            }
        }
        (candidates, stats)
    }

    fn is_plausible(&self, terms: &ScoreTerms) -> bool {
        let width = self.config.pruning_width;
        self.config.pregame_gap.is_plausible(terms.pregame_gap, width)
            && self.config.postgame_gap.is_plausible(terms.postgame_gap, width)
    }
}

fn log_stats(
    stats: &GenerationStats,
    replays: &ReplaySet,
    candidates: &CandidateSet,
    n_matches: usize,
) {
    for (setup, n) in replays.setups().iter().zip(stats.n_candidates_by_setup.iter()) {
        info!(
            r#"setup "{}" has {} replays -> {} candidates"#,
            setup.name(),
            setup.n_replays(),
            n
        );
    }
    debug!("{} windows were examined", stats.n_windows);
    for reason in InfeasibilityReason::iter() {
        if let Some(n) = stats.n_infeasible.get(&reason) {
            debug!("{} windows were infeasible ({})", n, reason.as_ref());
        }
    }
    debug!(
        "{} windows were outside the plausibility window",
        stats.n_implausible
    );
    debug!(
        "{} windows scored below the no-label score",
        stats.n_dominated
    );
    let n_without = (0..n_matches)
        .filter(|i| candidates.ids_for_match(*i).is_empty())
        .count();
    info!(
        "computed {} candidates for {} matches ({} without any candidate)",
        candidates.len(),
        n_matches,
        n_without
    );
}
