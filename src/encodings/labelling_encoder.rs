use crate::{
    candidates::CandidateSet,
    ilp::{IlpProgram, RowBound, Variable},
    LabellingError,
};

/// A decision taken before solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForcedLabel {
    /// the match of the candidate with this identifier must be labelled with this candidate
    Candidate(usize),
    /// the match with this index must be left without label
    NoLabel(usize),
}

/// An integer linear program encoding a labelling problem, and the meaning of its variables.
#[derive(Debug, Clone)]
pub struct LabellingEncoding {
    program: IlpProgram,
    candidate_vars: Vec<Variable>,
    no_label_vars: Vec<Variable>,
}

impl LabellingEncoding {
    /// Returns the program.
    pub fn program(&self) -> &IlpProgram {
        &self.program
    }

    /// Returns the variable set to 1 iff the candidate with the given identifier is selected.
    pub fn candidate_var(&self, candidate_id: usize) -> Variable {
        self.candidate_vars[candidate_id]
    }

    /// Returns the variable set to 1 iff the match with the given index is left without label.
    pub fn no_label_var(&self, match_index: usize) -> Variable {
        self.no_label_vars[match_index]
    }

    /// Returns the number of matches.
    pub fn n_matches(&self) -> usize {
        self.no_label_vars.len()
    }
}

/// Encodes a labelling problem into an integer linear program.
///
/// The program has one binary variable per candidate, with the candidate score as objective coefficient,
/// and one binary "no-label" variable per match, with the configured no-label score as objective coefficient.
/// The objective is maximized under two families of constraints:
///   * for each match, the sum of the variables of its candidates and of its no-label variable is equal to 1;
///   * for each replay, the sum of the variables of the candidates spanning it is at most 1.
///
/// Replays spanned by no candidate get no row.
pub struct LabellingEncoder {
    no_label_score: f64,
}

impl LabellingEncoder {
    /// Builds a new encoder giving the objective coefficient of the no-label variables.
    pub fn new(no_label_score: f64) -> Self {
        Self { no_label_score }
    }

    /// Encodes the problem given the candidates and the number of replays they were generated from.
    ///
    /// # Panics
    ///
    /// If a candidate spans a replay whose index is not lower than `n_replays`.
    pub fn encode(&self, candidates: &CandidateSet, n_replays: usize) -> LabellingEncoding {
        assert!(
            candidates.iter().all(|(_, c)| c.replay_range().end <= n_replays),
            "a candidate spans an undefined replay"
        );
        let mut program = IlpProgram::default();
        let candidate_vars = candidates
            .iter()
            .map(|(_, c)| program.add_binary_variable(c.score()))
            .collect::<Vec<Variable>>();
        let no_label_vars = (0..candidates.n_matches())
            .map(|_| program.add_binary_variable(self.no_label_score))
            .collect::<Vec<Variable>>();
        for (i, no_label_var) in no_label_vars.iter().enumerate() {
            let entries = candidates
                .ids_for_match(i)
                .map(|id| (candidate_vars[id], 1.))
                .chain(std::iter::once((*no_label_var, 1.)));
            program.add_row(entries, RowBound::Equal(1.));
        }
        let mut spanning: Vec<Vec<Variable>> = vec![Vec::new(); n_replays];
        for (id, c) in candidates.iter() {
            c.replay_range()
                .for_each(|r| spanning[r].push(candidate_vars[id]));
        }
        for vars in spanning.into_iter().filter(|v| !v.is_empty()) {
            program.add_row(vars.into_iter().map(|v| (v, 1.)), RowBound::AtMost(1.));
        }
        LabellingEncoding {
            program,
            candidate_vars,
            no_label_vars,
        }
    }

    /// Encodes the problem, fixing the variables of the forced labels to 1.
    ///
    /// An error is returned if a forced label refers to an unknown candidate or match,
    /// or if two decisions are forced for the same match.
    pub fn encode_with_forced_labels(
        &self,
        candidates: &CandidateSet,
        n_replays: usize,
        forced_labels: &[ForcedLabel],
    ) -> Result<LabellingEncoding, LabellingError> {
        let mut encoding = self.encode(candidates, n_replays);
        let mut forced_matches = vec![false; candidates.n_matches()];
        for forced in forced_labels {
            let (match_index, var) = match *forced {
                ForcedLabel::Candidate(id) if id < candidates.len() => {
                    (candidates.get(id).match_index(), encoding.candidate_var(id))
                }
                ForcedLabel::NoLabel(m) if m < candidates.n_matches() => {
                    (m, encoding.no_label_var(m))
                }
                _ => {
                    return Err(LabellingError::Configuration(format!(
                        "forced label {:?} refers to an unknown candidate or match",
                        forced
                    )))
                }
            };
            if forced_matches[match_index] {
                return Err(LabellingError::Configuration(format!(
                    "more than one label is forced for the match with index {}",
                    match_index
                )));
            }
            forced_matches[match_index] = true;
            encoding.program.fix_variable(var, 1.);
        }
        Ok(encoding)
    }
}
