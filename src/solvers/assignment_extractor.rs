use crate::{
    candidates::{Candidate, CandidateSet},
    encodings::LabellingEncoding,
    ilp::{Assignment, Variable},
    LabellingError,
};

/// The maximal distance between a value returned by a solver and the integer it stands for.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// The label of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLabel {
    /// the match is labelled by the candidate with this identifier
    Assigned(usize),
    /// no replay was found for the match
    NoLabel,
}

/// A labelling of the matches, together with the candidates it was computed from.
#[derive(Debug, Clone)]
pub struct Labelling<'a> {
    candidates: &'a CandidateSet,
    labels: Vec<MatchLabel>,
    objective: f64,
}

impl<'a> Labelling<'a> {
    /// Returns the candidates the labelling was computed from.
    pub fn candidates(&self) -> &'a CandidateSet {
        self.candidates
    }

    /// Returns the labels, in match order.
    pub fn labels(&self) -> &[MatchLabel] {
        &self.labels
    }

    /// Returns the label of the match with the given index.
    pub fn label(&self, match_index: usize) -> MatchLabel {
        self.labels[match_index]
    }

    /// Returns the candidate labelling the match with the given index, if any.
    pub fn assigned_candidate(&self, match_index: usize) -> Option<&'a Candidate> {
        match self.labels[match_index] {
            MatchLabel::Assigned(id) => Some(self.candidates.get(id)),
            MatchLabel::NoLabel => None,
        }
    }

    /// Returns the value of the objective function: the sum of the scores of the chosen candidates and of the no-label scores.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Returns the number of matches labelled by a candidate.
    pub fn n_labelled(&self) -> usize {
        self.labels
            .iter()
            .filter(|l| matches!(l, MatchLabel::Assigned(_)))
            .count()
    }
}

/// Translates the solution of a labelling program into a labelling.
///
/// Values are rounded to the closest integer; an error is returned if a value is farther than [`INTEGRALITY_TOLERANCE`]
/// from 0 and 1, or if a match is not covered by exactly one of its candidates and its no-label variable.
pub fn extract_labelling<'a>(
    candidates: &'a CandidateSet,
    encoding: &LabellingEncoding,
    assignment: &Assignment,
) -> Result<Labelling<'a>, LabellingError> {
    if assignment.values().len() != encoding.program().n_variables() {
        return Err(LabellingError::Solver(format!(
            "the solver returned {} values for {} variables",
            assignment.values().len(),
            encoding.program().n_variables()
        )));
    }
    let is_set = |v: Variable| -> Result<bool, LabellingError> {
        let value = assignment.value_of(v);
        if value.abs() <= INTEGRALITY_TOLERANCE {
            Ok(false)
        } else if (value - 1.).abs() <= INTEGRALITY_TOLERANCE {
            Ok(true)
        } else {
            Err(LabellingError::Solver(format!(
                "the solver returned the non-integral value {} for a binary variable",
                value
            )))
        }
    };
    let mut labels = Vec::with_capacity(encoding.n_matches());
    let mut objective = 0.;
    for match_index in 0..encoding.n_matches() {
        let mut label = None;
        let mut n_set = 0;
        let no_label_var = encoding.no_label_var(match_index);
        if is_set(no_label_var)? {
            n_set += 1;
            label = Some(MatchLabel::NoLabel);
            objective += encoding.program().objective_coef(no_label_var);
        }
        for id in candidates.ids_for_match(match_index) {
            if is_set(encoding.candidate_var(id))? {
                n_set += 1;
                label = Some(MatchLabel::Assigned(id));
                objective += candidates.get(id).score();
            }
        }
        match (n_set, label) {
            (1, Some(l)) => labels.push(l),
            _ => {
                return Err(LabellingError::Solver(format!(
                    "the match with index {} is covered {} times in the solution",
                    match_index, n_set
                )))
            }
        }
    }
    Ok(Labelling {
        candidates,
        labels,
        objective,
    })
}
