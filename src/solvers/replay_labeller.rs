use super::{extract_labelling, Labelling};
use crate::{
    bracket::{MatchSet, ReplaySet},
    candidates::{CandidateGenerator, CandidateSet},
    encodings::{ForcedLabel, LabellingEncoder},
    ilp::{self, BudgetedIlpSolver, IlpSolver, IlpSolverFactoryFn, SolvingListener, SolvingResult},
    model::LabellingConfig,
    LabellingError,
};
use log::info;
use std::sync::Arc;

/// Computes the labelling of the matches of a bracket that maximizes the overall log-likelihood.
///
/// The labelling is computed in two steps.
/// First, the candidates of the matches are enumerated by a [`CandidateGenerator`].
/// Then, an integer linear program selecting at most one candidate per match and at most one match per replay is solved.
/// Matches for which no candidate is selected are left without label, at the cost of the no-label score.
///
/// If the configuration sets a time budget, the solver is wrapped into a [`BudgetedIlpSolver`].
pub struct ReplayLabeller<'a> {
    matches: &'a MatchSet,
    replays: &'a ReplaySet,
    config: &'a LabellingConfig,
    solver_factory: Arc<IlpSolverFactoryFn>,
    listeners: Vec<Arc<dyn SolvingListener + Sync>>,
}

impl<'a> ReplayLabeller<'a> {
    /// Builds a new labeller.
    ///
    /// The underlying ILP solver is one returned by [default_solver](crate::ilp::default_solver).
    ///
    /// An error is returned if the configuration is invalid or if the matches or the replays are empty.
    pub fn new(
        matches: &'a MatchSet,
        replays: &'a ReplaySet,
        config: &'a LabellingConfig,
    ) -> Result<Self, LabellingError> {
        Self::new_with_solver_factory(matches, replays, config, Arc::new(ilp::default_solver))
    }

    /// Builds a new labeller.
    ///
    /// The ILP solver to use in given through the solver factory.
    ///
    /// An error is returned if the configuration is invalid or if the matches or the replays are empty.
    pub fn new_with_solver_factory(
        matches: &'a MatchSet,
        replays: &'a ReplaySet,
        config: &'a LabellingConfig,
        solver_factory: Arc<IlpSolverFactoryFn>,
    ) -> Result<Self, LabellingError> {
        config.check()?;
        if matches.is_empty() {
            return Err(LabellingError::EmptyInput("match"));
        }
        if replays.is_empty() {
            return Err(LabellingError::EmptyInput("replay"));
        }
        Ok(Self {
            matches,
            replays,
            config,
            solver_factory,
            listeners: Vec::new(),
        })
    }

    /// Adds a listener notified each time the labeller calls a solver.
    pub fn add_solving_listener(&mut self, listener: Box<dyn SolvingListener + Sync>) {
        self.listeners.push(Arc::from(listener));
    }

    /// Enumerates the candidates of the matches.
    pub fn compute_candidates(&self) -> CandidateSet {
        CandidateGenerator::new(self.config).generate(self.matches, self.replays)
    }

    /// Computes an optimal labelling given the candidates of the matches.
    pub fn compute_labelling<'c>(
        &self,
        candidates: &'c CandidateSet,
    ) -> Result<Labelling<'c>, LabellingError> {
        self.compute_labelling_with_forced_labels(candidates, &[])
    }

    /// Computes an optimal labelling given the candidates of the matches, among the ones respecting the forced labels.
    pub fn compute_labelling_with_forced_labels<'c>(
        &self,
        candidates: &'c CandidateSet,
        forced_labels: &[ForcedLabel],
    ) -> Result<Labelling<'c>, LabellingError> {
        if candidates.n_matches() != self.matches.len() {
            return Err(LabellingError::Configuration(format!(
                "the candidates were computed for {} matches, but the bracket has {}",
                candidates.n_matches(),
                self.matches.len()
            )));
        }
        if let Some((_, c)) = candidates
            .iter()
            .find(|(_, c)| c.replay_range().end > self.replays.len())
        {
            return Err(LabellingError::Configuration(format!(
                "a candidate spans replays {:?}, but only {} replays were read",
                c.replay_range(),
                self.replays.len()
            )));
        }
        let encoding = LabellingEncoder::new(self.config.no_label_score)
            .encode_with_forced_labels(candidates, self.replays.len(), forced_labels)?;
        info!(
            "solving a program with {} variables, {} constraints and {} nonzeros",
            encoding.program().n_variables(),
            encoding.program().n_rows(),
            encoding.program().n_nonzeros()
        );
        let mut solver = self.build_solver();
        let assignment = match solver.solve(encoding.program()) {
            SolvingResult::Optimal(a) => a,
            SolvingResult::Infeasible => {
                return Err(LabellingError::Solver(
                    "the labelling program is infeasible".to_string(),
                ))
            }
            SolvingResult::Timeout => {
                return Err(LabellingError::SolverTimeout(
                    self.config.time_budget.unwrap_or_default(),
                ))
            }
            SolvingResult::Failed(reason) => return Err(LabellingError::Solver(reason)),
        };
        let labelling = extract_labelling(candidates, &encoding, &assignment)?;
        info!(
            "labelled {} matches out of {} (objective value: {})",
            labelling.n_labelled(),
            self.matches.len(),
            labelling.objective()
        );
        Ok(labelling)
    }

    fn build_solver(&self) -> Box<dyn IlpSolver> {
        let mut solver: Box<dyn IlpSolver> = match self.config.time_budget {
            Some(budget) => Box::new(BudgetedIlpSolver::new(
                Arc::clone(&self.solver_factory),
                budget,
            )),
            None => (self.solver_factory)(),
        };
        self.listeners
            .iter()
            .for_each(|l| solver.add_listener(Box::new(SharedListener(Arc::clone(l)))));
        solver
    }
}

struct SharedListener(Arc<dyn SolvingListener + Sync>);

impl SolvingListener for SharedListener {
    fn solving_start(&self, n_vars: usize, n_rows: usize) {
        self.0.solving_start(n_vars, n_rows)
    }

    fn solving_end(&self, result: &SolvingResult) {
        self.0.solving_end(result)
    }
}
