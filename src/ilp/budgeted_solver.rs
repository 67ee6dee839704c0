use super::{
    ilp_solver::{IlpSolverFactoryFn, SolvingListener, SolvingResult},
    IlpProgram, IlpSolver,
};
use log::warn;
use std::{
    sync::{
        mpsc::{self, RecvTimeoutError},
        Arc,
    },
    thread,
    time::Duration,
};

/// A solver bounding the time spent by another solver.
///
/// Each search is run by a fresh solver, built by the factory on a dedicated worker thread.
/// If the worker does not return before the budget expires, [`SolvingResult::Timeout`] is returned at once.
/// The worker cannot be interrupted: it is left running in the background and its result is discarded.
pub struct BudgetedIlpSolver {
    solver_factory: Arc<IlpSolverFactoryFn>,
    budget: Duration,
    listeners: Vec<Box<dyn SolvingListener>>,
}

impl BudgetedIlpSolver {
    /// Builds a new solver bounding the solvers returned by the factory to the given time budget.
    pub fn new(solver_factory: Arc<IlpSolverFactoryFn>, budget: Duration) -> Self {
        Self {
            solver_factory,
            budget,
            listeners: Vec::new(),
        }
    }
}

impl IlpSolver for BudgetedIlpSolver {
    fn solve(&mut self, program: &IlpProgram) -> SolvingResult {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(program.n_variables(), program.n_rows()));
        let (sender, receiver) = mpsc::channel();
        let solver_factory = Arc::clone(&self.solver_factory);
        let worker_program = program.clone();
        let spawned = thread::Builder::new()
            .name("ilp-worker".into())
            .spawn(move || {
                let mut solver = (solver_factory)();
                let _ = sender.send(solver.solve(&worker_program));
            });
        let result = match spawned {
            Ok(_) => match receiver.recv_timeout(self.budget) {
                Ok(r) => r,
                Err(RecvTimeoutError::Timeout) => {
                    warn!("the ILP solver exceeded its time budget of {:?}", self.budget);
                    SolvingResult::Timeout
                }
                Err(RecvTimeoutError::Disconnected) => {
                    SolvingResult::Failed("the solver worker ended without a result".to_string())
                }
            },
            Err(e) => SolvingResult::Failed(format!("cannot start the solver worker: {}", e)),
        };
        self.listeners.iter().for_each(|l| l.solving_end(&result));
        result
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.listeners.push(listener);
    }
}
