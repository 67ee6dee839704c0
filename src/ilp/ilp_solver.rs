use super::{IlpProgram, MicroLpSolver, Variable};

/// The values assigned to the variables of a program by a solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment(Vec<f64>);

impl Assignment {
    /// Builds an assignment from the values of the variables, in variable order.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Returns the value assigned to a variable.
    ///
    /// Solvers work with floating point numbers: the value of an integer variable may be slightly off.
    pub fn value_of(&self, v: Variable) -> f64 {
        self.0[usize::from(v)]
    }

    /// Returns the values of all the variables, in variable order.
    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

/// The result of a call to an [`IlpSolver`].
#[derive(Debug, Clone, PartialEq)]
pub enum SolvingResult {
    /// An optimal solution was found.
    Optimal(Assignment),
    /// The program has no solution.
    Infeasible,
    /// The solver did not end within its time budget.
    Timeout,
    /// The solver failed for another reason.
    Failed(String),
}

/// A trait for objects listening to the calls to a solver.
pub trait SolvingListener: Send {
    /// Called when the solver begins the search.
    fn solving_start(&self, n_vars: usize, n_rows: usize);

    /// Called when the solver ends the search.
    fn solving_end(&self, result: &SolvingResult);
}

/// A trait for integer linear program solvers.
///
/// Solvers compute an optimal solution of an [`IlpProgram`].
/// When several solutions are optimal, the one returned depends on the solver.
pub trait IlpSolver {
    /// Solves the program.
    fn solve(&mut self, program: &IlpProgram) -> SolvingResult;

    /// Adds a listener which is notified when the solver starts and ends a search.
    fn add_listener(&mut self, listener: Box<dyn SolvingListener>);
}

/// The type of functions creating solvers.
pub type IlpSolverFactoryFn = dyn Fn() -> Box<dyn IlpSolver> + Send + Sync;

/// The default ILP solver ([`MicroLpSolver`]).
pub fn default_solver() -> Box<dyn IlpSolver> {
    Box::<MicroLpSolver>::default()
}
