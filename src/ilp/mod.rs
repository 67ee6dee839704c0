//! Integer linear programs and the interface of the solvers used to solve them.

mod budgeted_solver;
pub use budgeted_solver::BudgetedIlpSolver;

mod ilp_program;
pub use ilp_program::IlpProgram;
pub use ilp_program::RowBound;
pub use ilp_program::Variable;

mod ilp_solver;
pub use ilp_solver::default_solver;
pub use ilp_solver::Assignment;
pub use ilp_solver::IlpSolver;
pub use ilp_solver::IlpSolverFactoryFn;
pub use ilp_solver::SolvingListener;
pub use ilp_solver::SolvingResult;

mod microlp_solver;
pub use microlp_solver::MicroLpSolver;
