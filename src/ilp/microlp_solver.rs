use super::{
    ilp_solver::{SolvingListener, SolvingResult},
    Assignment, IlpProgram, IlpSolver, RowBound,
};
use good_lp::{
    solvers::microlp::microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel,
};

/// A wrapper around the pure Rust `microlp` solver, through the `good_lp` modeling layer.
///
/// Integrality is handled by a branch-and-bound search over the linear relaxation.
#[derive(Default)]
pub struct MicroLpSolver {
    listeners: Vec<Box<dyn SolvingListener>>,
}

impl IlpSolver for MicroLpSolver {
    fn solve(&mut self, program: &IlpProgram) -> SolvingResult {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(program.n_variables(), program.n_rows()));
        let result = solve_with_microlp(program);
        self.listeners.iter().for_each(|l| l.solving_end(&result));
        result
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.listeners.push(listener);
    }
}

fn solve_with_microlp(program: &IlpProgram) -> SolvingResult {
    let mut vars = ProblemVariables::new();
    let xs = program
        .iter_variables()
        .map(|v| {
            let (lower, upper) = program.bounds(v);
            vars.add(variable().integer().min(lower).max(upper))
        })
        .collect::<Vec<good_lp::Variable>>();
    let mut objective = Expression::with_capacity(xs.len());
    for (v, x) in program.iter_variables().zip(xs.iter()) {
        objective.add_mul(program.objective_coef(v), *x);
    }
    let mut model = vars.maximise(objective).using(microlp);
    for (entries, bound) in program.iter_rows() {
        let mut row = Expression::default();
        for (v, coef) in entries {
            row.add_mul(*coef, xs[usize::from(*v)]);
        }
        model = match bound {
            RowBound::Equal(b) => model.with(row.eq(b)),
            RowBound::AtMost(b) => model.with(row.leq(b)),
        };
    }
    match model.solve() {
        Ok(solution) => {
            SolvingResult::Optimal(Assignment::new(xs.iter().map(|x| solution.value(*x)).collect()))
        }
        Err(ResolutionError::Infeasible) => SolvingResult::Infeasible,
        Err(e) => SolvingResult::Failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_knapsack_like() {
        // max 3x + 2y + 2z  s.t.  x + y <= 1, x + z <= 1
        let mut p = IlpProgram::default();
        let x = p.add_binary_variable(3.);
        let y = p.add_binary_variable(2.);
        let z = p.add_binary_variable(2.);
        p.add_row([(x, 1.), (y, 1.)], RowBound::AtMost(1.));
        p.add_row([(x, 1.), (z, 1.)], RowBound::AtMost(1.));
        let assignment = match MicroLpSolver::default().solve(&p) {
            SolvingResult::Optimal(a) => a,
            r => panic!("unexpected result {:?}", r),
        };
        assert!(assignment.value_of(x).abs() < 1e-6);
        assert!((assignment.value_of(y) - 1.).abs() < 1e-6);
        assert!((assignment.value_of(z) - 1.).abs() < 1e-6);
        assert!((p.objective_value(assignment.values()) - 4.).abs() < 1e-6);
    }

    #[test]
    fn test_equality_with_negative_objective() {
        // max -x - 5y  s.t.  x + y = 1
        let mut p = IlpProgram::default();
        let x = p.add_binary_variable(-1.);
        let y = p.add_binary_variable(-5.);
        p.add_row([(x, 1.), (y, 1.)], RowBound::Equal(1.));
        match MicroLpSolver::default().solve(&p) {
            SolvingResult::Optimal(a) => {
                assert!((a.value_of(x) - 1.).abs() < 1e-6);
                assert!(a.value_of(y).abs() < 1e-6);
            }
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_integrality() {
        // the relaxation optimum is x = y = z = 1/2 (value 3/2), the integer optimum is 1
        let mut p = IlpProgram::default();
        let x = p.add_binary_variable(1.);
        let y = p.add_binary_variable(1.);
        let z = p.add_binary_variable(1.);
        p.add_row([(x, 1.), (y, 1.)], RowBound::AtMost(1.));
        p.add_row([(y, 1.), (z, 1.)], RowBound::AtMost(1.));
        p.add_row([(x, 1.), (z, 1.)], RowBound::AtMost(1.));
        match MicroLpSolver::default().solve(&p) {
            SolvingResult::Optimal(a) => {
                assert!(a.values().iter().all(|v| v.abs() < 1e-6 || (v - 1.).abs() < 1e-6));
                assert!((p.objective_value(a.values()) - 1.).abs() < 1e-6);
            }
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_fixed_variable() {
        let mut p = IlpProgram::default();
        let x = p.add_binary_variable(3.);
        let y = p.add_binary_variable(2.);
        p.add_row([(x, 1.), (y, 1.)], RowBound::Equal(1.));
        p.fix_variable(y, 1.);
        match MicroLpSolver::default().solve(&p) {
            SolvingResult::Optimal(a) => assert!((a.value_of(y) - 1.).abs() < 1e-6),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_infeasible() {
        let mut p = IlpProgram::default();
        let x = p.add_binary_variable(1.);
        let y = p.add_binary_variable(1.);
        p.add_row([(x, 1.), (y, 1.)], RowBound::Equal(1.));
        p.fix_variable(x, 1.);
        p.fix_variable(y, 1.);
        assert_eq!(SolvingResult::Infeasible, MicroLpSolver::default().solve(&p));
    }

    struct RecordingListener(Arc<Mutex<Vec<String>>>);

    impl SolvingListener for RecordingListener {
        fn solving_start(&self, n_vars: usize, n_rows: usize) {
            self.0
                .lock()
                .unwrap()
                .push(format!("start {} {}", n_vars, n_rows));
        }

        fn solving_end(&self, result: &SolvingResult) {
            let status = match result {
                SolvingResult::Optimal(_) => "optimal",
                _ => "other",
            };
            self.0.lock().unwrap().push(format!("end {}", status));
        }
    }

    #[test]
    fn test_listeners() {
        let events = Arc::new(Mutex::new(vec![]));
        let mut solver = MicroLpSolver::default();
        solver.add_listener(Box::new(RecordingListener(Arc::clone(&events))));
        let mut p = IlpProgram::default();
        let x = p.add_binary_variable(1.);
        p.add_row([(x, 1.)], RowBound::AtMost(1.));
        solver.solve(&p);
        assert_eq!(
            vec!["start 1 1".to_string(), "end optimal".to_string()],
            *events.lock().unwrap()
        );
    }
}
