/// A variable of an [`IlpProgram`].
///
/// Variables are identified by their index in the program, in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable(usize);

impl From<Variable> for usize {
    fn from(v: Variable) -> Self {
        v.0
    }
}

/// The bound of a constraint row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowBound {
    /// the row must be equal to the value
    Equal(f64),
    /// the row must be lower than or equal to the value
    AtMost(f64),
}

/// A maximization program over integer variables.
///
/// Each variable has an objective coefficient and bounds; all variables are integral.
/// Constraint rows are stored in a compressed sparse form: the nonzero entries of all the rows
/// are stored in a single vector, and each row is a range of this vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IlpProgram {
    objective: Vec<f64>,
    bounds: Vec<(f64, f64)>,
    row_starts: Vec<usize>,
    row_entries: Vec<(Variable, f64)>,
    row_bounds: Vec<RowBound>,
}

impl IlpProgram {
    /// Adds a new variable with domain {0, 1} and returns it.
    pub fn add_binary_variable(&mut self, objective: f64) -> Variable {
        self.objective.push(objective);
        self.bounds.push((0., 1.));
        Variable(self.objective.len() - 1)
    }

    /// Fixes the value of a variable by setting both its bounds to the value.
    pub fn fix_variable(&mut self, v: Variable, value: f64) {
        self.bounds[v.0] = (value, value);
    }

    /// Adds a constraint row given its nonzero entries and its bound.
    ///
    /// # Panics
    ///
    /// If an entry refers to a variable that does not belong to this program.
    pub fn add_row<I>(&mut self, entries: I, bound: RowBound)
    where
        I: IntoIterator<Item = (Variable, f64)>,
    {
        self.row_starts.push(self.row_entries.len());
        for (v, coef) in entries {
            assert!(v.0 < self.objective.len(), "undefined variable in row");
            self.row_entries.push((v, coef));
        }
        self.row_bounds.push(bound);
    }

    /// Returns the objective coefficient of a variable.
    pub fn objective_coef(&self, v: Variable) -> f64 {
        self.objective[v.0]
    }

    /// Returns the lower and upper bounds of a variable.
    pub fn bounds(&self, v: Variable) -> (f64, f64) {
        self.bounds[v.0]
    }

    /// Iterates over the variables.
    pub fn iter_variables(&self) -> impl Iterator<Item = Variable> {
        (0..self.objective.len()).map(Variable)
    }

    /// Iterates over the rows, given as their entries and their bound.
    pub fn iter_rows(&self) -> impl Iterator<Item = (&[(Variable, f64)], RowBound)> + '_ {
        (0..self.row_bounds.len()).map(|i| {
            let end = self
                .row_starts
                .get(i + 1)
                .copied()
                .unwrap_or(self.row_entries.len());
            (&self.row_entries[self.row_starts[i]..end], self.row_bounds[i])
        })
    }

    /// Returns the objective value of the assignment.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, x)| c * x).sum()
    }

    /// Returns the number of variables.
    pub fn n_variables(&self) -> usize {
        self.objective.len()
    }

    /// Returns the number of constraint rows.
    pub fn n_rows(&self) -> usize {
        self.row_bounds.len()
    }

    /// Returns the number of nonzero entries in the constraint matrix.
    pub fn n_nonzeros(&self) -> usize {
        self.row_entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables() {
        let mut p = IlpProgram::default();
        let x = p.add_binary_variable(2.);
        let y = p.add_binary_variable(-1.);
        assert_eq!(0, usize::from(x));
        assert_eq!(1, usize::from(y));
        assert_eq!(2, p.n_variables());
        assert_eq!(-1., p.objective_coef(y));
        assert_eq!((0., 1.), p.bounds(x));
        p.fix_variable(x, 1.);
        assert_eq!((1., 1.), p.bounds(x));
        assert_eq!(vec![x, y], p.iter_variables().collect::<Vec<Variable>>());
    }

    #[test]
    fn test_rows() {
        let mut p = IlpProgram::default();
        let x = p.add_binary_variable(2.);
        let y = p.add_binary_variable(-1.);
        p.add_row([(x, 1.), (y, 1.)], RowBound::Equal(1.));
        p.add_row(Vec::new(), RowBound::AtMost(1.));
        p.add_row([(y, 2.)], RowBound::AtMost(1.));
        assert_eq!(3, p.n_rows());
        assert_eq!(3, p.n_nonzeros());
        let rows = p.iter_rows().collect::<Vec<_>>();
        assert_eq!(&[(x, 1.), (y, 1.)], rows[0].0);
        assert_eq!(RowBound::Equal(1.), rows[0].1);
        assert!(rows[1].0.is_empty());
        assert_eq!(&[(y, 2.)], rows[2].0);
    }

    #[test]
    #[should_panic]
    fn test_row_with_undefined_variable() {
        let mut p = IlpProgram::default();
        let mut other = IlpProgram::default();
        other.add_binary_variable(0.);
        let v = other.add_binary_variable(0.);
        p.add_binary_variable(0.);
        p.add_row([(v, 1.)], RowBound::AtMost(1.));
    } // kcov-ignore

    #[test]
    fn test_objective_value() {
        let mut p = IlpProgram::default();
        p.add_binary_variable(2.);
        p.add_binary_variable(-1.);
        assert_eq!(1., p.objective_value(&[1., 1.]));
        assert_eq!(2., p.objective_value(&[1., 0.]));
    }
}
