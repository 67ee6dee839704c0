use thiserror::Error;

/// The errors raised while computing a labelling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LabellingError {
    /// A record of an input collection is missing fields or has invalid ones.
    ///
    /// Readers report these errors as warnings and skip the record.
    #[error("malformed record at line {line}: {reason}")]
    MalformedInput {
        /// the line of the record in the input
        line: usize,
        /// what is wrong with the record
        reason: String,
    },

    /// A whole input collection is empty.
    #[error("the {0} collection is empty")]
    EmptyInput(&'static str),

    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The ILP solver failed, or returned a solution that does not respect the model.
    #[error("solver error: {0}")]
    Solver(String),

    /// The ILP solver did not end before the time budget expired.
    #[error("the solver did not end within its time budget of {0:?}")]
    SolverTimeout(std::time::Duration),
}
