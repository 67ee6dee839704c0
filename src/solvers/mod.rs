//! Solvers computing labellings of bracket matches.

mod assignment_extractor;
pub use assignment_extractor::extract_labelling;
pub use assignment_extractor::Labelling;
pub use assignment_extractor::MatchLabel;
pub use assignment_extractor::INTEGRALITY_TOLERANCE;

mod replay_labeller;
pub use replay_labeller::ReplayLabeller;
