//! The enumeration of the replay windows that may be the replays of a match.

mod candidate;
pub use candidate::Candidate;
pub use candidate::CandidateSet;

mod candidate_generator;
pub use candidate_generator::CandidateGenerator;
pub use candidate_generator::GenerationStats;

#[cfg(test)]
pub(crate) use candidate::tests::scored;
