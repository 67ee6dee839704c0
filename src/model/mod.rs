//! The probabilistic model used to score the replays of a setup against a match.

mod config;
pub use config::GapDistribution;
pub use config::LabellingConfig;

mod likelihood_model;
pub use likelihood_model::InfeasibilityReason;
pub use likelihood_model::Likelihood;
pub use likelihood_model::LikelihoodModel;
pub use likelihood_model::ScoreTerms;
