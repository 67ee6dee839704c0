use crate::LabellingError;
use std::{collections::HashMap, f64::consts::PI, time::Duration};

/// A normal distribution of the delay (in seconds) between a bracket timestamp and a replay timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapDistribution {
    mean: f64,
    sd: f64,
}

impl GapDistribution {
    /// Builds a new distribution given its mean and its standard deviation.
    pub fn new(mean: f64, sd: f64) -> Self {
        Self { mean, sd }
    }

    /// Returns the mean of the distribution.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the standard deviation of the distribution.
    pub fn sd(&self) -> f64 {
        self.sd
    }

    /// Returns the natural logarithm of the density of the distribution at `x`.
    pub fn log_density(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.sd;
        -0.5 * z * z - self.sd.ln() - 0.5 * (2. * PI).ln()
    }

    /// Returns `true` iff `x` is at most `width` standard deviations away from the mean.
    pub fn is_plausible(&self, x: f64, width: f64) -> bool {
        (x - self.mean).abs() <= width * self.sd
    }

    fn check(&self, name: &str) -> Result<(), LabellingError> {
        if !self.mean.is_finite() || !self.sd.is_finite() {
            return Err(LabellingError::Configuration(format!(
                "the parameters of the {} distribution must be finite",
                name
            )));
        }
        if self.sd <= 0. {
            return Err(LabellingError::Configuration(format!(
                "the standard deviation of the {} distribution must be positive (got {})",
                name, self.sd
            )));
        }
        Ok(())
    }
}

/// The parameters of a labelling.
///
/// The default values are the ones observed on past tournaments:
/// games begin one minute after the bracket announces the match,
/// results are reported thirty seconds after the last game,
/// and both delays have a standard deviation of three minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct LabellingConfig {
    /// the distribution of the delay between the match start and the first game start
    pub pregame_gap: GapDistribution,
    /// the distribution of the delay between the last game end and the match report
    pub postgame_gap: GapDistribution,
    /// the probability a player picks one of their mains
    pub main_probability: f64,
    /// the probability a player picks one of their secondaries
    pub secondary_probability: f64,
    /// the objective value of leaving a match without replays
    pub no_label_score: f64,
    /// the number of standard deviations around the gap means outside of which candidates are pruned
    pub pruning_width: f64,
    /// whether candidates scoring below [`no_label_score`](Self::no_label_score) are pruned
    pub prune_dominated: bool,
    /// offsets (in seconds) subtracted from the timestamps of the replays of some setups
    pub setup_clock_offsets: HashMap<String, f64>,
    /// the time the ILP solver is allowed to run, if bounded
    pub time_budget: Option<Duration>,
}

impl Default for LabellingConfig {
    fn default() -> Self {
        Self {
            pregame_gap: GapDistribution::new(60., 180.),
            postgame_gap: GapDistribution::new(30., 180.),
            main_probability: 0.8,
            secondary_probability: 0.1,
            no_label_score: -25.,
            pruning_width: 3.,
            prune_dominated: false,
            setup_clock_offsets: HashMap::new(),
            time_budget: None,
        }
    }
}

impl LabellingConfig {
    /// Checks the consistency of the parameters.
    pub fn check(&self) -> Result<(), LabellingError> {
        self.pregame_gap.check("pregame gap")?;
        self.postgame_gap.check("postgame gap")?;
        let check_probability = |name: &str, p: f64| {
            if (0. ..=1.).contains(&p) {
                Ok(())
            } else {
                Err(LabellingError::Configuration(format!(
                    "the {} probability must be in [0,1] (got {})",
                    name, p
                )))
            }
        };
        check_probability("main character", self.main_probability)?;
        check_probability("secondary character", self.secondary_probability)?;
        if self.main_probability + self.secondary_probability > 1. {
            return Err(LabellingError::Configuration(
                "the main and secondary character probabilities must not sum above 1".to_string(),
            ));
        }
        if !self.no_label_score.is_finite() {
            return Err(LabellingError::Configuration(
                "the no-label score must be finite".to_string(),
            ));
        }
        if !self.pruning_width.is_finite() || self.pruning_width <= 0. {
            return Err(LabellingError::Configuration(format!(
                "the pruning width must be positive (got {})",
                self.pruning_width
            )));
        }
        if let Some((setup, _)) = self
            .setup_clock_offsets
            .iter()
            .find(|(_, o)| !o.is_finite())
        {
            return Err(LabellingError::Configuration(format!(
                r#"the clock offset of setup "{}" must be finite"#,
                setup
            )));
        }
        if self.time_budget == Some(Duration::ZERO) {
            return Err(LabellingError::Configuration(
                "the time budget must not be zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the clock offset of a setup, in seconds.
    pub fn clock_offset(&self, setup: &str) -> f64 {
        self.setup_clock_offsets.get(setup).copied().unwrap_or(0.)
    }
}
