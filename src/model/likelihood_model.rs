use super::LabellingConfig;
use crate::bracket::{seconds_between, CharacterProfile, Match, Replay};
use strum_macros::{AsRefStr, EnumIter};

/// The reasons for which a sequence of replays cannot be the one of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum InfeasibilityReason {
    /// the number of replays differs from the number of games
    LengthMismatch,
    /// the replays were not recorded on a single setup
    MixedSetups,
    /// a replay has not exactly two occupied ports
    PlayerCount,
    /// the occupied ports change across the replays
    InconsistentPorts,
    /// the replays are not in strictly ascending start time order
    NotChronological,
    /// the game winners contradict the scores reported by the bracket
    ScoreMismatch,
    /// the score cannot be represented by a finite number
    NonFiniteScore,
}

/// The terms of the log-likelihood of a sequence of replays for a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTerms {
    /// seconds between the match start and the first replay start
    pub pregame_gap: f64,
    /// seconds between the last replay end and the match report
    pub postgame_gap: f64,
    /// log-density of the pregame gap
    pub pregame: f64,
    /// log-density of the postgame gap
    pub postgame: f64,
    /// log-probability of the characters selections
    pub characters: f64,
}

impl ScoreTerms {
    /// Returns the log-likelihood, that is the sum of the terms.
    pub fn total(&self) -> f64 {
        self.pregame + self.postgame + self.characters
    }
}

/// The result of scoring a sequence of replays against a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Likelihood {
    /// The replays may be the ones of the match, with the given score.
    Feasible(ScoreTerms),
    /// The replays cannot be the ones of the match.
    Infeasible(InfeasibilityReason),
}

impl Likelihood {
    /// Returns the log-likelihood if the sequence is feasible.
    pub fn log_likelihood(&self) -> Option<f64> {
        match self {
            Likelihood::Feasible(terms) => Some(terms.total()),
            Likelihood::Infeasible(_) => None,
        }
    }
}

/// Scores sequences of replays against matches.
///
/// The log-likelihood is the sum of three independent terms:
/// the log-density of the delay between the match announcement and the first game,
/// the log-density of the delay between the last game and the match report,
/// and the log-probability of the characters picked by players whose profiles are known.
///
/// # Example
///
/// ```
/// # use replabel::bracket::{Match, Replay};
/// # use replabel::model::{LabellingConfig, LikelihoodModel};
/// fn best_log_likelihood(m: &Match, windows: &[Vec<Replay>]) -> Option<f64> {
///     let config = LabellingConfig::default();
///     let model = LikelihoodModel::new(&config);
///     windows
///         .iter()
///         .filter_map(|w| model.score(m, w).log_likelihood())
///         .reduce(f64::max)
/// }
/// ```
pub struct LikelihoodModel<'a> {
    config: &'a LabellingConfig,
}

impl<'a> LikelihoodModel<'a> {
    /// Builds a new model using the distributions and the probabilities of the configuration.
    pub fn new(config: &'a LabellingConfig) -> Self {
        Self { config }
    }

    /// Scores a sequence of replays against a match.
    pub fn score(&self, m: &Match, replays: &[Replay]) -> Likelihood {
        match self.try_score(m, replays) {
            Ok(terms) if terms.total().is_finite() => Likelihood::Feasible(terms),
            Ok(_) => Likelihood::Infeasible(InfeasibilityReason::NonFiniteScore),
            Err(reason) => Likelihood::Infeasible(reason),
        }
    }

    fn try_score(&self, m: &Match, replays: &[Replay]) -> Result<ScoreTerms, InfeasibilityReason> {
        if replays.len() != m.n_games() {
            return Err(InfeasibilityReason::LengthMismatch);
        }
        let setup = replays[0].setup();
        if replays.iter().any(|r| r.setup() != setup) {
            return Err(InfeasibilityReason::MixedSetups);
        }
        if replays
            .windows(2)
            .any(|w| w[0].started_at() >= w[1].started_at())
        {
            return Err(InfeasibilityReason::NotChronological);
        }
        let ports = check_ports(replays)?;
        let orientations = orientations(m, replays, ports)?;
        let offset = self.config.clock_offset(setup);
        let pregame_gap = seconds_between(m.started_at(), replays[0].started_at()) - offset;
        let postgame_gap =
            seconds_between(replays[replays.len() - 1].ended_at(), m.reported_at()) + offset;
        let characters = orientations
            .iter()
            .map(|player_ports| self.characters_log_probability(m, replays, player_ports))
            .fold(f64::NEG_INFINITY, f64::max);
        Ok(ScoreTerms {
            pregame_gap,
            postgame_gap,
            pregame: self.config.pregame_gap.log_density(pregame_gap),
            postgame: self.config.postgame_gap.log_density(postgame_gap),
            characters,
        })
    }

    fn characters_log_probability(
        &self,
        m: &Match,
        replays: &[Replay],
        player_ports: &[u8; 2],
    ) -> f64 {
        (0..2)
            .filter_map(|player| m.profile(player).map(|profile| (player, profile)))
            .map(|(player, profile)| {
                replays
                    .iter()
                    .filter_map(|r| r.port(player_ports[player]))
                    .map(|p| self.character_log_probability(profile, p.character()))
                    .sum::<f64>()
            })
            .sum()
    }

    fn character_log_probability(&self, profile: &CharacterProfile, character: &str) -> f64 {
        let p = if profile.is_main(character) {
            self.config.main_probability
        } else if profile.is_secondary(character) {
            self.config.secondary_probability
        } else {
            1. - self.config.main_probability - self.config.secondary_probability
        };
        p.ln()
    }
}

// returns the two occupied ports, which must be the same for each replay
fn check_ports(replays: &[Replay]) -> Result<(u8, u8), InfeasibilityReason> {
    let port_pair = |r: &Replay| match r.ports() {
        [a, b] => Ok((a.port(), b.port())),
        _ => Err(InfeasibilityReason::PlayerCount),
    };
    let ports = port_pair(&replays[0])?;
    for r in replays.iter().skip(1) {
        if port_pair(r)? != ports {
            return Err(InfeasibilityReason::InconsistentPorts);
        }
    }
    Ok(ports)
}

// returns the possible assignments of the match players to the ports
fn orientations(
    m: &Match,
    replays: &[Replay],
    (a, b): (u8, u8),
) -> Result<Vec<[u8; 2]>, InfeasibilityReason> {
    let both = || vec![[a, b], [b, a]];
    let scores = match m.scores() {
        Some(s) => s,
        None => return Ok(both()),
    };
    let mut a_wins = 0;
    let mut b_wins = 0;
    for r in replays {
        match (r.ports()[0].won(), r.ports()[1].won()) {
            (Some(a_won), Some(b_won)) => {
                a_wins += usize::from(a_won);
                b_wins += usize::from(b_won);
            }
            _ => return Ok(both()),
        }
    }
    if scores.0 == scores.1 {
        // a tie does not tell which player sat on which port
        return if (a_wins, b_wins) == scores {
            Ok(both())
        } else {
            Err(InfeasibilityReason::ScoreMismatch)
        };
    }
    let mut result = Vec::with_capacity(1);
    if (a_wins, b_wins) == scores {
        result.push([a, b]);
    }
    if (b_wins, a_wins) == scores {
        result.push([b, a]);
    }
    if result.is_empty() {
        return Err(InfeasibilityReason::ScoreMismatch);
    }
    let last = &replays[replays.len() - 1];
    let last_won = |port_index: usize| last.ports()[port_index].won() == Some(true);
    if (a_wins > b_wins && !last_won(0)) || (b_wins > a_wins && !last_won(1)) {
        return Err(InfeasibilityReason::ScoreMismatch);
    }
    Ok(result)
}
