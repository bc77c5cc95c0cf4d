use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{EVEN_THRESHOLD, LIKELIHOOD_SCALE, RATING_SCALE};
use crate::error::PoolError;
use crate::team::Team;

/// How individual games are decided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityMode {
    /// Logistic model of the rating difference
    #[default]
    Scaled,

    /// Every game is a coin flip
    Even,
}

impl Display for ProbabilityMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbabilityMode::Scaled => f.write_str("scaled"),
            ProbabilityMode::Even => f.write_str("even"),
        }
    }
}

impl FromStr for ProbabilityMode {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scaled" => Ok(ProbabilityMode::Scaled),
            "even" => Ok(ProbabilityMode::Even),
            _ => Err(PoolError::InvalidConfig(format!("unsupported probability mode {s}"))),
        }
    }
}

/// Likelihood, out of `LIKELIHOOD_SCALE`, of a team rated `rating` beating one rated
/// `opponent`. Truncated towards zero.
pub fn likelihood_from_ratings(rating: f64, opponent: f64) -> u32 {
    let scale = LIKELIHOOD_SCALE as f64;
    let prob = scale / (1.0 + 10f64.powf(-(rating - opponent) * RATING_SCALE));
    prob as u32
}

/// Calculate each team's win likelihood for a matchup.
///
/// Returns `(team1_likelihood, team2_likelihood)`, each in `[0, 10000]`. Both sides are
/// truncated independently, so the pair sums to 10000 or 9999.
pub fn calculate_win_likelihood(team1: &Team, team2: &Team) -> (u32, u32) {
    (
        likelihood_from_ratings(team1.rating, team2.rating),
        likelihood_from_ratings(team2.rating, team1.rating),
    )
}

/// Play one game and return `true` if `team1` advances.
///
/// A single draw in `[1, 10000]` is compared against the favourite's likelihood (or the
/// even threshold); below it the favourite advances. With equal likelihoods `team2`
/// counts as the favourite.
pub fn play_game<R: Rng>(team1: &Team, team2: &Team, mode: ProbabilityMode, rng: &mut R) -> bool {
    let (likelihood1, likelihood2) = calculate_win_likelihood(team1, team2);
    let team1_favoured = likelihood1 > likelihood2;
    let threshold = match mode {
        ProbabilityMode::Scaled => likelihood1.max(likelihood2),
        ProbabilityMode::Even => EVEN_THRESHOLD,
    };

    let draw = rng.gen_range(1..=LIKELIHOOD_SCALE);
    let favourite_wins = draw < threshold;
    favourite_wins == team1_favoured
}
