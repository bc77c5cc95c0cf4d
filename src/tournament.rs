use rand::Rng;
use std::collections::HashMap;

use crate::bracket::{Bracket, Round};
use crate::error::PoolError;
use crate::forced::ForcedOutcomes;
use crate::round::simulate_round;
use crate::team::Team;
use crate::win_prob::ProbabilityMode;

/// Tournament state containing the remaining bracket and team ratings.
#[derive(Clone, Debug)]
pub struct TournamentState {
    bracket: Bracket,

    /// Team ratings lookup
    ratings: HashMap<String, Team>,
}

/// Teams that came through each round of one simulated tournament.
#[derive(Clone, Debug, PartialEq)]
pub struct TrialResult<'a> {
    pub rounds: [Vec<&'a str>; 4],
}

impl<'a> TrialResult<'a> {
    pub fn reached(&self, round: Round) -> &[&'a str] {
        &self.rounds[round.index()]
    }

    pub fn champion(&self) -> Option<&'a str> {
        self.reached(Round::Champion).first().copied()
    }
}

impl TournamentState {
    /// Every team in the bracket must have a rating; extra ratings are ignored.
    pub fn new(bracket: Bracket, ratings: HashMap<String, Team>) -> Result<Self, PoolError> {
        if let Some(unrated) = bracket.teams().find(|team| !ratings.contains_key(*team)) {
            return Err(PoolError::MissingRating(unrated.to_string()));
        }
        Ok(TournamentState { bracket, ratings })
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn team(&self, name: &str) -> Result<&Team, PoolError> {
        self.ratings
            .get(name)
            .ok_or_else(|| PoolError::MissingRating(name.to_string()))
    }

    /// Simulate every remaining round once.
    ///
    /// `forced` must already be folded. Each round consumes the previous round's
    /// advancing teams, starting from the whole bracket.
    pub fn run_trial<R: Rng>(
        &self,
        forced: &ForcedOutcomes,
        mode: ProbabilityMode,
        rng: &mut R,
    ) -> Result<TrialResult<'_>, PoolError> {
        let opening: Vec<&str> = self.bracket.teams().collect();
        let mut rounds: [Vec<&str>; 4] = Default::default();

        for round in Round::ALL {
            let alive = match round.index() {
                0 => &opening,
                i => &rounds[i - 1],
            };
            let advancing = simulate_round(round, alive, self, forced.get(round), mode, rng)?;
            rounds[round.index()] = advancing;
        }

        Ok(TrialResult { rounds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sweet_16_bracket, sweet_16_ratings, sweet_16_state, team_name};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_unrated_team_rejected() {
        let mut ratings = sweet_16_ratings();
        ratings.remove("T07");
        match TournamentState::new(sweet_16_bracket(), ratings) {
            Err(PoolError::MissingRating(team)) => assert_eq!(team, "T07"),
            other => panic!("expected missing rating, got {other:?}"),
        }
    }

    #[test]
    fn test_trial_shape() {
        let state = sweet_16_state();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let trial = state
            .run_trial(&ForcedOutcomes::new(), ProbabilityMode::Scaled, &mut rng)
            .unwrap();

        assert_eq!(trial.reached(Round::EliteEight).len(), 8);
        assert_eq!(trial.reached(Round::FinalFour).len(), 4);
        assert_eq!(trial.reached(Round::Championship).len(), 2);
        assert_eq!(trial.reached(Round::Champion).len(), 1);

        // Every later round is drawn from the one before it
        for pair in Round::ALL.windows(2) {
            for team in trial.reached(pair[1]) {
                assert!(trial.reached(pair[0]).contains(team));
            }
        }
    }

    #[test]
    fn test_trial_deterministic() {
        let state = sweet_16_state();
        let forced = ForcedOutcomes::new();
        let mut rng1 = ChaCha8Rng::seed_from_u64(42);
        let mut rng2 = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..20 {
            let trial1 = state.run_trial(&forced, ProbabilityMode::Scaled, &mut rng1).unwrap();
            let trial2 = state.run_trial(&forced, ProbabilityMode::Scaled, &mut rng2).unwrap();
            assert_eq!(trial1, trial2);
        }
    }

    #[test]
    fn test_forced_champion_always_wins() {
        let state = sweet_16_state();
        // The weakest team
        let longshot = team_name(15);
        let forced = ForcedOutcomes::new()
            .with(Round::Champion, &longshot)
            .fold()
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        for _ in 0..500 {
            let trial = state.run_trial(&forced, ProbabilityMode::Scaled, &mut rng).unwrap();
            assert_eq!(trial.reached(Round::Champion), &[longshot.as_str()]);
        }
    }
}
