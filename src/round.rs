use rand::Rng;

use crate::bracket::Round;
use crate::error::PoolError;
use crate::tournament::TournamentState;
use crate::win_prob::{play_game, ProbabilityMode};

/// Play every game of `round` between the teams in `alive`.
///
/// Games are taken in slot order; each slot must hold exactly two alive teams. A team in
/// `forced` advances without a draw.
///
/// # Arguments
/// * `round` - Round being played
/// * `alive` - Teams entering the round
/// * `state` - Ratings and topology
/// * `forced` - Teams guaranteed to come through this round
/// * `mode` - How games without a forced team are decided
/// * `rng` - Random source
///
/// # Returns
/// One advancing team per game slot, in slot order
pub fn simulate_round<'a, R: Rng>(
    round: Round,
    alive: &[&str],
    state: &'a TournamentState,
    forced: &[String],
    mode: ProbabilityMode,
    rng: &mut R,
) -> Result<Vec<&'a str>, PoolError> {
    let bracket = state.bracket();
    let slots = bracket.slots(round);
    let mut advancing = Vec::with_capacity(slots.len());

    for &slot in slots {
        let game: Vec<&'a str> = bracket
            .schedules()
            .iter()
            .filter(|(name, schedule)| schedule.slot(round) == slot && alive.contains(&name.as_str()))
            .map(|(name, _)| name.as_str())
            .collect();

        let (team1, team2) = match game.as_slice() {
            &[team1, team2] => (team1, team2),
            _ => {
                return Err(PoolError::TopologyMismatch {
                    round,
                    slot,
                    found: game.len(),
                })
            }
        };

        let is_forced = |team: &str| forced.iter().any(|t| t == team);
        let winner = match (is_forced(team1), is_forced(team2)) {
            (true, true) => {
                return Err(PoolError::ConstraintViolation(format!(
                    "{team1:?} and {team2:?} are both forced through game {slot} of {round}"
                )))
            }
            (true, false) => team1,
            (false, true) => team2,
            (false, false) => {
                if play_game(state.team(team1)?, state.team(team2)?, mode, rng) {
                    team1
                } else {
                    team2
                }
            }
        };
        advancing.push(winner);
    }

    Ok(advancing)
}
