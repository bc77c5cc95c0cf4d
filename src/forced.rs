use serde::{Deserialize, Serialize};

use crate::bracket::{Bracket, Round};
use crate::error::PoolError;

/// Teams guaranteed to reach a round in every trial.
///
/// Lists are kept in the order teams were added. After [`ForcedOutcomes::fold`] every
/// forced champion is also a forced finalist, every finalist a semifinalist, and every
/// semifinalist a member of the Elite 8.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForcedOutcomes {
    pub elite_8: Vec<String>,
    pub final_4: Vec<String>,
    pub championship: Vec<String>,
    pub champion: Vec<String>,
}

impl ForcedOutcomes {
    pub fn new() -> Self {
        ForcedOutcomes::default()
    }

    /// Force `team` into `round`; adding it twice has no effect.
    pub fn force(&mut self, round: Round, team: &str) {
        let teams = self.get_mut(round);
        if !teams.iter().any(|t| t == team) {
            teams.push(team.to_string());
        }
    }

    /// Builder form of [`ForcedOutcomes::force`]
    pub fn with(mut self, round: Round, team: &str) -> Self {
        self.force(round, team);
        self
    }

    pub fn get(&self, round: Round) -> &[String] {
        match round {
            Round::EliteEight => &self.elite_8,
            Round::FinalFour => &self.final_4,
            Round::Championship => &self.championship,
            Round::Champion => &self.champion,
        }
    }

    fn get_mut(&mut self, round: Round) -> &mut Vec<String> {
        match round {
            Round::EliteEight => &mut self.elite_8,
            Round::FinalFour => &mut self.final_4,
            Round::Championship => &mut self.championship,
            Round::Champion => &mut self.champion,
        }
    }

    /// Check if `team` is forced into `round`.
    pub fn forces(&self, round: Round, team: &str) -> bool {
        self.get(round).iter().any(|t| t == team)
    }

    pub fn is_empty(&self) -> bool {
        Round::ALL.iter().all(|&round| self.get(round).is_empty())
    }

    /// Fold every round's teams into all earlier rounds and dedupe.
    ///
    /// Fails if a round then holds more teams than can reach it. Folding an already
    /// folded set returns it unchanged.
    pub fn fold(&self) -> Result<Self, PoolError> {
        let mut folded = ForcedOutcomes::new();
        for round in Round::ALL.iter().rev() {
            for team in self.get(*round) {
                for enclosing in Round::ALL.iter().take(round.index() + 1) {
                    folded.force(*enclosing, team);
                }
            }
        }

        // `force` appends, so restore each round's own ordering before folded-in teams
        for round in Round::ALL {
            let own = dedup(self.get(round));
            let inherited = folded
                .get(round)
                .iter()
                .filter(|team| !own.contains(team))
                .cloned()
                .collect::<Vec<_>>();
            *folded.get_mut(round) = own.into_iter().chain(inherited).collect();
        }

        for round in Round::ALL {
            let forced = folded.get(round).len();
            if forced > round.capacity() {
                return Err(PoolError::ConstraintViolation(format!(
                    "{forced} teams forced into {round}, at most {} can reach it",
                    round.capacity()
                )));
            }
        }
        Ok(folded)
    }

    /// Check that the forced teams exist and never meet each other in a round they are
    /// all forced through.
    pub fn check_against(&self, bracket: &Bracket) -> Result<(), PoolError> {
        for round in Round::ALL {
            let teams = self.get(round);
            let mut slots = Vec::with_capacity(teams.len());
            for team in teams {
                let schedule = bracket.schedule(team).ok_or_else(|| {
                    PoolError::ConstraintViolation(format!(
                        "team {team:?} forced into {round} is not in the bracket"
                    ))
                })?;
                let slot = schedule.slot(round);
                if let Some((other, _)) = slots.iter().find(|(_, s)| *s == slot) {
                    return Err(PoolError::ConstraintViolation(format!(
                        "{other:?} and {team:?} are both forced through game {slot} of {round}"
                    )));
                }
                slots.push((team.as_str(), slot));
            }
        }
        Ok(())
    }
}

fn dedup(teams: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(teams.len());
    for team in teams {
        if !unique.contains(team) {
            unique.push(team.clone());
        }
    }
    unique
}
