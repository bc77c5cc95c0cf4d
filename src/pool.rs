use std::collections::{HashMap, HashSet};

use crate::bracket::Round;
use crate::error::PoolError;
use crate::tournament::TrialResult;

/// One participant's predictions: the teams they picked to reach each round.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PickSet {
    picks: HashMap<Round, Vec<String>>,
}

impl PickSet {
    pub fn new() -> Self {
        PickSet::default()
    }

    /// Replace the picks for a round
    pub fn insert(&mut self, round: Round, teams: Vec<String>) {
        self.picks.insert(round, teams);
    }

    /// Add a single pick to a round
    pub fn push(&mut self, round: Round, team: impl Into<String>) {
        self.picks.entry(round).or_default().push(team.into());
    }

    pub fn get(&self, round: Round) -> Option<&[String]> {
        self.picks.get(&round).map(Vec::as_slice)
    }
}

/// Pool entrant with their picks and the points already banked from completed rounds.
#[derive(Clone, Debug, PartialEq)]
pub struct Participant {
    pub name: String,
    pub picks: PickSet,
    pub baseline: i64,
}

/// All participants of a bracket pool, in a fixed order.
#[derive(Clone, Debug)]
pub struct Pool {
    participants: Vec<Participant>,
}

impl Pool {
    pub fn new(participants: Vec<Participant>) -> Result<Self, PoolError> {
        if participants.is_empty() {
            return Err(PoolError::InvalidConfig("pool has no participants".to_string()));
        }
        let mut seen = HashSet::new();
        for participant in &participants {
            if !seen.insert(participant.name.as_str()) {
                return Err(PoolError::InvalidConfig(format!(
                    "participant {:?} listed twice",
                    participant.name
                )));
            }
        }
        Ok(Pool { participants })
    }

    /// Join pick sets with baseline scores. Every participant with picks needs a baseline.
    pub fn from_parts(
        picks: Vec<(String, PickSet)>,
        baselines: &HashMap<String, i64>,
    ) -> Result<Self, PoolError> {
        let participants = picks
            .into_iter()
            .map(|(name, picks)| {
                let baseline = *baselines.get(&name).ok_or_else(|| {
                    PoolError::MissingParticipantData {
                        participant: name.clone(),
                        detail: "no current points".to_string(),
                    }
                })?;
                Ok(Participant {
                    name,
                    picks,
                    baseline,
                })
            })
            .collect::<Result<Vec<_>, PoolError>>()?;
        Pool::new(participants)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.name == name)
    }

    /// Score every participant against one simulated tournament.
    ///
    /// Scores are in pool order.
    pub fn score(&self, trial: &TrialResult) -> Result<Vec<i64>, PoolError> {
        self.participants
            .iter()
            .map(|participant| score_participant(participant, trial))
            .collect()
    }
}

/// Points for one participant: baseline plus round points for each team that reached a
/// round the participant picked it for.
pub fn score_participant(participant: &Participant, trial: &TrialResult) -> Result<i64, PoolError> {
    let mut points = participant.baseline;
    for round in Round::ALL {
        let picks = participant.picks.get(round).ok_or_else(|| {
            PoolError::MissingParticipantData {
                participant: participant.name.clone(),
                detail: format!("no {round} picks"),
            }
        })?;
        let correct = trial
            .reached(round)
            .iter()
            .filter(|team| picks.iter().any(|pick| pick == *team))
            .count() as i64;
        points += correct * round.points();
    }
    Ok(points)
}

/// Index of the participant holding the unique best score, or `None` if it is shared.
pub fn unique_best(scores: &[i64], better: impl Fn(i64, i64) -> bool) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    let mut shared = false;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, best_score)) if !better(score, best_score) => {
                if score == best_score {
                    shared = true;
                }
            }
            _ => {
                best = Some((index, score));
                shared = false;
            }
        }
    }
    match best {
        Some((index, _)) if !shared => Some(index),
        _ => None,
    }
}

/// Index of the unique pool leader
pub fn winner(scores: &[i64]) -> Option<usize> {
    unique_best(scores, |score, best| score > best)
}

/// Index of the unique last place
pub fn loser(scores: &[i64]) -> Option<usize> {
    unique_best(scores, |score, worst| score < worst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pick_set, sample_pool, team_name};
    use proptest::prelude::*;

    /// Chalk result: the lower-numbered team wins every game
    fn chalk_trial(names: &[String; 16]) -> TrialResult<'_> {
        let pick = |indices: &[usize]| indices.iter().map(|&i| names[i].as_str()).collect();
        TrialResult {
            rounds: [
                pick(&[0, 2, 4, 6, 8, 10, 12, 14]),
                pick(&[0, 4, 8, 12]),
                pick(&[0, 8]),
                pick(&[0]),
            ],
        }
    }

    fn all_names() -> [String; 16] {
        std::array::from_fn(team_name)
    }

    #[test]
    fn test_round_weights() {
        let names = all_names();
        let trial = chalk_trial(&names);
        let participant = Participant {
            name: "Stephen".to_string(),
            picks: pick_set(&[0, 2, 4, 6, 8, 10, 12, 14], &[0, 4, 8, 12], &[0, 8], 0),
            baseline: 420,
        };
        // 8*40 + 4*80 + 2*160 + 320
        assert_eq!(score_participant(&participant, &trial).unwrap(), 420 + 320 + 320 + 320 + 320);
    }

    #[test]
    fn test_pool_scores_in_order() {
        let names = all_names();
        let trial = chalk_trial(&names);
        let pool = sample_pool();
        let scores = pool.score(&trial).unwrap();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0], 420 + 1280);
        // Alex picked the odd teams, all of which lost
        assert_eq!(scores[1], 440);
        // Jordan: 0, 4, 8, 12 in the Elite 8; 0 and 8 in the Final 4; 8 in the final
        assert_eq!(scores[2], 400 + 4 * 40 + 2 * 80 + 160);
    }

    #[test]
    fn test_missing_baseline_rejected() {
        let picks = vec![("Sam".to_string(), pick_set(&[0], &[0], &[0], 0))];
        match Pool::from_parts(picks, &HashMap::new()) {
            Err(PoolError::MissingParticipantData { participant, .. }) => assert_eq!(participant, "Sam"),
            other => panic!("expected missing participant data, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_round_picks_rejected() {
        let names = all_names();
        let trial = chalk_trial(&names);
        let mut picks = PickSet::new();
        picks.insert(Round::EliteEight, vec![team_name(0)]);
        let participant = Participant {
            name: "Sam".to_string(),
            picks,
            baseline: 0,
        };
        assert!(matches!(
            score_participant(&participant, &trial),
            Err(PoolError::MissingParticipantData { .. })
        ));
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let participant = Participant {
            name: "Sam".to_string(),
            picks: pick_set(&[0], &[0], &[0], 0),
            baseline: 0,
        };
        assert!(Pool::new(vec![participant.clone(), participant]).is_err());
    }

    #[test]
    fn test_winner_and_loser() {
        assert_eq!(winner(&[10, 30, 20]), Some(1));
        assert_eq!(loser(&[10, 30, 20]), Some(0));
        assert_eq!(winner(&[30, 10, 30]), None);
        assert_eq!(loser(&[10, 30, 10]), None);
        // A later, higher score clears an earlier tie
        assert_eq!(winner(&[10, 10, 20]), Some(2));
        // Ties below the maximum do not matter
        assert_eq!(winner(&[20, 10, 10]), Some(0));
        assert_eq!(winner(&[0, 0]), None);
        assert_eq!(winner(&[5]), Some(0));
        assert_eq!(loser(&[5]), Some(0));
    }

    proptest! {
        #[test]
        fn extra_correct_pick_adds_round_points(round_index in 0usize..4, baseline in 0i64..2000) {
            let names = all_names();
            let trial = chalk_trial(&names);
            let round = Round::ALL[round_index];

            // Picks that all missed
            let mut picks = pick_set(&[1, 3], &[1], &[1], 1);
            let before = Participant { name: "P".to_string(), picks: picks.clone(), baseline };
            picks.push(round, trial.reached(round)[0]);
            let after = Participant { name: "P".to_string(), picks, baseline };

            let gain = score_participant(&after, &trial).unwrap() - score_participant(&before, &trial).unwrap();
            prop_assert_eq!(gain, round.points());
        }

        #[test]
        fn unique_winner_holds_strict_max(scores in prop::collection::vec(0i64..50, 1..8)) {
            let max = *scores.iter().max().unwrap();
            let holders = scores.iter().filter(|&&s| s == max).count();
            match winner(&scores) {
                Some(index) => {
                    prop_assert_eq!(scores[index], max);
                    prop_assert_eq!(holders, 1);
                }
                None => prop_assert!(holders > 1),
            }
        }
    }
}
