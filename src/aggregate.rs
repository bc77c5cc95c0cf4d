use crate::bracket::Round;
use crate::pool::{loser, winner, Pool};
use crate::tournament::TrialResult;

/// How often each team reached each round in trials won by one participant.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundOccupancy {
    /// Pool index of the participant whose wins are examined
    pub participant: usize,

    /// Per bracket team, in bracket order: trials in which it reached each round
    pub counts: Vec<[u64; 4]>,
}

impl RoundOccupancy {
    pub fn new(participant: usize, teams: usize) -> Self {
        RoundOccupancy {
            participant,
            counts: vec![[0; 4]; teams],
        }
    }

    fn record<'a>(&mut self, teams: impl Iterator<Item = &'a str>, trial: &TrialResult) {
        for (counts, team) in self.counts.iter_mut().zip(teams) {
            for round in Round::ALL {
                if trial.reached(round).contains(&team) {
                    counts[round.index()] += 1;
                }
            }
        }
    }

    fn merge(&mut self, other: &RoundOccupancy) {
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += *b;
            }
        }
    }

    /// Counts as fractions of `wins`, rounded to 3 places; all zero when `wins` is zero.
    pub fn fractions(&self, wins: u64) -> Vec<[f64; 4]> {
        self.counts
            .iter()
            .map(|counts| counts.map(|count| ratio(count, wins)))
            .collect()
    }
}

/// One recorded trial, kept for display.
#[derive(Clone, Debug, PartialEq)]
pub struct TrialRecord {
    pub winner: String,
    pub rounds: [Vec<String>; 4],
    pub scores: Vec<(String, i64)>,
}

/// Running tallies over a batch of trials.
///
/// Win and loss counts are indexed by pool position, with one extra trailing bucket for
/// ties. Tallies from independent batches combine with [`Tally::merge`].
#[derive(Clone, Debug, PartialEq)]
pub struct Tally {
    pub trials: u64,
    pub wins: Vec<u64>,
    pub losses: Vec<u64>,
    pub occupancy: Option<RoundOccupancy>,
    pub examples: Vec<TrialRecord>,
    max_examples: usize,
    watched: Option<usize>,
}

impl Tally {
    /// # Arguments
    /// * `participants` - Pool size
    /// * `teams` - Bracket size
    /// * `watched` - Pool index of the participant whose wins are examined
    /// * `occupancy` - Whether to count round occupancy in the watched participant's wins
    /// * `max_examples` - How many of the watched participant's wins to keep
    pub fn new(
        participants: usize,
        teams: usize,
        watched: Option<usize>,
        occupancy: bool,
        max_examples: usize,
    ) -> Self {
        Tally {
            trials: 0,
            wins: vec![0; participants + 1],
            losses: vec![0; participants + 1],
            occupancy: match (watched, occupancy) {
                (Some(participant), true) => Some(RoundOccupancy::new(participant, teams)),
                _ => None,
            },
            examples: Vec::new(),
            max_examples,
            watched,
        }
    }

    fn tie_index(&self) -> usize {
        self.wins.len() - 1
    }

    /// Count one scored trial.
    ///
    /// `teams` yields the bracket's teams in bracket order; `scores` are in pool order.
    pub fn record<'a>(
        &mut self,
        pool: &Pool,
        teams: impl Iterator<Item = &'a str>,
        trial: &TrialResult,
        scores: &[i64],
    ) {
        let tie = self.tie_index();
        let first = winner(scores);
        let last = loser(scores);
        self.trials += 1;
        self.wins[first.unwrap_or(tie)] += 1;
        self.losses[last.unwrap_or(tie)] += 1;

        let Some(index) = first.filter(|&index| Some(index) == self.watched) else {
            return;
        };
        if let Some(occupancy) = &mut self.occupancy {
            occupancy.record(teams, trial);
        }
        if self.examples.len() < self.max_examples {
            let participants = pool.participants();
            self.examples.push(TrialRecord {
                winner: participants[index].name.clone(),
                rounds: trial
                    .rounds
                    .clone()
                    .map(|teams| teams.into_iter().map(str::to_string).collect()),
                scores: participants
                    .iter()
                    .zip(scores)
                    .map(|(participant, &score)| (participant.name.clone(), score))
                    .collect(),
            });
        }
    }

    /// Combine with a tally from a later batch.
    pub fn merge(mut self, other: Tally) -> Tally {
        self.trials += other.trials;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += *b;
        }
        for (a, b) in self.losses.iter_mut().zip(&other.losses) {
            *a += *b;
        }
        if let (Some(mine), Some(theirs)) = (&mut self.occupancy, &other.occupancy) {
            mine.merge(theirs);
        }
        let room = self.max_examples.saturating_sub(self.examples.len());
        self.examples.extend(other.examples.into_iter().take(room));
        self
    }

    pub fn tie_wins(&self) -> u64 {
        self.wins[self.tie_index()]
    }

    pub fn tie_losses(&self) -> u64 {
        self.losses[self.tie_index()]
    }
}

/// `count / total` rounded to 3 decimal places; zero when `total` is zero.
pub fn ratio(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 1000.0
}
