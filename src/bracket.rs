use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::constants::{ROUND_CAPACITY, ROUND_POINTS};
use crate::error::PoolError;

/// Remaining rounds, in the order they are played.
///
/// Each round is named after the stage its winners reach: the quarterfinal games decide
/// the Elite 8, the semifinals the Final 4, and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Round {
    EliteEight,
    FinalFour,
    Championship,
    Champion,
}

impl Round {
    pub const ALL: [Round; 4] = [
        Round::EliteEight,
        Round::FinalFour,
        Round::Championship,
        Round::Champion,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Stage label used in pick sheets
    pub fn label(self) -> &'static str {
        match self {
            Round::EliteEight => "Elite 8",
            Round::FinalFour => "Final 4",
            Round::Championship => "Championship",
            Round::Champion => "Champion",
        }
    }

    /// Points for each correct pick in this round
    pub fn points(self) -> i64 {
        ROUND_POINTS[self.index()]
    }

    /// Most teams that can reach this round
    pub fn capacity(self) -> usize {
        ROUND_CAPACITY[self.index()]
    }
}

impl Display for Round {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Round {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elite 8" | "elite eight" | "quarterfinal" => Ok(Round::EliteEight),
            "final 4" | "final four" | "semifinal" => Ok(Round::FinalFour),
            "championship" | "final" => Ok(Round::Championship),
            "champion" => Ok(Round::Champion),
            _ => Err(PoolError::InvalidConfig(format!("unknown round {s:?}"))),
        }
    }
}

/// Game slots a team occupies in each remaining round if it keeps winning.
#[derive(Clone, Debug, PartialEq)]
pub struct Schedule {
    pub slots: [u32; 4],

    /// Extra value carried through from the schedule sheet; never read by the simulation
    pub aux: Option<f64>,
}

impl Schedule {
    pub fn new(slots: [u32; 4]) -> Self {
        Schedule { slots, aux: None }
    }

    pub fn slot(&self, round: Round) -> u32 {
        self.slots[round.index()]
    }
}

/// Bracket topology for the remaining rounds.
///
/// Teams keep the order they were supplied in; the game slots of each round are the
/// distinct slot numbers the schedules name for that round, ascending.
#[derive(Clone, Debug)]
pub struct Bracket {
    schedules: Vec<(String, Schedule)>,
    slots: [Vec<u32>; 4],
}

impl Bracket {
    pub fn new(schedules: Vec<(String, Schedule)>) -> Result<Self, PoolError> {
        if schedules.is_empty() {
            return Err(PoolError::InvalidTopology("no teams in bracket".to_string()));
        }

        let mut seen = HashSet::new();
        for (team, _) in &schedules {
            if !seen.insert(team.as_str()) {
                return Err(PoolError::InvalidTopology(format!("team {team:?} listed twice")));
            }
        }

        let mut slots: [Vec<u32>; 4] = Default::default();
        for round in Round::ALL {
            let mut round_slots: Vec<u32> =
                schedules.iter().map(|(_, schedule)| schedule.slot(round)).collect();
            round_slots.sort_unstable();
            round_slots.dedup();
            slots[round.index()] = round_slots;
        }

        for (i, earlier) in slots.iter().enumerate() {
            for (j, later) in slots.iter().enumerate().skip(i + 1) {
                if let Some(slot) = earlier.iter().find(|slot| later.contains(slot)) {
                    return Err(PoolError::InvalidTopology(format!(
                        "game {slot} appears in both {} and {}",
                        Round::ALL[i],
                        Round::ALL[j]
                    )));
                }
            }
        }

        // Every team plays in the opening round
        let opening = Round::EliteEight;
        for &slot in &slots[opening.index()] {
            let found = schedules
                .iter()
                .filter(|(_, schedule)| schedule.slot(opening) == slot)
                .count();
            if found != 2 {
                return Err(PoolError::TopologyMismatch {
                    round: opening,
                    slot,
                    found,
                });
            }
        }

        // Each later game is fed by the winners of exactly two earlier games
        for pair in Round::ALL.windows(2) {
            let (previous, round) = (pair[0], pair[1]);
            for &slot in &slots[round.index()] {
                let mut feeders = Vec::new();
                for (_, schedule) in schedules.iter().filter(|(_, s)| s.slot(round) == slot) {
                    if !feeders.contains(&schedule.slot(previous)) {
                        feeders.push(schedule.slot(previous));
                    }
                }
                if feeders.len() != 2 {
                    return Err(PoolError::InvalidTopology(format!(
                        "game {slot} of {round} is fed by {} games of {previous}, expected 2",
                        feeders.len()
                    )));
                }
            }
            for &slot in &slots[previous.index()] {
                let mut next = schedules
                    .iter()
                    .filter(|(_, s)| s.slot(previous) == slot)
                    .map(|(_, s)| s.slot(round));
                if let Some(first) = next.next() {
                    if let Some(other) = next.find(|&s| s != first) {
                        return Err(PoolError::InvalidTopology(format!(
                            "winner of game {slot} of {previous} is sent to both game {first} and game {other} of {round}"
                        )));
                    }
                }
            }
        }

        Ok(Bracket { schedules, slots })
    }

    /// Game slots of a round, ascending
    pub fn slots(&self, round: Round) -> &[u32] {
        &self.slots[round.index()]
    }

    pub fn schedule(&self, team: &str) -> Option<&Schedule> {
        self.schedules
            .iter()
            .find(|(name, _)| name == team)
            .map(|(_, schedule)| schedule)
    }

    pub fn schedules(&self) -> &[(String, Schedule)] {
        &self.schedules
    }

    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.schedules.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, team: &str) -> bool {
        self.schedules.iter().any(|(name, _)| name == team)
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}
