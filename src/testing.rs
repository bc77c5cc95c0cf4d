//! Shared fixtures for unit tests.

use std::collections::HashMap;

use crate::bracket::{Bracket, Round, Schedule};
use crate::pool::{PickSet, Pool};
use crate::team::Team;
use crate::tournament::TournamentState;

pub fn team_name(index: usize) -> String {
    format!("T{index:02}")
}

/// Standard 16-team layout: games 1-8, then 9-12, 13-14 and 15.
pub fn sweet_16_bracket() -> Bracket {
    let schedules = (0..16)
        .map(|i| {
            let slots = [i as u32 / 2 + 1, i as u32 / 4 + 9, i as u32 / 8 + 13, 15];
            (team_name(i), Schedule::new(slots))
        })
        .collect();
    Bracket::new(schedules).unwrap()
}

/// Ratings fall off by 1.5 points per team, so `T00` is the strongest.
pub fn sweet_16_ratings() -> HashMap<String, Team> {
    (0..16)
        .map(|i| {
            let name = team_name(i);
            (name.clone(), Team::new(name, 96.0 - 1.5 * i as f64))
        })
        .collect()
}

pub fn sweet_16_state() -> TournamentState {
    TournamentState::new(sweet_16_bracket(), sweet_16_ratings()).unwrap()
}

pub fn pick_set(elite_8: &[usize], final_4: &[usize], championship: &[usize], champion: usize) -> PickSet {
    let names = |indices: &[usize]| indices.iter().map(|&i| team_name(i)).collect::<Vec<_>>();
    let mut picks = PickSet::new();
    picks.insert(Round::EliteEight, names(elite_8));
    picks.insert(Round::FinalFour, names(final_4));
    picks.insert(Round::Championship, names(championship));
    picks.insert(Round::Champion, names(&[champion]));
    picks
}

/// Three participants: a chalk picker, a contrarian, and one in between.
pub fn sample_pool() -> Pool {
    let picks = vec![
        (
            "Stephen".to_string(),
            pick_set(&[0, 2, 4, 6, 8, 10, 12, 14], &[0, 4, 8, 12], &[0, 8], 0),
        ),
        (
            "Alex".to_string(),
            pick_set(&[1, 3, 5, 7, 9, 11, 13, 15], &[1, 5, 9, 13], &[5, 13], 13),
        ),
        (
            "Jordan".to_string(),
            pick_set(&[0, 3, 4, 7, 8, 11, 12, 15], &[0, 7, 8, 15], &[7, 8], 8),
        ),
    ];
    let baselines = HashMap::from([
        ("Stephen".to_string(), 420),
        ("Alex".to_string(), 440),
        ("Jordan".to_string(), 400),
    ]);
    Pool::from_parts(picks, &baselines).unwrap()
}
