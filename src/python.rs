use std::collections::HashMap;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::bracket::{Bracket, Round, Schedule};
use crate::config::RunConfig;
use crate::error::PoolError;
use crate::forced::ForcedOutcomes;
use crate::pool::{PickSet, Pool};
use crate::simulation;
use crate::team::Team;
use crate::tournament::TournamentState;
use crate::win_prob;

impl From<PoolError> for PyErr {
    fn from(err: PoolError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

type Counts = HashMap<String, u64>;
type Pcts = HashMap<String, f64>;
type Occupancy = HashMap<String, Vec<f64>>;

fn forced_from_lists(
    elite_8: Vec<String>,
    final_4: Vec<String>,
    championship: Vec<String>,
    champion: Vec<String>,
) -> ForcedOutcomes {
    ForcedOutcomes {
        elite_8,
        final_4,
        championship,
        champion,
    }
}

#[pymethods]
impl Team {
    #[new]
    fn py_new(name: String, rating: f64) -> Self {
        Team::new(name, rating)
    }

    /// Create a copy of this team
    fn copy(&self) -> Self {
        self.clone()
    }

    fn __repr__(&self) -> String {
        format!("Team({:?}, {})", self.name, self.rating)
    }
}

/// Win likelihoods (out of 10000) for a matchup.
#[pyfunction]
fn calculate_win_likelihood(team1: &Team, team2: &Team) -> (u32, u32) {
    win_prob::calculate_win_likelihood(team1, team2)
}

/// Fold forced outcomes into earlier rounds.
///
/// Returns the folded `(elite_8, final_4, championship, champion)` lists.
#[pyfunction]
#[pyo3(signature = (elite_8 = vec![], final_4 = vec![], championship = vec![], champion = vec![]))]
fn fold_forced_outcomes(
    elite_8: Vec<String>,
    final_4: Vec<String>,
    championship: Vec<String>,
    champion: Vec<String>,
) -> PyResult<(Vec<String>, Vec<String>, Vec<String>, Vec<String>)> {
    let folded = forced_from_lists(elite_8, final_4, championship, champion).fold()?;
    Ok((
        folded.elite_8,
        folded.final_4,
        folded.championship,
        folded.champion,
    ))
}

/// Run a simulation.
///
/// `schedules` maps each team to its four remaining game numbers, `picks` lists each
/// participant with their picks keyed by stage name. Returns win counts, loss counts,
/// win percentages and loss percentages keyed by participant (plus `"tie"`), and the
/// round occupancy of the checked participant when `advanced` is set.
#[pyfunction]
#[pyo3(signature = (
    schedules,
    ratings,
    picks,
    points,
    iterations = 10_000,
    probability = "scaled",
    win_check = None,
    examples = false,
    advanced = false,
    seed = None,
    elite_8 = vec![],
    final_4 = vec![],
    championship = vec![],
    champion = vec![],
))]
#[allow(clippy::too_many_arguments)]
fn count_outcomes(
    py: Python<'_>,
    schedules: Vec<(String, Vec<u32>)>,
    ratings: HashMap<String, f64>,
    picks: Vec<(String, HashMap<String, Vec<String>>)>,
    points: HashMap<String, i64>,
    iterations: u64,
    probability: &str,
    win_check: Option<String>,
    examples: bool,
    advanced: bool,
    seed: Option<u64>,
    elite_8: Vec<String>,
    final_4: Vec<String>,
    championship: Vec<String>,
    champion: Vec<String>,
) -> PyResult<(Counts, Counts, Pcts, Pcts, Option<Occupancy>)> {
    let schedules = schedules
        .into_iter()
        .map(|(team, games)| {
            let slots: [u32; 4] = games.try_into().map_err(|games: Vec<u32>| {
                PyValueError::new_err(format!("{team}: expected 4 games, got {}", games.len()))
            })?;
            Ok((team, Schedule::new(slots)))
        })
        .collect::<PyResult<Vec<_>>>()?;
    let ratings = ratings
        .into_iter()
        .map(|(name, rating)| (name.clone(), Team::new(name, rating)))
        .collect();
    let state = TournamentState::new(Bracket::new(schedules)?, ratings)?;

    let picks = picks
        .into_iter()
        .map(|(name, by_stage)| {
            let mut pick_set = PickSet::new();
            for (stage, teams) in by_stage {
                let round: Round = stage.parse()?;
                pick_set.insert(round, teams);
            }
            Ok((name, pick_set))
        })
        .collect::<Result<Vec<_>, PoolError>>()?;
    let pool = Pool::from_parts(picks, &points)?;

    let config = RunConfig {
        iterations,
        mode: probability.parse()?,
        forced: forced_from_lists(elite_8, final_4, championship, champion),
        win_check,
        examples,
        advanced,
        seed,
        ..RunConfig::default()
    };
    let report = py.allow_threads(|| simulation::count_outcomes(&state, &pool, &config))?;

    let keyed = |placing: &simulation::Placing| placing.to_string();
    let win_count = report.win_count().iter().map(|(p, &v)| (keyed(p), v)).collect();
    let loss_count = report.loss_count().iter().map(|(p, &v)| (keyed(p), v)).collect();
    let win_pct = report.win_pct().iter().map(|(p, &v)| (keyed(p), v)).collect();
    let loss_pct = report.loss_pct().iter().map(|(p, &v)| (keyed(p), v)).collect();
    let occupancy = report.occupancy.map(|occupancy| {
        occupancy
            .teams
            .into_iter()
            .map(|team| (team.team, team.fractions.to_vec()))
            .collect()
    });
    Ok((win_count, loss_count, win_pct, loss_pct, occupancy))
}

/// Python module definition
#[pymodule]
fn bracket_pool(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Team>()?;

    m.add_function(wrap_pyfunction!(calculate_win_likelihood, m)?)?;
    m.add_function(wrap_pyfunction!(fold_forced_outcomes, m)?)?;
    m.add_function(wrap_pyfunction!(count_outcomes, m)?)?;

    m.add("ROUND_POINTS", crate::constants::ROUND_POINTS.to_vec())?;
    m.add("ITERATIONS", RunConfig::default().iterations)?;

    Ok(())
}
