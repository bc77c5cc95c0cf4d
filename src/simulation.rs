use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::aggregate::{ratio, Tally, TrialRecord};
use crate::config::RunConfig;
use crate::constants::{TIE_LABEL, TRIALS_PER_CHUNK};
use crate::error::PoolError;
use crate::pool::Pool;
use crate::tournament::TournamentState;
use crate::win_prob::ProbabilityMode;

/// Who a trial's first or last place is credited to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Placing {
    Participant(String),

    /// No unique first (or last) place
    Tie,
}

impl Display for Placing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Placing::Participant(name) => f.write_str(name),
            Placing::Tie => f.write_str(TIE_LABEL),
        }
    }
}

/// First- and last-place finishes for one placing.
#[derive(Clone, Debug, PartialEq)]
pub struct Standing {
    pub placing: Placing,
    pub wins: u64,
    pub losses: u64,
    pub win_pct: f64,
    pub loss_pct: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TeamOccupancy {
    pub team: String,

    /// Fraction of the participant's wins in which the team reached each round
    pub fractions: [f64; 4],
}

/// Round occupancy across the trials won by one participant.
#[derive(Clone, Debug, PartialEq)]
pub struct OccupancyReport {
    pub participant: String,
    pub wins: u64,
    pub teams: Vec<TeamOccupancy>,
}

/// Outcome of a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationReport {
    pub iterations: u64,
    pub mode: ProbabilityMode,

    /// One row per participant in pool order, then the tie row
    pub standings: Vec<Standing>,

    pub occupancy: Option<OccupancyReport>,
    pub examples: Vec<TrialRecord>,
}

impl SimulationReport {
    fn from_tally(tally: Tally, state: &TournamentState, pool: &Pool, config: &RunConfig) -> Self {
        let iterations = tally.trials;
        let placings = pool
            .participants()
            .iter()
            .map(|participant| Placing::Participant(participant.name.clone()))
            .chain(std::iter::once(Placing::Tie));
        let standings = placings
            .zip(tally.wins.iter().zip(&tally.losses))
            .map(|(placing, (&wins, &losses))| Standing {
                placing,
                wins,
                losses,
                win_pct: ratio(wins, iterations),
                loss_pct: ratio(losses, iterations),
            })
            .collect();

        let occupancy = tally.occupancy.map(|occupancy| {
            let wins = tally.wins[occupancy.participant];
            let teams = state
                .bracket()
                .teams()
                .zip(occupancy.fractions(wins))
                .map(|(team, fractions)| TeamOccupancy {
                    team: team.to_string(),
                    fractions,
                })
                .collect();
            OccupancyReport {
                participant: pool.participants()[occupancy.participant].name.clone(),
                wins,
                teams,
            }
        });

        SimulationReport {
            iterations,
            mode: config.mode,
            standings,
            occupancy,
            examples: tally.examples,
        }
    }

    pub fn standing(&self, placing: &Placing) -> Option<&Standing> {
        self.standings.iter().find(|standing| &standing.placing == placing)
    }

    fn collect<T>(&self, value: impl Fn(&Standing) -> T) -> HashMap<Placing, T> {
        self.standings
            .iter()
            .map(|standing| (standing.placing.clone(), value(standing)))
            .collect()
    }

    pub fn win_count(&self) -> HashMap<Placing, u64> {
        self.collect(|standing| standing.wins)
    }

    pub fn loss_count(&self) -> HashMap<Placing, u64> {
        self.collect(|standing| standing.losses)
    }

    pub fn win_pct(&self) -> HashMap<Placing, f64> {
        self.collect(|standing| standing.win_pct)
    }

    pub fn loss_pct(&self) -> HashMap<Placing, f64> {
        self.collect(|standing| standing.loss_pct)
    }
}

/// Simulate the rest of the tournament `config.iterations` times and tally who finishes
/// first and last in the pool.
///
/// Forced outcomes are folded and checked against the bracket before any trial runs.
/// Trials are split into fixed-size chunks, each with its own generator seeded from a
/// master generator, and run in parallel; the per-chunk tallies are merged in chunk
/// order, so a seeded run gives the same report on any number of threads.
pub fn count_outcomes(
    state: &TournamentState,
    pool: &Pool,
    config: &RunConfig,
) -> Result<SimulationReport, PoolError> {
    config.validate()?;
    let forced = config.forced.fold()?;
    forced.check_against(state.bracket())?;
    debug!("forced outcomes: {forced:?}");

    let watched = config
        .win_check
        .as_deref()
        .map(|name| {
            pool.position(name).ok_or_else(|| PoolError::MissingParticipantData {
                participant: name.to_string(),
                detail: "not in the pool".to_string(),
            })
        })
        .transpose()?;
    let max_examples = if config.examples { config.max_examples } else { 0 };

    let mut master = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let chunks: Vec<(u64, u64)> = (0..config.iterations)
        .step_by(TRIALS_PER_CHUNK as usize)
        .map(|start| {
            let trials = TRIALS_PER_CHUNK.min(config.iterations - start);
            (master.gen::<u64>(), trials)
        })
        .collect();

    info!(
        "simulating {} trials in {} chunks using a {} probability model",
        config.iterations,
        chunks.len(),
        config.mode
    );
    let start_time = Instant::now();

    let empty = || {
        Tally::new(
            pool.len(),
            state.bracket().len(),
            watched,
            config.advanced,
            max_examples,
        )
    };
    let tally = chunks
        .par_iter()
        .map(|&(seed, trials)| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut tally = empty();
            for _ in 0..trials {
                let trial = state.run_trial(&forced, config.mode, &mut rng)?;
                let scores = pool.score(&trial)?;
                trace!("trial: {:?}, scores: {scores:?}", trial.rounds);
                tally.record(pool, state.bracket().teams(), &trial, &scores);
            }
            debug!("chunk of {trials} trials done");
            Ok::<_, PoolError>(tally)
        })
        .try_reduce(|| empty(), |a, b| Ok(a.merge(b)))?;

    info!("simulation took {:.3}s", start_time.elapsed().as_secs_f64());
    Ok(SimulationReport::from_tally(tally, state, pool, config))
}
