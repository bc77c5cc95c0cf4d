//! Bracket Pool - Monte Carlo outcome counts for NCAA bracket pools.
//!
//! Simulates the remaining rounds of a tournament many times, scores every pool
//! participant against each simulated result, and counts how often each participant
//! finishes first or last. Python bindings are available behind the `python` feature.

pub mod aggregate;
pub mod bracket;
pub mod config;
pub mod constants;
pub mod error;
pub mod forced;
pub mod loader;
pub mod pool;
pub mod report;
pub mod round;
pub mod simulation;
pub mod team;
pub mod tournament;
pub mod win_prob;

#[cfg(feature = "python")]
mod python;
#[cfg(test)]
mod testing;

pub use bracket::{Bracket, Round, Schedule};
pub use config::RunConfig;
pub use constants::{ROUND_CAPACITY, ROUND_POINTS};
pub use error::PoolError;
pub use forced::ForcedOutcomes;
pub use pool::{Participant, PickSet, Pool};
pub use simulation::{count_outcomes, Placing, SimulationReport};
pub use team::Team;
pub use tournament::{TournamentState, TrialResult};
pub use win_prob::{calculate_win_likelihood, play_game, ProbabilityMode};
