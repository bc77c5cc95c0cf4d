use thiserror::Error;

use crate::bracket::Round;

/// Errors raised by the simulation core.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Forced outcomes that cannot all hold in one tournament.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("topology mismatch: game {slot} of {round} has {found} alive teams, expected 2")]
    TopologyMismatch { round: Round, slot: u32, found: usize },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("no rating for team {0:?}")]
    MissingRating(String),

    #[error("missing data for participant {participant:?}: {detail}")]
    MissingParticipantData { participant: String, detail: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
