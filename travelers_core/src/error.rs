//! Error types for the walk engine.

use crate::grid::Delta;
use thiserror::Error;
use travelers_env::TravelerId;

/// Errors raised by grid construction and the move primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The move primitive received a vector outside the four legal deltas
    #[error("Invalid direction: {0} is not a single cardinal step")]
    InvalidDirection(Delta),

    /// A grid needs at least one cell on each axis
    #[error("Grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },
}

/// Errors that end a single traveler's walk.
///
/// A walk error never affects other travelers.
#[derive(Debug, Error)]
pub enum WalkError {
    /// A move was rejected by the grid; the whole path is discarded
    #[error("Traveler {traveler} aborted at step {step}: {source}")]
    Move {
        traveler: TravelerId,
        step: usize,
        #[source]
        source: GridError,
    },

    /// The task running the traveler did not complete
    #[error("Traveler {traveler} task failed: {reason}")]
    TaskFailed { traveler: TravelerId, reason: String },
}

impl WalkError {
    /// Creates a task failure error.
    pub fn task_failed(traveler: TravelerId, reason: impl Into<String>) -> Self {
        Self::TaskFailed {
            traveler,
            reason: reason.into(),
        }
    }

    /// Returns the traveler this error belongs to.
    pub fn traveler(&self) -> TravelerId {
        match self {
            Self::Move { traveler, .. } | Self::TaskFailed { traveler, .. } => *traveler,
        }
    }
}
