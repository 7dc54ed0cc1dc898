//! Checkpoint error types.

use thiserror::Error;

/// Why a checkpoint could not be written, read or resumed.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("JSON checkpoint encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary checkpoint encoding failed: {0}")]
    Binary(#[from] bincode::Error),

    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Metadata and history disagree on how many transitions fired.
    #[error("Checkpoint records {recorded} transitions but its history counted {counted}")]
    TransitionCountMismatch { recorded: usize, counted: usize },

    /// A transition is stamped later than the last delivered tick.
    #[error("Transition at tick {tick} is beyond the {ticks} ticks delivered")]
    TickOutOfRange { tick: u64, ticks: u64 },
}
