//! Checkpoint and resume for machines.
//!
//! A checkpoint captures where a machine is (initial and current state,
//! dispatch count, transition history) so it can continue after a restart.
//! Transition tables and handler contexts are code, not data, and are not
//! part of it.

use crate::core::{State, StateHistory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Counters tracked by a machine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MachineMetadata {
    /// When the machine was created
    pub created_at: DateTime<Utc>,

    /// When the checkpoint was taken
    pub updated_at: DateTime<Utc>,

    /// Dispatches delivered so far
    pub ticks: u64,

    /// Transitions fired so far, including ones evicted from the history
    pub transitions: usize,
}

/// Serializable checkpoint of a machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<S: State> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Initial state of the machine
    pub initial_state: S,

    /// Current state of the machine, `None` if halted
    pub current_state: Option<S>,

    /// Complete transition history
    pub history: StateHistory<S>,

    /// Machine metadata
    pub metadata: MachineMetadata,
}

impl<S: State> Checkpoint<S> {
    /// Check that this checkpoint can be resumed by this library version.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        if self.metadata.transitions != self.history.recorded() {
            return Err(CheckpointError::TransitionCountMismatch {
                recorded: self.metadata.transitions,
                counted: self.history.recorded(),
            });
        }

        if let Some(last) = self.history.last() {
            if last.tick > self.metadata.ticks {
                return Err(CheckpointError::TickOutOfRange {
                    tick: last.tick,
                    ticks: self.metadata.ticks,
                });
            }
        }

        Ok(())
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    /// Encode in the compact binary format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from the compact binary format and validate.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }
}
