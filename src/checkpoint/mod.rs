//! Checkpoint and resume for machine instances.
//!
//! A checkpoint captures where a machine is (its state) and what it holds
//! (its context), so a long-running machine can be rebuilt after a restart.
//! Handlers are behavior, not data: they are never serialized, and a
//! checkpoint is resumed through a [`MachineBuilder`] that already has them.
//! Past transitions are not recorded.

use crate::builder::MachineBuilder;
use crate::core::{Event, State};
use crate::machine::Machine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine's state and context.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, C: Serialize",
    deserialize = "S: DeserializeOwned, C: DeserializeOwned"
))]
pub struct Checkpoint<S: State, C> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When the checkpoint was taken
    pub taken_at: DateTime<Utc>,

    /// State the machine was in
    pub state: S,

    /// Context the machine held
    pub context: C,
}

impl<S: State, C> Checkpoint<S, C> {
    pub fn new(state: S, context: C) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            taken_at: Utc::now(),
            state,
            context,
        }
    }

    /// Reject checkpoints this version cannot resume.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        if self.id.is_nil() {
            return Err(CheckpointError::Invalid {
                id: self.id.to_string(),
                reason: "nil checkpoint id".to_string(),
            });
        }
        Ok(())
    }
}

impl<S, C> Checkpoint<S, C>
where
    S: State + Serialize + DeserializeOwned,
    C: Serialize + DeserializeOwned,
{
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::Encode {
            format: "json",
            reason: e.to_string(),
        })
    }

    /// Parse and validate a JSON checkpoint.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json).map_err(|e| CheckpointError::Decode {
            format: "json",
            reason: e.to_string(),
        })?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::Encode {
            format: "binary",
            reason: e.to_string(),
        })
    }

    /// Parse and validate a binary checkpoint.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes).map_err(|e| CheckpointError::Decode {
            format: "binary",
            reason: e.to_string(),
        })?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }
}

impl<S: State, E: Event, C: Clone> Machine<S, E, C> {
    /// Snapshot the current state and a copy of the context.
    pub fn checkpoint(&self) -> Checkpoint<S, C> {
        Checkpoint::new(self.state().clone(), self.context().clone())
    }
}

impl<S: State, E: Event, C> MachineBuilder<S, E, C> {
    /// Rebuild a machine from a checkpoint using this builder's handlers.
    ///
    /// The machine starts in the checkpointed state, not the builder's
    /// initial state.
    pub fn resume(
        &self,
        checkpoint: Checkpoint<S, C>,
    ) -> Result<Machine<S, E, C>, CheckpointError> {
        checkpoint.validate()?;
        debug!(
            checkpoint = %checkpoint.id,
            state = checkpoint.state.name(),
            "resuming machine"
        );
        Ok(Machine::with_registry(
            checkpoint.state,
            checkpoint.context,
            self.shared_registry(),
        ))
    }
}
