//! Checkpoint error types.

use thiserror::Error;

/// Errors that can occur while saving or restoring a checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to encode checkpoint as {format}: {reason}")]
    Encode {
        format: &'static str,
        reason: String,
    },

    #[error("Failed to decode {format} checkpoint: {reason}")]
    Decode {
        format: &'static str,
        reason: String,
    },

    /// Written by a different checkpoint format version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Checkpoint {id} is invalid: {reason}")]
    Invalid { id: String, reason: String },
}
