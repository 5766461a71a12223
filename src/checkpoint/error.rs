//! Checkpoint error types.

use crate::runtime::EvaluationError;
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint version is not supported by this version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The snapshot was taken from a different root state
    #[error("Snapshot root '{found}' does not match instance root '{expected}'")]
    RootMismatch { expected: String, found: String },

    /// The snapshot names a region the model does not have
    #[error("State '{state}' has no region named '{name}'")]
    UnknownRegion { state: String, name: String },

    /// The snapshot names a state the model does not have
    #[error("Region '{region}' has no state named '{name}'")]
    UnknownState { region: String, name: String },

    /// The instance could not be set up before restoring
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
