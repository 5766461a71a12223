//! Checkpoint and resume functionality for instances.
//!
//! A snapshot records, for every region reachable from an instance's root,
//! the name of its last committed state. Because history pseudostates resume
//! from exactly that record, restoring a snapshot restores history too.
//! Actions and guards live in the model and are never serialized.
//!
//! # Example
//!
//! ```rust
//! use statechart::checkpoint::Checkpoint;
//! use statechart::core::PseudoStateKind;
//! use statechart::model::Model;
//! use statechart::runtime::Instance;
//!
//! let mut model: Model<&str> = Model::new("door");
//! let root = model.root();
//! let initial = model.pseudo_state("initial", root, PseudoStateKind::Initial).unwrap();
//! let closed = model.state("closed", root).unwrap();
//! let open = model.state("open", root).unwrap();
//! model.external(initial, closed);
//! model.external(closed, open).when(|event: &&str| *event == "open");
//!
//! let mut instance = Instance::new("front", &model).unwrap();
//! instance.evaluate(&"open").unwrap();
//!
//! let json = instance.checkpoint().to_json().unwrap();
//! let checkpoint = Checkpoint::from_json(&json).unwrap();
//! let resumed = Instance::restore(&checkpoint.instance, &model, &checkpoint.snapshot).unwrap();
//!
//! assert!(resumed.is_active(open));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;
mod snapshot;

pub use error::CheckpointError;
pub use snapshot::{RegionSnapshot, Snapshot, StateSnapshot};

pub(crate) use snapshot::{apply, capture};

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable checkpoint of an instance.
/// Does NOT include actions or guards (not serializable).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Name of the instance the snapshot was taken from
    pub instance: String,

    /// Committed configuration
    pub snapshot: StateSnapshot,
}

impl Checkpoint {
    pub fn new(instance: &str, snapshot: StateSnapshot) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            instance: instance.to_string(),
            snapshot,
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from JSON, rejecting versions this crate cannot read.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}
