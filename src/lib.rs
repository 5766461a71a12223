//! Statechart: a hierarchical state machine engine
//!
//! A model is built once as a tree of regions, states and pseudostates joined
//! by transitions. Any number of instances can then run against it, each
//! keeping only its own active configuration.
//!
//! # Core Concepts
//!
//! - **Model**: An arena of regions, states and pseudostates addressed by typed handles
//! - **Regions**: Orthogonal containers of states; each region remembers its last state for history
//! - **Pseudostates**: Initial, shallow and deep history, junction and choice vertices
//! - **Transitions**: External, local and internal, with guards and effects
//! - **Instances**: Transactional active configurations that evaluate messages
//! - **Checkpoints**: Serializable snapshots of an instance's committed configuration
//!
//! # Example
//!
//! ```rust
//! use statechart::core::PseudoStateKind;
//! use statechart::model::Model;
//! use statechart::runtime::Instance;
//!
//! let mut model: Model<&str> = Model::new("model");
//! let root = model.root();
//! let initial = model.pseudo_state("initial", root, PseudoStateKind::Initial).unwrap();
//! let wait_ab = model.state("waitAB", root).unwrap();
//! let wait_a = model.state("waitA", root).unwrap();
//! let wait_b = model.state("waitB", root).unwrap();
//! let done = model.state("done", root).unwrap();
//!
//! model.external(initial, wait_ab);
//! model.external(wait_ab, wait_b).when(|event: &&str| *event == "A");
//! model.external(wait_ab, wait_a).when(|event: &&str| *event == "B");
//! model.external(wait_b, done).when(|event: &&str| *event == "B");
//! model.external(wait_a, done).when(|event: &&str| *event == "A");
//!
//! let mut instance = Instance::new("instance", &model).unwrap();
//!
//! assert!(instance.evaluate(&"B").unwrap());
//! assert!(instance.is_active(wait_a));
//!
//! assert!(instance.evaluate(&"A").unwrap());
//! assert!(instance.is_active(done));
//!
//! assert!(!instance.evaluate(&"A").unwrap());
//! ```

pub mod checkpoint;
pub mod core;
pub mod log;
pub mod model;
pub mod runtime;
pub mod validation;

// Re-export commonly used types
pub use crate::checkpoint::{Checkpoint, CheckpointError, Snapshot};
pub use crate::core::{Guard, PseudoStateKind, PseudoStateId, RegionId, StateId, Trigger, VertexId};
pub use crate::log::{Category, Logger};
pub use crate::model::{Model, ModelError};
pub use crate::runtime::{EvaluationError, Instance, InstanceBuilder, Random};
