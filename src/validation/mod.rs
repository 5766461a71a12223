//! Validation-based linting of finished models.
//!
//! Construction already rejects malformed models where a single call can
//! tell (duplicate names, duplicate initial pseudostates). The rules here
//! look at the model as a whole and report problems that would otherwise
//! only surface as fatal errors when an instance happens to reach them.
//!
//! Following Stillwater's philosophy, every violation is collected rather
//! than stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use statechart::model::Model;
//!
//! let mut model: Model<()> = Model::new("root");
//! let root = model.root();
//! model.state("orphan", root).unwrap();
//!
//! let result = model.validate();
//! assert!(result.is_failure());
//! ```

pub mod rules;
pub mod violations;

pub use rules::validate;
pub use violations::ModelViolation;
