//! Errors raised while a model is being built.

use thiserror::Error;

/// Construction-time model errors.
///
/// Each error aborts the construction call that raised it; the model is left
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Duplicate state name '{name}' in region '{region}'")]
    DuplicateState { region: String, name: String },

    #[error("Region '{region}' already has a starting vertex '{existing}'")]
    DuplicateStartingVertex { region: String, existing: String },

    #[error("Pseudostate '{vertex}' already has an else transition")]
    DuplicateElse { vertex: String },

    #[error("Local transition target '{target}' is not a descendant of '{from}'")]
    InvalidLocalTransition { from: String, target: String },
}
