//! Evaluation errors.

use thiserror::Error;

/// Errors that abort an evaluation or an instance's initial entry.
///
/// When one of these is returned the transaction is discarded: no
/// active-configuration change is committed. Entry, exit and transition
/// actions that already ran are not undone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("Root state '{state}' must not belong to a region")]
    RootHasParent { state: String },

    #[error("Multiple transitions out of '{vertex}' are enabled by the same trigger")]
    AmbiguousTransition { vertex: String },

    #[error("Pseudostate '{vertex}' has no enabled transition and no else transition")]
    MissingTransition { vertex: String },

    #[error("Region '{region}' has no starting vertex and no history to resume")]
    MissingStartingVertex { region: String },
}
