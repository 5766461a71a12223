//! Structural problems found by model validation.

use thiserror::Error;

/// A structural problem that will surface as an evaluation error if the
/// affected part of the model is ever reached.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelViolation {
    #[error("Region '{region}' has no initial or history pseudostate")]
    RegionWithoutStartingVertex { region: String },

    #[error("Pseudostate '{vertex}' has no outgoing or else transition and can never complete")]
    PseudoStateCannotComplete { vertex: String },

    #[error("Pseudostate '{vertex}' has only guarded transitions and no else transition")]
    BranchWithoutElse { vertex: String },
}
