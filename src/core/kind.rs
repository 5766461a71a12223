//! Pseudostate kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The flavour of a pseudostate.
///
/// Initial and history pseudostates mark where a region starts; junctions and
/// choices are conditional branches resolved inside a single compound
/// transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PseudoStateKind {
    Initial,
    ShallowHistory,
    DeepHistory,
    /// Static branch: its outgoing transition is chosen before any part of the
    /// compound transition executes.
    Junction,
    /// Dynamic branch: chosen when reached, at random among matching guards.
    Choice,
}

impl PseudoStateKind {
    /// Whether this kind becomes the `starting` vertex of its region.
    pub fn is_starting(self) -> bool {
        matches!(
            self,
            Self::Initial | Self::ShallowHistory | Self::DeepHistory
        )
    }

    pub fn is_history(self) -> bool {
        matches!(self, Self::ShallowHistory | Self::DeepHistory)
    }
}

impl fmt::Display for PseudoStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initial => "Initial",
            Self::ShallowHistory => "ShallowHistory",
            Self::DeepHistory => "DeepHistory",
            Self::Junction => "Junction",
            Self::Choice => "Choice",
        };
        f.write_str(name)
    }
}
