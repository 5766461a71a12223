//! Core building blocks shared by the model and the runtime.
//!
//! - Typed arena handles (`StateId`, `RegionId`, ...)
//! - Pseudostate kinds
//! - Triggers, guards and actions
//! - Ancestor-path utilities used when transitions are built

mod guard;
mod ids;
mod kind;
pub(crate) mod tree;
mod trigger;

pub use guard::Guard;
pub use ids::{Element, Parent, PseudoStateId, RegionId, StateId, TransitionId, VertexId};
pub use kind::PseudoStateKind;
pub use trigger::{Action, Trigger};
