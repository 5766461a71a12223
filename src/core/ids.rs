//! Typed handles into a model arena.
//!
//! Every node of a [`Model`](crate::model::Model) is owned by the model and
//! referred to by a small `Copy` handle. Handles are typed per node kind, so a
//! `StateId` can never name a region or a pseudostate.

use std::fmt;

/// Handle to a state in a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

/// Handle to a pseudostate in a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PseudoStateId(pub(crate) usize);

/// Handle to a region in a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub(crate) usize);

/// Handle to a transition in a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub(crate) usize);

/// Anything that can be entered and left: a state or a pseudostate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexId {
    State(StateId),
    PseudoState(PseudoStateId),
}

impl VertexId {
    /// The state behind this vertex, if it is one.
    pub fn as_state(self) -> Option<StateId> {
        match self {
            Self::State(state) => Some(state),
            Self::PseudoState(_) => None,
        }
    }

    /// The pseudostate behind this vertex, if it is one.
    pub fn as_pseudo_state(self) -> Option<PseudoStateId> {
        match self {
            Self::State(_) => None,
            Self::PseudoState(pseudo) => Some(pseudo),
        }
    }
}

impl From<StateId> for VertexId {
    fn from(state: StateId) -> Self {
        Self::State(state)
    }
}

impl From<PseudoStateId> for VertexId {
    fn from(pseudo: PseudoStateId) -> Self {
        Self::PseudoState(pseudo)
    }
}

/// A node of the containment tree: either a region or a vertex.
///
/// Ancestor paths alternate between the two, starting and ending at a vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Region(RegionId),
    Vertex(VertexId),
}

impl From<RegionId> for Element {
    fn from(region: RegionId) -> Self {
        Self::Region(region)
    }
}

impl From<VertexId> for Element {
    fn from(vertex: VertexId) -> Self {
        Self::Vertex(vertex)
    }
}

impl From<StateId> for Element {
    fn from(state: StateId) -> Self {
        Self::Vertex(state.into())
    }
}

impl From<PseudoStateId> for Element {
    fn from(pseudo: PseudoStateId) -> Self {
        Self::Vertex(pseudo.into())
    }
}

/// Where a new state or pseudostate is attached.
///
/// Attaching directly to a state places the vertex in that state's default
/// region, which is created on first use and named after the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parent {
    Region(RegionId),
    State(StateId),
}

impl From<RegionId> for Parent {
    fn from(region: RegionId) -> Self {
        Self::Region(region)
    }
}

impl From<StateId> for Parent {
    fn from(state: StateId) -> Self {
        Self::State(state)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state#{}", self.0)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region#{}", self.0)
    }
}
