//! Arena node types.

use crate::core::{
    Action, PseudoStateId, PseudoStateKind, RegionId, StateId, TransitionId, VertexId,
};

/// A container of sibling vertices; the unit of orthogonality and of history.
pub struct RegionNode {
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) parent: StateId,
    pub(crate) vertices: Vec<VertexId>,
    pub(crate) starting: Option<PseudoStateId>,
}

impl RegionNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The state owning this region.
    pub fn parent(&self) -> StateId {
        self.parent
    }

    /// Child vertices in creation order.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// The initial or history pseudostate of this region, if any.
    pub fn starting(&self) -> Option<PseudoStateId> {
        self.starting
    }
}

/// A state: simple with no regions, composite with one, orthogonal with more.
pub struct StateNode<M> {
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) parent: Option<RegionId>,
    pub(crate) regions: Vec<RegionId>,
    pub(crate) default_region: Option<RegionId>,
    pub(crate) entry: Vec<Action<M>>,
    pub(crate) exit: Vec<Action<M>>,
    pub(crate) outgoing: Vec<TransitionId>,
}

impl<M> StateNode<M> {
    pub(crate) fn new(name: &str, qualified_name: String, parent: Option<RegionId>) -> Self {
        Self {
            name: name.to_string(),
            qualified_name,
            parent,
            regions: Vec::new(),
            default_region: None,
            entry: Vec::new(),
            exit: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The region this state belongs to; `None` only for a root.
    pub fn parent(&self) -> Option<RegionId> {
        self.parent
    }

    /// Child regions in creation order.
    pub fn regions(&self) -> &[RegionId] {
        &self.regions
    }

    pub fn outgoing(&self) -> &[TransitionId] {
        &self.outgoing
    }

    pub fn is_simple(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn is_composite(&self) -> bool {
        self.regions.len() == 1
    }

    pub fn is_orthogonal(&self) -> bool {
        self.regions.len() > 1
    }

    /// A state with no outgoing transitions counts as settled when its
    /// parent checks for completion.
    pub fn is_final(&self) -> bool {
        self.outgoing.is_empty()
    }
}

/// A transient vertex: initial, history, junction or choice.
pub struct PseudoStateNode {
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) parent: RegionId,
    pub(crate) kind: PseudoStateKind,
    pub(crate) outgoing: Vec<TransitionId>,
    pub(crate) otherwise: Option<TransitionId>,
}

impl PseudoStateNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn parent(&self) -> RegionId {
        self.parent
    }

    pub fn kind(&self) -> PseudoStateKind {
        self.kind
    }

    pub fn outgoing(&self) -> &[TransitionId] {
        &self.outgoing
    }

    /// The fallback taken when no outgoing guard matches.
    pub fn otherwise(&self) -> Option<TransitionId> {
        self.otherwise
    }
}
