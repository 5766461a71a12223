//! The model graph: regions, states, pseudostates and transitions.
//!
//! A [`Model`] is an arena that owns every node. It is built once through the
//! methods below and is read-only while instances evaluate against it, so a
//! single model can back any number of instances, on any number of threads.
//!
//! Ancestor spans for external and local transitions are computed as each
//! transition is created, which keeps evaluation free of tree walks.

mod error;
mod graph;
mod transition;

pub use error::ModelError;
pub use graph::{PseudoStateNode, RegionNode, StateNode};
pub use transition::{Span, Transition, TransitionKind, TransitionMut};

use crate::core::{
    tree, Element, Guard, Parent, PseudoStateId, PseudoStateKind, RegionId, StateId,
    TransitionId, Trigger, VertexId,
};
use crate::log::{Category, Logger};
use crate::validation::{self, ModelViolation};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Owner of a state machine model.
///
/// `M` is the caller's message type, observed by guards and actions.
///
/// # Example
///
/// ```rust
/// use statechart::core::PseudoStateKind;
/// use statechart::model::Model;
///
/// let mut model: Model<&str> = Model::new("player");
/// let root = model.root();
/// let initial = model.pseudo_state("initial", root, PseudoStateKind::Initial).unwrap();
/// let stopped = model.state("stopped", root).unwrap();
///
/// model.external(initial, stopped);
///
/// assert_eq!(model.state_node(stopped).qualified_name(), "player.player.stopped");
/// assert!(model.state_node(root).is_composite());
/// ```
pub struct Model<M> {
    pub(crate) root: StateId,
    pub(crate) regions: Vec<RegionNode>,
    pub(crate) states: Vec<StateNode<M>>,
    pub(crate) pseudo_states: Vec<PseudoStateNode>,
    pub(crate) transitions: Vec<Transition<M>>,
    pub(crate) logger: Logger,
}

impl<M: 'static> Model<M> {
    /// Create a model whose root state is named `root`.
    pub fn new(root: &str) -> Self {
        Self::with_logger(root, Logger::new())
    }

    /// Create a model that reports to the given logger.
    pub fn with_logger(root: &str, logger: Logger) -> Self {
        let model = Self {
            root: StateId(0),
            regions: Vec::new(),
            states: vec![StateNode::new(root, root.to_string(), None)],
            pseudo_states: Vec::new(),
            transitions: Vec::new(),
            logger,
        };
        model
            .logger
            .log(Category::CREATE, || format!("created state {root}"));
        model
    }

    /// Create a region in `parent`. Regions are kept in creation order.
    pub fn region(&mut self, name: &str, parent: StateId) -> RegionId {
        let id = RegionId(self.regions.len());
        let qualified_name = format!("{}.{}", self.states[parent.0].qualified_name, name);
        self.logger
            .log(Category::CREATE, || format!("created region {qualified_name}"));
        self.regions.push(RegionNode {
            name: name.to_string(),
            qualified_name,
            parent,
            vertices: Vec::new(),
            starting: None,
        });
        self.states[parent.0].regions.push(id);
        id
    }

    /// Create a state. Sibling states within one region must have distinct names.
    pub fn state(&mut self, name: &str, parent: impl Into<Parent>) -> Result<StateId, ModelError> {
        let region = self.resolve_parent(parent.into());
        let duplicate = self.regions[region.0]
            .vertices
            .iter()
            .filter_map(|vertex| vertex.as_state())
            .any(|state| self.states[state.0].name == name);
        if duplicate {
            return Err(ModelError::DuplicateState {
                region: self.regions[region.0].qualified_name.clone(),
                name: name.to_string(),
            });
        }

        let id = StateId(self.states.len());
        let qualified_name = format!("{}.{}", self.regions[region.0].qualified_name, name);
        self.logger
            .log(Category::CREATE, || format!("created state {qualified_name}"));
        self.states
            .push(StateNode::new(name, qualified_name, Some(region)));
        self.regions[region.0].vertices.push(id.into());
        Ok(id)
    }

    /// Create a pseudostate. A region holds at most one initial or history
    /// pseudostate, which becomes its starting vertex.
    pub fn pseudo_state(
        &mut self,
        name: &str,
        parent: impl Into<Parent>,
        kind: PseudoStateKind,
    ) -> Result<PseudoStateId, ModelError> {
        let region = self.resolve_parent(parent.into());
        if kind.is_starting() {
            if let Some(existing) = self.regions[region.0].starting {
                return Err(ModelError::DuplicateStartingVertex {
                    region: self.regions[region.0].qualified_name.clone(),
                    existing: self.pseudo_states[existing.0].qualified_name.clone(),
                });
            }
        }

        let id = PseudoStateId(self.pseudo_states.len());
        let qualified_name = format!("{}.{}", self.regions[region.0].qualified_name, name);
        self.logger.log(Category::CREATE, || {
            format!("created {kind} pseudostate {qualified_name}")
        });
        self.pseudo_states.push(PseudoStateNode {
            name: name.to_string(),
            qualified_name,
            parent: region,
            kind,
            outgoing: Vec::new(),
            otherwise: None,
        });
        let node = &mut self.regions[region.0];
        node.vertices.push(id.into());
        if kind.is_starting() {
            node.starting = Some(id);
        }
        Ok(id)
    }

    /// Append an entry action; entry actions run in registration order.
    ///
    /// Actions are not undone if the evaluation that ran them later fails.
    pub fn entry<F>(&mut self, state: StateId, action: F) -> &mut Self
    where
        F: Fn(&Trigger<'_, M>) + Send + Sync + 'static,
    {
        self.states[state.0].entry.push(Box::new(action));
        self
    }

    /// Append an exit action; exit actions run in registration order.
    pub fn exit<F>(&mut self, state: StateId, action: F) -> &mut Self
    where
        F: Fn(&Trigger<'_, M>) + Send + Sync + 'static,
    {
        self.states[state.0].exit.push(Box::new(action));
        self
    }

    /// Create an external transition.
    ///
    /// When `target` is a history pseudostate the pseudostate itself is never
    /// entered; its region is, and resumes from its last known state.
    pub fn external(
        &mut self,
        source: impl Into<VertexId>,
        target: impl Into<VertexId>,
    ) -> TransitionMut<'_, M> {
        let (source, target) = (source.into(), target.into());
        let span = self.external_span(source, target);
        let id = self.push_transition(source, target, TransitionKind::External(span));
        self.attach(source, id);
        TransitionMut { model: self, id }
    }

    /// Create a local transition; `target` must be a descendant of `source`.
    pub fn local(
        &mut self,
        source: StateId,
        target: impl Into<VertexId>,
    ) -> Result<TransitionMut<'_, M>, ModelError> {
        let target = target.into();
        let span = self.local_span(source, target)?;
        let id = self.push_transition(source.into(), target, TransitionKind::Local(span));
        self.attach(source.into(), id);
        Ok(TransitionMut { model: self, id })
    }

    /// Create an internal transition: only its actions run.
    pub fn internal(&mut self, source: StateId) -> TransitionMut<'_, M> {
        let id = self.push_transition(source.into(), source.into(), TransitionKind::Internal);
        self.attach(source.into(), id);
        TransitionMut { model: self, id }
    }

    /// Create the else transition of a pseudostate, taken when none of its
    /// outgoing guards match.
    pub fn otherwise(
        &mut self,
        source: PseudoStateId,
        target: impl Into<VertexId>,
    ) -> Result<TransitionMut<'_, M>, ModelError> {
        if self.pseudo_states[source.0].otherwise.is_some() {
            return Err(ModelError::DuplicateElse {
                vertex: self.pseudo_states[source.0].qualified_name.clone(),
            });
        }
        let target = target.into();
        let span = self.external_span(source.into(), target);
        let id = self.push_transition(source.into(), target, TransitionKind::External(span));
        self.pseudo_states[source.0].otherwise = Some(id);
        Ok(TransitionMut { model: self, id })
    }

    /// Lint the finished model, collecting every violation.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ModelViolation>> {
        validation::validate(self)
    }

    fn resolve_parent(&mut self, parent: Parent) -> RegionId {
        let state = match parent {
            Parent::Region(region) => return region,
            Parent::State(state) => state,
        };
        if let Some(region) = self.states[state.0].default_region {
            return region;
        }
        let name = self.states[state.0].name.clone();
        let region = self.region(&name, state);
        self.states[state.0].default_region = Some(region);
        region
    }

    fn push_transition(
        &mut self,
        source: VertexId,
        target: VertexId,
        kind: TransitionKind,
    ) -> TransitionId {
        let id = TransitionId(self.transitions.len());
        self.logger.log(Category::CREATE, || {
            format!(
                "created transition {} -> {}",
                self.vertex_qualified_name(source),
                self.vertex_qualified_name(target)
            )
        });
        self.transitions.push(Transition {
            source,
            target,
            guard: Guard::always(),
            actions: Vec::new(),
            kind,
        });
        id
    }
}

impl<M> Model<M> {
    /// The designated root state.
    pub fn root(&self) -> StateId {
        self.root
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Report a caller-defined event under [`Category::USER`].
    pub fn log_user<F>(&self, message: F)
    where
        F: FnOnce() -> String,
    {
        self.logger.log(Category::USER, message);
    }

    pub fn region_node(&self, region: RegionId) -> &RegionNode {
        &self.regions[region.0]
    }

    pub fn state_node(&self, state: StateId) -> &StateNode<M> {
        &self.states[state.0]
    }

    pub fn pseudo_state_node(&self, pseudo: PseudoStateId) -> &PseudoStateNode {
        &self.pseudo_states[pseudo.0]
    }

    pub fn transition(&self, transition: TransitionId) -> &Transition<M> {
        &self.transitions[transition.0]
    }

    /// Every region in creation order.
    pub fn regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        (0..self.regions.len()).map(RegionId)
    }

    /// Every pseudostate in creation order.
    pub fn pseudo_states(&self) -> impl Iterator<Item = PseudoStateId> + '_ {
        (0..self.pseudo_states.len()).map(PseudoStateId)
    }

    /// Outgoing transitions of a vertex, excluding any else transition.
    pub fn outgoing(&self, vertex: impl Into<VertexId>) -> &[TransitionId] {
        match vertex.into() {
            VertexId::State(state) => &self.states[state.0].outgoing,
            VertexId::PseudoState(pseudo) => &self.pseudo_states[pseudo.0].outgoing,
        }
    }

    /// The region a vertex belongs to; `None` only for a root state.
    pub fn vertex_parent(&self, vertex: impl Into<VertexId>) -> Option<RegionId> {
        match vertex.into() {
            VertexId::State(state) => self.states[state.0].parent,
            VertexId::PseudoState(pseudo) => Some(self.pseudo_states[pseudo.0].parent),
        }
    }

    pub fn vertex_name(&self, vertex: impl Into<VertexId>) -> &str {
        match vertex.into() {
            VertexId::State(state) => &self.states[state.0].name,
            VertexId::PseudoState(pseudo) => &self.pseudo_states[pseudo.0].name,
        }
    }

    pub fn vertex_qualified_name(&self, vertex: impl Into<VertexId>) -> &str {
        match vertex.into() {
            VertexId::State(state) => &self.states[state.0].qualified_name,
            VertexId::PseudoState(pseudo) => &self.pseudo_states[pseudo.0].qualified_name,
        }
    }

    pub fn element_qualified_name(&self, element: Element) -> &str {
        match element {
            Element::Region(region) => &self.regions[region.0].qualified_name,
            Element::Vertex(vertex) => self.vertex_qualified_name(vertex),
        }
    }

    /// The kind of a vertex if it is a pseudostate.
    pub fn pseudo_kind(&self, vertex: impl Into<VertexId>) -> Option<PseudoStateKind> {
        vertex
            .into()
            .as_pseudo_state()
            .map(|pseudo| self.pseudo_states[pseudo.0].kind)
    }

    /// Child region of `state` with the given name.
    pub fn find_region(&self, state: StateId, name: &str) -> Option<RegionId> {
        self.states[state.0]
            .regions
            .iter()
            .copied()
            .find(|region| self.regions[region.0].name == name)
    }

    /// Child state of `region` with the given name.
    pub fn find_state(&self, region: RegionId, name: &str) -> Option<StateId> {
        self.regions[region.0]
            .vertices
            .iter()
            .filter_map(|vertex| vertex.as_state())
            .find(|state| self.states[state.0].name == name)
    }

    /// Path from the root down to `element`, alternating vertex and region.
    pub fn ancestors(&self, element: impl Into<Element>) -> Vec<Element> {
        tree::ancestors(element.into(), |element| match element {
            Element::Region(region) => Some(Element::from(self.regions[region.0].parent)),
            Element::Vertex(vertex) => self.vertex_parent(vertex).map(Element::Region),
        })
    }

    fn is_history(&self, vertex: VertexId) -> bool {
        self.pseudo_kind(vertex).is_some_and(PseudoStateKind::is_history)
    }

    fn external_span(&self, source: VertexId, target: VertexId) -> Span {
        let source_path = self.ancestors(source);
        let target_path = self.ancestors(target);
        let mut index = tree::lca(&source_path, &target_path);
        let history = self.is_history(target);

        // A history target is resumed through its region, so that region
        // must be part of what is left and entered.
        if history && index + 1 == target_path.len() {
            index -= 1;
        }

        let mut to_enter = target_path[index..].to_vec();
        if history {
            to_enter.pop();
        }

        Span {
            to_leave: source_path[index],
            to_enter,
        }
    }

    fn local_span(&self, source: StateId, target: VertexId) -> Result<Span, ModelError> {
        let source_path = self.ancestors(source);
        let target_path = self.ancestors(target);
        if target_path.len() <= source_path.len() || !target_path.starts_with(&source_path) {
            return Err(ModelError::InvalidLocalTransition {
                from: self.states[source.0].qualified_name.clone(),
                target: self.vertex_qualified_name(target).to_string(),
            });
        }

        let index = source_path.len();
        let mut to_enter = target_path[index..].to_vec();
        if self.is_history(target) {
            to_enter.pop();
        }

        Ok(Span {
            to_leave: target_path[index],
            to_enter,
        })
    }

    fn attach(&mut self, source: VertexId, transition: TransitionId) {
        match source {
            VertexId::State(state) => self.states[state.0].outgoing.push(transition),
            VertexId::PseudoState(pseudo) => {
                self.pseudo_states[pseudo.0].outgoing.push(transition)
            }
        }
    }
}
