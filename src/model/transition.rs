//! Transitions and the fluent handle used to configure them.

use super::Model;
use crate::core::{Action, Element, Guard, TransitionId, Trigger, VertexId};

/// The part of the tree a transition leaves and enters, fixed when the
/// transition is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    /// Left first, together with everything active beneath it.
    pub to_leave: Element,
    /// Entered in order, outermost first. Never empty.
    pub to_enter: Vec<Element>,
}

/// How a transition moves through the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// Leaves the source side up to the common ancestor, then enters the
    /// target side down to the target.
    External(Span),
    /// Stays inside the source; only the source's child region on the path
    /// to the target is left and re-entered.
    Local(Span),
    /// Runs actions without leaving or entering anything.
    Internal,
}

impl TransitionKind {
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::External(span) | Self::Local(span) => Some(span),
            Self::Internal => None,
        }
    }
}

/// A transition between two vertices.
pub struct Transition<M> {
    pub(crate) source: VertexId,
    pub(crate) target: VertexId,
    pub(crate) guard: Guard<M>,
    pub(crate) actions: Vec<Action<M>>,
    pub(crate) kind: TransitionKind,
}

impl<M> Transition<M> {
    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn target(&self) -> VertexId {
        self.target
    }

    pub fn kind(&self) -> &TransitionKind {
        &self.kind
    }

    pub fn guard(&self) -> &Guard<M> {
        &self.guard
    }

    /// Check whether this transition is enabled for the trigger (pure).
    pub fn can_fire(&self, trigger: &Trigger<'_, M>) -> bool {
        self.guard.check(trigger)
    }
}

/// Mutable handle on a freshly created transition.
///
/// # Example
///
/// ```rust
/// use statechart::model::Model;
/// use statechart::core::PseudoStateKind;
///
/// let mut model: Model<&str> = Model::new("door");
/// let root = model.root();
/// let initial = model.pseudo_state("initial", root, PseudoStateKind::Initial).unwrap();
/// let closed = model.state("closed", root).unwrap();
/// let open = model.state("open", root).unwrap();
///
/// model.external(initial, closed);
/// model
///     .external(closed, open)
///     .when(|event: &&str| *event == "open")
///     .effect(|_| println!("creak"));
/// ```
pub struct TransitionMut<'a, M> {
    pub(crate) model: &'a mut Model<M>,
    pub(crate) id: TransitionId,
}

impl<M: 'static> TransitionMut<'_, M> {
    /// Replace the default always-true guard with a guard over messages.
    pub fn when<F>(self, guard: F) -> Self
    where
        F: Fn(&M) -> bool + Send + Sync + 'static,
    {
        self.model.transitions[self.id.0].guard = Guard::new(guard);
        self
    }

    /// Replace the guard with one that sees every trigger, including
    /// completion and start triggers.
    pub fn when_trigger<F>(self, guard: F) -> Self
    where
        F: Fn(&Trigger<'_, M>) -> bool + Send + Sync + 'static,
    {
        self.model.transitions[self.id.0].guard = Guard::on_trigger(guard);
        self
    }

    /// Append an action, run in registration order when the transition fires.
    pub fn effect<F>(self, action: F) -> Self
    where
        F: Fn(&Trigger<'_, M>) + Send + Sync + 'static,
    {
        self.model.transitions[self.id.0]
            .actions
            .push(Box::new(action));
        self
    }
}

impl<M> TransitionMut<'_, M> {
    pub fn id(&self) -> TransitionId {
        self.id
    }
}
