//! Builder for constructing instances.

use super::engine;
use super::error::EvaluationError;
use super::instance::Instance;
use super::random::{Random, ThreadRandom};
use crate::checkpoint::{self, CheckpointError, StateSnapshot};
use crate::core::StateId;
use crate::log::Category;
use crate::model::Model;

/// Builder for an [`Instance`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use statechart::core::PseudoStateKind;
/// use statechart::model::Model;
/// use statechart::runtime::InstanceBuilder;
///
/// let mut model: Model<&str> = Model::new("light");
/// let root = model.root();
/// let initial = model.pseudo_state("initial", root, PseudoStateKind::Initial).unwrap();
/// let off = model.state("off", root).unwrap();
/// model.external(initial, off);
///
/// let instance = InstanceBuilder::new("hall", &model)
///     .random(|_max: usize| 0)
///     .build()
///     .unwrap();
///
/// assert!(instance.is_active(off));
/// ```
pub struct InstanceBuilder<'m, M> {
    name: String,
    model: &'m Model<M>,
    root: Option<StateId>,
    random: Option<Box<dyn Random>>,
}

impl<'m, M> InstanceBuilder<'m, M> {
    /// Create a builder for an instance of `model`.
    pub fn new(name: &str, model: &'m Model<M>) -> Self {
        Self {
            name: name.to_string(),
            model,
            root: None,
            random: None,
        }
    }

    /// Run the instance from a state other than the model's root.
    /// The state must not belong to a region.
    pub fn root(mut self, state: StateId) -> Self {
        self.root = Some(state);
        self
    }

    /// Random source for choice pseudostates (defaults to [`ThreadRandom`]).
    pub fn random(mut self, random: impl Random + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    /// Build the instance and enter its root from scratch.
    ///
    /// The initial entry runs as one transaction. Completion transitions
    /// that become enabled along the way fire before this returns.
    pub fn build(self) -> Result<Instance<'m, M>, EvaluationError> {
        let mut instance = self.detach()?;
        instance.transaction(|instance| engine::start(instance))?;
        Ok(instance)
    }

    /// Build the instance from a snapshot instead of entering the root.
    ///
    /// No entry actions run. The snapshot must match the model's shape by
    /// name; restored states are committed as one transaction.
    pub fn restore(self, snapshot: &StateSnapshot) -> Result<Instance<'m, M>, CheckpointError> {
        let mut instance = self.detach()?;
        instance.transaction(|instance| checkpoint::apply(instance, snapshot))?;
        Ok(instance)
    }

    fn detach(self) -> Result<Instance<'m, M>, EvaluationError> {
        let model = self.model;
        let root = self.root.unwrap_or(model.root());
        let node = model.state_node(root);
        if node.parent().is_some() {
            return Err(EvaluationError::RootHasParent {
                state: node.qualified_name().to_string(),
            });
        }

        model.logger.log(Category::CREATE, || {
            format!("created instance {} of {}", self.name, node.qualified_name())
        });
        let random = self
            .random
            .unwrap_or_else(|| Box::new(ThreadRandom));
        Ok(Instance::detached(&self.name, model, root, random))
    }
}
