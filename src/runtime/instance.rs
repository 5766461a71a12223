//! The active-configuration store of a running state machine.

use super::builder::InstanceBuilder;
use super::engine;
use super::error::EvaluationError;
use super::random::Random;
use crate::checkpoint::{self, Checkpoint, CheckpointError, StateSnapshot};
use crate::core::{RegionId, StateId, Trigger, VertexId};
use crate::log::Category;
use crate::model::Model;
use std::collections::HashMap;
use std::fmt;

/// One running configuration of a model.
///
/// An instance records, per region, which vertex is active. Every change goes
/// through a transaction: writes are buffered in dirty maps that are read
/// back within the transaction and merged into the committed map only when
/// the transaction succeeds.
///
/// The committed map doubles as the history record: a region that has been
/// left keeps its last committed state, which is what history pseudostates
/// resume into.
pub struct Instance<'m, M> {
    pub(crate) name: String,
    pub(crate) model: &'m Model<M>,
    pub(crate) root: StateId,
    pub(crate) random: Box<dyn Random>,
    clean: HashMap<RegionId, StateId>,
    dirty_vertex: HashMap<RegionId, VertexId>,
    dirty_state: HashMap<RegionId, StateId>,
}

impl<'m, M> Instance<'m, M> {
    /// Create an instance and enter the model's root from scratch.
    pub fn new(name: &str, model: &'m Model<M>) -> Result<Self, EvaluationError> {
        InstanceBuilder::new(name, model).build()
    }

    /// Recreate an instance from a snapshot taken with [`Instance::to_snapshot`].
    pub fn restore(
        name: &str,
        model: &'m Model<M>,
        snapshot: &StateSnapshot,
    ) -> Result<Self, CheckpointError> {
        InstanceBuilder::new(name, model).restore(snapshot)
    }

    pub(crate) fn detached(
        name: &str,
        model: &'m Model<M>,
        root: StateId,
        random: Box<dyn Random>,
    ) -> Self {
        Self {
            name: name.to_string(),
            model,
            root,
            random,
            clean: HashMap::new(),
            dirty_vertex: HashMap::new(),
            dirty_state: HashMap::new(),
        }
    }

    /// Committed configuration as a snapshot tree.
    pub fn to_snapshot(&self) -> StateSnapshot {
        checkpoint::capture(self)
    }

    /// Committed configuration wrapped in a versioned checkpoint.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(&self.name, self.to_snapshot())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &'m Model<M> {
        self.model
    }

    pub fn root(&self) -> StateId {
        self.root
    }

    /// Install a different random source, returning the previous one.
    pub fn set_random(&mut self, random: Box<dyn Random>) -> Box<dyn Random> {
        std::mem::replace(&mut self.random, random)
    }

    /// Run `body` as one transaction.
    ///
    /// Dirty writes made by `body` are committed only if it returns `Ok`.
    pub(crate) fn transaction<T, E>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        self.dirty_vertex.clear();
        self.dirty_state.clear();

        let result = body(self);

        let logger = &self.model.logger;
        match result {
            Ok(_) => {
                let writes = self.dirty_state.len();
                self.clean.extend(self.dirty_state.drain());
                logger.log(Category::TRANSACTION, || {
                    format!("{} commit {writes} region(s)", self.name)
                });
            }
            Err(_) => {
                logger.log(Category::TRANSACTION, || format!("{} rollback", self.name));
            }
        }

        self.dirty_vertex.clear();
        self.dirty_state.clear();
        result
    }

    /// Record `vertex` as the active child of its region for this transaction.
    pub(crate) fn set_vertex(&mut self, vertex: VertexId) {
        if let Some(region) = self.model.vertex_parent(vertex) {
            self.dirty_vertex.insert(region, vertex);
        }
    }

    /// Record `state` as both the active vertex and the active state of its region.
    pub(crate) fn set_state(&mut self, state: StateId) {
        if let Some(region) = self.model.vertex_parent(state) {
            self.dirty_vertex.insert(region, state.into());
            self.dirty_state.insert(region, state);
        }
    }

    /// Active state of a region, reading this transaction's writes first.
    pub fn get_state(&self, region: RegionId) -> Option<StateId> {
        self.dirty_state
            .get(&region)
            .or_else(|| self.clean.get(&region))
            .copied()
    }

    /// Active vertex of a region; may be a pseudostate mid-transaction.
    pub fn get_vertex(&self, region: RegionId) -> Option<VertexId> {
        self.dirty_vertex
            .get(&region)
            .copied()
            .or_else(|| self.clean.get(&region).map(|&state| state.into()))
    }

    /// Last committed state of a region, ignoring in-flight writes.
    pub fn get_last_known_state(&self, region: RegionId) -> Option<StateId> {
        self.clean.get(&region).copied()
    }

    /// Whether `state` and all of its ancestors are active.
    pub fn is_active(&self, state: StateId) -> bool {
        if state == self.root {
            return true;
        }
        match self.model.vertex_parent(state) {
            Some(region) => {
                self.get_state(region) == Some(state)
                    && self.is_active(self.model.region_node(region).parent())
            }
            None => false,
        }
    }

    /// Active states from the root down, regions in creation order.
    pub fn active_states(&self) -> Vec<StateId> {
        let mut active = Vec::new();
        let mut pending = vec![self.root];
        while let Some(state) = pending.pop() {
            active.push(state);
            let regions = self.model.state_node(state).regions();
            pending.extend(
                regions
                    .iter()
                    .rev()
                    .filter_map(|&region| self.get_state(region)),
            );
        }
        active
    }

    /// Qualified names of [`Instance::active_states`].
    pub fn active_state_names(&self) -> Vec<&'m str> {
        let model = self.model;
        self.active_states()
            .into_iter()
            .map(|state| model.state_node(state).qualified_name())
            .collect()
    }
}

impl<M: fmt::Debug> Instance<'_, M> {
    /// Offer a message to the active configuration.
    ///
    /// Returns whether any transition fired. The whole evaluation, including
    /// any cascade of completion transitions, runs in one transaction. On
    /// error nothing is committed, but actions that already ran stay run.
    pub fn evaluate(&mut self, message: &M) -> Result<bool, EvaluationError> {
        let model = self.model;
        model
            .logger
            .log(Category::EVALUATE, || format!("{} evaluate {:?}", self.name, message));
        let root = self.root;
        self.transaction(|instance| engine::evaluate(instance, root, Trigger::Message(message)))
    }
}

impl<M> fmt::Debug for Instance<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("committed", &self.clean.len())
            .finish()
    }
}
