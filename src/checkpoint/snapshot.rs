//! The committed configuration as a tree of names.

use super::error::CheckpointError;
use crate::core::{RegionId, StateId};
use crate::runtime::Instance;
use serde::{Deserialize, Serialize};

/// A state and, for each of its regions, what that region last held.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub name: String,
    pub children: Vec<RegionSnapshot>,
}

/// A region, its child states, and the name of its last committed state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSnapshot {
    pub name: String,
    pub children: Vec<StateSnapshot>,
    /// Absent if the region has never been entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_known_state: Option<String>,
}

/// Snapshot of a whole instance, rooted at its root state.
pub type Snapshot = StateSnapshot;

pub(crate) fn capture<M>(instance: &Instance<'_, M>) -> StateSnapshot {
    capture_state(instance, instance.root())
}

fn capture_state<M>(instance: &Instance<'_, M>, state: StateId) -> StateSnapshot {
    let node = instance.model().state_node(state);
    StateSnapshot {
        name: node.name().to_string(),
        children: node
            .regions()
            .iter()
            .map(|&region| capture_region(instance, region))
            .collect(),
    }
}

fn capture_region<M>(instance: &Instance<'_, M>, region: RegionId) -> RegionSnapshot {
    let model = instance.model();
    let node = model.region_node(region);
    RegionSnapshot {
        name: node.name().to_string(),
        children: node
            .vertices()
            .iter()
            .filter_map(|vertex| vertex.as_state())
            .map(|state| capture_state(instance, state))
            .collect(),
        last_known_state: instance
            .get_last_known_state(region)
            .map(|state| model.state_node(state).name().to_string()),
    }
}

/// Record every `lastKnownState` in the snapshot as the active state of its
/// region. Must run inside a transaction.
pub(crate) fn apply<M>(
    instance: &mut Instance<'_, M>,
    snapshot: &StateSnapshot,
) -> Result<(), CheckpointError> {
    let root = instance.root();
    let expected = instance.model().state_node(root).name();
    if snapshot.name != expected {
        return Err(CheckpointError::RootMismatch {
            expected: expected.to_string(),
            found: snapshot.name.clone(),
        });
    }
    apply_state(instance, root, snapshot)
}

fn apply_state<M>(
    instance: &mut Instance<'_, M>,
    state: StateId,
    snapshot: &StateSnapshot,
) -> Result<(), CheckpointError> {
    let model = instance.model();
    for child in &snapshot.children {
        let region = model.find_region(state, &child.name).ok_or_else(|| {
            CheckpointError::UnknownRegion {
                state: model.state_node(state).qualified_name().to_string(),
                name: child.name.clone(),
            }
        })?;
        apply_region(instance, region, child)?;
    }
    Ok(())
}

fn apply_region<M>(
    instance: &mut Instance<'_, M>,
    region: RegionId,
    snapshot: &RegionSnapshot,
) -> Result<(), CheckpointError> {
    let model = instance.model();
    let find = |name: &str| {
        model
            .find_state(region, name)
            .ok_or_else(|| CheckpointError::UnknownState {
                region: model.region_node(region).qualified_name().to_string(),
                name: name.to_string(),
            })
    };

    if let Some(last) = &snapshot.last_known_state {
        instance.set_state(find(last)?);
    }
    for child in &snapshot.children {
        apply_state(instance, find(&child.name)?, child)?;
    }
    Ok(())
}
