//! Validation rules run over a finished model.

use super::violations::ModelViolation;
use crate::model::Model;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<ModelViolation>>;

fn check(ok: bool, violation: impl FnOnce() -> ModelViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Run every rule against `model`, accumulating ALL violations.
///
/// Returns `Validation::Success(())` when the model is clean.
pub fn validate<M>(model: &Model<M>) -> Check {
    let mut checks: Vec<Check> = Vec::new();

    for region in model.regions() {
        let node = model.region_node(region);
        checks.push(check(node.starting().is_some(), || {
            ModelViolation::RegionWithoutStartingVertex {
                region: node.qualified_name().to_string(),
            }
        }));
    }

    for pseudo in model.pseudo_states() {
        let node = model.pseudo_state_node(pseudo);
        let outgoing = node.outgoing();

        if outgoing.is_empty() && node.otherwise().is_none() {
            checks.push(Validation::fail(ModelViolation::PseudoStateCannotComplete {
                vertex: node.qualified_name().to_string(),
            }));
            continue;
        }

        let has_fallback = node.otherwise().is_some()
            || outgoing
                .iter()
                .any(|&transition| model.transition(transition).guard().is_unconditional());
        checks.push(check(has_fallback, || ModelViolation::BranchWithoutElse {
            vertex: node.qualified_name().to_string(),
        }));
    }

    Validation::all_vec(checks).map(|_| ())
}
