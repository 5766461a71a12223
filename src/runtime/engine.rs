//! Dispatch, transition selection, and the leave/enter walk.
//!
//! Every function here runs inside an instance transaction: it reads and
//! writes the instance's dirty maps and reads the model, which never changes
//! during evaluation. Dispatch is depth first. The innermost active state
//! gets the first chance to react, then each enclosing state in turn.

use super::error::EvaluationError;
use super::instance::Instance;
use crate::core::{Element, PseudoStateKind, RegionId, StateId, TransitionId, Trigger, VertexId};
use crate::log::Category;
use crate::model::TransitionKind;

/// Offer a trigger to `state` and everything active beneath it.
pub(crate) fn evaluate<M>(
    instance: &mut Instance<'_, M>,
    state: StateId,
    trigger: Trigger<'_, M>,
) -> Result<bool, EvaluationError> {
    let model = instance.model;
    model.logger.log(Category::EVALUATE, || {
        format!(
            "{} evaluate {}",
            instance.name,
            model.state_node(state).qualified_name()
        )
    });

    let mut handled = delegate(instance, state, trigger)?;
    if !handled {
        handled = accept(instance, state.into(), false, trigger)?;
    }

    if handled && state != instance.root && is_current(instance, state) {
        completion(instance, state, false)?;
    }

    Ok(handled)
}

/// Pass the trigger to the active state of each child region.
fn delegate<M>(
    instance: &mut Instance<'_, M>,
    state: StateId,
    trigger: Trigger<'_, M>,
) -> Result<bool, EvaluationError> {
    let model = instance.model;
    let node = model.state_node(state);
    let mut handled = false;

    for &region in node.regions() {
        let Some(active) = instance.get_state(region) else {
            continue;
        };
        if evaluate(instance, active, trigger)? {
            handled = true;
            // The state itself transitioned away; its other regions are no
            // longer in play.
            if !is_current(instance, state) {
                break;
            }
        }
    }

    Ok(handled)
}

/// Fire the enabled outgoing transition of `vertex`, if any.
fn accept<M>(
    instance: &mut Instance<'_, M>,
    vertex: VertexId,
    deep: bool,
    trigger: Trigger<'_, M>,
) -> Result<bool, EvaluationError> {
    match select(instance, vertex, trigger)? {
        Some(transition) => {
            traverse(instance, transition, deep, trigger)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Pick the outgoing transition of `vertex` enabled by `trigger`.
///
/// A state that matches nothing simply ignores the trigger. A pseudostate
/// always has to move on, so it falls back to its else transition and fails
/// when even that is missing.
fn select<M>(
    instance: &mut Instance<'_, M>,
    vertex: VertexId,
    trigger: Trigger<'_, M>,
) -> Result<Option<TransitionId>, EvaluationError> {
    let model = instance.model;
    let enabled: Vec<TransitionId> = model
        .outgoing(vertex)
        .iter()
        .copied()
        .filter(|&transition| model.transition(transition).can_fire(&trigger))
        .collect();

    let pseudo = match vertex {
        VertexId::State(_) => return unique(instance, vertex, &enabled),
        VertexId::PseudoState(pseudo) => model.pseudo_state_node(pseudo),
    };

    let selected = match (pseudo.kind(), enabled.len()) {
        (_, 0) => None,
        (_, 1) => Some(enabled[0]),
        (PseudoStateKind::Choice, len) => {
            let index = instance.random.get(len).min(len - 1);
            Some(enabled[index])
        }
        _ => unique(instance, vertex, &enabled)?,
    };

    selected
        .or(pseudo.otherwise())
        .map(Some)
        .ok_or_else(|| EvaluationError::MissingTransition {
            vertex: pseudo.qualified_name().to_string(),
        })
}

fn unique<M>(
    instance: &Instance<'_, M>,
    vertex: VertexId,
    enabled: &[TransitionId],
) -> Result<Option<TransitionId>, EvaluationError> {
    match enabled {
        [] => Ok(None),
        [only] => Ok(Some(*only)),
        _ => Err(EvaluationError::AmbiguousTransition {
            vertex: instance.model.vertex_qualified_name(vertex).to_string(),
        }),
    }
}

/// Resolve the compound chain through any junctions, then execute it.
///
/// Every guard on the chain is evaluated before the first action runs.
fn traverse<M>(
    instance: &mut Instance<'_, M>,
    transition: TransitionId,
    deep: bool,
    trigger: Trigger<'_, M>,
) -> Result<(), EvaluationError> {
    let model = instance.model;
    let mut chain = vec![transition];
    let mut target = model.transition(transition).target();

    while model.pseudo_kind(target) == Some(PseudoStateKind::Junction) {
        match select(instance, target, trigger)? {
            Some(next) => {
                chain.push(next);
                target = model.transition(next).target();
            }
            None => break,
        }
    }

    for transition in chain {
        execute(instance, transition, deep, trigger)?;
    }
    Ok(())
}

fn execute<M>(
    instance: &mut Instance<'_, M>,
    id: TransitionId,
    deep: bool,
    trigger: Trigger<'_, M>,
) -> Result<(), EvaluationError> {
    let model = instance.model;
    let transition = model.transition(id);
    model.logger.log(Category::TRANSITION, || {
        format!(
            "{} traverse {} -> {}",
            instance.name,
            model.vertex_qualified_name(transition.source()),
            model.vertex_qualified_name(transition.target())
        )
    });

    let span = match transition.kind() {
        TransitionKind::Internal => {
            for action in &transition.actions {
                action(&trigger);
            }
            if let Some(source) = transition.source().as_state() {
                completion(instance, source, deep)?;
            }
            return Ok(());
        }
        TransitionKind::External(span) | TransitionKind::Local(span) => span,
    };

    leave(instance, span.to_leave, trigger);

    for action in &transition.actions {
        action(&trigger);
    }

    let mut elements = span.to_enter.iter().copied().peekable();
    while let Some(element) = elements.next() {
        enter_head(instance, element, deep, trigger, elements.peek().copied())?;
    }
    if let Some(&last) = span.to_enter.last() {
        enter_tail(instance, last, deep, trigger)?;
    }
    Ok(())
}

/// Leave `element` and everything active beneath it, innermost first.
fn leave<M>(instance: &Instance<'_, M>, element: Element, trigger: Trigger<'_, M>) {
    let model = instance.model;
    match element {
        Element::Region(region) => {
            if let Some(vertex) = instance.get_vertex(region) {
                leave(instance, vertex.into(), trigger);
            }
        }
        Element::Vertex(VertexId::State(state)) => {
            let node = model.state_node(state);
            for &region in node.regions() {
                leave(instance, region.into(), trigger);
            }
            model.logger.log(Category::EXIT, || {
                format!("{} leave {}", instance.name, node.qualified_name())
            });
            for action in &node.exit {
                action(&trigger);
            }
        }
        Element::Vertex(VertexId::PseudoState(pseudo)) => {
            model.logger.log(Category::EXIT, || {
                format!(
                    "{} leave {}",
                    instance.name,
                    model.pseudo_state_node(pseudo).qualified_name()
                )
            });
        }
    }
}

/// Enter `element` completely: record it and then descend into it.
fn enter<M>(
    instance: &mut Instance<'_, M>,
    element: Element,
    deep: bool,
    trigger: Trigger<'_, M>,
) -> Result<(), EvaluationError> {
    enter_head(instance, element, deep, trigger, None)?;
    enter_tail(instance, element, deep, trigger)
}

/// Mark `element` active and run its entry actions.
///
/// `next` is the following element on a transition's entry path. An
/// orthogonal state on that path fully enters every child region except the
/// one the path continues through.
fn enter_head<M>(
    instance: &mut Instance<'_, M>,
    element: Element,
    deep: bool,
    trigger: Trigger<'_, M>,
    next: Option<Element>,
) -> Result<(), EvaluationError> {
    let model = instance.model;
    model.logger.log(Category::ENTRY, || {
        format!(
            "{} enter {}",
            instance.name,
            model.element_qualified_name(element)
        )
    });

    match element {
        Element::Region(_) => {}
        Element::Vertex(VertexId::State(state)) => {
            let node = model.state_node(state);
            instance.set_state(state);
            for action in &node.entry {
                action(&trigger);
            }
            if let Some(next) = next {
                for &region in node.regions() {
                    if Element::Region(region) != next {
                        enter(instance, region.into(), deep, trigger)?;
                    }
                }
            }
        }
        Element::Vertex(vertex @ VertexId::PseudoState(_)) => {
            instance.set_vertex(vertex);
        }
    }
    Ok(())
}

/// Structural descent below an element whose head has already run.
fn enter_tail<M>(
    instance: &mut Instance<'_, M>,
    element: Element,
    deep: bool,
    trigger: Trigger<'_, M>,
) -> Result<(), EvaluationError> {
    let model = instance.model;
    match element {
        Element::Region(region) => enter_region(instance, region, deep, trigger),
        Element::Vertex(VertexId::State(state)) => {
            for &region in model.state_node(state).regions() {
                enter(instance, region.into(), deep, trigger)?;
            }
            completion(instance, state, deep)?;
            Ok(())
        }
        Element::Vertex(vertex @ VertexId::PseudoState(_)) => {
            // Junctions are continued by the chain that reached them.
            if model.pseudo_kind(vertex) != Some(PseudoStateKind::Junction) {
                accept(instance, vertex, deep, trigger)?;
            }
            Ok(())
        }
    }
}

/// Enter a region through history or through its starting vertex.
fn enter_region<M>(
    instance: &mut Instance<'_, M>,
    region: RegionId,
    deep: bool,
    trigger: Trigger<'_, M>,
) -> Result<(), EvaluationError> {
    let model = instance.model;
    let node = model.region_node(region);
    let starting = node.starting();
    let kind = starting.map(|pseudo| model.pseudo_state_node(pseudo).kind());

    let deep_next = deep || kind == Some(PseudoStateKind::DeepHistory);
    let resume = if deep || kind.is_some_and(PseudoStateKind::is_history) {
        instance.get_last_known_state(region)
    } else {
        None
    };

    let vertex = resume
        .map(VertexId::from)
        .or(starting.map(VertexId::from))
        .ok_or_else(|| EvaluationError::MissingStartingVertex {
            region: node.qualified_name().to_string(),
        })?;
    enter(instance, vertex.into(), deep_next, trigger)
}

/// Fire a completion transition out of `state` once all of its regions
/// have settled on a state with no outgoing transitions.
fn completion<M>(
    instance: &mut Instance<'_, M>,
    state: StateId,
    deep: bool,
) -> Result<bool, EvaluationError> {
    let model = instance.model;
    let settled = model.state_node(state).regions().iter().all(|&region| {
        instance
            .get_state(region)
            .is_some_and(|active| model.state_node(active).is_final())
    });

    if settled {
        accept(instance, state.into(), deep, Trigger::Completion(state))
    } else {
        Ok(false)
    }
}

/// Whether `state` and every state above it are still in play. Exits leave
/// stale records behind in the regions they close, so the whole ancestor
/// chain up to the instance root has to be checked.
fn is_current<M>(instance: &Instance<'_, M>, state: StateId) -> bool {
    instance.is_active(state)
}

/// Perform the initial entry of an instance's root.
pub(crate) fn start<M>(instance: &mut Instance<'_, M>) -> Result<(), EvaluationError> {
    let root = instance.root;
    enter(instance, root.into(), false, Trigger::Start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PseudoStateKind;
    use crate::model::Model;
    use crate::runtime::InstanceBuilder;
    use std::sync::{Arc, Mutex};

    type Journal = Arc<Mutex<Vec<String>>>;

    fn record(journal: &Journal, entry: &str) -> impl Fn(&Trigger<'_, &'static str>) + Send + Sync {
        let journal = Arc::clone(journal);
        let entry = entry.to_string();
        move |_| journal.lock().unwrap().push(entry.clone())
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    #[test]
    fn unguarded_transition_out_of_a_simple_state_fires_on_entry() {
        let mut model: Model<&str> = Model::new("root");
        let root = model.root();
        let initial = model
            .pseudo_state("initial", root, PseudoStateKind::Initial)
            .unwrap();
        let a = model.state("a", root).unwrap();
        let b = model.state("b", root).unwrap();
        model.external(initial, a);
        model.external(a, b);

        let instance = InstanceBuilder::new("test", &model).build().unwrap();

        assert!(instance.is_active(b));
        assert!(!instance.is_active(a));
    }

    #[test]
    fn exits_run_innermost_first_and_entries_outermost_first() {
        let journal = Journal::default();
        let mut model: Model<&str> = Model::new("root");
        let root = model.root();
        let initial = model
            .pseudo_state("initial", root, PseudoStateKind::Initial)
            .unwrap();
        let outer = model.state("outer", root).unwrap();
        let inner_initial = model
            .pseudo_state("initial", outer, PseudoStateKind::Initial)
            .unwrap();
        let inner = model.state("inner", outer).unwrap();
        let other = model.state("other", root).unwrap();
        let nested = model.state("nested", other).unwrap();

        model.external(initial, outer);
        model.external(inner_initial, inner);
        model
            .external(inner, nested)
            .when(|event: &&str| *event == "go")
            .effect(record(&journal, "effect"));
        model
            .exit(outer, record(&journal, "exit outer"))
            .exit(inner, record(&journal, "exit inner"))
            .entry(other, record(&journal, "enter other"))
            .entry(nested, record(&journal, "enter nested"));

        let mut instance = InstanceBuilder::new("test", &model).build().unwrap();
        assert!(instance.evaluate(&"go").unwrap());

        assert_eq!(
            entries(&journal),
            vec!["exit inner", "exit outer", "effect", "enter other", "enter nested"]
        );
        assert!(instance.is_active(nested));
    }

    #[test]
    fn ambiguous_guards_abort_the_evaluation() {
        let mut model: Model<&str> = Model::new("root");
        let root = model.root();
        let initial = model
            .pseudo_state("initial", root, PseudoStateKind::Initial)
            .unwrap();
        let a = model.state("a", root).unwrap();
        let b = model.state("b", root).unwrap();
        let c = model.state("c", root).unwrap();
        model.external(initial, a);
        model.external(a, b).when(|event: &&str| event.starts_with('x'));
        model.external(a, c).when(|event: &&str| event.ends_with('y'));

        let mut instance = InstanceBuilder::new("test", &model).build().unwrap();

        assert!(matches!(
            instance.evaluate(&"xy"),
            Err(EvaluationError::AmbiguousTransition { .. })
        ));
        assert!(instance.is_active(a));
        assert!(instance.evaluate(&"xa").unwrap());
        assert!(instance.is_active(b));
    }

    #[test]
    fn junction_without_match_or_else_fails_before_any_action() {
        let journal = Journal::default();
        let mut model: Model<&str> = Model::new("root");
        let root = model.root();
        let initial = model
            .pseudo_state("initial", root, PseudoStateKind::Initial)
            .unwrap();
        let a = model.state("a", root).unwrap();
        let b = model.state("b", root).unwrap();
        let junction = model
            .pseudo_state("junction", root, PseudoStateKind::Junction)
            .unwrap();
        model.external(initial, a);
        model
            .external(a, junction)
            .when(|event: &&str| *event == "go")
            .effect(record(&journal, "first segment"));
        model
            .external(junction, b)
            .when(|event: &&str| *event == "never");
        model.exit(a, record(&journal, "exit a"));

        let mut instance = InstanceBuilder::new("test", &model).build().unwrap();

        assert!(matches!(
            instance.evaluate(&"go"),
            Err(EvaluationError::MissingTransition { .. })
        ));
        assert!(entries(&journal).is_empty());
        assert!(instance.is_active(a));
    }

    #[test]
    fn choice_consults_the_random_source_only_on_ties() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut model: Model<&str> = Model::new("root");
        let root = model.root();
        let initial = model
            .pseudo_state("initial", root, PseudoStateKind::Initial)
            .unwrap();
        let idle = model.state("idle", root).unwrap();
        let choice = model
            .pseudo_state("choice", root, PseudoStateKind::Choice)
            .unwrap();
        let first = model.state("first", root).unwrap();
        let second = model.state("second", root).unwrap();
        model.external(initial, idle);
        model.external(idle, choice).when(|event: &&str| *event == "pick");
        model.external(choice, first).when(|_: &&str| true);
        model.external(choice, second).when(|_: &&str| true);

        let seen = Arc::clone(&calls);
        let mut instance = InstanceBuilder::new("test", &model)
            .random(move |max: usize| {
                seen.lock().unwrap().push(max);
                max - 1
            })
            .build()
            .unwrap();

        assert!(instance.evaluate(&"pick").unwrap());
        assert!(instance.is_active(second));
        assert!(!instance.is_active(first));
        assert_eq!(*calls.lock().unwrap(), vec![2]);
    }

    #[test]
    fn region_without_starting_vertex_cannot_be_entered() {
        let mut model: Model<&str> = Model::new("root");
        let root = model.root();
        model.state("orphan", root).unwrap();

        assert!(matches!(
            InstanceBuilder::new("test", &model).build(),
            Err(EvaluationError::MissingStartingVertex { .. })
        ));
    }

    #[test]
    fn internal_transition_runs_actions_without_exit_or_entry() {
        let journal = Journal::default();
        let mut model: Model<&str> = Model::new("root");
        let root = model.root();
        let initial = model
            .pseudo_state("initial", root, PseudoStateKind::Initial)
            .unwrap();
        let a = model.state("a", root).unwrap();
        model.external(initial, a);
        model
            .internal(a)
            .when(|event: &&str| *event == "tick")
            .effect(record(&journal, "tick"));
        model
            .entry(a, record(&journal, "enter a"))
            .exit(a, record(&journal, "exit a"));

        let mut instance = InstanceBuilder::new("test", &model).build().unwrap();
        assert!(instance.evaluate(&"tick").unwrap());

        assert_eq!(entries(&journal), vec!["enter a", "tick"]);
        assert!(instance.is_active(a));
    }

    #[test]
    fn entering_a_nested_target_starts_orthogonal_siblings() {
        let mut model: Model<&str> = Model::new("root");
        let root = model.root();
        let initial = model
            .pseudo_state("initial", root, PseudoStateKind::Initial)
            .unwrap();
        let idle = model.state("idle", root).unwrap();
        let busy = model.state("busy", root).unwrap();
        let left = model.region("left", busy);
        let right = model.region("right", busy);
        let left_initial = model
            .pseudo_state("initial", left, PseudoStateKind::Initial)
            .unwrap();
        let left_a = model.state("a", left).unwrap();
        let left_b = model.state("b", left).unwrap();
        let right_initial = model
            .pseudo_state("initial", right, PseudoStateKind::Initial)
            .unwrap();
        let right_a = model.state("a", right).unwrap();

        model.external(initial, idle);
        model.external(left_initial, left_a);
        model.external(right_initial, right_a);
        model
            .external(idle, left_b)
            .when(|event: &&str| *event == "jump");

        let mut instance = InstanceBuilder::new("test", &model).build().unwrap();
        assert!(instance.evaluate(&"jump").unwrap());

        assert!(instance.is_active(busy));
        assert!(instance.is_active(left_b));
        assert!(!instance.is_active(left_a));
        assert!(instance.is_active(right_a));
    }

    #[test]
    fn leaving_an_ancestor_stops_dispatch_to_sibling_regions() {
        let journal = Journal::default();
        let mut model: Model<&str> = Model::new("root");
        let root = model.root();
        let initial = model
            .pseudo_state("initial", root, PseudoStateKind::Initial)
            .unwrap();
        let outer = model.state("outer", root).unwrap();
        let elsewhere = model.state("elsewhere", root).unwrap();
        let outer_initial = model
            .pseudo_state("initial", outer, PseudoStateKind::Initial)
            .unwrap();
        let split = model.state("split", outer).unwrap();
        let first = model.region("first", split);
        let second = model.region("second", split);
        let first_initial = model
            .pseudo_state("initial", first, PseudoStateKind::Initial)
            .unwrap();
        let a = model.state("a", first).unwrap();
        let second_initial = model
            .pseudo_state("initial", second, PseudoStateKind::Initial)
            .unwrap();
        let b = model.state("b", second).unwrap();
        let c = model.state("c", second).unwrap();

        model.external(initial, outer);
        model.external(outer_initial, split);
        model.external(first_initial, a);
        model.external(second_initial, b);
        model.external(a, elsewhere).when(|event: &&str| *event == "go");
        model.external(b, c).when(|event: &&str| *event == "go");
        model
            .exit(a, record(&journal, "exit a"))
            .exit(b, record(&journal, "exit b"))
            .exit(split, record(&journal, "exit split"))
            .exit(outer, record(&journal, "exit outer"))
            .entry(elsewhere, record(&journal, "enter elsewhere"))
            .entry(c, record(&journal, "enter c"));

        let mut instance = InstanceBuilder::new("test", &model).build().unwrap();
        assert!(instance.evaluate(&"go").unwrap());

        assert_eq!(
            entries(&journal),
            vec!["exit a", "exit b", "exit split", "exit outer", "enter elsewhere"]
        );
        assert!(instance.is_active(elsewhere));
        assert!(!instance.is_active(c));
        assert_eq!(instance.get_last_known_state(second), Some(b));
    }
}
