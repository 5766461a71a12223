//! Property-based tests for models and instances.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use statechart::checkpoint::Checkpoint;
use statechart::core::{PseudoStateKind, StateId};
use statechart::model::{Model, ModelError};
use statechart::runtime::{Instance, InstanceBuilder};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Event {
    Play,
    Pause,
    Stop,
    Fault,
    Reset,
    Noise,
}

prop_compose! {
    fn arbitrary_event()(variant in 0..5u8) -> Event {
        match variant {
            0 => Event::Play,
            1 => Event::Pause,
            2 => Event::Stop,
            3 => Event::Fault,
            _ => Event::Reset,
        }
    }
}

prop_compose! {
    fn arbitrary_starting_kind()(variant in 0..3u8) -> PseudoStateKind {
        match variant {
            0 => PseudoStateKind::Initial,
            1 => PseudoStateKind::ShallowHistory,
            _ => PseudoStateKind::DeepHistory,
        }
    }
}

/// A player nested in an operational state that can fault and resume
/// through deep history.
fn player() -> Model<Event> {
    let mut model = Model::new("device");
    let root = model.root();
    let initial = model
        .pseudo_state("initial", root, PseudoStateKind::Initial)
        .unwrap();
    let operational = model.state("operational", root).unwrap();
    let faulted = model.state("faulted", root).unwrap();

    let history = model
        .pseudo_state("history", operational, PseudoStateKind::DeepHistory)
        .unwrap();
    let stopped = model.state("stopped", operational).unwrap();
    let active = model.state("active", operational).unwrap();

    let active_initial = model
        .pseudo_state("initial", active, PseudoStateKind::Initial)
        .unwrap();
    let running = model.state("running", active).unwrap();
    let paused = model.state("paused", active).unwrap();

    model.external(initial, operational);
    model.external(history, stopped);
    model.external(active_initial, running);

    model.external(stopped, active).when(|e: &Event| *e == Event::Play);
    model.external(active, stopped).when(|e: &Event| *e == Event::Stop);
    model.external(running, paused).when(|e: &Event| *e == Event::Pause);
    model.external(paused, running).when(|e: &Event| *e == Event::Play);
    model
        .external(operational, faulted)
        .when(|e: &Event| *e == Event::Fault);
    model
        .external(faulted, history)
        .when(|e: &Event| *e == Event::Reset);
    model
}

fn last_known_states(instance: &Instance<'_, Event>) -> Vec<Option<StateId>> {
    instance
        .model()
        .regions()
        .map(|region| instance.get_last_known_state(region))
        .collect()
}

proptest! {
    #[test]
    fn duplicate_sibling_names_are_rejected(
        name in "[a-z]{1,8}",
        siblings in 0..4usize,
    ) {
        let mut model: Model<()> = Model::new("root");
        let root = model.root();
        for index in 0..siblings {
            model.state(&format!("Sibling{index}"), root).unwrap();
        }
        model.state(&name, root).unwrap();

        let duplicate = model.state(&name, root);
        prop_assert!(
            matches!(duplicate, Err(ModelError::DuplicateState { .. })),
            "expected DuplicateState error"
        );

        let other = model.region("other", root);
        prop_assert!(model.state(&name, other).is_ok());
    }

    #[test]
    fn second_starting_pseudostate_is_rejected(
        first in arbitrary_starting_kind(),
        second in arbitrary_starting_kind(),
    ) {
        let mut model: Model<()> = Model::new("root");
        let root = model.root();
        model.pseudo_state("first", root, first).unwrap();

        let result = model.pseudo_state("second", root, second);
        prop_assert!(
            matches!(result, Err(ModelError::DuplicateStartingVertex { .. })),
            "expected DuplicateStartingVertex error"
        );
    }

    #[test]
    fn snapshot_roundtrip_preserves_last_known_states(
        events in proptest::collection::vec(arbitrary_event(), 0..24),
    ) {
        let model = player();
        let mut instance = Instance::new("live", &model).unwrap();
        for event in &events {
            prop_assert!(instance.evaluate(event).is_ok());
        }

        let restored = Instance::restore("copy", &model, &instance.to_snapshot()).unwrap();
        prop_assert_eq!(last_known_states(&restored), last_known_states(&instance));
        prop_assert_eq!(restored.active_states(), instance.active_states());

        let json = instance.checkpoint().to_json().unwrap();
        let checkpoint = Checkpoint::from_json(&json).unwrap();
        let resumed = Instance::restore(&checkpoint.instance, &model, &checkpoint.snapshot).unwrap();
        prop_assert_eq!(last_known_states(&resumed), last_known_states(&instance));
    }

    #[test]
    fn unmatched_trigger_changes_nothing(
        events in proptest::collection::vec(arbitrary_event(), 0..24),
    ) {
        let model = player();
        let mut instance = Instance::new("live", &model).unwrap();
        for event in &events {
            instance.evaluate(event).unwrap();
        }
        let before = instance.to_snapshot();
        let active = instance.active_states();

        let handled = instance.evaluate(&Event::Noise).unwrap();

        prop_assert!(!handled);
        prop_assert_eq!(instance.to_snapshot(), before);
        prop_assert_eq!(instance.active_states(), active);
    }

    #[test]
    fn choice_with_zero_random_takes_the_first_match(
        branches in 2..6usize,
        rounds in 1..5usize,
    ) {
        let mut model: Model<u32> = Model::new("root");
        let root = model.root();
        let initial = model
            .pseudo_state("initial", root, PseudoStateKind::Initial)
            .unwrap();
        let idle = model.state("idle", root).unwrap();
        let choice = model
            .pseudo_state("choice", root, PseudoStateKind::Choice)
            .unwrap();
        model.external(initial, idle);
        model.external(idle, choice).when(|n: &u32| *n == 0);

        let mut targets = Vec::new();
        for index in 0..branches {
            let target = model.state(&format!("branch{index}"), root).unwrap();
            model.external(choice, target).when(|_: &u32| true);
            model.external(target, idle).when(|n: &u32| *n == 1);
            targets.push(target);
        }

        let mut instance = InstanceBuilder::new("chooser", &model)
            .random(|_max: usize| 0)
            .build()
            .unwrap();

        for _ in 0..rounds {
            prop_assert!(instance.evaluate(&0).unwrap());
            prop_assert!(instance.is_active(targets[0]));
            prop_assert!(instance.evaluate(&1).unwrap());
            prop_assert!(instance.is_active(idle));
        }
    }
}
