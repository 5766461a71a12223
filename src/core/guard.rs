//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions evaluated against the current trigger.
//! A transition without an explicit guard accepts every trigger, which is what
//! lets it fire as a completion transition.

use super::trigger::Trigger;

type Predicate<M> = Box<dyn Fn(&Trigger<'_, M>) -> bool + Send + Sync>;

/// Pure predicate that determines if a transition can fire.
///
/// # Example
///
/// ```rust
/// use statechart::core::{Guard, Trigger};
///
/// #[derive(Debug, PartialEq)]
/// enum Event {
///     Play,
///     Stop,
/// }
///
/// let on_play = Guard::new(|event: &Event| *event == Event::Play);
///
/// assert!(on_play.check(&Trigger::Message(&Event::Play)));
/// assert!(!on_play.check(&Trigger::Message(&Event::Stop)));
/// assert!(!on_play.check(&Trigger::Start));
/// ```
pub struct Guard<M> {
    predicate: Option<Predicate<M>>,
}

impl<M: 'static> Guard<M> {
    /// Guard over caller messages.
    ///
    /// Completion and start triggers never satisfy a message guard.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&M) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Some(Box::new(move |trigger: &Trigger<'_, M>| {
                trigger.message().is_some_and(|message| predicate(message))
            })),
        }
    }

    /// Guard over the whole trigger, including completion and start triggers.
    pub fn on_trigger<F>(predicate: F) -> Self
    where
        F: Fn(&Trigger<'_, M>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Some(Box::new(predicate)),
        }
    }
}

impl<M> Guard<M> {
    /// Guard that accepts every trigger.
    pub fn always() -> Self {
        Guard { predicate: None }
    }

    /// Check whether the guard allows the transition for this trigger.
    pub fn check(&self, trigger: &Trigger<'_, M>) -> bool {
        self.predicate
            .as_ref()
            .map_or(true, |predicate| predicate(trigger))
    }

    /// True for the default guard installed when no `when` was given.
    pub fn is_unconditional(&self) -> bool {
        self.predicate.is_none()
    }
}

impl<M> Default for Guard<M> {
    fn default() -> Self {
        Self::always()
    }
}
