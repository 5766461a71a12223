//! What a transition is evaluated against.

use super::ids::StateId;
use std::fmt;

/// The trigger observed by guards and actions.
///
/// Callers only ever supply messages; the engine itself produces completion
/// triggers when a state's regions have settled, and the start trigger while
/// an instance performs its first entry of the root.
pub enum Trigger<'a, M> {
    /// A message passed to [`Instance::evaluate`](crate::runtime::Instance::evaluate).
    Message(&'a M),
    /// Completion of the given state.
    Completion(StateId),
    /// Initial entry of an instance.
    Start,
}

impl<'a, M> Trigger<'a, M> {
    /// The caller's message, if this trigger carries one.
    pub fn message(&self) -> Option<&'a M> {
        match self {
            Self::Message(message) => Some(message),
            Self::Completion(_) | Self::Start => None,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, Self::Completion(_))
    }
}

impl<M> Clone for Trigger<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Trigger<'_, M> {}

impl<M: fmt::Debug> fmt::Debug for Trigger<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.debug_tuple("Message").field(message).finish(),
            Self::Completion(state) => f.debug_tuple("Completion").field(state).finish(),
            Self::Start => f.write_str("Start"),
        }
    }
}

/// Behaviour run on entry, on exit, or while traversing a transition.
///
/// Actions are not rolled back when the surrounding evaluation fails, so they
/// should be idempotent or cheap to repeat.
pub type Action<M> = Box<dyn Fn(&Trigger<'_, M>) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_only_exposed_for_messages() {
        let event = "go";
        let message: Trigger<'_, &str> = Trigger::Message(&event);
        let completion: Trigger<'_, &str> = Trigger::Completion(StateId(0));

        assert_eq!(message.message(), Some(&"go"));
        assert_eq!(completion.message(), None);
        assert_eq!(Trigger::<&str>::Start.message(), None);
    }

    #[test]
    fn trigger_is_copy_for_any_message_type() {
        struct NotClone;
        let value = NotClone;
        let trigger = Trigger::Message(&value);
        let copied = trigger;

        assert!(trigger.message().is_some());
        assert!(copied.message().is_some());
        assert!(Trigger::<NotClone>::Completion(StateId(1)).is_completion());
    }

    #[test]
    fn debug_names_the_variant() {
        let event = 7u8;
        assert_eq!(format!("{:?}", Trigger::Message(&event)), "Message(7)");
        assert_eq!(format!("{:?}", Trigger::<u8>::Start), "Start");
    }
}
