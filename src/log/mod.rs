//! Logging side channel.
//!
//! Every model owns a [`Logger`]. The engine reports what it does through it,
//! tagged with a [`Category`]. Each event is forwarded to `tracing` at TRACE
//! level under the `statechart` target, and to any callbacks subscribed for
//! that category. Messages are built lazily and at most once per event.
//!
//! Logging never influences evaluation.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use tracing::Level;

/// Bitmask of logging categories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Category(u8);

impl Category {
    pub const NONE: Self = Self(0);
    pub const CREATE: Self = Self(1);
    pub const ENTRY: Self = Self(1 << 1);
    pub const EXIT: Self = Self(1 << 2);
    pub const EVALUATE: Self = Self(1 << 3);
    pub const TRANSITION: Self = Self(1 << 4);
    pub const TRANSACTION: Self = Self(1 << 5);
    pub const USER: Self = Self(1 << 6);
    pub const ALL: Self = Self(0x7f);

    const NAMES: [(Self, &'static str); 7] = [
        (Self::CREATE, "create"),
        (Self::ENTRY, "entry"),
        (Self::EXIT, "exit"),
        (Self::EVALUATE, "evaluate"),
        (Self::TRANSITION, "transition"),
        (Self::TRANSACTION, "transaction"),
        (Self::USER, "user"),
    ];

    /// True when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when `self` and `other` share at least one bit.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Category {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Category {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (category, name) in Self::NAMES {
            if self.contains(category) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Identifies a callback registered with [`Logger::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Callback = Box<dyn Fn(Category, &str) + Send + Sync>;

struct Subscriber {
    id: SubscriptionId,
    categories: Category,
    callback: Callback,
}

/// Fan-out of log events to subscribed callbacks and to `tracing`.
///
/// Callbacks run in registration order. A callback must not subscribe or
/// unsubscribe on the logger that is calling it.
///
/// # Example
///
/// ```rust
/// use statechart::log::{Category, Logger};
/// use std::sync::{Arc, Mutex};
///
/// let logger = Logger::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let id = logger.subscribe(Category::ENTRY | Category::EXIT, move |_, message| {
///     sink.lock().unwrap().push(message.to_string());
/// });
///
/// logger.log(Category::ENTRY, || "enter idle".to_string());
/// logger.log(Category::EVALUATE, || "not delivered".to_string());
/// logger.unsubscribe(id);
/// logger.log(Category::EXIT, || "not delivered either".to_string());
///
/// assert_eq!(*seen.lock().unwrap(), vec!["enter idle".to_string()]);
/// ```
pub struct Logger {
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicUsize,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicUsize::new(0),
        }
    }

    /// Register a callback for every event whose category intersects `categories`.
    pub fn subscribe<F>(&self, categories: Category, callback: F) -> SubscriptionId
    where
        F: Fn(Category, &str) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscriber {
                id,
                categories,
                callback: Box::new(callback),
            });
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.id != id);
        subscribers.len() != before
    }

    /// Report an event. `message` is only called if someone is listening.
    pub fn log<F>(&self, category: Category, message: F)
    where
        F: FnOnce() -> String,
    {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let traced = tracing::enabled!(target: "statechart", Level::TRACE);
        let subscribed = subscribers
            .iter()
            .any(|subscriber| subscriber.categories.intersects(category));

        if !traced && !subscribed {
            return;
        }

        let message = message();
        if traced {
            tracing::trace!(target: "statechart", category = %category, "{}", message);
        }
        for subscriber in subscribers
            .iter()
            .filter(|subscriber| subscriber.categories.intersects(category))
        {
            (subscriber.callback)(category, &message);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Logger")
            .field("subscribers", &subscribers)
            .finish()
    }
}
