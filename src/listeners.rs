//! Listeners
//!
//! Components that want to follow a basket implement [`BasketListener`] and
//! register a shared handle with a [`BasketEngine`]. Every change is pushed to
//! every registered listener synchronously, together with a [`SignalStrength`]
//! hint that the engine passes through without interpreting.
//!
//! Registration has set semantics keyed on the identity of the shared handle,
//! and delivery order across listeners is unspecified.

use std::{fmt, rc::Rc, str::FromStr};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::trace;

use crate::{engine::BasketEngine, error::ErrorKind};

/// Hint accompanying a change notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SignalStrength {
    /// An isolated edit: a category emptied by it should be treated as gone.
    #[default]
    Strong,

    /// One step of a batch of edits: a category emptied by it should stay visible.
    Weak,
}

impl SignalStrength {
    /// Whether listeners should drop a category whose quantity reached zero.
    pub fn drops_emptied_categories(self) -> bool {
        matches!(self, SignalStrength::Strong)
    }
}

/// Errors raised while parsing a signal strength token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignalStrengthError {
    /// The token was neither `strong` nor `weak`.
    #[error("unrecognised signal strength {0:?}, expected \"strong\" or \"weak\"")]
    Unrecognised(String),
}

impl SignalStrengthError {
    /// Taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SignalStrengthError::Unrecognised(_) => ErrorKind::InvalidArgument,
        }
    }
}

impl FromStr for SignalStrength {
    type Err = SignalStrengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strong" => Ok(SignalStrength::Strong),
            "weak" => Ok(SignalStrength::Weak),
            other => Err(SignalStrengthError::Unrecognised(other.to_string())),
        }
    }
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalStrength::Strong => f.write_str("strong"),
            SignalStrength::Weak => f.write_str("weak"),
        }
    }
}

/// Receiver of basket change notifications.
///
/// The engine passes itself so the listener can pull whichever totals or
/// counts it needs. Listeners that keep state use interior mutability.
pub trait BasketListener {
    /// Called after every change to the basket of an engine this listener is
    /// registered with.
    ///
    /// # Parameters
    ///
    /// - `engine`: The engine whose basket changed
    /// - `strength`: Whether emptied categories should be dropped (`Strong`)
    ///   or retained (`Weak`)
    fn on_basket_changed(&self, engine: &BasketEngine, strength: SignalStrength);
}

/// Identity of a registered listener: the address of its shared allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

impl ListenerId {
    /// Identity of the listener behind a shared handle.
    pub fn of<L: ?Sized>(listener: &Rc<L>) -> Self {
        ListenerId(Rc::as_ptr(listener).cast::<()>().addr())
    }
}

/// De-duplicating, unordered set of listeners.
#[derive(Default)]
pub struct ListenerSet {
    listeners: FxHashMap<ListenerId, Rc<dyn BasketListener>>,
}

impl ListenerSet {
    /// Create an empty listener set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener, returning `false` if it was already present.
    pub fn insert(&mut self, listener: Rc<dyn BasketListener>) -> bool {
        let id = ListenerId::of(&listener);

        if self.listeners.contains_key(&id) {
            return false;
        }

        self.listeners.insert(id, listener);

        true
    }

    /// Remove a listener, returning `false` if it was not present.
    pub fn remove<L: ?Sized>(&mut self, listener: &Rc<L>) -> bool {
        self.listeners.remove(&ListenerId::of(listener)).is_some()
    }

    /// Check whether a listener is present.
    pub fn contains<L: ?Sized>(&self, listener: &Rc<L>) -> bool {
        self.listeners.contains_key(&ListenerId::of(listener))
    }

    /// Invoke every listener with the engine and strength.
    pub fn notify(&self, engine: &BasketEngine, strength: SignalStrength) {
        for (id, listener) in &self.listeners {
            trace!(listener = ?id, %strength, "dispatching basket change");

            listener.on_basket_changed(engine, strength);
        }
    }

    /// Get the number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if there are no listeners.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.listeners.len())
            .finish()
    }
}
