//! Typed publish/subscribe
//!
//! An [`Emitter<T>`] delivers `&T` to every listener registered on it.
//! Registering returns a [`Subscription`]; dropping the subscription removes
//! the listener, so a forgotten handle cannot leak a callback.
//!
//! Dispatch is synchronous. The listener list is snapshotted before
//! delivery, so listeners may drop their own (or another) subscription while
//! an event is being delivered. A listener removed mid-dispatch is not
//! called for the remainder of that dispatch. A listener that re-emits on
//! the emitter it is subscribed to is skipped for the nested emit.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Identifier of a registered listener
    pub struct ListenerId;
}

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;
type ListenerMap<T> = RefCell<SlotMap<ListenerId, Listener<T>>>;

/// A single-threaded, typed event channel
pub struct Emitter<T: 'static> {
    listeners: Rc<ListenerMap<T>>,
}

impl<T: 'static> Emitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(SlotMap::with_key())),
        }
    }

    /// Register a listener. It stays registered while the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription immediately unsubscribes the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let listener: Listener<T> = Rc::new(RefCell::new(listener));
        let id = self.listeners.borrow_mut().insert(listener);
        let weak: Weak<ListenerMap<T>> = Rc::downgrade(&self.listeners);
        Subscription {
            id,
            unsubscribe: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    listeners.borrow_mut().remove(id);
                }
            })),
        }
    }

    /// Deliver `value` to every listener registered at the time of the call
    pub fn emit(&self, value: &T) {
        let snapshot: SmallVec<[(ListenerId, Listener<T>); 4]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            if !self.listeners.borrow().contains_key(id) {
                continue;
            }
            match listener.try_borrow_mut() {
                Ok(mut callback) => callback(value),
                Err(_) => tracing::trace!("skipping re-entrant listener {:?}", id),
            }
        }
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Remove every listener. Outstanding subscriptions become inert.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> std::fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle to a registered listener
///
/// Dropping it unsubscribes. Call [`Subscription::detach`] to keep the
/// listener for as long as the emitter lives.
pub struct Subscription {
    id: ListenerId,
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Identifier of the underlying listener
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Unsubscribe now
    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }

    /// Give up the handle without unsubscribing
    pub fn detach(mut self) {
        self.unsubscribe = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.unsubscribe.is_some())
            .finish()
    }
}
