//! State transition trait
//!
//! Small enum state machines implement [`StateTransitions`] instead of
//! hand-writing `if` ladders at every call site. The transition table lives
//! in one `match`, which keeps every (state, event) pair reviewable.

use std::fmt::Debug;
use std::hash::Hash;

/// A state that reacts to events of type `E`
pub trait StateTransitions<E>: Clone + Copy + PartialEq + Eq + Hash + Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: E) -> Option<Self>;

    /// Apply `event` in place. Returns true if the state changed.
    fn apply(&mut self, event: E) -> bool {
        match self.on_event(event) {
            Some(next) if next != *self => {
                *self = next;
                true
            }
            _ => false,
        }
    }
}
