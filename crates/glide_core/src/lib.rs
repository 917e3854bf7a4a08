//! Glide Core Runtime
//!
//! This crate provides the foundational primitives for the Glide scroll engine:
//!
//! - **Input Events**: Host-neutral wheel and touch events with a composed path
//! - **Emitters**: Typed publish/subscribe with RAII subscriptions
//! - **State Transitions**: Table-driven enum state machines
//! - **Timers**: Clocks, cancel-and-reschedule timeouts and debouncers
//!
//! # Example
//!
//! ```rust
//! use glide_core::Emitter;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let emitter = Emitter::<f64>::new();
//! let last = Rc::new(Cell::new(0.0));
//!
//! let seen = last.clone();
//! let subscription = emitter.subscribe(move |offset| seen.set(*offset));
//!
//! emitter.emit(&120.0);
//! assert_eq!(last.get(), 120.0);
//!
//! drop(subscription);
//! emitter.emit(&240.0);
//! assert_eq!(last.get(), 120.0);
//! ```

pub mod emitter;
pub mod events;
pub mod state;
pub mod timer;

pub use emitter::{Emitter, ListenerId, Subscription};
pub use events::{
    DeltaMode, EventPath, InputResponse, Modifiers, NodeId, TouchInput, TouchPhase, WheelInput,
};
pub use state::StateTransitions;
pub use timer::{Clock, Debouncer, ManualClock, SystemClock, Timeout};
