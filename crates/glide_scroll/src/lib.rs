//! Glide Scroll
//!
//! Smooth scrolling for one scroll container at a time. The controller keeps
//! a virtual offset, eases it toward a target set by wheel/touch gestures or
//! `scroll_to`, and writes it back to the host once per frame.
//!
//! # Example
//!
//! ```rust
//! use glide_core::WheelInput;
//! use glide_scroll::{MemoryHost, ScrollController, ScrollOptions, Size};
//!
//! let host = MemoryHost::page(Size::new(1200.0, 900.0), Size::new(1200.0, 2400.0));
//! let mut scroller = ScrollController::window(host, ScrollOptions::default()).unwrap();
//!
//! let response = scroller.on_wheel(&mut WheelInput::pixels(0.0, 120.0));
//! assert!(response.prevent_default);
//! assert_eq!(scroller.target_scroll(), 120.0);
//!
//! let mut time = 0.0;
//! while scroller.is_animating() {
//!     time += 1000.0 / 60.0;
//!     scroller.raf(time);
//! }
//! assert_eq!(scroller.scroll(), 120.0);
//! ```

pub mod controller;
pub mod dimensions;
pub mod error;
pub mod host;
pub mod memory_host;
pub mod options;
pub mod prevent;
pub mod state;
pub mod target;
pub mod virtual_scroll;

pub use controller::ScrollController;
pub use dimensions::{DimensionTracker, Dimensions};
pub use error::{GlideError, Result};
pub use host::{
    Axis, NodeStyle, ObserverId, Overflow, Rect, ScrollContainer, ScrollHost, ScrollRoot, Size,
};
pub use memory_host::{MemoryHost, MemoryNode};
pub use options::{
    AnchorOptions, GestureOrientation, Orientation, PreventFn, ScrollHooks, ScrollOptions,
    VirtualScrollFn,
};
pub use prevent::NestedScrollCache;
pub use state::{Direction, Gate, ModeEvent, ScrollSnapshot, ScrollingMode};
pub use target::{Keyword, ScrollCallback, ScrollTarget, ScrollToOptions};
pub use virtual_scroll::{GestureEvent, GestureSource, VirtualScroll, LINE_HEIGHT};
