//! Glide Animation System
//!
//! Interpolation primitives for smooth scrolling.
//!
//! # Features
//!
//! - **Damping**: Frame-rate independent exponential approach (`damp`)
//! - **Tweens**: Fixed-duration motion with easing curves
//! - **Animate**: One interruptible value animation, replaced on retarget
//! - **Frame Scheduler**: One timestamp stream driving many consumers

pub mod animate;
pub mod easing;
pub mod math;
pub mod scheduler;

pub use animate::{Animate, Motion, Step, LERP_REFERENCE_FPS};
pub use easing::Easing;
pub use math::{clamp, damp, lerp, modulo, sign};
pub use scheduler::{FrameCallback, FrameCallbackId, FrameScheduler};
