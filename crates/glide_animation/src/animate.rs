//! Single-value scroll animation
//!
//! [`Animate`] moves one number from `from` to `to` using a [`Motion`]:
//!
//! - **Lerp**: exponential damping, `value = damp(value, to, factor * 60, dt)`.
//!   The factor is normalized to a 60fps reference so the motion is frame-rate
//!   independent. Completes once `value` rounds to `to`.
//! - **Tween**: fixed duration with an easing curve. Completes when the linear
//!   progress reaches 1.
//! - **Jump**: lands on `to` on the next advance.
//!
//! Starting a new motion with [`Animate::from_to`] replaces the current one.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::math::{clamp, damp};

/// Reference frame rate the lerp factor is expressed against
pub const LERP_REFERENCE_FPS: f64 = 60.0;

/// How an animation travels toward its target
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Exponential damping with a per-frame factor in `(0, 1]`
    Lerp(f64),
    /// Time-boxed easing; `duration` in seconds
    Tween { duration: f64, easing: Easing },
    /// No interpolation
    Jump,
}

impl Motion {
    /// Resolve from optional parts: a duration wins over lerp, and neither
    /// yields a jump.
    pub fn resolve(lerp: Option<f64>, duration: Option<f64>, easing: Easing) -> Self {
        match (duration, lerp) {
            (Some(duration), _) if duration > 0.0 => Motion::Tween { duration, easing },
            (_, Some(factor)) if factor > 0.0 => Motion::Lerp(factor),
            _ => Motion::Jump,
        }
    }
}

impl Default for Motion {
    fn default() -> Self {
        Motion::Lerp(0.1)
    }
}

/// Result of one [`Animate::advance`] call
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub value: f64,
    pub completed: bool,
}

/// The animation primitive driving a scroll controller
#[derive(Clone, Debug)]
pub struct Animate {
    from: f64,
    to: f64,
    value: f64,
    /// Elapsed seconds since `from_to`
    current_time: f64,
    motion: Motion,
    running: bool,
}

impl Animate {
    pub fn new() -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            value: 0.0,
            current_time: 0.0,
            motion: Motion::Jump,
            running: false,
        }
    }

    /// Start moving from `from` to `to`, replacing any motion in flight
    pub fn from_to(&mut self, from: f64, to: f64, motion: Motion) {
        self.from = from;
        self.value = from;
        self.to = to;
        self.motion = motion;
        self.current_time = 0.0;
        self.running = true;
    }

    /// Advance by `dt` seconds. Returns `None` when idle.
    pub fn advance(&mut self, dt: f64) -> Option<Step> {
        if !self.running {
            return None;
        }

        let dt = dt.max(0.0);
        let mut completed = false;

        match self.motion {
            Motion::Tween { duration, easing } => {
                self.current_time += dt;
                let linear = clamp(0.0, self.current_time / duration, 1.0);
                completed = linear >= 1.0;
                let eased = if completed { 1.0 } else { easing.apply(linear) };
                self.value = self.from + (self.to - self.from) * eased;
            }
            Motion::Lerp(factor) => {
                self.current_time += dt;
                self.value = damp(self.value, self.to, factor * LERP_REFERENCE_FPS, dt);
                if self.value.round() == self.to.round() {
                    self.value = self.to;
                    completed = true;
                }
            }
            Motion::Jump => {
                self.value = self.to;
                completed = true;
            }
        }

        if completed {
            self.stop();
        }

        tracing::trace!(
            "animate value={:.2} to={:.2} completed={}",
            self.value,
            self.to,
            completed
        );

        Some(Step {
            value: self.value,
            completed,
        })
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Elapsed seconds of the current motion
    pub fn elapsed(&self) -> f64 {
        self.current_time
    }
}

impl Default for Animate {
    fn default() -> Self {
        Self::new()
    }
}
