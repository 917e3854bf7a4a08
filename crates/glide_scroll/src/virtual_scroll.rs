//! Virtual scroll input normalizer
//!
//! Turns wheel and single-finger touch input into pixel deltas:
//!
//! - Wheel deltas in line mode are scaled by [`LINE_HEIGHT`], page mode by
//!   the window size of the axis, then by `wheel_multiplier`.
//! - Touch deltas are `-(current - previous) * touch_multiplier`. A touch
//!   start resets the baseline and emits a zero delta; a touch end re-emits
//!   the last move delta so the controller can hand it to inertia.

use glide_core::{DeltaMode, EventPath, TouchInput, TouchPhase, WheelInput};
use serde::Serialize;

use crate::host::Size;

/// Pixels per wheel line
pub const LINE_HEIGHT: f64 = 100.0 / 6.0;

/// Device that produced a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureSource {
    Wheel,
    Touch(TouchPhase),
}

/// A normalized gesture
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureEvent {
    pub delta_x: f64,
    pub delta_y: f64,
    pub source: GestureSource,
    pub ctrl_key: bool,
    pub cancelable: bool,
    #[serde(skip)]
    pub path: EventPath,
}

impl GestureEvent {
    /// A zero delta on both axes: a click or tap, never a scroll
    pub fn is_tap(&self) -> bool {
        self.delta_x == 0.0 && self.delta_y == 0.0
    }

    pub fn is_touch(&self) -> bool {
        matches!(self.source, GestureSource::Touch(_))
    }

    pub fn is_wheel(&self) -> bool {
        matches!(self.source, GestureSource::Wheel)
    }

    pub fn touch_phase(&self) -> Option<TouchPhase> {
        match self.source {
            GestureSource::Touch(phase) => Some(phase),
            GestureSource::Wheel => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

/// Wheel/touch normalizer; the controller publishes what it returns
#[derive(Debug)]
pub struct VirtualScroll {
    wheel_multiplier: f64,
    touch_multiplier: f64,
    window: Size,
    touch_start: Point,
    last_delta: Point,
}

impl VirtualScroll {
    pub fn new(wheel_multiplier: f64, touch_multiplier: f64, window: Size) -> Self {
        Self {
            wheel_multiplier,
            touch_multiplier,
            window,
            touch_start: Point::default(),
            last_delta: Point::default(),
        }
    }

    /// Refresh the window size used for page-mode wheel deltas
    pub fn on_window_resize(&mut self, window: Size) {
        self.window = window;
    }

    pub fn on_wheel(&mut self, input: &WheelInput) -> GestureEvent {
        let (multiplier_x, multiplier_y) = match input.delta_mode {
            DeltaMode::Pixel => (1.0, 1.0),
            DeltaMode::Line => (LINE_HEIGHT, LINE_HEIGHT),
            DeltaMode::Page => (self.window.width, self.window.height),
        };

        GestureEvent {
            delta_x: input.delta_x * multiplier_x * self.wheel_multiplier,
            delta_y: input.delta_y * multiplier_y * self.wheel_multiplier,
            source: GestureSource::Wheel,
            ctrl_key: input.modifiers.ctrl(),
            cancelable: input.cancelable,
            path: input.path.clone(),
        }
    }

    pub fn on_touch(&mut self, input: &TouchInput) -> GestureEvent {
        let (delta_x, delta_y) = match input.phase {
            TouchPhase::Start => {
                self.touch_start = Point {
                    x: input.x,
                    y: input.y,
                };
                self.last_delta = Point::default();
                (0.0, 0.0)
            }
            TouchPhase::Move => {
                let delta = Point {
                    x: -(input.x - self.touch_start.x) * self.touch_multiplier,
                    y: -(input.y - self.touch_start.y) * self.touch_multiplier,
                };
                self.touch_start = Point {
                    x: input.x,
                    y: input.y,
                };
                self.last_delta = delta;
                (delta.x, delta.y)
            }
            TouchPhase::End => (self.last_delta.x, self.last_delta.y),
        };

        GestureEvent {
            delta_x,
            delta_y,
            source: GestureSource::Touch(input.phase),
            ctrl_key: input.modifiers.ctrl(),
            cancelable: input.cancelable,
            path: input.path.clone(),
        }
    }

    /// Forget any touch in progress
    pub fn destroy(&mut self) {
        self.touch_start = Point::default();
        self.last_delta = Point::default();
    }
}
