//! Input events
//!
//! Raw wheel and touch input as delivered by a host, before normalization.
//! Hosts translate their native events (DOM `WheelEvent`/`TouchEvent`,
//! winit `MouseWheel`, ...) into these types and hand them to a scroll
//! controller.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Opaque identifier for a node in the host's element tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

/// Nodes from the event target upward, target first
///
/// Mirrors a composed event path: the walk stops being meaningful at the
/// scroll root, which consumers look up and cut at.
pub type EventPath = SmallVec<[NodeId; 8]>;

/// Unit of a wheel delta
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    /// Delta is in pixels
    #[default]
    Pixel,
    /// Delta is in lines
    Line,
    /// Delta is in pages
    Page,
}

impl DeltaMode {
    /// Map the numeric `deltaMode` constants (0, 1, 2) onto a mode.
    ///
    /// Unknown values fall back to pixels.
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            1 => DeltaMode::Line,
            2 => DeltaMode::Page,
            _ => DeltaMode::Pixel,
        }
    }
}

/// Keyboard modifier flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { bits: 0 };
    pub const SHIFT: u8 = 0b0001;
    pub const CTRL: u8 = 0b0010;
    pub const ALT: u8 = 0b0100;
    pub const META: u8 = 0b1000;

    /// Create new modifiers from flags
    pub const fn new(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0;
        if shift {
            bits |= Self::SHIFT;
        }
        if ctrl {
            bits |= Self::CTRL;
        }
        if alt {
            bits |= Self::ALT;
        }
        if meta {
            bits |= Self::META;
        }
        Self { bits }
    }

    /// Create from raw bits
    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    /// Only the ctrl flag set (pinch-zoom gestures arrive this way)
    pub const fn ctrl_only() -> Self {
        Self { bits: Self::CTRL }
    }

    pub const fn shift(&self) -> bool {
        self.bits & Self::SHIFT != 0
    }

    pub const fn ctrl(&self) -> bool {
        self.bits & Self::CTRL != 0
    }

    pub const fn alt(&self) -> bool {
        self.bits & Self::ALT != 0
    }

    pub const fn meta(&self) -> bool {
        self.bits & Self::META != 0
    }

    /// Check if any modifier is pressed
    pub const fn any(&self) -> bool {
        self.bits != 0
    }
}

/// A wheel (mouse wheel or trackpad) event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_mode: DeltaMode,
    pub modifiers: Modifiers,
    /// Composed path from the target upward
    pub path: EventPath,
    /// Whether the host allows the default action to be cancelled
    pub cancelable: bool,
    /// Set once a scroll consumer has taken ownership of the event
    pub claimed: bool,
}

impl Default for WheelInput {
    fn default() -> Self {
        Self {
            delta_x: 0.0,
            delta_y: 0.0,
            delta_mode: DeltaMode::Pixel,
            modifiers: Modifiers::NONE,
            path: EventPath::new(),
            cancelable: true,
            claimed: false,
        }
    }
}

impl WheelInput {
    /// A cancelable pixel-mode wheel event with no path
    pub fn pixels(delta_x: f64, delta_y: f64) -> Self {
        Self {
            delta_x,
            delta_y,
            ..Default::default()
        }
    }

    /// Builder: set the delta mode
    pub fn with_mode(mut self, mode: DeltaMode) -> Self {
        self.delta_mode = mode;
        self
    }

    /// Builder: set the composed path
    pub fn with_path(mut self, path: impl IntoIterator<Item = NodeId>) -> Self {
        self.path = path.into_iter().collect();
        self
    }

    /// Builder: set modifier flags
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Phase of a single-finger touch gesture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    #[default]
    Start,
    Move,
    End,
}

/// A touch event, reduced to the first touch point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchInput {
    pub phase: TouchPhase,
    /// Client X of the first touch point
    pub x: f64,
    /// Client Y of the first touch point
    pub y: f64,
    pub modifiers: Modifiers,
    pub path: EventPath,
    pub cancelable: bool,
    pub claimed: bool,
}

impl Default for TouchInput {
    fn default() -> Self {
        Self {
            phase: TouchPhase::Start,
            x: 0.0,
            y: 0.0,
            modifiers: Modifiers::NONE,
            path: EventPath::new(),
            cancelable: true,
            claimed: false,
        }
    }
}

impl TouchInput {
    pub fn new(phase: TouchPhase, x: f64, y: f64) -> Self {
        Self {
            phase,
            x,
            y,
            ..Default::default()
        }
    }

    pub fn start(x: f64, y: f64) -> Self {
        Self::new(TouchPhase::Start, x, y)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(TouchPhase::Move, x, y)
    }

    pub fn end(x: f64, y: f64) -> Self {
        Self::new(TouchPhase::End, x, y)
    }

    /// Builder: set the composed path
    pub fn with_path(mut self, path: impl IntoIterator<Item = NodeId>) -> Self {
        self.path = path.into_iter().collect();
        self
    }
}

/// What the host should do with an input event after a consumer saw it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputResponse {
    /// Suppress the host's default scrolling for this event
    pub prevent_default: bool,
    /// The consumer took ownership; outer consumers must ignore the event
    pub claimed: bool,
}

impl InputResponse {
    /// Leave the event entirely to the host
    pub const PASS: InputResponse = InputResponse {
        prevent_default: false,
        claimed: false,
    };

    pub const fn prevented(claimed: bool) -> Self {
        Self {
            prevent_default: true,
            claimed,
        }
    }

    pub const fn claimed_native() -> Self {
        Self {
            prevent_default: false,
            claimed: true,
        }
    }
}
