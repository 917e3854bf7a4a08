//! Controller state
//!
//! The scrolling mode and the gate flags are orthogonal: a controller can be
//! `Smooth` and `locked` at the same time, or `Idle` and `stopped`.

use glide_core::StateTransitions;
use serde::{Deserialize, Serialize};

/// What is currently moving the scroll offset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollingMode {
    #[default]
    Idle,
    /// The host is scrolling by itself (scrollbar, keyboard, native touch)
    Native,
    /// The controller's animation is driving the offset
    Smooth,
}

/// Inputs that move the controller between modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    /// A native scroll event was adopted
    NativeScroll { stopped: bool },
    /// A gesture left to the host
    NativeGesture,
    /// The animation started or advanced
    AnimationFrame,
    /// The native idle timeout elapsed
    Quiet,
    Reset,
}

impl StateTransitions<ModeEvent> for ScrollingMode {
    fn on_event(&self, event: ModeEvent) -> Option<Self> {
        use ModeEvent::*;
        use ScrollingMode::*;

        match (self, event) {
            (Idle | Native, NativeScroll { stopped: false }) => Some(Native),
            (_, NativeGesture) => Some(Native),
            (_, AnimationFrame) => Some(Smooth),
            (Native, Quiet) => Some(Idle),
            (_, Reset) => Some(Idle),
            _ => None,
        }
    }
}

/// Flags that block new scroll targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gate {
    /// Set by `stop()`, cleared by `start()`
    pub stopped: bool,
    /// Set by a `scroll_to` with `lock`, cleared by `reset()`
    pub locked: bool,
}

impl Gate {
    /// Whether new targets need `force`
    pub fn is_closed(&self) -> bool {
        self.stopped || self.locked
    }
}

/// Scroll direction from the last velocity
pub type Direction = i8;

/// Immutable copy of controller state passed to subscribers and callbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollSnapshot {
    /// Offset in `[0, limit)` for infinite controllers, else `animated_scroll`
    pub scroll: f64,
    pub animated_scroll: f64,
    pub target_scroll: f64,
    pub actual_scroll: f64,
    pub velocity: f64,
    pub last_velocity: f64,
    pub direction: Direction,
    pub progress: f64,
    pub limit: f64,
    pub mode: ScrollingMode,
    pub gate: Gate,
    pub is_touching: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<serde_json::Value>,
}

impl ScrollSnapshot {
    pub fn is_scrolling(&self) -> bool {
        self.mode != ScrollingMode::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_scroll_ignored_while_smooth() {
        let mut mode = ScrollingMode::Smooth;
        assert!(!mode.apply(ModeEvent::NativeScroll { stopped: false }));
        assert_eq!(mode, ScrollingMode::Smooth);
    }

    #[test]
    fn test_stopped_native_scroll_keeps_mode() {
        let mut mode = ScrollingMode::Idle;
        assert!(!mode.apply(ModeEvent::NativeScroll { stopped: true }));
        assert_eq!(mode, ScrollingMode::Idle);
    }

    #[test]
    fn test_quiet_only_leaves_native() {
        let mut mode = ScrollingMode::Smooth;
        assert!(!mode.apply(ModeEvent::Quiet));
        let mut mode = ScrollingMode::Native;
        assert!(mode.apply(ModeEvent::Quiet));
        assert_eq!(mode, ScrollingMode::Idle);
    }

    #[test]
    fn test_gate() {
        assert!(!Gate::default().is_closed());
        assert!(Gate { stopped: true, locked: false }.is_closed());
        assert!(Gate { stopped: false, locked: true }.is_closed());
    }
}
