//! Assertion helpers for headless scroll scenarios.

use glide_core::InputResponse;
use glide_scroll::{ScrollSnapshot, ScrollingMode};

/// Observable controller state used by assertions.
#[derive(Debug, Clone)]
pub struct ScrollProbe {
    pub snapshot: ScrollSnapshot,
    pub animating: bool,
    pub scroll_events: u64,
    pub scroll_end_events: u64,
    pub last_input: Option<InputResponse>,
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }
}

pub fn evaluate_close(label: &str, actual: f64, expected: f64, tolerance: f64) -> AssertionResult {
    if (actual - expected).abs() <= tolerance.max(0.0) {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "value_mismatch",
            format!("{label}: expected {expected} (±{tolerance}), got {actual}"),
        )
    }
}

/// Expected state; `None` fields are not checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateExpectation {
    pub mode: Option<ScrollingMode>,
    pub stopped: Option<bool>,
    pub locked: Option<bool>,
    pub animating: Option<bool>,
}

pub fn evaluate_state(expected: &StateExpectation, probe: &ScrollProbe) -> AssertionResult {
    let snapshot = &probe.snapshot;
    if let Some(mode) = expected.mode {
        if snapshot.mode != mode {
            return AssertionResult::failed(
                "mode_mismatch",
                format!("mode: expected {mode:?}, got {:?}", snapshot.mode),
            );
        }
    }
    let flags = [
        ("stopped", expected.stopped, snapshot.gate.stopped),
        ("locked", expected.locked, snapshot.gate.locked),
        ("animating", expected.animating, probe.animating),
    ];
    for (name, want, got) in flags {
        if let Some(want) = want {
            if want != got {
                return AssertionResult::failed(
                    "flag_mismatch",
                    format!("{name}: expected {want}, got {got}"),
                );
            }
        }
    }
    AssertionResult::Passed
}

pub fn evaluate_input(
    prevent_default: Option<bool>,
    claimed: Option<bool>,
    probe: &ScrollProbe,
) -> AssertionResult {
    let Some(response) = probe.last_input else {
        return AssertionResult::failed("missing_input", "no input has been sent".to_string());
    };
    let checks = [
        ("prevent_default", prevent_default, response.prevent_default),
        ("claimed", claimed, response.claimed),
    ];
    for (name, want, got) in checks {
        if let Some(want) = want {
            if want != got {
                return AssertionResult::failed(
                    "input_mismatch",
                    format!("{name}: expected {want}, got {got}"),
                );
            }
        }
    }
    AssertionResult::Passed
}

pub fn evaluate_events(
    scroll_end: Option<u64>,
    min_scroll: Option<u64>,
    probe: &ScrollProbe,
) -> AssertionResult {
    if let Some(expected) = scroll_end {
        if probe.scroll_end_events != expected {
            return AssertionResult::failed(
                "event_count",
                format!(
                    "scroll_end: expected {expected} events, got {}",
                    probe.scroll_end_events
                ),
            );
        }
    }
    if let Some(minimum) = min_scroll {
        if probe.scroll_events < minimum {
            return AssertionResult::failed(
                "event_count",
                format!(
                    "scroll: expected at least {minimum} events, got {}",
                    probe.scroll_events
                ),
            );
        }
    }
    AssertionResult::Passed
}
