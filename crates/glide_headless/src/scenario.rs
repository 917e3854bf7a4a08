//! Scenario definition for headless scroll runs.

use anyhow::{Context, Result};
use glide_animation::Easing;
use glide_core::{DeltaMode, TouchPhase};
use glide_scroll::{NodeStyle, Rect, ScrollOptions, ScrollTarget, ScrollingMode, Size};
use serde::Deserialize;
use std::path::Path;

/// A page model plus a sequence of steps to replay against it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeadlessScenario {
    #[serde(default)]
    pub page: PageSpec,
    /// Options for this scenario; replaces the runner's base options.
    #[serde(default)]
    pub options: Option<ScrollOptions>,
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("invalid scenario JSON")
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to load {}", path.display()))
    }
}

/// The in-memory page the scenario scrolls.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageSpec {
    pub viewport: Size,
    /// Document size; the window's scrollable content
    pub content: Size,
    pub nodes: Vec<NodeSpec>,
    /// Scroll an element instead of the window
    pub root: Option<RootSpec>,
    /// Whether the host supports size observers
    pub size_observers: bool,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            viewport: Size::new(1280.0, 720.0),
            content: Size::new(1280.0, 2160.0),
            nodes: Vec::new(),
            root: None,
            size_observers: true,
        }
    }
}

/// A named node; `id` doubles as its `#id` selector.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    pub rect: Rect,
    #[serde(default)]
    pub scroll_size: Option<Size>,
    #[serde(default)]
    pub style: NodeStyle,
    #[serde(default)]
    pub parent: Option<String>,
}

/// Element scroll root, by node id.
#[derive(Debug, Clone, Deserialize)]
pub struct RootSpec {
    pub wrapper: String,
    pub content: String,
}

/// A `scroll_to` target: a number or a keyword/selector string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TargetSpec {
    Offset(f64),
    Named(String),
}

impl From<&TargetSpec> for ScrollTarget {
    fn from(spec: &TargetSpec) -> Self {
        match spec {
            TargetSpec::Offset(offset) => ScrollTarget::Offset(*offset),
            TargetSpec::Named(name) => ScrollTarget::from(name.as_str()),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Steps understood by the runner.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Wait {
        ms: u64,
    },
    Tick {
        frames: u32,
    },
    /// Run frames until the animation completes, within the frame budget
    Settle,
    Wheel {
        #[serde(default)]
        delta_x: f64,
        #[serde(default)]
        delta_y: f64,
        #[serde(default)]
        delta_mode: DeltaMode,
        #[serde(default)]
        ctrl: bool,
        /// Node ids from the event target upward
        #[serde(default)]
        path: Vec<String>,
    },
    Touch {
        phase: TouchPhase,
        x: f64,
        y: f64,
        #[serde(default)]
        path: Vec<String>,
    },
    /// Scroll the root natively, as a scrollbar drag would
    NativeScroll {
        value: f64,
    },
    ScrollTo {
        target: TargetSpec,
        #[serde(default)]
        offset: f64,
        #[serde(default)]
        immediate: bool,
        #[serde(default)]
        lock: bool,
        #[serde(default)]
        lerp: Option<f64>,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        easing: Option<Easing>,
        #[serde(default)]
        force: bool,
        #[serde(default = "default_true")]
        programmatic: bool,
        #[serde(default)]
        user_data: Option<serde_json::Value>,
    },
    AnchorClick {
        href: String,
    },
    Stop,
    Start,
    Reset,
    Resize,
    Destroy,
    SetContentSize {
        width: f64,
        height: f64,
    },
    SetWindowSize {
        width: f64,
        height: f64,
    },
    AssertScroll {
        value: f64,
        #[serde(default)]
        tolerance: f64,
    },
    AssertTarget {
        value: f64,
        #[serde(default)]
        tolerance: f64,
    },
    AssertLimit {
        value: f64,
    },
    AssertProgress {
        value: f64,
        #[serde(default)]
        tolerance: f64,
    },
    AssertState {
        #[serde(default)]
        mode: Option<ScrollingMode>,
        #[serde(default)]
        stopped: Option<bool>,
        #[serde(default)]
        locked: Option<bool>,
        #[serde(default)]
        animating: Option<bool>,
    },
    /// Check the response to the most recent wheel/touch step
    AssertInput {
        #[serde(default)]
        prevent_default: Option<bool>,
        #[serde(default)]
        claimed: Option<bool>,
    },
    AssertEvents {
        #[serde(default)]
        scroll_end: Option<u64>,
        #[serde(default)]
        min_scroll: Option<u64>,
    },
}
