//! `scroll_to` targets and options

use std::fmt;

use glide_animation::{Easing, Motion};
use glide_core::NodeId;
use serde::{Deserialize, Serialize};

use crate::options::{AnchorOptions, ScrollOptions};
use crate::state::ScrollSnapshot;

/// Named scroll positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    Top,
    Left,
    Start,
    Bottom,
    Right,
    End,
}

impl Keyword {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Keyword::Top),
            "left" => Some(Keyword::Left),
            "start" => Some(Keyword::Start),
            "bottom" => Some(Keyword::Bottom),
            "right" => Some(Keyword::Right),
            "end" => Some(Keyword::End),
            _ => None,
        }
    }

    /// Whether the keyword names the end of the range
    pub fn is_end(&self) -> bool {
        matches!(self, Keyword::Bottom | Keyword::Right | Keyword::End)
    }
}

/// Where `scroll_to` should go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollTarget {
    Offset(f64),
    Keyword(Keyword),
    Node(NodeId),
    Selector(String),
}

impl From<f64> for ScrollTarget {
    fn from(offset: f64) -> Self {
        ScrollTarget::Offset(offset)
    }
}

impl From<Keyword> for ScrollTarget {
    fn from(keyword: Keyword) -> Self {
        ScrollTarget::Keyword(keyword)
    }
}

impl From<NodeId> for ScrollTarget {
    fn from(node: NodeId) -> Self {
        ScrollTarget::Node(node)
    }
}

/// Keyword strings become keywords; anything else is a selector
impl From<&str> for ScrollTarget {
    fn from(value: &str) -> Self {
        match Keyword::parse(value) {
            Some(keyword) => ScrollTarget::Keyword(keyword),
            None => ScrollTarget::Selector(value.to_string()),
        }
    }
}

impl From<String> for ScrollTarget {
    fn from(value: String) -> Self {
        match Keyword::parse(&value) {
            Some(keyword) => ScrollTarget::Keyword(keyword),
            None => ScrollTarget::Selector(value),
        }
    }
}

/// Callback receiving the controller state
pub type ScrollCallback = Box<dyn FnOnce(&ScrollSnapshot)>;

/// Per-call options for `scroll_to`
pub struct ScrollToOptions {
    /// Added to the resolved target
    pub offset: f64,
    /// Jump without animating
    pub immediate: bool,
    /// Block new targets until the animation completes
    pub lock: bool,
    pub lerp: Option<f64>,
    pub duration: Option<f64>,
    pub easing: Option<Easing>,
    /// Ignore `stopped`/`locked`
    pub force: bool,
    /// Programmatic scrolls keep `target_scroll` in step with the animation;
    /// gestures set it up front
    pub programmatic: bool,
    pub on_start: Option<ScrollCallback>,
    pub on_complete: Option<ScrollCallback>,
    pub user_data: Option<serde_json::Value>,
}

impl Default for ScrollToOptions {
    fn default() -> Self {
        Self {
            offset: 0.0,
            immediate: false,
            lock: false,
            lerp: None,
            duration: None,
            easing: None,
            force: false,
            programmatic: true,
            on_start: None,
            on_complete: None,
            user_data: None,
        }
    }
}

impl fmt::Debug for ScrollToOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollToOptions")
            .field("offset", &self.offset)
            .field("immediate", &self.immediate)
            .field("lock", &self.lock)
            .field("lerp", &self.lerp)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("force", &self.force)
            .field("programmatic", &self.programmatic)
            .field("on_start", &self.on_start.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("user_data", &self.user_data)
            .finish()
    }
}

impl ScrollToOptions {
    pub fn immediate() -> Self {
        Self {
            immediate: true,
            ..Default::default()
        }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_lerp(mut self, lerp: f64) -> Self {
        self.lerp = Some(lerp);
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn with_user_data(mut self, data: serde_json::Value) -> Self {
        self.user_data = Some(data);
        self
    }

    pub fn on_start<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&ScrollSnapshot) + 'static,
    {
        self.on_start = Some(Box::new(callback));
        self
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&ScrollSnapshot) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Gesture-driven scroll: `target_scroll` moves up front
    pub(crate) fn gesture(lerp: Option<f64>) -> Self {
        Self {
            programmatic: false,
            lerp,
            ..Default::default()
        }
    }

    /// Motion for this call
    ///
    /// Per-call overrides win: an explicit duration tweens, an explicit lerp
    /// damps. Without overrides the controller's configured motion applies,
    /// with a per-call easing swapped into a configured tween.
    pub fn motion(&self, defaults: &ScrollOptions) -> Motion {
        let easing = self.easing.unwrap_or(defaults.easing);
        if let Some(duration) = self.duration.filter(|d| *d > 0.0) {
            return Motion::Tween { duration, easing };
        }
        if let Some(lerp) = self.lerp.filter(|l| *l > 0.0) {
            return Motion::Lerp(lerp);
        }
        match defaults.motion() {
            Motion::Tween { duration, .. } => Motion::Tween { duration, easing },
            other => other,
        }
    }
}

impl From<AnchorOptions> for ScrollToOptions {
    fn from(anchor: AnchorOptions) -> Self {
        Self {
            offset: anchor.offset,
            immediate: anchor.immediate,
            lock: anchor.lock,
            lerp: anchor.lerp,
            duration: anchor.duration,
            easing: anchor.easing,
            ..Default::default()
        }
    }
}
