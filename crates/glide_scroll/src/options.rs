//! Controller options
//!
//! [`ScrollOptions`] is plain data so it can live in a `glide.toml`
//! `[scroll]` table. The two callback options (`prevent` and
//! `virtual_scroll`) are attached with builder methods and never serialized.

use std::fmt;
use std::rc::Rc;

use glide_animation::{Easing, Motion};
use glide_core::NodeId;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{GlideError, Result};
use crate::host::Axis;
use crate::virtual_scroll::GestureEvent;

/// Axis the content scrolls on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn axis(&self) -> Axis {
        match self {
            Orientation::Vertical => Axis::Y,
            Orientation::Horizontal => Axis::X,
        }
    }
}

/// Which gesture components drive scrolling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureOrientation {
    #[default]
    Vertical,
    Horizontal,
    /// Whichever component has the larger magnitude
    Both,
}

/// `scroll_to` options applied to anchor link clicks
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorOptions {
    pub offset: f64,
    pub immediate: bool,
    pub lock: bool,
    pub duration: Option<f64>,
    pub lerp: Option<f64>,
    #[serde(serialize_with = "serialize_easing_opt")]
    pub easing: Option<Easing>,
}

// Custom curves are written as the default curve
fn serialize_easing<S: Serializer>(
    easing: &Easing,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    easing.persistable().serialize(s)
}

fn serialize_easing_opt<S: Serializer>(
    easing: &Option<Easing>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    easing.map(Easing::persistable).serialize(s)
}

/// Predicate returning true for nodes whose gestures must go to the host
pub type PreventFn = Rc<dyn Fn(NodeId) -> bool>;

/// Gesture filter; returning false drops the gesture before any handling
pub type VirtualScrollFn = Rc<dyn Fn(&GestureEvent) -> bool>;

/// Callback options
#[derive(Clone, Default)]
pub struct ScrollHooks {
    pub prevent: Option<PreventFn>,
    pub virtual_scroll: Option<VirtualScrollFn>,
}

impl fmt::Debug for ScrollHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollHooks")
            .field("prevent", &self.prevent.is_some())
            .field("virtual_scroll", &self.virtual_scroll.is_some())
            .finish()
    }
}

/// Scroll controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollOptions {
    pub orientation: Orientation,
    pub gesture_orientation: GestureOrientation,
    /// Smooth wheel input (otherwise wheel scrolls natively)
    pub smooth_wheel: bool,
    /// Drive touch through the controller (otherwise touch scrolls natively)
    pub sync_touch: bool,
    pub sync_touch_lerp: f64,
    pub touch_inertia_multiplier: f64,
    pub wheel_multiplier: f64,
    pub touch_multiplier: f64,
    /// Damping factor per 60fps frame
    pub lerp: Option<f64>,
    /// Tween duration in seconds; takes precedence over `lerp`
    pub duration: Option<f64>,
    #[serde(serialize_with = "serialize_easing")]
    pub easing: Easing,
    /// Wrap the scroll range
    pub infinite: bool,
    /// Let the host chain scrolling at the edges of element roots
    pub overscroll: bool,
    pub auto_resize: bool,
    pub resize_debounce_ms: f64,
    /// Let nested scrollable ancestors consume gestures they can absorb
    pub allow_nested_scroll: bool,
    pub nested_cache_ttl_ms: f64,
    /// Native scroll quiet time before velocity resets
    pub idle_timeout_ms: f64,
    /// Handle `#id` anchor clicks with these options
    pub anchors: Option<AnchorOptions>,
    #[serde(skip)]
    pub hooks: ScrollHooks,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            gesture_orientation: GestureOrientation::Vertical,
            smooth_wheel: true,
            sync_touch: false,
            sync_touch_lerp: 0.075,
            touch_inertia_multiplier: 35.0,
            wheel_multiplier: 1.0,
            touch_multiplier: 1.0,
            lerp: Some(0.1),
            duration: None,
            easing: Easing::SCROLL_DEFAULT,
            infinite: false,
            overscroll: true,
            auto_resize: true,
            resize_debounce_ms: 250.0,
            allow_nested_scroll: false,
            nested_cache_ttl_ms: 2000.0,
            idle_timeout_ms: 400.0,
            anchors: None,
            hooks: ScrollHooks::default(),
        }
    }
}

impl ScrollOptions {
    /// Horizontal scrolling driven by both gesture axes
    pub fn horizontal() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            gesture_orientation: GestureOrientation::Both,
            ..Default::default()
        }
    }

    /// Parse a bare options table
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let options: ScrollOptions = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Serialize as a bare options table. Hooks are dropped and custom
    /// easing curves become [`Easing::SCROLL_DEFAULT`].
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every numeric option
    pub fn validate(&self) -> Result<()> {
        let result = self.check();
        if let Err(err) = &result {
            tracing::warn!("rejected scroll options: {}", err);
        }
        result
    }

    fn check(&self) -> Result<()> {
        positive("wheel_multiplier", self.wheel_multiplier)?;
        positive("touch_multiplier", self.touch_multiplier)?;
        positive("touch_inertia_multiplier", self.touch_inertia_multiplier)?;
        unit_factor("sync_touch_lerp", self.sync_touch_lerp)?;
        if let Some(lerp) = self.lerp {
            unit_factor("lerp", lerp)?;
        }
        if let Some(duration) = self.duration {
            positive("duration", duration)?;
        }
        if let Some(anchors) = &self.anchors {
            if let Some(lerp) = anchors.lerp {
                unit_factor("anchors.lerp", lerp)?;
            }
            if let Some(duration) = anchors.duration {
                positive("anchors.duration", duration)?;
            }
            if !anchors.offset.is_finite() {
                return Err(GlideError::invalid("anchors.offset", "must be finite"));
            }
        }
        non_negative("resize_debounce_ms", self.resize_debounce_ms)?;
        non_negative("nested_cache_ttl_ms", self.nested_cache_ttl_ms)?;
        non_negative("idle_timeout_ms", self.idle_timeout_ms)?;
        Ok(())
    }

    /// Motion used for gestures and `scroll_to` calls without overrides
    pub fn motion(&self) -> Motion {
        Motion::resolve(self.lerp, self.duration, self.easing)
    }

    pub fn axis(&self) -> Axis {
        self.orientation.axis()
    }

    pub fn with_prevent<F>(mut self, prevent: F) -> Self
    where
        F: Fn(NodeId) -> bool + 'static,
    {
        self.hooks.prevent = Some(Rc::new(prevent));
        self
    }

    pub fn with_virtual_scroll<F>(mut self, filter: F) -> Self
    where
        F: Fn(&GestureEvent) -> bool + 'static,
    {
        self.hooks.virtual_scroll = Some(Rc::new(filter));
        self
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GlideError::invalid(
            name,
            format!("expected a positive finite number, got {value}"),
        ))
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GlideError::invalid(
            name,
            format!("expected a finite number >= 0, got {value}"),
        ))
    }
}

fn unit_factor(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(GlideError::invalid(
            name,
            format!("expected a factor in (0, 1], got {value}"),
        ))
    }
}
