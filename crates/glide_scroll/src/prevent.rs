//! Prevention gate
//!
//! Decides whether a gesture belongs to something inside the scroll root
//! rather than to the controller. The composed path is walked from the
//! target up to (not including) the root node. A gesture passes through to
//! the host when any node on the way:
//!
//! - matches the `prevent` predicate,
//! - carries a prevent marker for all gestures or for this device,
//! - or, with `allow_nested_scroll`, is a scrollable element that still has
//!   room to move in the gesture direction.

use glide_core::NodeId;
use rustc_hash::FxHashMap;

use crate::host::{Axis, ScrollHost};
use crate::options::{GestureOrientation, ScrollOptions};
use crate::virtual_scroll::GestureEvent;

/// Overflow facts about one node, refreshed once per TTL
#[derive(Debug, Clone, Copy, PartialEq)]
struct OverflowEntry {
    time: f64,
    has_overflow_x: bool,
    has_overflow_y: bool,
    is_scrollable_x: bool,
    is_scrollable_y: bool,
    max_scroll_x: f64,
    max_scroll_y: f64,
}

/// Per-node overflow cache for nested-scroll detection
///
/// Styles and sizes are cached for `ttl_ms`; the live scroll offset is read
/// on every check.
#[derive(Debug, Clone, Default)]
pub struct NestedScrollCache {
    ttl_ms: f64,
    entries: FxHashMap<NodeId, OverflowEntry>,
}

impl NestedScrollCache {
    pub fn new(ttl_ms: f64) -> Self {
        Self {
            ttl_ms,
            entries: FxHashMap::default(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry<H: ScrollHost + ?Sized>(&mut self, host: &H, node: NodeId) -> Option<OverflowEntry> {
        let now = host.now_ms();
        if let Some(cached) = self.entries.get(&node) {
            if now - cached.time <= self.ttl_ms {
                return Some(*cached);
            }
        }

        let style = host.node_style(node)?;
        let client = host.client_size(node);
        let scroll = host.scroll_size(node);
        let entry = OverflowEntry {
            time: now,
            has_overflow_x: style.overflow_x.allows_scroll(),
            has_overflow_y: style.overflow_y.allows_scroll(),
            is_scrollable_x: scroll.width > client.width,
            is_scrollable_y: scroll.height > client.height,
            max_scroll_x: scroll.width - client.width,
            max_scroll_y: scroll.height - client.height,
        };
        self.entries.insert(node, entry);
        Some(entry)
    }

    /// Whether `node` would scroll itself for this gesture
    pub fn can_absorb<H: ScrollHost + ?Sized>(
        &mut self,
        host: &H,
        node: NodeId,
        delta_x: f64,
        delta_y: f64,
        gesture: GestureOrientation,
    ) -> bool {
        let Some(entry) = self.entry(host, node) else {
            return false;
        };

        let x_ok = entry.has_overflow_x && entry.is_scrollable_x;
        let y_ok = entry.has_overflow_y && entry.is_scrollable_y;

        let axis = match gesture {
            GestureOrientation::Vertical => y_ok.then_some(Axis::Y),
            GestureOrientation::Horizontal => x_ok.then_some(Axis::X),
            GestureOrientation::Both => {
                // The vertical component wins when both could scroll
                if delta_y != 0.0 && y_ok {
                    Some(Axis::Y)
                } else if delta_x != 0.0 && x_ok {
                    Some(Axis::X)
                } else {
                    None
                }
            }
        };
        let Some(axis) = axis else {
            return false;
        };

        let (delta, max_scroll) = match axis {
            Axis::X => (delta_x, entry.max_scroll_x),
            Axis::Y => (delta_y, entry.max_scroll_y),
        };
        let scroll = host.node_scroll(node, axis);
        if delta > 0.0 {
            scroll < max_scroll
        } else {
            scroll > 0.0
        }
    }
}

/// Whether the gesture should be left to the host because of something on
/// its path below `root`
pub fn should_pass_through<H: ScrollHost + ?Sized>(
    host: &H,
    cache: &mut NestedScrollCache,
    options: &ScrollOptions,
    event: &GestureEvent,
    root: NodeId,
) -> bool {
    for &node in event.path.iter().take_while(|node| **node != root) {
        // Only elements take part; text nodes and the like have no style
        let Some(style) = host.node_style(node) else {
            continue;
        };

        if let Some(prevent) = &options.hooks.prevent {
            if prevent(node) {
                tracing::trace!("gesture prevented by predicate at {:?}", node);
                return true;
            }
        }

        if style.prevent
            || (event.is_touch() && style.prevent_touch)
            || (event.is_wheel() && style.prevent_wheel)
        {
            tracing::trace!("gesture prevented by marker at {:?}", node);
            return true;
        }

        if options.allow_nested_scroll
            && cache.can_absorb(
                host,
                node,
                event.delta_x,
                event.delta_y,
                options.gesture_orientation,
            )
        {
            tracing::trace!("gesture absorbed by nested scroller {:?}", node);
            return true;
        }
    }
    false
}
