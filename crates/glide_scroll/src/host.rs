//! Host abstraction
//!
//! The controller never touches a real DOM or windowing system. Everything it
//! reads or writes about the outside world goes through [`ScrollHost`]: the
//! native scroll offset, viewport and content sizes, element rectangles,
//! per-node overflow styles and size observers.

use std::cell::RefCell;
use std::rc::Rc;

use glide_core::NodeId;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a host size observer registration
    pub struct ObserverId;
}

/// Scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

/// Width/height pair in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }
}

/// Viewport-relative bounding rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Leading edge on `axis` (`left` for X, `top` for Y)
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }
}

/// Where scrolling happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollRoot {
    /// The page itself: the window scrolls, sized by `innerWidth/innerHeight`
    Window,
    /// A scrollable element, sized by its client box
    Element(NodeId),
}

/// A scroll root plus the node whose size defines the scrollable range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollContainer {
    pub wrapper: ScrollRoot,
    pub content: NodeId,
}

impl ScrollContainer {
    /// Page-level scrolling with `content` (usually the document element)
    pub const fn window(content: NodeId) -> Self {
        Self {
            wrapper: ScrollRoot::Window,
            content,
        }
    }

    /// Element-level scrolling
    pub const fn element(wrapper: NodeId, content: NodeId) -> Self {
        Self {
            wrapper: ScrollRoot::Element(wrapper),
            content,
        }
    }

    pub fn is_window(&self) -> bool {
        matches!(self.wrapper, ScrollRoot::Window)
    }
}

/// CSS `overflow` value on one axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Clip,
    Auto,
    Scroll,
    Overlay,
}

impl Overflow {
    /// Whether the node may scroll on this axis by itself
    pub fn allows_scroll(&self) -> bool {
        matches!(self, Overflow::Auto | Overflow::Scroll | Overflow::Overlay)
    }
}

/// Per-node facts the prevention gate looks at
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
    /// `data-glide-prevent`: never intercept gestures inside this node
    pub prevent: bool,
    /// `data-glide-prevent-touch`
    pub prevent_touch: bool,
    /// `data-glide-prevent-wheel`
    pub prevent_wheel: bool,
}

/// Everything the scroll engine needs from its environment
pub trait ScrollHost {
    /// Monotonic time in milliseconds, used for timers and caches
    fn now_ms(&self) -> f64;

    /// The node at the root of the document (composed paths are cut here for
    /// window scrolling)
    fn document_element(&self) -> NodeId;

    /// Native scroll offset of `root` on `axis`
    fn scroll_position(&self, root: ScrollRoot, axis: Axis) -> f64;

    /// Write the native scroll offset, instantly
    fn set_scroll_position(&mut self, root: ScrollRoot, axis: Axis, value: f64);

    /// `innerWidth` / `innerHeight`
    fn window_size(&self) -> Size;

    /// `clientWidth` / `clientHeight`
    fn client_size(&self, node: NodeId) -> Size;

    /// `scrollWidth` / `scrollHeight`
    fn scroll_size(&self, node: NodeId) -> Size;

    /// Viewport-relative bounding rectangle, `None` if the node is gone
    fn bounding_rect(&self, node: NodeId) -> Option<Rect>;

    /// Resolve a selector string to a node
    fn query_selector(&self, selector: &str) -> Option<NodeId>;

    /// Computed style and prevention markers, `None` for non-element nodes
    fn node_style(&self, node: NodeId) -> Option<NodeStyle>;

    /// Native scroll offset of an arbitrary node
    fn node_scroll(&self, node: NodeId, axis: Axis) -> f64;

    /// Start observing size changes of `node`. Returns `None` when the host
    /// has no size observer support.
    fn observe_size(&mut self, node: NodeId) -> Option<ObserverId>;

    /// Stop an observation started by [`ScrollHost::observe_size`]
    fn disconnect_observer(&mut self, id: ObserverId);
}

/// One page shared by several controllers, e.g. the window plus a nested
/// element scroller. Each call borrows the host only for its own duration.
impl<H: ScrollHost> ScrollHost for Rc<RefCell<H>> {
    fn now_ms(&self) -> f64 {
        self.borrow().now_ms()
    }

    fn document_element(&self) -> NodeId {
        self.borrow().document_element()
    }

    fn scroll_position(&self, root: ScrollRoot, axis: Axis) -> f64 {
        self.borrow().scroll_position(root, axis)
    }

    fn set_scroll_position(&mut self, root: ScrollRoot, axis: Axis, value: f64) {
        self.borrow_mut().set_scroll_position(root, axis, value);
    }

    fn window_size(&self) -> Size {
        self.borrow().window_size()
    }

    fn client_size(&self, node: NodeId) -> Size {
        self.borrow().client_size(node)
    }

    fn scroll_size(&self, node: NodeId) -> Size {
        self.borrow().scroll_size(node)
    }

    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.borrow().bounding_rect(node)
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.borrow().query_selector(selector)
    }

    fn node_style(&self, node: NodeId) -> Option<NodeStyle> {
        self.borrow().node_style(node)
    }

    fn node_scroll(&self, node: NodeId, axis: Axis) -> f64 {
        self.borrow().node_scroll(node, axis)
    }

    fn observe_size(&mut self, node: NodeId) -> Option<ObserverId> {
        self.borrow_mut().observe_size(node)
    }

    fn disconnect_observer(&mut self, id: ObserverId) {
        self.borrow_mut().disconnect_observer(id);
    }
}
