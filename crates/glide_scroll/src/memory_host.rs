//! In-memory host
//!
//! [`MemoryHost`] is a small model of a page: a window, a document element
//! and any number of nodes with document-space rectangles, client/scroll
//! sizes, overflow styles and native scroll offsets. It records what a
//! browser would report back asynchronously (native scroll events, size
//! observer notifications, window resizes) so a driver can replay them to a
//! controller in the same order a browser would.

use glide_core::{ManualClock, NodeId};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::host::{Axis, NodeStyle, ObserverId, Rect, ScrollHost, ScrollRoot, Size};

/// A node in the in-memory page
#[derive(Debug, Clone, Default)]
pub struct MemoryNode {
    /// Value of the `id` attribute, matched by `#id` selectors
    pub html_id: Option<String>,
    /// Parent node; scroll offsets of ancestors shift the bounding rect
    pub parent: Option<NodeId>,
    /// Rectangle in document coordinates (before any scrolling)
    pub rect: Rect,
    pub client_size: Size,
    pub scroll_size: Size,
    pub style: NodeStyle,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl MemoryNode {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            client_size: Size::new(rect.width, rect.height),
            scroll_size: Size::new(rect.width, rect.height),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.html_id = Some(id.into());
        self
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_scroll_size(mut self, size: Size) -> Self {
        self.scroll_size = size;
        self
    }

    fn max_scroll(&self, axis: Axis) -> f64 {
        (self.scroll_size.along(axis) - self.client_size.along(axis)).max(0.0)
    }
}

/// Page model implementing [`ScrollHost`]
#[derive(Debug)]
pub struct MemoryHost {
    clock: ManualClock,
    window_size: Size,
    window_scroll: (f64, f64),
    document: NodeId,
    nodes: FxHashMap<NodeId, MemoryNode>,
    next_id: u64,
    observers_supported: bool,
    observers: SlotMap<ObserverId, NodeId>,
    pending_scroll: SmallVec<[ScrollRoot; 2]>,
    pending_sizes: SmallVec<[NodeId; 4]>,
    pending_window_resize: bool,
}

impl MemoryHost {
    /// A page of `content` size shown in a window of `viewport` size
    pub fn page(viewport: Size, content: Size) -> Self {
        let document = NodeId(0);
        let mut nodes = FxHashMap::default();
        nodes.insert(
            document,
            MemoryNode {
                rect: Rect::new(0.0, 0.0, content.width, content.height),
                client_size: viewport,
                scroll_size: content,
                ..Default::default()
            },
        );
        Self {
            clock: ManualClock::new(0.0),
            window_size: viewport,
            window_scroll: (0.0, 0.0),
            document,
            nodes,
            next_id: 1,
            observers_supported: true,
            observers: SlotMap::with_key(),
            pending_scroll: SmallVec::new(),
            pending_sizes: SmallVec::new(),
            pending_window_resize: false,
        }
    }

    /// Shared handle to the host clock
    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    /// Disable size observers, as on hosts without `ResizeObserver`
    pub fn without_observers(mut self) -> Self {
        self.observers_supported = false;
        self
    }

    pub fn insert(&mut self, node: MemoryNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.nodes.get_mut(&id)
    }

    /// Change a node's content size, notifying observers of that node
    pub fn set_scroll_size(&mut self, node: NodeId, size: Size) {
        if let Some(entry) = self.nodes.get_mut(&node) {
            if entry.scroll_size != size {
                entry.scroll_size = size;
                self.notify_observers(node);
            }
        }
    }

    /// Change the page content size (the document element's scroll size)
    pub fn set_content_size(&mut self, size: Size) {
        self.set_scroll_size(self.document, size);
    }

    /// Resize the window; queues a window resize event
    pub fn set_window_size(&mut self, size: Size) {
        if self.window_size != size {
            self.window_size = size;
            if let Some(doc) = self.nodes.get_mut(&self.document) {
                doc.client_size = size;
            }
            self.pending_window_resize = true;
        }
    }

    /// Simulate a user-driven native scroll (scrollbar drag, keyboard)
    pub fn scroll_natively(&mut self, root: ScrollRoot, axis: Axis, value: f64) {
        self.set_scroll_position(root, axis, value);
    }

    /// Drain queued native scroll events
    pub fn take_scroll_events(&mut self) -> SmallVec<[ScrollRoot; 2]> {
        std::mem::take(&mut self.pending_scroll)
    }

    /// Drain queued size observer notifications
    pub fn take_size_notifications(&mut self) -> SmallVec<[NodeId; 4]> {
        std::mem::take(&mut self.pending_sizes)
    }

    /// Drain the queued window resize event
    pub fn take_window_resize(&mut self) -> bool {
        std::mem::take(&mut self.pending_window_resize)
    }

    /// Number of live size observations
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify_observers(&mut self, node: NodeId) {
        let observed = self.observers.values().any(|n| *n == node);
        if observed && !self.pending_sizes.contains(&node) {
            self.pending_sizes.push(node);
        }
    }

    fn max_window_scroll(&self, axis: Axis) -> f64 {
        let content = self
            .nodes
            .get(&self.document)
            .map(|doc| doc.scroll_size)
            .unwrap_or_default();
        (content.along(axis) - self.window_size.along(axis)).max(0.0)
    }

    /// Sum of ancestor scroll offsets on `axis`, excluding the window
    fn ancestor_scroll(&self, node: NodeId, axis: Axis) -> f64 {
        let mut total = 0.0;
        let mut current = self.nodes.get(&node).and_then(|n| n.parent);
        while let Some(id) = current {
            let Some(entry) = self.nodes.get(&id) else {
                break;
            };
            total += match axis {
                Axis::X => entry.scroll_x,
                Axis::Y => entry.scroll_y,
            };
            current = entry.parent;
        }
        total
    }
}

impl ScrollHost for MemoryHost {
    fn now_ms(&self) -> f64 {
        use glide_core::Clock;
        self.clock.now_ms()
    }

    fn document_element(&self) -> NodeId {
        self.document
    }

    fn scroll_position(&self, root: ScrollRoot, axis: Axis) -> f64 {
        match root {
            ScrollRoot::Window => match axis {
                Axis::X => self.window_scroll.0,
                Axis::Y => self.window_scroll.1,
            },
            ScrollRoot::Element(node) => self.node_scroll(node, axis),
        }
    }

    fn set_scroll_position(&mut self, root: ScrollRoot, axis: Axis, value: f64) {
        let changed = match root {
            ScrollRoot::Window => {
                let value = value.clamp(0.0, self.max_window_scroll(axis));
                let slot = match axis {
                    Axis::X => &mut self.window_scroll.0,
                    Axis::Y => &mut self.window_scroll.1,
                };
                let changed = *slot != value;
                *slot = value;
                changed
            }
            ScrollRoot::Element(node) => match self.nodes.get_mut(&node) {
                Some(entry) => {
                    let value = value.clamp(0.0, entry.max_scroll(axis));
                    let slot = match axis {
                        Axis::X => &mut entry.scroll_x,
                        Axis::Y => &mut entry.scroll_y,
                    };
                    let changed = *slot != value;
                    *slot = value;
                    changed
                }
                None => false,
            },
        };
        if changed && !self.pending_scroll.contains(&root) {
            self.pending_scroll.push(root);
        }
    }

    fn window_size(&self) -> Size {
        self.window_size
    }

    fn client_size(&self, node: NodeId) -> Size {
        self.nodes
            .get(&node)
            .map(|n| n.client_size)
            .unwrap_or_default()
    }

    fn scroll_size(&self, node: NodeId) -> Size {
        self.nodes
            .get(&node)
            .map(|n| n.scroll_size)
            .unwrap_or_default()
    }

    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        let entry = self.nodes.get(&node)?;
        let rect = entry.rect;
        Some(Rect::new(
            rect.left - self.window_scroll.0 - self.ancestor_scroll(node, Axis::X),
            rect.top - self.window_scroll.1 - self.ancestor_scroll(node, Axis::Y),
            rect.width,
            rect.height,
        ))
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let id = selector.strip_prefix('#')?;
        if id.is_empty() {
            return None;
        }
        self.nodes
            .iter()
            .filter(|(_, node)| node.html_id.as_deref() == Some(id))
            .map(|(node_id, _)| *node_id)
            .min()
    }

    fn node_style(&self, node: NodeId) -> Option<NodeStyle> {
        self.nodes.get(&node).map(|n| n.style)
    }

    fn node_scroll(&self, node: NodeId, axis: Axis) -> f64 {
        self.nodes
            .get(&node)
            .map(|n| match axis {
                Axis::X => n.scroll_x,
                Axis::Y => n.scroll_y,
            })
            .unwrap_or(0.0)
    }

    fn observe_size(&mut self, node: NodeId) -> Option<ObserverId> {
        if !self.observers_supported {
            return None;
        }
        Some(self.observers.insert(node))
    }

    fn disconnect_observer(&mut self, id: ObserverId) {
        self.observers.remove(id);
    }
}
