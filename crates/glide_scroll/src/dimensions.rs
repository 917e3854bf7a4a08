//! Viewport and content size tracking

use glide_core::{Debouncer, NodeId};
use serde::Serialize;
use smallvec::SmallVec;

use crate::host::{Axis, ObserverId, ScrollContainer, ScrollHost, ScrollRoot};

/// Viewport and content sizes of one scroll container
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
}

impl Dimensions {
    pub fn limit_x(&self) -> f64 {
        (self.scroll_width - self.width).max(0.0)
    }

    pub fn limit_y(&self) -> f64 {
        (self.scroll_height - self.height).max(0.0)
    }

    pub fn limit(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.limit_x(),
            Axis::Y => self.limit_y(),
        }
    }
}

/// Keeps [`Dimensions`] current for a container
///
/// Window roots listen to window resizes. Element roots observe the wrapper
/// and the content node; if the host cannot observe sizes the tracker falls
/// back to window resizes. Every trigger is debounced.
#[derive(Debug)]
pub struct DimensionTracker {
    container: ScrollContainer,
    dimensions: Dimensions,
    debouncer: Option<Debouncer>,
    listens_to_window: bool,
    observers: SmallVec<[ObserverId; 2]>,
    observed: SmallVec<[NodeId; 2]>,
}

impl DimensionTracker {
    pub fn new<H: ScrollHost + ?Sized>(
        host: &mut H,
        container: ScrollContainer,
        auto_resize: bool,
        debounce_ms: f64,
    ) -> Self {
        let mut tracker = Self {
            container,
            dimensions: Dimensions::default(),
            debouncer: auto_resize.then(|| Debouncer::new(debounce_ms)),
            listens_to_window: false,
            observers: SmallVec::new(),
            observed: SmallVec::new(),
        };

        if auto_resize {
            match container.wrapper {
                ScrollRoot::Window => tracker.listens_to_window = true,
                ScrollRoot::Element(wrapper) => tracker.observe(host, wrapper),
            }
            tracker.observe(host, container.content);
        }

        tracker.resize(host);
        tracker
    }

    fn observe<H: ScrollHost + ?Sized>(&mut self, host: &mut H, node: NodeId) {
        match host.observe_size(node) {
            Some(id) => {
                self.observers.push(id);
                self.observed.push(node);
            }
            None => {
                if !self.listens_to_window {
                    tracing::debug!(
                        "size observers unavailable for {:?}, tracking window resizes",
                        node
                    );
                }
                self.listens_to_window = true;
            }
        }
    }

    /// Recompute both viewport and content sizes now
    pub fn resize<H: ScrollHost + ?Sized>(&mut self, host: &H) {
        let viewport = match self.container.wrapper {
            ScrollRoot::Window => host.window_size(),
            ScrollRoot::Element(wrapper) => host.client_size(wrapper),
        };
        let content = match self.container.wrapper {
            ScrollRoot::Window => host.scroll_size(self.container.content),
            ScrollRoot::Element(wrapper) => host.scroll_size(wrapper),
        };

        let next = Dimensions {
            width: viewport.width,
            height: viewport.height,
            scroll_width: content.width,
            scroll_height: content.height,
        };
        if next != self.dimensions {
            tracing::debug!(
                "dimensions {}x{} content {}x{}",
                next.width,
                next.height,
                next.scroll_width,
                next.scroll_height
            );
        }
        self.dimensions = next;
    }

    /// Window resize event
    pub fn on_window_resize(&mut self, now_ms: f64) {
        if !self.listens_to_window {
            return;
        }
        if let Some(debouncer) = &mut self.debouncer {
            debouncer.call(now_ms);
        }
    }

    /// Size observer notification for `node`
    pub fn on_size_observed(&mut self, node: NodeId, now_ms: f64) {
        if !self.observed.contains(&node) {
            return;
        }
        if let Some(debouncer) = &mut self.debouncer {
            debouncer.call(now_ms);
        }
    }

    /// Run a due debounced resize. Returns true if one ran.
    pub fn poll<H: ScrollHost + ?Sized>(&mut self, host: &H) -> bool {
        let due = match &mut self.debouncer {
            Some(debouncer) => debouncer.poll(host.now_ms()),
            None => false,
        };
        if due {
            self.resize(host);
        }
        due
    }

    pub fn is_resize_pending(&self) -> bool {
        self.debouncer.as_ref().is_some_and(|d| d.is_pending())
    }

    /// Disconnect every observer and stop listening
    pub fn destroy<H: ScrollHost + ?Sized>(&mut self, host: &mut H) {
        for id in self.observers.drain(..) {
            host.disconnect_observer(id);
        }
        self.observed.clear();
        self.listens_to_window = false;
        if let Some(debouncer) = &mut self.debouncer {
            debouncer.cancel();
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn limit(&self, axis: Axis) -> f64 {
        self.dimensions.limit(axis)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn listens_to_window(&self) -> bool {
        self.listens_to_window
    }
}
