//! Headless runtime primitives for deterministic scroll runs.

use crate::scenario::PageSpec;
use anyhow::{bail, Context, Result};
use glide_core::{InputResponse, ManualClock, Subscription};
use glide_scroll::{
    MemoryHost, MemoryNode, ScrollContainer, ScrollController, ScrollHost, ScrollOptions,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Configuration for deterministic headless frame execution.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Logical milliseconds between frames.
    pub tick_ms: u64,
    /// Frame budget for a single `settle` step.
    pub max_frames: u32,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            max_frames: 2_000,
        }
    }
}

impl HeadlessRunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_frames == 0 {
            bail!("headless max_frames must be > 0");
        }
        if self.tick_ms == 0 {
            bail!("headless tick_ms must be > 0");
        }
        Ok(())
    }
}

/// Counts of events published by the controller during a run.
#[derive(Debug, Clone, Default)]
pub struct EventCounters {
    scroll: Rc<Cell<u64>>,
    scroll_end: Rc<Cell<u64>>,
}

impl EventCounters {
    pub fn scroll(&self) -> u64 {
        self.scroll.get()
    }

    pub fn scroll_end(&self) -> u64 {
        self.scroll_end.get()
    }
}

/// A scroll controller over an in-memory page, stepped one frame at a time.
pub struct HeadlessRuntime {
    scroller: ScrollController<MemoryHost>,
    clock: ManualClock,
    nodes: HashMap<String, glide_core::NodeId>,
    counters: EventCounters,
    last_input: Option<InputResponse>,
    elapsed_frames: u64,
    elapsed_ms: u64,
    _subscriptions: [Subscription; 2],
}

impl HeadlessRuntime {
    /// Build the page and a controller over it, then run the first frame.
    pub fn new(page: &PageSpec, options: ScrollOptions) -> Result<Self> {
        let mut host = MemoryHost::page(page.viewport, page.content);
        if !page.size_observers {
            host = host.without_observers();
        }

        let mut nodes = HashMap::new();
        for spec in &page.nodes {
            if nodes.contains_key(&spec.id) {
                bail!("duplicate node id '{}'", spec.id);
            }
            let mut node = MemoryNode::new(spec.rect)
                .with_id(spec.id.clone())
                .with_style(spec.style);
            if let Some(size) = spec.scroll_size {
                node = node.with_scroll_size(size);
            }
            if let Some(parent) = &spec.parent {
                let parent = *nodes
                    .get(parent)
                    .with_context(|| format!("node '{}': unknown parent '{parent}'", spec.id))?;
                node = node.with_parent(parent);
            }
            nodes.insert(spec.id.clone(), host.insert(node));
        }

        let container = match &page.root {
            Some(root) => {
                let lookup = |name: &str| {
                    nodes
                        .get(name)
                        .copied()
                        .with_context(|| format!("scroll root: unknown node '{name}'"))
                };
                ScrollContainer::element(lookup(&root.wrapper)?, lookup(&root.content)?)
            }
            None => ScrollContainer::window(host.document_element()),
        };

        let clock = host.clock();
        let scroller =
            ScrollController::new(host, container, options).context("invalid scroll options")?;

        let counters = EventCounters::default();
        let scroll = counters.scroll.clone();
        let scroll_end = counters.scroll_end.clone();
        let subscriptions = [
            scroller.on_scroll(move |_| scroll.set(scroll.get() + 1)),
            scroller.on_scroll_end(move |_| scroll_end.set(scroll_end.get() + 1)),
        ];

        let mut runtime = Self {
            scroller,
            clock,
            nodes,
            counters,
            last_input: None,
            elapsed_frames: 0,
            elapsed_ms: 0,
            _subscriptions: subscriptions,
        };
        runtime.scroller.raf(0.0);
        Ok(runtime)
    }

    /// Advance time by `ms`, deliver queued host events, then run a frame.
    pub fn frame(&mut self, ms: u64) {
        self.clock.advance(ms as f64);
        self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
        self.elapsed_frames += 1;
        self.deliver_host_events();
        self.scroller.raf(self.elapsed_ms as f64);
    }

    /// Deliver host notifications in the order a browser would fire them.
    pub fn deliver_host_events(&mut self) {
        let host = self.scroller.host_mut();
        let scrolls = host.take_scroll_events();
        let sizes = host.take_size_notifications();
        let window_resized = host.take_window_resize();

        for _ in scrolls {
            self.scroller.on_native_scroll();
        }
        for node in sizes {
            self.scroller.on_size_observed(node);
        }
        if window_resized {
            self.scroller.on_window_resize();
        }
    }

    /// Resolve node names to ids, in order.
    pub fn resolve_path(&self, names: &[String]) -> Result<Vec<glide_core::NodeId>> {
        names
            .iter()
            .map(|name| {
                self.nodes
                    .get(name)
                    .copied()
                    .with_context(|| format!("unknown node '{name}' in event path"))
            })
            .collect()
    }

    pub fn node(&self, name: &str) -> Option<glide_core::NodeId> {
        self.nodes.get(name).copied()
    }

    pub fn record_input(&mut self, response: InputResponse) {
        self.last_input = Some(response);
    }

    pub fn last_input(&self) -> Option<InputResponse> {
        self.last_input
    }

    pub fn scroller(&self) -> &ScrollController<MemoryHost> {
        &self.scroller
    }

    pub fn scroller_mut(&mut self) -> &mut ScrollController<MemoryHost> {
        &mut self.scroller
    }

    pub fn counters(&self) -> &EventCounters {
        &self.counters
    }

    pub fn elapsed_frames(&self) -> u64 {
        self.elapsed_frames
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}
