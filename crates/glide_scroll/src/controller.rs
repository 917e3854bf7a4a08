//! Smooth scroll controller
//!
//! A [`ScrollController`] owns the virtual scroll offset of one container.
//! Gestures move a target; [`ScrollController::raf`] moves the offset toward
//! it and writes the result to the host's native scroll position. Native
//! scrolling the controller did not cause (a scrollbar drag, keyboard
//! scrolling, a native touch) is adopted as-is.
//!
//! The controller is single-threaded. Entry points (`on_wheel`, `on_touch`,
//! `on_native_scroll`, `scroll_to`, ...) run between frames and `raf` runs
//! once per display refresh.
//!
//! Subscribers receive a [`ScrollSnapshot`] and must not call back into the
//! controller while it is dispatching.

use glide_animation::{modulo, sign, Animate, Step};
use glide_core::{
    Emitter, InputResponse, NodeId, StateTransitions, Subscription, Timeout, TouchInput,
    TouchPhase, WheelInput,
};
use smallvec::SmallVec;

use crate::dimensions::{DimensionTracker, Dimensions};
use crate::error::Result;
use crate::host::{ScrollContainer, ScrollHost, ScrollRoot};
use crate::options::{GestureOrientation, ScrollOptions};
use crate::prevent::{should_pass_through, NestedScrollCache};
use crate::state::{Direction, Gate, ModeEvent, ScrollSnapshot, ScrollingMode};
use crate::target::{ScrollCallback, ScrollTarget, ScrollToOptions};
use crate::virtual_scroll::{GestureEvent, VirtualScroll};

/// Touch-end deltas above this many pixels hand off to inertia
const INERTIA_THRESHOLD: f64 = 5.0;

/// Anchor hrefs that mean "back to the top"
const TOP_ANCHORS: [&str; 6] = ["#", "/#", "./#", "#top", "/#top", "./#top"];

/// Work deferred to the start of the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameTask {
    DispatchScrollEnd,
    ClearEchoGuard,
}

/// The animation in flight and what to do when it lands
struct ActiveScroll {
    programmatic: bool,
    on_complete: Option<ScrollCallback>,
}

/// Smooth scroll controller for one container
pub struct ScrollController<H: ScrollHost> {
    host: H,
    options: ScrollOptions,
    container: ScrollContainer,
    /// Composed paths are cut at this node
    root_node: NodeId,
    dimensions: DimensionTracker,
    virtual_scroll: VirtualScroll,
    nested: NestedScrollCache,
    animate: Animate,
    active: Option<ActiveScroll>,

    animated_scroll: f64,
    target_scroll: f64,
    velocity: f64,
    last_velocity: f64,
    direction: Direction,
    mode: ScrollingMode,
    gate: Gate,
    is_touching: bool,
    user_data: Option<serde_json::Value>,

    time: Option<f64>,
    idle: Timeout,
    echo_guard: bool,
    frame_tasks: SmallVec<[FrameTask; 4]>,

    scroll_events: Emitter<ScrollSnapshot>,
    scroll_end_events: Emitter<ScrollSnapshot>,
    virtual_events: Emitter<GestureEvent>,
    destroyed: bool,
}

impl<H: ScrollHost> ScrollController<H> {
    /// Create a controller for `container`, starting at its native offset
    pub fn new(mut host: H, container: ScrollContainer, options: ScrollOptions) -> Result<Self> {
        options.validate()?;

        let root_node = match container.wrapper {
            ScrollRoot::Window => host.document_element(),
            ScrollRoot::Element(wrapper) => wrapper,
        };
        let dimensions = DimensionTracker::new(
            &mut host,
            container,
            options.auto_resize,
            options.resize_debounce_ms,
        );
        let virtual_scroll = VirtualScroll::new(
            options.wheel_multiplier,
            options.touch_multiplier,
            host.window_size(),
        );
        let nested = NestedScrollCache::new(options.nested_cache_ttl_ms);

        let mut controller = Self {
            host,
            options,
            container,
            root_node,
            dimensions,
            virtual_scroll,
            nested,
            animate: Animate::new(),
            active: None,
            animated_scroll: 0.0,
            target_scroll: 0.0,
            velocity: 0.0,
            last_velocity: 0.0,
            direction: 0,
            mode: ScrollingMode::Idle,
            gate: Gate::default(),
            is_touching: false,
            user_data: None,
            time: None,
            idle: Timeout::new(),
            echo_guard: false,
            frame_tasks: SmallVec::new(),
            scroll_events: Emitter::new(),
            scroll_end_events: Emitter::new(),
            virtual_events: Emitter::new(),
            destroyed: false,
        };

        let actual = controller.actual_scroll();
        controller.animated_scroll = actual;
        controller.target_scroll = actual;

        tracing::debug!(
            "scroll controller created: root={:?} limit={} scroll={}",
            controller.container.wrapper,
            controller.limit(),
            actual
        );
        Ok(controller)
    }

    /// Page-level controller scrolling the window over the document element
    pub fn window(host: H, options: ScrollOptions) -> Result<Self> {
        let content = host.document_element();
        Self::new(host, ScrollContainer::window(content), options)
    }

    // =========================================================================
    // Frame driver
    // =========================================================================

    /// Advance one frame at `time_ms`
    pub fn raf(&mut self, time_ms: f64) {
        if self.destroyed {
            return;
        }

        let dt_ms = match self.time {
            Some(last) => (time_ms - last).max(0.0),
            None => 0.0,
        };
        self.time = Some(time_ms);

        let tasks = std::mem::take(&mut self.frame_tasks);
        for task in tasks {
            match task {
                FrameTask::ClearEchoGuard => self.echo_guard = false,
                FrameTask::DispatchScrollEnd => {
                    let snapshot = self.snapshot();
                    tracing::trace!("scrollend at {}", snapshot.scroll);
                    self.scroll_end_events.emit(&snapshot);
                }
            }
        }

        self.poll_timers();

        if let Some(step) = self.animate.advance(dt_ms * 0.001) {
            self.apply_step(step);
        }
    }

    fn poll_timers(&mut self) {
        let now = self.host.now_ms();
        if self.idle.fire_if_due(now) {
            self.last_velocity = self.velocity;
            self.velocity = 0.0;
            self.transition(ModeEvent::Quiet);
            self.emit();
        }
        if self.dimensions.poll(&self.host) {
            tracing::debug!("debounced resize: limit={}", self.limit());
        }
    }

    fn apply_step(&mut self, step: Step) {
        self.transition(ModeEvent::AnimationFrame);
        self.last_velocity = self.velocity;
        self.velocity = step.value - self.animated_scroll;
        self.direction = sign(self.velocity);
        self.animated_scroll = step.value;
        self.write_native();

        let programmatic = self.active.as_ref().map_or(true, |a| a.programmatic);
        if programmatic {
            self.target_scroll = step.value;
        }

        if !step.completed {
            self.emit();
            return;
        }

        let active = self.active.take();
        self.reset();
        self.emit();
        if let Some(on_complete) = active.and_then(|a| a.on_complete) {
            on_complete(&self.snapshot());
        }
        self.user_data = None;
        self.frame_tasks.push(FrameTask::DispatchScrollEnd);
        self.prevent_next_native_scroll();
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Scroll to `target`
    ///
    /// No-op while stopped or locked unless `force` is set, and always after
    /// [`ScrollController::destroy`].
    pub fn scroll_to(&mut self, target: impl Into<ScrollTarget>, options: ScrollToOptions) {
        if self.destroyed {
            tracing::trace!("scroll_to ignored: controller destroyed");
            return;
        }
        if self.gate.is_closed() && !options.force {
            tracing::trace!("scroll_to ignored: gate {:?}", self.gate);
            return;
        }

        let target = target.into();
        let Some(resolved) = self.resolve_target(&target).filter(|t| t.is_finite()) else {
            tracing::trace!("scroll_to ignored: unresolvable target {:?}", target);
            return;
        };

        let limit = self.limit();
        let mut target = (resolved + options.offset).round();

        // A zero-length range has nothing to wrap; clamp it like a finite one
        if self.options.infinite && limit > 0.0 {
            if options.programmatic {
                let wrapped = self.scroll();
                self.animated_scroll = wrapped;
                self.target_scroll = wrapped;

                let distance = target - wrapped;
                if distance > limit / 2.0 {
                    target -= limit;
                } else if distance < -limit / 2.0 {
                    target += limit;
                }
            }
        } else {
            target = glide_animation::clamp(0.0, target, limit);
        }

        let motion = options.motion(&self.options);
        let ScrollToOptions {
            immediate,
            lock,
            programmatic,
            on_start,
            on_complete,
            user_data,
            ..
        } = options;

        if target == self.target_scroll {
            let snapshot = self.snapshot();
            if let Some(on_start) = on_start {
                on_start(&snapshot);
            }
            if let Some(on_complete) = on_complete {
                on_complete(&snapshot);
            }
            return;
        }

        self.user_data = user_data;

        if immediate {
            self.animated_scroll = target;
            self.target_scroll = target;
            self.write_native();
            self.reset();
            self.prevent_next_native_scroll();
            self.emit();
            if let Some(on_complete) = on_complete {
                on_complete(&self.snapshot());
            }
            self.user_data = None;
            self.frame_tasks.push(FrameTask::DispatchScrollEnd);
            return;
        }

        if !programmatic {
            self.target_scroll = target;
        }

        tracing::trace!(
            "scroll_to {} -> {} ({:?}, programmatic={})",
            self.animated_scroll,
            target,
            motion,
            programmatic
        );

        self.idle.cancel();
        self.animate.from_to(self.animated_scroll, target, motion);
        self.active = Some(ActiveScroll {
            programmatic,
            on_complete,
        });

        if lock {
            self.gate.locked = true;
            tracing::debug!("scroll locked until animation completes");
        }
        self.transition(ModeEvent::AnimationFrame);
        if let Some(on_start) = on_start {
            on_start(&self.snapshot());
        }
    }

    fn resolve_target(&self, target: &ScrollTarget) -> Option<f64> {
        match target {
            ScrollTarget::Offset(offset) => Some(*offset),
            ScrollTarget::Keyword(keyword) => Some(if keyword.is_end() {
                self.limit()
            } else {
                0.0
            }),
            ScrollTarget::Node(node) => self.node_offset(*node),
            ScrollTarget::Selector(selector) => self
                .host
                .query_selector(selector)
                .and_then(|node| self.node_offset(node)),
        }
    }

    /// Offset that brings `node` to the leading edge of the viewport
    fn node_offset(&self, node: NodeId) -> Option<f64> {
        let axis = self.options.axis();
        let rect = self.host.bounding_rect(node)?;
        let mut offset = rect.start(axis) + self.animated_scroll;
        if let ScrollRoot::Element(wrapper) = self.container.wrapper {
            if let Some(wrapper_rect) = self.host.bounding_rect(wrapper) {
                offset -= wrapper_rect.start(axis);
            }
        }
        Some(offset)
    }

    /// Cancel the animation, unlock and resync to the native offset
    pub fn reset(&mut self) {
        self.gate.locked = false;
        self.transition(ModeEvent::Reset);
        let actual = self.actual_scroll();
        self.animated_scroll = actual;
        self.target_scroll = actual;
        self.last_velocity = 0.0;
        self.velocity = 0.0;
        self.animate.stop();
        self.active = None;
    }

    /// Stop reacting to gestures and `scroll_to`
    pub fn stop(&mut self) {
        if self.gate.stopped {
            return;
        }
        tracing::debug!("scroll stopped");
        self.gate.stopped = true;
        self.animate.stop();
        self.reset();
    }

    pub fn start(&mut self) {
        if !self.gate.stopped {
            return;
        }
        tracing::debug!("scroll started");
        self.gate.stopped = false;
        self.reset();
    }

    /// Recompute dimensions now and resync to the native offset
    pub fn resize(&mut self) {
        self.dimensions.resize(&self.host);
        let actual = self.actual_scroll();
        self.animated_scroll = actual;
        self.target_scroll = actual;
        self.emit();
    }

    /// Scroll to the element an in-page link points at
    ///
    /// Returns whether the click was taken over; the host should then cancel
    /// its own navigation. Only handled when the `anchors` option is set.
    pub fn on_anchor_click(&mut self, href: &str) -> bool {
        let Some(anchor) = self.options.anchors else {
            return false;
        };
        if !(href.starts_with('#') || href.starts_with("/#") || href.starts_with("./#")) {
            return false;
        }

        let target = if TOP_ANCHORS.contains(&href) {
            ScrollTarget::Offset(0.0)
        } else {
            let id = href.split('#').nth(1).unwrap_or_default();
            ScrollTarget::Selector(format!("#{id}"))
        };
        self.scroll_to(target, anchor.into());
        true
    }

    /// Tear down observers and subscribers. Later calls are no-ops.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.dimensions.destroy(&mut self.host);
        self.virtual_scroll.destroy();
        self.scroll_events.clear();
        self.scroll_end_events.clear();
        self.virtual_events.clear();
        self.animate.stop();
        self.active = None;
        self.idle.cancel();
        self.frame_tasks.clear();
        self.echo_guard = false;
        tracing::debug!("scroll controller destroyed");
    }

    // =========================================================================
    // Host events
    // =========================================================================

    /// Native `scroll` event on the root
    pub fn on_native_scroll(&mut self) {
        if self.destroyed {
            return;
        }

        self.idle.cancel();

        if self.echo_guard {
            self.echo_guard = false;
            tracing::trace!("native scroll echo suppressed");
            return;
        }

        if !matches!(self.mode, ScrollingMode::Idle | ScrollingMode::Native) {
            return;
        }

        let last = self.animated_scroll;
        let actual = self.actual_scroll();
        self.animated_scroll = actual;
        self.target_scroll = actual;
        self.last_velocity = self.velocity;
        self.velocity = actual - last;
        self.direction = sign(self.velocity);
        self.transition(ModeEvent::NativeScroll {
            stopped: self.gate.stopped,
        });
        self.emit();

        if self.velocity != 0.0 {
            self.idle
                .schedule(self.host.now_ms(), self.options.idle_timeout_ms);
        }
    }

    /// Window `resize` event
    pub fn on_window_resize(&mut self) {
        if self.destroyed {
            return;
        }
        let now = self.host.now_ms();
        self.dimensions.on_window_resize(now);
        self.virtual_scroll.on_window_resize(self.host.window_size());
    }

    /// Size observer notification for `node`
    pub fn on_size_observed(&mut self, node: NodeId) {
        if self.destroyed {
            return;
        }
        let now = self.host.now_ms();
        self.dimensions.on_size_observed(node, now);
    }

    /// Wheel event; marks the event claimed when the controller owns it
    pub fn on_wheel(&mut self, input: &mut WheelInput) -> InputResponse {
        if self.destroyed {
            return InputResponse::PASS;
        }
        let gesture = self.virtual_scroll.on_wheel(input);
        let response = self.handle_gesture(&gesture, input.claimed);
        input.claimed |= response.claimed;
        response
    }

    /// Touch event; marks the event claimed when the controller owns it
    pub fn on_touch(&mut self, input: &mut TouchInput) -> InputResponse {
        if self.destroyed {
            return InputResponse::PASS;
        }
        let gesture = self.virtual_scroll.on_touch(input);
        let response = self.handle_gesture(&gesture, input.claimed);
        input.claimed |= response.claimed;
        response
    }

    fn handle_gesture(&mut self, event: &GestureEvent, already_claimed: bool) -> InputResponse {
        if let Some(filter) = &self.options.hooks.virtual_scroll {
            if !filter(event) {
                tracing::trace!("gesture dropped by filter");
                return InputResponse::PASS;
            }
        }

        self.virtual_events.emit(event);

        if event.ctrl_key || already_claimed {
            return InputResponse::PASS;
        }

        let phase = event.touch_phase();
        self.is_touching = matches!(phase, Some(TouchPhase::Start | TouchPhase::Move));

        let is_tap = event.is_tap();
        if self.options.sync_touch
            && phase == Some(TouchPhase::Start)
            && is_tap
            && !self.gate.is_closed()
        {
            tracing::trace!("tap to stop");
            self.reset();
            return InputResponse::PASS;
        }

        let unknown_gesture = match self.options.gesture_orientation {
            GestureOrientation::Vertical => event.delta_y == 0.0,
            GestureOrientation::Horizontal => event.delta_x == 0.0,
            GestureOrientation::Both => false,
        };
        if is_tap || unknown_gesture {
            return InputResponse::PASS;
        }

        if should_pass_through(
            &self.host,
            &mut self.nested,
            &self.options,
            event,
            self.root_node,
        ) {
            return InputResponse::PASS;
        }

        if self.gate.is_closed() {
            return InputResponse {
                prevent_default: event.cancelable,
                claimed: false,
            };
        }

        let is_smooth = (self.options.sync_touch && event.is_touch())
            || (self.options.smooth_wheel && event.is_wheel());
        if !is_smooth {
            self.transition(ModeEvent::NativeGesture);
            self.animate.stop();
            self.active = None;
            return InputResponse::claimed_native();
        }

        let mut delta = match self.options.gesture_orientation {
            GestureOrientation::Vertical => event.delta_y,
            GestureOrientation::Horizontal => event.delta_x,
            GestureOrientation::Both => {
                if event.delta_y.abs() > event.delta_x.abs() {
                    event.delta_y
                } else {
                    event.delta_x
                }
            }
        };

        let claimed = self.claims_gesture(delta);

        let is_sync_touch = event.is_touch() && self.options.sync_touch;
        let has_inertia = phase == Some(TouchPhase::End) && delta.abs() > INERTIA_THRESHOLD;
        if has_inertia {
            delta = self.velocity * self.options.touch_inertia_multiplier;
        }

        let lerp = if is_sync_touch {
            Some(if has_inertia {
                self.options.sync_touch_lerp
            } else {
                1.0
            })
        } else {
            None
        };

        tracing::trace!(
            "gesture delta={} inertia={} claimed={}",
            delta,
            has_inertia,
            claimed
        );
        self.scroll_to(
            ScrollTarget::Offset(self.target_scroll + delta),
            ScrollToOptions::gesture(lerp),
        );

        InputResponse {
            prevent_default: event.cancelable,
            claimed,
        }
    }

    /// Whether outer consumers must leave this gesture alone. Element roots
    /// with overscroll let the gesture chain outward once they sit at the
    /// edge it pushes against.
    fn claims_gesture(&self, delta: f64) -> bool {
        if !self.options.overscroll || self.options.infinite {
            return true;
        }
        if self.container.is_window() {
            return false;
        }
        let limit = self.limit();
        let scroll = self.animated_scroll;
        limit > 0.0
            && ((scroll > 0.0 && scroll < limit)
                || (scroll == 0.0 && delta > 0.0)
                || (scroll == limit && delta < 0.0))
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Subscribe to scroll updates
    pub fn on_scroll<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&ScrollSnapshot) + 'static,
    {
        self.scroll_events.subscribe(listener)
    }

    /// Subscribe to the end of completed smooth or immediate scrolls
    pub fn on_scroll_end<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&ScrollSnapshot) + 'static,
    {
        self.scroll_end_events.subscribe(listener)
    }

    /// Subscribe to normalized gestures that passed the filter
    pub fn on_virtual_scroll<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&GestureEvent) + 'static,
    {
        self.virtual_events.subscribe(listener)
    }

    fn emit(&self) {
        if self.scroll_events.is_empty() {
            return;
        }
        self.scroll_events.emit(&self.snapshot());
    }

    fn transition(&mut self, event: ModeEvent) {
        let from = self.mode;
        if self.mode.apply(event) {
            tracing::debug!("scroll mode {:?} -> {:?} on {:?}", from, self.mode, event);
        }
    }

    fn write_native(&mut self) {
        let value = self.scroll();
        let axis = self.options.axis();
        self.host
            .set_scroll_position(self.container.wrapper, axis, value);
    }

    /// Swallow the native scroll event our own write will cause. Cleared at
    /// the next frame if no such event arrives.
    fn prevent_next_native_scroll(&mut self) {
        self.echo_guard = true;
        self.frame_tasks.push(FrameTask::ClearEchoGuard);
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn snapshot(&self) -> ScrollSnapshot {
        ScrollSnapshot {
            scroll: self.scroll(),
            animated_scroll: self.animated_scroll,
            target_scroll: self.target_scroll,
            actual_scroll: self.actual_scroll(),
            velocity: self.velocity,
            last_velocity: self.last_velocity,
            direction: self.direction,
            progress: self.progress(),
            limit: self.limit(),
            mode: self.mode,
            gate: self.gate,
            is_touching: self.is_touching,
            user_data: self.user_data.clone(),
        }
    }

    /// Current offset, wrapped into `[0, limit)` in infinite mode
    pub fn scroll(&self) -> f64 {
        if self.options.infinite {
            modulo(self.animated_scroll, self.limit())
        } else {
            self.animated_scroll
        }
    }

    /// Native scroll offset of the root
    pub fn actual_scroll(&self) -> f64 {
        self.host
            .scroll_position(self.container.wrapper, self.options.axis())
    }

    pub fn limit(&self) -> f64 {
        self.dimensions.limit(self.options.axis())
    }

    /// `scroll / limit`, or 1 when there is nothing to scroll
    pub fn progress(&self) -> f64 {
        let limit = self.limit();
        if limit == 0.0 {
            1.0
        } else {
            self.scroll() / limit
        }
    }

    /// State classes for the root element
    pub fn class_names(&self) -> SmallVec<[&'static str; 5]> {
        let mut names = SmallVec::new();
        names.push("glide");
        if self.gate.stopped {
            names.push("glide-stopped");
        }
        if self.gate.locked {
            names.push("glide-locked");
        }
        if self.mode != ScrollingMode::Idle {
            names.push("glide-scrolling");
        }
        if self.mode == ScrollingMode::Smooth {
            names.push("glide-smooth");
        }
        names
    }

    pub fn is_horizontal(&self) -> bool {
        self.options.axis() == crate::host::Axis::X
    }

    pub fn animated_scroll(&self) -> f64 {
        self.animated_scroll
    }

    pub fn target_scroll(&self) -> f64 {
        self.target_scroll
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn last_velocity(&self) -> f64 {
        self.last_velocity
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn mode(&self) -> ScrollingMode {
        self.mode
    }

    pub fn gate(&self) -> Gate {
        self.gate
    }

    pub fn is_stopped(&self) -> bool {
        self.gate.stopped
    }

    pub fn is_locked(&self) -> bool {
        self.gate.locked
    }

    pub fn is_scrolling(&self) -> bool {
        self.mode != ScrollingMode::Idle
    }

    pub fn is_touching(&self) -> bool {
        self.is_touching
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_animating(&self) -> bool {
        self.animate.is_running()
    }

    pub fn user_data(&self) -> Option<&serde_json::Value> {
        self.user_data.as_ref()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions.dimensions()
    }

    pub fn container(&self) -> ScrollContainer {
        self.container
    }

    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: ScrollHost + std::fmt::Debug> std::fmt::Debug for ScrollController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollController")
            .field("container", &self.container)
            .field("animated_scroll", &self.animated_scroll)
            .field("target_scroll", &self.target_scroll)
            .field("velocity", &self.velocity)
            .field("mode", &self.mode)
            .field("gate", &self.gate)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
