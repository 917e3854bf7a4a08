//! Frame scheduler
//!
//! Fans one stream of frame timestamps out to every registered frame
//! callback. A host calls [`FrameScheduler::tick`] from its display-refresh
//! hook (`requestAnimationFrame`, a winit redraw, a headless loop) and each
//! scroll controller receives the same monotonic timestamp.

use glide_core::Clock;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a registered frame callback
    pub struct FrameCallbackId;
}

/// Callback invoked once per frame with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnMut(f64)>;

/// Drives registered frame callbacks from a timestamp stream
pub struct FrameScheduler {
    callbacks: SlotMap<FrameCallbackId, FrameCallback>,
    last_frame: Option<f64>,
    frame_count: u64,
    target_fps: u32,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            callbacks: SlotMap::with_key(),
            last_frame: None,
            frame_count: 0,
            target_fps: 60,
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Nominal frame interval in milliseconds at the target rate
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps as f64
    }

    pub fn add<F>(&mut self, callback: F) -> FrameCallbackId
    where
        F: FnMut(f64) + 'static,
    {
        self.callbacks.insert(Box::new(callback))
    }

    pub fn remove(&mut self, id: FrameCallbackId) -> bool {
        self.callbacks.remove(id).is_some()
    }

    /// Run every callback for the frame at `time_ms`
    ///
    /// Timestamps that go backwards are clamped to the previous frame so
    /// consumers never see negative deltas.
    pub fn tick(&mut self, time_ms: f64) {
        let time_ms = match self.last_frame {
            Some(last) if time_ms < last => last,
            _ => time_ms,
        };
        self.last_frame = Some(time_ms);
        self.frame_count += 1;

        for (_, callback) in self.callbacks.iter_mut() {
            callback(time_ms);
        }
    }

    /// Tick using the current time of `clock`
    pub fn tick_with<C: Clock + ?Sized>(&mut self, clock: &C) {
        self.tick(clock.now_ms());
    }

    pub fn last_frame(&self) -> Option<f64> {
        self.last_frame
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}
