//! Integration tests for emitters + state transitions + animation
//!
//! These tests verify that:
//! - A frame scheduler can drive an animation that publishes through an emitter
//! - Subscriptions can be dropped from inside a dispatch
//! - Timers and state transitions cooperate in a scroll-like idle cycle

use glide_animation::{Animate, FrameScheduler, Motion};
use glide_core::{Clock, Emitter, ManualClock, StateTransitions, Timeout};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A scheduler-driven animation publishes every step to subscribers
#[test]
fn test_scheduler_drives_animation_through_emitter() {
    let emitter = Rc::new(Emitter::<f64>::new());
    let values = Rc::new(RefCell::new(Vec::new()));

    let sink = values.clone();
    let _subscription = emitter.subscribe(move |value| sink.borrow_mut().push(*value));

    let animate = Rc::new(RefCell::new(Animate::new()));
    animate
        .borrow_mut()
        .from_to(0.0, 300.0, Motion::Lerp(0.1));

    let mut scheduler = FrameScheduler::new();
    let last = Rc::new(Cell::new(None::<f64>));
    {
        let animate = animate.clone();
        let emitter = emitter.clone();
        let last = last.clone();
        scheduler.add(move |time| {
            let dt = last.get().map_or(0.0, |prev| (time - prev) * 0.001);
            last.set(Some(time));
            if let Some(step) = animate.borrow_mut().advance(dt) {
                emitter.emit(&step.value);
            }
        });
    }

    let clock = ManualClock::new(0.0);
    for _ in 0..600 {
        clock.advance(scheduler.frame_interval_ms());
        scheduler.tick_with(&clock);
        if !animate.borrow().is_running() {
            break;
        }
    }

    let values = values.borrow();
    assert!(values.len() > 10);
    assert_eq!(values.last().copied(), Some(300.0));
    assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
}

/// A listener can unsubscribe itself mid-dispatch without disturbing others
#[test]
fn test_subscription_dropped_during_dispatch() {
    let emitter = Emitter::<u32>::new();
    let slot: Rc<RefCell<Option<glide_core::Subscription>>> = Rc::new(RefCell::new(None));
    let once_count = Rc::new(Cell::new(0));
    let all_count = Rc::new(Cell::new(0));

    let own = slot.clone();
    let once = once_count.clone();
    let subscription = emitter.subscribe(move |_| {
        once.set(once.get() + 1);
        own.borrow_mut().take();
    });
    *slot.borrow_mut() = Some(subscription);

    let all = all_count.clone();
    let _keep = emitter.subscribe(move |_| all.set(all.get() + 1));

    emitter.emit(&1);
    emitter.emit(&2);

    assert_eq!(once_count.get(), 1);
    assert_eq!(all_count.get(), 2);
    assert_eq!(emitter.len(), 1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Activity {
    Idle,
    Moving,
}

#[derive(Debug, Clone, Copy)]
enum ActivityEvent {
    Moved,
    Quiet,
}

impl StateTransitions<ActivityEvent> for Activity {
    fn on_event(&self, event: ActivityEvent) -> Option<Self> {
        match (self, event) {
            (_, ActivityEvent::Moved) => Some(Activity::Moving),
            (Activity::Moving, ActivityEvent::Quiet) => Some(Activity::Idle),
            _ => None,
        }
    }
}

/// Every move reschedules the quiet timeout; only the last one fires
#[test]
fn test_idle_timeout_cycle() {
    let clock = ManualClock::new(0.0);
    let mut timeout = Timeout::new();
    let mut activity = Activity::Idle;

    for _ in 0..5 {
        activity.apply(ActivityEvent::Moved);
        timeout.schedule(clock.now_ms(), 400.0);
        clock.advance(100.0);
        assert!(!timeout.fire_if_due(clock.now_ms()));
    }
    assert_eq!(activity, Activity::Moving);

    clock.advance(300.0);
    if timeout.fire_if_due(clock.now_ms()) {
        activity.apply(ActivityEvent::Quiet);
    }
    assert_eq!(activity, Activity::Idle);
    assert!(!timeout.is_pending());
}
