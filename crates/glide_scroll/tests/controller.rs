use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glide_core::{ManualClock, TouchInput, WheelInput};
use glide_scroll::{
    AnchorOptions, Axis, Gate, Keyword, MemoryHost, MemoryNode, NodeStyle, Overflow, Rect,
    ScrollContainer, ScrollController, ScrollHost, ScrollOptions, ScrollRoot, ScrollToOptions,
    ScrollingMode, Size,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

/// Delivers host events and frames the way a browser would
struct Driver {
    scroller: ScrollController<MemoryHost>,
    clock: ManualClock,
    time: f64,
}

impl Driver {
    fn new(host: MemoryHost, container: ScrollContainer, options: ScrollOptions) -> Self {
        let clock = host.clock();
        let scroller = ScrollController::new(host, container, options).expect("valid options");
        let mut driver = Self {
            scroller,
            clock,
            time: 0.0,
        };
        driver.scroller.raf(0.0);
        driver
    }

    fn page(viewport_height: f64, content_height: f64, options: ScrollOptions) -> Self {
        let host = MemoryHost::page(
            Size::new(1200.0, viewport_height),
            Size::new(1200.0, content_height),
        );
        let doc = host.document_element();
        Self::new(host, ScrollContainer::window(doc), options)
    }

    fn deliver_host_events(&mut self) {
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

    fn frame(&mut self) {
        self.clock.advance(FRAME_MS);
        self.time += FRAME_MS;
        self.deliver_host_events();
        self.scroller.raf(self.time);
    }

    fn frames(&mut self, count: usize) {
        for _ in 0..count {
            self.frame();
        }
    }

    /// Run frames until the animation settles
    fn settle(&mut self) {
        let mut guard = 0;
        while self.scroller.is_animating() {
            self.frame();
            guard += 1;
            assert!(guard < 2000, "animation never settled");
        }
        // One more frame flushes deferred tasks and echo events
        self.frame();
    }

    fn wheel(&mut self, delta_y: f64) -> glide_core::InputResponse {
        self.scroller.on_wheel(&mut WheelInput::pixels(0.0, delta_y))
    }
}

fn standard_page() -> Driver {
    Driver::page(900.0, 2400.0, ScrollOptions::default())
}

#[test]
fn test_limit_and_bottom_keyword() {
    let mut driver = standard_page();
    assert_eq!(driver.scroller.limit(), 1500.0);

    driver
        .scroller
        .scroll_to(Keyword::Bottom, ScrollToOptions::default());
    driver.settle();
    assert_eq!(driver.scroller.scroll(), 1500.0);
    assert_eq!(driver.scroller.actual_scroll(), 1500.0);

    driver.wheel(50.0);
    assert_eq!(driver.scroller.target_scroll(), 1500.0);
    assert!(!driver.scroller.is_animating());
}

#[test]
fn test_immediate_scroll_clamps_synchronously() {
    let mut driver = standard_page();

    driver
        .scroller
        .scroll_to(5000.0, ScrollToOptions::immediate());
    assert_eq!(driver.scroller.animated_scroll(), 1500.0);
    assert_eq!(driver.scroller.target_scroll(), 1500.0);

    driver
        .scroller
        .scroll_to(-300.0, ScrollToOptions::immediate());
    assert_eq!(driver.scroller.animated_scroll(), 0.0);
    assert_eq!(driver.scroller.target_scroll(), 0.0);
    assert_eq!(driver.scroller.mode(), ScrollingMode::Idle);
}

#[test]
fn test_replaced_scroll_never_completes() {
    let mut driver = standard_page();
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));

    let f = first.clone();
    driver.scroller.scroll_to(
        800.0,
        ScrollToOptions::default().on_complete(move |_| f.set(f.get() + 1)),
    );
    driver.frames(3);

    let s = second.clone();
    driver.scroller.scroll_to(
        200.0,
        ScrollToOptions::default().on_complete(move |snapshot| {
            assert_eq!(snapshot.scroll, 200.0);
            s.set(s.get() + 1)
        }),
    );
    driver.settle();

    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
    assert_eq!(driver.scroller.scroll(), 200.0);
}

#[test]
fn test_stop_blocks_gestures_until_start() {
    let mut driver = standard_page();
    driver.scroller.stop();
    driver.scroller.stop();

    let response = driver.wheel(100.0);
    assert!(response.prevent_default);
    assert!(!response.claimed);
    driver.frames(10);
    assert_eq!(driver.scroller.target_scroll(), 0.0);
    assert_eq!(driver.scroller.scroll(), 0.0);

    driver.scroller.scroll_to(400.0, ScrollToOptions::immediate());
    assert_eq!(driver.scroller.scroll(), 0.0);

    driver.scroller.start();
    assert!(!driver.scroller.is_stopped());
    driver.wheel(100.0);
    assert_eq!(driver.scroller.target_scroll(), 100.0);
    driver.settle();
    assert_eq!(driver.scroller.scroll(), 100.0);
}

#[test]
fn test_reset_is_idempotent() {
    let mut driver = standard_page();

    driver.scroller.scroll_to(500.0, ScrollToOptions::default());
    driver.scroller.reset();
    let first = driver.scroller.snapshot();

    driver.scroller.scroll_to(500.0, ScrollToOptions::default());
    driver.scroller.reset();
    let second = driver.scroller.snapshot();

    assert_eq!(first, second);
    assert_eq!(second.animated_scroll, 0.0);
    assert_eq!(second.mode, ScrollingMode::Idle);

    driver.scroller.scroll_to(500.0, ScrollToOptions::default());
    driver.settle();
    driver.scroller.reset();
    let settled = driver.scroller.snapshot();
    driver.scroller.reset();
    assert_eq!(settled, driver.scroller.snapshot());
    assert_eq!(settled.target_scroll, 500.0);
}

#[test]
fn test_infinite_picks_shorter_wrap() {
    let options = ScrollOptions {
        infinite: true,
        ..Default::default()
    };
    let mut driver = Driver::page(900.0, 1900.0, options);
    assert_eq!(driver.scroller.limit(), 1000.0);

    driver.scroller.scroll_to(950.0, ScrollToOptions::immediate());
    driver.frame();
    assert_eq!(driver.scroller.scroll(), 950.0);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let _sub = driver
        .scroller
        .on_scroll(move |snapshot| s.borrow_mut().push(snapshot.animated_scroll));

    driver.scroller.scroll_to(50.0, ScrollToOptions::default());
    driver.settle();

    let seen = seen.borrow();
    let peak = seen.iter().copied().fold(f64::MIN, f64::max);
    // Forward across the wrap point instead of back down the range
    assert!(peak > 1040.0 && peak <= 1050.0);
    assert!(seen.iter().all(|value| *value >= 950.0 || *value == 50.0));
    assert_eq!(driver.scroller.scroll(), 50.0);
}

#[test]
fn test_nothing_to_scroll() {
    let mut driver = Driver::page(900.0, 900.0, ScrollOptions::default());
    assert_eq!(driver.scroller.limit(), 0.0);
    assert_eq!(driver.scroller.progress(), 1.0);

    let completed = Rc::new(Cell::new(false));
    let c = completed.clone();
    driver.scroller.scroll_to(
        300.0,
        ScrollToOptions::default().on_complete(move |_| c.set(true)),
    );
    assert!(completed.get());
    assert!(!driver.scroller.is_animating());

    driver.wheel(120.0);
    driver.frames(5);
    assert_eq!(driver.scroller.scroll(), 0.0);
}

#[test]
fn test_nothing_to_scroll_in_infinite_mode() {
    let options = ScrollOptions {
        infinite: true,
        ..Default::default()
    };
    let mut driver = Driver::page(900.0, 900.0, options);
    assert_eq!(driver.scroller.limit(), 0.0);

    driver.wheel(50.0);
    assert_eq!(driver.scroller.target_scroll(), 0.0);
    assert!(!driver.scroller.is_animating());

    driver.scroller.scroll_to(300.0, ScrollToOptions::default());
    assert!(!driver.scroller.is_animating());

    driver.frames(5);
    assert_eq!(driver.scroller.scroll(), 0.0);
    assert_eq!(driver.scroller.animated_scroll(), 0.0);
    assert_eq!(driver.scroller.actual_scroll(), 0.0);
    assert_eq!(driver.scroller.progress(), 1.0);
}

fn infinite_page() -> Driver {
    let options = ScrollOptions {
        infinite: true,
        ..Default::default()
    };
    Driver::page(900.0, 1900.0, options)
}

#[test]
fn test_infinite_wheel_wraps_below_zero() {
    let mut driver = infinite_page();

    driver.wheel(-100.0);
    assert_eq!(driver.scroller.target_scroll(), -100.0);
    driver.settle();

    assert_eq!(driver.scroller.scroll(), 900.0);
    // Completion resyncs to the wrapped native offset
    assert_eq!(driver.scroller.animated_scroll(), 900.0);
    assert_eq!(driver.scroller.actual_scroll(), 900.0);
    assert_eq!(driver.scroller.target_scroll(), 900.0);
}

#[test]
fn test_infinite_wheel_wraps_past_limit() {
    let mut driver = infinite_page();
    driver.scroller.scroll_to(950.0, ScrollToOptions::immediate());
    driver.frame();

    driver.wheel(100.0);
    assert_eq!(driver.scroller.target_scroll(), 1050.0);
    for _ in 0..10 {
        driver.frame();
        let native = driver.scroller.actual_scroll();
        assert!((0.0..1000.0).contains(&native));
        assert_eq!(native, driver.scroller.scroll());
    }
    driver.settle();

    assert_eq!(driver.scroller.scroll(), 50.0);
    assert_eq!(driver.scroller.actual_scroll(), 50.0);
}

#[test]
fn test_infinite_reset_mid_gesture_keeps_position() {
    let mut driver = infinite_page();
    driver.wheel(-100.0);
    driver.frames(3);
    assert!(driver.scroller.animated_scroll() < 0.0);

    let scroll = driver.scroller.scroll();
    driver.scroller.reset();
    assert!(!driver.scroller.is_animating());
    assert_eq!(driver.scroller.animated_scroll(), driver.scroller.actual_scroll());
    assert_eq!(driver.scroller.target_scroll(), driver.scroller.actual_scroll());
    assert_eq!(driver.scroller.scroll(), scroll);
}

#[test]
fn test_progress_and_direction() {
    let mut driver = standard_page();
    driver.wheel(300.0);
    driver.frame();
    assert_eq!(driver.scroller.direction(), 1);
    driver.settle();
    assert!((driver.scroller.progress() - 0.2).abs() < 1e-9);

    driver.wheel(-300.0);
    driver.frame();
    assert_eq!(driver.scroller.direction(), -1);
}

#[test]
fn test_mode_gate_table() {
    type Setup = fn(&mut Driver);

    fn idle(_: &mut Driver) {}
    fn native(driver: &mut Driver) {
        driver
            .scroller
            .host_mut()
            .scroll_natively(ScrollRoot::Window, Axis::Y, 200.0);
        driver.deliver_host_events();
    }
    fn smooth(driver: &mut Driver) {
        driver.scroller.scroll_to(800.0, ScrollToOptions::default());
    }
    fn stopped(driver: &mut Driver) {
        driver.scroller.stop();
    }
    fn stopped_forced(driver: &mut Driver) {
        driver.scroller.stop();
        driver
            .scroller
            .scroll_to(800.0, ScrollToOptions::default().with_force(true));
    }
    fn locked(driver: &mut Driver) {
        driver
            .scroller
            .scroll_to(800.0, ScrollToOptions::default().with_lock(true));
    }

    // (setup, mode, gate, wheel moves target, scroll_to accepted, native adopted)
    let table: [(Setup, ScrollingMode, Gate, bool, bool, bool); 6] = [
        (idle, ScrollingMode::Idle, Gate::default(), true, true, true),
        (native, ScrollingMode::Native, Gate::default(), true, true, true),
        (smooth, ScrollingMode::Smooth, Gate::default(), true, true, false),
        (
            stopped,
            ScrollingMode::Idle,
            Gate { stopped: true, locked: false },
            false,
            false,
            true,
        ),
        (
            stopped_forced,
            ScrollingMode::Smooth,
            Gate { stopped: true, locked: false },
            false,
            false,
            false,
        ),
        (
            locked,
            ScrollingMode::Smooth,
            Gate { stopped: false, locked: true },
            false,
            false,
            false,
        ),
    ];

    for (row, (setup, mode, gate, wheel_moves, scroll_to_accepted, native_adopted)) in
        table.into_iter().enumerate()
    {
        let mut driver = standard_page();
        setup(&mut driver);
        assert_eq!(driver.scroller.mode(), mode, "row {row}: mode");
        assert_eq!(driver.scroller.gate(), gate, "row {row}: gate");

        let before = driver.scroller.target_scroll();
        let response = driver.wheel(100.0);
        assert!(response.prevent_default, "row {row}: wheel prevented");
        assert_eq!(
            driver.scroller.target_scroll() != before,
            wheel_moves,
            "row {row}: wheel"
        );

        let mut driver = standard_page();
        setup(&mut driver);
        driver.scroller.scroll_to(100.0, ScrollToOptions::immediate());
        assert_eq!(
            driver.scroller.animated_scroll() == 100.0,
            scroll_to_accepted,
            "row {row}: scroll_to"
        );

        let mut driver = standard_page();
        setup(&mut driver);
        driver
            .scroller
            .host_mut()
            .scroll_natively(ScrollRoot::Window, Axis::Y, 333.0);
        driver.deliver_host_events();
        assert_eq!(
            driver.scroller.animated_scroll() == 333.0,
            native_adopted,
            "row {row}: native scroll"
        );
    }
}

#[test]
fn test_native_scroll_goes_idle_after_timeout() {
    let mut driver = standard_page();
    driver
        .scroller
        .host_mut()
        .scroll_natively(ScrollRoot::Window, Axis::Y, 240.0);
    driver.deliver_host_events();

    assert_eq!(driver.scroller.mode(), ScrollingMode::Native);
    assert_eq!(driver.scroller.velocity(), 240.0);
    assert_eq!(driver.scroller.target_scroll(), 240.0);

    // 23 frames is ~383ms
    driver.frames(23);
    assert_eq!(driver.scroller.mode(), ScrollingMode::Native);

    driver.frames(2);
    assert_eq!(driver.scroller.mode(), ScrollingMode::Idle);
    assert_eq!(driver.scroller.velocity(), 0.0);
    assert_eq!(driver.scroller.last_velocity(), 240.0);
}

#[test]
fn test_own_writes_are_not_adopted_as_native() {
    let mut driver = standard_page();
    let modes = Rc::new(RefCell::new(Vec::new()));
    let m = modes.clone();
    let _sub = driver
        .scroller
        .on_scroll(move |snapshot| m.borrow_mut().push(snapshot.mode));

    driver.scroller.scroll_to(600.0, ScrollToOptions::default());
    driver.settle();
    driver.frames(30);

    assert!(!modes.borrow().contains(&ScrollingMode::Native));
    assert_eq!(driver.scroller.mode(), ScrollingMode::Idle);
}

#[test]
fn test_scroll_end_fires_next_frame() {
    let mut driver = standard_page();
    let ends = Rc::new(Cell::new(0));
    let e = ends.clone();
    let sub = driver.scroller.on_scroll_end(move |_| e.set(e.get() + 1));

    driver.scroller.scroll_to(300.0, ScrollToOptions::immediate());
    assert_eq!(ends.get(), 0);
    driver.frame();
    assert_eq!(ends.get(), 1);

    drop(sub);
    driver.scroller.scroll_to(600.0, ScrollToOptions::immediate());
    driver.frame();
    assert_eq!(ends.get(), 1);
}

#[test]
fn test_callbacks_and_user_data() {
    let mut driver = standard_page();
    let started = Rc::new(Cell::new(false));
    let data_on_scroll = Rc::new(RefCell::new(None));

    let s = started.clone();
    let d = data_on_scroll.clone();
    let _sub = driver.scroller.on_scroll(move |snapshot| {
        if snapshot.user_data.is_some() {
            *d.borrow_mut() = snapshot.user_data.clone();
        }
    });

    driver.scroller.scroll_to(
        400.0,
        ScrollToOptions::default()
            .with_user_data(serde_json::json!({ "source": "menu" }))
            .on_start(move |snapshot| {
                assert_eq!(snapshot.mode, ScrollingMode::Smooth);
                s.set(true);
            }),
    );
    assert!(started.get());
    driver.settle();

    assert_eq!(
        data_on_scroll.borrow().as_ref(),
        Some(&serde_json::json!({ "source": "menu" }))
    );
    assert!(driver.scroller.user_data().is_none());
}

#[test]
fn test_lock_releases_on_completion() {
    let mut driver = standard_page();
    driver
        .scroller
        .scroll_to(700.0, ScrollToOptions::default().with_lock(true));
    assert!(driver.scroller.is_locked());

    driver.wheel(100.0);
    driver.scroller.scroll_to(10.0, ScrollToOptions::default());
    driver.settle();

    assert!(!driver.scroller.is_locked());
    assert_eq!(driver.scroller.scroll(), 700.0);

    driver
        .scroller
        .scroll_to(50.0, ScrollToOptions::default().with_lock(true));
    driver
        .scroller
        .scroll_to(900.0, ScrollToOptions::immediate().with_force(true));
    assert_eq!(driver.scroller.scroll(), 900.0);
    assert!(!driver.scroller.is_locked());
}

#[test]
fn test_tween_duration_option() {
    let options = ScrollOptions {
        duration: Some(0.5),
        ..Default::default()
    };
    let mut driver = Driver::page(900.0, 2400.0, options);
    driver.scroller.scroll_to(1000.0, ScrollToOptions::default());

    // 0.5s at 60fps is 30 frames
    driver.frames(29);
    assert!(driver.scroller.is_animating());
    driver.frames(2);
    assert!(!driver.scroller.is_animating());
    assert_eq!(driver.scroller.scroll(), 1000.0);
}

#[test]
fn test_element_and_selector_targets() {
    let mut host = MemoryHost::page(Size::new(1200.0, 900.0), Size::new(1200.0, 4000.0));
    let pricing = host.insert(
        MemoryNode::new(Rect::new(0.0, 2200.0, 1200.0, 400.0)).with_id("pricing"),
    );
    let doc = host.document_element();
    let mut driver = Driver::new(host, ScrollContainer::window(doc), ScrollOptions::default());

    driver
        .scroller
        .scroll_to("#pricing", ScrollToOptions::immediate().with_offset(-80.0));
    assert_eq!(driver.scroller.scroll(), 2120.0);

    driver
        .scroller
        .scroll_to(Keyword::Top, ScrollToOptions::immediate());
    driver
        .scroller
        .scroll_to(pricing, ScrollToOptions::immediate());
    assert_eq!(driver.scroller.scroll(), 2200.0);

    // Unknown selectors are ignored
    driver
        .scroller
        .scroll_to("#missing", ScrollToOptions::immediate());
    assert_eq!(driver.scroller.scroll(), 2200.0);
}

#[test]
fn test_element_root_targets_and_overscroll() {
    let mut host = MemoryHost::page(Size::new(1200.0, 900.0), Size::new(1200.0, 900.0));
    let wrapper = host.insert(
        MemoryNode::new(Rect::new(0.0, 100.0, 600.0, 500.0))
            .with_scroll_size(Size::new(600.0, 2000.0)),
    );
    let content = host.insert(
        MemoryNode::new(Rect::new(0.0, 100.0, 600.0, 2000.0)).with_parent(wrapper),
    );
    let item = host.insert(
        MemoryNode::new(Rect::new(0.0, 1100.0, 600.0, 100.0))
            .with_parent(content)
            .with_id("item"),
    );
    let mut driver = Driver::new(
        host,
        ScrollContainer::element(wrapper, content),
        ScrollOptions::default(),
    );
    assert_eq!(driver.scroller.limit(), 1500.0);

    driver.scroller.scroll_to(item, ScrollToOptions::immediate());
    assert_eq!(driver.scroller.scroll(), 1000.0);

    driver.scroller.scroll_to(0.0, ScrollToOptions::immediate());
    driver.frame();

    // At the top edge, scrolling up chains to the page
    let mut up = WheelInput::pixels(0.0, -40.0).with_path([item, content, wrapper]);
    let response = driver.scroller.on_wheel(&mut up);
    assert!(response.prevent_default);
    assert!(!response.claimed);
    assert!(!up.claimed);

    let mut down = WheelInput::pixels(0.0, 40.0).with_path([item, content, wrapper]);
    let response = driver.scroller.on_wheel(&mut down);
    assert!(response.claimed);
    assert!(down.claimed);

    // A claimed event is ignored by any other controller
    let before = driver.scroller.target_scroll();
    let response = driver.scroller.on_wheel(&mut down);
    assert_eq!(response, glide_core::InputResponse::PASS);
    assert_eq!(driver.scroller.target_scroll(), before);
}

#[test]
fn test_nested_scroller_absorbs_gesture() {
    let mut host = MemoryHost::page(Size::new(1200.0, 900.0), Size::new(1200.0, 3000.0));
    let list = host.insert(
        MemoryNode::new(Rect::new(0.0, 200.0, 400.0, 300.0))
            .with_scroll_size(Size::new(400.0, 900.0))
            .with_style(NodeStyle {
                overflow_y: Overflow::Scroll,
                ..Default::default()
            }),
    );
    let doc = host.document_element();
    let options = ScrollOptions {
        allow_nested_scroll: true,
        ..Default::default()
    };
    let mut driver = Driver::new(host, ScrollContainer::window(doc), options);

    let mut inside = WheelInput::pixels(0.0, 60.0).with_path([list, doc]);
    assert_eq!(
        driver.scroller.on_wheel(&mut inside),
        glide_core::InputResponse::PASS
    );
    assert_eq!(driver.scroller.target_scroll(), 0.0);

    // Scrolling up inside a list already at its top goes to the page
    driver.scroller.scroll_to(500.0, ScrollToOptions::immediate());
    let mut up = WheelInput::pixels(0.0, -60.0).with_path([list, doc]);
    assert!(driver.scroller.on_wheel(&mut up).prevent_default);
    assert_eq!(driver.scroller.target_scroll(), 440.0);
}

#[test]
fn test_ctrl_wheel_is_left_to_host() {
    let mut driver = standard_page();
    let mut zoom = WheelInput::pixels(0.0, 100.0).with_modifiers(glide_core::Modifiers::ctrl_only());
    assert_eq!(
        driver.scroller.on_wheel(&mut zoom),
        glide_core::InputResponse::PASS
    );
    assert_eq!(driver.scroller.target_scroll(), 0.0);
}

#[test]
fn test_native_wheel_when_smoothing_disabled() {
    let options = ScrollOptions {
        smooth_wheel: false,
        ..Default::default()
    };
    let mut driver = Driver::page(900.0, 2400.0, options);
    driver.scroller.scroll_to(800.0, ScrollToOptions::default());
    driver.frames(2);

    let response = driver.wheel(100.0);
    assert!(!response.prevent_default);
    assert!(response.claimed);
    assert_eq!(driver.scroller.mode(), ScrollingMode::Native);
    assert!(!driver.scroller.is_animating());
}

#[test]
fn test_sync_touch_and_inertia() {
    let options = ScrollOptions {
        sync_touch: true,
        ..Default::default()
    };
    let mut driver = Driver::page(900.0, 4000.0, options);

    let response = driver
        .scroller
        .on_touch(&mut TouchInput::start(100.0, 600.0));
    assert!(!response.prevent_default);
    assert!(driver.scroller.is_touching());

    driver.scroller.on_touch(&mut TouchInput::moved(100.0, 580.0));
    assert_eq!(driver.scroller.target_scroll(), 20.0);
    driver.frame();
    driver.scroller.on_touch(&mut TouchInput::moved(100.0, 560.0));
    assert_eq!(driver.scroller.target_scroll(), 40.0);
    driver.frame();
    let velocity = driver.scroller.velocity();
    assert!(velocity > 0.0);

    driver.scroller.on_touch(&mut TouchInput::end(100.0, 560.0));
    assert!(!driver.scroller.is_touching());
    let expected = (40.0 + velocity * 35.0).round();
    assert_eq!(driver.scroller.target_scroll(), expected);
    assert!(expected > 60.0);
}

#[test]
fn test_tap_stops_smooth_scroll() {
    let options = ScrollOptions {
        sync_touch: true,
        ..Default::default()
    };
    let mut driver = Driver::page(900.0, 4000.0, options);
    driver.scroller.scroll_to(2000.0, ScrollToOptions::default());
    driver.frames(5);
    let position = driver.scroller.scroll();
    assert!(position > 0.0);

    driver.scroller.on_touch(&mut TouchInput::start(10.0, 10.0));
    assert!(!driver.scroller.is_animating());
    assert_eq!(driver.scroller.mode(), ScrollingMode::Idle);
    driver.frames(5);
    assert_eq!(driver.scroller.scroll(), position);
}

#[test]
fn test_horizontal_with_both_gesture_axes() {
    let host = MemoryHost::page(Size::new(1000.0, 800.0), Size::new(5000.0, 800.0));
    let doc = host.document_element();
    let mut driver = Driver::new(host, ScrollContainer::window(doc), ScrollOptions::horizontal());
    assert!(driver.scroller.is_horizontal());
    assert_eq!(driver.scroller.limit(), 4000.0);

    driver.wheel(120.0);
    assert_eq!(driver.scroller.target_scroll(), 120.0);
    driver
        .scroller
        .on_wheel(&mut WheelInput::pixels(-200.0, 30.0));
    assert_eq!(driver.scroller.target_scroll(), 0.0);
}

#[test]
fn test_vertical_ignores_horizontal_only_gestures() {
    let mut driver = standard_page();
    let response = driver
        .scroller
        .on_wheel(&mut WheelInput::pixels(80.0, 0.0));
    assert_eq!(response, glide_core::InputResponse::PASS);
    assert_eq!(driver.scroller.target_scroll(), 0.0);
}

#[test]
fn test_virtual_scroll_filter_and_channel() {
    let seen = Rc::new(Cell::new(0));
    let options = ScrollOptions::default().with_virtual_scroll(|gesture| gesture.delta_y < 500.0);
    let mut driver = Driver::page(900.0, 2400.0, options);

    let s = seen.clone();
    let _sub = driver.scroller.on_virtual_scroll(move |_| s.set(s.get() + 1));

    driver.wheel(100.0);
    driver.wheel(900.0);
    assert_eq!(seen.get(), 1);
    assert_eq!(driver.scroller.target_scroll(), 100.0);
}

#[test]
fn test_debounced_content_resize() {
    let mut driver = standard_page();
    driver
        .scroller
        .host_mut()
        .set_content_size(Size::new(1200.0, 5000.0));
    driver.frame();
    assert_eq!(driver.scroller.limit(), 1500.0);

    // 250ms debounce
    driver.frames(16);
    assert_eq!(driver.scroller.limit(), 4100.0);

    driver.scroller.host_mut().set_window_size(Size::new(1200.0, 1000.0));
    driver.frames(17);
    assert_eq!(driver.scroller.limit(), 4000.0);
}

#[test]
fn test_resize_resyncs_now() {
    let options = ScrollOptions {
        auto_resize: false,
        ..Default::default()
    };
    let mut driver = Driver::page(900.0, 2400.0, options);
    driver
        .scroller
        .host_mut()
        .set_content_size(Size::new(1200.0, 3000.0));
    driver.frames(30);
    assert_eq!(driver.scroller.limit(), 1500.0);

    driver.scroller.resize();
    assert_eq!(driver.scroller.limit(), 2100.0);
}

#[test]
fn test_anchor_clicks() {
    let mut host = MemoryHost::page(Size::new(1200.0, 900.0), Size::new(1200.0, 3000.0));
    host.insert(MemoryNode::new(Rect::new(0.0, 1200.0, 1200.0, 300.0)).with_id("faq"));
    let doc = host.document_element();
    let options = ScrollOptions {
        anchors: Some(AnchorOptions {
            offset: -100.0,
            immediate: true,
            ..Default::default()
        }),
        ..Default::default()
    };
    let mut driver = Driver::new(host, ScrollContainer::window(doc), options);

    assert!(driver.scroller.on_anchor_click("#faq"));
    assert_eq!(driver.scroller.scroll(), 1100.0);

    assert!(driver.scroller.on_anchor_click("/#top"));
    assert_eq!(driver.scroller.scroll(), 0.0);

    assert!(!driver.scroller.on_anchor_click("https://example.com/#faq"));

    let mut plain = standard_page();
    assert!(!plain.scroller.on_anchor_click("#faq"));
}

#[test]
fn test_destroy_drops_subscribers() {
    let mut driver = standard_page();
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    let sub = driver.scroller.on_scroll(move |_| c.set(c.get() + 1));

    driver.scroller.destroy();
    driver.wheel(100.0);
    driver.frames(5);
    assert_eq!(count.get(), 0);
    assert_eq!(driver.scroller.host().observer_count(), 0);

    // Dropping a subscription after destroy is harmless
    drop(sub);
}
