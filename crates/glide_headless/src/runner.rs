//! Scenario runner that replays scroll steps against a headless page.

use crate::assert::{
    evaluate_close, evaluate_events, evaluate_input, evaluate_state, AssertionResult,
    ScrollProbe, StateExpectation,
};
use crate::report::HeadlessReport;
use crate::runtime::{HeadlessRunConfig, HeadlessRuntime};
use crate::scenario::{HeadlessScenario, ScenarioStep};
use anyhow::Result;
use glide_core::{Modifiers, TouchInput, WheelInput};
use glide_scroll::{ScrollOptions, ScrollRoot, ScrollTarget, ScrollToOptions, Size};
use tracing::{debug, warn};

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON with default runtime config and options.
pub fn run_scenario(input: &str) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(&scenario, HeadlessRunConfig::default(), &ScrollOptions::default())
}

/// Execute a pre-loaded scenario.
///
/// `base_options` apply unless the scenario carries its own `options`.
/// Malformed scenarios (unknown node names, invalid options) are errors;
/// failed assertions produce [`RunOutcome::Failed`].
pub fn run_loaded_scenario(
    scenario: &HeadlessScenario,
    runtime_cfg: HeadlessRunConfig,
    base_options: &ScrollOptions,
) -> Result<RunOutcome> {
    runtime_cfg.validate()?;
    let options = scenario
        .options
        .clone()
        .unwrap_or_else(|| base_options.clone());
    let mut runtime = HeadlessRuntime::new(&scenario.page, options)?;

    for (step_index, step) in scenario.steps.iter().enumerate() {
        debug!("step {step_index}: {step:?}");
        if let Some(failure) = run_step(&mut runtime, runtime_cfg, step)? {
            let AssertionResult::Failed { code, message } = failure else {
                continue;
            };
            warn!("step {step_index} failed ({code}): {message}");
            let report = HeadlessReport::failed(
                assertion_name(step),
                step_index,
                message,
                runtime.elapsed_frames(),
                runtime.elapsed_ms(),
            );
            return Ok(RunOutcome::Failed {
                report: finish(report, &runtime),
            });
        }
    }

    let report = HeadlessReport::passed(runtime.elapsed_frames(), runtime.elapsed_ms());
    Ok(RunOutcome::Passed {
        report: finish(report, &runtime),
    })
}

fn finish(report: HeadlessReport, runtime: &HeadlessRuntime) -> HeadlessReport {
    report.with_state(
        runtime.scroller().snapshot(),
        runtime.counters().scroll(),
        runtime.counters().scroll_end(),
    )
}

fn probe(runtime: &HeadlessRuntime) -> ScrollProbe {
    ScrollProbe {
        snapshot: runtime.scroller().snapshot(),
        animating: runtime.scroller().is_animating(),
        scroll_events: runtime.counters().scroll(),
        scroll_end_events: runtime.counters().scroll_end(),
        last_input: runtime.last_input(),
    }
}

/// Apply one step. Returns an assertion result for assertion steps.
fn run_step(
    runtime: &mut HeadlessRuntime,
    cfg: HeadlessRunConfig,
    step: &ScenarioStep,
) -> Result<Option<AssertionResult>> {
    match step {
        ScenarioStep::Wait { ms } => {
            if *ms == 0 {
                runtime.deliver_host_events();
            }
            let mut remaining_ms = *ms;
            for _ in 0..wait_frames(*ms, cfg.tick_ms) {
                let step_ms = remaining_ms.min(cfg.tick_ms);
                remaining_ms = remaining_ms.saturating_sub(step_ms);
                runtime.frame(step_ms);
            }
        }
        ScenarioStep::Tick { frames } => {
            for _ in 0..*frames {
                runtime.frame(cfg.tick_ms);
            }
        }
        ScenarioStep::Settle => {
            let mut frames = 0;
            while runtime.scroller().is_animating() {
                if frames == cfg.max_frames {
                    return Ok(Some(AssertionResult::Failed {
                        code: "settle_timeout".to_string(),
                        message: format!("still animating after {frames} frames"),
                    }));
                }
                runtime.frame(cfg.tick_ms);
                frames += 1;
            }
            // One more frame lets deferred scroll-end and echo handling run
            runtime.frame(cfg.tick_ms);
        }
        ScenarioStep::Wheel {
            delta_x,
            delta_y,
            delta_mode,
            ctrl,
            path,
        } => {
            let modifiers = if *ctrl {
                Modifiers::ctrl_only()
            } else {
                Modifiers::NONE
            };
            let mut input = WheelInput::pixels(*delta_x, *delta_y)
                .with_mode(*delta_mode)
                .with_modifiers(modifiers)
                .with_path(runtime.resolve_path(path)?);
            let response = runtime.scroller_mut().on_wheel(&mut input);
            runtime.record_input(response);
        }
        ScenarioStep::Touch { phase, x, y, path } => {
            let mut input = TouchInput::new(*phase, *x, *y).with_path(runtime.resolve_path(path)?);
            let response = runtime.scroller_mut().on_touch(&mut input);
            runtime.record_input(response);
        }
        ScenarioStep::NativeScroll { value } => {
            let root = runtime.scroller().container().wrapper;
            let axis = runtime.scroller().options().axis();
            runtime
                .scroller_mut()
                .host_mut()
                .scroll_natively(root, axis, *value);
            runtime.deliver_host_events();
        }
        ScenarioStep::ScrollTo {
            target,
            offset,
            immediate,
            lock,
            lerp,
            duration,
            easing,
            force,
            programmatic,
            user_data,
        } => {
            let options = ScrollToOptions {
                offset: *offset,
                immediate: *immediate,
                lock: *lock,
                lerp: *lerp,
                duration: *duration,
                easing: *easing,
                force: *force,
                programmatic: *programmatic,
                user_data: user_data.clone(),
                ..Default::default()
            };
            runtime
                .scroller_mut()
                .scroll_to(ScrollTarget::from(target), options);
        }
        ScenarioStep::AnchorClick { href } => {
            let handled = runtime.scroller_mut().on_anchor_click(href);
            debug!("anchor {href}: handled={handled}");
        }
        ScenarioStep::Stop => runtime.scroller_mut().stop(),
        ScenarioStep::Start => runtime.scroller_mut().start(),
        ScenarioStep::Reset => runtime.scroller_mut().reset(),
        ScenarioStep::Resize => runtime.scroller_mut().resize(),
        ScenarioStep::Destroy => runtime.scroller_mut().destroy(),
        ScenarioStep::SetContentSize { width, height } => {
            let size = Size::new(*width, *height);
            let root = runtime.scroller().container().wrapper;
            let host = runtime.scroller_mut().host_mut();
            match root {
                ScrollRoot::Window => host.set_content_size(size),
                ScrollRoot::Element(wrapper) => host.set_scroll_size(wrapper, size),
            }
        }
        ScenarioStep::SetWindowSize { width, height } => {
            runtime
                .scroller_mut()
                .host_mut()
                .set_window_size(Size::new(*width, *height));
        }
        ScenarioStep::AssertScroll { value, tolerance } => {
            let actual = runtime.scroller().scroll();
            return Ok(Some(evaluate_close("scroll", actual, *value, *tolerance)));
        }
        ScenarioStep::AssertTarget { value, tolerance } => {
            let actual = runtime.scroller().target_scroll();
            return Ok(Some(evaluate_close("target_scroll", actual, *value, *tolerance)));
        }
        ScenarioStep::AssertLimit { value } => {
            let actual = runtime.scroller().limit();
            return Ok(Some(evaluate_close("limit", actual, *value, 0.0)));
        }
        ScenarioStep::AssertProgress { value, tolerance } => {
            let actual = runtime.scroller().progress();
            return Ok(Some(evaluate_close("progress", actual, *value, *tolerance)));
        }
        ScenarioStep::AssertState {
            mode,
            stopped,
            locked,
            animating,
        } => {
            let expected = StateExpectation {
                mode: *mode,
                stopped: *stopped,
                locked: *locked,
                animating: *animating,
            };
            return Ok(Some(evaluate_state(&expected, &probe(runtime))));
        }
        ScenarioStep::AssertInput {
            prevent_default,
            claimed,
        } => {
            return Ok(Some(evaluate_input(
                *prevent_default,
                *claimed,
                &probe(runtime),
            )));
        }
        ScenarioStep::AssertEvents {
            scroll_end,
            min_scroll,
        } => {
            return Ok(Some(evaluate_events(
                *scroll_end,
                *min_scroll,
                &probe(runtime),
            )));
        }
    }
    Ok(None)
}

fn assertion_name(step: &ScenarioStep) -> &'static str {
    match step {
        ScenarioStep::Settle => "settle",
        ScenarioStep::AssertScroll { .. } => "assert_scroll",
        ScenarioStep::AssertTarget { .. } => "assert_target",
        ScenarioStep::AssertLimit { .. } => "assert_limit",
        ScenarioStep::AssertProgress { .. } => "assert_progress",
        ScenarioStep::AssertState { .. } => "assert_state",
        ScenarioStep::AssertInput { .. } => "assert_input",
        ScenarioStep::AssertEvents { .. } => "assert_events",
        _ => "step",
    }
}

fn wait_frames(wait_ms: u64, tick_ms: u64) -> u32 {
    let frames = wait_ms.div_ceil(tick_ms.max(1));
    frames.min(u32::MAX as u64) as u32
}
