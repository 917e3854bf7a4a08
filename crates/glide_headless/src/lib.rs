//! Glide Headless
//!
//! Replays JSON scroll scenarios against an in-memory page with a
//! deterministic frame clock, checks assertions along the way and produces
//! a machine-readable report.
//!
//! ```rust
//! use glide_headless::run_scenario;
//!
//! let outcome = run_scenario(r#"{
//!     "steps": [
//!         { "type": "wheel", "delta_y": 240 },
//!         { "type": "settle" },
//!         { "type": "assert_scroll", "value": 240 },
//!         { "type": "assert_events", "scroll_end": 1 }
//!     ]
//! }"#).unwrap();
//! assert!(!outcome.is_failed());
//! ```

pub mod assert;
pub mod report;
pub mod runner;
pub mod runtime;
pub mod scenario;

pub use assert::{AssertionResult, ScrollProbe, StateExpectation};
pub use report::{HeadlessReport, ReportStatus};
pub use runner::{run_loaded_scenario, run_scenario, RunOutcome};
pub use runtime::{EventCounters, HeadlessRunConfig, HeadlessRuntime};
pub use scenario::{HeadlessScenario, NodeSpec, PageSpec, RootSpec, ScenarioStep, TargetSpec};
