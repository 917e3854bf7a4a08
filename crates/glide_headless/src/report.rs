//! Report output model for headless scroll runs.

use anyhow::{bail, Result};
use glide_scroll::ScrollSnapshot;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};

/// Report status for a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Machine-readable result of a headless run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub message: Option<String>,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    pub scroll_events: u64,
    pub scroll_end_events: u64,
    /// Controller state when the run ended
    pub final_state: Option<ScrollSnapshot>,
}

impl HeadlessReport {
    pub fn passed(elapsed_frames: u64, elapsed_ms: u64) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            message: None,
            elapsed_frames,
            elapsed_ms,
            scroll_events: 0,
            scroll_end_events: 0,
            final_state: None,
        }
    }

    pub fn failed(
        assertion: &str,
        failed_step_index: usize,
        message: String,
        elapsed_frames: u64,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(failed_step_index),
            assertion: Some(assertion.to_string()),
            message: Some(message),
            ..Self::passed(elapsed_frames, elapsed_ms)
        }
    }

    /// Attach final state and event counts.
    pub fn with_state(mut self, snapshot: ScrollSnapshot, scroll: u64, scroll_end: u64) -> Self {
        self.final_state = Some(snapshot);
        self.scroll_events = scroll;
        self.scroll_end_events = scroll_end;
        self
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report under the working directory.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        ensure_relative(path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", self.to_json()?)?;
        Ok(())
    }
}

fn ensure_relative(path: &Path) -> Result<()> {
    if path.is_absolute() || path.has_root() {
        bail!("report path must be relative: {}", path.display());
    }
    let escapes = path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
    if escapes {
        bail!("report path must stay inside the working directory: {}", path.display());
    }
    Ok(())
}
