//! Glide configuration file handling

use anyhow::{Context, Result};
use glide_headless::HeadlessRunConfig;
use glide_scroll::ScrollOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "glide.toml";

/// Top-level Glide configuration (glide.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GlideConfig {
    /// Scroll options used by scenarios that carry none of their own
    #[serde(default)]
    pub scroll: ScrollOptions,
    #[serde(default)]
    pub headless: HeadlessConfig,
}

/// Frame loop settings for `glide run`
#[derive(Debug, Deserialize, Serialize)]
pub struct HeadlessConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
}

fn default_tick_ms() -> u64 {
    16
}

fn default_max_frames() -> u32 {
    2_000
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            max_frames: default_max_frames(),
        }
    }
}

impl HeadlessConfig {
    pub fn run_config(&self) -> HeadlessRunConfig {
        HeadlessRunConfig {
            tick_ms: self.tick_ms,
            max_frames: self.max_frames,
        }
    }
}

impl GlideConfig {
    /// Resolve `path` to a config file: a file is used as is, a directory
    /// is searched for glide.toml
    pub fn config_path(path: &Path) -> PathBuf {
        if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        }
    }

    /// Load configuration from a file or a directory containing glide.toml
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_path = Self::config_path(path);

        if !config_path.exists() {
            anyhow::bail!(
                "No {CONFIG_FILE} found in {}. Run `glide init` to create one.",
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GlideConfig = toml::from_str(content)?;
        config.scroll.validate()?;
        config.headless.run_config().validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
