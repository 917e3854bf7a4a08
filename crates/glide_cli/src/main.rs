//! Glide CLI
//!
//! Run headless scroll scenarios and manage glide.toml.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glide_core::{Clock, SystemClock};
use glide_headless::{run_loaded_scenario, HeadlessScenario, RunOutcome};
use notify::{EventKind, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::{GlideConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "glide")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Glide smooth-scroll CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless scroll scenario
    Run {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Config file or directory containing glide.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the JSON report to this relative path instead of stdout
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Milliseconds per frame (overrides the config)
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Re-run whenever the scenario or config changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Write a default glide.toml
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        path: String,
    },

    /// Validate a glide.toml
    Check {
        /// Config file or directory
        #[arg(default_value = ".")]
        path: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flag
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            report,
            tick_ms,
            watch,
        } => cmd_run(&scenario, config.as_deref(), report.as_deref(), tick_ms, watch),

        Commands::Init { path } => cmd_init(&path),

        Commands::Check { path } => cmd_check(&path),
    }
}

fn load_config(path: Option<&Path>) -> Result<GlideConfig> {
    match path {
        Some(path) => GlideConfig::load_from_path(path),
        None => {
            let local = Path::new(".");
            if GlideConfig::config_path(local).exists() {
                GlideConfig::load_from_path(local)
            } else {
                debug!("no {CONFIG_FILE} found, using defaults");
                Ok(GlideConfig::default())
            }
        }
    }
}

/// Load everything fresh and run the scenario once
fn run_once(
    scenario_path: &Path,
    config_path: Option<&Path>,
    report_path: Option<&Path>,
    tick_ms: Option<u64>,
) -> Result<RunOutcome> {
    let config = load_config(config_path)?;
    let scenario = HeadlessScenario::from_path(scenario_path)?;

    let mut run_cfg = config.headless.run_config();
    if let Some(tick_ms) = tick_ms {
        run_cfg.tick_ms = tick_ms;
    }

    info!(
        "Running {} ({} steps, {}ms frames)",
        scenario_path.display(),
        scenario.steps.len(),
        run_cfg.tick_ms
    );
    let wall = SystemClock::new();
    let outcome = run_loaded_scenario(&scenario, run_cfg, &config.scroll)?;
    debug!("scenario ran in {:.1}ms wall time", wall.now_ms());

    let report = outcome.report();
    match report_path {
        Some(path) => {
            report
                .write_to_path(path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => report.write_to_writer(&mut std::io::stdout().lock())?,
    }

    match &outcome {
        RunOutcome::Passed { report } => info!(
            "Passed in {} frames ({}ms)",
            report.elapsed_frames, report.elapsed_ms
        ),
        RunOutcome::Failed { report } => warn!(
            "Failed at step {}: {}",
            report.failed_step_index.unwrap_or_default(),
            report.message.as_deref().unwrap_or("assertion failed")
        ),
    }
    Ok(outcome)
}

fn cmd_run(
    scenario: &Path,
    config: Option<&Path>,
    report: Option<&Path>,
    tick_ms: Option<u64>,
    watch: bool,
) -> Result<()> {
    if !watch {
        let outcome = run_once(scenario, config, report, tick_ms)?;
        if outcome.is_failed() {
            anyhow::bail!("scenario {} failed", scenario.display());
        }
        return Ok(());
    }

    if let Err(err) = run_once(scenario, config, report, tick_ms) {
        warn!("{err:#}");
    }

    let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to start file watcher")?;
    watcher
        .watch(scenario, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", scenario.display()))?;
    if let Some(config) = config {
        let config_file = GlideConfig::config_path(config);
        watcher
            .watch(&config_file, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", config_file.display()))?;
    }

    info!("Watching {} for changes (Ctrl-C to quit)", scenario.display());
    for event in rx {
        match event {
            Ok(event) if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) => {
                debug!("change detected: {:?}", event.paths);
                if let Err(err) = run_once(scenario, config, report, tick_ms) {
                    warn!("{err:#}");
                }
            }
            Ok(_) => {}
            Err(err) => warn!("watch error: {err}"),
        }
    }
    Ok(())
}

fn cmd_init(path: &str) -> Result<()> {
    let dir = PathBuf::from(path);
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    fs::create_dir_all(&dir)?;
    fs::write(&config_path, GlideConfig::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    info!("Created {}", config_path.display());
    info!("Run `glide run <scenario.json>` to try it");
    Ok(())
}

fn cmd_check(path: &str) -> Result<()> {
    let path = PathBuf::from(path);
    let config = GlideConfig::load_from_path(&path)?;

    info!(
        "{} is valid: {:?} scrolling, {}",
        GlideConfig::config_path(&path).display(),
        config.scroll.orientation,
        match (config.scroll.duration, config.scroll.lerp) {
            (Some(duration), _) => format!("{duration}s tween"),
            (None, Some(lerp)) => format!("lerp {lerp}"),
            (None, None) => "no smoothing".to_string(),
        }
    );
    Ok(())
}
