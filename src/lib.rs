//! # LaserTime
//!
//! Machining time study for laser/plasma NC programs.
//!
//! LaserTime is organized as a workspace with multiple crates:
//!
//! 1. **lasertime-core** - Units, controller codes, machine parameters, errors
//! 2. **lasertime-estimator** - Tokenizer, modal interpreter, motion and arc models, reports
//! 3. **lasertime-settings** - Config files (TOML/JSON), validation, defaults
//! 4. **lasertime** - Command-line binary that integrates all crates
//!
//! The library half of this crate holds what the binary needs beyond argument
//! parsing: logging setup, config overrides, batch analysis and rendering.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

pub use lasertime_core::{
    ControllerCodes, Error, GcodeError, ParameterSet, Positioning, Result, Units,
};
pub use lasertime_estimator::{analyze, Segment, SegmentKind, StudyResult, TimeStudy};
pub use lasertime_settings::{ConfigError, SettingsError, StudyConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging on stderr, leaving stdout for reports:
/// - RUST_LOG environment variable support (defaults to `info`)
/// - Pretty console formatting, or one JSON object per event when `json` is set
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON array with one object per file
    #[default]
    Json,
    /// Human-readable summary per file
    Text,
}

/// Command-line overrides layered on top of a loaded config
#[derive(Debug, Clone, Default, Args)]
pub struct StudyOverrides {
    /// Rapid acceleration in g
    #[arg(long)]
    pub rapid_accel: Option<f64>,

    /// Cutting acceleration in g
    #[arg(long)]
    pub cut_accel: Option<f64>,

    /// Pierce dwell in seconds
    #[arg(long)]
    pub pierce_time: Option<f64>,

    /// Lifter dwell in seconds
    #[arg(long)]
    pub lifter_time: Option<f64>,

    /// Rapid feed in inches per minute
    #[arg(long)]
    pub default_rapid: Option<f64>,

    /// Cutting feed in inches per minute, used until the program sets one
    #[arg(long)]
    pub default_cut: Option<f64>,

    /// Beam-on command token
    #[arg(long)]
    pub beam_on: Option<String>,

    /// Beam-off command token
    #[arg(long)]
    pub beam_off: Option<String>,

    /// Inch units command token
    #[arg(long)]
    pub inch_mode: Option<String>,

    /// Metric units command token
    #[arg(long)]
    pub metric_mode: Option<String>,

    /// Absolute positioning command token
    #[arg(long)]
    pub absolute_mode: Option<String>,

    /// Relative positioning command token
    #[arg(long)]
    pub relative_mode: Option<String>,

    /// Edge length of the toolpath display box
    #[arg(long)]
    pub display_box: Option<f64>,
}

impl StudyOverrides {
    /// Apply every provided override, then validate the result
    pub fn apply(&self, config: &mut StudyConfig) -> std::result::Result<(), SettingsError> {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut config.machine.rapid_accel_g, &self.rapid_accel);
        set(&mut config.machine.cut_accel_g, &self.cut_accel);
        set(&mut config.machine.pierce_time_s, &self.pierce_time);
        set(&mut config.machine.lifter_time_s, &self.lifter_time);
        set(&mut config.machine.default_rapid_ipm, &self.default_rapid);
        set(&mut config.machine.default_cut_ipm, &self.default_cut);
        set(&mut config.codes.beam_on, &self.beam_on);
        set(&mut config.codes.beam_off, &self.beam_off);
        set(&mut config.codes.inch_mode, &self.inch_mode);
        set(&mut config.codes.metric_mode, &self.metric_mode);
        set(&mut config.codes.absolute_mode, &self.absolute_mode);
        set(&mut config.codes.relative_mode, &self.relative_mode);
        set(&mut config.output.display_box, &self.display_box);

        config.validate()
    }
}

/// Resolve the effective config: explicit file, else the default location, then overrides
pub fn load_config(
    path: Option<&Path>,
    overrides: &StudyOverrides,
) -> std::result::Result<StudyConfig, SettingsError> {
    let mut config = match path {
        Some(path) => StudyConfig::load_from_file(path)?,
        None => StudyConfig::load_or_default(&StudyConfig::default_config_path())?,
    };
    overrides.apply(&mut config)?;
    Ok(config)
}

/// Outcome of analyzing one input file
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FileReport {
    Completed(StudyResult),
    Failed { filename: String, error: String },
}

impl FileReport {
    pub fn filename(&self) -> &str {
        match self {
            FileReport::Completed(result) => &result.filename,
            FileReport::Failed { filename, .. } => filename,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FileReport::Failed { .. })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Analyze one file on disk
pub fn analyze_file(study: &TimeStudy, path: &Path) -> FileReport {
    let filename = display_name(path);
    let outcome = std::fs::read(path)
        .map_err(Error::from)
        .and_then(|bytes| study.run(&bytes, &filename));

    match outcome {
        Ok(result) => {
            info!(
                "{}: {:.3} s total, {} pierces",
                filename, result.total_time_sec, result.pierce_count
            );
            FileReport::Completed(result)
        }
        Err(e) => {
            warn!("{}: analysis failed: {}", filename, e);
            FileReport::Failed {
                filename,
                error: format!("analysis failed: {}", e),
            }
        }
    }
}

/// Analyze files in parallel, returning reports in input order
pub fn analyze_files(paths: &[PathBuf], config: &StudyConfig) -> Vec<FileReport> {
    let study = TimeStudy::new(config.to_parameters()).with_display_box(config.output.display_box);
    paths
        .par_iter()
        .map(|path| analyze_file(&study, path))
        .collect()
}

/// Render reports in the requested format
pub fn render_reports(reports: &[FileReport], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for report in reports {
                match report {
                    FileReport::Completed(result) => writeln!(out, "{}", result)?,
                    FileReport::Failed { filename, error } => {
                        writeln!(out, "{}: {}", filename, error)?
                    }
                }
            }
            Ok(out)
        }
    }
}
