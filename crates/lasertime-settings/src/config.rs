//! Configuration and settings management for LaserTime
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats, stored by default in the platform
//! config directory.
//!
//! Configuration is organized into logical sections:
//! - Machine settings (accelerations, pierce/lifter dwell, default feeds)
//! - Controller codes (beam and mode tokens)
//! - Output preferences (toolpath display box)
//!
//! Every field is individually defaulted, so a file only needs the values it changes.

use lasertime_core::constants::DEFAULT_DISPLAY_BOX;
use lasertime_core::units::ipm_to_mm_per_min;
use lasertime_core::{ControllerCodes, ParameterSet};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Application directory name under the platform config dir
const APP_DIR: &str = "lasertime";
/// Default config file name
const CONFIG_FILE: &str = "config.toml";

/// Machine and process settings, in the units operators usually quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Rapid acceleration in g
    pub rapid_accel_g: f64,
    /// Cutting acceleration in g
    pub cut_accel_g: f64,
    /// Pierce dwell in seconds
    pub pierce_time_s: f64,
    /// Lifter dwell in seconds
    pub lifter_time_s: f64,
    /// Rapid feed in inches per minute
    pub default_rapid_ipm: f64,
    /// Cutting feed used when the program sets none, in inches per minute
    pub default_cut_ipm: f64,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            rapid_accel_g: 1.0,
            cut_accel_g: 0.5,
            pierce_time_s: 1.0,
            lifter_time_s: 0.5,
            default_rapid_ipm: 500.0,
            default_cut_ipm: 100.0,
        }
    }
}

/// Output preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Edge length of the square the reported toolpath is scaled into
    pub display_box: f64,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            display_box: DEFAULT_DISPLAY_BOX,
        }
    }
}

/// Complete time study configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StudyConfig {
    /// Machine settings
    pub machine: MachineSettings,
    /// Controller command tokens
    pub codes: ControllerCodes,
    /// Output preferences
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl StudyConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config location: `<config dir>/lasertime/config.toml`
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(CONFIG_FILE);
        path
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = ConfigFormat::from_path(path)?;

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let numeric = [
            ("machine.rapid_accel_g", self.machine.rapid_accel_g),
            ("machine.cut_accel_g", self.machine.cut_accel_g),
            ("machine.pierce_time_s", self.machine.pierce_time_s),
            ("machine.lifter_time_s", self.machine.lifter_time_s),
            ("machine.default_rapid_ipm", self.machine.default_rapid_ipm),
            ("machine.default_cut_ipm", self.machine.default_cut_ipm),
            ("output.display_box", self.output.display_box),
        ];
        for (key, value) in numeric {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    value: value.to_string(),
                }
                .into());
            }
        }

        let tokens = [
            ("codes.beam_on", &self.codes.beam_on),
            ("codes.beam_off", &self.codes.beam_off),
            ("codes.inch_mode", &self.codes.inch_mode),
            ("codes.metric_mode", &self.codes.metric_mode),
            ("codes.absolute_mode", &self.codes.absolute_mode),
            ("codes.relative_mode", &self.codes.relative_mode),
        ];
        for (key, token) in tokens {
            if token.trim().is_empty() {
                return Err(SettingsError::InvalidSetting {
                    key: key.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Convert to the estimator's parameter set (feeds become mm/min)
    pub fn to_parameters(&self) -> ParameterSet {
        ParameterSet {
            rapid_accel_g: self.machine.rapid_accel_g,
            cut_accel_g: self.machine.cut_accel_g,
            pierce_dwell_s: self.machine.pierce_time_s,
            lifter_dwell_s: self.machine.lifter_time_s,
            default_rapid_feed: ipm_to_mm_per_min(self.machine.default_rapid_ipm),
            default_cut_feed: ipm_to_mm_per_min(self.machine.default_cut_ipm),
            codes: self.codes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = StudyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output.display_box, 400.0);
    }

    #[test]
    fn test_to_parameters_matches_core_defaults() {
        assert_eq!(StudyConfig::default().to_parameters(), ParameterSet::default());
    }

    #[test]
    fn test_partial_toml() {
        let config: StudyConfig = toml::from_str(
            r#"
            [machine]
            cut_accel_g = 0.3

            [codes]
            beam_on = "M03"
            "#,
        )
        .unwrap();
        assert_eq!(config.machine.cut_accel_g, 0.3);
        assert_eq!(config.machine.rapid_accel_g, 1.0);
        assert_eq!(config.codes.beam_on, "M03");
        assert_eq!(config.codes.beam_off, "M08");
        assert_eq!(config.output.display_box, 400.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = StudyConfig::default();
        config.machine.pierce_time_s = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::Config(ConfigError::ValueOutOfRange { .. }))
        ));

        let mut config = StudyConfig::default();
        config.output.display_box = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = StudyConfig::default();
        config.codes.metric_mode.clear();
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = StudyConfig::default()
            .save_to_file(Path::new("settings.yaml"))
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_default_config_path() {
        let path = StudyConfig::default_config_path();
        assert!(path.ends_with("lasertime/config.toml"));
    }
}
