//! LaserTime Settings Crate
//!
//! Handles time study configuration: file persistence, validation, and
//! conversion into the estimator's parameter set.

pub mod config;
pub mod error;

pub use config::{MachineSettings, OutputSettings, StudyConfig};
pub use error::{ConfigError, SettingsError, SettingsResult};
