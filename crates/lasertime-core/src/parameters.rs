//! Machine and process parameters for one time study
//!
//! A [`ParameterSet`] is supplied by the caller and never mutated by the
//! estimator. Feed rates are held in the canonical unit (mm/min); callers that
//! collect feeds in inches per minute convert with
//! [`crate::units::ipm_to_mm_per_min`].

use serde::{Deserialize, Serialize};

use crate::error::GcodeError;
use crate::units::ipm_to_mm_per_min;

/// Controller command tokens that carry special meaning on the target machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerCodes {
    /// Beam on (pierce + cut start)
    pub beam_on: String,
    /// Beam off
    pub beam_off: String,
    /// Program units are inches
    pub inch_mode: String,
    /// Program units are millimeters
    pub metric_mode: String,
    /// Absolute positioning
    pub absolute_mode: String,
    /// Relative positioning
    pub relative_mode: String,
}

impl Default for ControllerCodes {
    fn default() -> Self {
        Self {
            beam_on: "M07".to_string(),
            beam_off: "M08".to_string(),
            inch_mode: "G70".to_string(),
            metric_mode: "G71".to_string(),
            absolute_mode: "G90".to_string(),
            relative_mode: "G91".to_string(),
        }
    }
}

/// Parameters for a single time study run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    /// Acceleration for rapid moves, in g
    pub rapid_accel_g: f64,
    /// Acceleration for cutting moves, in g
    pub cut_accel_g: f64,
    /// Dwell added for every pierce, in seconds
    pub pierce_dwell_s: f64,
    /// Dwell added for every beam on/off transition, in seconds
    pub lifter_dwell_s: f64,
    /// Rapid feed used for all beam-off motion, in mm/min
    pub default_rapid_feed: f64,
    /// Cutting feed used when no feed has been programmed, in mm/min
    pub default_cut_feed: f64,
    /// Controller command tokens
    pub codes: ControllerCodes,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            rapid_accel_g: 1.0,
            cut_accel_g: 0.5,
            pierce_dwell_s: 1.0,
            lifter_dwell_s: 0.5,
            default_rapid_feed: ipm_to_mm_per_min(500.0),
            default_cut_feed: ipm_to_mm_per_min(100.0),
            codes: ControllerCodes::default(),
        }
    }
}

impl ParameterSet {
    /// Create a parameter set with the documented defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every numeric field is a positive, finite real and every token is non-empty
    pub fn validate(&self) -> Result<(), GcodeError> {
        let numeric = [
            ("rapid_accel_g", self.rapid_accel_g),
            ("cut_accel_g", self.cut_accel_g),
            ("pierce_dwell_s", self.pierce_dwell_s),
            ("lifter_dwell_s", self.lifter_dwell_s),
            ("default_rapid_feed", self.default_rapid_feed),
            ("default_cut_feed", self.default_cut_feed),
        ];
        for (param, value) in numeric {
            if !value.is_finite() || value <= 0.0 {
                return Err(GcodeError::InvalidParameter {
                    param: param.to_string(),
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }

        let tokens = [
            ("beam_on", &self.codes.beam_on),
            ("beam_off", &self.codes.beam_off),
            ("inch_mode", &self.codes.inch_mode),
            ("metric_mode", &self.codes.metric_mode),
            ("absolute_mode", &self.codes.absolute_mode),
            ("relative_mode", &self.codes.relative_mode),
        ];
        for (param, token) in tokens {
            if token.trim().is_empty() {
                return Err(GcodeError::InvalidParameter {
                    param: param.to_string(),
                    reason: "token must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}
