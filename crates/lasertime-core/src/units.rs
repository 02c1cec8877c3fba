//! Unit and positioning modes
//!
//! Handles the program unit mode (Metric mm / Imperial inch), the positioning
//! mode (absolute / relative), and conversion into the canonical millimeter
//! length unit used throughout the estimator.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::MM_PER_INCH;

/// Program unit mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Program lengths are millimeters
    #[default]
    Metric,
    /// Program lengths are inches
    Inch,
}

impl Units {
    /// Factor converting a program length in these units to millimeters
    pub fn scale(self) -> f64 {
        match self {
            Self::Metric => 1.0,
            Self::Inch => MM_PER_INCH,
        }
    }

    /// Convert a program length in these units to millimeters
    pub fn to_mm(self, value: f64) -> f64 {
        value * self.scale()
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "metric"),
            Self::Inch => write!(f, "inch"),
        }
    }
}

/// Positioning (distance) mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Positioning {
    /// Coordinates are absolute targets
    #[default]
    Absolute,
    /// Coordinates are offsets from the current position
    Relative,
}

impl Positioning {
    /// Resolve one axis target from the current value and a program operand (already in mm)
    pub fn resolve(self, current: f64, operand: f64) -> f64 {
        match self {
            Self::Absolute => operand,
            Self::Relative => current + operand,
        }
    }
}

impl fmt::Display for Positioning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => write!(f, "absolute"),
            Self::Relative => write!(f, "relative"),
        }
    }
}

/// Convert a feed rate in inches per minute to mm/min
pub fn ipm_to_mm_per_min(ipm: f64) -> f64 {
    ipm * MM_PER_INCH
}

/// Format a duration in seconds as `h:mm:ss.s`
pub fn format_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let hours = (seconds / 3600.0).floor();
    let minutes = ((seconds - hours * 3600.0) / 60.0).floor();
    let secs = seconds - hours * 3600.0 - minutes * 60.0;
    format!("{}:{:02}:{:04.1}", hours as u64, minutes as u64, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_scale() {
        assert_eq!(Units::Metric.scale(), 1.0);
        assert_eq!(Units::Inch.scale(), 25.4);
        assert_eq!(Units::Inch.to_mm(2.0), 50.8);
    }

    #[test]
    fn test_units_display() {
        assert_eq!(Units::Metric.to_string(), "metric");
        assert_eq!(Units::Inch.to_string(), "inch");
        assert_eq!(Positioning::Relative.to_string(), "relative");
    }

    #[test]
    fn test_positioning_resolve() {
        assert_eq!(Positioning::Absolute.resolve(5.0, 2.0), 2.0);
        assert_eq!(Positioning::Relative.resolve(5.0, -2.0), 3.0);
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(serde_json::to_string(&Units::Inch).unwrap(), "\"inch\"");
        assert_eq!(
            serde_json::to_string(&Positioning::Relative).unwrap(),
            "\"relative\""
        );
    }

    #[test]
    fn test_ipm_conversion() {
        assert_eq!(ipm_to_mm_per_min(100.0), 2540.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00:00.0");
        assert_eq!(format_duration(61.3), "0:01:01.3");
        assert_eq!(format_duration(3723.0), "1:02:03.0");
    }
}
