//! Command classification
//!
//! Maps a line's command token to exactly one [`Command`] category. Checks run
//! in a fixed precedence order (units, positioning, beam, dwell, motion) and the
//! first match wins, so a configured token that collides with a built-in one
//! resolves the same way every time.

use lasertime_core::{ControllerCodes, Positioning, Units};
use std::fmt;

/// Fallback inch-mode token, accepted alongside the configured one
pub const FALLBACK_INCH_CODE: &str = "G20";
/// Fallback metric-mode token, accepted alongside the configured one
pub const FALLBACK_METRIC_CODE: &str = "G21";

const DWELL_CODES: [&str; 2] = ["G4", "G04"];
const RAPID_CODES: [&str; 2] = ["G0", "G00"];
const LINEAR_CODES: [&str; 2] = ["G1", "G01"];
const CW_ARC_CODES: [&str; 2] = ["G2", "G02"];
const CCW_ARC_CODES: [&str; 2] = ["G3", "G03"];

/// Arc sweep direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcDirection {
    Clockwise,
    CounterClockwise,
}

/// Category of a program line, by its command token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Unit mode change
    SetUnits(Units),
    /// Positioning mode change
    SetPositioning(Positioning),
    /// Beam on (pierce)
    BeamOn,
    /// Beam off
    BeamOff,
    /// Timed dwell
    Dwell,
    /// Rapid positioning move
    Rapid,
    /// Linear move
    Linear,
    /// Circular move
    Arc(ArcDirection),
    /// Anything else; consumed without effect
    Unhandled,
}

impl Command {
    /// Whether an `F` word on this line updates the active feed.
    ///
    /// Mode and beam lines consume the whole line before feed resolution.
    pub fn updates_feed(self) -> bool {
        !matches!(
            self,
            Self::SetUnits(_) | Self::SetPositioning(_) | Self::BeamOn | Self::BeamOff
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetUnits(units) => write!(f, "units {}", units),
            Self::SetPositioning(mode) => write!(f, "positioning {}", mode),
            Self::BeamOn => write!(f, "beam on"),
            Self::BeamOff => write!(f, "beam off"),
            Self::Dwell => write!(f, "dwell"),
            Self::Rapid => write!(f, "rapid"),
            Self::Linear => write!(f, "linear"),
            Self::Arc(ArcDirection::Clockwise) => write!(f, "arc cw"),
            Self::Arc(ArcDirection::CounterClockwise) => write!(f, "arc ccw"),
            Self::Unhandled => write!(f, "unhandled"),
        }
    }
}

fn is_one_of(command: &str, codes: &[&str]) -> bool {
    codes.iter().any(|code| *code == command)
}

/// Normalize an M-code so `M007`, `M07` and `M7` compare equal.
///
/// Other tokens are only trimmed and uppercased. An all-zero suffix becomes `M0`.
pub fn normalize_mcode(code: &str) -> String {
    let code = code.trim().to_uppercase();
    match code.strip_prefix('M') {
        Some(number) => {
            let number = number.trim_start_matches('0');
            if number.is_empty() {
                "M0".to_string()
            } else {
                format!("M{}", number)
            }
        }
        None => code,
    }
}

/// Configured command identities for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTable {
    inch_mode: String,
    metric_mode: String,
    absolute_mode: String,
    relative_mode: String,
    beam_on: String,
    beam_off: String,
}

impl CommandTable {
    /// Build the lookup table from the controller's configured tokens
    pub fn new(codes: &ControllerCodes) -> Self {
        Self {
            inch_mode: codes.inch_mode.trim().to_uppercase(),
            metric_mode: codes.metric_mode.trim().to_uppercase(),
            absolute_mode: codes.absolute_mode.trim().to_uppercase(),
            relative_mode: codes.relative_mode.trim().to_uppercase(),
            beam_on: normalize_mcode(&codes.beam_on),
            beam_off: normalize_mcode(&codes.beam_off),
        }
    }

    /// Classify an uppercased command token
    pub fn classify(&self, command: &str) -> Command {
        if command == self.inch_mode || command == FALLBACK_INCH_CODE {
            return Command::SetUnits(Units::Inch);
        }
        if command == self.metric_mode || command == FALLBACK_METRIC_CODE {
            return Command::SetUnits(Units::Metric);
        }
        if command == self.absolute_mode {
            return Command::SetPositioning(Positioning::Absolute);
        }
        if command == self.relative_mode {
            return Command::SetPositioning(Positioning::Relative);
        }

        let normalized = normalize_mcode(command);
        if normalized == self.beam_on {
            return Command::BeamOn;
        }
        if normalized == self.beam_off {
            return Command::BeamOff;
        }

        if is_one_of(command, &DWELL_CODES) {
            Command::Dwell
        } else if is_one_of(command, &RAPID_CODES) {
            Command::Rapid
        } else if is_one_of(command, &LINEAR_CODES) {
            Command::Linear
        } else if is_one_of(command, &CW_ARC_CODES) {
            Command::Arc(ArcDirection::Clockwise)
        } else if is_one_of(command, &CCW_ARC_CODES) {
            Command::Arc(ArcDirection::CounterClockwise)
        } else {
            Command::Unhandled
        }
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new(&ControllerCodes::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mcode() {
        assert_eq!(normalize_mcode("M007"), "M7");
        assert_eq!(normalize_mcode("m07"), "M7");
        assert_eq!(normalize_mcode("M7"), "M7");
        assert_eq!(normalize_mcode("M000"), "M0");
        assert_eq!(normalize_mcode("M"), "M0");
        assert_eq!(normalize_mcode(" g04 "), "G04");
    }

    #[test]
    fn test_default_classification() {
        let table = CommandTable::default();
        assert_eq!(table.classify("G70"), Command::SetUnits(Units::Inch));
        assert_eq!(table.classify("G20"), Command::SetUnits(Units::Inch));
        assert_eq!(table.classify("G71"), Command::SetUnits(Units::Metric));
        assert_eq!(table.classify("G21"), Command::SetUnits(Units::Metric));
        assert_eq!(
            table.classify("G90"),
            Command::SetPositioning(Positioning::Absolute)
        );
        assert_eq!(
            table.classify("G91"),
            Command::SetPositioning(Positioning::Relative)
        );
        assert_eq!(table.classify("M7"), Command::BeamOn);
        assert_eq!(table.classify("M008"), Command::BeamOff);
        assert_eq!(table.classify("G04"), Command::Dwell);
        assert_eq!(table.classify("G00"), Command::Rapid);
        assert_eq!(table.classify("G1"), Command::Linear);
        assert_eq!(table.classify("G02"), Command::Arc(ArcDirection::Clockwise));
        assert_eq!(
            table.classify("G3"),
            Command::Arc(ArcDirection::CounterClockwise)
        );
        assert_eq!(table.classify("T1"), Command::Unhandled);
        assert_eq!(table.classify("G001"), Command::Unhandled);
    }

    #[test]
    fn test_precedence_on_collision() {
        // A beam token configured to a motion code shadows the motion meaning
        let codes = ControllerCodes {
            beam_on: "G1".to_string(),
            ..ControllerCodes::default()
        };
        let table = CommandTable::new(&codes);
        assert_eq!(table.classify("G1"), Command::BeamOn);

        // Units are checked before positioning
        let codes = ControllerCodes {
            absolute_mode: "G20".to_string(),
            ..ControllerCodes::default()
        };
        let table = CommandTable::new(&codes);
        assert_eq!(table.classify("G20"), Command::SetUnits(Units::Inch));
    }

    #[test]
    fn test_configured_tokens_are_normalized() {
        let codes = ControllerCodes {
            beam_on: " m3 ".to_string(),
            beam_off: "M05".to_string(),
            ..ControllerCodes::default()
        };
        let table = CommandTable::new(&codes);
        assert_eq!(table.classify("M03"), Command::BeamOn);
        assert_eq!(table.classify("M5"), Command::BeamOff);
        assert_eq!(table.classify("M07"), Command::Unhandled);
    }

    #[test]
    fn test_feed_applies_after_beam_checks() {
        assert!(!Command::BeamOn.updates_feed());
        assert!(!Command::SetUnits(Units::Inch).updates_feed());
        assert!(Command::Dwell.updates_feed());
        assert!(Command::Linear.updates_feed());
        assert!(Command::Unhandled.updates_feed());
    }
}
