//! Result assembly
//!
//! Packages a finished run into the record handed back to callers: rounded
//! time buckets, counts, final modes and the display-normalized toolpath.

use lasertime_core::constants::REPORT_DECIMALS;
use lasertime_core::units::format_duration;
use lasertime_core::{Positioning, Units};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::interpreter::{MachineState, RunOutcome};
use crate::toolpath::{normalize_toolpath, Segment};

/// Modal state at the end of the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalModes {
    pub units: Units,
    pub positioning: Positioning,
}

impl From<&MachineState> for FinalModes {
    fn from(state: &MachineState) -> Self {
        let units = if state.units.scale() > 1.0 {
            Units::Inch
        } else {
            Units::Metric
        };
        Self {
            units,
            positioning: state.positioning,
        }
    }
}

/// Time study result for one program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyResult {
    pub filename: String,
    pub cut_time_sec: f64,
    pub travel_time_sec: f64,
    pub pierce_time_sec: f64,
    pub dwell_time_sec: f64,
    pub lifter_time_sec: f64,
    pub total_time_sec: f64,
    pub pierce_count: u32,
    pub beam_cycles: u32,
    /// Toolpath scaled into the display box
    pub toolpath: Vec<Segment>,
    pub final_modes: FinalModes,
}

impl StudyResult {
    /// Assemble a result from a finished run
    pub fn assemble(outcome: &RunOutcome, filename: impl Into<String>, display_box: f64) -> Self {
        let totals = &outcome.totals;
        Self {
            filename: filename.into(),
            cut_time_sec: round_report(totals.cut_time_s),
            travel_time_sec: round_report(totals.travel_time_s),
            pierce_time_sec: round_report(totals.pierce_time_s),
            dwell_time_sec: round_report(totals.dwell_time_s),
            lifter_time_sec: round_report(totals.lifter_time_s),
            total_time_sec: round_report(totals.total()),
            pierce_count: totals.pierce_count,
            beam_cycles: totals.beam_cycles,
            toolpath: normalize_toolpath(&outcome.toolpath, display_box),
            final_modes: FinalModes::from(&outcome.state),
        }
    }
}

impl fmt::Display for StudyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Cutting", self.cut_time_sec),
            ("Rapid travel", self.travel_time_sec),
            ("Piercing", self.pierce_time_sec),
            ("Dwell", self.dwell_time_sec),
            ("Lifter", self.lifter_time_sec),
        ];

        writeln!(f, "{}", self.filename)?;
        for (label, seconds) in rows {
            writeln!(
                f,
                "  {:<14}{:>12.3} s  {:>12}",
                label,
                seconds,
                format_duration(seconds)
            )?;
        }
        writeln!(
            f,
            "  {:<14}{:>12.3} s  {:>12}",
            "Total",
            self.total_time_sec,
            format_duration(self.total_time_sec)
        )?;
        writeln!(
            f,
            "  Pierces: {}  Beam cycles: {}  Segments: {}",
            self.pierce_count,
            self.beam_cycles,
            self.toolpath.len()
        )?;
        write!(
            f,
            "  Final modes: {} / {}",
            self.final_modes.units, self.final_modes.positioning
        )
    }
}

/// Round to the reporting precision (3 decimal places).
///
/// Rounds the exact stored value through its decimal form; scaling by 1000 first
/// would let the multiplication push values like 21.6135 across a half boundary.
pub fn round_report(value: f64) -> f64 {
    format!("{:.*}", REPORT_DECIMALS, value)
        .parse()
        .unwrap_or(value)
}
