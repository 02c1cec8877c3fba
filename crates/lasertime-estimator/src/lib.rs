//! # LaserTime Estimator
//!
//! Machining time study for laser/plasma NC programs.
//!
//! Given program text and a [`ParameterSet`], the estimator interprets a fixed
//! subset of motion, mode, beam and dwell commands and reports per-category
//! elapsed time (cutting, rapid travel, piercing, dwell, lifter), pierce and
//! beam-cycle counts, the final modal state, and a toolpath scaled for display.
//!
//! Data flows one way: raw bytes → comment-stripped lines → tokens →
//! interpreter state transitions → totals and segments → [`StudyResult`].
//!
//! ```
//! use lasertime_estimator::{analyze, ParameterSet};
//!
//! let program = b"G21\nG90\nM07\nG1 X10 Y0 F600\nM08\n";
//! let result = analyze(program, &ParameterSet::default(), "square.nc").unwrap();
//! assert_eq!(result.pierce_count, 1);
//! assert_eq!(result.beam_cycles, 2);
//! ```

pub mod arc;
pub mod gcode;
pub mod interpreter;
pub mod motion;
pub mod report;
pub mod toolpath;

use std::borrow::Cow;

use lasertime_core::constants::DEFAULT_DISPLAY_BOX;
use lasertime_core::Result;
use tracing::debug;

pub use lasertime_core::{ControllerCodes, ParameterSet};

pub use arc::{ArcGeometry, ArcPoints};
pub use gcode::{
    normalize_line, normalize_mcode, tokenize, ArcDirection, Command, CommandTable, Token,
    TokenizedLine,
};
pub use interpreter::{Accumulators, Interpreter, MachineState, RunOutcome};
pub use motion::{move_time, MotionLimits};
pub use report::{round_report, FinalModes, StudyResult};
pub use toolpath::{normalize_toolpath, Bounds, Segment, SegmentKind};

/// Decode program bytes as text, replacing invalid UTF-8 instead of failing
pub fn decode_program(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Configured time study: parameters plus presentation options
#[derive(Debug, Clone)]
pub struct TimeStudy {
    params: ParameterSet,
    display_box: f64,
}

impl TimeStudy {
    pub fn new(params: ParameterSet) -> Self {
        Self {
            params,
            display_box: DEFAULT_DISPLAY_BOX,
        }
    }

    /// Size of the square the reported toolpath is scaled into
    pub fn with_display_box(mut self, display_box: f64) -> Self {
        self.display_box = display_box;
        self
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn display_box(&self) -> f64 {
        self.display_box
    }

    /// Interpret program text without assembling a report.
    ///
    /// Fails up front if any parameter is non-positive or any code token is blank.
    pub fn interpret(&self, program: &str) -> Result<RunOutcome> {
        self.params.validate()?;
        Ok(Interpreter::new(&self.params).run(program)?)
    }

    /// Analyze raw program bytes
    pub fn run(&self, program: &[u8], filename: &str) -> Result<StudyResult> {
        let text = decode_program(program);
        let outcome = self.interpret(&text)?;
        debug!(
            "{}: total {:.3} s over {} segments",
            filename,
            outcome.totals.total(),
            outcome.toolpath.len()
        );
        Ok(StudyResult::assemble(&outcome, filename, self.display_box))
    }
}

/// Analyze raw program bytes with the default display box
pub fn analyze(program: &[u8], params: &ParameterSet, filename: &str) -> Result<StudyResult> {
    TimeStudy::new(params.clone()).run(program, filename)
}
