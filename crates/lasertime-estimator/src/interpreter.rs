//! Modal interpreter
//!
//! Walks a program line by line, tracking the modal machine state (position,
//! units, positioning mode, sticky feed, beam) and accumulating time buckets and
//! toolpath segments. One [`Interpreter`] owns all mutable state for one run, so
//! independent runs never share anything.

use glam::DVec2;
use lasertime_core::{GcodeError, ParameterSet, Positioning, Units};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::arc::ArcGeometry;
use crate::gcode::{normalize_line, tokenize, ArcDirection, Command, CommandTable, TokenizedLine};
use crate::motion::MotionLimits;
use crate::toolpath::{Segment, SegmentKind};

/// P operands above this are milliseconds, at or below it seconds
const DWELL_MILLIS_THRESHOLD: f64 = 50.0;

/// Modal machine state for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MachineState {
    /// Current position in mm
    pub position: DVec2,
    pub units: Units,
    pub positioning: Positioning,
    /// Active (sticky) feed in mm/min; 0 until programmed
    pub feed_rate: f64,
    pub beam_on: bool,
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            units: Units::Metric,
            positioning: Positioning::Absolute,
            feed_rate: 0.0,
            beam_on: false,
        }
    }
}

impl MachineState {
    /// Convert a program length to mm under the active unit mode
    fn to_mm(&self, value: f64) -> f64 {
        self.units.to_mm(value)
    }
}

/// Running totals for one run. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Accumulators {
    pub cut_time_s: f64,
    pub travel_time_s: f64,
    pub pierce_time_s: f64,
    pub dwell_time_s: f64,
    pub lifter_time_s: f64,
    pub pierce_count: u32,
    /// Accepted beam on/off transitions
    pub beam_cycles: u32,
}

impl Accumulators {
    /// Sum of all five time buckets
    pub fn total(&self) -> f64 {
        self.cut_time_s
            + self.travel_time_s
            + self.pierce_time_s
            + self.dwell_time_s
            + self.lifter_time_s
    }
}

/// Everything a finished run produced, in canonical units
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub state: MachineState,
    pub totals: Accumulators,
    /// Raw toolpath before display normalization
    pub toolpath: Vec<Segment>,
}

/// Stateful interpreter for one program run
#[derive(Debug)]
pub struct Interpreter<'p> {
    params: &'p ParameterSet,
    table: CommandTable,
    state: MachineState,
    totals: Accumulators,
    toolpath: Vec<Segment>,
}

impl<'p> Interpreter<'p> {
    pub fn new(params: &'p ParameterSet) -> Self {
        Self {
            params,
            table: CommandTable::new(&params.codes),
            state: MachineState::default(),
            totals: Accumulators::default(),
            toolpath: Vec::new(),
        }
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn totals(&self) -> &Accumulators {
        &self.totals
    }

    pub fn toolpath(&self) -> &[Segment] {
        &self.toolpath
    }

    /// Interpret a whole program and return what it produced.
    ///
    /// Line numbers in errors count `\n`-terminated lines from 1; a bare `\r`
    /// also ends a line but does not advance the count.
    pub fn run(mut self, program: &str) -> Result<RunOutcome, GcodeError> {
        debug!("Starting time study, input size: {} bytes", program.len());

        for (idx, line) in program.lines().enumerate() {
            for part in line.split('\r') {
                self.execute_line(idx + 1, part)?;
            }
        }

        debug!(
            "Time study complete: pierces={}, beam cycles={}, segments={}",
            self.totals.pierce_count,
            self.totals.beam_cycles,
            self.toolpath.len()
        );
        Ok(self.finish())
    }

    /// Consume the interpreter, keeping its final state
    pub fn finish(self) -> RunOutcome {
        RunOutcome {
            state: self.state,
            totals: self.totals,
            toolpath: self.toolpath,
        }
    }

    /// Interpret one raw program line
    pub fn execute_line(&mut self, line_number: usize, raw: &str) -> Result<(), GcodeError> {
        let Some(cleaned) = normalize_line(raw) else {
            return Ok(());
        };
        let Some(line) = tokenize(&cleaned) else {
            return Ok(());
        };

        let command = self.table.classify(line.command.as_str());
        trace!("Line {}: {} -> {}", line_number, line.command.as_str(), command);

        if command.updates_feed() {
            if let Some(feed) = line.last_value('F', line_number)? {
                self.state.feed_rate = self.state.to_mm(feed);
            }
        }

        match command {
            Command::SetUnits(units) => self.state.units = units,
            Command::SetPositioning(mode) => self.state.positioning = mode,
            Command::BeamOn => self.beam_on(line_number),
            Command::BeamOff => self.beam_off(line_number),
            Command::Dwell => self.dwell(&line, line_number)?,
            Command::Rapid => self.rapid(&line, line_number)?,
            Command::Linear => self.linear(&line, line_number)?,
            Command::Arc(direction) => self.arc(&line, line_number, direction)?,
            Command::Unhandled => {}
        }

        Ok(())
    }

    fn beam_on(&mut self, line_number: usize) {
        if self.state.beam_on {
            return;
        }
        trace!("Line {}: beam on, pierce #{}", line_number, self.totals.pierce_count + 1);
        self.state.beam_on = true;
        self.totals.pierce_time_s += self.params.pierce_dwell_s;
        self.totals.lifter_time_s += self.params.lifter_dwell_s;
        self.totals.pierce_count += 1;
        self.totals.beam_cycles += 1;
    }

    fn beam_off(&mut self, line_number: usize) {
        if !self.state.beam_on {
            return;
        }
        trace!("Line {}: beam off", line_number);
        self.state.beam_on = false;
        self.totals.lifter_time_s += self.params.lifter_dwell_s;
        self.totals.beam_cycles += 1;
    }

    fn dwell(&mut self, line: &TokenizedLine, line_number: usize) -> Result<(), GcodeError> {
        let mut seconds = 0.0;
        for token in &line.params {
            match token.letter() {
                'S' => seconds = token.value(line_number)?,
                'P' => {
                    let value = token.value(line_number)?;
                    seconds = if value > DWELL_MILLIS_THRESHOLD {
                        value / 1000.0
                    } else {
                        value
                    };
                }
                _ => {}
            }
        }
        self.totals.dwell_time_s += seconds;
        Ok(())
    }

    fn rapid(&mut self, line: &TokenizedLine, line_number: usize) -> Result<(), GcodeError> {
        let target = self.resolve_target(line, line_number)?;
        let distance = self.state.position.distance(target);
        self.totals.travel_time_s += self.rapid_limits().time_for(distance);
        self.emit(SegmentKind::Travel, self.state.position, target);
        self.state.position = target;
        Ok(())
    }

    fn linear(&mut self, line: &TokenizedLine, line_number: usize) -> Result<(), GcodeError> {
        let target = self.resolve_target(line, line_number)?;
        let distance = self.state.position.distance(target);
        let (kind, limits) = self.active_motion();
        self.add_motion_time(kind, limits.time_for(distance));
        self.emit(kind, self.state.position, target);
        self.state.position = target;
        Ok(())
    }

    fn arc(
        &mut self,
        line: &TokenizedLine,
        line_number: usize,
        direction: ArcDirection,
    ) -> Result<(), GcodeError> {
        let target = self.resolve_target(line, line_number)?;
        let offset = DVec2::new(
            self.state.to_mm(line.last_value('I', line_number)?.unwrap_or(0.0)),
            self.state.to_mm(line.last_value('J', line_number)?.unwrap_or(0.0)),
        );

        let Some(geometry) = ArcGeometry::resolve(self.state.position, target, offset, direction)
        else {
            warn!(
                "Line {}: zero-radius arc, moving to target without time",
                line_number
            );
            self.state.position = target;
            return Ok(());
        };

        let (kind, limits) = self.active_motion();
        self.add_motion_time(kind, limits.time_for(geometry.length()));

        let mut previous = self.state.position;
        let points = geometry.points_to(target);
        self.toolpath.reserve(points.len());
        for point in points {
            self.emit(kind, previous, point);
            previous = point;
        }

        self.state.position = target;
        Ok(())
    }

    /// Resolve the X/Y target of a move; a missing axis holds its current value
    fn resolve_target(&self, line: &TokenizedLine, line_number: usize) -> Result<DVec2, GcodeError> {
        let current = self.state.position;
        let mode = self.state.positioning;
        let mut target = current;
        for token in &line.params {
            match token.letter() {
                'X' => target.x = mode.resolve(current.x, self.state.to_mm(token.value(line_number)?)),
                'Y' => target.y = mode.resolve(current.y, self.state.to_mm(token.value(line_number)?)),
                _ => {}
            }
        }
        Ok(target)
    }

    fn rapid_limits(&self) -> MotionLimits {
        MotionLimits::new(self.params.default_rapid_feed, self.params.rapid_accel_g)
    }

    /// Segment kind and limits for a feed move under the current beam state
    fn active_motion(&self) -> (SegmentKind, MotionLimits) {
        if self.state.beam_on {
            let feed = if self.state.feed_rate > 0.0 {
                self.state.feed_rate
            } else {
                self.params.default_cut_feed
            };
            (SegmentKind::Cut, MotionLimits::new(feed, self.params.cut_accel_g))
        } else {
            (SegmentKind::Travel, self.rapid_limits())
        }
    }

    fn add_motion_time(&mut self, kind: SegmentKind, seconds: f64) {
        match kind {
            SegmentKind::Cut => self.totals.cut_time_s += seconds,
            SegmentKind::Travel => self.totals.travel_time_s += seconds,
        }
    }

    fn emit(&mut self, kind: SegmentKind, start: DVec2, end: DVec2) {
        self.toolpath.push(Segment::new(kind, start, end));
    }
}
