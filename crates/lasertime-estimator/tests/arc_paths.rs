//! Circular moves through the full interpreter

use glam::DVec2;
use lasertime_estimator::{
    move_time, ArcDirection, ArcGeometry, ParameterSet, SegmentKind, TimeStudy,
};
use std::f64::consts::{PI, TAU};

fn interpret(program: &str) -> lasertime_estimator::RunOutcome {
    TimeStudy::new(ParameterSet::default())
        .interpret(program)
        .unwrap()
}

#[test]
fn test_full_circle_cut_time_uses_exact_length() {
    // Full circle of radius 5 about (5, 0)
    let outcome = interpret("M07\nG2 X0 Y0 I5 J0 F600\nM08");
    let expected = move_time(TAU * 5.0, 600.0, 0.5);
    assert!((outcome.totals.cut_time_s - expected).abs() < 1e-9);

    // 2π * 80 ≈ 502.65 display steps
    assert_eq!(outcome.toolpath.len(), 503);
    assert!(outcome
        .toolpath
        .iter()
        .all(|s| s.kind == SegmentKind::Cut));
    assert_eq!(outcome.state.position, DVec2::ZERO);
}

#[test]
fn test_clockwise_semicircle_passes_over_the_top() {
    // From (0,0) to (10,0) about (5,0): clockwise passes through (5, 5)
    let outcome = interpret("G2 X10 Y0 I5 J0");
    let mid = outcome.toolpath[outcome.toolpath.len() / 2 - 1].end;
    assert!(mid.y > 4.9);
    assert!(outcome
        .toolpath
        .iter()
        .all(|s| s.kind == SegmentKind::Travel));
}

#[test]
fn test_counter_clockwise_semicircle_passes_underneath() {
    // Same endpoints, counter-clockwise passes through (5, -5)
    let outcome = interpret("G03 X10 Y0 I5 J0");
    let mid = outcome.toolpath[outcome.toolpath.len() / 2 - 1].end;
    assert!(mid.y < -4.9);
}

#[test]
fn test_arc_segments_are_contiguous() {
    let outcome = interpret("G0 X10 Y0\nM07\nG3 X0 Y10 I-10 J0\nG1 X0 Y20");
    for pair in outcome.toolpath.windows(2) {
        assert!(pair[0].end.distance(pair[1].start) < 1e-9);
    }
    // rapid + arc steps + line
    let arc_steps = (PI / 2.0 * 80.0).round() as usize;
    assert_eq!(outcome.toolpath.len(), 1 + arc_steps + 1);
}

#[test]
fn test_off_circle_target_keeps_toolpath_joined() {
    // Center (5, 0), radius 5; the target (10, 5) is not on that circle
    let outcome = interpret("M07\nG2 X10 Y5 I5 J0\nG1 X20 Y5");
    let n = outcome.toolpath.len();
    let arc_end = outcome.toolpath[n - 2].end;
    let line = outcome.toolpath[n - 1];

    assert_eq!(arc_end, DVec2::new(10.0, 5.0));
    assert_eq!(line.start, arc_end);
    assert_eq!(line.end, DVec2::new(20.0, 5.0));
    for pair in outcome.toolpath.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
}

#[test]
fn test_arc_ends_exactly_on_commanded_target() {
    let outcome = interpret("G0 X10\nG3 X0 Y10 I-10 J0");
    let last = outcome.toolpath.last().unwrap();
    assert_eq!(last.end, DVec2::new(0.0, 10.0));
    assert_eq!(last.end, outcome.state.position);
}

#[test]
fn test_relative_arc_and_inch_offsets() {
    let outcome = interpret("G20\nG91\nG0 X1\nG3 X-1 Y1 I-1 J0");
    // Quarter circle of radius 25.4 about the origin
    assert!((outcome.state.position - DVec2::new(0.0, 25.4)).length() < 1e-9);
    let last = outcome.toolpath.last().unwrap().end;
    assert!((last - DVec2::new(0.0, 25.4)).length() < 1e-9);
}

#[test]
fn test_direction_forcing() {
    let current = DVec2::new(0.0, -3.0);
    let target = DVec2::new(3.0, 0.0);
    let offset = DVec2::new(0.0, 3.0);

    // Raw angle change is +π/2
    let cw = ArcGeometry::resolve(current, target, offset, ArcDirection::Clockwise).unwrap();
    assert!(cw.sweep < 0.0);
    let ccw =
        ArcGeometry::resolve(current, target, offset, ArcDirection::CounterClockwise).unwrap();
    assert!(ccw.sweep > 0.0);
    assert!((cw.sweep.abs() + ccw.sweep.abs() - TAU).abs() < 1e-12);
}

#[test]
fn test_beam_off_arc_uses_rapid_limits() {
    let params = ParameterSet::default();
    let outcome = interpret("G3 X0 Y0 I0 J2 F100");
    let expected = move_time(TAU * 2.0, params.default_rapid_feed, params.rapid_accel_g);
    assert!((outcome.totals.travel_time_s - expected).abs() < 1e-12);
    assert_eq!(outcome.totals.cut_time_s, 0.0);
}
