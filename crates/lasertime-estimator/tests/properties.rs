//! Property tests for the time model and toolpath normalization

use glam::DVec2;
use lasertime_estimator::{
    move_time, normalize_toolpath, ArcDirection, ArcGeometry, Bounds, Segment, SegmentKind,
};
use proptest::prelude::*;

fn segment_strategy() -> impl Strategy<Value = Segment> {
    (
        any::<bool>(),
        -1000.0..1000.0f64,
        -1000.0..1000.0f64,
        -1000.0..1000.0f64,
        -1000.0..1000.0f64,
    )
        .prop_map(|(cut, x0, y0, x1, y1)| {
            let kind = if cut {
                SegmentKind::Cut
            } else {
                SegmentKind::Travel
            };
            Segment::new(kind, DVec2::new(x0, y0), DVec2::new(x1, y1))
        })
}

proptest! {
    #[test]
    fn non_positive_inputs_take_no_time(
        distance in -100.0..=0.0f64,
        feed in -100.0..=0.0f64,
        accel in -2.0..=0.0f64,
        positive in 0.1..1000.0f64,
    ) {
        prop_assert_eq!(move_time(distance, positive, positive), 0.0);
        prop_assert_eq!(move_time(positive, feed, positive), 0.0);
        prop_assert_eq!(move_time(positive, positive, accel), 0.0);
    }

    #[test]
    fn move_time_is_at_least_cruise_time(
        distance in 0.001..5000.0f64,
        feed in 1.0..30000.0f64,
        accel in 0.05..5.0f64,
    ) {
        let t = move_time(distance, feed, accel);
        prop_assert!(t > 0.0);
        prop_assert!(t + 1e-12 >= distance / (feed / 60.0));
    }

    #[test]
    fn normalization_fills_box_and_keeps_aspect(
        segments in prop::collection::vec(segment_strategy(), 1..20),
        box_size in 10.0..1000.0f64,
    ) {
        let before = Bounds::of_segments(&segments);
        let span = before.max - before.min;
        prop_assume!(span.x > 1.0 && span.y > 1.0);

        let out = normalize_toolpath(&segments, box_size);
        prop_assert_eq!(out.len(), segments.len());

        let after = Bounds::of_segments(&out);
        let out_span = after.max - after.min;
        prop_assert!(after.min.x.abs() < 1e-9 && after.min.y.abs() < 1e-9);
        prop_assert!((out_span.x.max(out_span.y) - box_size).abs() < 1e-6);
        prop_assert!((out_span.x / out_span.y - span.x / span.y).abs() < 1e-6 * (span.x / span.y).max(1.0));

        for (a, b) in segments.iter().zip(&out) {
            prop_assert_eq!(a.kind, b.kind);
        }
    }

    #[test]
    fn arc_sweep_follows_direction(
        cx in -50.0..50.0f64,
        cy in -50.0..50.0f64,
        radius in 0.5..50.0f64,
        a0 in 0.0..std::f64::consts::TAU,
        a1 in 0.0..std::f64::consts::TAU,
        clockwise in any::<bool>(),
    ) {
        let center = DVec2::new(cx, cy);
        let current = center + radius * DVec2::new(a0.cos(), a0.sin());
        let target = center + radius * DVec2::new(a1.cos(), a1.sin());
        let direction = if clockwise {
            ArcDirection::Clockwise
        } else {
            ArcDirection::CounterClockwise
        };

        let arc = ArcGeometry::resolve(current, target, center - current, direction).unwrap();
        if clockwise {
            prop_assert!(arc.sweep <= 0.0);
        } else {
            prop_assert!(arc.sweep >= 0.0);
        }
        prop_assert!(arc.sweep.abs() <= std::f64::consts::TAU + 1e-9);
        prop_assert!(arc.points().len() >= 40);
    }
}
