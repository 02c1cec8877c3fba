//! Arc resolution and discretization
//!
//! Resolves a circular move from the current point, the commanded target and the
//! `I`/`J` center offsets into a center, radius and signed sweep. The sweep sign
//! always follows the commanded direction, and a move that ends where it starts
//! is a full revolution.
//!
//! The exact arc length feeds the time model; the polyline from [`ArcGeometry::points`]
//! is for display only. Its final point is pinned to the commanded end, which may sit
//! slightly (or, for a sloppy program, well) off the circle.

use glam::DVec2;
use std::f64::consts::TAU;

use crate::gcode::ArcDirection;

/// Tolerance for "target equals current point" on each axis
const FULL_CIRCLE_TOLERANCE: f64 = 1e-9;
/// Offsets at or below this magnitude count as zero
const OFFSET_EPSILON: f64 = 1e-12;
/// Display steps per radian of sweep
const STEPS_PER_RADIAN: f64 = 80.0;
/// Minimum display steps for any arc
const MIN_ARC_STEPS: usize = 40;

/// Resolved circular move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub center: DVec2,
    pub radius: f64,
    /// Angle of the start point around the center, in radians
    pub start_angle: f64,
    /// Signed sweep; negative is clockwise
    pub sweep: f64,
}

impl ArcGeometry {
    /// Resolve an arc. Returns `None` for a zero-radius arc.
    pub fn resolve(
        current: DVec2,
        target: DVec2,
        offset: DVec2,
        direction: ArcDirection,
    ) -> Option<Self> {
        let center = current + offset;
        let radius = current.distance(center);
        if radius <= 0.0 {
            return None;
        }

        let start_angle = angle_of(current - center);
        let end_angle = angle_of(target - center);

        let returns_to_start = (target.x - current.x).abs() < FULL_CIRCLE_TOLERANCE
            && (target.y - current.y).abs() < FULL_CIRCLE_TOLERANCE;
        let has_offset = offset.x.abs() > OFFSET_EPSILON || offset.y.abs() > OFFSET_EPSILON;

        let sweep = if returns_to_start && has_offset {
            match direction {
                ArcDirection::Clockwise => -TAU,
                ArcDirection::CounterClockwise => TAU,
            }
        } else {
            let raw = end_angle - start_angle;
            match direction {
                ArcDirection::Clockwise if raw > 0.0 => raw - TAU,
                ArcDirection::CounterClockwise if raw < 0.0 => raw + TAU,
                _ => raw,
            }
        };

        Some(Self {
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    /// Exact arc length
    pub fn length(&self) -> f64 {
        self.sweep.abs() * self.radius
    }

    /// Number of display segments: larger sweeps get more, never fewer than 40
    pub fn step_count(&self) -> usize {
        let steps = (self.sweep.abs() * STEPS_PER_RADIAN).round() as usize;
        steps.max(MIN_ARC_STEPS)
    }

    /// Evenly spaced points along the arc, excluding the start point and
    /// ending on the circle at `start_angle + sweep`
    pub fn points(&self) -> ArcPoints {
        self.points_to(self.point_at(self.start_angle + self.sweep))
    }

    /// Like [`points`](Self::points), but the last point is exactly `end`
    pub fn points_to(&self, end: DVec2) -> ArcPoints {
        ArcPoints {
            geometry: *self,
            end,
            steps: self.step_count(),
            next: 1,
        }
    }

    /// Point at `angle` on the circle
    pub fn point_at(&self, angle: f64) -> DVec2 {
        self.center + self.radius * DVec2::new(angle.cos(), angle.sin())
    }
}

fn angle_of(v: DVec2) -> f64 {
    v.y.atan2(v.x)
}

/// Lazy iterator over an arc's display points
#[derive(Debug, Clone)]
pub struct ArcPoints {
    geometry: ArcGeometry,
    end: DVec2,
    steps: usize,
    next: usize,
}

impl Iterator for ArcPoints {
    type Item = DVec2;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.steps {
            return None;
        }
        if self.next == self.steps {
            self.next += 1;
            return Some(self.end);
        }
        let fraction = self.next as f64 / self.steps as f64;
        self.next += 1;
        let angle = self.geometry.start_angle + self.geometry.sweep * fraction;
        Some(self.geometry.point_at(angle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ArcPoints {}
