//! Motion time model
//!
//! Estimates the time of a single move with a symmetric trapezoidal velocity
//! profile: constant acceleration up to the programmed feed, cruise, then an
//! identical deceleration. Moves too short to reach the feed fall back to a
//! triangular profile. There is no jerk limiting.

use lasertime_core::constants::{MM_PER_METER, SECONDS_PER_MINUTE, STANDARD_GRAVITY};

/// Elapsed seconds to travel `distance_mm` at up to `feed_mm_min`, accelerating at `accel_g`.
///
/// Returns 0 when any input is non-positive.
pub fn move_time(distance_mm: f64, feed_mm_min: f64, accel_g: f64) -> f64 {
    if distance_mm <= 0.0 || feed_mm_min <= 0.0 || accel_g <= 0.0 {
        return 0.0;
    }

    let v_max = feed_mm_min / SECONDS_PER_MINUTE;
    let accel = accel_g * STANDARD_GRAVITY * MM_PER_METER;
    let d_acc = (v_max * v_max) / (2.0 * accel);

    if 2.0 * d_acc < distance_mm {
        let t_acc = v_max / accel;
        let t_cruise = (distance_mm - 2.0 * d_acc) / v_max;
        2.0 * t_acc + t_cruise
    } else {
        let v_peak = (distance_mm * accel).sqrt();
        2.0 * (v_peak / accel)
    }
}

/// Feed and acceleration limits for one class of motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionLimits {
    /// Target feed in mm/min
    pub feed_mm_min: f64,
    /// Acceleration in g
    pub accel_g: f64,
}

impl MotionLimits {
    pub fn new(feed_mm_min: f64, accel_g: f64) -> Self {
        Self {
            feed_mm_min,
            accel_g,
        }
    }

    /// Time to cover `distance_mm` under these limits
    pub fn time_for(&self, distance_mm: f64) -> f64 {
        move_time(distance_mm, self.feed_mm_min, self.accel_g)
    }
}
