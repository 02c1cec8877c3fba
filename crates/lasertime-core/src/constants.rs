//! Physical and presentation constants shared across crates

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Canonical length units (mm) per meter
pub const MM_PER_METER: f64 = 1000.0;

/// Seconds per minute, for per-minute feed rates
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Edge length of the square box the preview toolpath is scaled into
pub const DEFAULT_DISPLAY_BOX: f64 = 400.0;

/// Decimal places used when reporting times
pub const REPORT_DECIMALS: usize = 3;
