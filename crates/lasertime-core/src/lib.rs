//! # LaserTime Core
//!
//! Core types shared by the LaserTime crates: machine/process parameters,
//! controller command tokens, unit and positioning modes, physical constants,
//! and the unified error type.

pub mod constants;
pub mod error;
pub mod parameters;
pub mod units;

pub use error::{Error, GcodeError, Result};
pub use parameters::{ControllerCodes, ParameterSet};
pub use units::{Positioning, Units};
