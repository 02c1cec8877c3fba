//! Error handling for LaserTime
//!
//! Provides the error types used by the estimator and its callers:
//! - G-Code errors (operand parsing, parameter validation)
//! - I/O errors surfaced by callers that read programs from disk
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-Code error type
///
/// Represents errors raised while interpreting an NC program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// A parameter token whose numeric suffix is not a real number
    #[error("Malformed operand '{token}' at line {line_number}: {reason}")]
    MalformedOperand {
        /// The 1-based line number where the token was found.
        line_number: usize,
        /// The offending token, uppercased.
        token: String,
        /// The reason the operand could not be parsed.
        reason: String,
    },

    /// Invalid machine/process parameter
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        param: String,
        /// The reason the parameter is invalid.
        reason: String,
    },
}

/// Main error type for LaserTime
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a G-Code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Gcode(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
