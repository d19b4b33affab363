//! Error handling and error types for action-eval.
//!
//! Every metric is a single-pass computation, so errors surface directly to
//! the caller and are never retried internally. Numeric edge cases such as a
//! zero denominator are not errors: they produce NaN or a substituted value
//! according to the rule documented on each metric.

use std::io;
use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Wrong container or element type for an argument.
    #[error("{parameter} dtype must be an integer type, but got {actual}")]
    InvalidType {
        /// Name of the offending argument
        parameter: String,
        /// Observed type or dtype
        actual: String,
    },

    /// Mismatched lengths or wrong dimensionality.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected shape description
        expected: String,
        /// Observed shape description
        actual: String,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Offending value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Caller precondition that cannot be satisfied by the inputs.
    #[error("Precondition violated: {message}")]
    Precondition {
        /// Description of the violated precondition
        message: String,
    },

    /// A ground-truth video has no proposal entry.
    #[error("No proposals found for video '{video_id}'")]
    MissingVideo {
        /// Video key present in the ground truth
        video_id: String,
    },

    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        /// Underlying error
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        /// Underlying error
        #[from]
        source: serde_json::Error,
    },

    /// Errors writing `.npy` debug artifacts
    #[error("NPY write error: {source}")]
    Npy {
        /// Underlying error
        #[from]
        source: ndarray_npy::WriteNpyError,
    },
}

/// Type alias for Results using EvalError
pub type Result<T> = std::result::Result<T, EvalError>;

impl EvalError {
    /// Create an invalid type error
    pub fn invalid_type<P, A>(parameter: P, actual: A) -> Self
    where
        P: Into<String>,
        A: Into<String>,
    {
        EvalError::InvalidType {
            parameter: parameter.into(),
            actual: actual.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        EvalError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        EvalError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a precondition error
    pub fn precondition<S: Into<String>>(message: S) -> Self {
        EvalError::Precondition {
            message: message.into(),
        }
    }

    /// Create a missing video error
    pub fn missing_video<S: Into<String>>(video_id: S) -> Self {
        EvalError::MissingVideo {
            video_id: video_id.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        EvalError::Config {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            EvalError::InvalidType { .. } => "invalid_type",
            EvalError::DimensionMismatch { .. } => "dimension_mismatch",
            EvalError::InvalidParameter { .. } => "invalid_parameter",
            EvalError::Precondition { .. } => "precondition",
            EvalError::MissingVideo { .. } => "missing_video",
            EvalError::Config { .. } => "config",
            EvalError::Io { .. } => "io",
            EvalError::Json { .. } => "json",
            EvalError::Npy { .. } => "npy",
        }
    }

    /// Whether the error stems from the shape or type of the inputs, as
    /// opposed to configuration or I/O.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EvalError::InvalidType { .. }
                | EvalError::DimensionMismatch { .. }
                | EvalError::InvalidParameter { .. }
                | EvalError::Precondition { .. }
                | EvalError::MissingVideo { .. }
        )
    }
}

/// Return early with the given error when the condition does not hold.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

/// Build a [`EvalError::Config`] from a message or format string.
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::EvalError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::EvalError::config(format!($fmt, $($arg)*))
    };
}
