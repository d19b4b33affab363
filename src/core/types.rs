//! Core data types shared by every metric.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Prediction score and real-valued metric type.
pub type Score = f64;

/// Class label type. Labels may be sparse and negative.
pub type Label = i64;

/// Per-video segment matrices keyed by video id.
///
/// Ground-truth matrices have at least two columns `[start, end]`;
/// proposal matrices have at least three `[start, end, score]`.
pub type VideoSegments = BTreeMap<String, Array2<f64>>;

/// Numpy-style element type name, used in type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DType {
    /// 64-bit signed integer
    Int64,
    /// 32-bit signed integer
    Int32,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
    /// Boolean
    Bool,
}

impl DType {
    /// Whether values of this dtype are integer labels.
    pub fn is_integer(self) -> bool {
        matches!(self, DType::Int64 | DType::Int32)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::Int64 => write!(f, "int64"),
            DType::Int32 => write!(f, "int32"),
            DType::Float32 => write!(f, "float32"),
            DType::Float64 => write!(f, "float64"),
            DType::Bool => write!(f, "bool"),
        }
    }
}
