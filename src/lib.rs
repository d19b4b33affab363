//! # action-eval
//!
//! Evaluation metrics for video action recognition and temporal action
//! localization, built on `ndarray`.
//!
//! ## Features
//!
//! - **Recognition**: top-k accuracy, mean class accuracy and a confusion
//!   matrix over the labels actually observed (or a fixed label universe).
//! - **Multi-label**: per-sample precision-recall curves, mean average
//!   precision, and a per-class precision/recall report with optional
//!   `.npy` dumps of its inputs.
//! - **Localization**: pairwise temporal IoU and average recall at average
//!   number of proposals (AR@AN) with its area under the curve.
//! - **Configuration**: an [`EvalConfig`] loadable from TOML, JSON or the
//!   environment, driving the [`Evaluator`] facade.
//!
//! ## Quick Start
//!
//! ```rust
//! use action_eval::{confusion_matrix, top_k_accuracy};
//! use ndarray::array;
//!
//! # fn main() -> action_eval::Result<()> {
//! action_eval::init();
//!
//! let cm = confusion_matrix(vec![1i64, 1], vec![0i64, 1])?;
//! assert_eq!(cm.matrix, array![[0u64, 1], [0, 1]]);
//!
//! let scores = array![[0.1, 0.9], [0.8, 0.2]];
//! let labels = array![1i64, 1];
//! assert_eq!(top_k_accuracy(&scores.view(), &labels.view(), &[1])?, vec![0.5]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: error type, shared types, constants and logging setup
//! - [`config`]: evaluation configuration
//! - [`io`]: debug artifact sinks
//! - [`metrics`]: the metrics and the [`Evaluator`] facade

#![doc(html_root_url = "https://docs.rs/action-eval/")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Artifact output
pub mod io;

// Metrics
pub mod metrics;

// Re-export core functionality for convenience
pub use crate::core::{
    constants::*,
    error::{EvalError, Result},
    types::*,
};

// Re-export configuration functionality
pub use crate::config::{ArtifactConfig, EvalConfig, EvalConfigBuilder};

// Re-export artifact sinks
pub use crate::io::{ArtifactSink, MemoryArtifactSink, NpyArtifactSink};

// Re-export metrics
pub use crate::metrics::{
    average_precision, average_recall_at_avg_proposals, binary_precision_recall_curve,
    confusion_matrix, confusion_matrix_with_labels, mean_average_precision, mean_class_accuracy,
    pairwise_temporal_iou, per_class_precision_recall, top_k_accuracy, ArAnResult,
    ClassificationReport, ConfusionMatrix, Evaluator, LabelData, LabelSpace, MultiLabelReport,
    PrecisionRecallCurve, PrecisionRecallReport,
};

// Version information
pub use crate::core::constants::ACTION_EVAL_VERSION as VERSION;

/// Initialize the library.
///
/// Installs an `env_logger` logger (defaulting `RUST_LOG` to `info`) unless
/// one is already present. Calling it is optional and idempotent; the metrics
/// work without it, their log output is simply discarded.
pub fn init() {
    crate::core::initialize_logging();
}
