//! Evaluation metrics for action recognition and temporal localization.
//!
//! Every metric is a pure function over its inputs: classification accuracy
//! from score matrices, precision-recall based average precision for
//! multi-label tasks, and temporal IoU plus AR@AN for proposal generation.
//! [`Evaluator`] bundles them behind an [`EvalConfig`](crate::config::EvalConfig)
//! for pipelines that want configured, logged reports.
//!
//! # Examples
//!
//! ## Classification
//!
//! ```rust
//! use action_eval::metrics::{mean_class_accuracy, top_k_accuracy};
//! use ndarray::array;
//!
//! # fn example() -> action_eval::Result<()> {
//! let scores = array![[0.1, 0.9], [0.8, 0.2]];
//! let labels = array![1i64, 1];
//!
//! let topk = top_k_accuracy(&scores.view(), &labels.view(), &[1, 2])?;
//! assert_eq!(topk, vec![0.5, 1.0]);
//!
//! let mca = mean_class_accuracy(&scores.view(), &labels.view())?;
//! println!("Mean class accuracy: {:.4}", mca);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Temporal IoU
//!
//! ```rust
//! use action_eval::metrics::pairwise_temporal_iou;
//! use ndarray::array;
//!
//! # fn example() -> action_eval::Result<()> {
//! let candidates = array![[0.0f64, 10.0]];
//! let targets = array![[5.0, 15.0]];
//! let iou = pairwise_temporal_iou(&candidates.view(), &targets.view())?;
//! assert!((iou[[0, 0]] - 1.0 / 3.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod classification;
pub mod confusion;
pub mod evaluator;
pub mod labels;
pub mod precision_recall;
pub mod proposals;
pub mod temporal;

pub use classification::{
    mean_class_accuracy, per_class_precision_recall, top_k_accuracy, PrecisionRecallReport,
};
pub use confusion::{confusion_matrix, confusion_matrix_with_labels, ConfusionMatrix};
pub use evaluator::{ClassificationReport, Evaluator, MultiLabelReport};
pub use labels::{LabelData, LabelSpace};
pub use precision_recall::{
    average_precision, binary_precision_recall_curve, mean_average_precision, PrecisionRecallCurve,
};
pub use proposals::{average_recall_at_avg_proposals, ArAnResult};
pub use temporal::pairwise_temporal_iou;

/// Utility functions shared by the metrics.
pub mod utils {
    use ndarray::ArrayView1;

    /// Indices ordered by descending value. Equal values keep the higher
    /// index first, which matches a stable ascending sort read backwards.
    pub fn descending_order(values: &ArrayView1<'_, f64>) -> Vec<usize> {
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&a, &b| values[b].total_cmp(&values[a]).then(b.cmp(&a)));
        order
    }

    /// Index of the first maximum value, 0 for an empty view.
    pub fn argmax(values: &ArrayView1<'_, f64>) -> usize {
        let mut best = 0;
        for (i, &value) in values.iter().enumerate() {
            // The first NaN is the maximum, as in numpy.
            if value.is_nan() {
                return i;
            }
            if value > values[best] {
                best = i;
            }
        }
        best
    }

    /// Arithmetic mean; NaN for an empty input.
    pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        sum / count as f64
    }

    /// Trapezoidal integral of `y` over the sample points `x`.
    pub fn trapezoid(y: &ArrayView1<'_, f64>, x: &ArrayView1<'_, f64>) -> f64 {
        y.iter()
            .zip(y.iter().skip(1))
            .zip(x.iter().zip(x.iter().skip(1)))
            .map(|((&y0, &y1), (&x0, &x1))| (x1 - x0) * (y0 + y1) / 2.0)
            .sum()
    }

}
