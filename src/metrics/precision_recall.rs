//! Precision-recall curves and mean average precision for multi-label
//! recognition.

use crate::core::{
    error::{EvalError, Result},
    types::{Label, Score},
};
use crate::metrics::utils;
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::Serialize;

/// Precision and recall at every distinct score threshold of one sample.
///
/// Points run from full recall down to the synthetic `(precision 1, recall 0)`
/// point at the end, so `recall` is non-increasing. `precision` and `recall`
/// hold one more value than `thresholds`; the extra trailing point has no
/// threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecisionRecallCurve {
    /// Precision per point
    pub precision: Array1<f64>,
    /// Recall per point
    pub recall: Array1<f64>,
    /// Score threshold per point, excluding the synthetic end point
    pub thresholds: Array1<f64>,
}

impl PrecisionRecallCurve {
    /// Number of points, including the synthetic end point.
    pub fn len(&self) -> usize {
        self.precision.len()
    }

    /// Whether the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.precision.is_empty()
    }

    /// Area under the precision-recall step function:
    /// `-sum((recall[i + 1] - recall[i]) * precision[i])`.
    ///
    /// NaN when the sample has no positive label.
    pub fn average_precision(&self) -> f64 {
        -self
            .recall
            .iter()
            .zip(self.recall.iter().skip(1))
            .zip(self.precision.iter())
            .map(|((&r0, &r1), &p)| (r1 - r0) * p)
            .sum::<f64>()
    }
}

/// Precision-recall curve of one sample's class scores against its many-hot
/// label vector. A class is positive when its label equals 1.
///
/// Classes are visited by descending score; among equal scores the higher
/// class index comes first. Ties never split a threshold, so the curve does
/// not depend on that order. Recall is NaN everywhere when no class is
/// positive.
pub fn binary_precision_recall_curve(
    y_score: &ArrayView1<'_, Score>,
    y_true: &ArrayView1<'_, Label>,
) -> Result<PrecisionRecallCurve> {
    if y_score.len() != y_true.len() {
        return Err(EvalError::dimension_mismatch(
            format!("y_true of length {}", y_score.len()),
            format!("y_true: {}", y_true.len()),
        ));
    }
    if y_score.is_empty() {
        return Err(EvalError::precondition("Empty score vector"));
    }

    let order = utils::descending_order(y_score);
    let sorted_scores: Vec<f64> = order.iter().map(|&i| y_score[i]).collect();

    // Last index of each run of equal scores.
    let threshold_inds: Vec<usize> = (0..sorted_scores.len())
        .filter(|&i| i + 1 == sorted_scores.len() || sorted_scores[i + 1] != sorted_scores[i])
        .collect();

    let cumulative_tps: Vec<u64> = order
        .iter()
        .scan(0u64, |acc, &i| {
            *acc += u64::from(y_true[i] == 1);
            Some(*acc)
        })
        .collect();

    let tps: Vec<f64> = threshold_inds.iter().map(|&i| cumulative_tps[i] as f64).collect();
    let fps: Vec<f64> = threshold_inds
        .iter()
        .zip(tps.iter())
        .map(|(&i, &tp)| 1.0 + i as f64 - tp)
        .collect();
    let total_tps = tps[tps.len() - 1];

    let precision: Vec<f64> = tps
        .iter()
        .zip(fps.iter())
        .map(|(&tp, &fp)| {
            let p = tp / (tp + fp);
            if p.is_nan() {
                0.0
            } else {
                p
            }
        })
        .collect();
    let recall: Vec<f64> = tps.iter().map(|&tp| tp / total_tps).collect();

    // Stop at the first point reaching full recall, then walk back to the
    // highest threshold.
    let last_ind = tps.partition_point(|&tp| tp < total_tps);

    let mut curve_precision: Vec<f64> = precision[..=last_ind].iter().rev().copied().collect();
    let mut curve_recall: Vec<f64> = recall[..=last_ind].iter().rev().copied().collect();
    let thresholds: Vec<f64> = threshold_inds[..=last_ind]
        .iter()
        .rev()
        .map(|&i| sorted_scores[i])
        .collect();
    curve_precision.push(1.0);
    curve_recall.push(0.0);

    Ok(PrecisionRecallCurve {
        precision: Array1::from_vec(curve_precision),
        recall: Array1::from_vec(curve_recall),
        thresholds: Array1::from_vec(thresholds),
    })
}

/// Average precision of a single sample.
pub fn average_precision(y_score: &ArrayView1<'_, Score>, y_true: &ArrayView1<'_, Label>) -> Result<f64> {
    Ok(binary_precision_recall_curve(y_score, y_true)?.average_precision())
}

/// Mean over samples of the per-sample average precision.
///
/// `scores` and `labels` are `samples x classes`; a sample without any
/// positive class yields NaN and therefore a NaN mean.
pub fn mean_average_precision(scores: &ArrayView2<'_, Score>, labels: &ArrayView2<'_, Label>) -> Result<f64> {
    if scores.dim() != labels.dim() {
        return Err(EvalError::dimension_mismatch(
            format!("labels of shape {:?}", scores.dim()),
            format!("labels: {:?}", labels.dim()),
        ));
    }
    if scores.nrows() == 0 {
        return Err(EvalError::precondition("Empty input arrays"));
    }

    let aps = scores
        .rows()
        .into_iter()
        .zip(labels.rows())
        .map(|(score, label)| average_precision(&score, &label))
        .collect::<Result<Vec<f64>>>()?;

    let undefined = aps.iter().filter(|ap| ap.is_nan()).count();
    if undefined > 0 {
        log::warn!("{} of {} samples have no positive label", undefined, aps.len());
    }

    Ok(utils::mean(aps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_curve_matches_reference_values() {
        let scores = array![0.1, 0.4, 0.35, 0.8];
        let truth = array![0i64, 0, 1, 1];
        let curve = binary_precision_recall_curve(&scores.view(), &truth.view()).unwrap();

        assert_eq!(curve.len(), 4);
        assert_eq!(curve.thresholds, array![0.35, 0.4, 0.8]);
        assert_abs_diff_eq!(curve.precision[0], 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.precision[1], 0.5);
        assert_abs_diff_eq!(curve.precision[2], 1.0);
        assert_abs_diff_eq!(curve.precision[3], 1.0);
        assert_eq!(curve.recall, array![1.0, 0.5, 0.5, 0.0]);
        assert_abs_diff_eq!(curve.average_precision(), 5.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_curve_truncates_at_full_recall() {
        let scores = array![0.9, 0.8, 0.1, 0.05];
        let truth = array![1i64, 1, 0, 0];
        let curve = binary_precision_recall_curve(&scores.view(), &truth.view()).unwrap();
        assert_eq!(curve.precision, array![1.0, 1.0, 1.0]);
        assert_eq!(curve.recall, array![1.0, 0.5, 0.0]);
        assert_eq!(curve.thresholds, array![0.8, 0.9]);
        assert_abs_diff_eq!(curve.average_precision(), 1.0);
    }

    #[test]
    fn test_curve_groups_tied_scores() {
        let scores = array![0.5, 0.5, 0.2];
        let truth = array![1i64, 0, 0];
        let curve = binary_precision_recall_curve(&scores.view(), &truth.view()).unwrap();
        assert_eq!(curve.thresholds, array![0.5]);
        assert_eq!(curve.precision, array![0.5, 1.0]);
        assert_eq!(curve.recall, array![1.0, 0.0]);

        // Swapping the tied entries does not change the curve.
        let swapped = binary_precision_recall_curve(&scores.view(), &array![0i64, 1, 0].view()).unwrap();
        assert_eq!(swapped, curve);
    }

    #[test]
    fn test_curve_only_counts_label_one() {
        let scores = array![0.9, 0.1];
        let truth = array![2i64, 1];
        let curve = binary_precision_recall_curve(&scores.view(), &truth.view()).unwrap();
        assert_eq!(curve.recall, array![1.0, 0.0, 0.0]);
        assert_abs_diff_eq!(curve.precision[0], 0.5);
        assert_abs_diff_eq!(curve.precision[1], 0.0);
    }

    #[test]
    fn test_curve_without_positives_is_nan() {
        let scores = array![0.9, 0.1];
        let truth = array![0i64, 0];
        let curve = binary_precision_recall_curve(&scores.view(), &truth.view()).unwrap();
        assert!(curve.recall[0].is_nan());
        assert!(curve.average_precision().is_nan());
    }

    #[test]
    fn test_curve_rejects_mismatched_lengths() {
        let err = binary_precision_recall_curve(&array![0.1, 0.2].view(), &array![1i64].view()).unwrap_err();
        assert!(matches!(err, EvalError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_mean_average_precision() {
        let scores = array![[0.9, 0.8, 0.1, 0.05], [0.1, 0.4, 0.35, 0.8]];
        let labels = array![[1i64, 1, 0, 0], [0, 0, 1, 1]];
        let map = mean_average_precision(&scores.view(), &labels.view()).unwrap();
        assert_abs_diff_eq!(map, (1.0 + 5.0 / 6.0) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_average_precision_single_positive_last() {
        let scores = array![0.9, 0.5, 0.1];
        let truth = array![0i64, 0, 1];
        let ap = average_precision(&scores.view(), &truth.view()).unwrap();
        assert_abs_diff_eq!(ap, 1.0 / 3.0, epsilon = 1e-12);
    }
}
