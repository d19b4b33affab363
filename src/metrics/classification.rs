//! Classification metrics: top-k accuracy, mean class accuracy and the
//! multi-label per-class precision/recall report.

use crate::core::{
    error::{EvalError, Result},
    types::{Label, Score},
};
use crate::io::ArtifactSink;
use crate::metrics::confusion::confusion_matrix;
use crate::metrics::utils;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use serde::Serialize;

/// Top-k accuracy for each `k` in `topk`, in the same order.
///
/// The `k` best classes of a sample are taken by descending score; equal
/// scores rank the higher class index first. A `k` larger than the number of
/// classes selects every class.
pub fn top_k_accuracy(
    scores: &ArrayView2<'_, Score>,
    labels: &ArrayView1<'_, Label>,
    topk: &[usize],
) -> Result<Vec<f64>> {
    validate_scores_labels(scores, labels)?;
    if let Some(&k) = topk.iter().find(|&&k| k == 0) {
        return Err(EvalError::invalid_parameter("topk", k.to_string(), "k must be at least 1"));
    }

    let rankings: Vec<Vec<usize>> = scores
        .rows()
        .into_iter()
        .map(|row| utils::descending_order(&row))
        .collect();
    let num_samples = labels.len() as f64;

    let accuracies = topk
        .iter()
        .map(|&k| {
            let hits = rankings
                .iter()
                .zip(labels.iter())
                .filter(|(ranking, label)| {
                    ranking
                        .iter()
                        .take(k)
                        .any(|&class| class as Label == **label)
                })
                .count();
            hits as f64 / num_samples
        })
        .collect();

    Ok(accuracies)
}

/// Mean over the observed classes of `hits / count`.
///
/// Classes are those present in the union of arg-max predictions and true
/// labels of this call; a class that only ever appears as a prediction
/// contributes 0.0.
pub fn mean_class_accuracy(scores: &ArrayView2<'_, Score>, labels: &ArrayView1<'_, Label>) -> Result<f64> {
    validate_scores_labels(scores, labels)?;

    let predictions: Array1<Label> = scores
        .rows()
        .into_iter()
        .map(|row| utils::argmax(&row) as Label)
        .collect();
    let cm = confusion_matrix(predictions, labels.to_owned())?;

    Ok(utils::mean(cm.per_class_accuracy().iter().copied()))
}

/// Per-class and aggregated precision/recall of top-1 predictions against
/// many-hot labels.
///
/// Ratios with a zero denominator are NaN, as are the totals when no class
/// is predicted or none is true; callers decide whether to filter them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecisionRecallReport {
    /// `TP / (TP + FP)` per class
    pub precision: Array1<f64>,
    /// `TP / (TP + FN)` per class
    pub recall: Array1<f64>,
    /// Precision over all samples and classes
    pub total_precision: f64,
    /// Recall over all samples and classes
    pub total_recall: f64,
    /// True positives per class
    pub true_positives: Array1<u64>,
    /// False positives per class
    pub false_positives: Array1<u64>,
    /// False negatives per class
    pub false_negatives: Array1<u64>,
}

impl PrecisionRecallReport {
    /// Classes whose precision or recall is undefined.
    pub fn undefined_classes(&self) -> Vec<usize> {
        self.precision
            .iter()
            .zip(self.recall.iter())
            .enumerate()
            .filter(|(_, (p, r))| p.is_nan() || r.is_nan())
            .map(|(class, _)| class)
            .collect()
    }

    /// Human readable summary.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Total precision: {:.6}, total recall: {:.6}",
            self.total_precision, self.total_recall
        );
        for (class, (p, r)) in self.precision.iter().zip(self.recall.iter()).enumerate() {
            out.push_str(&format!("\n  class {}: precision {:.6}, recall {:.6}", class, p, r));
        }
        out
    }
}

/// Compare one-hot top-1 predictions with a many-hot label matrix.
///
/// When `sink` is given the raw scores and labels are written to it before
/// anything is computed.
pub fn per_class_precision_recall(
    scores: &ArrayView2<'_, Score>,
    labels: &ArrayView2<'_, Label>,
    sink: Option<&mut dyn ArtifactSink>,
) -> Result<PrecisionRecallReport> {
    if scores.dim() != labels.dim() {
        return Err(EvalError::dimension_mismatch(
            format!("labels of shape {:?}", scores.dim()),
            format!("labels: {:?}", labels.dim()),
        ));
    }
    if scores.is_empty() {
        return Err(EvalError::precondition("Empty input arrays"));
    }

    if let Some(sink) = sink {
        sink.write_scores(scores)?;
        sink.write_labels(labels)?;
    }

    let mut y_pred = Array2::<u8>::zeros(scores.dim());
    for (row, mut pred_row) in scores.rows().into_iter().zip(y_pred.rows_mut()) {
        if !row.is_empty() {
            pred_row[utils::argmax(&row)] = 1;
        }
    }

    let num_classes = scores.ncols();
    let mut true_positives = Array1::<u64>::zeros(num_classes);
    let mut false_positives = Array1::<u64>::zeros(num_classes);
    let mut false_negatives = Array1::<u64>::zeros(num_classes);

    for (pred_col, (true_col, class)) in y_pred
        .axis_iter(Axis(1))
        .zip(labels.axis_iter(Axis(1)).zip(0..num_classes))
    {
        Zip::from(&pred_col).and(&true_col).for_each(|&p, &t| match (t, p) {
            (1, 1) => true_positives[class] += 1,
            (0, 1) => false_positives[class] += 1,
            (1, 0) => false_negatives[class] += 1,
            _ => {}
        });
    }

    let ratio = |num: u64, other: u64| num as f64 / (num + other) as f64;
    let precision: Array1<f64> = Zip::from(&true_positives)
        .and(&false_positives)
        .map_collect(|&tp, &fp| ratio(tp, fp));
    let recall: Array1<f64> = Zip::from(&true_positives)
        .and(&false_negatives)
        .map_collect(|&tp, &fn_| ratio(tp, fn_));

    let (tp, fp, fn_) = (true_positives.sum(), false_positives.sum(), false_negatives.sum());
    let report = PrecisionRecallReport {
        precision,
        recall,
        total_precision: ratio(tp, fp),
        total_recall: ratio(tp, fn_),
        true_positives,
        false_positives,
        false_negatives,
    };

    let undefined = report.undefined_classes();
    if !undefined.is_empty() {
        log::warn!(
            "precision/recall undefined for {} of {} classes: {:?}",
            undefined.len(),
            num_classes,
            undefined
        );
    }

    Ok(report)
}

fn validate_scores_labels(scores: &ArrayView2<'_, Score>, labels: &ArrayView1<'_, Label>) -> Result<()> {
    if scores.nrows() != labels.len() {
        return Err(EvalError::dimension_mismatch(
            format!("labels of length {}", scores.nrows()),
            format!("labels: {}", labels.len()),
        ));
    }
    if scores.nrows() == 0 {
        return Err(EvalError::precondition("Empty input arrays"));
    }
    if scores.ncols() == 0 {
        return Err(EvalError::precondition("Score matrix has no classes"));
    }
    Ok(())
}
