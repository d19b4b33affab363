//! Confusion matrix over a dense label space.

use crate::core::{
    error::{EvalError, Result},
    types::Label,
};
use crate::metrics::labels::{LabelData, LabelSpace};
use ndarray::{Array1, Array2, ArrayView1};

/// Count matrix with rows indexed by true label and columns by predicted
/// label, both in the order of [`ConfusionMatrix::labels`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    /// Label space giving the meaning of each row and column
    pub labels: LabelSpace,
    /// `matrix[[i, j]]` counts samples with true index `i`, predicted index `j`
    pub matrix: Array2<u64>,
}

impl ConfusionMatrix {
    /// Number of labels (rows and columns).
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Total number of counted samples.
    pub fn total(&self) -> u64 {
        self.matrix.sum()
    }

    /// Samples per true label (row sums).
    pub fn class_counts(&self) -> Array1<u64> {
        self.matrix.sum_axis(ndarray::Axis(1))
    }

    /// Correct predictions per label (diagonal).
    pub fn hits(&self) -> Array1<u64> {
        self.matrix.diag().to_owned()
    }

    /// Per-label accuracy `hits / count`, 0.0 for labels that never occur as
    /// a true label.
    pub fn per_class_accuracy(&self) -> Array1<f64> {
        self.class_counts()
            .iter()
            .zip(self.hits().iter())
            .map(|(&cnt, &hit)| if cnt > 0 { hit as f64 / cnt as f64 } else { 0.0 })
            .collect()
    }

    /// Count for a pair of label values.
    pub fn count(&self, true_label: Label, predicted_label: Label) -> Option<u64> {
        let i = self.labels.index_of(true_label)?;
        let j = self.labels.index_of(predicted_label)?;
        Some(self.matrix[[i, j]])
    }

    /// Human readable table.
    pub fn summary(&self) -> String {
        let mut out = String::from("true\\pred");
        for label in self.labels.labels() {
            out.push_str(&format!("\t{}", label));
        }
        for (row_label, row) in self.labels.labels().iter().zip(self.matrix.rows()) {
            out.push_str(&format!("\n{}", row_label));
            for count in row {
                out.push_str(&format!("\t{}", count));
            }
        }
        out
    }
}

/// Compute the confusion matrix of predicted against true labels.
///
/// The label space is the sorted union of the labels present in *this* call,
/// so matrix size and axis order depend on which labels appear. Use
/// [`confusion_matrix_with_labels`] for a fixed class universe.
pub fn confusion_matrix(
    y_pred: impl Into<LabelData>,
    y_real: impl Into<LabelData>,
) -> Result<ConfusionMatrix> {
    let y_pred = y_pred.into().to_labels("y_pred")?;
    let y_real = y_real.into().to_labels("y_real")?;
    check_lengths(&y_pred.view(), &y_real.view())?;

    let labels = LabelSpace::from_observed(&y_pred.view(), &y_real.view());
    fill(&y_pred.view(), &y_real.view(), labels)
}

/// Compute the confusion matrix over a caller supplied label space.
///
/// Every observed label must belong to `labels`.
pub fn confusion_matrix_with_labels(
    y_pred: impl Into<LabelData>,
    y_real: impl Into<LabelData>,
    labels: &LabelSpace,
) -> Result<ConfusionMatrix> {
    let y_pred = y_pred.into().to_labels("y_pred")?;
    let y_real = y_real.into().to_labels("y_real")?;
    check_lengths(&y_pred.view(), &y_real.view())?;

    for (parameter, values) in [("y_pred", &y_pred), ("y_real", &y_real)] {
        if let Some(&unknown) = values.iter().find(|&&label| !labels.contains(label)) {
            return Err(EvalError::invalid_parameter(
                parameter,
                unknown.to_string(),
                "label is not part of the supplied label space",
            ));
        }
    }

    fill(&y_pred.view(), &y_real.view(), labels.clone())
}

pub(crate) fn check_lengths(
    y_pred: &ArrayView1<'_, Label>,
    y_real: &ArrayView1<'_, Label>,
) -> Result<()> {
    if y_pred.len() != y_real.len() {
        return Err(EvalError::dimension_mismatch(
            format!("y_pred of length {}", y_real.len()),
            format!("y_pred: {}", y_pred.len()),
        ));
    }
    Ok(())
}

fn fill(
    y_pred: &ArrayView1<'_, Label>,
    y_real: &ArrayView1<'_, Label>,
    labels: LabelSpace,
) -> Result<ConfusionMatrix> {
    let n = labels.len();
    let mut matrix = Array2::<u64>::zeros((n, n));

    for (&real, &pred) in y_real.iter().zip(y_pred.iter()) {
        // Both labels are members of the space by construction or validation.
        let (Some(i), Some(j)) = (labels.index_of(real), labels.index_of(pred)) else {
            continue;
        };
        matrix[[i, j]] += 1;
    }

    Ok(ConfusionMatrix { labels, matrix })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_confusion_matrix_scenario() {
        let cm = confusion_matrix(vec![0i64, 1, 1], vec![0i64, 1, 0]).unwrap();
        assert_eq!(cm.labels.labels(), &[0, 1]);
        // Rows are true labels: true 0 was predicted once as 0 and once as 1.
        assert_eq!(cm.matrix, array![[1u64, 1], [0, 1]]);
        assert_eq!(cm.total(), 3);
    }

    #[test]
    fn test_confusion_matrix_sparse_labels() {
        let cm = confusion_matrix(vec![10i64, -3, 10], vec![10i64, 10, 42]).unwrap();
        assert_eq!(cm.labels.labels(), &[-3, 10, 42]);
        assert_eq!(cm.count(10, -3), Some(1));
        assert_eq!(cm.count(10, 10), Some(1));
        assert_eq!(cm.count(42, 10), Some(1));
        assert_eq!(cm.total(), 3);
    }

    #[test]
    fn test_confusion_matrix_empty() {
        let cm = confusion_matrix(Vec::<i64>::new(), Vec::<i64>::new()).unwrap();
        assert_eq!(cm.num_labels(), 0);
        assert_eq!(cm.total(), 0);
    }

    #[test]
    fn test_confusion_matrix_rejects_float_labels() {
        let err = confusion_matrix(vec![0.0f32, 1.0], vec![0i64, 1]).unwrap_err();
        assert!(err.to_string().contains("y_pred"));
        assert!(err.to_string().contains("float32"));

        let err = confusion_matrix(vec![0i64, 1], vec![0.5f64, 1.0]).unwrap_err();
        assert!(err.to_string().contains("y_real"));
    }

    #[test]
    fn test_confusion_matrix_length_mismatch() {
        let err = confusion_matrix(vec![0i64, 1], vec![0i64]).unwrap_err();
        assert!(matches!(err, EvalError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_confusion_matrix_with_fixed_labels() {
        let space = LabelSpace::contiguous(4);
        let cm = confusion_matrix_with_labels(vec![0i64, 2], vec![0i64, 2], &space).unwrap();
        assert_eq!(cm.num_labels(), 4);
        assert_eq!(cm.class_counts(), array![1u64, 0, 1, 0]);
        assert_eq!(cm.per_class_accuracy(), array![1.0, 0.0, 1.0, 0.0]);

        let err = confusion_matrix_with_labels(vec![5i64], vec![0i64], &space).unwrap_err();
        assert!(matches!(err, EvalError::InvalidParameter { .. }));
    }

    #[test]
    fn test_summary_lists_labels() {
        let cm = confusion_matrix(vec![1i64, 2], vec![1i64, 2]).unwrap();
        let summary = cm.summary();
        assert!(summary.starts_with("true\\pred\t1\t2"));
        assert!(summary.contains("\n2\t0\t1"));
    }
}
