//! Temporal intersection over union between 1-D segments.

use crate::core::error::{EvalError, Result};
use ndarray::{Array2, ArrayView, ArrayView2, Dimension, Ix2};
use num_traits::Float;

/// IoU between every target and every candidate segment.
///
/// Both inputs are `[rows x 2+]` matrices of `[start, end, ...]`; extra
/// columns are ignored. The result is `targets x candidates`. A pair whose
/// union is zero produces NaN.
///
/// Inputs of any other dimensionality are rejected with
/// [`EvalError::DimensionMismatch`].
pub fn pairwise_temporal_iou<F, D1, D2>(
    candidate_segments: &ArrayView<'_, F, D1>,
    target_segments: &ArrayView<'_, F, D2>,
) -> Result<Array2<F>>
where
    F: Float,
    D1: Dimension,
    D2: Dimension,
{
    if candidate_segments.ndim() != 2 || target_segments.ndim() != 2 {
        return Err(EvalError::dimension_mismatch(
            "2-dimensional segment arrays",
            format!(
                "candidates with {} and targets with {} dimensions",
                candidate_segments.ndim(),
                target_segments.ndim()
            ),
        ));
    }
    let candidates = as_segments(candidate_segments, "candidate_segments")?;
    let targets = as_segments(target_segments, "target_segments")?;

    Ok(iou_matrix(&candidates, &targets))
}

fn as_segments<'a, F, D>(segments: &ArrayView<'a, F, D>, parameter: &str) -> Result<ArrayView2<'a, F>>
where
    F: Float,
    D: Dimension,
{
    let view = segments
        .clone()
        .into_dimensionality::<Ix2>()
        .map_err(|e| EvalError::dimension_mismatch(format!("2-dimensional {}", parameter), e.to_string()))?;
    if view.nrows() > 0 && view.ncols() < 2 {
        return Err(EvalError::dimension_mismatch(
            format!("{} with at least 2 columns", parameter),
            format!("{} columns", view.ncols()),
        ));
    }
    Ok(view)
}

/// IoU matrix for already validated `[start, end]` views.
pub(crate) fn iou_matrix<F: Float>(candidates: &ArrayView2<'_, F>, targets: &ArrayView2<'_, F>) -> Array2<F> {
    iou_matrix_with(candidates, targets, |intersection, union| intersection / union)
}

/// IoU matrix with intersection and union computed in `F` and the ratio
/// formed by `divide`.
pub(crate) fn iou_matrix_with<F, T, D>(
    candidates: &ArrayView2<'_, F>,
    targets: &ArrayView2<'_, F>,
    divide: D,
) -> Array2<T>
where
    F: Float,
    T: Float,
    D: Fn(F, F) -> T,
{
    let (n, m) = (targets.nrows(), candidates.nrows());
    let mut temporal_iou = Array2::<T>::zeros((n, m));

    for (j, candidate) in candidates.rows().into_iter().enumerate() {
        let (c_start, c_end) = (candidate[0], candidate[1]);
        for (i, target) in targets.rows().into_iter().enumerate() {
            let (t_start, t_end) = (target[0], target[1]);
            let intersection = (c_end.min(t_end) - c_start.max(t_start)).max(F::zero());
            let union = (t_end - t_start) + (c_end - c_start) - intersection;
            temporal_iou[[i, j]] = divide(intersection, union);
        }
    }

    temporal_iou
}
