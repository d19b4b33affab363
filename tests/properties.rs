//! Property-based tests for the metric invariants.

mod common;

use action_eval::*;
use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array2};
use proptest::prelude::*;

fn paired_labels() -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
    (0usize..64).prop_flat_map(|n| {
        (
            prop::collection::vec(-5i64..20, n),
            prop::collection::vec(-5i64..20, n),
        )
    })
}

fn scores_and_labels() -> impl Strategy<Value = (Array2<f64>, Array1<i64>)> {
    (1usize..20, 1usize..8).prop_flat_map(|(n, c)| {
        (
            prop::collection::vec(0.0f64..1.0, n * c),
            prop::collection::vec(0i64..c as i64, n),
        )
            .prop_map(move |(scores, labels)| {
                (
                    Array2::from_shape_vec((n, c), scores).unwrap(),
                    Array1::from_vec(labels),
                )
            })
    })
}

fn segments(max_rows: usize) -> impl Strategy<Value = Array2<f64>> {
    prop::collection::vec((0.0f64..100.0, 0.1f64..50.0), 0..max_rows).prop_map(|rows| {
        let mut out = Array2::zeros((rows.len(), 2));
        for (i, (start, length)) in rows.into_iter().enumerate() {
            out[[i, 0]] = start;
            out[[i, 1]] = start + length;
        }
        out
    })
}

proptest! {
    #[test]
    fn prop_confusion_matrix_sums_to_sample_count((y_pred, y_real) in paired_labels()) {
        let n = y_pred.len() as u64;
        let cm = confusion_matrix(y_pred, y_real).unwrap();
        prop_assert_eq!(cm.total(), n);
        prop_assert_eq!(cm.class_counts().sum(), n);
    }

    #[test]
    fn prop_top_k_accuracy_is_monotone((scores, labels) in scores_and_labels()) {
        let topk: Vec<usize> = (1..=scores.ncols() + 1).collect();
        let acc = top_k_accuracy(&scores.view(), &labels.view(), &topk).unwrap();
        for pair in acc.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        prop_assert_eq!(acc[acc.len() - 1], 1.0);
    }

    #[test]
    fn prop_temporal_iou_is_symmetric(a in segments(6), b in segments(6)) {
        let ab = pairwise_temporal_iou(&a.view(), &b.view()).unwrap();
        let ba = pairwise_temporal_iou(&b.view(), &a.view()).unwrap();
        prop_assert_eq!(ab.t().dim(), ba.dim());
        for (x, y) in ab.t().iter().zip(ba.iter()) {
            prop_assert!((x - y).abs() < 1e-12);
            prop_assert!((0.0..=1.0).contains(x));
        }
    }

    #[test]
    fn prop_ar_an_auc_is_a_percentage(num_videos in 1usize..8, num_proposals in 1usize..12, seed in any::<u64>()) {
        let (gt, proposals, total) = common::create_test_videos(num_videos, num_proposals, seed);
        let result = average_recall_at_avg_proposals(&gt, &proposals, total, None, &[0.3, 0.5, 0.7]).unwrap();
        prop_assert!(result.auc >= 0.0 && result.auc <= 100.0);
    }
}

#[test]
fn test_perfect_single_sample_average_precision() {
    let scores = ndarray::array![[0.99, 0.7, 0.2, 0.1, 0.05]];
    let labels = ndarray::array![[1i64, 1, 0, 0, 0]];
    let map = mean_average_precision(&scores.view(), &labels.view()).unwrap();
    assert_abs_diff_eq!(map, 1.0);
}
