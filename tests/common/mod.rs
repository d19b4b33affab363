//! Common test utilities for action-eval integration tests.
#![allow(dead_code)]

use action_eval::VideoSegments;
use ndarray::{Array1, Array2};
use rand::prelude::*;

/// Random class scores in `[0, 1)`
pub fn create_test_scores(num_samples: usize, num_classes: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((num_samples, num_classes), |_| rng.gen::<f64>())
}

/// Random single-label targets in `0..num_classes`
pub fn create_test_labels(num_samples: usize, num_classes: usize, seed: u64) -> Array1<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array1::from_shape_fn(num_samples, |_| rng.gen_range(0..num_classes as i64))
}

/// Random many-hot targets with at least one positive per sample
pub fn create_test_multilabels(num_samples: usize, num_classes: usize, seed: u64) -> Array2<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut labels = Array2::from_shape_fn((num_samples, num_classes), |_| i64::from(rng.gen_bool(0.3)));
    for mut row in labels.rows_mut() {
        if row.sum() == 0 {
            row[rng.gen_range(0..num_classes)] = 1;
        }
    }
    labels
}

/// Random `[start, end]` segments inside `[0, duration)`
pub fn create_test_segments(num_segments: usize, duration: f64, rng: &mut StdRng) -> Array2<f64> {
    let mut segments = Array2::zeros((num_segments, 2));
    for mut row in segments.rows_mut() {
        let start = rng.gen_range(0.0..duration * 0.9);
        let length = rng.gen_range(1.0..duration * 0.5);
        row[0] = start;
        row[1] = (start + length).min(duration);
    }
    segments
}

/// Ground truth and scored proposals for `num_videos` synthetic videos.
///
/// Proposals are jittered copies of the ground truth mixed with random
/// segments, so recall is high but not perfect.
pub fn create_test_videos(
    num_videos: usize,
    num_proposals: usize,
    seed: u64,
) -> (VideoSegments, VideoSegments, usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ground_truth = VideoSegments::new();
    let mut proposals = VideoSegments::new();
    let mut total = 0;

    for v in 0..num_videos {
        let duration = 100.0;
        let gt = create_test_segments(rng.gen_range(1..4), duration, &mut rng);

        let mut props = Array2::zeros((num_proposals, 3));
        for (i, mut row) in props.rows_mut().into_iter().enumerate() {
            if i < gt.nrows() {
                let jitter = rng.gen_range(-2.0..2.0);
                row[0] = gt[[i, 0]] + jitter;
                row[1] = gt[[i, 1]] + jitter;
                row[2] = rng.gen_range(0.5..1.0);
            } else {
                let start = rng.gen_range(0.0..90.0);
                row[0] = start;
                row[1] = start + rng.gen_range(1.0..10.0);
                row[2] = rng.gen_range(0.0..0.6);
            }
        }

        total += props.nrows();
        ground_truth.insert(format!("video_{:03}", v), gt);
        proposals.insert(format!("video_{:03}", v), props);
    }

    (ground_truth, proposals, total)
}
