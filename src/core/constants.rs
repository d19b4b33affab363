//! Default values used across the metrics and configuration.

/// Library version string.
pub const ACTION_EVAL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default k values for top-k accuracy.
pub const DEFAULT_TOPK: [usize; 2] = [1, 5];

/// Lowest default temporal IoU threshold.
pub const DEFAULT_IOU_THRESHOLD_START: f64 = 0.5;

/// Highest default temporal IoU threshold (inclusive).
pub const DEFAULT_IOU_THRESHOLD_END: f64 = 0.95;

/// Number of default temporal IoU thresholds.
pub const DEFAULT_NUM_IOU_THRESHOLDS: usize = 10;

/// Number of percentile points on the AR@AN curve (1% .. 100%).
pub const NUM_PERCENTILE_POINTS: usize = 100;

/// Default file name for dumped raw score matrices.
pub const DEFAULT_SCORES_ARTIFACT: &str = "prob_scores_raw.npy";

/// Default file name for dumped many-hot label matrices.
pub const DEFAULT_LABELS_ARTIFACT: &str = "prob_y_true.npy";

/// Prefix of environment variables read by the configuration loader.
pub const ENV_PREFIX: &str = "ACTION_EVAL_";

/// `n` evenly spaced values over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Default temporal IoU thresholds: ten values from 0.5 to 0.95.
pub fn default_iou_thresholds() -> Vec<f64> {
    linspace(
        DEFAULT_IOU_THRESHOLD_START,
        DEFAULT_IOU_THRESHOLD_END,
        DEFAULT_NUM_IOU_THRESHOLDS,
    )
}
