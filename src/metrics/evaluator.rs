//! Configured evaluation entry points producing logged reports.

use crate::config::EvalConfig;
use crate::core::{
    error::{EvalError, Result},
    types::{Label, Score, VideoSegments},
};
use crate::io::{ArtifactSink, NpyArtifactSink};
use crate::metrics::{
    classification::{mean_class_accuracy, per_class_precision_recall, top_k_accuracy, PrecisionRecallReport},
    precision_recall::mean_average_precision,
    proposals::{average_recall_at_avg_proposals, ArAnResult},
};
use ndarray::{ArrayView1, ArrayView2};
use serde::Serialize;

/// Single-label recognition results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    /// `(k, accuracy)` for every configured k
    pub top_k: Vec<(usize, f64)>,
    /// Mean over classes of per-class accuracy
    pub mean_class_accuracy: f64,
}

impl ClassificationReport {
    /// Human readable summary.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = self
            .top_k
            .iter()
            .map(|(k, acc)| format!("top{}_acc: {:.4}", k, acc))
            .collect();
        parts.push(format!("mean_class_accuracy: {:.4}", self.mean_class_accuracy));
        parts.join(", ")
    }
}

/// Multi-label recognition results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiLabelReport {
    /// Mean over samples of average precision
    pub mean_average_precision: f64,
    /// Top-1 precision/recall per class
    pub precision_recall: PrecisionRecallReport,
}

impl MultiLabelReport {
    /// Human readable summary.
    pub fn summary(&self) -> String {
        format!(
            "mAP: {:.4}, total precision: {:.4}, total recall: {:.4}",
            self.mean_average_precision,
            self.precision_recall.total_precision,
            self.precision_recall.total_recall
        )
    }
}

/// Runs the metrics with the settings of an [`EvalConfig`].
///
/// When `num_threads` is non-zero, parallel work runs on a dedicated rayon
/// pool of that size; otherwise the global pool is used.
#[derive(Debug)]
pub struct Evaluator {
    config: EvalConfig,
    pool: Option<rayon::ThreadPool>,
}

impl Evaluator {
    /// Validate `config` and build an evaluator around it.
    pub fn new(config: EvalConfig) -> Result<Self> {
        config.validate()?;
        let pool = match config.num_threads {
            0 => None,
            n => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| EvalError::config(format!("Failed to build thread pool: {}", e)))?,
            ),
        };
        log::debug!(
            "evaluator ready: topk {:?}, {} IoU thresholds, {} threads",
            config.topk,
            config.temporal_iou_thresholds.len(),
            config.effective_num_threads()
        );
        Ok(Evaluator { config, pool })
    }

    /// The active configuration.
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Top-k accuracies and mean class accuracy of single-label predictions.
    pub fn evaluate_classification(
        &self,
        scores: &ArrayView2<'_, Score>,
        labels: &ArrayView1<'_, Label>,
    ) -> Result<ClassificationReport> {
        let accuracies = top_k_accuracy(scores, labels, &self.config.topk)?;
        let report = ClassificationReport {
            top_k: self.config.topk.iter().copied().zip(accuracies).collect(),
            mean_class_accuracy: mean_class_accuracy(scores, labels)?,
        };
        log::info!("{}", report.summary());
        Ok(report)
    }

    /// mAP and per-class precision/recall of multi-label predictions.
    ///
    /// Dumps the inputs as `.npy` files first when artifacts are enabled.
    pub fn evaluate_multilabel(
        &self,
        scores: &ArrayView2<'_, Score>,
        labels: &ArrayView2<'_, Label>,
    ) -> Result<MultiLabelReport> {
        let mut npy_sink = self
            .config
            .artifacts
            .enabled
            .then(|| NpyArtifactSink::from_config(&self.config.artifacts));
        let sink = npy_sink.as_mut().map(|s| s as &mut dyn ArtifactSink);

        let precision_recall = per_class_precision_recall(scores, labels, sink)?;
        if let Some(sink) = &npy_sink {
            log::debug!(
                "wrote multi-label artifacts to {} and {}",
                sink.scores_path().display(),
                sink.labels_path().display()
            );
        }

        let report = MultiLabelReport {
            mean_average_precision: mean_average_precision(scores, labels)?,
            precision_recall,
        };
        log::info!("{}", report.summary());
        Ok(report)
    }

    /// AR@AN of temporal proposals with the configured thresholds and cap.
    ///
    /// The total number of proposals is counted from `proposals`.
    pub fn evaluate_proposals(
        &self,
        ground_truth: &VideoSegments,
        proposals: &VideoSegments,
    ) -> Result<ArAnResult> {
        let total_num_proposals: usize = proposals.values().map(|p| p.nrows()).sum();
        let run = || {
            average_recall_at_avg_proposals(
                ground_truth,
                proposals,
                total_num_proposals,
                self.config.max_avg_proposals,
                &self.config.temporal_iou_thresholds,
            )
        };
        let result = match &self.pool {
            Some(pool) => pool.install(run)?,
            None => run()?,
        };
        log::info!("{}", result.summary());
        Ok(result)
    }
}
