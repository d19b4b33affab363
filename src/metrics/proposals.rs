//! Average recall at average number of proposals (AR@AN) for temporal
//! action proposal generation.
//!
//! Proposals of each video are ranked by confidence and capped relative to
//! the average number of proposals per video. Recall is then measured at 100
//! percentile points of the retrieved proposals for every IoU threshold, and
//! summarised by the area under the threshold-averaged recall curve.

use crate::core::{
    constants::NUM_PERCENTILE_POINTS,
    error::{EvalError, Result},
    types::VideoSegments,
};
use crate::metrics::{temporal::iou_matrix_with, utils};
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use rayon::prelude::*;
use serde::Serialize;

/// Output of [`average_recall_at_avg_proposals`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArAnResult {
    /// `recall[[i, j]]`: recall at the i-th IoU threshold and j-th percentile
    pub recall: Array2<f64>,
    /// Recall averaged over IoU thresholds, one value per percentile
    pub average_recall: Array1<f64>,
    /// Average number of proposals per video at each percentile
    pub proposals_per_video: Array1<f64>,
    /// Area under the AR@AN curve on a 0-100 scale
    pub auc: f64,
}

impl ArAnResult {
    /// Average recall at the largest number of proposals.
    pub fn final_average_recall(&self) -> f64 {
        self.average_recall.last().copied().unwrap_or(f64::NAN)
    }

    /// Human readable summary.
    pub fn summary(&self) -> String {
        format!(
            "AR@AN: AUC {:.4}, AR@{:.1} {:.4} ({} IoU thresholds)",
            self.auc,
            self.proposals_per_video.last().copied().unwrap_or(0.0),
            self.final_average_recall(),
            self.recall.nrows()
        )
    }
}

/// IoU of one video's ground truth against its retrieved proposals, best
/// scoring proposal first. Segments are single precision; the ratio is
/// taken in double precision.
struct VideoScores {
    temporal_iou: Array2<f64>,
    num_retrieved: usize,
}

/// Compute AR@AN over a set of videos.
///
/// * `ground_truth` - per-video `[start, end]` rows; every key must also be
///   present in `proposals`
/// * `proposals` - per-video `[start, end, score]` rows
/// * `total_num_proposals` - number of proposals over all videos
/// * `max_avg_proposals` - cap on the average proposals per video; `None` or
///   zero uses `total_num_proposals / num_videos`
/// * `temporal_iou_thresholds` - thresholds a match must reach
///
/// Fails with [`EvalError::Precondition`] when there are no videos, no
/// proposals, or when the cap retrieves no proposal at all.
pub fn average_recall_at_avg_proposals(
    ground_truth: &VideoSegments,
    proposals: &VideoSegments,
    total_num_proposals: usize,
    max_avg_proposals: Option<f64>,
    temporal_iou_thresholds: &[f64],
) -> Result<ArAnResult> {
    let total_num_videos = ground_truth.len();
    if total_num_videos == 0 {
        return Err(EvalError::precondition("ground truth contains no videos"));
    }
    if total_num_proposals == 0 {
        return Err(EvalError::precondition("total_num_proposals must be positive"));
    }
    if temporal_iou_thresholds.is_empty() {
        return Err(EvalError::invalid_parameter(
            "temporal_iou_thresholds",
            "[]",
            "at least one threshold is required",
        ));
    }

    let max_avg_proposals = match max_avg_proposals {
        Some(value) if value < 0.0 || value.is_nan() => {
            return Err(EvalError::invalid_parameter(
                "max_avg_proposals",
                value.to_string(),
                "must be non-negative",
            ));
        }
        Some(value) if value > 0.0 => value,
        _ => total_num_proposals as f64 / total_num_videos as f64,
    };
    let ratio = max_avg_proposals * total_num_videos as f64 / total_num_proposals as f64;

    let videos: Vec<(&String, &Array2<f64>)> = ground_truth.iter().collect();
    let score_list = videos
        .par_iter()
        .map(|&(video_id, gt)| {
            let video_proposals = proposals
                .get(video_id)
                .ok_or_else(|| EvalError::missing_video(video_id.as_str()))?;
            video_scores(video_id, gt, video_proposals, ratio)
        })
        .collect::<Result<Vec<VideoScores>>>()?;

    let total_num_retrieved_proposals: usize = score_list.iter().map(|s| s.num_retrieved).sum();
    log::debug!(
        "retrieved {} of {} proposals over {} videos",
        total_num_retrieved_proposals,
        total_num_proposals,
        total_num_videos
    );
    if total_num_retrieved_proposals == 0 {
        return Err(EvalError::precondition(
            "no proposals retrieved; raise max_avg_proposals or supply proposals",
        ));
    }

    // Number of proposals as a fraction of the total retrieved.
    let pcn_scale = max_avg_proposals * total_num_videos as f64 / total_num_retrieved_proposals as f64;
    let pcn_list: Array1<f64> = (1..=NUM_PERCENTILE_POINTS)
        .map(|k| k as f64 / 100.0 * pcn_scale)
        .collect();

    let positives: usize = score_list.iter().map(|s| s.temporal_iou.nrows()).sum();
    let mut recall = Array2::<f64>::zeros((temporal_iou_thresholds.len(), pcn_list.len()));

    for (mut recall_row, &threshold) in recall.rows_mut().into_iter().zip(temporal_iou_thresholds) {
        let mut matched_counts = Array1::<usize>::zeros(pcn_list.len());

        for score in &score_list {
            let iou = &score.temporal_iou;
            let num_columns = iou.ncols();
            let first_hits = first_matching_proposal(&iou.view(), threshold);

            for (matched, &pcn) in matched_counts.iter_mut().zip(pcn_list.iter()) {
                let num_proposals = ((num_columns as f64 * pcn) as usize).min(num_columns);
                *matched += first_hits
                    .iter()
                    .filter(|hit| matches!(hit, Some(idx) if *idx < num_proposals))
                    .count();
            }
        }

        recall_row.assign(&matched_counts.mapv(|m| m as f64 / positives as f64));
    }

    let average_recall = recall
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(pcn_list.len()));
    let proposals_per_video =
        &pcn_list * (total_num_retrieved_proposals as f64 / total_num_videos as f64);

    let area_under_curve = utils::trapezoid(&average_recall.view(), &proposals_per_video.view());
    let auc = 100.0 * area_under_curve / proposals_per_video[proposals_per_video.len() - 1];

    Ok(ArAnResult {
        recall,
        average_recall,
        proposals_per_video,
        auc,
    })
}

fn video_scores(
    video_id: &str,
    ground_truth: &Array2<f64>,
    proposals: &Array2<f64>,
    ratio: f64,
) -> Result<VideoScores> {
    if ground_truth.nrows() > 0 && ground_truth.ncols() < 2 {
        return Err(EvalError::dimension_mismatch(
            format!("ground truth of '{}' with at least 2 columns", video_id),
            format!("{} columns", ground_truth.ncols()),
        ));
    }
    let ground_truth = ground_truth.mapv(|v| v as f32);

    if proposals.nrows() == 0 {
        log::warn!("video '{}' has no proposals", video_id);
        return Ok(VideoScores {
            temporal_iou: Array2::zeros((ground_truth.nrows(), 1)),
            num_retrieved: 0,
        });
    }
    if proposals.ncols() < 3 {
        return Err(EvalError::dimension_mismatch(
            format!("proposals of '{}' with at least 3 columns", video_id),
            format!("{} columns", proposals.ncols()),
        ));
    }

    let order = utils::descending_order(&proposals.column(2));
    let num_proposals = proposals.nrows();
    let num_retrieved = ((num_proposals as f64 * ratio) as usize).min(num_proposals);

    let retrieved: Array2<f32> = proposals
        .select(Axis(0), &order[..num_retrieved])
        .slice(s![.., ..2])
        .mapv(|v| v as f32);

    Ok(VideoScores {
        temporal_iou: iou_matrix_with(&retrieved.view(), &ground_truth.view(), |inter, union| {
            f64::from(inter) / f64::from(union)
        }),
        num_retrieved,
    })
}

/// Column of the first proposal reaching `threshold`, per ground-truth row.
fn first_matching_proposal(temporal_iou: &ArrayView2<'_, f64>, threshold: f64) -> Vec<Option<usize>> {
    temporal_iou
        .rows()
        .into_iter()
        .map(|row| row.iter().position(|&iou| iou >= threshold))
        .collect()
}
