//! Per-pair statistics records and batch summaries.

use crate::RewardWeights;
use serde::{Deserialize, Serialize};

/// Grading of one image pair's candidate correspondences.
///
/// Counts are stored as `f64` so records can be averaged and fed to numeric
/// consumers without conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairStats {
    /// Keypoints detected in both images, `|kps_a| + |kps_b|`.
    pub total_keypoints: f64,
    /// Number of candidate correspondences `P`.
    pub total_candidate_pairs: f64,
    /// Candidates consistent with the epipolar geometry.
    pub true_positive_count: f64,
    /// Candidates rejected by the epipolar check.
    pub false_positive_count: f64,
    /// `lm_tp * tp + lm_fp * fp + lm_kp * total_keypoints`.
    pub reward: f64,
    /// `tp / (P + 1)`.
    pub precision: f64,
}

impl PairStats {
    /// Reduce a consistency mask to statistics.
    ///
    /// The precision denominator is `P + 1` rather than `P`. This smoothing
    /// keeps `P = 0` well defined and biases every precision slightly
    /// downwards; consumers rely on these exact values, so it stays.
    pub fn from_mask(mask: &[bool], total_keypoints: usize, weights: &RewardWeights) -> Self {
        let n_pairs = mask.len();
        let n_good = mask.iter().filter(|&&good| good).count();
        let n_bad = n_pairs - n_good;

        let tp = n_good as f64;
        let fp = n_bad as f64;
        let n_kps = total_keypoints as f64;

        Self {
            total_keypoints: n_kps,
            total_candidate_pairs: n_pairs as f64,
            true_positive_count: tp,
            false_positive_count: fp,
            reward: weights.reward(tp, fp, n_kps),
            precision: tp / (n_pairs as f64 + 1.0),
        }
    }
}

/// Totals and means over a batch of [`PairStats`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Number of graded image pairs.
    pub num_pairs: usize,
    pub total_keypoints: f64,
    pub total_candidate_pairs: f64,
    pub true_positive_count: f64,
    pub false_positive_count: f64,
    /// Summed reward over all pairs.
    pub total_reward: f64,
    /// Mean reward per pair, 0 for an empty batch.
    pub mean_reward: f64,
    /// Mean per-pair precision, 0 for an empty batch.
    pub mean_precision: f64,
}

impl StatsSummary {
    pub fn from_stats<'a>(stats: impl IntoIterator<Item = &'a PairStats>) -> Self {
        let mut summary = Self::default();
        let mut precision_sum = 0.0;
        for s in stats {
            summary.num_pairs += 1;
            summary.total_keypoints += s.total_keypoints;
            summary.total_candidate_pairs += s.total_candidate_pairs;
            summary.true_positive_count += s.true_positive_count;
            summary.false_positive_count += s.false_positive_count;
            summary.total_reward += s.reward;
            precision_sum += s.precision;
        }
        if summary.num_pairs > 0 {
            let n = summary.num_pairs as f64;
            summary.mean_reward = summary.total_reward / n;
            summary.mean_precision = precision_sum / n;
        }
        summary
    }

    /// Summarize a `[scene][pair]` batch.
    pub fn from_batch(batch: &[Vec<PairStats>]) -> Self {
        Self::from_stats(batch.iter().flatten())
    }
}
