//! Batch grading of matches across scenes.
//!
//! The batch layout is `[scene][image]` for images and `[scene][pair]` for
//! correspondence sets, where pairs follow
//! [`image_pairs`](epipolar_reward_core::image_pairs) order.

use crate::{PairStats, RewardConfig, RewardError, StatsSummary, classify_pairs};
use epipolar_reward_core::{EpipolarOracle, MatchedPairs, Pt2, image_pairs, num_pairs};
use log::debug;
use rayon::prelude::*;

/// Epipolar-consistency reward over batches of scenes.
///
/// # Example
///
/// ```
/// use epipolar_reward::{DiscreteMetric, RewardConfig};
/// use epipolar_reward_core::{MatchedPairs, Pt2};
///
/// // Stub geometry: every candidate lies 0.5 px from its epipolar line.
/// let oracle = |from: &[Pt2], _: &[Pt2], _: &u32, _: &u32| vec![0.5; from.len()];
/// let metric = DiscreteMetric::new(RewardConfig::default(), oracle).unwrap();
///
/// let kps = vec![Pt2::new(1.0, 2.0), Pt2::new(3.0, 4.0)];
/// let pairs = MatchedPairs::new(kps.clone(), kps, [vec![0, 1], vec![1, 0]]).unwrap();
/// let stats = metric.evaluate(&[vec![0u32, 1]], &[vec![pairs]]).unwrap();
///
/// assert_eq!(stats[0][0].true_positive_count, 2.0);
/// assert_eq!(stats[0][0].reward, 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct DiscreteMetric<O> {
    config: RewardConfig,
    oracle: O,
}

impl<O> DiscreteMetric<O> {
    /// Validate `config` and bind it to a geometry oracle.
    pub fn new(config: RewardConfig, oracle: O) -> Result<Self, RewardError> {
        config.validate()?;
        Ok(Self { config, oracle })
    }

    /// Metric with the default threshold (2 px) and weights.
    pub fn with_defaults(oracle: O) -> Self {
        Self {
            config: RewardConfig::default(),
            oracle,
        }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Grade one image pair.
    pub fn score_pair<I>(
        &self,
        pairs: &MatchedPairs,
        image_a: &I,
        image_b: &I,
    ) -> Result<PairStats, RewardError>
    where
        O: EpipolarOracle<I>,
    {
        let (points_a, points_b) = pairs.gather()?;
        self.score_gathered(&points_a, &points_b, pairs.num_keypoints(), image_a, image_b)
    }

    fn score_gathered<I>(
        &self,
        points_a: &[Pt2],
        points_b: &[Pt2],
        total_keypoints: usize,
        image_a: &I,
        image_b: &I,
    ) -> Result<PairStats, RewardError>
    where
        O: EpipolarOracle<I>,
    {
        let mask = classify_pairs(
            &self.oracle,
            points_a,
            points_b,
            image_a,
            image_b,
            self.config.threshold,
        )?;
        Ok(PairStats::from_mask(
            &mask,
            total_keypoints,
            &self.config.weights,
        ))
    }

    /// Grade every image pair of every scene.
    ///
    /// `images[s]` holds the `K` images of scene `s` and `matches[s]` its
    /// `K (K - 1) / 2` correspondence sets. The result has the shape of
    /// `matches`: `stats[s][n]` grades the `n`-th pair of
    /// [`image_pairs(K)`](epipolar_reward_core::image_pairs).
    ///
    /// Scenes are graded in parallel; the output does not depend on
    /// scheduling.
    ///
    /// # Errors
    ///
    /// Any shape mismatch or out-of-range match index aborts the whole call;
    /// shapes are never truncated or reinterpreted.
    pub fn evaluate<I>(
        &self,
        images: &[Vec<I>],
        matches: &[Vec<MatchedPairs>],
    ) -> Result<Vec<Vec<PairStats>>, RewardError>
    where
        I: Sync,
        O: EpipolarOracle<I> + Sync,
    {
        let per_scene = check_batch_shape(images, matches)?;

        let stats = images
            .par_iter()
            .zip(matches.par_iter())
            .enumerate()
            .map(|(scene, (scene_images, scene_matches))| {
                self.evaluate_scene(scene, scene_images, scene_matches)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if log::log_enabled!(log::Level::Debug) {
            let summary = StatsSummary::from_batch(&stats);
            debug!(
                "graded {} scenes x {} images ({} pairs): tp {} fp {} mean reward {:.4} mean precision {:.4}",
                images.len(),
                per_scene,
                summary.num_pairs,
                summary.true_positive_count,
                summary.false_positive_count,
                summary.mean_reward,
                summary.mean_precision
            );
        }
        Ok(stats)
    }

    fn evaluate_scene<I>(
        &self,
        scene: usize,
        images: &[I],
        matches: &[MatchedPairs],
    ) -> Result<Vec<PairStats>, RewardError>
    where
        O: EpipolarOracle<I>,
    {
        image_pairs(images.len())
            .zip(matches.iter())
            .map(|(pair, pairs)| {
                let (points_a, points_b) =
                    pairs
                        .gather()
                        .map_err(|source| RewardError::InvalidMatches {
                            scene,
                            i: pair.i,
                            j: pair.j,
                            source,
                        })?;
                self.score_gathered(
                    &points_a,
                    &points_b,
                    pairs.num_keypoints(),
                    &images[pair.i],
                    &images[pair.j],
                )
            })
            .collect()
    }
}

/// Check the batch is rectangular and returns the per-scene image count.
fn check_batch_shape<I>(
    images: &[Vec<I>],
    matches: &[Vec<MatchedPairs>],
) -> Result<usize, RewardError> {
    if images.len() != matches.len() {
        return Err(RewardError::SceneCountMismatch {
            images: images.len(),
            matches: matches.len(),
        });
    }
    let Some(first) = images.first() else {
        return Ok(0);
    };

    let k = first.len();
    if k < 2 {
        return Err(RewardError::TooFewImages(k));
    }
    let expected = num_pairs(k);
    for (scene, (scene_images, scene_matches)) in images.iter().zip(matches.iter()).enumerate() {
        if scene_images.len() != k {
            return Err(RewardError::RaggedImages {
                scene,
                expected: k,
                got: scene_images.len(),
            });
        }
        if scene_matches.len() != expected {
            return Err(RewardError::PairCountMismatch {
                scene,
                images: k,
                expected,
                got: scene_matches.len(),
            });
        }
    }
    Ok(k)
}
