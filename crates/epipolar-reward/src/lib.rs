//! Epipolar-consistency grading of keypoint matches.
//!
//! Given calibrated images grouped into scenes and candidate correspondences
//! for every image pair, this crate classifies each candidate as consistent
//! or inconsistent with the ground-truth epipolar geometry and reduces the
//! classification to a fixed statistics record per pair.
//!
//! - [`classify_pairs`]: bidirectional threshold test on the distances
//!   reported by an [`EpipolarOracle`](epipolar_reward_core::EpipolarOracle).
//! - [`PairStats`]: counts, smoothed precision `tp / (P + 1)` and the linear
//!   reward `lm_tp * tp + lm_fp * fp + lm_kp * n_kps`.
//! - [`DiscreteMetric`]: walks every scene and image pair of a batch.
//!
//! # Example
//!
//! ```no_run
//! use epipolar_reward::{DiscreteMetric, RewardConfig, StatsSummary};
//! use epipolar_reward_core::{FundamentalOracle, ImageGeometry, MatchedPairs};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = RewardConfig::load_json("reward.json")?;
//! let metric = DiscreteMetric::new(config, FundamentalOracle)?;
//!
//! let images: Vec<Vec<ImageGeometry>> = /* [scene][image] */
//! # vec![];
//! let matches: Vec<Vec<MatchedPairs>> = /* [scene][pair] */
//! # vec![];
//! let stats = metric.evaluate(&images, &matches)?;
//! println!("mean reward {}", StatsSummary::from_batch(&stats).mean_reward);
//! # Ok(())
//! # }
//! ```

mod classify;
mod config;
mod error;
mod metric;
mod stats;

pub use classify::*;
pub use config::*;
pub use error::*;
pub use metric::*;
pub use stats::*;
