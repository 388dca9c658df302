//! Candidate keypoint correspondences between two images.
//!
//! [`MatchedPairs`] stores the full keypoint sets of both images together with
//! a `(2, P)` index table. Column `p` of the table proposes that
//! `kps_a[matches[0][p]]` and `kps_b[matches[1][p]]` depict the same 3D point.

use crate::Pt2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which image of a pair an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// Structural problems in a correspondence set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorrespondenceError {
    /// The two rows of the index table differ in length.
    #[error("match index rows differ in length: {a} vs {b}")]
    RowLengthMismatch { a: usize, b: usize },
    /// A match index points past the end of its keypoint set.
    #[error("match {column} indexes keypoint {index} of image {side}, which has {len} keypoints")]
    IndexOutOfBounds {
        side: Side,
        column: usize,
        index: usize,
        len: usize,
    },
}

/// Keypoints of two images plus the candidate matches between them.
///
/// # Example
///
/// ```
/// use epipolar_reward_core::{MatchedPairs, Pt2};
///
/// let kps_a = vec![Pt2::new(10.0, 20.0), Pt2::new(30.0, 40.0)];
/// let kps_b = vec![Pt2::new(11.0, 19.0)];
/// let pairs = MatchedPairs::new(kps_a, kps_b, [vec![1], vec![0]]).unwrap();
///
/// assert_eq!(pairs.num_matches(), 1);
/// assert_eq!(pairs.num_keypoints(), 3);
/// let (pa, pb) = pairs.gather().unwrap();
/// assert_eq!(pa, vec![Pt2::new(30.0, 40.0)]);
/// assert_eq!(pb, vec![Pt2::new(11.0, 19.0)]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPairs {
    /// All keypoints detected in image A.
    pub kps_a: Vec<Pt2>,
    /// All keypoints detected in image B.
    pub kps_b: Vec<Pt2>,
    /// Index table: row 0 into `kps_a`, row 1 into `kps_b`.
    pub matches: [Vec<usize>; 2],
}

impl MatchedPairs {
    /// Construct a correspondence set, checking the index table.
    ///
    /// # Errors
    ///
    /// Returns an error if the index rows differ in length or any index is out
    /// of bounds for its keypoint set.
    pub fn new(
        kps_a: Vec<Pt2>,
        kps_b: Vec<Pt2>,
        matches: [Vec<usize>; 2],
    ) -> Result<Self, CorrespondenceError> {
        let pairs = Self {
            kps_a,
            kps_b,
            matches,
        };
        pairs.validate()?;
        Ok(pairs)
    }

    /// A pair of images with no keypoints and no matches.
    pub fn empty() -> Self {
        Self {
            kps_a: Vec::new(),
            kps_b: Vec::new(),
            matches: [Vec::new(), Vec::new()],
        }
    }

    /// Check the index table against both keypoint sets.
    ///
    /// Deserialized values bypass [`MatchedPairs::new`], so consumers call
    /// this (or [`MatchedPairs::gather`]) before trusting the indices.
    pub fn validate(&self) -> Result<(), CorrespondenceError> {
        let [idx_a, idx_b] = &self.matches;
        if idx_a.len() != idx_b.len() {
            return Err(CorrespondenceError::RowLengthMismatch {
                a: idx_a.len(),
                b: idx_b.len(),
            });
        }
        check_bounds(Side::A, idx_a, self.kps_a.len())?;
        check_bounds(Side::B, idx_b, self.kps_b.len())
    }

    /// Number of candidate correspondences `P`.
    #[inline]
    pub fn num_matches(&self) -> usize {
        self.matches[0].len()
    }

    /// Total keypoint count over both images, `|kps_a| + |kps_b|`.
    #[inline]
    pub fn num_keypoints(&self) -> usize {
        self.kps_a.len() + self.kps_b.len()
    }

    /// Gather the matched points: `(kps_a[matches[0]], kps_b[matches[1]])`.
    pub fn gather(&self) -> Result<(Vec<Pt2>, Vec<Pt2>), CorrespondenceError> {
        self.validate()?;
        let [idx_a, idx_b] = &self.matches;
        let pts_a = idx_a.iter().map(|&i| self.kps_a[i]).collect();
        let pts_b = idx_b.iter().map(|&i| self.kps_b[i]).collect();
        Ok((pts_a, pts_b))
    }
}

fn check_bounds(side: Side, indices: &[usize], len: usize) -> Result<(), CorrespondenceError> {
    match indices.iter().position(|&i| i >= len) {
        Some(column) => Err(CorrespondenceError::IndexOutOfBounds {
            side,
            column,
            index: indices[column],
            len,
        }),
        None => Ok(()),
    }
}
