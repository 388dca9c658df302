//! Enumeration of unordered image pairs within a scene.
//!
//! A scene of `k` images carries `k (k - 1) / 2` correspondence sets stored
//! flat, in lexicographic `(i, j)` order with `i < j`:
//!
//! ```text
//! k = 4:  (0,1) (0,2) (0,3) (1,2) (1,3) (2,3)
//!           0     1     2     3     4     5
//! ```
//!
//! Batch construction and aggregation both go through [`image_pairs`] so the
//! flat position of a correspondence set always agrees with its image pair.

use serde::{Deserialize, Serialize};

/// Indices of two images in a scene, `i < j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImagePair {
    pub i: usize,
    pub j: usize,
}

/// Number of unordered pairs among `k` images.
#[inline]
pub fn num_pairs(k: usize) -> usize {
    k * k.saturating_sub(1) / 2
}

/// Iterate the unordered pairs of `k` images in storage order.
pub fn image_pairs(k: usize) -> impl Iterator<Item = ImagePair> {
    (0..k).flat_map(move |i| ((i + 1)..k).map(move |j| ImagePair { i, j }))
}

/// Flat position of the pair `(i, j)` among `k` images, `None` unless `i < j < k`.
pub fn pair_index(i: usize, j: usize, k: usize) -> Option<usize> {
    if i >= j || j >= k {
        return None;
    }
    // Pairs starting before row i: sum over r < i of (k - 1 - r).
    let before = i * (2 * k - i - 1) / 2;
    Some(before + (j - i - 1))
}
