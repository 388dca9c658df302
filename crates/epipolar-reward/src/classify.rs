//! Bidirectional epipolar-consistency classification.

use crate::RewardError;
use epipolar_reward_core::{EpipolarOracle, Pt2, Real};
use log::warn;

/// Classify candidate correspondences as consistent with the two images'
/// epipolar geometry.
///
/// `points_a[p]` and `points_b[p]` form candidate `p`. The oracle is queried
/// once per direction because its distance is asymmetric; a candidate is
/// consistent iff `|d_ab| < threshold` and `|d_ba| < threshold`. Non-finite
/// distances fail the comparison and mark the candidate inconsistent.
///
/// An empty input yields an empty mask.
///
/// # Errors
///
/// Returns [`RewardError::PointCountMismatch`] if the point sequences differ
/// in length and [`RewardError::OracleLengthMismatch`] if the oracle answers
/// with the wrong number of distances.
pub fn classify_pairs<I, O>(
    oracle: &O,
    points_a: &[Pt2],
    points_b: &[Pt2],
    image_a: &I,
    image_b: &I,
    threshold: Real,
) -> Result<Vec<bool>, RewardError>
where
    I: ?Sized,
    O: EpipolarOracle<I> + ?Sized,
{
    if points_a.len() != points_b.len() {
        return Err(RewardError::PointCountMismatch {
            a: points_a.len(),
            b: points_b.len(),
        });
    }
    let n = points_a.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let d_ab = oracle.asymmetric_distance(points_a, points_b, image_a, image_b);
    let d_ba = oracle.asymmetric_distance(points_b, points_a, image_b, image_a);
    for d in [&d_ab, &d_ba] {
        if d.len() != n {
            return Err(RewardError::OracleLengthMismatch {
                expected: n,
                got: d.len(),
            });
        }
    }

    let non_finite = d_ab
        .iter()
        .chain(d_ba.iter())
        .filter(|d| !d.is_finite())
        .count();
    if non_finite > 0 {
        warn!("{non_finite} non-finite epipolar distances treated as inconsistent");
    }

    // `NaN < th` is false, so non-finite values fall out here.
    Ok(d_ab
        .iter()
        .zip(d_ba.iter())
        .map(|(ab, ba)| ab.abs() < threshold && ba.abs() < threshold)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Looks distances up by the x coordinate of the source point:
    /// `x` is the candidate id, `y` the image it lives in.
    struct TableOracle {
        a_to_b: Vec<Real>,
        b_to_a: Vec<Real>,
    }

    impl EpipolarOracle<usize> for TableOracle {
        fn asymmetric_distance(
            &self,
            points_from: &[Pt2],
            _points_to: &[Pt2],
            image_from: &usize,
            _image_to: &usize,
        ) -> Vec<Real> {
            let table = if *image_from == 0 {
                &self.a_to_b
            } else {
                &self.b_to_a
            };
            points_from.iter().map(|p| table[p.x as usize]).collect()
        }
    }

    fn candidates(n: usize) -> (Vec<Pt2>, Vec<Pt2>) {
        let a = (0..n).map(|i| Pt2::new(i as f64, 0.0)).collect();
        let b = (0..n).map(|i| Pt2::new(i as f64, 1.0)).collect();
        (a, b)
    }

    #[test]
    fn both_directions_must_pass() {
        let oracle = TableOracle {
            a_to_b: vec![0.5, 3.0, 1.0, 0.1, -1.9],
            b_to_a: vec![0.5, 3.0, 1.0, 2.5, 1.9],
        };
        let (a, b) = candidates(5);
        let mask = classify_pairs(&oracle, &a, &b, &0, &1, 2.0).unwrap();
        assert_eq!(mask, vec![true, false, true, false, true]);
    }

    #[test]
    fn threshold_is_strict() {
        let oracle = TableOracle {
            a_to_b: vec![2.0],
            b_to_a: vec![0.0],
        };
        let (a, b) = candidates(1);
        assert_eq!(
            classify_pairs(&oracle, &a, &b, &0, &1, 2.0).unwrap(),
            vec![false]
        );
    }

    #[test]
    fn swapping_images_gives_same_mask() {
        let oracle = TableOracle {
            a_to_b: vec![0.5, 3.0, 1.0, 0.1, -4.0, 1.2],
            b_to_a: vec![0.4, 0.2, 2.2, 1.0, 0.3, -1.1],
        };
        let (a, b) = candidates(6);
        let forward = classify_pairs(&oracle, &a, &b, &0, &1, 2.0).unwrap();
        let swapped = classify_pairs(&oracle, &b, &a, &1, &0, 2.0).unwrap();
        assert_eq!(forward, swapped);
    }

    #[test]
    fn lowering_threshold_never_adds_positives() {
        let oracle = TableOracle {
            a_to_b: vec![0.5, 3.0, 1.0, 0.1, -1.9, 0.75, 2.6],
            b_to_a: vec![0.4, 0.2, 2.2, 1.0, 0.3, -1.1, 0.0],
        };
        let (a, b) = candidates(7);
        let mut previous = usize::MAX;
        for th in [5.0, 3.0, 2.0, 1.5, 1.0, 0.5, 0.1, 0.0] {
            let tp = classify_pairs(&oracle, &a, &b, &0, &1, th)
                .unwrap()
                .into_iter()
                .filter(|&g| g)
                .count();
            assert!(tp <= previous, "threshold {th}: {tp} > {previous}");
            previous = tp;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn non_finite_distances_are_inconsistent() {
        let oracle = TableOracle {
            a_to_b: vec![f64::NAN, 0.5, f64::INFINITY],
            b_to_a: vec![0.5, f64::NEG_INFINITY, 0.5],
        };
        let (a, b) = candidates(3);
        assert_eq!(
            classify_pairs(&oracle, &a, &b, &0, &1, 2.0).unwrap(),
            vec![false, false, false]
        );
    }

    #[test]
    fn empty_input_gives_empty_mask() {
        let oracle = |_: &[Pt2], _: &[Pt2], _: &usize, _: &usize| -> Vec<Real> {
            panic!("oracle must not be queried without candidates")
        };
        let mask = classify_pairs(&oracle, &[], &[], &0, &1, 2.0).unwrap();
        assert!(mask.is_empty());
    }

    #[test]
    fn rejects_unequal_point_counts() {
        let oracle = |from: &[Pt2], _: &[Pt2], _: &usize, _: &usize| vec![0.0; from.len()];
        let (a, _) = candidates(3);
        let (_, b) = candidates(2);
        let err = classify_pairs(&oracle, &a, &b, &0, &1, 2.0).unwrap_err();
        assert!(matches!(err, RewardError::PointCountMismatch { a: 3, b: 2 }));
    }

    #[test]
    fn rejects_misaligned_oracle_output() {
        let oracle = |_: &[Pt2], _: &[Pt2], _: &usize, _: &usize| vec![0.0; 1];
        let (a, b) = candidates(3);
        let err = classify_pairs(&oracle, &a, &b, &0, &1, 2.0).unwrap_err();
        assert!(matches!(
            err,
            RewardError::OracleLengthMismatch {
                expected: 3,
                got: 1
            }
        ));
    }
}
