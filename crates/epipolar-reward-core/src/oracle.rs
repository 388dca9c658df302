//! Epipolar distance oracles.
//!
//! An oracle maps candidate correspondences between two images to signed
//! point-to-epipolar-line distances. The distance is asymmetric: swapping the
//! images (and the point sequences with them) measures in the other image
//! and generally gives a different value.

use crate::{ImageGeometry, Pt2, Real, to_homogeneous};
use log::warn;

/// Signed asymmetric epipolar distance between aligned point sequences.
///
/// `points_from[p]` lies in `image_from` and `points_to[p]` in `image_to`.
/// The returned vector must have one entry per input point, in input order.
/// Implementations report unusable geometry through non-finite values rather
/// than panicking.
///
/// Any `Fn(&[Pt2], &[Pt2], &I, &I) -> Vec<Real>` is an oracle, which keeps
/// test stubs short.
pub trait EpipolarOracle<I: ?Sized> {
    fn asymmetric_distance(
        &self,
        points_from: &[Pt2],
        points_to: &[Pt2],
        image_from: &I,
        image_to: &I,
    ) -> Vec<Real>;
}

impl<I: ?Sized, F> EpipolarOracle<I> for F
where
    F: Fn(&[Pt2], &[Pt2], &I, &I) -> Vec<Real>,
{
    fn asymmetric_distance(
        &self,
        points_from: &[Pt2],
        points_to: &[Pt2],
        image_from: &I,
        image_to: &I,
    ) -> Vec<Real> {
        self(points_from, points_to, image_from, image_to)
    }
}

/// Oracle for calibrated pinhole cameras.
///
/// Builds the fundamental matrix `F` from `image_from` to `image_to` and
/// returns the signed distance of each `x_to` from the epipolar line
/// `l = F x_from`, in pixels of `image_to`:
///
/// ```text
/// d = (x_to^T F x_from) / sqrt(l_0^2 + l_1^2)
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FundamentalOracle;

impl EpipolarOracle<ImageGeometry> for FundamentalOracle {
    fn asymmetric_distance(
        &self,
        points_from: &[Pt2],
        points_to: &[Pt2],
        image_from: &ImageGeometry,
        image_to: &ImageGeometry,
    ) -> Vec<Real> {
        let f = match image_from.fundamental_to(image_to) {
            Ok(f) => f,
            Err(err) => {
                warn!("epipolar distance unavailable: {err}");
                return vec![Real::NAN; points_from.len()];
            }
        };

        points_from
            .iter()
            .zip(points_to.iter())
            .map(|(x_from, x_to)| {
                let line = f * to_homogeneous(x_from);
                let norm = line.x.hypot(line.y);
                to_homogeneous(x_to).dot(&line) / norm
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FxFyCxCySkew, Iso3, Pt3};
    use nalgebra::{Translation3, UnitQuaternion};

    fn stereo() -> (ImageGeometry, ImageGeometry) {
        let k = FxFyCxCySkew {
            fx: 800.0,
            fy: 800.0,
            cx: 320.0,
            cy: 240.0,
            skew: 0.0,
        };
        let b_pose = Iso3::from_parts(
            Translation3::new(-0.3, 0.0, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 0.05, 0.0),
        );
        (
            ImageGeometry::new(k, Iso3::identity()),
            ImageGeometry::new(k, b_pose),
        )
    }

    #[test]
    fn true_projections_have_zero_distance() {
        let (a, b) = stereo();
        let world = [Pt3::new(0.1, 0.2, 3.0), Pt3::new(-0.5, -0.1, 5.0)];
        let pa: Vec<Pt2> = world.iter().map(|p| a.project(p).unwrap()).collect();
        let pb: Vec<Pt2> = world.iter().map(|p| b.project(p).unwrap()).collect();

        let d_ab = FundamentalOracle.asymmetric_distance(&pa, &pb, &a, &b);
        let d_ba = FundamentalOracle.asymmetric_distance(&pb, &pa, &b, &a);
        assert_eq!(d_ab.len(), 2);
        for d in d_ab.iter().chain(d_ba.iter()) {
            assert!(d.abs() < 1e-6, "distance {d}");
        }
    }

    #[test]
    fn offset_along_line_normal_is_measured_in_pixels() {
        let (a, b) = stereo();
        let pw = Pt3::new(0.2, -0.1, 4.0);
        let xa = a.project(&pw).unwrap();
        let xb = b.project(&pw).unwrap();

        let f = a.fundamental_to(&b).unwrap();
        let line = f * to_homogeneous(&xa);
        let normal = nalgebra::Vector2::new(line.x, line.y).normalize();
        let shifted = xb + normal * 3.0;

        let d = FundamentalOracle.asymmetric_distance(&[xa], &[shifted], &a, &b);
        assert!((d[0] - 3.0).abs() < 1e-6, "distance {}", d[0]);
    }

    #[test]
    fn singular_intrinsics_yield_nan() {
        let (a, mut b) = stereo();
        b.intrinsics.fy = 0.0;
        let pts = [Pt2::new(1.0, 1.0), Pt2::new(2.0, 2.0)];
        let d = FundamentalOracle.asymmetric_distance(&pts, &pts, &a, &b);
        assert_eq!(d.len(), 2);
        assert!(d.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn closures_act_as_oracles() {
        let oracle = |from: &[Pt2], _to: &[Pt2], _a: &u8, _b: &u8| vec![1.5; from.len()];
        let d = oracle.asymmetric_distance(&[Pt2::origin(); 3], &[Pt2::origin(); 3], &0u8, &1u8);
        assert_eq!(d, vec![1.5; 3]);
    }
}
