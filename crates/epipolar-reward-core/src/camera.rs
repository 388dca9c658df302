//! Pinhole image geometry.
//!
//! [`ImageGeometry`] is the camera handle consumed by
//! [`FundamentalOracle`](crate::FundamentalOracle): intrinsics plus the
//! world-to-camera pose, `x_cam = R * x_world + t`.

use crate::{Iso3, Mat3, Pt2, skew};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while deriving two-view geometry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// The intrinsics matrix cannot be inverted.
    #[error("intrinsics matrix is singular (fx = {fx}, fy = {fy})")]
    SingularIntrinsics { fx: f64, fy: f64 },
}

/// Standard pinhole intrinsics with optional skew.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FxFyCxCySkew {
    /// Focal length in pixels along X.
    pub fx: f64,
    /// Focal length in pixels along Y.
    pub fy: f64,
    /// Principal point X coordinate in pixels.
    pub cx: f64,
    /// Principal point Y coordinate in pixels.
    pub cy: f64,
    /// Skew term (typically 0).
    #[serde(default)]
    pub skew: f64,
}

impl FxFyCxCySkew {
    /// Return the 3x3 camera intrinsics matrix K.
    pub fn k_matrix(&self) -> Mat3 {
        Mat3::new(
            self.fx, self.skew, self.cx, 0.0, self.fy, self.cy, 0.0, 0.0, 1.0,
        )
    }

    /// Closed-form inverse of K.
    pub fn k_inverse(&self) -> Result<Mat3, GeometryError> {
        let det = self.fx * self.fy;
        if !det.is_finite() || det.abs() < f64::EPSILON {
            return Err(GeometryError::SingularIntrinsics {
                fx: self.fx,
                fy: self.fy,
            });
        }
        let ifx = 1.0 / self.fx;
        let ify = 1.0 / self.fy;
        Ok(Mat3::new(
            ifx,
            -self.skew * ifx * ify,
            (self.skew * self.cy - self.cx * self.fy) * ifx * ify,
            0.0,
            ify,
            -self.cy * ify,
            0.0,
            0.0,
            1.0,
        ))
    }

    /// Map camera-frame sensor coordinates to pixels.
    pub fn sensor_to_pixel(&self, sensor: &Pt2) -> Pt2 {
        let u = self.fx * sensor.x + self.skew * sensor.y + self.cx;
        let v = self.fy * sensor.y + self.cy;
        Pt2::new(u, v)
    }
}

/// Calibrated camera of one image: intrinsics and the `T_C_W` pose.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageGeometry {
    pub intrinsics: FxFyCxCySkew,
    /// World to camera transform.
    pub cam_se3_world: Iso3,
}

impl ImageGeometry {
    pub fn new(intrinsics: FxFyCxCySkew, cam_se3_world: Iso3) -> Self {
        Self {
            intrinsics,
            cam_se3_world,
        }
    }

    /// Relative pose `T_B_A` taking points from this camera's frame into `other`'s.
    pub fn relative_to(&self, other: &ImageGeometry) -> Iso3 {
        other.cam_se3_world * self.cam_se3_world.inverse()
    }

    /// Fundamental matrix mapping pixels of this image to epipolar lines in `other`.
    ///
    /// `F = K_b^{-T} [t]_x R K_a^{-1}` with `(R, t) = T_B_A`, so that
    /// `x_b^T F x_a = 0` for a perfect correspondence.
    pub fn fundamental_to(&self, other: &ImageGeometry) -> Result<Mat3, GeometryError> {
        let b_se3_a = self.relative_to(other);
        let rot = b_se3_a.rotation.to_rotation_matrix();
        let essential = skew(&b_se3_a.translation.vector) * rot.matrix();

        let k_a_inv = self.intrinsics.k_inverse()?;
        let k_b_inv = other.intrinsics.k_inverse()?;
        Ok(k_b_inv.transpose() * essential * k_a_inv)
    }

    /// Project a world point into pixels, `None` behind the camera.
    pub fn project(&self, pw: &crate::Pt3) -> Option<Pt2> {
        let pc = self.cam_se3_world * pw;
        if pc.z <= f64::EPSILON {
            return None;
        }
        Some(
            self.intrinsics
                .sensor_to_pixel(&Pt2::new(pc.x / pc.z, pc.y / pc.z)),
        )
    }
}
