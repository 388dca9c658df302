//! Geometry primitives for epipolar match grading.
//!
//! This crate provides the building blocks consumed by `epipolar-reward`:
//!
//! - linear algebra type aliases (`Real`, `Pt2`, `Mat3`, `Iso3`, ...),
//! - a pinhole image geometry handle ([`ImageGeometry`]),
//! - candidate correspondence sets ([`MatchedPairs`]),
//! - the canonical enumeration of image pairs in a scene ([`image_pairs`]),
//! - the [`EpipolarOracle`] capability and a fundamental-matrix
//!   implementation ([`FundamentalOracle`]).
//!
//! # Example
//!
//! ```
//! use epipolar_reward_core::{
//!     EpipolarOracle, FundamentalOracle, FxFyCxCySkew, ImageGeometry, Iso3, Pt3,
//! };
//! use nalgebra::Translation3;
//!
//! let k = FxFyCxCySkew { fx: 800.0, fy: 800.0, cx: 320.0, cy: 240.0, skew: 0.0 };
//! let left = ImageGeometry::new(k, Iso3::identity());
//! let right = ImageGeometry::new(k, Iso3::from_parts(
//!     Translation3::new(-0.2, 0.0, 0.0),
//!     nalgebra::UnitQuaternion::identity(),
//! ));
//!
//! let pw = Pt3::new(0.1, 0.1, 2.0);
//! let xl = left.project(&pw).unwrap();
//! let xr = right.project(&pw).unwrap();
//! let d = FundamentalOracle.asymmetric_distance(&[xl], &[xr], &left, &right);
//! assert!(d[0].abs() < 1e-6);
//! ```

/// Pinhole intrinsics and per-image geometry.
mod camera;
/// Candidate correspondence sets.
mod correspondence;
/// Linear algebra type aliases and helpers.
mod math;
/// Epipolar distance oracles.
mod oracle;
/// Image pair enumeration.
mod pairs;

pub use camera::*;
pub use correspondence::*;
pub use math::*;
pub use oracle::*;
pub use pairs::*;
