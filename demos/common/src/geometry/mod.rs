//! Closed-form geometry used by the samples.
//!
//! Nothing in here talks to the GPU: curves produce lists of points, surfaces are tessellated
//! into a [`Mesh`] the samples then upload.

use cgmath::{InnerSpace as _, Vector3};

pub mod curve;
pub mod spline;
pub mod surface;
pub mod transform;

pub use curve::{cross_markers, regular_polygon, sample, ParametricCurve};
pub use surface::{tessellate, Mesh, ParametricSurface};

/// Index marking the end of a strip in [`Mesh::strip_indices`].
pub const RESTART_INDEX: u32 = u32::MAX;

pub type Point3 = [f32; 3];

/// Normalize `v`, or return [`None`] for a (nearly) null vector.
pub(crate) fn normalize(v: Vector3<f32>) -> Option<Vector3<f32>> {
  if v.magnitude() <= 1e-6 {
    None
  } else {
    Some(v.normalize())
  }
}

#[cfg(test)]
pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
  (a - b).abs() <= 1e-4 * (1. + a.abs().max(b.abs()))
}

#[cfg(test)]
pub(crate) fn approx_eq3(a: Point3, b: Point3) -> bool {
  approx_eq(a[0], b[0]) && approx_eq(a[1], b[1]) && approx_eq(a[2], b[2])
}
