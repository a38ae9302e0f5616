//! Rotations and projections.

use cgmath::{
  frustum, ortho, perspective, Basis2, Deg, Matrix4, Rotation as _, Rotation2 as _, Vector2,
  Vector3,
};

use crate::controls::Angle;

/// Rotate a point of the plane counter-clockwise around the origin.
pub fn rotate_2d(p: [f32; 2], angle: Angle) -> [f32; 2] {
  let rotation: Basis2<f32> = Basis2::from_angle(Deg::from(angle));
  rotation.rotate_vector(Vector2::from(p)).into()
}

/// Width over height, falling back to 1 for a degenerate (minimized) framebuffer.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
  if width == 0 || height == 0 {
    1.
  } else {
    width as f32 / height as f32
  }
}

/// An object turned around its three axes and pushed away from the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
  pub x: Angle,
  pub y: Angle,
  pub z: Angle,
  pub distance: f32,
}

impl Orbit {
  pub fn new(distance: f32) -> Self {
    Orbit {
      x: Angle::default(),
      y: Angle::default(),
      z: Angle::default(),
      distance,
    }
  }

  pub fn with_angles(mut self, x: f32, y: f32, z: f32) -> Self {
    self.x = Angle::new(x);
    self.y = Angle::new(y);
    self.z = Angle::new(z);
    self
  }

  /// Translate away along `-z`, then rotate around `z`, `y` and `x`, in that order.
  pub fn model_view(&self) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(0., 0., -self.distance))
      * Matrix4::from_angle_z(Deg::from(self.z))
      * Matrix4::from_angle_y(Deg::from(self.y))
      * Matrix4::from_angle_x(Deg::from(self.x))
  }
}

/// Projection used by a sample; the matrix is rebuilt whenever the framebuffer is resized so that
/// the scene keeps its proportions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
  /// Vertical field of view, in degrees.
  Perspective { fovy: f32, near: f32, far: f32 },
  /// Viewing box of the near plane; the shorter screen side spans `[-half; half]`.
  Frustum { half: f32, near: f32, far: f32 },
  /// Orthographic box; the shorter screen side spans `[-half; half]`, centered on `center`.
  Ortho {
    center: [f32; 2],
    half: f32,
    near: f32,
    far: f32,
  },
}

impl Projection {
  pub fn matrix(&self, aspect: f32) -> Matrix4<f32> {
    match *self {
      Projection::Perspective { fovy, near, far } => perspective(Deg(fovy), aspect, near, far),

      Projection::Frustum { half, near, far } => {
        let [hw, hh] = half_extents(half, aspect);
        frustum(-hw, hw, -hh, hh, near, far)
      }

      Projection::Ortho {
        center: [cx, cy],
        half,
        near,
        far,
      } => {
        let [hw, hh] = half_extents(half, aspect);
        ortho(cx - hw, cx + hw, cy - hh, cy + hh, near, far)
      }
    }
  }
}

fn half_extents(half: f32, aspect: f32) -> [f32; 2] {
  if aspect >= 1. {
    [half * aspect, half]
  } else {
    [half, half / aspect]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geometry::approx_eq;
  use cgmath::Vector4;

  fn project(m: Matrix4<f32>, p: [f32; 3]) -> [f32; 3] {
    let v = m * Vector4::new(p[0], p[1], p[2], 1.);
    [v.x / v.w, v.y / v.w, v.z / v.w]
  }

  #[test]
  fn quarter_turn() {
    let [x, y] = rotate_2d([1., 0.], Angle::new(90.));
    assert!(approx_eq(x, 0.));
    assert!(approx_eq(y, 1.));

    let [x, y] = rotate_2d([1., 2.], Angle::new(180.));
    assert!(approx_eq(x, -1.));
    assert!(approx_eq(y, -2.));
  }

  #[test]
  fn degenerate_aspect_ratio() {
    assert_eq!(aspect_ratio(0, 0), 1.);
    assert_eq!(aspect_ratio(960, 540), 960. / 540.);
  }

  #[test]
  fn orbit_without_rotation_only_translates() {
    let p = project(Orbit::new(5.).model_view(), [1., 2., 3.]);
    assert_eq!(p, [1., 2., -2.]);
  }

  #[test]
  fn orbit_rotates_before_translating() {
    let orbit = Orbit::new(10.).with_angles(0., 90., 0.);
    let [x, y, z] = project(orbit.model_view(), [1., 0., 0.]);

    assert!(approx_eq(x, 0.));
    assert!(approx_eq(y, 0.));
    assert!(approx_eq(z, -11.));
  }

  #[test]
  fn ortho_keeps_proportions() {
    let proj = Projection::Ortho {
      center: [0., 0.],
      half: 1.,
      near: -1.,
      far: 1.,
    };

    // wide screen: x is stretched
    let [x, y, _] = project(proj.matrix(2.), [2., 1., 0.]);
    assert!(approx_eq(x, 1.));
    assert!(approx_eq(y, 1.));

    // tall screen: y is stretched
    let [x, y, _] = project(proj.matrix(0.5), [1., 2., 0.]);
    assert!(approx_eq(x, 1.));
    assert!(approx_eq(y, 1.));
  }

  #[test]
  fn ortho_center_maps_to_origin() {
    let proj = Projection::Ortho {
      center: [50., 50.],
      half: 50.,
      near: -1.,
      far: 1.,
    };
    let [x, y, _] = project(proj.matrix(1.), [50., 50., 0.]);
    assert!(approx_eq(x, 0.));
    assert!(approx_eq(y, 0.));
  }

  #[test]
  fn frustum_near_plane() {
    let proj = Projection::Frustum {
      half: 5.,
      near: 5.,
      far: 100.,
    };
    let [x, y, z] = project(proj.matrix(1.), [5., -5., -5.]);

    assert!(approx_eq(x, 1.));
    assert!(approx_eq(y, -1.));
    assert!(approx_eq(z, -1.));
  }

  #[test]
  fn perspective_far_plane() {
    let proj = Projection::Perspective {
      fovy: 60.,
      near: 1.,
      far: 50.,
    };
    let [_, _, z] = project(proj.matrix(1.5), [0., 0., -50.]);
    assert!(approx_eq(z, 1.));
  }
}
