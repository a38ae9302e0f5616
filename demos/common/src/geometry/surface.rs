//! Parametric surfaces and their tessellation into triangle strips.

use cgmath::Vector3;
use std::f32::consts::{FRAC_PI_2, PI};

use super::{normalize, Point3, RESTART_INDEX};

/// A surface `(u, v) ↦ (x, y, z)` defined over a rectangle of the parameter plane.
pub trait ParametricSurface {
  fn point(&self, u: f32, v: f32) -> Point3;

  fn u_domain(&self) -> (f32, f32);

  fn v_domain(&self) -> (f32, f32);

  /// Unit normal at `(u, v)`.
  ///
  /// Defaults to [`estimated_normal`], oriented along `∂u × ∂v`. Surfaces whose parameterization
  /// makes that product point inside override it.
  fn normal(&self, u: f32, v: f32) -> Point3 {
    estimated_normal(self, u, v).into()
  }
}

/// Unit vector along `∂u × ∂v`, the partial derivatives being estimated with central differences.
///
/// Where they vanish (a pole, an apex), the estimate is retried a bit towards the middle of the `v`
/// domain, then falls back to `+z`.
pub fn estimated_normal<S>(surface: &S, u: f32, v: f32) -> Vector3<f32>
where
  S: ParametricSurface + ?Sized,
{
  let (v0, v1) = surface.v_domain();
  let nudge = (v1 - v0) * 1e-2;
  let towards_center = if v < (v0 + v1) * 0.5 { nudge } else { -nudge };

  central_difference(surface, u, v)
    .or_else(|| central_difference(surface, u, v + towards_center))
    .unwrap_or_else(Vector3::unit_z)
}

fn central_difference<S>(surface: &S, u: f32, v: f32) -> Option<Vector3<f32>>
where
  S: ParametricSurface + ?Sized,
{
  let (u0, u1) = surface.u_domain();
  let (v0, v1) = surface.v_domain();
  let hu = (u1 - u0).abs().max(1e-3) * 1e-3;
  let hv = (v1 - v0).abs().max(1e-3) * 1e-3;
  let at = |u, v| Vector3::from(surface.point(u, v));

  let du = at(u + hu, v) - at(u - hu, v);
  let dv = at(u, v + hv) - at(u, v - hv);

  normalize(normalize(du)?.cross(normalize(dv)?))
}

/// A tessellated surface.
///
/// Vertices form a `(p + 1) × (q + 1)` grid, `u` varying fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
  pub positions: Vec<Point3>,
  pub normals: Vec<Point3>,
  /// One triangle strip per grid row, rows separated by [`RESTART_INDEX`].
  pub strip_indices: Vec<u32>,
  /// Pairs of indices, one per grid edge.
  pub wire_indices: Vec<u32>,
  p: u32,
  q: u32,
}

impl Mesh {
  /// Grid resolution, `(p, q)`.
  pub fn resolution(&self) -> (u32, u32) {
    (self.p, self.q)
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  pub fn triangle_count(&self) -> usize {
    2 * self.p as usize * self.q as usize
  }
}

/// Evaluate `surface` over a `p × q` grid.
///
/// `p` is the number of slices along `u`, `q` the number of stacks along `v`; both are clamped to
/// at least one.
pub fn tessellate<S>(surface: &S, p: u32, q: u32) -> Mesh
where
  S: ParametricSurface + ?Sized,
{
  let p = p.max(1);
  let q = q.max(1);
  let (u0, u1) = surface.u_domain();
  let (v0, v1) = surface.v_domain();
  let vertex_nb = (p as usize + 1) * (q as usize + 1);

  let mut positions = Vec::with_capacity(vertex_nb);
  let mut normals = Vec::with_capacity(vertex_nb);

  for j in 0..=q {
    let v = v0 + (v1 - v0) * j as f32 / q as f32;

    for i in 0..=p {
      let u = u0 + (u1 - u0) * i as f32 / p as f32;
      positions.push(surface.point(u, v));
      normals.push(surface.normal(u, v));
    }
  }

  let index = |i: u32, j: u32| j * (p + 1) + i;

  let mut strip_indices = Vec::with_capacity((q as usize) * (2 * p as usize + 3));
  for j in 0..q {
    if j > 0 {
      strip_indices.push(RESTART_INDEX);
    }

    for i in 0..=p {
      strip_indices.push(index(i, j + 1));
      strip_indices.push(index(i, j));
    }
  }

  let mut wire_indices = Vec::new();
  for j in 0..=q {
    for i in 0..=p {
      if i < p {
        wire_indices.extend_from_slice(&[index(i, j), index(i + 1, j)]);
      }

      if j < q {
        wire_indices.extend_from_slice(&[index(i, j), index(i, j + 1)]);
      }
    }
  }

  Mesh {
    positions,
    normals,
    strip_indices,
    wire_indices,
    p,
    q,
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
  pub radius: f32,
}

impl ParametricSurface for Sphere {
  // u is the longitude, v the latitude
  fn point(&self, u: f32, v: f32) -> Point3 {
    let r = self.radius;
    [r * v.cos() * u.cos(), r * v.sin(), r * v.cos() * u.sin()]
  }

  fn u_domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }

  fn v_domain(&self) -> (f32, f32) {
    (-FRAC_PI_2, FRAC_PI_2)
  }

  fn normal(&self, u: f32, v: f32) -> Point3 {
    [v.cos() * u.cos(), v.sin(), v.cos() * u.sin()]
  }
}

/// Upper half of a sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hemisphere {
  pub radius: f32,
}

impl ParametricSurface for Hemisphere {
  fn point(&self, u: f32, v: f32) -> Point3 {
    Sphere {
      radius: self.radius,
    }
    .point(u, v)
  }

  fn u_domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }

  fn v_domain(&self) -> (f32, f32) {
    (0., FRAC_PI_2)
  }

  fn normal(&self, u: f32, v: f32) -> Point3 {
    Sphere {
      radius: self.radius,
    }
    .normal(u, v)
  }
}

/// Torus around the `z` axis; `outer` is the distance from the center to the tube center,
/// `inner` the tube radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Torus {
  pub inner: f32,
  pub outer: f32,
}

impl ParametricSurface for Torus {
  fn point(&self, u: f32, v: f32) -> Point3 {
    let ring = self.outer + self.inner * v.cos();
    [ring * u.cos(), ring * u.sin(), self.inner * v.sin()]
  }

  fn u_domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }

  fn v_domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }
}

/// Open cylinder along `y`, centered on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cylinder {
  pub radius: f32,
  pub height: f32,
}

impl ParametricSurface for Cylinder {
  fn point(&self, u: f32, v: f32) -> Point3 {
    [
      self.radius * u.cos(),
      self.height * (v - 0.5),
      self.radius * u.sin(),
    ]
  }

  fn u_domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }

  fn v_domain(&self) -> (f32, f32) {
    (0., 1.)
  }

  fn normal(&self, u: f32, _: f32) -> Point3 {
    [u.cos(), 0., u.sin()]
  }
}

/// Cone standing on the `y = 0` plane, apex up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cone {
  pub radius: f32,
  pub height: f32,
}

impl ParametricSurface for Cone {
  fn point(&self, u: f32, v: f32) -> Point3 {
    let r = self.radius * (1. - v);
    [r * u.cos(), self.height * v, r * u.sin()]
  }

  fn u_domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }

  fn v_domain(&self) -> (f32, f32) {
    (0., 1.)
  }

  // u turns from x towards z: ∂u × ∂v points towards the axis
  fn normal(&self, u: f32, v: f32) -> Point3 {
    (-estimated_normal(self, u, v)).into()
  }
}

/// `y = height·(x² + z²) / radius²`, cut at `radius`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paraboloid {
  pub radius: f32,
  pub height: f32,
}

impl ParametricSurface for Paraboloid {
  fn point(&self, u: f32, v: f32) -> Point3 {
    let r = self.radius * v;
    [r * u.cos(), self.height * v * v, r * u.sin()]
  }

  fn u_domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }

  fn v_domain(&self) -> (f32, f32) {
    (0., 1.)
  }

  // u turns from x towards z: ∂u × ∂v points towards the axis
  fn normal(&self, u: f32, v: f32) -> Point3 {
    (-estimated_normal(self, u, v)).into()
  }
}

/// A tube of radius `tube` wound around the `y` axis, rising `pitch` per turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HelicalPipe {
  pub radius: f32,
  pub tube: f32,
  pub pitch: f32,
  pub turns: f32,
}

impl ParametricSurface for HelicalPipe {
  fn point(&self, u: f32, v: f32) -> Point3 {
    let ring = self.radius + self.tube * v.cos();
    [
      ring * u.cos(),
      self.pitch * u / (2. * PI) + self.tube * v.sin(),
      ring * u.sin(),
    ]
  }

  fn u_domain(&self) -> (f32, f32) {
    (0., 2. * PI * self.turns)
  }

  fn v_domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }

  // u turns from x towards z: ∂u × ∂v points towards the axis
  fn normal(&self, u: f32, v: f32) -> Point3 {
    (-estimated_normal(self, u, v)).into()
  }
}

/// Sweep of a `(radius, height)` profile around the `y` axis.
///
/// `v` walks the profile polyline, each segment taking an equal share of `[0; 1]`. Normals point
/// outside when the profile runs clockwise in the `(radius, height)` plane, like the table's.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceOfRevolution {
  profile: Vec<[f32; 2]>,
}

impl SurfaceOfRevolution {
  /// Returns [`None`] if the profile has less than two points.
  pub fn new(profile: Vec<[f32; 2]>) -> Option<Self> {
    if profile.len() < 2 {
      None
    } else {
      Some(SurfaceOfRevolution { profile })
    }
  }

  /// A pedestal table: round top, thin column, wide foot.
  pub fn table() -> Self {
    SurfaceOfRevolution {
      profile: vec![
        [0., 1.],
        [1., 1.],
        [1., 0.92],
        [0.12, 0.92],
        [0.12, 0.12],
        [0.6, 0.06],
        [0.6, 0.],
        [0., 0.],
      ],
    }
  }

  /// Number of segments of the profile; tessellating with as many stacks follows it exactly.
  pub fn segments(&self) -> u32 {
    self.profile.len() as u32 - 1
  }

  fn profile_at(&self, v: f32) -> [f32; 2] {
    let last = self.profile.len() - 1;
    let s = v.clamp(0., 1.) * last as f32;
    let k = (s.floor() as usize).min(last - 1);
    let f = s - k as f32;
    let [r0, h0] = self.profile[k];
    let [r1, h1] = self.profile[k + 1];

    [r0 + (r1 - r0) * f, h0 + (h1 - h0) * f]
  }
}

impl ParametricSurface for SurfaceOfRevolution {
  fn point(&self, u: f32, v: f32) -> Point3 {
    let [r, h] = self.profile_at(v);
    [r * u.cos(), h, r * u.sin()]
  }

  fn u_domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }

  fn v_domain(&self) -> (f32, f32) {
    (0., 1.)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geometry::{approx_eq, approx_eq3};
  use cgmath::InnerSpace as _;

  fn length(p: Point3) -> f32 {
    Vector3::from(p).magnitude()
  }

  fn dot(a: Point3, b: Point3) -> f32 {
    Vector3::from(a).dot(Vector3::from(b))
  }

  #[test]
  fn grid_sizes() {
    let mesh = tessellate(&Sphere { radius: 1. }, 8, 4);

    assert_eq!(mesh.resolution(), (8, 4));
    assert_eq!(mesh.vertex_count(), 9 * 5);
    assert_eq!(mesh.normals.len(), mesh.positions.len());
    assert_eq!(mesh.triangle_count(), 64);
    // 4 strips of 18 indices and 3 restart markers
    assert_eq!(mesh.strip_indices.len(), 4 * 18 + 3);
    // horizontal edges: 5 rows × 8, vertical edges: 9 columns × 4
    assert_eq!(mesh.wire_indices.len(), 2 * (5 * 8 + 9 * 4));
  }

  #[test]
  fn strips_reference_valid_vertices() {
    let mesh = tessellate(&Torus { inner: 1., outer: 3. }, 5, 3);
    let n = mesh.vertex_count() as u32;

    assert!(mesh
      .strip_indices
      .iter()
      .all(|&i| i == RESTART_INDEX || i < n));
    assert!(mesh.wire_indices.iter().all(|&i| i < n));
    assert_eq!(mesh.strip_indices.iter().filter(|&&i| i == RESTART_INDEX).count(), 2);
    assert_eq!(&mesh.strip_indices[..4], &[6, 0, 7, 1]);
  }

  #[test]
  fn resolution_is_at_least_one() {
    let mesh = tessellate(&Sphere { radius: 1. }, 0, 0);
    assert_eq!(mesh.resolution(), (1, 1));
    assert_eq!(mesh.vertex_count(), 4);
  }

  #[test]
  fn sphere_points_at_radius() {
    let s = Sphere { radius: 2.5 };
    let mesh = tessellate(&s, 12, 6);

    for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
      assert!(approx_eq(length(*p), 2.5));
      assert!(approx_eq(length(*n), 1.));
    }
  }

  #[test]
  fn hemisphere_stays_above_ground() {
    let mesh = tessellate(&Hemisphere { radius: 1. }, 10, 5);
    assert!(mesh.positions.iter().all(|p| p[1] >= -1e-6));
    assert!(approx_eq3(*mesh.positions.last().unwrap(), [0., 1., 0.]));
  }

  #[test]
  fn torus_tube_distance() {
    let t = Torus {
      inner: 0.5,
      outer: 2.,
    };

    for &(u, v) in &[(0., 0.), (1., 2.), (4., 5.5)] {
      let [x, y, z] = t.point(u, v);
      let ring = (x * x + y * y).sqrt() - 2.;
      assert!(approx_eq((ring * ring + z * z).sqrt(), 0.5));
    }
  }

  #[test]
  fn estimated_normals_are_perpendicular() {
    let t = Torus {
      inner: 0.5,
      outer: 2.,
    };
    let (u, v) = (0.8, 1.3);
    let n = t.normal(u, v);
    let h = 1e-2;
    let du = Vector3::from(t.point(u + h, v)) - Vector3::from(t.point(u - h, v));
    let dv = Vector3::from(t.point(u, v + h)) - Vector3::from(t.point(u, v - h));

    assert!(approx_eq(length(n), 1.));
    assert!(dot(n, du.into()).abs() < 1e-3);
    assert!(dot(n, dv.into()).abs() < 1e-3);
  }

  // direction from the y axis to the point, in the xz plane
  fn radial(p: Point3) -> Point3 {
    [p[0], 0., p[2]]
  }

  #[test]
  fn normals_point_away_from_the_axis() {
    let cone = Cone {
      radius: 1.,
      height: 2.,
    };
    let paraboloid = Paraboloid {
      radius: 2.,
      height: 1.,
    };
    let table = SurfaceOfRevolution::table();

    for &(u, v) in &[(0., 0.3), (1.2, 0.5), (4., 0.9)] {
      assert!(dot(cone.normal(u, v), radial(cone.point(u, v))) > 0.);
      assert!(dot(paraboloid.normal(u, v), radial(paraboloid.point(u, v))) > 0.);
    }

    // the paraboloid opens upwards: its outside faces down
    assert!(paraboloid.normal(0.5, 0.5)[1] < 0.);
    assert!(cone.normal(0.5, 0.5)[1] > 0.);

    // column of the table, then its top
    assert!(dot(table.normal(2., 0.5), radial(table.point(2., 0.5))) > 0.);
    assert!(table.normal(2., 0.05)[1] > 0.9);
  }

  #[test]
  fn helical_pipe_normals_leave_the_tube() {
    let pipe = HelicalPipe {
      radius: 2.,
      tube: 0.25,
      pitch: 1.5,
      turns: 3.,
    };

    for &(u, v) in &[(0., 0.), (1., 2.), (7., 4.5)] {
      // tube center: the point with the tube radius taken away
      let core = HelicalPipe { tube: 0., ..pipe }.point(u, v);
      let away = Vector3::from(pipe.point(u, v)) - Vector3::from(core);

      assert!(dot(pipe.normal(u, v), away.into()) > 0.);
    }
  }

  #[test]
  fn cone_apex_has_a_normal() {
    let c = Cone {
      radius: 1.,
      height: 2.,
    };
    assert!(approx_eq3(c.point(0.3, 1.), [0., 2., 0.]));

    let n = c.normal(0.3, 1.);
    assert!(approx_eq(length(n), 1.));
    assert!(n[1].abs() > 0.1);
  }

  #[test]
  fn cylinder_and_paraboloid() {
    let c = Cylinder {
      radius: 2.,
      height: 4.,
    };
    assert!(approx_eq3(c.point(0., 0.), [2., -2., 0.]));
    assert!(approx_eq3(c.point(PI, 1.), [-2., 2., 0.]));

    let p = Paraboloid {
      radius: 2.,
      height: 1.,
    };
    let [x, y, z] = p.point(1.1, 0.5);
    assert!(approx_eq(y, (x * x + z * z) / 4.));
    assert!(approx_eq(length(p.normal(0.4, 0.)), 1.));
  }

  #[test]
  fn helical_pipe_rises() {
    let h = HelicalPipe {
      radius: 2.,
      tube: 0.25,
      pitch: 1.5,
      turns: 3.,
    };
    let (_, u1) = h.u_domain();

    assert!(approx_eq3(h.point(0., 0.), [2.25, 0., 0.]));
    assert!(approx_eq(h.point(u1, 0.)[1], 4.5));
    assert!(approx_eq(h.point(2. * PI, PI / 2.)[1], 1.75));
  }

  #[test]
  fn revolution_follows_profile() {
    let table = SurfaceOfRevolution::table();
    let mesh = tessellate(&table, 16, table.segments());

    // every grid row lies on a profile point
    for (j, row) in mesh.positions.chunks(17).enumerate() {
      let [r, h] = table.profile[j];
      for p in row {
        assert!(approx_eq(p[1], h));
        assert!(approx_eq((p[0] * p[0] + p[2] * p[2]).sqrt(), r));
      }
    }

    let s = SurfaceOfRevolution::new(vec![[1., 0.], [1., 2.]]).unwrap();
    assert!(approx_eq3(s.point(0., 0.5), [1., 1., 0.]));
    assert!(SurfaceOfRevolution::new(vec![[1., 0.]]).is_none());
  }
}
