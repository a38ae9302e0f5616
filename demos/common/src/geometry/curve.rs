//! Parametric curves.

use std::f32::consts::PI;

use super::Point3;

/// A curve `t ↦ (x, y, z)` defined over a closed interval.
pub trait ParametricCurve {
  /// Point of the curve at parameter `t`.
  fn point(&self, t: f32) -> Point3;

  /// Interval `t` lives in.
  fn domain(&self) -> (f32, f32);
}

/// Sample `n + 1` evenly spaced points of a curve, both ends of its domain included.
///
/// `n` is clamped to at least one segment.
pub fn sample(curve: &impl ParametricCurve, n: u32) -> Vec<Point3> {
  let n = n.max(1);
  let (t0, t1) = curve.domain();

  (0..=n)
    .map(|i| curve.point(t0 + (t1 - t0) * i as f32 / n as f32))
    .collect()
}

/// Vertices of a regular polygon of `n` sides inscribed in a circle, in the `z = 0` plane.
///
/// The first vertex is at angle 0; vertices go counter-clockwise.
pub fn regular_polygon(cx: f32, cy: f32, r: f32, n: u32) -> Vec<Point3> {
  (0..n)
    .map(|i| {
      let t = 2. * PI * i as f32 / n as f32;
      [cx + r * t.cos(), cy + r * t.sin(), 0.]
    })
    .collect()
}

/// Segments (pairs of points) drawing a small `+` of half-size `size` on each point, in the
/// `z = 0` plane. Used to show control points.
pub fn cross_markers(points: &[Point3], size: f32) -> Vec<Point3> {
  points
    .iter()
    .flat_map(|&[x, y, z]| {
      [
        [x - size, y, z],
        [x + size, y, z],
        [x, y - size, z],
        [x, y + size, z],
      ]
    })
    .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
  pub cx: f32,
  pub cy: f32,
  pub r: f32,
}

impl ParametricCurve for Circle {
  fn point(&self, t: f32) -> Point3 {
    [self.cx + self.r * t.cos(), self.cy + self.r * t.sin(), 0.]
  }

  fn domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }
}

/// `y = a·x²` for `x` in `[-half_width; half_width]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parabola {
  pub a: f32,
  pub half_width: f32,
}

impl ParametricCurve for Parabola {
  fn point(&self, t: f32) -> Point3 {
    [t, self.a * t * t, 0.]
  }

  fn domain(&self) -> (f32, f32) {
    (-self.half_width, self.half_width)
  }
}

/// Helix around the `z` axis, rising `pitch` per turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Helix {
  pub radius: f32,
  pub pitch: f32,
  pub turns: f32,
}

impl ParametricCurve for Helix {
  fn point(&self, t: f32) -> Point3 {
    [
      self.radius * t.cos(),
      self.radius * t.sin(),
      self.pitch * t / (2. * PI),
    ]
  }

  fn domain(&self) -> (f32, f32) {
    (0., 2. * PI * self.turns)
  }
}

/// Hypocycloid with four cusps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Astroid {
  pub r: f32,
}

impl ParametricCurve for Astroid {
  fn point(&self, t: f32) -> Point3 {
    let (s, c) = t.sin_cos();
    [self.r * c * c * c, self.r * s * s * s, 0.]
  }

  fn domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
  pub a: f32,
  pub b: f32,
}

impl ParametricCurve for Ellipse {
  fn point(&self, t: f32) -> Point3 {
    [self.a * t.cos(), self.b * t.sin(), 0.]
  }

  fn domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }
}

/// `(a·sin(kx·t + phase), b·sin(ky·t))`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lissajous {
  pub a: f32,
  pub b: f32,
  pub kx: f32,
  pub ky: f32,
  pub phase: f32,
}

impl ParametricCurve for Lissajous {
  fn point(&self, t: f32) -> Point3 {
    [
      self.a * (self.kx * t + self.phase).sin(),
      self.b * (self.ky * t).sin(),
      0.,
    ]
  }

  fn domain(&self) -> (f32, f32) {
    (0., 2. * PI)
  }
}

/// Curve traced by a point of a circle of radius `r` rolling along the `x` axis, for `arches`
/// full turns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cycloid {
  pub r: f32,
  pub arches: f32,
}

impl ParametricCurve for Cycloid {
  fn point(&self, t: f32) -> Point3 {
    [self.r * (t - t.sin()), self.r * (1. - t.cos()), 0.]
  }

  fn domain(&self) -> (f32, f32) {
    (0., 2. * PI * self.arches)
  }
}
