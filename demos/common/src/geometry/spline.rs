//! Bézier curves and patches, B-splines.

use cgmath::{Vector3, VectorSpace as _, Zero as _};
use std::{error::Error, fmt};

use super::{curve::ParametricCurve, surface::ParametricSurface, Point3};

#[derive(Clone, Debug, PartialEq)]
pub enum SplineError {
  NoControlPoints,
  /// The order is zero or higher than the number of control points.
  InvalidOrder { order: usize, control_points: usize },
  /// A B-spline needs exactly `control points + order` knots.
  KnotCount { expected: usize, got: usize },
  DecreasingKnots,
  /// The knots leave no room to evaluate the curve.
  EmptyDomain,
  /// Rows of a patch control net don’t have the same length.
  RaggedPatch,
}

impl fmt::Display for SplineError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      SplineError::NoControlPoints => f.write_str("no control points"),
      SplineError::InvalidOrder {
        order,
        control_points,
      } => write!(
        f,
        "invalid order {} for {} control points",
        order, control_points
      ),
      SplineError::KnotCount { expected, got } => {
        write!(f, "expected {} knots, got {}", expected, got)
      }
      SplineError::DecreasingKnots => f.write_str("knots must be non-decreasing"),
      SplineError::EmptyDomain => f.write_str("knots define an empty domain"),
      SplineError::RaggedPatch => f.write_str("patch control net is not rectangular"),
    }
  }
}

impl Error for SplineError {}

/// Evaluate the Bézier curve of `control` at `t`, using de Casteljau’s algorithm.
///
/// Returns [`None`] if there’s no control point.
pub fn bezier_point(control: &[Point3], t: f32) -> Option<Point3> {
  let mut points: Vec<Vector3<f32>> = control.iter().map(|&p| p.into()).collect();

  for n in (1..points.len()).rev() {
    for i in 0..n {
      points[i] = points[i].lerp(points[i + 1], t);
    }
  }

  points.first().map(|&p| p.into())
}

/// Bézier curve over `[0; 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct BezierCurve {
  control: Vec<Point3>,
}

impl BezierCurve {
  pub fn new(control: Vec<Point3>) -> Result<Self, SplineError> {
    if control.is_empty() {
      Err(SplineError::NoControlPoints)
    } else {
      Ok(BezierCurve { control })
    }
  }

  pub fn control_points(&self) -> &[Point3] {
    &self.control
  }

  /// Control points can be moved but not added or removed.
  pub fn control_points_mut(&mut self) -> &mut [Point3] {
    &mut self.control
  }

  /// Degree of the curve.
  pub fn degree(&self) -> usize {
    self.control.len() - 1
  }
}

impl ParametricCurve for BezierCurve {
  fn point(&self, t: f32) -> Point3 {
    bezier_point(&self.control, t).unwrap_or_default()
  }

  fn domain(&self) -> (f32, f32) {
    (0., 1.)
  }
}

/// Tensor-product Bézier patch over `[0; 1]²`.
///
/// The control net is given row by row; `u` runs along rows, `v` across them.
#[derive(Clone, Debug, PartialEq)]
pub struct BezierPatch {
  net: Vec<Vec<Point3>>,
}

impl BezierPatch {
  pub fn new(net: Vec<Vec<Point3>>) -> Result<Self, SplineError> {
    let width = net.first().map(Vec::len).unwrap_or(0);

    if width == 0 {
      return Err(SplineError::NoControlPoints);
    }

    if net.iter().any(|row| row.len() != width) {
      return Err(SplineError::RaggedPatch);
    }

    Ok(BezierPatch { net })
  }

  /// A bicubic patch with a bump in the middle and a dip at one corner.
  pub fn bump() -> Self {
    let heights = [
      [0., 0., 0., 0.],
      [0., 1.5, 1.5, 0.],
      [0., 1.5, 1.5, -0.5],
      [0., 0., -0.5, -1.],
    ];
    let net = heights
      .iter()
      .enumerate()
      .map(|(j, row)| {
        row
          .iter()
          .enumerate()
          .map(|(i, &h)| [i as f32 - 1.5, h, j as f32 - 1.5])
          .collect()
      })
      .collect();

    BezierPatch { net }
  }
}

impl ParametricSurface for BezierPatch {
  fn point(&self, u: f32, v: f32) -> Point3 {
    let column: Vec<Point3> = self
      .net
      .iter()
      .filter_map(|row| bezier_point(row, u))
      .collect();

    bezier_point(&column, v).unwrap_or_default()
  }

  fn u_domain(&self) -> (f32, f32) {
    (0., 1.)
  }

  fn v_domain(&self) -> (f32, f32) {
    (0., 1.)
  }
}

/// B-spline curve of a given order (degree + 1).
#[derive(Clone, Debug, PartialEq)]
pub struct BSpline {
  control: Vec<Point3>,
  order: usize,
  knots: Vec<f32>,
}

impl BSpline {
  pub fn new(control: Vec<Point3>, order: usize, knots: Vec<f32>) -> Result<Self, SplineError> {
    let n = control.len();

    if n == 0 {
      return Err(SplineError::NoControlPoints);
    }

    if order == 0 || order > n {
      return Err(SplineError::InvalidOrder {
        order,
        control_points: n,
      });
    }

    if knots.len() != n + order {
      return Err(SplineError::KnotCount {
        expected: n + order,
        got: knots.len(),
      });
    }

    if knots.windows(2).any(|w| w[1] < w[0]) {
      return Err(SplineError::DecreasingKnots);
    }

    if knots[order - 1] >= knots[n] {
      return Err(SplineError::EmptyDomain);
    }

    Ok(BSpline {
      control,
      order,
      knots,
    })
  }

  /// B-spline with knots `0, 1, 2, …`; the curve doesn’t reach its first and last control points.
  pub fn uniform(control: Vec<Point3>, order: usize) -> Result<Self, SplineError> {
    let knots = (0..control.len() + order).map(|i| i as f32).collect();
    Self::new(control, order, knots)
  }

  /// Open uniform B-spline: end knots are repeated `order` times so that the curve starts and ends
  /// on the first and last control points.
  pub fn clamped(control: Vec<Point3>, order: usize) -> Result<Self, SplineError> {
    let n = control.len();
    let inner = n.saturating_sub(order);
    let knots = (0..n + order)
      .map(|i| {
        if i < order {
          0.
        } else if i >= n {
          (inner + 1) as f32
        } else {
          (i + 1 - order) as f32
        }
      })
      .collect();

    Self::new(control, order, knots)
  }

  pub fn order(&self) -> usize {
    self.order
  }

  pub fn knots(&self) -> &[f32] {
    &self.knots
  }

  pub fn control_points(&self) -> &[Point3] {
    &self.control
  }

  /// Value of the `i`-th basis function of order `k` at `t`.
  ///
  /// `t` is clamped into the curve domain; the last knot span is closed so that the end of the
  /// domain evaluates like its inside.
  pub fn basis(&self, i: usize, k: usize, t: f32) -> f32 {
    let t = self.clamp(t);
    self.basis_in_span(i, k, t, self.span(t))
  }

  fn clamp(&self, t: f32) -> f32 {
    let (t0, t1) = self.domain();
    t.max(t0).min(t1)
  }

  // last non-empty knot span starting at or before t
  fn span(&self, t: f32) -> usize {
    let k = self.order;
    let n = self.control.len();

    (k - 1..n)
      .rev()
      .find(|&i| self.knots[i] <= t && self.knots[i] < self.knots[i + 1])
      .unwrap_or(k - 1)
  }

  fn basis_in_span(&self, i: usize, k: usize, t: f32, span: usize) -> f32 {
    if k <= 1 {
      return if i == span { 1. } else { 0. };
    }

    if i + k >= self.knots.len() {
      return 0.;
    }

    let u = &self.knots;
    let left_den = u[i + k - 1] - u[i];
    let right_den = u[i + k] - u[i + 1];

    let left = if left_den > 0. {
      (t - u[i]) / left_den * self.basis_in_span(i, k - 1, t, span)
    } else {
      0.
    };

    let right = if right_den > 0. {
      (u[i + k] - t) / right_den * self.basis_in_span(i + 1, k - 1, t, span)
    } else {
      0.
    };

    left + right
  }
}

impl ParametricCurve for BSpline {
  fn point(&self, t: f32) -> Point3 {
    let t = self.clamp(t);
    let span = self.span(t);

    self
      .control
      .iter()
      .enumerate()
      .fold(Vector3::zero(), |acc, (i, &p)| {
        acc + Vector3::from(p) * self.basis_in_span(i, self.order, t, span)
      })
      .into()
  }

  fn domain(&self) -> (f32, f32) {
    (
      self.knots[self.order - 1],
      self.knots[self.control.len()],
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geometry::{approx_eq, approx_eq3, curve::sample};

  fn zigzag() -> Vec<Point3> {
    vec![
      [0., 0., 0.],
      [1., 2., 0.],
      [2., -1., 0.],
      [3., 3., 0.],
      [4., 0., 0.],
      [5., 1., 0.],
    ]
  }

  #[test]
  fn bezier_endpoints_and_midpoint() {
    let c = BezierCurve::new(vec![[0., 0., 0.], [1., 2., 0.], [2., 0., 0.]]).unwrap();

    assert_eq!(c.degree(), 2);
    assert!(approx_eq3(c.point(0.), [0., 0., 0.]));
    assert!(approx_eq3(c.point(1.), [2., 0., 0.]));
    // quadratic: (1-t)²P0 + 2t(1-t)P1 + t²P2
    assert!(approx_eq3(c.point(0.5), [1., 1., 0.]));
  }

  #[test]
  fn bezier_needs_control_points() {
    assert_eq!(bezier_point(&[], 0.5), None);
    assert_eq!(BezierCurve::new(Vec::new()), Err(SplineError::NoControlPoints));
  }

  #[test]
  fn bezier_patch_corners() {
    let patch = BezierPatch::bump();

    assert!(approx_eq3(patch.point(0., 0.), [-1.5, 0., -1.5]));
    assert!(approx_eq3(patch.point(1., 1.), [1.5, -1., 1.5]));
    assert!(patch.point(0.5, 0.5)[1] > 0.5);
  }

  #[test]
  fn bezier_patch_rows_must_match() {
    let err = BezierPatch::new(vec![vec![[0.; 3]; 3], vec![[0.; 3]; 2]]).unwrap_err();
    assert_eq!(err, SplineError::RaggedPatch);
    assert_eq!(
      BezierPatch::new(Vec::new()).unwrap_err(),
      SplineError::NoControlPoints
    );
  }

  #[test]
  fn validation() {
    let pts = zigzag();

    assert_eq!(
      BSpline::uniform(pts.clone(), 0).unwrap_err(),
      SplineError::InvalidOrder {
        order: 0,
        control_points: 6
      }
    );
    assert_eq!(
      BSpline::uniform(pts.clone(), 7).unwrap_err(),
      SplineError::InvalidOrder {
        order: 7,
        control_points: 6
      }
    );
    assert_eq!(
      BSpline::new(pts.clone(), 3, vec![0.; 8]).unwrap_err(),
      SplineError::KnotCount {
        expected: 9,
        got: 8
      }
    );
    assert_eq!(
      BSpline::new(pts.clone(), 3, vec![0., 1., 2., 3., 2., 5., 6., 7., 8.]).unwrap_err(),
      SplineError::DecreasingKnots
    );
    assert_eq!(
      BSpline::new(pts, 3, vec![0., 0., 0., 0., 0., 0., 0., 1., 2.]).unwrap_err(),
      SplineError::EmptyDomain
    );
  }

  #[test]
  fn clamped_knots() {
    let s = BSpline::clamped(zigzag(), 3).unwrap();
    assert_eq!(s.knots(), &[0., 0., 0., 1., 2., 3., 4., 4., 4.]);
    assert_eq!(s.domain(), (0., 4.));
  }

  #[test]
  fn basis_is_a_partition_of_unity() {
    for order in 1..=4 {
      for s in &[
        BSpline::uniform(zigzag(), order).unwrap(),
        BSpline::clamped(zigzag(), order).unwrap(),
      ] {
        let (t0, t1) = s.domain();

        for step in 0..=20 {
          let t = t0 + (t1 - t0) * step as f32 / 20.;
          let sum: f32 = (0..6).map(|i| s.basis(i, order, t)).sum();
          assert!(approx_eq(sum, 1.), "order {} at t = {}: {}", order, t, sum);
        }
      }
    }
  }

  #[test]
  fn clamped_interpolates_ends() {
    let pts = zigzag();

    for order in 1..=4 {
      let s = BSpline::clamped(pts.clone(), order).unwrap();
      let curve = sample(&s, 32);

      assert!(approx_eq3(curve[0], pts[0]));
      assert!(approx_eq3(curve[32], pts[5]));
    }
  }

  #[test]
  fn uniform_cubic_at_knot() {
    let pts = zigzag();
    let s = BSpline::uniform(pts.clone(), 4).unwrap();

    // at the start of the domain, the cubic uniform B-spline is (P0 + 4 P1 + P2) / 6
    let expected = [
      (pts[0][0] + 4. * pts[1][0] + pts[2][0]) / 6.,
      (pts[0][1] + 4. * pts[1][1] + pts[2][1]) / 6.,
      0.,
    ];
    assert!(approx_eq3(s.point(s.domain().0), expected));
  }

  #[test]
  fn order_one_picks_control_points() {
    let pts = zigzag();
    let s = BSpline::uniform(pts.clone(), 1).unwrap();

    assert!(approx_eq3(s.point(2.5), pts[2]));
    assert!(approx_eq3(s.point(6.), pts[5]));
  }

  #[test]
  fn linear_spline_is_polyline() {
    let pts = zigzag();
    let s = BSpline::clamped(pts.clone(), 2).unwrap();

    assert!(approx_eq3(s.point(1.5), [1.5, 0.5, 0.]));
    assert!(approx_eq3(s.point(3.), pts[3]));
  }
}
