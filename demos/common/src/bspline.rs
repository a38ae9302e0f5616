//! A B-spline curve over a fixed control polygon.
//!
//! Red marks show where the curve passes at each knot: the joints between its polynomial pieces.
//!
//! Press <main action> to change the order of the curve (1 to 4).
//! Press <auxiliary action> to switch between uniform and clamped knots.
//! Press <up> / <down> to use more or less line segments.
//! Press <escape> to quit or close the window.

use cgmath::{Matrix4, One as _};
use luminance_front::{
  context::GraphicsContext,
  framebuffer::Framebuffer,
  tess::{Mode, Tess},
  texture::Dim2,
  Backend,
};

use crate::{
  controls::{Count, Cycle},
  geometry::{
    cross_markers, sample,
    spline::{BSpline, SplineError},
    transform::{aspect_ratio, Projection},
    ParametricCurve, Point3,
  },
  shared::{draw_lines, new_line_program, new_polyline, LineProgram, LineVertex},
  Example, InputAction, LoopFeedback, PlatformServices, SampleError,
};

const CURVE_COLOR: [f32; 3] = [0., 0., 0.];
const POLYGON_COLOR: [f32; 3] = [0.6, 0.6, 0.6];
const CONTROL_COLOR: [f32; 3] = [0.1, 0.3, 0.9];
const KNOT_COLOR: [f32; 3] = [0.9, 0.1, 0.1];

const MARKER_SIZE: f32 = 1.5;

const CONTROL_POINTS: [Point3; 7] = [
  [-45., -20., 0.],
  [-35., 25., 0.],
  [-15., 30., 0.],
  [0., -25., 0.],
  [15., -30., 0.],
  [35., 20., 0.],
  [45., -10., 0.],
];

const PROJECTION: Projection = Projection::Ortho {
  center: [0., 0.],
  half: 50.,
  near: -1.,
  far: 1.,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum KnotKind {
  Uniform,
  Clamped,
}

impl KnotKind {
  fn toggle(self) -> Self {
    match self {
      KnotKind::Uniform => KnotKind::Clamped,
      KnotKind::Clamped => KnotKind::Uniform,
    }
  }
}

fn build_spline(order: usize, kind: KnotKind) -> Result<BSpline, SplineError> {
  let control = CONTROL_POINTS.to_vec();

  match kind {
    KnotKind::Uniform => BSpline::uniform(control, order),
    KnotKind::Clamped => BSpline::clamped(control, order),
  }
}

/// Points of the curve at each distinct knot of its domain.
fn knot_points(spline: &BSpline) -> Vec<Point3> {
  let (t0, t1) = spline.domain();
  let mut knots: Vec<f32> = spline
    .knots()
    .iter()
    .copied()
    .filter(|&t| t >= t0 && t <= t1)
    .collect();
  knots.dedup();

  knots.into_iter().map(|t| spline.point(t)).collect()
}

struct Scene {
  curve: Tess<LineVertex>,
  knots: Tess<LineVertex>,
}

impl Scene {
  fn new(
    context: &mut impl GraphicsContext<Backend = Backend>,
    spline: &BSpline,
    segments: u32,
  ) -> Result<Self, SampleError> {
    Ok(Scene {
      curve: new_polyline(context, &sample(spline, segments), Mode::LineStrip)?,
      knots: new_polyline(
        context,
        &cross_markers(&knot_points(spline), MARKER_SIZE),
        Mode::Line,
      )?,
    })
  }
}

pub struct LocalExample {
  program: LineProgram,
  polygon: Tess<LineVertex>,
  controls: Tess<LineVertex>,
  scene: Scene,
  order: Cycle<usize>,
  knot_kind: KnotKind,
  segments: Count,
  aspect_ratio: f32,
}

impl LocalExample {
  fn rebuild(
    &mut self,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<(), SampleError> {
    let spline = build_spline(*self.order.current(), self.knot_kind)?;
    log::info!(
      "order {}, {:?} knots {:?}, {} segments",
      spline.order(),
      self.knot_kind,
      spline.knots(),
      self.segments
    );

    self.scene = Scene::new(context, &spline, self.segments.get())?;
    Ok(())
  }
}

impl Example for LocalExample {
  fn bootstrap(
    _: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, SampleError> {
    let program = new_line_program(context)?;
    let polygon = new_polyline(context, &CONTROL_POINTS, Mode::LineStrip)?;
    let controls = new_polyline(
      context,
      &cross_markers(&CONTROL_POINTS, MARKER_SIZE),
      Mode::Line,
    )?;

    // start with a cubic curve
    let order = Cycle::new(4, 1..=3);
    let knot_kind = KnotKind::Uniform;
    let segments = Count::new(100, 1, 1000);
    let scene = Scene::new(
      context,
      &build_spline(*order.current(), knot_kind)?,
      segments.get(),
    )?;

    Ok(LocalExample {
      program,
      polygon,
      controls,
      scene,
      order,
      knot_kind,
      segments,
      aspect_ratio: 1.,
    })
  }

  fn render_frame(
    mut self,
    _: f32,
    back_buffer: Framebuffer<Dim2, (), ()>,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> LoopFeedback<Self> {
    let mut dirty = false;

    for action in actions {
      match action {
        InputAction::Quit => return LoopFeedback::Exit,

        InputAction::MainToggle => {
          self.order.next();
          dirty = true;
        }

        InputAction::AuxiliaryToggle => {
          self.knot_kind = self.knot_kind.toggle();
          dirty = true;
        }

        InputAction::Up => dirty |= self.segments.increment(),

        InputAction::Down => dirty |= self.segments.decrement(),

        InputAction::Resized { width, height } => {
          self.aspect_ratio = aspect_ratio(width, height);
        }

        _ => (),
      }
    }

    if dirty {
      if let Err(e) = self.rebuild(context) {
        log::error!("{}", e);
        return LoopFeedback::Exit;
      }
    }

    let render = draw_lines(
      context,
      &back_buffer,
      &mut self.program,
      PROJECTION.matrix(self.aspect_ratio),
      Matrix4::one(),
      &[
        (&self.polygon, POLYGON_COLOR),
        (&self.controls, CONTROL_COLOR),
        (&self.scene.curve, CURVE_COLOR),
        (&self.scene.knots, KNOT_COLOR),
      ],
    );

    match render {
      Ok(()) => LoopFeedback::Continue(self),
      Err(e) => {
        log::error!("cannot render frame: {}", e);
        LoopFeedback::Exit
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geometry::approx_eq3;

  #[test]
  fn every_order_builds() {
    for order in 1..=4 {
      for &kind in &[KnotKind::Uniform, KnotKind::Clamped] {
        let spline = build_spline(order, kind).unwrap();
        assert_eq!(spline.knots().len(), CONTROL_POINTS.len() + order);
      }
    }
  }

  #[test]
  fn clamped_curve_reaches_end_points() {
    let spline = build_spline(4, KnotKind::Clamped).unwrap();
    let points = sample(&spline, 50);

    assert!(approx_eq3(points[0], CONTROL_POINTS[0]));
    assert!(approx_eq3(points[50], CONTROL_POINTS[6]));
  }

  #[test]
  fn one_mark_per_distinct_knot() {
    // uniform cubic: knots 0..=10, domain [3; 7]
    let uniform = build_spline(4, KnotKind::Uniform).unwrap();
    assert_eq!(knot_points(&uniform).len(), 5);

    // clamped cubic: 0 0 0 0 1 2 3 4 4 4 4
    let clamped = build_spline(4, KnotKind::Clamped).unwrap();
    assert_eq!(knot_points(&clamped).len(), 5);

    // order 1: knots 0..=7, the whole range
    let steps = build_spline(1, KnotKind::Uniform).unwrap();
    assert_eq!(knot_points(&steps).len(), 8);
  }

  #[test]
  fn knot_kind_toggles() {
    assert_eq!(KnotKind::Uniform.toggle(), KnotKind::Clamped);
    assert_eq!(KnotKind::Clamped.toggle(), KnotKind::Uniform);
  }
}
