//! Plane curves drawn from their parametric equations: a parabola, an astroid, an ellipse, a
//! Lissajous figure and a cycloid.
//!
//! Press <main action> to go to the next curve.
//! Press <up> / <down> to use more or less line segments.
//! Press <escape> to quit or close the window.

use std::f32::consts::FRAC_PI_2;

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
    curve::{Astroid, Cycloid, Ellipse, Lissajous, Parabola},
    sample,
    transform::{aspect_ratio, Projection},
    Point3,
  },
  shared::{draw_lines, new_line_program, new_polyline, LineProgram, LineVertex},
  Example, InputAction, LoopFeedback, PlatformServices, SampleError,
};

const COLOR: [f32; 3] = [0., 0., 0.];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CurveKind {
  Parabola,
  Astroid,
  Ellipse,
  Lissajous,
  Cycloid,
}

impl CurveKind {
  const ALL: [CurveKind; 5] = [
    CurveKind::Parabola,
    CurveKind::Astroid,
    CurveKind::Ellipse,
    CurveKind::Lissajous,
    CurveKind::Cycloid,
  ];

  fn points(self, segments: u32) -> Vec<Point3> {
    match self {
      CurveKind::Parabola => sample(
        &Parabola {
          a: 0.04,
          half_width: 50.,
        },
        segments,
      ),
      CurveKind::Astroid => sample(&Astroid { r: 45. }, segments),
      CurveKind::Ellipse => sample(&Ellipse { a: 45., b: 25. }, segments),
      CurveKind::Lissajous => sample(
        &Lissajous {
          a: 45.,
          b: 45.,
          kx: 3.,
          ky: 2.,
          phase: FRAC_PI_2,
        },
        segments,
      ),
      CurveKind::Cycloid => sample(&Cycloid { r: 7., arches: 2. }, segments),
    }
  }

  // every curve fits a 100×100 box; only its position changes
  fn projection(self) -> Projection {
    let center = match self {
      CurveKind::Parabola => [0., 50.],
      CurveKind::Cycloid => [44., 7.],
      _ => [0., 0.],
    };

    Projection::Ortho {
      center,
      half: 50.,
      near: -1.,
      far: 1.,
    }
  }
}

pub struct LocalExample {
  program: LineProgram,
  curve: Tess<LineVertex>,
  kind: Cycle<CurveKind>,
  segments: Count,
  aspect_ratio: f32,
}

impl Example for LocalExample {
  fn bootstrap(
    _: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, SampleError> {
    let program = new_line_program(context)?;
    let [first, rest @ ..] = CurveKind::ALL;
    let kind = Cycle::new(first, rest);
    let segments = Count::new(60, 1, 1000);
    let curve = new_polyline(
      context,
      &kind.current().points(segments.get()),
      Mode::LineStrip,
    )?;

    Ok(LocalExample {
      program,
      curve,
      kind,
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
          self.kind.next();
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

    let kind = *self.kind.current();

    if dirty {
      log::info!("{:?} with {} segments", kind, self.segments);

      match new_polyline(context, &kind.points(self.segments.get()), Mode::LineStrip) {
        Ok(curve) => self.curve = curve,
        Err(e) => {
          log::error!("{}", e);
          return LoopFeedback::Exit;
        }
      }
    }

    let render = draw_lines(
      context,
      &back_buffer,
      &mut self.program,
      kind.projection().matrix(self.aspect_ratio),
      Matrix4::one(),
      &[(&self.curve, COLOR)],
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
