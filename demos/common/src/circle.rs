//! A circle approximated by a regular polygon.
//!
//! The more vertices, the rounder the circle: press <up> / <down> to add or remove a vertex (a
//! polygon keeps at least three of them).
//! Press <main action> to switch between the outline and a filled disc drawn as a triangle fan.
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
  controls::Count,
  geometry::{
    regular_polygon,
    transform::{aspect_ratio, Projection},
    Point3,
  },
  shared::{draw_lines, new_line_program, new_polyline, LineProgram, LineVertex},
  Example, InputAction, LoopFeedback, PlatformServices, SampleError,
};

const CENTER: [f32; 2] = [50., 50.];
const RADIUS: f32 = 40.;
const COLOR: [f32; 3] = [0., 0., 0.];

// the textbook’s glOrtho(0, 100, 0, 100, -1, 1)
const PROJECTION: Projection = Projection::Ortho {
  center: CENTER,
  half: 50.,
  near: -1.,
  far: 1.,
};

/// Points to draw and how to connect them.
fn circle_points(vertex_nb: u32, filled: bool) -> (Vec<Point3>, Mode) {
  let [cx, cy] = CENTER;
  let mut points = regular_polygon(cx, cy, RADIUS, vertex_nb);

  // close the loop
  if let Some(&first) = points.first() {
    points.push(first);
  }

  if filled {
    points.insert(0, [cx, cy, 0.]);
    (points, Mode::TriangleFan)
  } else {
    (points, Mode::LineStrip)
  }
}

pub struct LocalExample {
  program: LineProgram,
  circle: Tess<LineVertex>,
  vertex_nb: Count,
  filled: bool,
  aspect_ratio: f32,
}

impl LocalExample {
  fn rebuild(
    &mut self,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<(), SampleError> {
    let (points, mode) = circle_points(self.vertex_nb.get(), self.filled);
    self.circle = new_polyline(context, &points, mode)?;
    Ok(())
  }
}

impl Example for LocalExample {
  fn bootstrap(
    _: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, SampleError> {
    let program = new_line_program(context)?;
    let vertex_nb = Count::new(5, 3, 200);
    let filled = false;
    let (points, mode) = circle_points(vertex_nb.get(), filled);
    let circle = new_polyline(context, &points, mode)?;

    Ok(LocalExample {
      program,
      circle,
      vertex_nb,
      filled,
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
          self.filled = !self.filled;
          dirty = true;
        }

        InputAction::Up => dirty |= self.vertex_nb.increment(),

        InputAction::Down => dirty |= self.vertex_nb.decrement(),

        InputAction::Resized { width, height } => {
          self.aspect_ratio = aspect_ratio(width, height);
        }

        _ => (),
      }
    }

    if dirty {
      log::info!(
        "{} vertices, {}",
        self.vertex_nb,
        if self.filled { "filled" } else { "outline" }
      );

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
      &[(&self.circle, COLOR)],
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

  #[test]
  fn outline_is_closed() {
    let (points, mode) = circle_points(3, false);

    assert_eq!(mode, Mode::LineStrip);
    assert_eq!(points.len(), 4);
    assert_eq!(points[0], points[3]);
  }

  #[test]
  fn fan_starts_at_center() {
    let (points, mode) = circle_points(6, true);

    assert_eq!(mode, Mode::TriangleFan);
    assert_eq!(points.len(), 8);
    assert_eq!(points[0], [50., 50., 0.]);
    assert_eq!(points[1], points[7]);
  }
}
