//! A cubic Bézier curve and its control polygon, the control points being movable.
//!
//! Press <main action> to select the next control point (shown in red).
//! Press the arrow keys to move the selected control point.
//! Press <forward> / <backward> to use more or less line segments.
//! Press <auxiliary action> to show or hide the control polygon.
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
    cross_markers, sample,
    spline::{BezierCurve, SplineError},
    transform::{aspect_ratio, Projection},
    Point3,
  },
  shared::{draw_lines, new_line_program, new_polyline, LineProgram, LineVertex},
  Example, InputAction, LoopFeedback, PlatformServices, SampleError,
};

const CURVE_COLOR: [f32; 3] = [0., 0., 0.];
const POLYGON_COLOR: [f32; 3] = [0.6, 0.6, 0.6];
const MARKER_COLOR: [f32; 3] = [0.1, 0.3, 0.9];
const SELECTED_COLOR: [f32; 3] = [0.9, 0.1, 0.1];

const MARKER_SIZE: f32 = 2.;
const MOVE_STEP: f32 = 2.;
const HALF: f32 = 50.;

const PROJECTION: Projection = Projection::Ortho {
  center: [0., 0.],
  half: HALF,
  near: -1.,
  far: 1.,
};

/// Control points of the curve and which one the arrows move.
#[derive(Clone, Debug, PartialEq)]
struct Editor {
  curve: BezierCurve,
  selected: usize,
}

impl Editor {
  fn new(control: Vec<Point3>) -> Result<Self, SplineError> {
    Ok(Editor {
      curve: BezierCurve::new(control)?,
      selected: 0,
    })
  }

  fn select_next(&mut self) {
    self.selected = (self.selected + 1) % self.curve.control_points().len();
  }

  /// Move the selected point, keeping it in the visible box.
  fn nudge(&mut self, dx: f32, dy: f32) {
    let p = &mut self.curve.control_points_mut()[self.selected];
    p[0] = (p[0] + dx).clamp(-HALF, HALF);
    p[1] = (p[1] + dy).clamp(-HALF, HALF);
  }

  fn selected_point(&self) -> Point3 {
    self.curve.control_points()[self.selected]
  }
}

/// GPU side of the scene, rebuilt whenever the editor changes.
struct Scene {
  curve: Tess<LineVertex>,
  polygon: Tess<LineVertex>,
  markers: Tess<LineVertex>,
  selected: Tess<LineVertex>,
}

impl Scene {
  fn new(
    context: &mut impl GraphicsContext<Backend = Backend>,
    editor: &Editor,
    segments: u32,
  ) -> Result<Self, SampleError> {
    let control = editor.curve.control_points();

    Ok(Scene {
      curve: new_polyline(context, &sample(&editor.curve, segments), Mode::LineStrip)?,
      polygon: new_polyline(context, control, Mode::LineStrip)?,
      markers: new_polyline(context, &cross_markers(control, MARKER_SIZE), Mode::Line)?,
      selected: new_polyline(
        context,
        &cross_markers(&[editor.selected_point()], MARKER_SIZE * 1.5),
        Mode::Line,
      )?,
    })
  }
}

pub struct LocalExample {
  program: LineProgram,
  editor: Editor,
  scene: Scene,
  segments: Count,
  show_polygon: bool,
  aspect_ratio: f32,
}

impl Example for LocalExample {
  fn bootstrap(
    _: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, SampleError> {
    let program = new_line_program(context)?;
    let editor = Editor::new(vec![
      [-40., -30., 0.],
      [-20., 40., 0.],
      [20., -40., 0.],
      [40., 30., 0.],
    ])?;
    let segments = Count::new(32, 1, 500);
    let scene = Scene::new(context, &editor, segments.get())?;

    log::info!("degree {} Bézier curve", editor.curve.degree());

    Ok(LocalExample {
      program,
      editor,
      scene,
      segments,
      show_polygon: true,
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
          self.editor.select_next();
          log::info!("control point #{} selected", self.editor.selected);
          dirty = true;
        }

        InputAction::AuxiliaryToggle => self.show_polygon = !self.show_polygon,

        InputAction::Up => {
          self.editor.nudge(0., MOVE_STEP);
          dirty = true;
        }

        InputAction::Down => {
          self.editor.nudge(0., -MOVE_STEP);
          dirty = true;
        }

        InputAction::Left => {
          self.editor.nudge(-MOVE_STEP, 0.);
          dirty = true;
        }

        InputAction::Right => {
          self.editor.nudge(MOVE_STEP, 0.);
          dirty = true;
        }

        InputAction::Forward => dirty |= self.segments.increment(),

        InputAction::Backward => dirty |= self.segments.decrement(),

        InputAction::Resized { width, height } => {
          self.aspect_ratio = aspect_ratio(width, height);
        }
      }
    }

    if dirty {
      match Scene::new(context, &self.editor, self.segments.get()) {
        Ok(scene) => self.scene = scene,
        Err(e) => {
          log::error!("{}", e);
          return LoopFeedback::Exit;
        }
      }
    }

    let mut lines = vec![(&self.scene.curve, CURVE_COLOR)];
    if self.show_polygon {
      lines.push((&self.scene.polygon, POLYGON_COLOR));
    }
    lines.push((&self.scene.markers, MARKER_COLOR));
    lines.push((&self.scene.selected, SELECTED_COLOR));

    let render = draw_lines(
      context,
      &back_buffer,
      &mut self.program,
      PROJECTION.matrix(self.aspect_ratio),
      Matrix4::one(),
      &lines,
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

  fn editor() -> Editor {
    Editor::new(vec![[0., 0., 0.], [10., 10., 0.], [20., 0., 0.]]).unwrap()
  }

  #[test]
  fn selection_wraps() {
    let mut e = editor();

    e.select_next();
    e.select_next();
    assert_eq!(e.selected_point(), [20., 0., 0.]);

    e.select_next();
    assert_eq!(e.selected, 0);
  }

  #[test]
  fn nudge_moves_only_the_selected_point() {
    let mut e = editor();
    e.select_next();
    e.nudge(-4., 2.);

    assert_eq!(e.curve.control_points(), &[[0., 0., 0.], [6., 12., 0.], [20., 0., 0.]]);
  }

  #[test]
  fn nudge_stays_in_view() {
    let mut e = editor();
    e.nudge(1000., -1000.);

    assert_eq!(e.selected_point(), [HALF, -HALF, 0.]);
  }

  #[test]
  fn curve_follows_control_points() {
    let mut e = editor();
    e.select_next();
    e.nudge(0., 10.);

    // the middle point of a quadratic curve is halfway between the middle control point and the
    // middle of the end points
    let mid = sample(&e.curve, 2)[1];
    assert_eq!(mid, [10., 10., 0.]);
  }

  #[test]
  fn no_control_point() {
    assert_eq!(Editor::new(Vec::new()), Err(SplineError::NoControlPoints));
  }
}
