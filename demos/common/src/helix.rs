//! A helix seen in perspective.
//!
//! Press <left> / <right> to turn the helix around its axis.
//! Press <up> / <down> to add or remove a turn.
//! Press <main action> to draw the sampled points only instead of the line strip.
//! Press <auxiliary action> to start or stop spinning.
//! Press <escape> to quit or close the window.

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
    curve::Helix,
    sample,
    transform::{aspect_ratio, Orbit, Projection},
    Point3,
  },
  shared::{draw_lines, new_line_program, new_polyline, LineProgram, LineVertex},
  Example, InputAction, LoopFeedback, PlatformServices, SampleError,
};

const COLOR: [f32; 3] = [0., 0., 0.];
const SEGMENTS_PER_TURN: u32 = 48;
const ROTATION_STEP_DEG: f32 = 5.;
const SPIN_DEG_PER_SEC: f32 = 45.;

const PROJECTION: Projection = Projection::Frustum {
  half: 5.,
  near: 5.,
  far: 200.,
};

fn helix_points(turns: u32) -> Vec<Point3> {
  let helix = Helix {
    radius: 20.,
    pitch: 8.,
    turns: turns as f32,
  };

  // center the helix vertically
  let half_height = helix.pitch * helix.turns * 0.5;
  sample(&helix, SEGMENTS_PER_TURN * turns)
    .into_iter()
    .map(|[x, y, z]| [x, y, z - half_height])
    .collect()
}

/// Primitive the helix is drawn with, and its name in the log.
fn drawing_mode(points_only: bool) -> (Mode, &'static str) {
  if points_only {
    (Mode::Point, "points")
  } else {
    (Mode::LineStrip, "line strip")
  }
}

pub struct LocalExample {
  program: LineProgram,
  helix: Tess<LineVertex>,
  turns: Count,
  points_only: bool,
  spin: bool,
  last_time: Option<f32>,
  orbit: Orbit,
  aspect_ratio: f32,
}

impl Example for LocalExample {
  fn bootstrap(
    _: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, SampleError> {
    let program = new_line_program(context)?;
    let turns = Count::new(5, 1, 20);
    let (mode, _) = drawing_mode(false);
    let helix = new_polyline(context, &helix_points(turns.get()), mode)?;

    // the helix axis is z; tip it so that it stands up
    let orbit = Orbit::new(90.).with_angles(-90., 0., 0.);

    Ok(LocalExample {
      program,
      helix,
      turns,
      points_only: false,
      spin: false,
      last_time: None,
      orbit,
      aspect_ratio: 1.,
    })
  }

  fn render_frame(
    mut self,
    time: f32,
    back_buffer: Framebuffer<Dim2, (), ()>,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> LoopFeedback<Self> {
    let mut mode_changed = false;
    let mut turns_changed = false;

    for action in actions {
      match action {
        InputAction::Quit => return LoopFeedback::Exit,

        InputAction::MainToggle => {
          self.points_only = !self.points_only;
          log::info!("drawing {}", drawing_mode(self.points_only).1);
          mode_changed = true;
        }

        InputAction::AuxiliaryToggle => {
          self.spin = !self.spin;
          log::info!("spinning: {}", self.spin);
        }

        InputAction::Left => self.orbit.y.step(-ROTATION_STEP_DEG),

        InputAction::Right => self.orbit.y.step(ROTATION_STEP_DEG),

        InputAction::Up => turns_changed |= self.turns.increment(),

        InputAction::Down => turns_changed |= self.turns.decrement(),

        InputAction::Resized { width, height } => {
          self.aspect_ratio = aspect_ratio(width, height);
        }

        _ => (),
      }
    }

    if self.spin {
      let dt = time - self.last_time.unwrap_or(time);
      self.orbit.y.step(dt * SPIN_DEG_PER_SEC);
    }
    self.last_time = Some(time);

    if turns_changed {
      log::info!("{} turns", self.turns);
    }

    if mode_changed || turns_changed {
      let (mode, _) = drawing_mode(self.points_only);

      match new_polyline(context, &helix_points(self.turns.get()), mode) {
        Ok(helix) => self.helix = helix,
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
      PROJECTION.matrix(self.aspect_ratio),
      self.orbit.model_view(),
      &[(&self.helix, COLOR)],
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
