//! A square textured with bitmaps loaded by the platform.
//!
//! Texture coordinates go beyond `[0; 1]` when the texture repeats: the sampler wraps them around.
//!
//! Press <main action> to swap the textures.
//! Press <left> / <right> to rotate the square.
//! Press <up> / <down> to repeat the texture more or less times.
//! Press <escape> to quit or close the window.

use cgmath::{Matrix4, One as _};
use luminance::UniformInterface;
use luminance_front::{
  context::GraphicsContext,
  framebuffer::Framebuffer,
  pipeline::{PipelineState, TextureBinding},
  pixel::NormUnsigned,
  render_state::RenderState,
  shader::{types::Mat44, Program, Uniform},
  tess::{Mode, Tess},
  texture::Dim2,
  Backend,
};

use crate::{
  controls::{Angle, Count},
  geometry::transform::{aspect_ratio, rotate_2d, Projection},
  shared::{
    load_texture, RGBATexture, Semantics, TexVertex, VertexPosition2, VertexTexCoord, BACKGROUND,
  },
  Example, Features, InputAction, LoopFeedback, PlatformServices, SampleError,
};

const VS: &str = include_str!("texture-vs.glsl");
const FS: &str = include_str!("texture-fs.glsl");

const TEXTURES: [&str; 2] = ["launch.bmp", "sky.bmp"];
const HALF_SIDE: f32 = 1.;
const ROTATION_STEP_DEG: f32 = 5.;

const PROJECTION: Projection = Projection::Ortho {
  center: [0., 0.],
  half: 1.5,
  near: -1.,
  far: 1.,
};

#[derive(UniformInterface)]
struct ShaderInterface {
  #[uniform(unbound)]
  projection: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  view: Uniform<Mat44<f32>>,
  tex: Uniform<TextureBinding<Dim2, NormUnsigned>>,
}

/// Corners of the square, counter-clockwise, with their texture coordinates.
fn square_corners(angle: Angle, repeat: u32) -> [([f32; 2], [f32; 2]); 4] {
  let r = repeat as f32;
  let h = HALF_SIDE;

  [
    ([-h, -h], [0., 0.]),
    ([h, -h], [r, 0.]),
    ([h, h], [r, r]),
    ([-h, h], [0., r]),
  ]
  .map(|(pos, uv)| (rotate_2d(pos, angle), uv))
}

fn square_vertices(angle: Angle, repeat: u32) -> Vec<TexVertex> {
  square_corners(angle, repeat)
    .iter()
    .map(|&(pos, uv)| TexVertex::new(VertexPosition2::new(pos), VertexTexCoord::new(uv)))
    .collect()
}

pub struct LocalExample {
  program: Program<Semantics, (), ShaderInterface>,
  textures: Vec<RGBATexture>,
  current: usize,
  square: Tess<TexVertex>,
  angle: Angle,
  repeat: Count,
  aspect_ratio: f32,
}

impl LocalExample {
  // the square keeps its four vertices; only their attributes change
  fn update_square(&mut self) -> Result<(), SampleError> {
    let mut vertices = self.square.vertices_mut()?;

    for (v, new) in vertices
      .iter_mut()
      .zip(square_vertices(self.angle, self.repeat.get()))
    {
      *v = new;
    }

    Ok(())
  }
}

impl Example for LocalExample {
  fn features() -> Features {
    TEXTURES
      .iter()
      .fold(Features::none(), |features, name| features.texture(*name))
  }

  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, SampleError> {
    let textures = TEXTURES
      .iter()
      .map(|name| load_texture(context, platform, name))
      .collect::<Result<Vec<_>, _>>()?;

    let program = context
      .new_shader_program::<Semantics, (), ShaderInterface>()
      .from_strings(VS, None, None, FS)?
      .ignore_warnings();

    let angle = Angle::default();
    let repeat = Count::new(1, 1, 8);

    // the TriangleFan connects every vertex after the second one to the first one
    let square = context
      .new_tess()
      .set_vertices(square_vertices(angle, repeat.get()))
      .set_mode(Mode::TriangleFan)
      .build()?;

    Ok(LocalExample {
      program,
      textures,
      current: 0,
      square,
      angle,
      repeat,
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
          self.current = (self.current + 1) % self.textures.len();
          log::info!("showing {}", TEXTURES[self.current]);
        }

        InputAction::Left => {
          self.angle.step(ROTATION_STEP_DEG);
          dirty = true;
        }

        InputAction::Right => {
          self.angle.step(-ROTATION_STEP_DEG);
          dirty = true;
        }

        InputAction::Up => dirty |= self.repeat.increment(),

        InputAction::Down => dirty |= self.repeat.decrement(),

        InputAction::Resized { width, height } => {
          self.aspect_ratio = aspect_ratio(width, height);
        }

        _ => (),
      }
    }

    if dirty {
      log::debug!("angle {}, texture repeated {} times", self.angle, self.repeat);

      if let Err(e) = self.update_square() {
        log::error!("{}", e);
        return LoopFeedback::Exit;
      }
    }

    let projection = Mat44::new(PROJECTION.matrix(self.aspect_ratio));
    let view = Mat44::new(Matrix4::<f32>::one());
    let tex = &mut self.textures[self.current];
    let program = &mut self.program;
    let square = &self.square;
    let render_st = RenderState::default();

    let render = context
      .new_pipeline_gate()
      .pipeline(
        &back_buffer,
        &PipelineState::default().set_clear_color(BACKGROUND),
        |pipeline, mut shd_gate| {
          let bound_tex = pipeline.bind_texture(tex)?;

          shd_gate.shade(program, |mut iface, uni, mut rdr_gate| {
            iface.set(&uni.projection, projection);
            iface.set(&uni.view, view);
            iface.set(&uni.tex, bound_tex.binding());

            rdr_gate.render(&render_st, |mut tess_gate| tess_gate.render(square))
          })
        },
      )
      .assume()
      .into_result();

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
  use crate::geometry::approx_eq;

  #[test]
  fn requires_both_bitmaps() {
    assert_eq!(
      LocalExample::features().textures(),
      &["launch.bmp".to_owned(), "sky.bmp".to_owned()]
    );
  }

  #[test]
  fn texture_coordinates_follow_repeat() {
    let corners = square_corners(Angle::default(), 3);

    assert_eq!(corners[0], ([-1., -1.], [0., 0.]));
    assert_eq!(corners[2], ([1., 1.], [3., 3.]));
  }

  #[test]
  fn rotation_keeps_texture_coordinates() {
    let corners = square_corners(Angle::new(90.), 1);
    let ([x, y], uv) = corners[1];

    // (1, -1) turned a quarter counter-clockwise
    assert!(approx_eq(x, 1.));
    assert!(approx_eq(y, 1.));
    assert_eq!(uv, [1., 0.]);
  }
}
