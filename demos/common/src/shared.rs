use cgmath::Matrix4;
use luminance::{Semantics, UniformInterface, Vertex};
use luminance_front::{
  context::GraphicsContext,
  framebuffer::Framebuffer,
  pipeline::{PipelineError, PipelineState},
  pixel::NormRGBA8UI,
  render_state::RenderState,
  shader::{
    types::{Mat44, Vec3},
    Program, Uniform,
  },
  tess::{Mode, Tess},
  texture::{Dim2, MagFilter, MinFilter, Sampler, TexelUpload, Texture, Wrap},
  Backend,
};

use crate::{
  geometry::{Mesh, Point3, RESTART_INDEX},
  PlatformServices, SampleError,
};

/// Clear color of every sample: the textbook draws on white.
pub const BACKGROUND: [f32; 4] = [1., 1., 1., 1.];

pub const LINE_VS: &str = include_str!("line-vs.glsl");
pub const LINE_FS: &str = include_str!("line-fs.glsl");

#[derive(Clone, Copy, Debug, Eq, PartialEq, Semantics)]
pub enum Semantics {
  // reference vertex positions with the co variable in vertex shaders
  #[sem(name = "co", repr = "[f32; 3]", wrapper = "VertexPosition")]
  Position,
  // reference flat (2D) vertex positions with the co2 variable in vertex shaders
  #[sem(name = "co2", repr = "[f32; 2]", wrapper = "VertexPosition2")]
  Position2,
  // reference vertex normals with the nor variable in vertex shaders
  #[sem(name = "nor", repr = "[f32; 3]", wrapper = "VertexNormal")]
  Normal,
  // reference texture coordinates with the uv variable in vertex shaders
  #[sem(name = "uv", repr = "[f32; 2]", wrapper = "VertexTexCoord")]
  TexCoord,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Vertex)]
#[vertex(sem = "Semantics")]
pub struct LineVertex {
  pub pos: VertexPosition,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Vertex)]
#[vertex(sem = "Semantics")]
pub struct MeshVertex {
  pub pos: VertexPosition,
  pub nor: VertexNormal,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Vertex)]
#[vertex(sem = "Semantics")]
pub struct TexVertex {
  pub pos: VertexPosition2,
  pub uv: VertexTexCoord,
}

/// Shader interface of the line program, shared by every sample drawing curves.
#[derive(Debug, UniformInterface)]
pub struct LineShaderInterface {
  #[uniform(unbound)]
  pub projection: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  pub view: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  pub color: Uniform<Vec3<f32>>,
}

pub type LineProgram = Program<Semantics, (), LineShaderInterface>;

pub fn new_line_program(
  context: &mut impl GraphicsContext<Backend = Backend>,
) -> Result<LineProgram, SampleError> {
  let program = context
    .new_shader_program::<Semantics, (), LineShaderInterface>()
    .from_strings(LINE_VS, None, None, LINE_FS)?
    .ignore_warnings();

  Ok(program)
}

/// Upload a list of points to be drawn with `mode` (a strip, a fan, points…).
pub fn new_polyline(
  context: &mut impl GraphicsContext<Backend = Backend>,
  points: &[Point3],
  mode: Mode,
) -> Result<Tess<LineVertex>, SampleError> {
  let vertices: Vec<_> = points
    .iter()
    .map(|&p| LineVertex::new(VertexPosition::new(p)))
    .collect();

  let tess = context
    .new_tess()
    .set_vertices(vertices)
    .set_mode(mode)
    .build()?;

  Ok(tess)
}

fn mesh_vertices(mesh: &Mesh) -> Vec<MeshVertex> {
  mesh
    .positions
    .iter()
    .zip(&mesh.normals)
    .map(|(&p, &n)| MeshVertex::new(VertexPosition::new(p), VertexNormal::new(n)))
    .collect()
}

/// Upload a tessellated surface, either as shaded triangle strips or as a wireframe.
pub fn new_mesh_tess(
  context: &mut impl GraphicsContext<Backend = Backend>,
  mesh: &Mesh,
  wireframe: bool,
) -> Result<Tess<MeshVertex, u32>, SampleError> {
  let builder = context.new_tess().set_vertices(mesh_vertices(mesh));

  let tess = if wireframe {
    builder
      .set_indices(mesh.wire_indices.clone())
      .set_mode(Mode::Line)
      .build()?
  } else {
    builder
      .set_indices(mesh.strip_indices.clone())
      .set_mode(Mode::TriangleStrip)
      .set_primitive_restart_index(RESTART_INDEX)
      .build()?
  };

  Ok(tess)
}

/// Draw colored polylines with the line program.
pub fn draw_lines(
  context: &mut impl GraphicsContext<Backend = Backend>,
  back_buffer: &Framebuffer<Dim2, (), ()>,
  program: &mut LineProgram,
  projection: Matrix4<f32>,
  view: Matrix4<f32>,
  lines: &[(&Tess<LineVertex>, [f32; 3])],
) -> Result<(), PipelineError> {
  let projection = Mat44::new(projection);
  let view = Mat44::new(view);
  let render_st = RenderState::default();

  context
    .new_pipeline_gate()
    .pipeline(
      back_buffer,
      &PipelineState::default().set_clear_color(BACKGROUND),
      |_, mut shd_gate| {
        shd_gate.shade(program, |mut iface, uni, mut rdr_gate| {
          iface.set(&uni.projection, projection);
          iface.set(&uni.view, view);

          lines.iter().try_for_each(|&(tess, [r, g, b])| {
            iface.set(&uni.color, Vec3::new(r, g, b));
            rdr_gate.render(&render_st, |mut tess_gate| tess_gate.render(tess))
          })
        })
      },
    )
    .assume()
    .into_result()
}

/// RGBA texture.
pub type RGBATexture = Texture<Dim2, NormRGBA8UI>;

/// Fetch a bitmap from the platform and upload it as a repeating texture.
pub fn load_texture(
  context: &mut impl GraphicsContext<Backend = Backend>,
  platform: &mut impl PlatformServices,
  name: &str,
) -> Result<RGBATexture, SampleError> {
  let bmp = platform
    .fetch_texture(name)
    .map_err(|e| SampleError::fetch(name, e))?;

  log::info!("uploading {} ({}×{})", name, bmp.width(), bmp.height());

  let sampler = Sampler {
    wrap_s: Wrap::Repeat,
    wrap_t: Wrap::Repeat,
    min_filter: MinFilter::Linear,
    mag_filter: MagFilter::Linear,
    ..Sampler::default()
  };

  let texture = context.new_texture_raw(
    [bmp.width(), bmp.height()],
    sampler,
    TexelUpload::base_level(bmp.texels(), 0),
  )?;

  Ok(texture)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    bmp::Bitmap,
    geometry::{surface::Sphere, tessellate},
  };

  #[test]
  fn mesh_vertices_pair_positions_and_normals() {
    let mesh = tessellate(&Sphere { radius: 2. }, 6, 4);
    let vertices = mesh_vertices(&mesh);

    assert_eq!(vertices.len(), mesh.vertex_count());
    assert_eq!(vertices[3].pos, VertexPosition::new(mesh.positions[3]));
    assert_eq!(vertices[3].nor, VertexNormal::new(mesh.normals[3]));
  }

  #[test]
  fn restart_index_is_never_a_vertex() {
    let mesh = tessellate(&Sphere { radius: 1. }, 8, 8);
    let restart: u32 = RESTART_INDEX;

    assert_eq!(restart, u32::MAX);
    assert!(mesh.strip_indices.contains(&restart));
    assert!((restart as usize) > mesh_vertices(&mesh).len());
  }

  #[test]
  fn texels_fill_the_base_level() {
    let bmp = Bitmap::from_rgba_image(&image::RgbaImage::new(5, 3));

    // one RGBA8 texel per pixel, no mipmap level after the base one
    assert_eq!(bmp.texels().len(), 4 * 5 * 3);
  }
}
