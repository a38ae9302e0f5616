//! Tessellated parametric surfaces: quadrics, a torus, a helical pipe, a table built by revolution
//! and a bicubic Bézier patch.
//!
//! Every surface goes through the same viewer, [`SurfaceViewer`]; only the surface and its initial
//! framing change from one sample to the other.
//!
//! Press <up> / <down> to change the number of slices (along `u`).
//! Press <forward> / <backward> to change the number of stacks (along `v`).
//! Press <left> / <right> to turn the surface.
//! Press <main action> to switch between the shaded surface and its wireframe.
//! Press <auxiliary action> to start or stop spinning.
//! Press <escape> to quit or close the window.

use std::marker::PhantomData;

use luminance::UniformInterface;
use luminance_front::{
  context::GraphicsContext,
  framebuffer::Framebuffer,
  pipeline::PipelineState,
  render_state::RenderState,
  shader::{
    types::{Mat44, Vec3},
    Program, Uniform,
  },
  tess::Tess,
  texture::Dim2,
  Backend,
};

use crate::{
  controls::Count,
  geometry::{
    spline::BezierPatch,
    surface::{
      Cone, Cylinder, HelicalPipe, Hemisphere, Paraboloid, Sphere, SurfaceOfRevolution, Torus,
    },
    tessellate,
    transform::{aspect_ratio, Orbit, Projection},
    ParametricSurface,
  },
  shared::{new_mesh_tess, MeshVertex, Semantics, BACKGROUND},
  Example, InputAction, LoopFeedback, PlatformServices, SampleError,
};

const VS: &str = include_str!("mesh-vs.glsl");
const FS: &str = include_str!("mesh-fs.glsl");

const ROTATION_STEP_DEG: f32 = 5.;
const SPIN_DEG_PER_SEC: f32 = 30.;
const MAX_RESOLUTION: u32 = 256;

const PROJECTION: Projection = Projection::Perspective {
  fovy: 60.,
  near: 0.1,
  far: 100.,
};

#[derive(Debug, UniformInterface)]
struct MeshShaderInterface {
  #[uniform(unbound)]
  projection: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  view: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  color: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  shading: Uniform<f32>,
}

/// What a surface sample shows and how it frames it.
pub trait SurfaceSample {
  type Surface: ParametricSurface;

  fn surface() -> Self::Surface;

  /// Initial `(p, q)` grid resolution.
  fn resolution() -> (u32, u32) {
    (24, 12)
  }

  fn orbit() -> Orbit {
    Orbit::new(4.).with_angles(20., 0., 0.)
  }

  fn color() -> [f32; 3] {
    [0.2, 0.4, 0.8]
  }
}

pub struct SurfaceViewer<S>
where
  S: SurfaceSample,
{
  program: Program<Semantics, (), MeshShaderInterface>,
  surface: S::Surface,
  mesh: Tess<MeshVertex, u32>,
  p: Count,
  q: Count,
  wireframe: bool,
  spin: bool,
  last_time: Option<f32>,
  orbit: Orbit,
  aspect_ratio: f32,
  _sample: PhantomData<S>,
}

impl<S> SurfaceViewer<S>
where
  S: SurfaceSample,
{
  fn rebuild(
    &mut self,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<(), SampleError> {
    let mesh = tessellate(&self.surface, self.p.get(), self.q.get());
    log::info!(
      "{}×{} grid, {} triangles{}",
      self.p,
      self.q,
      mesh.triangle_count(),
      if self.wireframe { ", wireframe" } else { "" }
    );

    self.mesh = new_mesh_tess(context, &mesh, self.wireframe)?;
    Ok(())
  }
}

impl<S> Example for SurfaceViewer<S>
where
  S: SurfaceSample,
{
  fn bootstrap(
    _: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, SampleError> {
    let program = context
      .new_shader_program::<Semantics, (), MeshShaderInterface>()
      .from_strings(VS, None, None, FS)?
      .ignore_warnings();

    let surface = S::surface();
    let (p, q) = S::resolution();
    let p = Count::new(p, 3, MAX_RESOLUTION);
    let q = Count::new(q, 1, MAX_RESOLUTION);
    let mesh = new_mesh_tess(context, &tessellate(&surface, p.get(), q.get()), false)?;

    Ok(SurfaceViewer {
      program,
      surface,
      mesh,
      p,
      q,
      wireframe: false,
      spin: false,
      last_time: None,
      orbit: S::orbit(),
      aspect_ratio: 1.,
      _sample: PhantomData,
    })
  }

  fn render_frame(
    mut self,
    time: f32,
    back_buffer: Framebuffer<Dim2, (), ()>,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> LoopFeedback<Self> {
    let mut dirty = false;

    for action in actions {
      match action {
        InputAction::Quit => return LoopFeedback::Exit,

        InputAction::MainToggle => {
          self.wireframe = !self.wireframe;
          dirty = true;
        }

        InputAction::AuxiliaryToggle => {
          self.spin = !self.spin;
          log::info!("spinning: {}", self.spin);
        }

        InputAction::Up => dirty |= self.p.increment(),

        InputAction::Down => dirty |= self.p.decrement(),

        InputAction::Forward => dirty |= self.q.increment(),

        InputAction::Backward => dirty |= self.q.decrement(),

        InputAction::Left => self.orbit.y.step(-ROTATION_STEP_DEG),

        InputAction::Right => self.orbit.y.step(ROTATION_STEP_DEG),

        InputAction::Resized { width, height } => {
          self.aspect_ratio = aspect_ratio(width, height);
        }
      }
    }

    if self.spin {
      let dt = time - self.last_time.unwrap_or(time);
      self.orbit.y.step(dt * SPIN_DEG_PER_SEC);
    }
    self.last_time = Some(time);

    if dirty {
      if let Err(e) = self.rebuild(context) {
        log::error!("{}", e);
        return LoopFeedback::Exit;
      }
    }

    let projection = Mat44::new(PROJECTION.matrix(self.aspect_ratio));
    let view = Mat44::new(self.orbit.model_view());
    let [r, g, b] = S::color();
    let shading = if self.wireframe { 0. } else { 1. };
    let program = &mut self.program;
    let mesh = &self.mesh;
    let render_st = RenderState::default();

    let render = context
      .new_pipeline_gate()
      .pipeline(
        &back_buffer,
        &PipelineState::default().set_clear_color(BACKGROUND),
        |_, mut shd_gate| {
          shd_gate.shade(program, |mut iface, uni, mut rdr_gate| {
            iface.set(&uni.projection, projection);
            iface.set(&uni.view, view);
            iface.set(&uni.color, Vec3::new(r, g, b));
            iface.set(&uni.shading, shading);

            rdr_gate.render(&render_st, |mut tess_gate| tess_gate.render(mesh))
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

pub struct SphereSample;

impl SurfaceSample for SphereSample {
  type Surface = Sphere;

  fn surface() -> Sphere {
    Sphere { radius: 1.5 }
  }
}

pub struct HemisphereSample;

impl SurfaceSample for HemisphereSample {
  type Surface = Hemisphere;

  fn surface() -> Hemisphere {
    Hemisphere { radius: 1.5 }
  }

  fn resolution() -> (u32, u32) {
    (24, 6)
  }

  // looking slightly from below so that the inside shows
  fn orbit() -> Orbit {
    Orbit::new(4.).with_angles(-15., 0., 0.)
  }
}

pub struct TorusSample;

impl SurfaceSample for TorusSample {
  type Surface = Torus;

  fn surface() -> Torus {
    Torus {
      inner: 0.4,
      outer: 1.2,
    }
  }

  fn resolution() -> (u32, u32) {
    (32, 16)
  }

  // the torus lies in the xy plane; tip it towards the viewer
  fn orbit() -> Orbit {
    Orbit::new(4.).with_angles(-60., 0., 0.)
  }

  fn color() -> [f32; 3] {
    [0.8, 0.5, 0.1]
  }
}

pub struct CylinderSample;

impl SurfaceSample for CylinderSample {
  type Surface = Cylinder;

  fn surface() -> Cylinder {
    Cylinder {
      radius: 1.,
      height: 2.,
    }
  }

  fn resolution() -> (u32, u32) {
    (24, 4)
  }
}

pub struct ConeSample;

impl SurfaceSample for ConeSample {
  type Surface = Cone;

  fn surface() -> Cone {
    Cone {
      radius: 1.,
      height: 2.,
    }
  }

  fn resolution() -> (u32, u32) {
    (24, 4)
  }

  fn orbit() -> Orbit {
    Orbit::new(4.5).with_angles(20., 0., 0.)
  }
}

pub struct ParaboloidSample;

impl SurfaceSample for ParaboloidSample {
  type Surface = Paraboloid;

  fn surface() -> Paraboloid {
    Paraboloid {
      radius: 1.2,
      height: 1.5,
    }
  }

  fn color() -> [f32; 3] {
    [0.2, 0.6, 0.3]
  }
}

pub struct HelicalPipeSample;

impl SurfaceSample for HelicalPipeSample {
  type Surface = HelicalPipe;

  fn surface() -> HelicalPipe {
    HelicalPipe {
      radius: 1.,
      tube: 0.2,
      pitch: 0.6,
      turns: 3.,
    }
  }

  fn resolution() -> (u32, u32) {
    (96, 12)
  }

  fn orbit() -> Orbit {
    Orbit::new(5.).with_angles(15., 0., 0.)
  }

  fn color() -> [f32; 3] {
    [0.7, 0.2, 0.2]
  }
}

pub struct TableSample;

impl SurfaceSample for TableSample {
  type Surface = SurfaceOfRevolution;

  fn surface() -> SurfaceOfRevolution {
    SurfaceOfRevolution::table()
  }

  // one stack per profile segment follows the profile exactly
  fn resolution() -> (u32, u32) {
    (32, SurfaceOfRevolution::table().segments())
  }

  fn orbit() -> Orbit {
    Orbit::new(2.5).with_angles(25., 0., 0.)
  }

  fn color() -> [f32; 3] {
    [0.55, 0.35, 0.2]
  }
}

pub struct BezierPatchSample;

impl SurfaceSample for BezierPatchSample {
  type Surface = BezierPatch;

  fn surface() -> BezierPatch {
    BezierPatch::bump()
  }

  fn resolution() -> (u32, u32) {
    (16, 16)
  }

  fn orbit() -> Orbit {
    Orbit::new(5.).with_angles(35., 0., 0.)
  }

  fn color() -> [f32; 3] {
    [0.6, 0.3, 0.7]
  }
}

pub type SphereExample = SurfaceViewer<SphereSample>;
pub type HemisphereExample = SurfaceViewer<HemisphereSample>;
pub type TorusExample = SurfaceViewer<TorusSample>;
pub type CylinderExample = SurfaceViewer<CylinderSample>;
pub type ConeExample = SurfaceViewer<ConeSample>;
pub type ParaboloidExample = SurfaceViewer<ParaboloidSample>;
pub type HelicalPipeExample = SurfaceViewer<HelicalPipeSample>;
pub type TableExample = SurfaceViewer<TableSample>;
pub type BezierPatchExample = SurfaceViewer<BezierPatchSample>;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geometry::RESTART_INDEX;

  fn check_initial_mesh<S: SurfaceSample>() {
    let (p, q) = S::resolution();
    let mesh = tessellate(&S::surface(), p, q);

    assert_eq!(mesh.vertex_count(), (p as usize + 1) * (q as usize + 1));

    for (pos, nor) in mesh.positions.iter().zip(&mesh.normals) {
      assert!(pos.iter().all(|c| c.is_finite()), "{:?}", pos);

      let len = (nor[0] * nor[0] + nor[1] * nor[1] + nor[2] * nor[2]).sqrt();
      assert!((len - 1.).abs() < 1e-3, "normal {:?} at {:?}", nor, pos);
    }

    let vertex_nb = mesh.vertex_count() as u32;
    assert!(mesh
      .strip_indices
      .iter()
      .all(|&i| i == RESTART_INDEX || i < vertex_nb));
  }

  #[test]
  fn initial_meshes_are_well_formed() {
    check_initial_mesh::<SphereSample>();
    check_initial_mesh::<HemisphereSample>();
    check_initial_mesh::<TorusSample>();
    check_initial_mesh::<CylinderSample>();
    check_initial_mesh::<ConeSample>();
    check_initial_mesh::<ParaboloidSample>();
    check_initial_mesh::<HelicalPipeSample>();
    check_initial_mesh::<TableSample>();
    check_initial_mesh::<BezierPatchSample>();
  }

  #[test]
  fn table_follows_its_profile() {
    assert_eq!(TableSample::resolution().1, 7);
  }
}
