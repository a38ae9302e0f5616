//! Textbook graphics samples.
//!
//! This crate gathers the small programs accompanying a computer graphics textbook: circles made of
//! polygons, parametric curves, tessellated quadrics, Bézier and B-spline curves, a textured
//! square. Each program is a module exposing a `LocalExample` type implementing [`Example`].
//!
//! # Sample architecture
//!
//! Samples do not depend on any platform-specific concepts, such as system events or window
//! capacities. Whenever a sample requires user interaction, it receives abstract [`InputAction`]s
//! from the platform code running it. Resources a sample needs from the outside world (bitmaps)
//! are declared with [`Features`] and fetched through [`PlatformServices`].
//!
//! The geometry each sample draws is computed by the [`geometry`] module, which doesn’t know about
//! luminance at all; this is where the closed-form formulas live and where they get tested.
//!
//! # Error handling
//!
//! Bootstrapping a sample can fail (shader compilation, texture upload, missing bitmap); those
//! failures are reported as [`SampleError`] and it’s up to the platform to decide what to do with
//! them. Rendering failures stop the sample loop.

pub mod bmp;
pub mod controls;
mod error;
pub mod geometry;
mod shared;

pub mod bezier_curve;
pub mod bspline;
pub mod circle;
pub mod helix;
pub mod plane_curves;
pub mod surfaces;
pub mod textured_square;

pub use error::SampleError;

use bmp::Bitmap;
use luminance_front::{context::GraphicsContext, framebuffer::Framebuffer, texture::Dim2, Backend};

/// Sample interface.
pub trait Example: Sized {
  /// Resources the sample needs from the platform.
  fn features() -> Features {
    Features::none()
  }

  /// Bootstrap the sample.
  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, SampleError>;

  /// Render a frame of the sample.
  fn render_frame(
    self,
    time: f32,
    back_buffer: Framebuffer<Dim2, (), ()>,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> LoopFeedback<Self>;
}

/// A type used to pass “inputs” to samples.
#[derive(Clone, Debug, PartialEq)]
pub enum InputAction {
  /// Quit the application.
  Quit,

  /// Main action. Typically used to switch an effect on and off or to cycle through it.
  MainToggle,

  /// Auxiliary action. Often used to showcase / toggle smaller parts of a bigger effect.
  AuxiliaryToggle,

  /// Up direction. Typically used to increase a count or move something up.
  Up,

  /// Down direction. Typically used to decrease a count or move something down.
  Down,

  /// Left direction. Typically used to rotate or move something left.
  Left,

  /// Right direction. Typically used to rotate or move something right.
  Right,

  /// Forward direction. Used as a second “up” for samples with two counts.
  Forward,

  /// Backward direction. Used as a second “down” for samples with two counts.
  Backward,

  /// Framebuffer size changed.
  Resized { width: u32, height: u32 },
}

/// Whether the loop should carry on with the (possibly updated) sample or stop.
#[derive(Debug)]
pub enum LoopFeedback<T> {
  Continue(T),
  Exit,
}

/// Resources required by a sample, used by platforms to load them before the loop starts.
#[derive(Clone, Debug, Default)]
pub struct Features {
  textures: Vec<String>,
}

impl Features {
  /// No particular resource.
  pub fn none() -> Self {
    Self::default()
  }

  /// Require a texture, by name.
  pub fn texture(mut self, name: impl Into<String>) -> Self {
    self.textures.push(name.into());
    self
  }

  /// Names of the textures to load.
  pub fn textures(&self) -> &[String] {
    &self.textures
  }
}

/// Services a platform provides to samples.
pub trait PlatformServices {
  type FetchError: std::error::Error;

  /// Fetch a bitmap the sample declared in its [`Features`].
  fn fetch_texture(&mut self, name: impl AsRef<str>) -> Result<&Bitmap, Self::FetchError>;
}
