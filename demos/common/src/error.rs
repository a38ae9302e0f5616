use std::{error::Error, fmt};

use luminance_front::{
  pipeline::PipelineError,
  shader::ProgramError,
  tess::{TessError, TessMapError},
  texture::TextureError,
};

use crate::geometry::spline::SplineError;

/// What can go wrong while bootstrapping or running a sample.
#[derive(Debug)]
pub enum SampleError {
  Program(ProgramError),
  Tess(TessError),
  TessMap(TessMapError),
  Texture(TextureError),
  Pipeline(PipelineError),
  Spline(SplineError),
  /// The platform couldn’t provide a resource the sample asked for.
  Fetch(String),
}

impl SampleError {
  /// Turn any platform fetch error into a [`SampleError`].
  pub fn fetch(name: &str, e: impl fmt::Display) -> Self {
    SampleError::Fetch(format!("{}: {}", name, e))
  }
}

impl fmt::Display for SampleError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      SampleError::Program(ref e) => write!(f, "cannot create shader program: {}", e),
      SampleError::Tess(ref e) => write!(f, "cannot create tessellation: {}", e),
      SampleError::TessMap(ref e) => write!(f, "cannot map tessellation: {}", e),
      SampleError::Texture(ref e) => write!(f, "cannot create texture: {}", e),
      SampleError::Pipeline(ref e) => write!(f, "pipeline error: {}", e),
      SampleError::Spline(ref e) => write!(f, "invalid spline: {}", e),
      SampleError::Fetch(ref e) => write!(f, "cannot fetch resource {}", e),
    }
  }
}

impl Error for SampleError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      SampleError::Program(e) => Some(e),
      SampleError::Tess(e) => Some(e),
      SampleError::TessMap(e) => Some(e),
      SampleError::Texture(e) => Some(e),
      SampleError::Pipeline(e) => Some(e),
      SampleError::Spline(e) => Some(e),
      SampleError::Fetch(_) => None,
    }
  }
}

impl From<ProgramError> for SampleError {
  fn from(e: ProgramError) -> Self {
    SampleError::Program(e)
  }
}

impl From<TessError> for SampleError {
  fn from(e: TessError) -> Self {
    SampleError::Tess(e)
  }
}

impl From<TessMapError> for SampleError {
  fn from(e: TessMapError) -> Self {
    SampleError::TessMap(e)
  }
}

impl From<TextureError> for SampleError {
  fn from(e: TextureError) -> Self {
    SampleError::Texture(e)
  }
}

impl From<PipelineError> for SampleError {
  fn from(e: PipelineError) -> Self {
    SampleError::Pipeline(e)
  }
}

impl From<SplineError> for SampleError {
  fn from(e: SplineError) -> Self {
    SampleError::Spline(e)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fetch_error_mentions_resource() {
    let e = SampleError::fetch("sky.bmp", "not found");
    assert_eq!(e.to_string(), "cannot fetch resource sky.bmp: not found");
    assert!(e.source().is_none());
  }

  #[test]
  fn spline_errors_are_wrapped() {
    let e = SampleError::from(SplineError::DecreasingKnots);
    assert_eq!(e.to_string(), "invalid spline: knots must be non-decreasing");
    assert!(e.source().is_some());
  }
}
