//! Platform services implementation.

use image::ImageError;
use std::{
  collections::HashMap,
  error::Error,
  fmt,
  path::{Path, PathBuf},
};
use textbook_samples::{
  bmp::{Bitmap, BitmapError},
  Features, PlatformServices,
};

/// Desktop implementation of the [`PlatformServices`] API.
///
/// Every texture a sample asks for in its [`Features`] is loaded up front, from the texture root
/// directory.
#[derive(Debug)]
pub struct DesktopPlatformServices {
  textures: HashMap<String, Bitmap>,
}

impl DesktopPlatformServices {
  pub fn new(texture_root: &Path, features: &Features) -> Result<Self, DesktopFetchError> {
    let textures = features
      .textures()
      .iter()
      .map(|name| {
        let texture = load_bitmap(&texture_root.join(name))?;
        Ok((name.clone(), texture))
      })
      .collect::<Result<_, DesktopFetchError>>()?;

    Ok(Self { textures })
  }
}

/// Load a bitmap; `.bmp` files are read directly, anything else is decoded with `image`.
fn load_bitmap(path: &Path) -> Result<Bitmap, DesktopFetchError> {
  let is_bmp = path
    .extension()
    .map_or(false, |ext| ext.eq_ignore_ascii_case("bmp"));

  let bitmap = if is_bmp {
    Bitmap::open(path).map_err(|e| DesktopFetchError::Bitmap(path.to_owned(), e))?
  } else {
    let img = image::open(path).map_err(|e| DesktopFetchError::Image(path.to_owned(), e))?;
    Bitmap::from_rgba_image(&img.to_rgba8())
  };

  log::info!(
    "loaded {} ({}×{})",
    path.display(),
    bitmap.width(),
    bitmap.height()
  );

  Ok(bitmap)
}

#[derive(Debug)]
pub enum DesktopFetchError {
  UnknownTexture(String),
  Bitmap(PathBuf, BitmapError),
  Image(PathBuf, ImageError),
}

impl fmt::Display for DesktopFetchError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      DesktopFetchError::UnknownTexture(ref name) => write!(f, "unknown texture to load: {}", name),
      DesktopFetchError::Bitmap(ref path, ref e) => write!(f, "{}: {}", path.display(), e),
      DesktopFetchError::Image(ref path, ref e) => {
        write!(f, "cannot load {}: {}", path.display(), e)
      }
    }
  }
}

impl Error for DesktopFetchError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      DesktopFetchError::UnknownTexture(_) => None,
      DesktopFetchError::Bitmap(_, e) => Some(e),
      DesktopFetchError::Image(_, e) => Some(e),
    }
  }
}

impl PlatformServices for DesktopPlatformServices {
  type FetchError = DesktopFetchError;

  fn fetch_texture(&mut self, name: impl AsRef<str>) -> Result<&Bitmap, Self::FetchError> {
    let name = name.as_ref();
    self
      .textures
      .get(name)
      .ok_or_else(|| DesktopFetchError::UnknownTexture(name.to_owned()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
      "textbook-samples-{}-{}",
      name,
      std::process::id()
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[test]
  fn no_texture_required() {
    let mut services = DesktopPlatformServices::new(Path::new("."), &Features::none()).unwrap();

    match services.fetch_texture("launch.bmp") {
      Err(DesktopFetchError::UnknownTexture(name)) => assert_eq!(name, "launch.bmp"),
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn loads_bmp_and_other_formats() {
    let dir = temp_dir("load");
    let img = image::RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8 * 80, y as u8 * 200, 7]));
    img.save(dir.join("grad.bmp")).unwrap();
    img.save(dir.join("grad.png")).unwrap();

    let features = Features::none().texture("grad.bmp").texture("grad.png");
    let mut services = DesktopPlatformServices::new(&dir, &features).unwrap();

    let from_bmp = services.fetch_texture("grad.bmp").unwrap().clone();
    let from_png = services.fetch_texture("grad.png").unwrap().clone();
    assert_eq!(from_bmp, from_png);

    // bottom-left pixel is the last row of the image
    assert_eq!(from_bmp.pixel(0, 0), Some([0, 200, 7, 255]));

    fs::remove_dir_all(&dir).unwrap();
  }

  #[test]
  fn missing_file() {
    let dir = temp_dir("missing");
    let features = Features::none().texture("nope.bmp");

    match DesktopPlatformServices::new(&dir, &features) {
      Err(DesktopFetchError::Bitmap(path, BitmapError::Io(_))) => {
        assert!(path.ends_with("nope.bmp"))
      }
      other => panic!("unexpected result: {:?}", other),
    }

    fs::remove_dir_all(&dir).unwrap();
  }
}
