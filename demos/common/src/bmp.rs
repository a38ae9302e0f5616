//! Uncompressed 24-bit BMP loading.
//!
//! The loader only understands what the textbook samples ship: bottom-up (or top-down) 24-bit
//! BGR scanlines, each padded with zeroes to the next 4-byte boundary. Pixels are expanded to
//! RGBA with an opaque alpha, scanlines are kept bottom-up, which is what OpenGL expects when
//! uploading a texture.

use std::{
  error::Error,
  fmt,
  fs::File,
  io::{self, BufReader, Read, Seek, SeekFrom},
  path::Path,
};

const PIXEL_OFFSET_POS: u64 = 10;
const DIMENSIONS_POS: u64 = 18;
const BIT_COUNT_POS: u64 = 28;
const COMPRESSION_POS: u64 = 30;

/// An RGBA image, scanlines stored bottom-up.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bitmap {
  width: u32,
  height: u32,
  data: Vec<u8>,
}

#[derive(Debug)]
pub enum BitmapError {
  Io(io::Error),
  /// The two first bytes are not `BM`.
  NotABitmap([u8; 2]),
  InvalidDimensions { width: i32, height: i32 },
  UnsupportedBitCount(u16),
  UnsupportedCompression(u32),
  /// The file ends before all the scanlines were read.
  Truncated,
}

impl fmt::Display for BitmapError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      BitmapError::Io(ref e) => write!(f, "cannot read bitmap: {}", e),
      BitmapError::NotABitmap(magic) => write!(f, "not a bitmap (magic is {:?})", magic),
      BitmapError::InvalidDimensions { width, height } => {
        write!(f, "invalid bitmap dimensions: {}×{}", width, height)
      }
      BitmapError::UnsupportedBitCount(bits) => {
        write!(f, "unsupported bitmap depth: {} bits per pixel", bits)
      }
      BitmapError::UnsupportedCompression(c) => write!(f, "unsupported bitmap compression: {}", c),
      BitmapError::Truncated => f.write_str("truncated bitmap"),
    }
  }
}

impl Error for BitmapError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      BitmapError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for BitmapError {
  fn from(e: io::Error) -> Self {
    if e.kind() == io::ErrorKind::UnexpectedEof {
      BitmapError::Truncated
    } else {
      BitmapError::Io(e)
    }
  }
}

impl Bitmap {
  /// Open and read a bitmap file.
  pub fn open(path: impl AsRef<Path>) -> Result<Self, BitmapError> {
    let path = path.as_ref();
    log::debug!("loading bitmap {}", path.display());
    Self::read(BufReader::new(File::open(path)?))
  }

  /// Read a bitmap from any seekable source.
  pub fn read<R>(mut reader: R) -> Result<Self, BitmapError>
  where
    R: Read + Seek,
  {
    let mut magic = [0; 2];
    reader.seek(SeekFrom::Start(0))?;
    reader.read_exact(&mut magic)?;

    if &magic != b"BM" {
      return Err(BitmapError::NotABitmap(magic));
    }

    let offset = read_u32_at(&mut reader, PIXEL_OFFSET_POS)?;
    let width = read_u32_at(&mut reader, DIMENSIONS_POS)? as i32;
    let height = read_u32_at(&mut reader, DIMENSIONS_POS + 4)? as i32;
    let bit_count = read_u16_at(&mut reader, BIT_COUNT_POS)?;
    let compression = read_u32_at(&mut reader, COMPRESSION_POS)?;

    if width <= 0 || height == 0 {
      return Err(BitmapError::InvalidDimensions { width, height });
    }

    if bit_count != 24 {
      return Err(BitmapError::UnsupportedBitCount(bit_count));
    }

    if compression != 0 {
      return Err(BitmapError::UnsupportedCompression(compression));
    }

    // a negative height is a top-down bitmap
    let top_down = height < 0;
    let width = width as u32;
    let height = height.unsigned_abs();

    // the header is not trusted: the scanlines it announces must be in the stream before anything
    // gets allocated
    let row_len = 3 * u64::from(width);
    let padding = scanline_padding(width);
    let pixels_end = (row_len + padding as u64)
      .checked_mul(u64::from(height) - 1)
      .and_then(|len| len.checked_add(row_len))
      .and_then(|len| len.checked_add(u64::from(offset)))
      .ok_or(BitmapError::Truncated)?;

    if pixels_end > reader.seek(SeekFrom::End(0))? {
      return Err(BitmapError::Truncated);
    }

    let row_len = usize::try_from(row_len).map_err(|_| BitmapError::Truncated)?;
    let data_len = (width as usize)
      .checked_mul(height as usize)
      .and_then(|len| len.checked_mul(4))
      .ok_or(BitmapError::Truncated)?;
    let mut row = vec![0; row_len];
    let mut data = Vec::with_capacity(data_len);

    reader.seek(SeekFrom::Start(u64::from(offset)))?;

    for _ in 0..height {
      reader.read_exact(&mut row)?;

      for bgr in row.chunks_exact(3) {
        data.extend_from_slice(&[bgr[2], bgr[1], bgr[0], 0xFF]);
      }

      reader.seek(SeekFrom::Current(padding as i64))?;
    }

    if top_down {
      data = flip_rows(&data, 4 * width as usize);
    }

    Ok(Bitmap {
      width,
      height,
      data,
    })
  }

  /// Build a bitmap out of an image decoded by the `image` crate.
  pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
    let (width, height) = img.dimensions();
    let data = flip_rows(img.as_raw(), 4 * width as usize);

    Bitmap {
      width,
      height,
      data,
    }
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  /// RGBA texels, bottom scanline first.
  pub fn texels(&self) -> &[u8] {
    &self.data
  }

  /// Pixel at `(x, y)`, `y = 0` being the bottom scanline.
  pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
    if x >= self.width || y >= self.height {
      return None;
    }

    let i = 4 * (y as usize * self.width as usize + x as usize);
    let p = &self.data[i..i + 4];
    Some([p[0], p[1], p[2], p[3]])
  }

  /// Convert to a top-down `image` buffer.
  pub fn to_rgba_image(&self) -> image::RgbaImage {
    let h = self.height;
    image::RgbaImage::from_fn(self.width, h, |x, y| {
      image::Rgba(self.pixel(x, h - 1 - y).unwrap_or([0; 4]))
    })
  }
}

/// Number of zero bytes ending a 24-bit scanline of `width` pixels.
pub fn scanline_padding(width: u32) -> usize {
  (4 - (3 * width as usize) % 4) % 4
}

fn flip_rows(data: &[u8], row_len: usize) -> Vec<u8> {
  data.chunks_exact(row_len).rev().flatten().copied().collect()
}

fn read_u32_at<R>(reader: &mut R, pos: u64) -> io::Result<u32>
where
  R: Read + Seek,
{
  let mut buf = [0; 4];
  reader.seek(SeekFrom::Start(pos))?;
  reader.read_exact(&mut buf)?;
  Ok(u32::from_le_bytes(buf))
}

fn read_u16_at<R>(reader: &mut R, pos: u64) -> io::Result<u16>
where
  R: Read + Seek,
{
  let mut buf = [0; 2];
  reader.seek(SeekFrom::Start(pos))?;
  reader.read_exact(&mut buf)?;
  Ok(u16::from_le_bytes(buf))
}
