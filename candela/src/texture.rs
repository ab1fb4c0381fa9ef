//! Textures and samplers.
//!
//! Two texture shapes are supported: [`Texture2D`] and [`TextureCube`]. Both are allocated with
//! immutable storage for a [`TextureFormat`] and a [`Sampler`], then filled and read back as raw
//! texel bytes. Dimension and region validation happens here; the driver only ever sees uploads
//! that fit.
//!
//! Textures do not bind themselves. Sampling a texture from a shader goes through the texture
//! unit allocator (see the `texture_units` module), which hands out unit indices for sampler
//! uniforms.

use std::error;
use std::fmt;

use crate::backend::texture::Texture as TextureBackend;
use crate::context::GraphicsContext;
use crate::depth_stencil::Comparison;
use crate::formats::TextureFormat;

/// How a sampler addresses coordinates outside `[0, 1]`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wrap {
  /// Clamp to the edge texel.
  ClampToEdge,

  /// Tile the texture.
  Repeat,

  /// Tile the texture, mirroring every other repetition.
  MirroredRepeat,
}

/// Minification filter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MinFilter {
  /// Nearest texel.
  Nearest,

  /// Linear blend of the four nearest texels.
  Linear,

  /// Nearest texel on the nearest mipmap level.
  NearestMipmapNearest,

  /// Nearest texel, blended between the two nearest mipmap levels.
  NearestMipmapLinear,

  /// Linear blend on the nearest mipmap level.
  LinearMipmapNearest,

  /// Linear blend, blended between the two nearest mipmap levels.
  LinearMipmapLinear,
}

/// Magnification filter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MagFilter {
  /// Nearest texel.
  Nearest,

  /// Linear blend of the four nearest texels.
  Linear,
}

/// Sampling parameters applied to a texture at allocation time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampler {
  /// Addressing along the _s_ axis.
  pub wrap_s: Wrap,

  /// Addressing along the _t_ axis.
  pub wrap_t: Wrap,

  /// Addressing along the _r_ axis.
  pub wrap_r: Wrap,

  /// Minification filter.
  pub min_filter: MinFilter,

  /// Magnification filter.
  pub mag_filter: MagFilter,

  /// When set, sampling a depth texture compares the stored depth against the reference
  /// coordinate with this comparison.
  pub depth_comparison: Option<Comparison>,
}

impl Default for Sampler {
  fn default() -> Self {
    Sampler {
      wrap_s: Wrap::ClampToEdge,
      wrap_t: Wrap::ClampToEdge,
      wrap_r: Wrap::ClampToEdge,
      min_filter: MinFilter::NearestMipmapLinear,
      mag_filter: MagFilter::Linear,
      depth_comparison: None,
    }
  }
}

/// One face of a cubemap.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CubeFace {
  /// Face along positive X.
  PositiveX,

  /// Face along negative X.
  NegativeX,

  /// Face along positive Y.
  PositiveY,

  /// Face along negative Y.
  NegativeY,

  /// Face along positive Z.
  PositiveZ,

  /// Face along negative Z.
  NegativeZ,
}

impl CubeFace {
  /// The six faces, in native layer order.
  pub const ALL: [CubeFace; 6] = [
    CubeFace::PositiveX,
    CubeFace::NegativeX,
    CubeFace::PositiveY,
    CubeFace::NegativeY,
    CubeFace::PositiveZ,
    CubeFace::NegativeZ,
  ];
}

/// Axis-aligned texel region.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Region {
  /// Leftmost texel column.
  pub x: u32,

  /// Bottom texel row.
  pub y: u32,

  /// Width in texels.
  pub width: u32,

  /// Height in texels.
  pub height: u32,
}

impl Region {
  /// Region covering a whole `width` × `height` image.
  pub fn whole(width: u32, height: u32) -> Self {
    Region {
      x: 0,
      y: 0,
      width,
      height,
    }
  }

  /// Number of texels in the region.
  pub fn texel_count(&self) -> usize {
    self.width as usize * self.height as usize
  }
}

impl fmt::Display for Region {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "{}x{} at ({}, {})",
      self.width, self.height, self.x, self.y
    )
  }
}

/// A handle on a 2D texture.
#[derive(Debug)]
pub struct Texture2D<B>
where
  B: ?Sized + TextureBackend,
{
  pub(crate) repr: B::TextureRepr,
  width: u32,
  height: u32,
  format: TextureFormat,
}

impl<B> Texture2D<B>
where
  B: ?Sized + TextureBackend,
{
  /// Allocate storage for a `width` × `height` texture.
  ///
  /// Both dimensions must be at least 2; the backend additionally enforces the device maximum.
  pub fn new<C>(
    ctx: &mut C,
    width: u32,
    height: u32,
    format: TextureFormat,
    sampler: &Sampler,
  ) -> Result<Self, TextureError>
  where
    C: GraphicsContext<Backend = B>,
  {
    if width < 2 || height < 2 {
      return Err(TextureError::TooSmall { width, height });
    }

    let repr = unsafe { ctx.backend().new_texture_2d(width, height, format, sampler)? };

    Ok(Texture2D {
      repr,
      width,
      height,
      format,
    })
  }

  /// Width in texels.
  pub fn width(&self) -> u32 {
    self.width
  }

  /// Height in texels.
  pub fn height(&self) -> u32 {
    self.height
  }

  /// Width and height in texels.
  pub fn size(&self) -> [u32; 2] {
    [self.width, self.height]
  }

  /// Format the storage was allocated with.
  pub fn format(&self) -> TextureFormat {
    self.format
  }

  /// Overwrite a region with raw texels.
  ///
  /// `texels` must hold exactly the region’s byte size in the texture’s format.
  pub fn upload(&mut self, region: Region, texels: &[u8]) -> Result<(), TextureError> {
    check_region(region, self.width, self.height)?;
    check_texel_len(region, self.format, texels.len())?;

    unsafe { B::upload_2d(&mut self.repr, region, texels) }
  }

  /// Overwrite the whole texture with raw texels.
  pub fn upload_whole(&mut self, texels: &[u8]) -> Result<(), TextureError> {
    self.upload(Region::whole(self.width, self.height), texels)
  }

  /// Read the whole texture back as raw texels.
  pub fn read(&self) -> Result<Vec<u8>, TextureError> {
    unsafe { B::read_2d(&self.repr) }
  }
}

impl<B> Drop for Texture2D<B>
where
  B: ?Sized + TextureBackend,
{
  fn drop(&mut self) {
    unsafe { B::destroy_texture(&mut self.repr) }
  }
}

/// A handle on a cubemap texture.
#[derive(Debug)]
pub struct TextureCube<B>
where
  B: ?Sized + TextureBackend,
{
  pub(crate) repr: B::TextureRepr,
  size: u32,
  format: TextureFormat,
}

impl<B> TextureCube<B>
where
  B: ?Sized + TextureBackend,
{
  /// Allocate storage for six square faces of `size` × `size` texels.
  pub fn new<C>(
    ctx: &mut C,
    size: u32,
    format: TextureFormat,
    sampler: &Sampler,
  ) -> Result<Self, TextureError>
  where
    C: GraphicsContext<Backend = B>,
  {
    if size < 2 {
      return Err(TextureError::TooSmall {
        width: size,
        height: size,
      });
    }

    let repr = unsafe { ctx.backend().new_texture_cube(size, format, sampler)? };

    Ok(TextureCube { repr, size, format })
  }

  /// Edge length of each face, in texels.
  pub fn size(&self) -> u32 {
    self.size
  }

  /// Format the storage was allocated with.
  pub fn format(&self) -> TextureFormat {
    self.format
  }

  /// Overwrite a region of one face with raw texels.
  pub fn upload_face(
    &mut self,
    face: CubeFace,
    region: Region,
    texels: &[u8],
  ) -> Result<(), TextureError> {
    check_region(region, self.size, self.size)?;
    check_texel_len(region, self.format, texels.len())?;

    unsafe { B::upload_cube(&mut self.repr, face, region, texels) }
  }

  /// Overwrite one whole face with raw texels.
  pub fn upload_whole_face(&mut self, face: CubeFace, texels: &[u8]) -> Result<(), TextureError> {
    self.upload_face(face, Region::whole(self.size, self.size), texels)
  }

  /// Read one whole face back as raw texels.
  pub fn read_face(&self, face: CubeFace) -> Result<Vec<u8>, TextureError> {
    unsafe { B::read_cube(&self.repr, face) }
  }
}

impl<B> Drop for TextureCube<B>
where
  B: ?Sized + TextureBackend,
{
  fn drop(&mut self) {
    unsafe { B::destroy_texture(&mut self.repr) }
  }
}

fn check_region(region: Region, width: u32, height: u32) -> Result<(), TextureError> {
  let x_end = region.x as u64 + region.width as u64;
  let y_end = region.y as u64 + region.height as u64;

  if region.width == 0 || region.height == 0 || x_end > width as u64 || y_end > height as u64 {
    return Err(TextureError::RegionOutOfBounds {
      region,
      width,
      height,
    });
  }

  Ok(())
}

fn check_texel_len(
  region: Region,
  format: TextureFormat,
  provided_bytes: usize,
) -> Result<(), TextureError> {
  let expected_bytes = region.texel_count() * format.bytes_per_pixel();

  if provided_bytes < expected_bytes {
    Err(TextureError::NotEnoughTexels {
      expected_bytes,
      provided_bytes,
    })
  } else if provided_bytes > expected_bytes {
    Err(TextureError::TooManyTexels {
      expected_bytes,
      provided_bytes,
    })
  } else {
    Ok(())
  }
}

/// Texture error.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TextureError {
  /// A dimension is below the minimum of 2 texels.
  TooSmall {
    /// Requested width.
    width: u32,

    /// Requested height.
    height: u32,
  },

  /// A dimension exceeds the device maximum.
  TooLarge {
    /// Requested dimension.
    requested: u32,

    /// Device maximum.
    max: u32,
  },

  /// An upload region does not fit in the texture.
  RegionOutOfBounds {
    /// The offending region.
    region: Region,

    /// Texture width.
    width: u32,

    /// Texture height.
    height: u32,
  },

  /// An upload carried fewer bytes than its region requires.
  NotEnoughTexels {
    /// Byte size the region requires.
    expected_bytes: usize,

    /// Byte size provided.
    provided_bytes: usize,
  },

  /// An upload carried more bytes than its region requires.
  TooManyTexels {
    /// Byte size the region requires.
    expected_bytes: usize,

    /// Byte size provided.
    provided_bytes: usize,
  },

  /// The backend cannot store this format.
  UnsupportedFormat(TextureFormat),

  /// The driver failed to create the storage.
  CreationFailed(String),

  /// The driver reported an error.
  DriverError(String),
}

impl fmt::Display for TextureError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      TextureError::TooSmall { width, height } => write!(
        f,
        "texture too small ({}x{}, both dimensions must be at least 2)",
        width, height
      ),

      TextureError::TooLarge { requested, max } => write!(
        f,
        "texture too large (requested {}, device maximum is {})",
        requested, max
      ),

      TextureError::RegionOutOfBounds {
        region,
        width,
        height,
      } => write!(
        f,
        "region {} out of bounds of a {}x{} texture",
        region, width, height
      ),

      TextureError::NotEnoughTexels {
        expected_bytes,
        provided_bytes,
      } => write!(
        f,
        "not enough texels (expected {} bytes, got {})",
        expected_bytes, provided_bytes
      ),

      TextureError::TooManyTexels {
        expected_bytes,
        provided_bytes,
      } => write!(
        f,
        "too many texels (expected {} bytes, got {})",
        expected_bytes, provided_bytes
      ),

      TextureError::UnsupportedFormat(format) => {
        write!(f, "unsupported texture format {:?}", format)
      }

      TextureError::CreationFailed(ref reason) => {
        write!(f, "texture storage creation failed: {}", reason)
      }

      TextureError::DriverError(ref reason) => write!(f, "driver texture error: {}", reason),
    }
  }
}

impl error::Error for TextureError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn regions_must_fit() {
    assert!(check_region(Region::whole(8, 8), 8, 8).is_ok());
    assert!(check_region(Region { x: 4, y: 4, width: 4, height: 4 }, 8, 8).is_ok());

    assert!(check_region(Region { x: 5, y: 0, width: 4, height: 4 }, 8, 8).is_err());
    assert!(check_region(Region { x: 0, y: 0, width: 0, height: 4 }, 8, 8).is_err());
    assert!(check_region(Region::whole(9, 8), 8, 8).is_err());
  }

  #[test]
  fn texel_lengths_are_exact() {
    let region = Region::whole(4, 4);
    let expected = 16 * TextureFormat::RGBA8.bytes_per_pixel();

    assert!(check_texel_len(region, TextureFormat::RGBA8, expected).is_ok());

    assert_eq!(
      check_texel_len(region, TextureFormat::RGBA8, expected - 1),
      Err(TextureError::NotEnoughTexels {
        expected_bytes: expected,
        provided_bytes: expected - 1,
      })
    );

    assert_eq!(
      check_texel_len(region, TextureFormat::RGBA8, expected + 1),
      Err(TextureError::TooManyTexels {
        expected_bytes: expected,
        provided_bytes: expected + 1,
      })
    );
  }

  #[test]
  fn default_sampler() {
    let sampler = Sampler::default();

    assert_eq!(sampler.wrap_s, Wrap::ClampToEdge);
    assert_eq!(sampler.min_filter, MinFilter::NearestMipmapLinear);
    assert_eq!(sampler.mag_filter, MagFilter::Linear);
    assert!(sampler.depth_comparison.is_none());
  }
}
