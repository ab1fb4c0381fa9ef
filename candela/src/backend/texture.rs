//! Texture backend interface.

use crate::formats::TextureFormat;
use crate::texture::{CubeFace, Region, Sampler, TextureError};
use crate::texture_units::TextureUnitError;

/// Texture backend.
///
/// # Call contracts
///
/// - Dimensions are at least 2 texels; the device maximum is the backend’s to enforce.
/// - Upload regions have been checked against the texture bounds, and texel slices against the
///   region’s byte size.
/// - `bind_texture` may be handed a representation from another context; backends able to
///   detect that report [`TextureUnitError::ContextMismatch`].
pub unsafe trait Texture {
  /// Representation of a texture.
  type TextureRepr;

  /// Allocate storage for a 2D texture and apply the sampler to it.
  unsafe fn new_texture_2d(
    &mut self,
    width: u32,
    height: u32,
    format: TextureFormat,
    sampler: &Sampler,
  ) -> Result<Self::TextureRepr, TextureError>;

  /// Allocate storage for a cubemap (six square faces of `size` pixels) and apply the sampler.
  unsafe fn new_texture_cube(
    &mut self,
    size: u32,
    format: TextureFormat,
    sampler: &Sampler,
  ) -> Result<Self::TextureRepr, TextureError>;

  /// Destroy the native object, unbinding it from every unit it is bound to.
  unsafe fn destroy_texture(texture: &mut Self::TextureRepr);

  /// Overwrite a region of a 2D texture.
  unsafe fn upload_2d(
    texture: &mut Self::TextureRepr,
    region: Region,
    texels: &[u8],
  ) -> Result<(), TextureError>;

  /// Overwrite a region of one cubemap face.
  unsafe fn upload_cube(
    texture: &mut Self::TextureRepr,
    face: CubeFace,
    region: Region,
    texels: &[u8],
  ) -> Result<(), TextureError>;

  /// Read the whole level-0 image of a 2D texture back.
  unsafe fn read_2d(texture: &Self::TextureRepr) -> Result<Vec<u8>, TextureError>;

  /// Read one whole cubemap face back.
  unsafe fn read_cube(
    texture: &Self::TextureRepr,
    face: CubeFace,
  ) -> Result<Vec<u8>, TextureError>;

  /// Bind a texture to a unit.
  unsafe fn bind_texture(
    &mut self,
    unit: u32,
    texture: &Self::TextureRepr,
  ) -> Result<(), TextureUnitError>;

  /// Unbind whatever is bound to a unit.
  unsafe fn unbind_unit(&mut self, unit: u32);
}
