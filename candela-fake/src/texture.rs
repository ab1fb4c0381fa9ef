//! Software texture implementation.
//!
//! Textures own their level-0 texel bytes, so uploads land where a driver would put them and
//! readbacks hand back exactly what was written. Samplers are accepted and ignored; nothing
//! here ever samples.

use std::cell::RefCell;
use std::rc::Rc;

use candela::backend::texture::Texture as TextureBackend;
use candela::formats::TextureFormat;
use candela::texture::{CubeFace, Region, Sampler, TextureError};
use candela::texture_units::TextureUnitError;

use crate::state::FakeState;
use crate::FakeBackend;

/// Software texture; one image per face, six faces for a cubemap.
#[derive(Debug)]
pub struct TextureRepr {
  pub(crate) id: u64,
  pub(crate) width: u32,
  pub(crate) height: u32,
  pub(crate) format: TextureFormat,
  images: Vec<Vec<u8>>,
  pub(crate) state: Rc<RefCell<FakeState>>,
}

unsafe impl TextureBackend for FakeBackend {
  type TextureRepr = TextureRepr;

  unsafe fn new_texture_2d(
    &mut self,
    width: u32,
    height: u32,
    format: TextureFormat,
    _sampler: &Sampler,
  ) -> Result<Self::TextureRepr, TextureError> {
    let mut state = self.state.borrow_mut();
    let max = state.limits().max_texture_size as u32;
    let requested = width.max(height);

    if requested > max {
      return Err(TextureError::TooLarge { requested, max });
    }

    let id = state.fresh_id();
    let bytes = width as usize * height as usize * format.bytes_per_pixel();

    log::debug!(
      "context {}: texture {}: allocated 2D {}×{} {:?}",
      state.name(),
      id,
      width,
      height,
      format
    );

    drop(state);

    Ok(TextureRepr {
      id,
      width,
      height,
      format,
      images: vec![vec![0; bytes]],
      state: self.state.clone(),
    })
  }

  unsafe fn new_texture_cube(
    &mut self,
    size: u32,
    format: TextureFormat,
    _sampler: &Sampler,
  ) -> Result<Self::TextureRepr, TextureError> {
    let mut state = self.state.borrow_mut();
    let max = state.limits().max_texture_size as u32;

    if size > max {
      return Err(TextureError::TooLarge {
        requested: size,
        max,
      });
    }

    let id = state.fresh_id();
    let bytes = size as usize * size as usize * format.bytes_per_pixel();

    log::debug!(
      "context {}: texture {}: allocated cubemap {}×{} {:?}",
      state.name(),
      id,
      size,
      size,
      format
    );

    drop(state);

    Ok(TextureRepr {
      id,
      width: size,
      height: size,
      format,
      images: vec![vec![0; bytes]; 6],
      state: self.state.clone(),
    })
  }

  unsafe fn destroy_texture(texture: &mut Self::TextureRepr) {
    let mut state = texture.state.borrow_mut();
    state.forget_texture(texture.id);
    log::debug!("context {}: texture {}: destroyed", state.name(), texture.id);
  }

  unsafe fn upload_2d(
    texture: &mut Self::TextureRepr,
    region: Region,
    texels: &[u8],
  ) -> Result<(), TextureError> {
    let width = texture.width;
    let bytes_per_pixel = texture.format.bytes_per_pixel();
    write_region(&mut texture.images[0], width, bytes_per_pixel, region, texels);
    Ok(())
  }

  unsafe fn upload_cube(
    texture: &mut Self::TextureRepr,
    face: CubeFace,
    region: Region,
    texels: &[u8],
  ) -> Result<(), TextureError> {
    let width = texture.width;
    let bytes_per_pixel = texture.format.bytes_per_pixel();
    let image = &mut texture.images[face_index(face)];
    write_region(image, width, bytes_per_pixel, region, texels);
    Ok(())
  }

  unsafe fn read_2d(texture: &Self::TextureRepr) -> Result<Vec<u8>, TextureError> {
    Ok(texture.images[0].clone())
  }

  unsafe fn read_cube(
    texture: &Self::TextureRepr,
    face: CubeFace,
  ) -> Result<Vec<u8>, TextureError> {
    Ok(texture.images[face_index(face)].clone())
  }

  unsafe fn bind_texture(
    &mut self,
    unit: u32,
    texture: &Self::TextureRepr,
  ) -> Result<(), TextureUnitError> {
    if !Rc::ptr_eq(&self.state, &texture.state) {
      return Err(TextureUnitError::ContextMismatch);
    }

    let mut state = self.state.borrow_mut();

    if unit as usize >= state.unit_count() {
      return Err(TextureUnitError::OutOfRange {
        unit,
        max_units: state.unit_count() as u32,
      });
    }

    state.bind_unit(unit, texture.id);
    Ok(())
  }

  unsafe fn unbind_unit(&mut self, unit: u32) {
    let mut state = self.state.borrow_mut();

    if (unit as usize) < state.unit_count() {
      state.unbind_unit(unit);
    }
  }
}

#[inline]
fn face_index(face: CubeFace) -> usize {
  match face {
    CubeFace::PositiveX => 0,
    CubeFace::NegativeX => 1,
    CubeFace::PositiveY => 2,
    CubeFace::NegativeY => 3,
    CubeFace::PositiveZ => 4,
    CubeFace::NegativeZ => 5,
  }
}

/// Copy `texels` row by row into `region` of an image `texture_width` texels wide.
fn write_region(
  image: &mut [u8],
  texture_width: u32,
  bytes_per_pixel: usize,
  region: Region,
  texels: &[u8],
) {
  let row_bytes = region.width as usize * bytes_per_pixel;

  for row in 0..region.height as usize {
    let src = row * row_bytes;
    let dst =
      ((region.y as usize + row) * texture_width as usize + region.x as usize) * bytes_per_pixel;

    image[dst..dst + row_bytes].copy_from_slice(&texels[src..src + row_bytes]);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn regions_land_row_by_row() {
    // 4×4 image, 1 byte per texel; write a 2×2 block at (1, 1)
    let mut image = vec![0u8; 16];
    let region = Region {
      x: 1,
      y: 1,
      width: 2,
      height: 2,
    };

    write_region(&mut image, 4, 1, region, &[1, 2, 3, 4]);

    #[rustfmt::skip]
    let expected = vec![
      0, 0, 0, 0,
      0, 1, 2, 0,
      0, 3, 4, 0,
      0, 0, 0, 0,
    ];
    assert_eq!(image, expected);
  }

  #[test]
  fn whole_region_overwrites_everything() {
    let mut image = vec![9u8; 8];
    let texels: Vec<u8> = (0..8).collect();

    write_region(&mut image, 2, 2, Region::whole(2, 2), &texels);

    assert_eq!(image, texels);
  }
}
