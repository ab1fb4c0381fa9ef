//! OpenGL texture implementation.

use gl::types::*;
use std::cell::RefCell;
use std::ptr;
use std::rc::Rc;

use candela::backend::texture::Texture as TextureBackend;
use candela::formats::TextureFormat;
use candela::texture::{CubeFace, MagFilter, MinFilter, Region, Sampler, TextureError, Wrap};
use candela::texture_units::TextureUnitError;

use crate::gl33::state::{from_comparison, GLState};
use crate::gl33::GL33;

/// OpenGL texture.
#[derive(Debug)]
pub struct TextureRepr {
  pub(crate) handle: GLuint,
  pub(crate) target: GLenum,
  pub(crate) format: TextureFormat,
  width: u32,
  height: u32,
  state: Rc<RefCell<GLState>>,
}

unsafe impl TextureBackend for GL33 {
  type TextureRepr = TextureRepr;

  unsafe fn new_texture_2d(
    &mut self,
    width: u32,
    height: u32,
    format: TextureFormat,
    sampler: &Sampler,
  ) -> Result<Self::TextureRepr, TextureError> {
    let mut state = self.state.borrow_mut();

    let max = state.limits().max_texture_size as u32;
    let requested = width.max(height);
    if requested > max {
      return Err(TextureError::TooLarge { requested, max });
    }

    let (internal_format, pixel_format, pixel_type) = opengl_format(format);

    let mut handle: GLuint = 0;
    gl::GenTextures(1, &mut handle);

    let previous = state.edit_bind(gl::TEXTURE_2D, handle);

    set_texture_levels(gl::TEXTURE_2D);
    apply_sampler(gl::TEXTURE_2D, sampler);
    gl::TexImage2D(
      gl::TEXTURE_2D,
      0,
      internal_format as GLint,
      width as GLsizei,
      height as GLsizei,
      0,
      pixel_format,
      pixel_type,
      ptr::null(),
    );

    let report = state.error_report("texture allocation");
    state.restore_edit_bind(previous);

    if let Some(reason) = report {
      gl::DeleteTextures(1, &handle);
      return Err(TextureError::CreationFailed(reason));
    }

    drop(state);

    Ok(TextureRepr {
      handle,
      target: gl::TEXTURE_2D,
      format,
      width,
      height,
      state: self.state.clone(),
    })
  }

  unsafe fn new_texture_cube(
    &mut self,
    size: u32,
    format: TextureFormat,
    sampler: &Sampler,
  ) -> Result<Self::TextureRepr, TextureError> {
    let mut state = self.state.borrow_mut();

    let max = state.limits().max_texture_size as u32;
    if size > max {
      return Err(TextureError::TooLarge {
        requested: size,
        max,
      });
    }

    let (internal_format, pixel_format, pixel_type) = opengl_format(format);

    let mut handle: GLuint = 0;
    gl::GenTextures(1, &mut handle);

    let previous = state.edit_bind(gl::TEXTURE_CUBE_MAP, handle);

    set_texture_levels(gl::TEXTURE_CUBE_MAP);
    apply_sampler(gl::TEXTURE_CUBE_MAP, sampler);

    for face in CubeFace::ALL {
      gl::TexImage2D(
        opengl_cube_face(face),
        0,
        internal_format as GLint,
        size as GLsizei,
        size as GLsizei,
        0,
        pixel_format,
        pixel_type,
        ptr::null(),
      );
    }

    let report = state.error_report("cubemap allocation");
    state.restore_edit_bind(previous);

    if let Some(reason) = report {
      gl::DeleteTextures(1, &handle);
      return Err(TextureError::CreationFailed(reason));
    }

    drop(state);

    Ok(TextureRepr {
      handle,
      target: gl::TEXTURE_CUBE_MAP,
      format,
      width: size,
      height: size,
      state: self.state.clone(),
    })
  }

  unsafe fn destroy_texture(texture: &mut Self::TextureRepr) {
    texture.state.borrow_mut().forget_texture(texture.handle);
    gl::DeleteTextures(1, &texture.handle);
  }

  unsafe fn upload_2d(
    texture: &mut Self::TextureRepr,
    region: Region,
    texels: &[u8],
  ) -> Result<(), TextureError> {
    let mut state = texture.state.borrow_mut();
    let (_, pixel_format, pixel_type) = opengl_format(texture.format);

    let previous = state.edit_bind(texture.target, texture.handle);
    state.set_unpack_alignment(1);

    gl::TexSubImage2D(
      gl::TEXTURE_2D,
      0,
      region.x as GLint,
      region.y as GLint,
      region.width as GLsizei,
      region.height as GLsizei,
      pixel_format,
      pixel_type,
      texels.as_ptr() as _,
    );

    let report = state.error_report("texture upload");
    state.restore_edit_bind(previous);

    match report {
      Some(reason) => Err(TextureError::DriverError(reason)),
      None => Ok(()),
    }
  }

  unsafe fn upload_cube(
    texture: &mut Self::TextureRepr,
    face: CubeFace,
    region: Region,
    texels: &[u8],
  ) -> Result<(), TextureError> {
    let mut state = texture.state.borrow_mut();
    let (_, pixel_format, pixel_type) = opengl_format(texture.format);

    let previous = state.edit_bind(texture.target, texture.handle);
    state.set_unpack_alignment(1);

    gl::TexSubImage2D(
      opengl_cube_face(face),
      0,
      region.x as GLint,
      region.y as GLint,
      region.width as GLsizei,
      region.height as GLsizei,
      pixel_format,
      pixel_type,
      texels.as_ptr() as _,
    );

    let report = state.error_report("cubemap upload");
    state.restore_edit_bind(previous);

    match report {
      Some(reason) => Err(TextureError::DriverError(reason)),
      None => Ok(()),
    }
  }

  unsafe fn read_2d(texture: &Self::TextureRepr) -> Result<Vec<u8>, TextureError> {
    let mut state = texture.state.borrow_mut();
    let (_, pixel_format, pixel_type) = opengl_format(texture.format);
    let bytes =
      texture.width as usize * texture.height as usize * texture.format.bytes_per_pixel();

    let previous = state.edit_bind(texture.target, texture.handle);
    state.set_pack_alignment(1);

    let mut texels: Vec<u8> = Vec::with_capacity(bytes);
    gl::GetTexImage(
      gl::TEXTURE_2D,
      0,
      pixel_format,
      pixel_type,
      texels.as_mut_ptr() as _,
    );

    let report = state.error_report("texture readback");
    state.restore_edit_bind(previous);

    match report {
      Some(reason) => Err(TextureError::DriverError(reason)),
      None => {
        texels.set_len(bytes);
        Ok(texels)
      }
    }
  }

  unsafe fn read_cube(
    texture: &Self::TextureRepr,
    face: CubeFace,
  ) -> Result<Vec<u8>, TextureError> {
    let mut state = texture.state.borrow_mut();
    let (_, pixel_format, pixel_type) = opengl_format(texture.format);
    let bytes =
      texture.width as usize * texture.height as usize * texture.format.bytes_per_pixel();

    let previous = state.edit_bind(texture.target, texture.handle);
    state.set_pack_alignment(1);

    let mut texels: Vec<u8> = Vec::with_capacity(bytes);
    gl::GetTexImage(
      opengl_cube_face(face),
      0,
      pixel_format,
      pixel_type,
      texels.as_mut_ptr() as _,
    );

    let report = state.error_report("cubemap readback");
    state.restore_edit_bind(previous);

    match report {
      Some(reason) => Err(TextureError::DriverError(reason)),
      None => {
        texels.set_len(bytes);
        Ok(texels)
      }
    }
  }

  unsafe fn bind_texture(
    &mut self,
    unit: u32,
    texture: &Self::TextureRepr,
  ) -> Result<(), TextureUnitError> {
    self
      .state
      .borrow_mut()
      .bind_texture_at(texture.target, texture.handle, unit);
    Ok(())
  }

  unsafe fn unbind_unit(&mut self, unit: u32) {
    self.state.borrow_mut().unbind_texture_unit(unit);
  }
}

// Storage is single-level; clamping the level range makes mipmap-filtered sampling complete.
unsafe fn set_texture_levels(target: GLenum) {
  gl::TexParameteri(target, gl::TEXTURE_BASE_LEVEL, 0);
  gl::TexParameteri(target, gl::TEXTURE_MAX_LEVEL, 0);
}

unsafe fn apply_sampler(target: GLenum, sampler: &Sampler) {
  gl::TexParameteri(target, gl::TEXTURE_WRAP_R, opengl_wrap(sampler.wrap_r) as GLint);
  gl::TexParameteri(target, gl::TEXTURE_WRAP_S, opengl_wrap(sampler.wrap_s) as GLint);
  gl::TexParameteri(target, gl::TEXTURE_WRAP_T, opengl_wrap(sampler.wrap_t) as GLint);
  gl::TexParameteri(
    target,
    gl::TEXTURE_MIN_FILTER,
    opengl_min_filter(sampler.min_filter) as GLint,
  );
  gl::TexParameteri(
    target,
    gl::TEXTURE_MAG_FILTER,
    opengl_mag_filter(sampler.mag_filter) as GLint,
  );

  match sampler.depth_comparison {
    Some(comparison) => {
      gl::TexParameteri(
        target,
        gl::TEXTURE_COMPARE_FUNC,
        from_comparison(comparison) as GLint,
      );
      gl::TexParameteri(
        target,
        gl::TEXTURE_COMPARE_MODE,
        gl::COMPARE_REF_TO_TEXTURE as GLint,
      );
    }

    None => {
      gl::TexParameteri(target, gl::TEXTURE_COMPARE_MODE, gl::NONE as GLint);
    }
  }
}

#[inline]
fn opengl_wrap(wrap: Wrap) -> GLenum {
  match wrap {
    Wrap::ClampToEdge => gl::CLAMP_TO_EDGE,
    Wrap::Repeat => gl::REPEAT,
    Wrap::MirroredRepeat => gl::MIRRORED_REPEAT,
  }
}

#[inline]
fn opengl_min_filter(filter: MinFilter) -> GLenum {
  match filter {
    MinFilter::Nearest => gl::NEAREST,
    MinFilter::Linear => gl::LINEAR,
    MinFilter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
    MinFilter::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
    MinFilter::LinearMipmapNearest => gl::LINEAR_MIPMAP_NEAREST,
    MinFilter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
  }
}

#[inline]
fn opengl_mag_filter(filter: MagFilter) -> GLenum {
  match filter {
    MagFilter::Nearest => gl::NEAREST,
    MagFilter::Linear => gl::LINEAR,
  }
}

#[inline]
fn opengl_cube_face(face: CubeFace) -> GLenum {
  match face {
    CubeFace::PositiveX => gl::TEXTURE_CUBE_MAP_POSITIVE_X,
    CubeFace::NegativeX => gl::TEXTURE_CUBE_MAP_NEGATIVE_X,
    CubeFace::PositiveY => gl::TEXTURE_CUBE_MAP_POSITIVE_Y,
    CubeFace::NegativeY => gl::TEXTURE_CUBE_MAP_NEGATIVE_Y,
    CubeFace::PositiveZ => gl::TEXTURE_CUBE_MAP_POSITIVE_Z,
    CubeFace::NegativeZ => gl::TEXTURE_CUBE_MAP_NEGATIVE_Z,
  }
}

// internal format, pixel format and pixel type for each storage format
fn opengl_format(format: TextureFormat) -> (GLenum, GLenum, GLenum) {
  match format {
    TextureFormat::R8 => (gl::R8, gl::RED, gl::UNSIGNED_BYTE),
    TextureFormat::R8I => (gl::R8I, gl::RED_INTEGER, gl::BYTE),
    TextureFormat::R8UI => (gl::R8UI, gl::RED_INTEGER, gl::UNSIGNED_BYTE),
    TextureFormat::R16 => (gl::R16, gl::RED, gl::UNSIGNED_SHORT),
    TextureFormat::R16F => (gl::R16F, gl::RED, gl::HALF_FLOAT),
    TextureFormat::R16I => (gl::R16I, gl::RED_INTEGER, gl::SHORT),
    TextureFormat::R16UI => (gl::R16UI, gl::RED_INTEGER, gl::UNSIGNED_SHORT),
    TextureFormat::R32F => (gl::R32F, gl::RED, gl::FLOAT),
    TextureFormat::R32I => (gl::R32I, gl::RED_INTEGER, gl::INT),
    TextureFormat::R32UI => (gl::R32UI, gl::RED_INTEGER, gl::UNSIGNED_INT),

    TextureFormat::RG8 => (gl::RG8, gl::RG, gl::UNSIGNED_BYTE),
    TextureFormat::RG8I => (gl::RG8I, gl::RG_INTEGER, gl::BYTE),
    TextureFormat::RG8UI => (gl::RG8UI, gl::RG_INTEGER, gl::UNSIGNED_BYTE),
    TextureFormat::RG16 => (gl::RG16, gl::RG, gl::UNSIGNED_SHORT),
    TextureFormat::RG16F => (gl::RG16F, gl::RG, gl::HALF_FLOAT),
    TextureFormat::RG16I => (gl::RG16I, gl::RG_INTEGER, gl::SHORT),
    TextureFormat::RG16UI => (gl::RG16UI, gl::RG_INTEGER, gl::UNSIGNED_SHORT),
    TextureFormat::RG32F => (gl::RG32F, gl::RG, gl::FLOAT),
    TextureFormat::RG32I => (gl::RG32I, gl::RG_INTEGER, gl::INT),
    TextureFormat::RG32UI => (gl::RG32UI, gl::RG_INTEGER, gl::UNSIGNED_INT),

    TextureFormat::RGB8 => (gl::RGB8, gl::RGB, gl::UNSIGNED_BYTE),
    TextureFormat::RGB8I => (gl::RGB8I, gl::RGB_INTEGER, gl::BYTE),
    TextureFormat::RGB8UI => (gl::RGB8UI, gl::RGB_INTEGER, gl::UNSIGNED_BYTE),
    TextureFormat::RGB16 => (gl::RGB16, gl::RGB, gl::UNSIGNED_SHORT),
    TextureFormat::RGB16F => (gl::RGB16F, gl::RGB, gl::HALF_FLOAT),
    TextureFormat::RGB16I => (gl::RGB16I, gl::RGB_INTEGER, gl::SHORT),
    TextureFormat::RGB16UI => (gl::RGB16UI, gl::RGB_INTEGER, gl::UNSIGNED_SHORT),
    TextureFormat::RGB32F => (gl::RGB32F, gl::RGB, gl::FLOAT),
    TextureFormat::RGB32I => (gl::RGB32I, gl::RGB_INTEGER, gl::INT),
    TextureFormat::RGB32UI => (gl::RGB32UI, gl::RGB_INTEGER, gl::UNSIGNED_INT),

    TextureFormat::RGBA8 => (gl::RGBA8, gl::RGBA, gl::UNSIGNED_BYTE),
    TextureFormat::RGBA8I => (gl::RGBA8I, gl::RGBA_INTEGER, gl::BYTE),
    TextureFormat::RGBA8UI => (gl::RGBA8UI, gl::RGBA_INTEGER, gl::UNSIGNED_BYTE),
    TextureFormat::RGBA16 => (gl::RGBA16, gl::RGBA, gl::UNSIGNED_SHORT),
    TextureFormat::RGBA16F => (gl::RGBA16F, gl::RGBA, gl::HALF_FLOAT),
    TextureFormat::RGBA16I => (gl::RGBA16I, gl::RGBA_INTEGER, gl::SHORT),
    TextureFormat::RGBA16UI => (gl::RGBA16UI, gl::RGBA_INTEGER, gl::UNSIGNED_SHORT),
    TextureFormat::RGBA32F => (gl::RGBA32F, gl::RGBA, gl::FLOAT),
    TextureFormat::RGBA32I => (gl::RGBA32I, gl::RGBA_INTEGER, gl::INT),
    TextureFormat::RGBA32UI => (gl::RGBA32UI, gl::RGBA_INTEGER, gl::UNSIGNED_INT),
    TextureFormat::RGBA1010102 => (gl::RGB10_A2, gl::RGBA, gl::UNSIGNED_INT_2_10_10_10_REV),

    TextureFormat::Depth16 => (gl::DEPTH_COMPONENT16, gl::DEPTH_COMPONENT, gl::UNSIGNED_SHORT),
    TextureFormat::Depth24 => (gl::DEPTH_COMPONENT24, gl::DEPTH_COMPONENT, gl::UNSIGNED_INT),
    TextureFormat::Depth24Stencil8 => (gl::DEPTH24_STENCIL8, gl::DEPTH_STENCIL, gl::UNSIGNED_INT_24_8),
    TextureFormat::Depth32F => (gl::DEPTH_COMPONENT32F, gl::DEPTH_COMPONENT, gl::FLOAT),
  }
}
