//! OpenGL shader implementation.

use gl::types::*;
use std::cell::RefCell;
use std::ffi::CString;
use std::ptr::null;
use std::rc::Rc;

use candela::backend::shader::Shader as ShaderBackend;
use candela::shader::{
  ProgramError, StageError, StageType, UniformDesc, UniformType, UniformValue,
};
use candela::vertex_array::AttributeDesc;

use crate::gl33::state::GLState;
use crate::gl33::GL33;

/// OpenGL shader stage.
#[derive(Debug)]
pub struct StageRepr {
  handle: GLuint,
}

/// OpenGL shader program.
#[derive(Debug)]
pub struct ProgramRepr {
  pub(crate) handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

unsafe impl ShaderBackend for GL33 {
  type StageRepr = StageRepr;

  type ProgramRepr = ProgramRepr;

  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError> {
    let handle = gl::CreateShader(opengl_shader_type(ty));

    if handle == 0 {
      return Err(StageError::CompilationFailed(
        ty,
        "unable to create shader stage".to_owned(),
      ));
    }

    // sources are handed to the driver as C strings
    let c_src = match CString::new(src.as_bytes()) {
      Ok(c_src) => c_src,
      Err(_) => {
        gl::DeleteShader(handle);
        return Err(StageError::CompilationFailed(
          ty,
          "source contains a nul byte".to_owned(),
        ));
      }
    };

    gl::ShaderSource(handle, 1, [c_src.as_ptr()].as_ptr(), null());
    gl::CompileShader(handle);

    let mut compiled: GLint = gl::FALSE.into();
    gl::GetShaderiv(handle, gl::COMPILE_STATUS, &mut compiled);

    if compiled == gl::TRUE.into() {
      Ok(StageRepr { handle })
    } else {
      let mut log_len: GLint = 0;
      gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

      let mut log: Vec<u8> = Vec::with_capacity(log_len.max(0) as usize);
      let mut written: GLsizei = 0;
      gl::GetShaderInfoLog(handle, log_len, &mut written, log.as_mut_ptr() as *mut GLchar);
      log.set_len(written.max(0) as usize);

      gl::DeleteShader(handle);

      Err(StageError::CompilationFailed(
        ty,
        String::from_utf8_lossy(&log).into_owned(),
      ))
    }
  }

  unsafe fn destroy_stage(stage: &mut Self::StageRepr) {
    gl::DeleteShader(stage.handle);
  }

  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    geometry: Option<&Self::StageRepr>,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ProgramError> {
    let handle = gl::CreateProgram();

    if handle == 0 {
      return Err(ProgramError::CreationFailed(
        "unable to create program".to_owned(),
      ));
    }

    gl::AttachShader(handle, vertex.handle);
    if let Some(geometry) = geometry {
      gl::AttachShader(handle, geometry.handle);
    }
    gl::AttachShader(handle, fragment.handle);

    gl::LinkProgram(handle);

    let mut linked: GLint = gl::FALSE.into();
    gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked);

    if linked == gl::TRUE.into() {
      Ok(ProgramRepr {
        handle,
        state: self.state.clone(),
      })
    } else {
      let mut log_len: GLint = 0;
      gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

      let mut log: Vec<u8> = Vec::with_capacity(log_len.max(0) as usize);
      let mut written: GLsizei = 0;
      gl::GetProgramInfoLog(handle, log_len, &mut written, log.as_mut_ptr() as *mut GLchar);
      log.set_len(written.max(0) as usize);

      gl::DeleteProgram(handle);

      Err(ProgramError::LinkFailed(
        String::from_utf8_lossy(&log).into_owned(),
      ))
    }
  }

  unsafe fn destroy_program(program: &mut Self::ProgramRepr) {
    // a deleted program would silently stay current; deselect it first
    program.state.borrow_mut().unuse_program(program.handle);
    gl::DeleteProgram(program.handle);
  }

  unsafe fn use_program(program: &Self::ProgramRepr) {
    program.state.borrow_mut().use_program(program.handle);
  }

  unsafe fn active_uniforms(program: &Self::ProgramRepr) -> Vec<UniformDesc> {
    let mut count: GLint = 0;
    gl::GetProgramiv(program.handle, gl::ACTIVE_UNIFORMS, &mut count);

    let mut max_len: GLint = 0;
    gl::GetProgramiv(program.handle, gl::ACTIVE_UNIFORM_MAX_LENGTH, &mut max_len);
    let max_len = max_len.max(1);

    let mut uniforms = Vec::with_capacity(count.max(0) as usize);

    for index in 0..count.max(0) as GLuint {
      let mut name_buf: Vec<u8> = Vec::with_capacity(max_len as usize);
      let mut written: GLsizei = 0;
      let mut size: GLint = 0;
      let mut gl_ty: GLenum = 0;

      gl::GetActiveUniform(
        program.handle,
        index,
        max_len,
        &mut written,
        &mut size,
        &mut gl_ty,
        name_buf.as_mut_ptr() as *mut GLchar,
      );
      name_buf.set_len(written.max(0) as usize);

      let name = String::from_utf8_lossy(&name_buf).into_owned();

      // drivers reflect their own built-ins too
      if name.starts_with("gl_") {
        continue;
      }

      // uniform block members carry no location
      let location = uniform_location(program.handle, &name);
      if location < 0 {
        continue;
      }

      match uniform_type_from_gl(gl_ty) {
        Some(ty) => uniforms.push(UniformDesc { name, location, ty }),
        None => log::warn!(
          "uniform {} has an unsupported type (0x{:x}); ignoring it",
          name,
          gl_ty
        ),
      }
    }

    uniforms
  }

  unsafe fn active_attributes(program: &Self::ProgramRepr) -> Vec<AttributeDesc> {
    let mut count: GLint = 0;
    gl::GetProgramiv(program.handle, gl::ACTIVE_ATTRIBUTES, &mut count);

    let mut max_len: GLint = 0;
    gl::GetProgramiv(program.handle, gl::ACTIVE_ATTRIBUTE_MAX_LENGTH, &mut max_len);
    let max_len = max_len.max(1);

    let mut attributes = Vec::with_capacity(count.max(0) as usize);

    for index in 0..count.max(0) as GLuint {
      let mut name_buf: Vec<u8> = Vec::with_capacity(max_len as usize);
      let mut written: GLsizei = 0;
      let mut size: GLint = 0;
      let mut gl_ty: GLenum = 0;

      gl::GetActiveAttrib(
        program.handle,
        index,
        max_len,
        &mut written,
        &mut size,
        &mut gl_ty,
        name_buf.as_mut_ptr() as *mut GLchar,
      );
      name_buf.set_len(written.max(0) as usize);

      let name = String::from_utf8_lossy(&name_buf).into_owned();

      if name.starts_with("gl_") {
        continue;
      }

      let location = attribute_location(program.handle, &name);
      if location < 0 {
        continue;
      }

      match uniform_type_from_gl(gl_ty) {
        Some(ty) => attributes.push(AttributeDesc {
          name,
          location: location as u32,
          ty,
        }),
        None => log::warn!(
          "attribute {} has an unsupported type (0x{:x}); ignoring it",
          name,
          gl_ty
        ),
      }
    }

    attributes
  }

  unsafe fn set_uniform(program: &Self::ProgramRepr, location: i32, value: &UniformValue) {
    program.state.borrow_mut().use_program(program.handle);

    match *value {
      UniformValue::Int(x) => gl::Uniform1i(location, x),
      UniformValue::UnsignedInt(x) => gl::Uniform1ui(location, x),
      UniformValue::Float(x) => gl::Uniform1f(location, x),
      UniformValue::Bool(x) => gl::Uniform1i(location, x as GLint),

      UniformValue::IVec2(v) => gl::Uniform2iv(location, 1, v.as_ptr()),
      UniformValue::IVec3(v) => gl::Uniform3iv(location, 1, v.as_ptr()),
      UniformValue::IVec4(v) => gl::Uniform4iv(location, 1, v.as_ptr()),

      UniformValue::UVec2(v) => gl::Uniform2uiv(location, 1, v.as_ptr()),
      UniformValue::UVec3(v) => gl::Uniform3uiv(location, 1, v.as_ptr()),
      UniformValue::UVec4(v) => gl::Uniform4uiv(location, 1, v.as_ptr()),

      UniformValue::Vec2(v) => gl::Uniform2fv(location, 1, v.as_ptr()),
      UniformValue::Vec3(v) => gl::Uniform3fv(location, 1, v.as_ptr()),
      UniformValue::Vec4(v) => gl::Uniform4fv(location, 1, v.as_ptr()),

      UniformValue::BVec2(v) => {
        let v = [v[0] as GLint, v[1] as GLint];
        gl::Uniform2iv(location, 1, v.as_ptr())
      }
      UniformValue::BVec3(v) => {
        let v = [v[0] as GLint, v[1] as GLint, v[2] as GLint];
        gl::Uniform3iv(location, 1, v.as_ptr())
      }
      UniformValue::BVec4(v) => {
        let v = [v[0] as GLint, v[1] as GLint, v[2] as GLint, v[3] as GLint];
        gl::Uniform4iv(location, 1, v.as_ptr())
      }

      UniformValue::M22(m) => gl::UniformMatrix2fv(location, 1, gl::FALSE, m.as_ptr() as _),
      UniformValue::M33(m) => gl::UniformMatrix3fv(location, 1, gl::FALSE, m.as_ptr() as _),
      UniformValue::M44(m) => gl::UniformMatrix4fv(location, 1, gl::FALSE, m.as_ptr() as _),

      UniformValue::TextureUnit(unit) => gl::Uniform1i(location, unit as GLint),
    }
  }
}

#[inline]
fn opengl_shader_type(ty: StageType) -> GLenum {
  match ty {
    StageType::Vertex => gl::VERTEX_SHADER,
    StageType::Geometry => gl::GEOMETRY_SHADER,
    StageType::Fragment => gl::FRAGMENT_SHADER,
  }
}

unsafe fn uniform_location(handle: GLuint, name: &str) -> GLint {
  match CString::new(name.as_bytes()) {
    Ok(c_name) => gl::GetUniformLocation(handle, c_name.as_ptr() as *const GLchar),
    Err(_) => -1,
  }
}

unsafe fn attribute_location(handle: GLuint, name: &str) -> GLint {
  match CString::new(name.as_bytes()) {
    Ok(c_name) => gl::GetAttribLocation(handle, c_name.as_ptr() as *const GLchar),
    Err(_) => -1,
  }
}

fn uniform_type_from_gl(gl_ty: GLenum) -> Option<UniformType> {
  let ty = match gl_ty {
    gl::INT => UniformType::Int,
    gl::UNSIGNED_INT => UniformType::UnsignedInt,
    gl::FLOAT => UniformType::Float,
    gl::BOOL => UniformType::Bool,

    gl::INT_VEC2 => UniformType::IVec2,
    gl::INT_VEC3 => UniformType::IVec3,
    gl::INT_VEC4 => UniformType::IVec4,

    gl::UNSIGNED_INT_VEC2 => UniformType::UVec2,
    gl::UNSIGNED_INT_VEC3 => UniformType::UVec3,
    gl::UNSIGNED_INT_VEC4 => UniformType::UVec4,

    gl::FLOAT_VEC2 => UniformType::Vec2,
    gl::FLOAT_VEC3 => UniformType::Vec3,
    gl::FLOAT_VEC4 => UniformType::Vec4,

    gl::BOOL_VEC2 => UniformType::BVec2,
    gl::BOOL_VEC3 => UniformType::BVec3,
    gl::BOOL_VEC4 => UniformType::BVec4,

    gl::FLOAT_MAT2 => UniformType::M22,
    gl::FLOAT_MAT3 => UniformType::M33,
    gl::FLOAT_MAT4 => UniformType::M44,

    gl::SAMPLER_2D | gl::SAMPLER_2D_SHADOW => UniformType::Sampler2D,
    gl::SAMPLER_CUBE | gl::SAMPLER_CUBE_SHADOW => UniformType::SamplerCube,

    _ => return None,
  };

  Some(ty)
}
