//! OpenGL vertex array implementation.

use gl::types::*;
use std::cell::RefCell;
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;

use candela::backend::vertex_array::VertexArray as VertexArrayBackend;
use candela::vertex_array::{AttributeKind, IndexType, VertexArrayError, VertexAttribute};

use crate::gl33::state::{Bind, GLState};
use crate::gl33::GL33;

/// OpenGL vertex array.
#[derive(Debug)]
pub struct VertexArrayRepr {
  pub(crate) handle: GLuint,
  pub(crate) index_type: Option<GLenum>,
  pub(crate) state: Rc<RefCell<GLState>>,
}

unsafe impl VertexArrayBackend for GL33 {
  type VertexArrayRepr = VertexArrayRepr;

  unsafe fn new_vertex_array(
    &mut self,
    attributes: &[(VertexAttribute, &Self::BufferRepr)],
    indices: Option<(&Self::BufferRepr, IndexType)>,
  ) -> Result<Self::VertexArrayRepr, VertexArrayError> {
    let mut state = self.state.borrow_mut();

    let max_attributes = state.limits().max_vertex_attributes;
    for &(ref attribute, _) in attributes {
      if attribute.index as usize >= max_attributes {
        return Err(VertexArrayError::AttributeOutOfRange {
          index: attribute.index,
          max_attributes: max_attributes as u32,
        });
      }
    }

    let mut handle: GLuint = 0;
    gl::GenVertexArrays(1, &mut handle);

    // force binding so that a previously bound array (possibly the same handle) does not
    // prevent us from binding here
    state.bind_vertex_array(handle, Bind::Forced);

    for &(ref attribute, buffer) in attributes {
      // force binding as it’s meaningful while a vertex array is bound
      state.bind_array_buffer(buffer.handle, Bind::Forced);
      set_attribute_pointer(attribute);
    }

    let mut index_type = None;
    if let Some((buffer, ty)) = indices {
      // the element binding is recorded into the vertex array itself
      state.bind_element_array_buffer(buffer.handle, Bind::Forced);
      index_type = Some(from_index_type(ty));
    }

    if let Some(reason) = state.error_report("vertex array creation") {
      state.forget_vertex_array(handle);
      gl::DeleteVertexArrays(1, &handle);
      return Err(VertexArrayError::DriverError(reason));
    }

    drop(state);

    Ok(VertexArrayRepr {
      handle,
      index_type,
      state: self.state.clone(),
    })
  }

  unsafe fn destroy_vertex_array(vertex_array: &mut Self::VertexArrayRepr) {
    vertex_array
      .state
      .borrow_mut()
      .forget_vertex_array(vertex_array.handle);
    gl::DeleteVertexArrays(1, &vertex_array.handle);
  }
}

unsafe fn set_attribute_pointer(attribute: &VertexAttribute) {
  let index = attribute.index as GLuint;
  let components = attribute.components as GLint;
  let kind = from_attribute_kind(attribute.kind);
  let stride = attribute.stride as GLsizei;
  let offset = ptr::null::<c_void>().add(attribute.offset as usize);

  if attribute.integral {
    gl::VertexAttribIPointer(index, components, kind, stride, offset);
  } else {
    let normalized = if attribute.normalized { gl::TRUE } else { gl::FALSE };
    gl::VertexAttribPointer(index, components, kind, normalized, stride, offset);
  }

  gl::VertexAttribDivisor(index, attribute.divisor as GLuint);
  gl::EnableVertexAttribArray(index);
}

#[inline]
fn from_attribute_kind(kind: AttributeKind) -> GLenum {
  match kind {
    AttributeKind::Byte => gl::BYTE,
    AttributeKind::UnsignedByte => gl::UNSIGNED_BYTE,
    AttributeKind::Short => gl::SHORT,
    AttributeKind::UnsignedShort => gl::UNSIGNED_SHORT,
    AttributeKind::Int => gl::INT,
    AttributeKind::UnsignedInt => gl::UNSIGNED_INT,
    AttributeKind::HalfFloat => gl::HALF_FLOAT,
    AttributeKind::Float => gl::FLOAT,
  }
}

#[inline]
fn from_index_type(ty: IndexType) -> GLenum {
  match ty {
    IndexType::UnsignedByte => gl::UNSIGNED_BYTE,
    IndexType::UnsignedShort => gl::UNSIGNED_SHORT,
    IndexType::UnsignedInt => gl::UNSIGNED_INT,
  }
}
