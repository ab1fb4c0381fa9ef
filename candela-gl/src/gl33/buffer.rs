//! OpenGL buffer implementation.

use gl::types::*;
use std::cell::RefCell;
use std::ptr;
use std::rc::Rc;

use candela::backend::buffer::Buffer as BufferBackend;
use candela::buffer::{BufferError, Usage};

use crate::gl33::state::{Bind, GLState};
use crate::gl33::GL33;

/// OpenGL buffer.
///
/// The element type lives in the core layer; down here a buffer is a handle and a byte length.
#[derive(Debug)]
pub struct BufferRepr {
  pub(crate) handle: GLuint,
  bytes: usize,
  state: Rc<RefCell<GLState>>,
}

unsafe impl BufferBackend for GL33 {
  type BufferRepr = BufferRepr;

  unsafe fn new_buffer(&mut self, bytes: usize, usage: Usage) -> Result<Self::BufferRepr, BufferError> {
    let mut handle: GLuint = 0;

    gl::GenBuffers(1, &mut handle);

    let mut state = self.state.borrow_mut();
    state.bind_array_buffer(handle, Bind::Forced);
    gl::BufferData(
      gl::ARRAY_BUFFER,
      bytes as isize,
      ptr::null(),
      from_usage(usage),
    );

    if let Some(reason) = state.error_report("buffer allocation") {
      state.forget_buffer(handle);
      gl::DeleteBuffers(1, &handle);
      return Err(BufferError::DriverError(reason));
    }

    drop(state);

    Ok(BufferRepr {
      handle,
      bytes,
      state: self.state.clone(),
    })
  }

  unsafe fn destroy_buffer(buffer: &mut Self::BufferRepr) {
    buffer.state.borrow_mut().forget_buffer(buffer.handle);
    gl::DeleteBuffers(1, &buffer.handle);
  }

  unsafe fn len_bytes(buffer: &Self::BufferRepr) -> usize {
    buffer.bytes
  }

  unsafe fn upload_bytes(
    buffer: &mut Self::BufferRepr,
    offset: usize,
    bytes: &[u8],
  ) -> Result<(), BufferError> {
    let mut state = buffer.state.borrow_mut();

    state.bind_array_buffer(buffer.handle, Bind::Cached);
    gl::BufferSubData(
      gl::ARRAY_BUFFER,
      offset as isize,
      bytes.len() as isize,
      bytes.as_ptr() as _,
    );

    match state.error_report("buffer upload") {
      Some(reason) => Err(BufferError::DriverError(reason)),
      None => Ok(()),
    }
  }

  unsafe fn read_bytes(buffer: &Self::BufferRepr) -> Result<Vec<u8>, BufferError> {
    let mut state = buffer.state.borrow_mut();

    state.bind_array_buffer(buffer.handle, Bind::Cached);

    let mut bytes: Vec<u8> = Vec::with_capacity(buffer.bytes);
    gl::GetBufferSubData(
      gl::ARRAY_BUFFER,
      0,
      buffer.bytes as isize,
      bytes.as_mut_ptr() as _,
    );

    if let Some(reason) = state.error_report("buffer readback") {
      return Err(BufferError::DriverError(reason));
    }

    bytes.set_len(buffer.bytes);
    Ok(bytes)
  }
}

#[inline]
fn from_usage(usage: Usage) -> GLenum {
  match usage {
    Usage::StaticDraw => gl::STATIC_DRAW,
    Usage::StaticRead => gl::STATIC_READ,
    Usage::StaticCopy => gl::STATIC_COPY,
    Usage::DynamicDraw => gl::DYNAMIC_DRAW,
    Usage::DynamicRead => gl::DYNAMIC_READ,
    Usage::DynamicCopy => gl::DYNAMIC_COPY,
    Usage::StreamDraw => gl::STREAM_DRAW,
    Usage::StreamRead => gl::STREAM_READ,
    Usage::StreamCopy => gl::STREAM_COPY,
  }
}
