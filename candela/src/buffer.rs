//! Device buffers.
//!
//! A [`Buffer`] is a typed handle over a region of driver-owned memory. The element type is
//! phantom: the driver sees bytes, and the handle converts slices of `T` at the boundary.
//! Handles own their native object; dropping the handle destroys it and invalidates whatever
//! binding the state cache held for it.
//!
//! There is no bind ceremony here. Operations that need the native object bound perform the
//! bind themselves through the backend’s cache, which skips the driver call when the object is
//! already bound.

use std::error;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr;
use std::slice;

use crate::backend::buffer::Buffer as BufferBackend;
use crate::context::GraphicsContext;

/// Usage hint passed to the driver at allocation time.
///
/// The first half names the expected update frequency, the second half the expected data flow.
/// Drivers are free to ignore the hint; it never changes semantics.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Usage {
  /// Written once, drawn from many times.
  StaticDraw,

  /// Written once, read back many times.
  StaticRead,

  /// Written once, copied from many times.
  StaticCopy,

  /// Rewritten regularly, drawn from many times.
  DynamicDraw,

  /// Rewritten regularly, read back many times.
  DynamicRead,

  /// Rewritten regularly, copied from many times.
  DynamicCopy,

  /// Rewritten every use, drawn from a few times.
  StreamDraw,

  /// Rewritten every use, read back a few times.
  StreamRead,

  /// Rewritten every use, copied from a few times.
  StreamCopy,
}

/// A typed handle on a device buffer.
#[derive(Debug)]
pub struct Buffer<B, T>
where
  B: ?Sized + BufferBackend,
  T: Copy,
{
  pub(crate) repr: B::BufferRepr,
  usage: Usage,
  _t: PhantomData<T>,
}

impl<B, T> Buffer<B, T>
where
  B: ?Sized + BufferBackend,
  T: Copy,
{
  /// Allocate a zero-filled buffer of `len` elements.
  pub fn new<C>(ctx: &mut C, usage: Usage, len: usize) -> Result<Self, BufferError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let bytes = len * mem::size_of::<T>();

    if bytes == 0 {
      return Err(BufferError::ZeroSized);
    }

    let repr = unsafe { ctx.backend().new_buffer(bytes, usage)? };

    Ok(Buffer {
      repr,
      usage,
      _t: PhantomData,
    })
  }

  /// Allocate a buffer holding a copy of `values`.
  pub fn from_slice<C>(ctx: &mut C, usage: Usage, values: &[T]) -> Result<Self, BufferError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let mut buffer = Self::new(ctx, usage, values.len())?;
    buffer.upload(values)?;
    Ok(buffer)
  }

  /// Number of elements in the buffer.
  pub fn len(&self) -> usize {
    unsafe { B::len_bytes(&self.repr) / mem::size_of::<T>() }
  }

  /// Whether the buffer holds no element.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// The usage hint the buffer was allocated with.
  pub fn usage(&self) -> Usage {
    self.usage
  }

  /// Replace the whole contents.
  ///
  /// `values` must have exactly the buffer’s length.
  pub fn upload(&mut self, values: &[T]) -> Result<(), BufferError> {
    let buffer_len = self.len();

    if values.len() < buffer_len {
      return Err(BufferError::TooFewValues {
        provided_len: values.len(),
        buffer_len,
      });
    }

    if values.len() > buffer_len {
      return Err(BufferError::TooManyValues {
        provided_len: values.len(),
        buffer_len,
      });
    }

    unsafe { B::upload_bytes(&mut self.repr, 0, value_bytes(values)) }
  }

  /// Overwrite `values.len()` elements starting at element `offset`.
  pub fn upload_part(&mut self, offset: usize, values: &[T]) -> Result<(), BufferError> {
    let buffer_len = self.len();

    if offset + values.len() > buffer_len {
      return Err(BufferError::Overflow {
        offset,
        len: values.len(),
        buffer_len,
      });
    }

    let byte_offset = offset * mem::size_of::<T>();
    unsafe { B::upload_bytes(&mut self.repr, byte_offset, value_bytes(values)) }
  }

  /// Read the whole contents back.
  pub fn read(&self) -> Result<Vec<T>, BufferError> {
    let bytes = unsafe { B::read_bytes(&self.repr)? };
    let len = bytes.len() / mem::size_of::<T>();
    let mut values = Vec::with_capacity(len);

    unsafe {
      ptr::copy_nonoverlapping(
        bytes.as_ptr(),
        values.as_mut_ptr() as *mut u8,
        len * mem::size_of::<T>(),
      );
      values.set_len(len);
    }

    Ok(values)
  }
}

impl<B, T> Drop for Buffer<B, T>
where
  B: ?Sized + BufferBackend,
  T: Copy,
{
  fn drop(&mut self) {
    unsafe { B::destroy_buffer(&mut self.repr) }
  }
}

fn value_bytes<T>(values: &[T]) -> &[u8]
where
  T: Copy,
{
  unsafe { slice::from_raw_parts(values.as_ptr() as *const u8, mem::size_of::<T>() * values.len()) }
}

/// Buffer error.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BufferError {
  /// Allocation of a zero-byte buffer.
  ZeroSized,

  /// A ranged update runs past the end of the buffer.
  Overflow {
    /// Element offset the update starts at.
    offset: usize,

    /// Number of elements in the update.
    len: usize,

    /// Number of elements in the buffer.
    buffer_len: usize,
  },

  /// A whole-buffer update carried too few values.
  TooFewValues {
    /// Number of values provided.
    provided_len: usize,

    /// Number of elements in the buffer.
    buffer_len: usize,
  },

  /// A whole-buffer update carried too many values.
  TooManyValues {
    /// Number of values provided.
    provided_len: usize,

    /// Number of elements in the buffer.
    buffer_len: usize,
  },

  /// The driver reported an error.
  DriverError(String),
}

impl fmt::Display for BufferError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      BufferError::ZeroSized => f.write_str("zero-sized buffer allocation"),

      BufferError::Overflow {
        offset,
        len,
        buffer_len,
      } => write!(
        f,
        "buffer overflow (offset: {}, len: {}, buffer length: {})",
        offset, len, buffer_len
      ),

      BufferError::TooFewValues {
        provided_len,
        buffer_len,
      } => write!(
        f,
        "too few values provided (provided: {}, buffer length: {})",
        provided_len, buffer_len
      ),

      BufferError::TooManyValues {
        provided_len,
        buffer_len,
      } => write!(
        f,
        "too many values provided (provided: {}, buffer length: {})",
        provided_len, buffer_len
      ),

      BufferError::DriverError(ref reason) => write!(f, "driver buffer error: {}", reason),
    }
  }
}

impl error::Error for BufferError {}
