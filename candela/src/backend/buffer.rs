//! Buffer backend interface.
//!
//! Device buffers are byte-oriented at this level; the typed view lives in
//! [`crate::buffer::Buffer`], which converts slices of `T` to bytes before crossing the
//! interface. Binding the native object is the backend’s concern: implementations bind on
//! demand through their state cache instead of expecting callers to have bound anything.

use crate::buffer::{BufferError, Usage};

/// Buffer backend.
///
/// # Call contracts
///
/// - `new_buffer` receives a non-zero byte size.
/// - `upload_bytes` receives a range already checked against the buffer length.
/// - Representations are only passed back to the backend that created them.
pub unsafe trait Buffer {
  /// Representation of a device buffer.
  type BufferRepr;

  /// Allocate a zero-filled buffer of `bytes` bytes.
  unsafe fn new_buffer(&mut self, bytes: usize, usage: Usage) -> Result<Self::BufferRepr, BufferError>;

  /// Destroy the native object. Any cached binding of it must be invalidated.
  unsafe fn destroy_buffer(buffer: &mut Self::BufferRepr);

  /// Size of the buffer in bytes.
  unsafe fn len_bytes(buffer: &Self::BufferRepr) -> usize;

  /// Overwrite `bytes.len()` bytes starting at `offset`.
  unsafe fn upload_bytes(
    buffer: &mut Self::BufferRepr,
    offset: usize,
    bytes: &[u8],
  ) -> Result<(), BufferError>;

  /// Read the whole buffer back.
  unsafe fn read_bytes(buffer: &Self::BufferRepr) -> Result<Vec<u8>, BufferError>;
}
