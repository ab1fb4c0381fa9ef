//! Software buffer implementation.

use std::cell::RefCell;
use std::rc::Rc;

use candela::backend::buffer::Buffer as BufferBackend;
use candela::buffer::{BufferError, Usage};

use crate::state::FakeState;
use crate::FakeBackend;

/// Software buffer; the storage is an ordinary byte vector.
#[derive(Debug)]
pub struct BufferRepr {
  pub(crate) id: u64,
  bytes: Vec<u8>,
  pub(crate) state: Rc<RefCell<FakeState>>,
}

unsafe impl BufferBackend for FakeBackend {
  type BufferRepr = BufferRepr;

  unsafe fn new_buffer(&mut self, bytes: usize, usage: Usage) -> Result<Self::BufferRepr, BufferError> {
    let mut state = self.state.borrow_mut();
    let id = state.fresh_id();

    log::debug!(
      "context {}: buffer {}: allocated {} bytes ({:?})",
      state.name(),
      id,
      bytes,
      usage
    );

    drop(state);

    Ok(BufferRepr {
      id,
      bytes: vec![0; bytes],
      state: self.state.clone(),
    })
  }

  unsafe fn destroy_buffer(buffer: &mut Self::BufferRepr) {
    let state = buffer.state.borrow();
    log::debug!("context {}: buffer {}: destroyed", state.name(), buffer.id);
  }

  unsafe fn len_bytes(buffer: &Self::BufferRepr) -> usize {
    buffer.bytes.len()
  }

  unsafe fn upload_bytes(
    buffer: &mut Self::BufferRepr,
    offset: usize,
    bytes: &[u8],
  ) -> Result<(), BufferError> {
    buffer.bytes[offset..offset + bytes.len()].copy_from_slice(bytes);
    Ok(())
  }

  unsafe fn read_bytes(buffer: &Self::BufferRepr) -> Result<Vec<u8>, BufferError> {
    Ok(buffer.bytes.clone())
  }
}
