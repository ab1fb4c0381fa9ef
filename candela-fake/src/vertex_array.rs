//! Software vertex array implementation.

use std::cell::RefCell;
use std::rc::Rc;

use candela::backend::vertex_array::VertexArray as VertexArrayBackend;
use candela::vertex_array::{IndexType, VertexArrayError, VertexAttribute};

use crate::state::FakeState;
use crate::FakeBackend;

/// Software vertex array; only the shape is recorded, the attribute data stays in the buffers.
#[derive(Debug)]
pub struct VertexArrayRepr {
  pub(crate) id: u64,
  pub(crate) attribute_count: usize,
  pub(crate) index_type: Option<IndexType>,
  pub(crate) state: Rc<RefCell<FakeState>>,
}

unsafe impl VertexArrayBackend for FakeBackend {
  type VertexArrayRepr = VertexArrayRepr;

  unsafe fn new_vertex_array(
    &mut self,
    attributes: &[(VertexAttribute, &Self::BufferRepr)],
    indices: Option<(&Self::BufferRepr, IndexType)>,
  ) -> Result<Self::VertexArrayRepr, VertexArrayError> {
    let mut state = self.state.borrow_mut();
    let max_attributes = state.limits().max_vertex_attributes;

    for (attribute, buffer) in attributes {
      if !Rc::ptr_eq(&self.state, &buffer.state) {
        return Err(VertexArrayError::DriverError(format!(
          "buffer {} belongs to another context",
          buffer.id
        )));
      }

      if attribute.index as usize >= max_attributes {
        return Err(VertexArrayError::AttributeOutOfRange {
          index: attribute.index,
          max_attributes: max_attributes as u32,
        });
      }
    }

    if let Some((buffer, _)) = indices {
      if !Rc::ptr_eq(&self.state, &buffer.state) {
        return Err(VertexArrayError::DriverError(format!(
          "index buffer {} belongs to another context",
          buffer.id
        )));
      }
    }

    let id = state.fresh_id();

    log::debug!(
      "context {}: vertex array {}: {} attributes, indices: {:?}",
      state.name(),
      id,
      attributes.len(),
      indices.map(|(_, ty)| ty)
    );

    drop(state);

    Ok(VertexArrayRepr {
      id,
      attribute_count: attributes.len(),
      index_type: indices.map(|(_, ty)| ty),
      state: self.state.clone(),
    })
  }

  unsafe fn destroy_vertex_array(vertex_array: &mut Self::VertexArrayRepr) {
    let mut state = vertex_array.state.borrow_mut();
    state.forget_vertex_array(vertex_array.id);
    log::debug!(
      "context {}: vertex array {}: destroyed",
      state.name(),
      vertex_array.id
    );
  }
}
