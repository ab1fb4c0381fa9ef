//! Vertex array backend interface.

use crate::backend::buffer::Buffer;
use crate::vertex_array::{IndexType, VertexArrayError, VertexAttribute};

/// Vertex array backend.
///
/// # Call contracts
///
/// - Attribute descriptions have been validated by the builder (at least one attribute, indices
///   within the device limit, 1 to 4 elements each).
/// - Buffer representations referenced by the attributes and the index binding belong to this
///   backend.
pub unsafe trait VertexArray: Buffer {
  /// Representation of a vertex array.
  type VertexArrayRepr;

  /// Create a vertex array from attribute bindings and an optional index buffer.
  unsafe fn new_vertex_array(
    &mut self,
    attributes: &[(VertexAttribute, &Self::BufferRepr)],
    indices: Option<(&Self::BufferRepr, IndexType)>,
  ) -> Result<Self::VertexArrayRepr, VertexArrayError>;

  /// Destroy the native object. Any cached binding of it must be invalidated.
  unsafe fn destroy_vertex_array(vertex_array: &mut Self::VertexArrayRepr);
}
