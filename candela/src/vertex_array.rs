//! Vertex arrays.
//!
//! A [`VertexArray`] bundles vertex attribute bindings and an optional index buffer into a single
//! native object that draw commands consume. Building one is declarative: describe each attribute
//! with a [`VertexAttribute`], point it at a [`Buffer`], optionally attach indices, then `build`.
//!
//! Attribute layouts are byte-level. The builder does not try to infer strides or offsets from
//! Rust types; it checks what can be checked without the driver (component counts, duplicate
//! indices) and leaves device limits to the backend.

use std::error;
use std::fmt;

use crate::backend::vertex_array::VertexArray as VertexArrayBackend;
use crate::buffer::Buffer;
use crate::context::GraphicsContext;
use crate::shader::UniformType;

/// Scalar type of a vertex attribute component.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AttributeKind {
  /// 8-bit signed integer.
  Byte,

  /// 8-bit unsigned integer.
  UnsignedByte,

  /// 16-bit signed integer.
  Short,

  /// 16-bit unsigned integer.
  UnsignedShort,

  /// 32-bit signed integer.
  Int,

  /// 32-bit unsigned integer.
  UnsignedInt,

  /// 16-bit floating point number.
  HalfFloat,

  /// 32-bit floating point number.
  Float,
}

impl AttributeKind {
  /// Size of one component, in bytes.
  pub fn bytes(self) -> usize {
    match self {
      AttributeKind::Byte | AttributeKind::UnsignedByte => 1,
      AttributeKind::Short | AttributeKind::UnsignedShort | AttributeKind::HalfFloat => 2,
      AttributeKind::Int | AttributeKind::UnsignedInt | AttributeKind::Float => 4,
    }
  }

  /// Whether the kind is an integer kind.
  pub fn is_integral(self) -> bool {
    !matches!(self, AttributeKind::HalfFloat | AttributeKind::Float)
  }
}

/// Description of a single vertex attribute binding.
///
/// `stride` is the distance in bytes between two consecutive vertices in the source buffer; zero
/// means tightly packed. `offset` is the byte position of the first component. `divisor` is the
/// instancing divisor; zero advances the attribute per vertex, _n_ advances it every _n_
/// instances.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct VertexAttribute {
  /// Attribute index, as referenced by shader programs.
  pub index: u32,

  /// Number of components per vertex, 1 to 4.
  pub components: u32,

  /// Scalar type of each component.
  pub kind: AttributeKind,

  /// Whether integer data is normalized to `[0, 1]` or `[-1, 1]` when read as floats.
  pub normalized: bool,

  /// Whether the shader consumes the attribute as an integer type.
  ///
  /// Non-integral attributes feed `float` and `vec*` inputs, converting integer kinds on the
  /// way; integral ones feed `int`, `uint` and their vector forms without conversion.
  pub integral: bool,

  /// Byte distance between consecutive vertices; zero for tight packing.
  pub stride: u32,

  /// Byte offset of the first component.
  pub offset: u32,

  /// Instancing divisor.
  pub divisor: u32,
}

impl VertexAttribute {
  /// A non-normalized, non-integral, tightly packed, per-vertex attribute.
  pub fn new(index: u32, components: u32, kind: AttributeKind) -> Self {
    VertexAttribute {
      index,
      components,
      kind,
      normalized: false,
      integral: false,
      stride: 0,
      offset: 0,
      divisor: 0,
    }
  }

  /// Change the normalization flag.
  pub fn set_normalized(self, normalized: bool) -> Self {
    Self { normalized, ..self }
  }

  /// Change whether the shader consumes the attribute as an integer type.
  pub fn set_integral(self, integral: bool) -> Self {
    Self { integral, ..self }
  }

  /// Change the stride, in bytes.
  pub fn set_stride(self, stride: u32) -> Self {
    Self { stride, ..self }
  }

  /// Change the offset of the first component, in bytes.
  pub fn set_offset(self, offset: u32) -> Self {
    Self { offset, ..self }
  }

  /// Change the instancing divisor.
  pub fn set_divisor(self, divisor: u32) -> Self {
    Self { divisor, ..self }
  }
}

/// Scalar type of indices in an index buffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IndexType {
  /// 8-bit unsigned indices.
  UnsignedByte,

  /// 16-bit unsigned indices.
  UnsignedShort,

  /// 32-bit unsigned indices.
  UnsignedInt,
}

impl IndexType {
  /// Size of one index, in bytes.
  pub fn bytes(self) -> usize {
    match self {
      IndexType::UnsignedByte => 1,
      IndexType::UnsignedShort => 2,
      IndexType::UnsignedInt => 4,
    }
  }
}

/// Class of integers a GPU can consume as vertex indices.
///
/// # Safety
///
/// Implementations must report the [`IndexType`] that matches their exact memory layout.
pub unsafe trait IndexInteger: Copy {
  /// Runtime index type matching `Self`.
  const INDEX_TYPE: IndexType;
}

unsafe impl IndexInteger for u8 {
  const INDEX_TYPE: IndexType = IndexType::UnsignedByte;
}

unsafe impl IndexInteger for u16 {
  const INDEX_TYPE: IndexType = IndexType::UnsignedShort;
}

unsafe impl IndexInteger for u32 {
  const INDEX_TYPE: IndexType = IndexType::UnsignedInt;
}

/// Description of an active vertex attribute, as reflected from a linked program.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AttributeDesc {
  /// Name of the attribute in the shading language.
  pub name: String,

  /// Attribute index the linker assigned.
  pub location: u32,

  /// Shading language type of the attribute.
  pub ty: UniformType,
}

/// A handle on a vertex array.
#[derive(Debug)]
pub struct VertexArray<B>
where
  B: ?Sized + VertexArrayBackend,
{
  pub(crate) repr: B::VertexArrayRepr,
  indices: Option<(IndexType, usize)>,
}

impl<B> VertexArray<B>
where
  B: ?Sized + VertexArrayBackend,
{
  /// Index type and index count of the attached index buffer, if any.
  pub fn indices(&self) -> Option<(IndexType, usize)> {
    self.indices
  }
}

impl<B> Drop for VertexArray<B>
where
  B: ?Sized + VertexArrayBackend,
{
  fn drop(&mut self) {
    unsafe { B::destroy_vertex_array(&mut self.repr) }
  }
}

/// Declarative builder for [`VertexArray`].
pub struct VertexArrayBuilder<'a, B>
where
  B: ?Sized + VertexArrayBackend,
{
  attributes: Vec<(VertexAttribute, &'a B::BufferRepr)>,
  indices: Option<(&'a B::BufferRepr, IndexType, usize)>,
}

impl<'a, B> VertexArrayBuilder<'a, B>
where
  B: ?Sized + VertexArrayBackend,
{
  /// Start an empty description.
  pub fn new() -> Self {
    VertexArrayBuilder {
      attributes: Vec::new(),
      indices: None,
    }
  }

  /// Bind `attribute` to `buffer`.
  pub fn attribute<T>(mut self, attribute: VertexAttribute, buffer: &'a Buffer<B, T>) -> Self
  where
    T: Copy,
  {
    self.attributes.push((attribute, &buffer.repr));
    self
  }

  /// Attach `buffer` as the index buffer.
  ///
  /// The index type is taken from the buffer’s element type. A second call replaces the first
  /// binding.
  pub fn indices<I>(mut self, buffer: &'a Buffer<B, I>) -> Self
  where
    I: IndexInteger,
  {
    self.indices = Some((&buffer.repr, I::INDEX_TYPE, buffer.len()));
    self
  }

  /// Validate the description and create the native object.
  pub fn build<C>(self, ctx: &mut C) -> Result<VertexArray<B>, VertexArrayError>
  where
    C: GraphicsContext<Backend = B>,
  {
    if self.attributes.is_empty() {
      return Err(VertexArrayError::NoAttributes);
    }

    let mut seen: Vec<u32> = Vec::with_capacity(self.attributes.len());

    for &(ref attribute, _) in &self.attributes {
      if attribute.components < 1 || attribute.components > 4 {
        return Err(VertexArrayError::InvalidComponentCount {
          index: attribute.index,
          components: attribute.components,
        });
      }

      if attribute.integral && (attribute.normalized || !attribute.kind.is_integral()) {
        return Err(VertexArrayError::InvalidIntegralAttribute(attribute.index));
      }

      if seen.contains(&attribute.index) {
        return Err(VertexArrayError::AttributeAlreadyAssigned(attribute.index));
      }

      seen.push(attribute.index);
    }

    let backend_indices = self.indices.map(|(repr, ty, _)| (repr, ty));
    let repr = unsafe { ctx.backend().new_vertex_array(&self.attributes, backend_indices)? };

    Ok(VertexArray {
      repr,
      indices: self.indices.map(|(_, ty, len)| (ty, len)),
    })
  }
}

impl<'a, B> Default for VertexArrayBuilder<'a, B>
where
  B: ?Sized + VertexArrayBackend,
{
  fn default() -> Self {
    Self::new()
  }
}

/// Vertex array error.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VertexArrayError {
  /// The description carried no attribute at all.
  NoAttributes,

  /// An attribute declared a component count outside 1 to 4.
  InvalidComponentCount {
    /// Attribute index.
    index: u32,

    /// Component count it declared.
    components: u32,
  },

  /// An integral attribute declared a floating kind or normalization.
  InvalidIntegralAttribute(u32),

  /// Two attributes declared the same index.
  AttributeAlreadyAssigned(u32),

  /// An attribute index is beyond what the device supports.
  AttributeOutOfRange {
    /// Attribute index.
    index: u32,

    /// Number of attribute indices the device supports.
    max_attributes: u32,
  },

  /// The driver reported an error.
  DriverError(String),
}

impl fmt::Display for VertexArrayError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      VertexArrayError::NoAttributes => f.write_str("no vertex attribute assigned"),

      VertexArrayError::InvalidComponentCount { index, components } => write!(
        f,
        "invalid component count for attribute {} (got {}, expected 1 to 4)",
        index, components
      ),

      VertexArrayError::InvalidIntegralAttribute(index) => write!(
        f,
        "integral attribute {} cannot be normalized nor use a floating kind",
        index
      ),

      VertexArrayError::AttributeAlreadyAssigned(index) => {
        write!(f, "attribute {} already assigned", index)
      }

      VertexArrayError::AttributeOutOfRange {
        index,
        max_attributes,
      } => write!(
        f,
        "attribute {} out of range (device supports {} attributes)",
        index, max_attributes
      ),

      VertexArrayError::DriverError(ref reason) => {
        write!(f, "driver vertex array error: {}", reason)
      }
    }
  }
}

impl error::Error for VertexArrayError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn attribute_defaults() {
    let attribute = VertexAttribute::new(0, 3, AttributeKind::Float);

    assert_eq!(attribute.normalized, false);
    assert_eq!(attribute.integral, false);
    assert_eq!(attribute.stride, 0);
    assert_eq!(attribute.offset, 0);
    assert_eq!(attribute.divisor, 0);
  }

  #[test]
  fn integral_kinds() {
    assert!(AttributeKind::Byte.is_integral());
    assert!(AttributeKind::UnsignedInt.is_integral());
    assert!(!AttributeKind::HalfFloat.is_integral());
    assert!(!AttributeKind::Float.is_integral());
  }

  #[test]
  fn component_sizes() {
    assert_eq!(AttributeKind::Byte.bytes(), 1);
    assert_eq!(AttributeKind::HalfFloat.bytes(), 2);
    assert_eq!(AttributeKind::Float.bytes(), 4);
    assert_eq!(IndexType::UnsignedByte.bytes(), 1);
    assert_eq!(IndexType::UnsignedShort.bytes(), 2);
    assert_eq!(IndexType::UnsignedInt.bytes(), 4);
  }

  #[test]
  fn index_integers_match_their_types() {
    assert_eq!(<u8 as IndexInteger>::INDEX_TYPE, IndexType::UnsignedByte);
    assert_eq!(<u16 as IndexInteger>::INDEX_TYPE, IndexType::UnsignedShort);
    assert_eq!(<u32 as IndexInteger>::INDEX_TYPE, IndexType::UnsignedInt);
  }
}
