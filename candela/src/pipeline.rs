//! Per-frame operations.
//!
//! A [`Frame`] borrows the graphics context and issues the operations a frame is made of:
//! picking the draw target and the program, setting the viewport, clearing, applying a
//! [`RenderState`](crate::render_state::RenderState) and drawing vertex arrays. No explicit
//! binding of any resource is part of the surface; the backend’s cache binds on demand and
//! skips redundant driver calls.

use std::error;
use std::fmt;

use crate::backend::framebuffer::Framebuffer as FramebufferBackend;
use crate::backend::pipeline::Pipeline as PipelineBackend;
use crate::backend::shader::Shader as ShaderBackend;
use crate::context::GraphicsContext;
use crate::framebuffer::Framebuffer;
use crate::render_state::{RenderState, Strictness};
use crate::shader::Program;
use crate::vertex_array::VertexArray;
use crate::viewport::Viewport;

/// Kind of primitive assembled from vertices.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Primitive {
  /// Isolated points.
  Points,

  /// Isolated segments, two vertices each.
  Lines,

  /// Closed polyline.
  LineLoop,

  /// Open polyline.
  LineStrip,

  /// Isolated triangles, three vertices each.
  Triangles,

  /// Strip of triangles sharing an edge.
  TriangleStrip,

  /// Fan of triangles sharing the first vertex.
  TriangleFan,
}

/// Which buffers a clear overwrites, and with what.
///
/// Constructed with [`ClearSpec::new`] and refined with the `set_*` methods; unset buffers are
/// left untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClearSpec {
  color: Option<[f32; 4]>,
  depth: Option<f32>,
  stencil: Option<i32>,
  strictness: Strictness,
}

impl ClearSpec {
  /// A spec clearing nothing, strict.
  pub fn new() -> Self {
    ClearSpec {
      color: None,
      depth: None,
      stencil: None,
      strictness: Strictness::Strict,
    }
  }

  /// Color the color buffer is cleared to, if any.
  pub fn color(&self) -> Option<[f32; 4]> {
    self.color
  }

  /// Clear the color buffer to `color`. `None` leaves it untouched.
  pub fn set_color<C>(self, color: C) -> Self
  where
    C: Into<Option<[f32; 4]>>,
  {
    Self {
      color: color.into(),
      ..self
    }
  }

  /// Depth the depth buffer is cleared to, if any.
  pub fn depth(&self) -> Option<f32> {
    self.depth
  }

  /// Clear the depth buffer to `depth`. `None` leaves it untouched.
  pub fn set_depth<D>(self, depth: D) -> Self
  where
    D: Into<Option<f32>>,
  {
    Self {
      depth: depth.into(),
      ..self
    }
  }

  /// Value the stencil buffer is cleared to, if any.
  pub fn stencil(&self) -> Option<i32> {
    self.stencil
  }

  /// Clear the stencil buffer to `stencil`. `None` leaves it untouched.
  pub fn set_stencil<S>(self, stencil: S) -> Self
  where
    S: Into<Option<i32>>,
  {
    Self {
      stencil: stencil.into(),
      ..self
    }
  }

  /// How clearing a buffer the framebuffer does not carry is treated.
  pub fn strictness(&self) -> Strictness {
    self.strictness
  }

  /// Change how clearing a missing buffer is treated.
  pub fn set_strictness(self, strictness: Strictness) -> Self {
    Self { strictness, ..self }
  }
}

impl Default for ClearSpec {
  fn default() -> Self {
    Self::new()
  }
}

/// Per-frame operation surface.
///
/// Obtained with [`GraphicsContext::frame`]; borrows the context for as long as it lives.
pub struct Frame<'a, C>
where
  C: ?Sized,
{
  ctx: &'a mut C,
}

impl<'a, C> Frame<'a, C>
where
  C: GraphicsContext,
{
  pub(crate) fn new(ctx: &'a mut C) -> Self {
    Frame { ctx }
  }

  /// Make `framebuffer` the draw target for what follows.
  pub fn render_to(&mut self, framebuffer: &Framebuffer<C::Backend>)
  where
    C::Backend: FramebufferBackend,
  {
    unsafe { <C::Backend as FramebufferBackend>::bind_draw(&framebuffer.repr) }
  }

  /// Make `program` the one subsequent draws run.
  pub fn use_program(&mut self, program: &Program<C::Backend>)
  where
    C::Backend: ShaderBackend,
  {
    unsafe { <C::Backend as ShaderBackend>::use_program(&program.repr) }
  }

  /// Set the viewport. [`Viewport::Whole`] covers the current draw target.
  pub fn set_viewport(&mut self, viewport: Viewport)
  where
    C::Backend: PipelineBackend,
  {
    unsafe { self.ctx.backend().set_viewport(viewport) }
  }

  /// Clear the buffers selected by `spec` on the current draw target.
  pub fn clear(&mut self, spec: &ClearSpec) -> Result<(), PipelineError>
  where
    C::Backend: PipelineBackend,
  {
    unsafe { self.ctx.backend().clear(spec) }
  }

  /// Apply a whole render state.
  pub fn apply(&mut self, state: &RenderState) -> Result<(), PipelineError>
  where
    C::Backend: PipelineBackend,
  {
    unsafe { self.ctx.backend().apply_render_state(state) }
  }

  /// Set the rasterized line width, validated against the device range.
  pub fn set_line_width(&mut self, width: f32) -> Result<(), PipelineError>
  where
    C::Backend: PipelineBackend,
  {
    unsafe { self.ctx.backend().set_line_width(width) }
  }

  /// Draw `count` vertices of `vertex_array` starting at `first`.
  pub fn draw_arrays(
    &mut self,
    vertex_array: &VertexArray<C::Backend>,
    primitive: Primitive,
    first: usize,
    count: usize,
  ) where
    C::Backend: PipelineBackend,
  {
    unsafe {
      self
        .ctx
        .backend()
        .draw_arrays(&vertex_array.repr, primitive, first, count, 1)
    }
  }

  /// Draw `count` vertices of `vertex_array` starting at `first`, `instances` times.
  pub fn draw_arrays_instanced(
    &mut self,
    vertex_array: &VertexArray<C::Backend>,
    primitive: Primitive,
    first: usize,
    count: usize,
    instances: usize,
  ) where
    C::Backend: PipelineBackend,
  {
    unsafe {
      self
        .ctx
        .backend()
        .draw_arrays(&vertex_array.repr, primitive, first, count, instances)
    }
  }

  /// Draw the whole index buffer of `vertex_array`.
  pub fn draw_elements(
    &mut self,
    vertex_array: &VertexArray<C::Backend>,
    primitive: Primitive,
  ) -> Result<(), PipelineError>
  where
    C::Backend: PipelineBackend,
  {
    self.draw_elements_instanced(vertex_array, primitive, 1)
  }

  /// Draw the whole index buffer of `vertex_array`, `instances` times.
  pub fn draw_elements_instanced(
    &mut self,
    vertex_array: &VertexArray<C::Backend>,
    primitive: Primitive,
    instances: usize,
  ) -> Result<(), PipelineError>
  where
    C::Backend: PipelineBackend,
  {
    let (_, count) = vertex_array.indices().ok_or(PipelineError::NoIndexBuffer)?;

    unsafe {
      self
        .ctx
        .backend()
        .draw_elements(&vertex_array.repr, primitive, count, instances)
    };

    Ok(())
  }
}

/// Per-frame operation error.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineError {
  /// A strict depth setting or clear hit a framebuffer without depth bits.
  NoDepthBuffer,

  /// A strict stencil setting or clear hit a framebuffer without stencil bits.
  NoStencilBuffer,

  /// An indexed draw hit a vertex array without an index buffer.
  NoIndexBuffer,

  /// The requested line width is outside the device range.
  LineWidthOutOfRange {
    /// Requested width.
    requested: f32,

    /// Smallest and widest supported widths.
    range: [f32; 2],
  },

  /// The driver reported an error.
  DriverError(String),
}

impl fmt::Display for PipelineError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      PipelineError::NoDepthBuffer => f.write_str("no depth buffer"),

      PipelineError::NoStencilBuffer => f.write_str("no stencil buffer"),

      PipelineError::NoIndexBuffer => f.write_str("no index buffer"),

      PipelineError::LineWidthOutOfRange { requested, range } => write!(
        f,
        "line width {} out of range [{}, {}]",
        requested, range[0], range[1]
      ),

      PipelineError::DriverError(ref reason) => write!(f, "driver pipeline error: {}", reason),
    }
  }
}

impl error::Error for PipelineError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clear_spec_defaults_to_nothing() {
    let spec = ClearSpec::new();

    assert_eq!(spec.color(), None);
    assert_eq!(spec.depth(), None);
    assert_eq!(spec.stencil(), None);
    assert_eq!(spec.strictness(), Strictness::Strict);
  }

  #[test]
  fn clear_spec_setters_compose() {
    let spec = ClearSpec::new()
      .set_color([0., 0., 0., 1.])
      .set_depth(1.)
      .set_strictness(Strictness::Lenient);

    assert_eq!(spec.color(), Some([0., 0., 0., 1.]));
    assert_eq!(spec.depth(), Some(1.));
    assert_eq!(spec.stencil(), None);
    assert_eq!(spec.strictness(), Strictness::Lenient);
  }
}
