//! Per-frame operation backend interface.

use crate::backend::vertex_array::VertexArray;
use crate::pipeline::{ClearSpec, PipelineError, Primitive};
use crate::render_state::RenderState;
use crate::viewport::Viewport;

/// Per-frame operations: viewport, clears, render states and draws.
///
/// # Call contracts
///
/// - `draw_elements` is only called with a vertex array known to carry an index buffer.
/// - Draws bind the vertex array themselves, through the state cache.
pub unsafe trait Pipeline: VertexArray {
  /// Set the viewport. [`Viewport::Whole`] resolves against the bound draw framebuffer.
  unsafe fn set_viewport(&mut self, viewport: Viewport);

  /// Clear the buffers `spec` selects on the bound draw framebuffer.
  ///
  /// Strict depth/stencil clears fail if the framebuffer lacks the corresponding bits.
  unsafe fn clear(&mut self, spec: &ClearSpec) -> Result<(), PipelineError>;

  /// Apply a whole render state.
  ///
  /// Strict depth/stencil settings fail if the bound draw framebuffer lacks the corresponding
  /// bits.
  unsafe fn apply_render_state(&mut self, state: &RenderState) -> Result<(), PipelineError>;

  /// Set the rasterized line width, validated against the device range.
  unsafe fn set_line_width(&mut self, width: f32) -> Result<(), PipelineError>;

  /// Draw `count` vertices starting at `first`, `instances` times.
  unsafe fn draw_arrays(
    &mut self,
    vertex_array: &Self::VertexArrayRepr,
    primitive: Primitive,
    first: usize,
    count: usize,
    instances: usize,
  );

  /// Draw `count` indices from the vertex array’s index buffer, `instances` times.
  unsafe fn draw_elements(
    &mut self,
    vertex_array: &Self::VertexArrayRepr,
    primitive: Primitive,
    count: usize,
    instances: usize,
  );
}
