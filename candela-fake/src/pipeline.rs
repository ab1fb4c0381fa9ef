//! Software pipeline implementation.
//!
//! Nothing is rasterized. Clears, render states and draws are validated against the tracked
//! state exactly like a driver-backed implementation would, then recorded in the log.

use candela::backend::pipeline::Pipeline as PipelineBackend;
use candela::depth_stencil::Write;
use candela::pipeline::{ClearSpec, PipelineError, Primitive};
use candela::render_state::{RenderState, Strictness};
use candela::viewport::Viewport;

use crate::FakeBackend;

unsafe impl PipelineBackend for FakeBackend {
  unsafe fn set_viewport(&mut self, viewport: Viewport) {
    let state = self.state.borrow();

    let rect = match viewport {
      Viewport::Whole => {
        let size = state.draw_framebuffer_size();
        [0, 0, size[0], size[1]]
      }

      Viewport::Specific {
        x,
        y,
        width,
        height,
      } => [x, y, width, height],
    };

    log::trace!(
      "context {}: viewport {}x{} at ({}, {})",
      state.name(),
      rect[2],
      rect[3],
      rect[0],
      rect[1]
    );
  }

  unsafe fn clear(&mut self, spec: &ClearSpec) -> Result<(), PipelineError> {
    let state = self.state.borrow();
    let bits = state.draw_framebuffer_bits();

    if spec.depth().is_some() && bits[0] == 0 {
      match spec.strictness() {
        Strictness::Strict => return Err(PipelineError::NoDepthBuffer),
        Strictness::Lenient => {
          log::warn!("clearing a depth buffer the draw target does not carry; skipping")
        }
      }
    }

    if spec.stencil().is_some() && bits[1] == 0 {
      match spec.strictness() {
        Strictness::Strict => return Err(PipelineError::NoStencilBuffer),
        Strictness::Lenient => {
          log::warn!("clearing a stencil buffer the draw target does not carry; skipping")
        }
      }
    }

    log::trace!(
      "context {}: clear color {:?} depth {:?} stencil {:?}",
      state.name(),
      spec.color(),
      spec.depth(),
      spec.stencil()
    );

    Ok(())
  }

  unsafe fn apply_render_state(&mut self, render_state: &RenderState) -> Result<(), PipelineError> {
    let state = self.state.borrow();
    let bits = state.draw_framebuffer_bits();
    let strictness = render_state.strictness();

    if render_state.depth_test().is_some() && bits[0] == 0 {
      match strictness {
        Strictness::Strict => return Err(PipelineError::NoDepthBuffer),
        Strictness::Lenient => {
          log::warn!("enabling a depth test without a depth buffer; skipping")
        }
      }
    }

    if render_state.depth_write() == Write::On && bits[0] == 0 {
      match strictness {
        Strictness::Strict => return Err(PipelineError::NoDepthBuffer),
        Strictness::Lenient => {
          log::warn!("enabling depth writes without a depth buffer; skipping")
        }
      }
    }

    if render_state.stencil().is_some() && bits[1] == 0 {
      match strictness {
        Strictness::Strict => return Err(PipelineError::NoStencilBuffer),
        Strictness::Lenient => {
          log::warn!("enabling a stencil test without a stencil buffer; skipping")
        }
      }
    }

    log::trace!("context {}: render state applied", state.name());
    Ok(())
  }

  unsafe fn set_line_width(&mut self, width: f32) -> Result<(), PipelineError> {
    let state = self.state.borrow();
    let range = state.limits().line_width_range;

    if width < range[0] || width > range[1] {
      return Err(PipelineError::LineWidthOutOfRange {
        requested: width,
        range,
      });
    }

    log::trace!("context {}: line width {}", state.name(), width);
    Ok(())
  }

  unsafe fn draw_arrays(
    &mut self,
    vertex_array: &Self::VertexArrayRepr,
    primitive: Primitive,
    first: usize,
    count: usize,
    instances: usize,
  ) {
    let mut state = self.state.borrow_mut();
    state.bind_vertex_array(vertex_array.id);

    log::trace!(
      "context {}: draw {:?}, vertices {}..{}, {} instances",
      state.name(),
      primitive,
      first,
      first + count,
      instances
    );
  }

  unsafe fn draw_elements(
    &mut self,
    vertex_array: &Self::VertexArrayRepr,
    primitive: Primitive,
    count: usize,
    instances: usize,
  ) {
    let mut state = self.state.borrow_mut();
    state.bind_vertex_array(vertex_array.id);

    log::trace!(
      "context {}: draw {:?}, {} indices of {:?}, {} instances",
      state.name(),
      primitive,
      count,
      vertex_array.index_type,
      instances
    );
  }
}
