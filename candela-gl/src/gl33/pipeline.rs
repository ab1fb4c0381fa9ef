//! OpenGL pipeline implementation.

use gl::types::*;
use std::ptr;

use candela::backend::pipeline::Pipeline as PipelineBackend;
use candela::depth_stencil::Write;
use candela::pipeline::{ClearSpec, PipelineError, Primitive};
use candela::render_state::{ColorMask, RenderState, Strictness};
use candela::viewport::Viewport;

use crate::gl33::state::{
  Bind, BlendingState, DepthClamp, DepthTest, FaceCullingState, ScissorState, StencilTestState,
};
use crate::gl33::GL33;

unsafe impl PipelineBackend for GL33 {
  unsafe fn set_viewport(&mut self, viewport: Viewport) {
    let mut state = self.state.borrow_mut();

    match viewport {
      Viewport::Whole => {
        let size = state.draw_framebuffer_size();
        state.set_viewport([0, 0, size[0] as GLint, size[1] as GLint]);
      }

      Viewport::Specific {
        x,
        y,
        width,
        height,
      } => {
        state.set_viewport([x as GLint, y as GLint, width as GLint, height as GLint]);
      }
    }
  }

  unsafe fn clear(&mut self, spec: &ClearSpec) -> Result<(), PipelineError> {
    let mut state = self.state.borrow_mut();
    let bits = state.draw_framebuffer_bits();
    let mut mask = 0;

    // clears are filtered through the write masks; open them before clearing
    if let Some(color) = spec.color() {
      state.set_clear_color(color);
      state.set_color_mask(ColorMask::ALL);
      mask |= gl::COLOR_BUFFER_BIT;
    }

    if let Some(depth) = spec.depth() {
      if bits[0] == 0 {
        match spec.strictness() {
          Strictness::Strict => return Err(PipelineError::NoDepthBuffer),
          Strictness::Lenient => {
            log::warn!("clearing a depth buffer the draw target does not carry; skipping")
          }
        }
      } else {
        state.set_clear_depth(depth);
        state.set_depth_write(Write::On);
        mask |= gl::DEPTH_BUFFER_BIT;
      }
    }

    if let Some(stencil) = spec.stencil() {
      if bits[1] == 0 {
        match spec.strictness() {
          Strictness::Strict => return Err(PipelineError::NoStencilBuffer),
          Strictness::Lenient => {
            log::warn!("clearing a stencil buffer the draw target does not carry; skipping")
          }
        }
      } else {
        state.set_clear_stencil(stencil as GLint);
        state.invalidate_stencil_config();
        gl::StencilMask(0xff);
        mask |= gl::STENCIL_BUFFER_BIT;
      }
    }

    if mask != 0 {
      gl::Clear(mask);
    }

    match state.error_report("clear") {
      Some(reason) => Err(PipelineError::DriverError(reason)),
      None => Ok(()),
    }
  }

  unsafe fn apply_render_state(&mut self, render_state: &RenderState) -> Result<(), PipelineError> {
    let mut state = self.state.borrow_mut();
    let bits = state.draw_framebuffer_bits();
    let strictness = render_state.strictness();

    match render_state.blending() {
      Some(mode) => {
        let rgb = mode.rgb();
        let alpha = mode.alpha();

        state.set_blending_state(BlendingState::On);
        state.set_blending_equations(rgb.equation, alpha.equation);
        state.set_blending_factors(rgb.src, rgb.dst, alpha.src, alpha.dst);
      }

      None => {
        state.set_blending_state(BlendingState::Off);
      }
    }

    state.set_color_mask(render_state.color_mask());

    match render_state.depth_test() {
      Some(_) if bits[0] == 0 => match strictness {
        Strictness::Strict => return Err(PipelineError::NoDepthBuffer),
        Strictness::Lenient => {
          log::warn!("enabling a depth test without a depth buffer; skipping")
        }
      },

      Some(comparison) => {
        state.set_depth_test(DepthTest::On);
        state.set_depth_test_comparison(comparison);
      }

      None => {
        state.set_depth_test(DepthTest::Off);
      }
    }

    match render_state.depth_write() {
      Write::On if bits[0] == 0 => match strictness {
        Strictness::Strict => return Err(PipelineError::NoDepthBuffer),
        Strictness::Lenient => {
          log::warn!("enabling depth writes without a depth buffer; skipping")
        }
      },

      write => {
        state.set_depth_write(write);
      }
    }

    let depth_clamp = if render_state.depth_clamp() {
      DepthClamp::On
    } else {
      DepthClamp::Off
    };
    state.set_depth_clamp(depth_clamp);

    match render_state.stencil() {
      Some(_) if bits[1] == 0 => match strictness {
        Strictness::Strict => return Err(PipelineError::NoStencilBuffer),
        Strictness::Lenient => {
          log::warn!("enabling a stencil test without a stencil buffer; skipping")
        }
      },

      Some(config) => {
        state.set_stencil_test(StencilTestState::On);
        state.set_stencil_config(config);
      }

      None => {
        state.set_stencil_test(StencilTestState::Off);
      }
    }

    match render_state.face_culling() {
      Some(face_culling) => {
        state.set_face_culling_state(FaceCullingState::On);
        state.set_face_culling_order(face_culling.winding);
        state.set_face_culling_mode(face_culling.face);
      }

      None => {
        state.set_face_culling_state(FaceCullingState::Off);
      }
    }

    match render_state.scissor() {
      Some(region) => {
        state.set_scissor_state(ScissorState::On);
        state.set_scissor_region(region);
      }

      None => {
        state.set_scissor_state(ScissorState::Off);
      }
    }

    state.set_polygon_mode(render_state.polygon_mode());

    Ok(())
  }

  unsafe fn set_line_width(&mut self, width: f32) -> Result<(), PipelineError> {
    let mut state = self.state.borrow_mut();
    let range = state.limits().line_width_range;

    if width < range[0] || width > range[1] {
      return Err(PipelineError::LineWidthOutOfRange {
        requested: width,
        range,
      });
    }

    state.set_line_width(width);
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
    state.bind_vertex_array(vertex_array.handle, Bind::Cached);

    let mode = from_primitive(primitive);

    if instances <= 1 {
      gl::DrawArrays(mode, first as GLint, count as GLsizei);
    } else {
      gl::DrawArraysInstanced(mode, first as GLint, count as GLsizei, instances as GLsizei);
    }
  }

  unsafe fn draw_elements(
    &mut self,
    vertex_array: &Self::VertexArrayRepr,
    primitive: Primitive,
    count: usize,
    instances: usize,
  ) {
    let mut state = self.state.borrow_mut();
    state.bind_vertex_array(vertex_array.handle, Bind::Cached);

    let mode = from_primitive(primitive);

    if let Some(index_type) = vertex_array.index_type {
      if instances <= 1 {
        gl::DrawElements(mode, count as GLsizei, index_type, ptr::null());
      } else {
        gl::DrawElementsInstanced(
          mode,
          count as GLsizei,
          index_type,
          ptr::null(),
          instances as GLsizei,
        );
      }
    }
  }
}

#[inline]
fn from_primitive(primitive: Primitive) -> GLenum {
  match primitive {
    Primitive::Points => gl::POINTS,
    Primitive::Lines => gl::LINES,
    Primitive::LineLoop => gl::LINE_LOOP,
    Primitive::LineStrip => gl::LINE_STRIP,
    Primitive::Triangles => gl::TRIANGLES,
    Primitive::TriangleStrip => gl::TRIANGLE_STRIP,
    Primitive::TriangleFan => gl::TRIANGLE_FAN,
  }
}
