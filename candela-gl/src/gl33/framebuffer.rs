//! OpenGL framebuffer implementation.

use gl::types::*;
use std::cell::RefCell;
use std::rc::Rc;

use candela::backend::framebuffer::Framebuffer as FramebufferBackend;
use candela::framebuffer::{BlitBuffers, BlitFilter, FramebufferError, IncompleteReason};
use candela::texture::Region;

use crate::gl33::state::GLState;
use crate::gl33::GL33;

/// OpenGL framebuffer.
///
/// Handle zero stands for the default framebuffer of the native context.
#[derive(Debug)]
pub struct FramebufferRepr {
  pub(crate) handle: GLuint,
  size: [u32; 2],
  depth_bits: usize,
  stencil_bits: usize,
  state: Rc<RefCell<GLState>>,
}

unsafe impl FramebufferBackend for GL33 {
  type FramebufferRepr = FramebufferRepr;

  unsafe fn new_framebuffer(
    &mut self,
    size: [u32; 2],
    color_attachments: &[(usize, &Self::TextureRepr)],
    depth_attachment: Option<&Self::TextureRepr>,
  ) -> Result<Self::FramebufferRepr, FramebufferError> {
    let mut state = self.state.borrow_mut();

    let max = state.limits().max_color_attachments;
    if color_attachments.len() > max {
      return Err(FramebufferError::TooManyColorAttachments {
        requested: color_attachments.len(),
        max,
      });
    }

    // attachment points are capped as well; points arrive sorted
    if let Some(&(point, _)) = color_attachments.last() {
      if point >= max {
        return Err(FramebufferError::TooManyColorAttachments {
          requested: point + 1,
          max,
        });
      }
    }

    let depth_bits = depth_attachment.map_or(0, |texture| texture.format.depth_bits());
    let stencil_bits = depth_attachment.map_or(0, |texture| texture.format.stencil_bits());

    let mut handle: GLuint = 0;
    gl::GenFramebuffers(1, &mut handle);

    state.bind_draw_framebuffer(handle, size, [depth_bits, stencil_bits]);

    if color_attachments.is_empty() {
      // depth-only target; without this the completeness check rejects it
      gl::DrawBuffer(gl::NONE);
      gl::ReadBuffer(gl::NONE);
    } else {
      for &(point, texture) in color_attachments {
        gl::FramebufferTexture2D(
          gl::DRAW_FRAMEBUFFER,
          gl::COLOR_ATTACHMENT0 + point as GLenum,
          texture.target,
          texture.handle,
          0,
        );
      }

      // declare the list of color buffers drawn to
      let draw_buffers: Vec<GLenum> = color_attachments
        .iter()
        .map(|&(point, _)| gl::COLOR_ATTACHMENT0 + point as GLenum)
        .collect();
      gl::DrawBuffers(draw_buffers.len() as GLsizei, draw_buffers.as_ptr());
    }

    if let Some(texture) = depth_attachment {
      let attachment = if stencil_bits > 0 {
        gl::DEPTH_STENCIL_ATTACHMENT
      } else {
        gl::DEPTH_ATTACHMENT
      };

      gl::FramebufferTexture2D(
        gl::DRAW_FRAMEBUFFER,
        attachment,
        texture.target,
        texture.handle,
        0,
      );
    }

    if let Some(reason) = state.error_report("framebuffer creation") {
      state.forget_framebuffer(handle);
      gl::DeleteFramebuffers(1, &handle);
      return Err(FramebufferError::DriverError(reason));
    }

    drop(state);

    Ok(FramebufferRepr {
      handle,
      size,
      depth_bits,
      stencil_bits,
      state: self.state.clone(),
    })
  }

  unsafe fn validate_framebuffer(
    framebuffer: Self::FramebufferRepr,
  ) -> Result<Self::FramebufferRepr, FramebufferError> {
    framebuffer.state.borrow_mut().bind_draw_framebuffer(
      framebuffer.handle,
      framebuffer.size,
      [framebuffer.depth_bits, framebuffer.stencil_bits],
    );

    match framebuffer_status() {
      Ok(()) => Ok(framebuffer),

      Err(err) => {
        framebuffer
          .state
          .borrow_mut()
          .forget_framebuffer(framebuffer.handle);
        gl::DeleteFramebuffers(1, &framebuffer.handle);
        Err(err)
      }
    }
  }

  unsafe fn destroy_framebuffer(framebuffer: &mut Self::FramebufferRepr) {
    // handle zero is the default framebuffer; there is nothing to delete
    if framebuffer.handle != 0 {
      framebuffer
        .state
        .borrow_mut()
        .forget_framebuffer(framebuffer.handle);
      gl::DeleteFramebuffers(1, &framebuffer.handle);
    }
  }

  unsafe fn back_buffer(&mut self, size: [u32; 2]) -> Result<Self::FramebufferRepr, FramebufferError> {
    let bits = self.state.borrow().back_buffer_bits();

    Ok(FramebufferRepr {
      handle: 0,
      size,
      depth_bits: bits[0],
      stencil_bits: bits[1],
      state: self.state.clone(),
    })
  }

  unsafe fn bind_draw(framebuffer: &Self::FramebufferRepr) {
    framebuffer.state.borrow_mut().bind_draw_framebuffer(
      framebuffer.handle,
      framebuffer.size,
      [framebuffer.depth_bits, framebuffer.stencil_bits],
    );
  }

  unsafe fn bind_read(framebuffer: &Self::FramebufferRepr) {
    framebuffer
      .state
      .borrow_mut()
      .bind_read_framebuffer(framebuffer.handle);
  }

  unsafe fn depth_bits(framebuffer: &Self::FramebufferRepr) -> usize {
    framebuffer.depth_bits
  }

  unsafe fn stencil_bits(framebuffer: &Self::FramebufferRepr) -> usize {
    framebuffer.stencil_bits
  }

  unsafe fn blit(
    &mut self,
    src: Region,
    dst: Region,
    buffers: BlitBuffers,
    filter: BlitFilter,
  ) -> Result<(), FramebufferError> {
    let mut mask = 0;
    if buffers.color {
      mask |= gl::COLOR_BUFFER_BIT;
    }
    if buffers.depth {
      mask |= gl::DEPTH_BUFFER_BIT;
    }
    if buffers.stencil {
      mask |= gl::STENCIL_BUFFER_BIT;
    }

    let gl_filter = match filter {
      BlitFilter::Nearest => gl::NEAREST,
      BlitFilter::Linear => gl::LINEAR,
    };

    gl::BlitFramebuffer(
      src.x as GLint,
      src.y as GLint,
      (src.x + src.width) as GLint,
      (src.y + src.height) as GLint,
      dst.x as GLint,
      dst.y as GLint,
      (dst.x + dst.width) as GLint,
      (dst.y + dst.height) as GLint,
      mask,
      gl_filter,
    );

    match self.state.borrow().error_report("framebuffer blit") {
      Some(reason) => Err(FramebufferError::DriverError(reason)),
      None => Ok(()),
    }
  }
}

unsafe fn framebuffer_status() -> Result<(), FramebufferError> {
  let status = gl::CheckFramebufferStatus(gl::DRAW_FRAMEBUFFER);

  match status {
    gl::FRAMEBUFFER_COMPLETE => Ok(()),
    gl::FRAMEBUFFER_UNDEFINED => Err(FramebufferError::Incomplete(IncompleteReason::Undefined)),
    gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => Err(FramebufferError::Incomplete(
      IncompleteReason::IncompleteAttachment,
    )),
    gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => Err(FramebufferError::Incomplete(
      IncompleteReason::MissingAttachment,
    )),
    gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => Err(FramebufferError::Incomplete(
      IncompleteReason::IncompleteDrawBuffer,
    )),
    gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => Err(FramebufferError::Incomplete(
      IncompleteReason::IncompleteReadBuffer,
    )),
    gl::FRAMEBUFFER_UNSUPPORTED => Err(FramebufferError::Incomplete(IncompleteReason::Unsupported)),
    gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => Err(FramebufferError::Incomplete(
      IncompleteReason::IncompleteMultisample,
    )),
    gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => Err(FramebufferError::Incomplete(
      IncompleteReason::IncompleteLayerTargets,
    )),
    _ => Err(FramebufferError::DriverError(format!(
      "unknown framebuffer status: 0x{:x}",
      status
    ))),
  }
}
