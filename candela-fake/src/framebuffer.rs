//! Software framebuffer implementation.

use std::cell::RefCell;
use std::rc::Rc;

use candela::backend::framebuffer::Framebuffer as FramebufferBackend;
use candela::framebuffer::{BlitBuffers, BlitFilter, FramebufferError, IncompleteReason};
use candela::texture::Region;

use crate::state::FakeState;
use crate::FakeBackend;

/// Software framebuffer.
///
/// Id zero stands for the default framebuffer of the context.
#[derive(Debug)]
pub struct FramebufferRepr {
  pub(crate) id: u64,
  size: [u32; 2],
  color_count: usize,
  depth_bits: usize,
  stencil_bits: usize,
  state: Rc<RefCell<FakeState>>,
}

unsafe impl FramebufferBackend for FakeBackend {
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

    let foreign = color_attachments
      .iter()
      .map(|(_, texture)| *texture)
      .chain(depth_attachment)
      .any(|texture| !Rc::ptr_eq(&self.state, &texture.state));
    if foreign {
      return Err(FramebufferError::DriverError(
        "an attachment belongs to another context".to_owned(),
      ));
    }

    let depth_bits = depth_attachment.map_or(0, |texture| texture.format.depth_bits());
    let stencil_bits = depth_attachment.map_or(0, |texture| texture.format.stencil_bits());

    let id = state.fresh_id();
    state.bind_draw_framebuffer(id, size, [depth_bits, stencil_bits]);

    log::debug!(
      "context {}: framebuffer {}: allocated {}×{}, {} color attachments, depth/stencil bits {}/{}",
      state.name(),
      id,
      size[0],
      size[1],
      color_attachments.len(),
      depth_bits,
      stencil_bits
    );

    drop(state);

    Ok(FramebufferRepr {
      id,
      size,
      color_count: color_attachments.len(),
      depth_bits,
      stencil_bits,
      state: self.state.clone(),
    })
  }

  unsafe fn validate_framebuffer(
    framebuffer: Self::FramebufferRepr,
  ) -> Result<Self::FramebufferRepr, FramebufferError> {
    if framebuffer.color_count == 0 && framebuffer.depth_bits == 0 && framebuffer.stencil_bits == 0
    {
      return Err(FramebufferError::Incomplete(
        IncompleteReason::MissingAttachment,
      ));
    }

    Ok(framebuffer)
  }

  unsafe fn destroy_framebuffer(framebuffer: &mut Self::FramebufferRepr) {
    // id zero is the default framebuffer; there is nothing to delete
    if framebuffer.id == 0 {
      return;
    }

    let mut state = framebuffer.state.borrow_mut();
    state.forget_framebuffer(framebuffer.id);
    log::debug!(
      "context {}: framebuffer {}: destroyed",
      state.name(),
      framebuffer.id
    );
  }

  unsafe fn back_buffer(
    &mut self,
    size: [u32; 2],
  ) -> Result<Self::FramebufferRepr, FramebufferError> {
    let bits = self.state.borrow().back_buffer_bits();

    Ok(FramebufferRepr {
      id: 0,
      size,
      color_count: 1,
      depth_bits: bits[0],
      stencil_bits: bits[1],
      state: self.state.clone(),
    })
  }

  unsafe fn bind_draw(framebuffer: &Self::FramebufferRepr) {
    framebuffer.state.borrow_mut().bind_draw_framebuffer(
      framebuffer.id,
      framebuffer.size,
      [framebuffer.depth_bits, framebuffer.stencil_bits],
    );
  }

  unsafe fn bind_read(framebuffer: &Self::FramebufferRepr) {
    framebuffer
      .state
      .borrow_mut()
      .bind_read_framebuffer(framebuffer.id);
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
    let state = self.state.borrow();

    log::trace!(
      "context {}: blit {:?} -> {:?} ({:?}, {:?})",
      state.name(),
      src,
      dst,
      buffers,
      filter
    );

    Ok(())
  }
}
