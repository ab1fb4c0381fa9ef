//! Framebuffer backend interface.

use crate::backend::texture::Texture;
use crate::framebuffer::{BlitBuffers, BlitFilter, FramebufferError};
use crate::texture::Region;

/// Framebuffer backend.
///
/// # Call contracts
///
/// - Attachment formats have been negotiated by the builder (color-renderable colors,
///   depth-renderable depth, count within the device limit); the driver-side completeness
///   check still runs in `validate_framebuffer`.
/// - `blit` filters have been validated (no linear filtering of depth or stencil).
pub unsafe trait Framebuffer: Texture {
  /// Representation of a framebuffer.
  type FramebufferRepr;

  /// Allocate a framebuffer and attach the given textures.
  ///
  /// Color attachments come as `(attachment index, texture)` pairs.
  unsafe fn new_framebuffer(
    &mut self,
    size: [u32; 2],
    color_attachments: &[(usize, &Self::TextureRepr)],
    depth_attachment: Option<&Self::TextureRepr>,
  ) -> Result<Self::FramebufferRepr, FramebufferError>;

  /// Run the driver’s completeness check on a freshly allocated framebuffer.
  unsafe fn validate_framebuffer(
    framebuffer: Self::FramebufferRepr,
  ) -> Result<Self::FramebufferRepr, FramebufferError>;

  /// Destroy the native object. Attachments are not destroyed with it. Cached draw/read
  /// bindings of it must be invalidated.
  unsafe fn destroy_framebuffer(framebuffer: &mut Self::FramebufferRepr);

  /// The default framebuffer.
  unsafe fn back_buffer(&mut self, size: [u32; 2]) -> Result<Self::FramebufferRepr, FramebufferError>;

  /// Make the framebuffer the draw target.
  unsafe fn bind_draw(framebuffer: &Self::FramebufferRepr);

  /// Make the framebuffer the read source.
  unsafe fn bind_read(framebuffer: &Self::FramebufferRepr);

  /// Depth bits of the framebuffer’s depth attachment, `0` if none.
  unsafe fn depth_bits(framebuffer: &Self::FramebufferRepr) -> usize;

  /// Stencil bits of the framebuffer’s depth/stencil attachment, `0` if none.
  unsafe fn stencil_bits(framebuffer: &Self::FramebufferRepr) -> usize;

  /// Copy `src` of the bound read framebuffer onto `dst` of the bound draw framebuffer.
  unsafe fn blit(
    &mut self,
    src: Region,
    dst: Region,
    buffers: BlitBuffers,
    filter: BlitFilter,
  ) -> Result<(), FramebufferError>;
}
