//! Framebuffers.
//!
//! A [`Framebuffer`] is a render target assembled from texture attachments. The builder
//! negotiates attachment formats against the renderability table before the driver sees them,
//! requires every attachment to share one size, and finishes with the driver’s own completeness
//! check; an incomplete framebuffer surfaces as [`IncompleteReason`] instead of a handle.
//!
//! The default framebuffer of the native context is reachable with
//! [`Framebuffer::back_buffer`].

use std::error;
use std::fmt;

use crate::backend::framebuffer::Framebuffer as FramebufferBackend;
use crate::context::GraphicsContext;
use crate::formats::FormatError;
use crate::texture::{Region, Texture2D};

/// Why the driver judged a framebuffer incomplete.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IncompleteReason {
  /// The framebuffer does not exist for the driver.
  Undefined,

  /// An attachment is unusable as attached.
  IncompleteAttachment,

  /// No image is attached at all.
  MissingAttachment,

  /// A draw buffer points at an empty attachment point.
  IncompleteDrawBuffer,

  /// The read buffer points at an empty attachment point.
  IncompleteReadBuffer,

  /// The attachment combination is beyond the implementation.
  Unsupported,

  /// Attachments disagree on multisampling.
  IncompleteMultisample,

  /// Attachments disagree on layering.
  IncompleteLayerTargets,
}

impl fmt::Display for IncompleteReason {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      IncompleteReason::Undefined => f.write_str("undefined framebuffer"),
      IncompleteReason::IncompleteAttachment => f.write_str("incomplete attachment"),
      IncompleteReason::MissingAttachment => f.write_str("missing attachment"),
      IncompleteReason::IncompleteDrawBuffer => f.write_str("incomplete draw buffer"),
      IncompleteReason::IncompleteReadBuffer => f.write_str("incomplete read buffer"),
      IncompleteReason::Unsupported => f.write_str("unsupported attachment combination"),
      IncompleteReason::IncompleteMultisample => f.write_str("incomplete multisample setup"),
      IncompleteReason::IncompleteLayerTargets => f.write_str("incomplete layer targets"),
    }
  }
}

/// Which buffers a blit copies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct BlitBuffers {
  /// Copy the color buffer.
  pub color: bool,

  /// Copy the depth buffer.
  pub depth: bool,

  /// Copy the stencil buffer.
  pub stencil: bool,
}

impl BlitBuffers {
  /// Color only.
  pub const COLOR: BlitBuffers = BlitBuffers {
    color: true,
    depth: false,
    stencil: false,
  };

  /// Depth only.
  pub const DEPTH: BlitBuffers = BlitBuffers {
    color: false,
    depth: true,
    stencil: false,
  };

  /// Stencil only.
  pub const STENCIL: BlitBuffers = BlitBuffers {
    color: false,
    depth: false,
    stencil: true,
  };

  /// Whether no buffer is selected.
  pub fn is_empty(self) -> bool {
    !(self.color || self.depth || self.stencil)
  }
}

/// Filtering applied when a blit scales.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BlitFilter {
  /// Nearest texel.
  Nearest,

  /// Linear blend. Only valid for color-only blits.
  Linear,
}

/// A handle on a framebuffer.
#[derive(Debug)]
pub struct Framebuffer<B>
where
  B: ?Sized + FramebufferBackend,
{
  pub(crate) repr: B::FramebufferRepr,
  size: [u32; 2],
  color_points: Vec<usize>,
  has_depth: bool,
}

impl<B> Framebuffer<B>
where
  B: ?Sized + FramebufferBackend,
{
  /// The default framebuffer of the native context.
  ///
  /// `size` is the current size of the surface the context renders to; the layer cannot query
  /// it portably, so the windowing side provides it.
  pub fn back_buffer<C>(ctx: &mut C, size: [u32; 2]) -> Result<Self, FramebufferError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let repr = unsafe { ctx.backend().back_buffer(size)? };

    Ok(Framebuffer {
      repr,
      size,
      color_points: vec![0],
      has_depth: true,
    })
  }

  /// Width and height in pixels.
  pub fn size(&self) -> [u32; 2] {
    self.size
  }

  /// Width in pixels.
  pub fn width(&self) -> u32 {
    self.size[0]
  }

  /// Height in pixels.
  pub fn height(&self) -> u32 {
    self.size[1]
  }

  /// Attachment points holding a color attachment, in ascending order.
  pub fn color_points(&self) -> &[usize] {
    &self.color_points
  }

  /// Whether a depth attachment is present.
  pub fn has_depth(&self) -> bool {
    self.has_depth
  }

  /// Depth bits of the depth attachment, `0` without one.
  pub fn depth_bits(&self) -> usize {
    unsafe { B::depth_bits(&self.repr) }
  }

  /// Stencil bits of the depth/stencil attachment, `0` without one.
  pub fn stencil_bits(&self) -> usize {
    unsafe { B::stencil_bits(&self.repr) }
  }

  /// Copy a region of this framebuffer onto a region of `target`.
  ///
  /// Depth and stencil copies require [`BlitFilter::Nearest`]. Both regions must sit inside
  /// their framebuffer.
  pub fn blit_to<C>(
    &self,
    ctx: &mut C,
    target: &Framebuffer<B>,
    src: Region,
    dst: Region,
    buffers: BlitBuffers,
    filter: BlitFilter,
  ) -> Result<(), FramebufferError>
  where
    C: GraphicsContext<Backend = B>,
  {
    check_blit_filter(buffers, filter)?;
    check_blit_region(src, self.size)?;
    check_blit_region(dst, target.size)?;

    unsafe {
      B::bind_read(&self.repr);
      B::bind_draw(&target.repr);
      ctx.backend().blit(src, dst, buffers, filter)
    }
  }
}

impl<B> Drop for Framebuffer<B>
where
  B: ?Sized + FramebufferBackend,
{
  fn drop(&mut self) {
    unsafe { B::destroy_framebuffer(&mut self.repr) }
  }
}

/// Declarative builder for [`Framebuffer`].
pub struct FramebufferBuilder<'a, B>
where
  B: ?Sized + FramebufferBackend,
{
  colors: Vec<(usize, &'a Texture2D<B>)>,
  depth: Option<&'a Texture2D<B>>,
}

impl<'a, B> FramebufferBuilder<'a, B>
where
  B: ?Sized + FramebufferBackend,
{
  /// Start an empty description.
  pub fn new() -> Self {
    FramebufferBuilder {
      colors: Vec::new(),
      depth: None,
    }
  }

  /// Attach `texture` as the color attachment at `point`.
  ///
  /// Attaching twice at the same point replaces the first attachment.
  pub fn color(mut self, point: usize, texture: &'a Texture2D<B>) -> Self {
    self.colors.retain(|&(p, _)| p != point);
    self.colors.push((point, texture));
    self
  }

  /// Attach `texture` as the depth attachment.
  pub fn depth(mut self, texture: &'a Texture2D<B>) -> Self {
    self.depth = Some(texture);
    self
  }

  /// Negotiate formats, create the native object and run the completeness check.
  pub fn build<C>(self, ctx: &mut C) -> Result<Framebuffer<B>, FramebufferError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let mut size = None;

    for &(_, texture) in &self.colors {
      texture.format().check_color_renderable()?;
      check_attachment_size(&mut size, texture)?;
    }

    if let Some(texture) = self.depth {
      texture.format().check_depth_renderable()?;
      check_attachment_size(&mut size, texture)?;
    }

    let size = size.ok_or(FramebufferError::NoAttachments)?;

    let mut colors: Vec<(usize, &B::TextureRepr)> = self
      .colors
      .iter()
      .map(|&(point, texture)| (point, &texture.repr))
      .collect();
    colors.sort_by_key(|&(point, _)| point);

    let depth = self.depth.map(|texture| &texture.repr);

    let repr = unsafe {
      let repr = ctx.backend().new_framebuffer(size, &colors, depth)?;
      B::validate_framebuffer(repr)?
    };

    Ok(Framebuffer {
      repr,
      size,
      color_points: colors.iter().map(|&(point, _)| point).collect(),
      has_depth: self.depth.is_some(),
    })
  }
}

impl<'a, B> Default for FramebufferBuilder<'a, B>
where
  B: ?Sized + FramebufferBackend,
{
  fn default() -> Self {
    Self::new()
  }
}

fn check_attachment_size<B>(
  size: &mut Option<[u32; 2]>,
  texture: &Texture2D<B>,
) -> Result<(), FramebufferError>
where
  B: ?Sized + FramebufferBackend,
{
  let texture_size = texture.size();

  match *size {
    None => {
      *size = Some(texture_size);
      Ok(())
    }

    Some(expected) if expected == texture_size => Ok(()),

    Some(expected) => Err(FramebufferError::AttachmentSizeMismatch {
      expected,
      actual: texture_size,
    }),
  }
}

fn check_blit_filter(buffers: BlitBuffers, filter: BlitFilter) -> Result<(), FramebufferError> {
  if filter == BlitFilter::Linear && (buffers.depth || buffers.stencil) {
    Err(FramebufferError::BlitDepthStencilRequiresNearest)
  } else {
    Ok(())
  }
}

fn check_blit_region(region: Region, size: [u32; 2]) -> Result<(), FramebufferError> {
  let x_end = region.x as u64 + region.width as u64;
  let y_end = region.y as u64 + region.height as u64;

  if x_end > size[0] as u64 || y_end > size[1] as u64 {
    Err(FramebufferError::BlitRegionOutOfBounds { region, size })
  } else {
    Ok(())
  }
}

/// Framebuffer error.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FramebufferError {
  /// The driver judged the framebuffer incomplete.
  Incomplete(IncompleteReason),

  /// An attachment format failed renderability negotiation.
  UnsupportedAttachment(FormatError),

  /// The description carried no attachment, so no size can be derived.
  NoAttachments,

  /// An attachment does not share the framebuffer size.
  AttachmentSizeMismatch {
    /// Size of the first attachment.
    expected: [u32; 2],

    /// Size of the offending attachment.
    actual: [u32; 2],
  },

  /// More color attachments than the device supports.
  TooManyColorAttachments {
    /// Number of color attachments requested.
    requested: usize,

    /// Number of color attachments the device supports.
    max: usize,
  },

  /// A depth or stencil blit asked for linear filtering.
  BlitDepthStencilRequiresNearest,

  /// A blit region does not fit in its framebuffer.
  BlitRegionOutOfBounds {
    /// The offending region.
    region: Region,

    /// Size of the framebuffer.
    size: [u32; 2],
  },

  /// The driver reported an error.
  DriverError(String),
}

impl fmt::Display for FramebufferError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      FramebufferError::Incomplete(reason) => write!(f, "incomplete framebuffer: {}", reason),

      FramebufferError::UnsupportedAttachment(ref err) => {
        write!(f, "unsupported attachment: {}", err)
      }

      FramebufferError::NoAttachments => f.write_str("framebuffer with no attachment"),

      FramebufferError::AttachmentSizeMismatch { expected, actual } => write!(
        f,
        "attachment size mismatch (expected {}x{}, got {}x{})",
        expected[0], expected[1], actual[0], actual[1]
      ),

      FramebufferError::TooManyColorAttachments { requested, max } => write!(
        f,
        "too many color attachments (requested {}, device supports {})",
        requested, max
      ),

      FramebufferError::BlitDepthStencilRequiresNearest => {
        f.write_str("depth and stencil blits require the nearest filter")
      }

      FramebufferError::BlitRegionOutOfBounds { region, size } => write!(
        f,
        "blit region {} out of bounds of a {}x{} framebuffer",
        region, size[0], size[1]
      ),

      FramebufferError::DriverError(ref reason) => {
        write!(f, "driver framebuffer error: {}", reason)
      }
    }
  }
}

impl error::Error for FramebufferError {}

impl From<FormatError> for FramebufferError {
  fn from(err: FormatError) -> Self {
    FramebufferError::UnsupportedAttachment(err)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn depth_blits_reject_linear_filtering() {
    assert!(check_blit_filter(BlitBuffers::COLOR, BlitFilter::Linear).is_ok());
    assert!(check_blit_filter(BlitBuffers::DEPTH, BlitFilter::Nearest).is_ok());

    assert_eq!(
      check_blit_filter(BlitBuffers::DEPTH, BlitFilter::Linear),
      Err(FramebufferError::BlitDepthStencilRequiresNearest)
    );
    assert_eq!(
      check_blit_filter(BlitBuffers::STENCIL, BlitFilter::Linear),
      Err(FramebufferError::BlitDepthStencilRequiresNearest)
    );
  }

  #[test]
  fn blit_regions_must_fit() {
    let region = Region {
      x: 4,
      y: 0,
      width: 8,
      height: 8,
    };

    assert!(check_blit_region(region, [12, 8]).is_ok());
    assert!(check_blit_region(region, [8, 8]).is_err());
  }

  #[test]
  fn buffer_selections() {
    assert!(BlitBuffers::COLOR.color);
    assert!(!BlitBuffers::COLOR.depth);
    assert!(BlitBuffers::DEPTH.depth);
    assert!(BlitBuffers::STENCIL.stencil);

    let none = BlitBuffers {
      color: false,
      depth: false,
      stencil: false,
    };
    assert!(none.is_empty());
  }
}
