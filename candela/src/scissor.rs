//! Scissor test region.

/// The region outside of which the scissor test discards fragments.
///
/// Coordinates are expressed in pixels from the lower-left corner of the framebuffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScissorRegion {
  /// X of the lower-left corner.
  pub x: u32,

  /// Y of the lower-left corner.
  pub y: u32,

  /// Width of the region.
  pub width: u32,

  /// Height of the region.
  pub height: u32,
}
