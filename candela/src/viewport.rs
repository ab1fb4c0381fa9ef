//! Viewport definition.

/// The area of the bound framebuffer that rendering maps to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Viewport {
  /// The whole viewport is used, matching the size of the bound framebuffer.
  Whole,

  /// A specific region, in pixels from the lower-left corner of the framebuffer.
  Specific {
    /// X of the lower-left corner.
    x: u32,

    /// Y of the lower-left corner.
    y: u32,

    /// Width of the viewport.
    width: u32,

    /// Height of the viewport.
    height: u32,
  },
}
