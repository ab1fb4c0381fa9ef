//! Texture formats and the format negotiation table.
//!
//! Every texture carries a [`TextureFormat`] describing how texels are laid out in memory and
//! what the format can be used for. Not every format can back every kind of attachment: color
//! rendering, depth rendering and stencil rendering each admit only a subset, and those subsets
//! are what framebuffer validation negotiates against. The table below is the single source of
//! truth for texel sizes, component counts and renderability.

use std::error;
use std::fmt;

macro_rules! texture_formats {
  ($( $(#[$doc:meta])* $name:ident => { bpp: $bpp:expr, components: $comps:expr, color: $color:expr, depth: $depth:expr, stencil: $stencil:expr, float: $float:expr } ),+ $(,)?) => {
    /// Texel format of a texture.
    ///
    /// The suffix encodes the component layout: a bare number is a normalized unsigned format,
    /// `I` a signed integral format, `UI` an unsigned integral format and `F` a floating-point
    /// format.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub enum TextureFormat {
      $( $(#[$doc])* $name ),+
    }

    impl TextureFormat {
      /// Every format, in declaration order.
      pub const ALL: &'static [TextureFormat] = &[$(TextureFormat::$name),+];

      /// Size in bytes of a single texel.
      pub fn bytes_per_pixel(self) -> usize {
        match self {
          $( TextureFormat::$name => $bpp ),+
        }
      }

      /// Number of components in a single texel.
      pub fn components(self) -> usize {
        match self {
          $( TextureFormat::$name => $comps ),+
        }
      }

      /// Whether the format can back a color attachment.
      ///
      /// One-, two- and four-component formats are color-renderable across drivers; of the
      /// three-component formats only [`TextureFormat::RGB8`] is reliably supported.
      pub fn is_color_renderable(self) -> bool {
        match self {
          $( TextureFormat::$name => $color ),+
        }
      }

      /// Number of depth bits provided by the format, or `0` for non-depth formats.
      pub fn depth_bits(self) -> usize {
        match self {
          $( TextureFormat::$name => $depth ),+
        }
      }

      /// Number of stencil bits provided by the format, or `0` for formats without stencil.
      pub fn stencil_bits(self) -> usize {
        match self {
          $( TextureFormat::$name => $stencil ),+
        }
      }

      /// Whether the format stores floating-point data.
      pub fn is_floating_point(self) -> bool {
        match self {
          $( TextureFormat::$name => $float ),+
        }
      }
    }
  };
}

texture_formats! {
  /// One 8-bit normalized unsigned component.
  R8 => { bpp: 1, components: 1, color: true, depth: 0, stencil: 0, float: false },
  /// One 8-bit signed integral component.
  R8I => { bpp: 1, components: 1, color: true, depth: 0, stencil: 0, float: false },
  /// One 8-bit unsigned integral component.
  R8UI => { bpp: 1, components: 1, color: true, depth: 0, stencil: 0, float: false },
  /// One 16-bit normalized unsigned component.
  R16 => { bpp: 2, components: 1, color: true, depth: 0, stencil: 0, float: false },
  /// One 16-bit floating-point component.
  R16F => { bpp: 2, components: 1, color: true, depth: 0, stencil: 0, float: true },
  /// One 16-bit signed integral component.
  R16I => { bpp: 2, components: 1, color: true, depth: 0, stencil: 0, float: false },
  /// One 16-bit unsigned integral component.
  R16UI => { bpp: 2, components: 1, color: true, depth: 0, stencil: 0, float: false },
  /// One 32-bit floating-point component.
  R32F => { bpp: 4, components: 1, color: true, depth: 0, stencil: 0, float: true },
  /// One 32-bit signed integral component.
  R32I => { bpp: 4, components: 1, color: true, depth: 0, stencil: 0, float: false },
  /// One 32-bit unsigned integral component.
  R32UI => { bpp: 4, components: 1, color: true, depth: 0, stencil: 0, float: false },

  /// Two 8-bit normalized unsigned components.
  RG8 => { bpp: 2, components: 2, color: true, depth: 0, stencil: 0, float: false },
  /// Two 8-bit signed integral components.
  RG8I => { bpp: 2, components: 2, color: true, depth: 0, stencil: 0, float: false },
  /// Two 8-bit unsigned integral components.
  RG8UI => { bpp: 2, components: 2, color: true, depth: 0, stencil: 0, float: false },
  /// Two 16-bit normalized unsigned components.
  RG16 => { bpp: 4, components: 2, color: true, depth: 0, stencil: 0, float: false },
  /// Two 16-bit floating-point components.
  RG16F => { bpp: 4, components: 2, color: true, depth: 0, stencil: 0, float: true },
  /// Two 16-bit signed integral components.
  RG16I => { bpp: 4, components: 2, color: true, depth: 0, stencil: 0, float: false },
  /// Two 16-bit unsigned integral components.
  RG16UI => { bpp: 4, components: 2, color: true, depth: 0, stencil: 0, float: false },
  /// Two 32-bit floating-point components.
  RG32F => { bpp: 8, components: 2, color: true, depth: 0, stencil: 0, float: true },
  /// Two 32-bit signed integral components.
  RG32I => { bpp: 8, components: 2, color: true, depth: 0, stencil: 0, float: false },
  /// Two 32-bit unsigned integral components.
  RG32UI => { bpp: 8, components: 2, color: true, depth: 0, stencil: 0, float: false },

  /// Three 8-bit normalized unsigned components.
  RGB8 => { bpp: 3, components: 3, color: true, depth: 0, stencil: 0, float: false },
  /// Three 8-bit signed integral components.
  RGB8I => { bpp: 3, components: 3, color: false, depth: 0, stencil: 0, float: false },
  /// Three 8-bit unsigned integral components.
  RGB8UI => { bpp: 3, components: 3, color: false, depth: 0, stencil: 0, float: false },
  /// Three 16-bit normalized unsigned components.
  RGB16 => { bpp: 6, components: 3, color: false, depth: 0, stencil: 0, float: false },
  /// Three 16-bit floating-point components.
  RGB16F => { bpp: 6, components: 3, color: false, depth: 0, stencil: 0, float: true },
  /// Three 16-bit signed integral components.
  RGB16I => { bpp: 6, components: 3, color: false, depth: 0, stencil: 0, float: false },
  /// Three 16-bit unsigned integral components.
  RGB16UI => { bpp: 6, components: 3, color: false, depth: 0, stencil: 0, float: false },
  /// Three 32-bit floating-point components.
  RGB32F => { bpp: 12, components: 3, color: false, depth: 0, stencil: 0, float: true },
  /// Three 32-bit signed integral components.
  RGB32I => { bpp: 12, components: 3, color: false, depth: 0, stencil: 0, float: false },
  /// Three 32-bit unsigned integral components.
  RGB32UI => { bpp: 12, components: 3, color: false, depth: 0, stencil: 0, float: false },

  /// Four 8-bit normalized unsigned components.
  RGBA8 => { bpp: 4, components: 4, color: true, depth: 0, stencil: 0, float: false },
  /// Four 8-bit signed integral components.
  RGBA8I => { bpp: 4, components: 4, color: true, depth: 0, stencil: 0, float: false },
  /// Four 8-bit unsigned integral components.
  RGBA8UI => { bpp: 4, components: 4, color: true, depth: 0, stencil: 0, float: false },
  /// Four 16-bit normalized unsigned components.
  RGBA16 => { bpp: 8, components: 4, color: true, depth: 0, stencil: 0, float: false },
  /// Four 16-bit floating-point components.
  RGBA16F => { bpp: 8, components: 4, color: true, depth: 0, stencil: 0, float: true },
  /// Four 16-bit signed integral components.
  RGBA16I => { bpp: 8, components: 4, color: true, depth: 0, stencil: 0, float: false },
  /// Four 16-bit unsigned integral components.
  RGBA16UI => { bpp: 8, components: 4, color: true, depth: 0, stencil: 0, float: false },
  /// Four 32-bit floating-point components.
  RGBA32F => { bpp: 16, components: 4, color: true, depth: 0, stencil: 0, float: true },
  /// Four 32-bit signed integral components.
  RGBA32I => { bpp: 16, components: 4, color: true, depth: 0, stencil: 0, float: false },
  /// Four 32-bit unsigned integral components.
  RGBA32UI => { bpp: 16, components: 4, color: true, depth: 0, stencil: 0, float: false },
  /// Four normalized unsigned components packed as 10.10.10.2.
  RGBA1010102 => { bpp: 4, components: 4, color: true, depth: 0, stencil: 0, float: false },

  /// 16-bit depth.
  Depth16 => { bpp: 2, components: 1, color: false, depth: 16, stencil: 0, float: false },
  /// 24-bit depth.
  Depth24 => { bpp: 4, components: 1, color: false, depth: 24, stencil: 0, float: false },
  /// 24-bit depth packed with 8-bit stencil.
  Depth24Stencil8 => { bpp: 4, components: 2, color: false, depth: 24, stencil: 8, float: false },
  /// 32-bit floating-point depth.
  Depth32F => { bpp: 4, components: 1, color: false, depth: 32, stencil: 0, float: true },
}

impl TextureFormat {
  /// Whether the format can back a depth attachment.
  pub fn is_depth_renderable(self) -> bool {
    self.depth_bits() > 0
  }

  /// Whether the format can back a stencil attachment.
  pub fn is_stencil_renderable(self) -> bool {
    self.stencil_bits() > 0
  }

  /// Check that the format can back a color attachment.
  pub fn check_color_renderable(self) -> Result<(), FormatError> {
    if self.is_color_renderable() {
      Ok(())
    } else {
      Err(FormatError::NotColorRenderable(self))
    }
  }

  /// Check that the format can back a depth attachment.
  pub fn check_depth_renderable(self) -> Result<(), FormatError> {
    if self.is_depth_renderable() {
      Ok(())
    } else {
      Err(FormatError::NotDepthRenderable(self))
    }
  }

  /// Check that the format can back a stencil attachment.
  pub fn check_stencil_renderable(self) -> Result<(), FormatError> {
    if self.is_stencil_renderable() {
      Ok(())
    } else {
      Err(FormatError::NotStencilRenderable(self))
    }
  }
}

/// A format was used for a purpose it cannot serve.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormatError {
  /// The format cannot back a color attachment.
  NotColorRenderable(TextureFormat),

  /// The format cannot back a depth attachment.
  NotDepthRenderable(TextureFormat),

  /// The format cannot back a stencil attachment.
  NotStencilRenderable(TextureFormat),
}

impl fmt::Display for FormatError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      FormatError::NotColorRenderable(format) => {
        write!(f, "format {:?} is not color-renderable", format)
      }

      FormatError::NotDepthRenderable(format) => {
        write!(f, "format {:?} is not depth-renderable", format)
      }

      FormatError::NotStencilRenderable(format) => {
        write!(f, "format {:?} is not stencil-renderable", format)
      }
    }
  }
}

impl error::Error for FormatError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_is_complete() {
    assert_eq!(TextureFormat::ALL.len(), 45);
  }

  #[test]
  fn texel_sizes() {
    assert_eq!(TextureFormat::R8.bytes_per_pixel(), 1);
    assert_eq!(TextureFormat::RG16UI.bytes_per_pixel(), 4);
    assert_eq!(TextureFormat::RGB16F.bytes_per_pixel(), 6);
    assert_eq!(TextureFormat::RGBA32F.bytes_per_pixel(), 16);
    assert_eq!(TextureFormat::RGBA1010102.bytes_per_pixel(), 4);
    assert_eq!(TextureFormat::Depth16.bytes_per_pixel(), 2);
    assert_eq!(TextureFormat::Depth24Stencil8.bytes_per_pixel(), 4);
  }

  #[test]
  fn component_counts() {
    assert_eq!(TextureFormat::R32F.components(), 1);
    assert_eq!(TextureFormat::RG8.components(), 2);
    assert_eq!(TextureFormat::RGB32I.components(), 3);
    assert_eq!(TextureFormat::RGBA8.components(), 4);
    assert_eq!(TextureFormat::Depth24.components(), 1);
    assert_eq!(TextureFormat::Depth24Stencil8.components(), 2);
  }

  #[test]
  fn color_renderability() {
    for format in TextureFormat::ALL {
      let expected = match format {
        // The only reliably color-renderable three-component format.
        TextureFormat::RGB8 => true,
        f if f.components() == 3 => false,
        f if f.is_depth_renderable() => false,
        _ => true,
      };

      assert_eq!(format.is_color_renderable(), expected, "format {:?}", format);
    }
  }

  #[test]
  fn depth_renderability() {
    let depth = [
      (TextureFormat::Depth16, 16),
      (TextureFormat::Depth24, 24),
      (TextureFormat::Depth24Stencil8, 24),
      (TextureFormat::Depth32F, 32),
    ];

    for (format, bits) in depth {
      assert!(format.is_depth_renderable());
      assert_eq!(format.depth_bits(), bits);
      assert!(format.check_depth_renderable().is_ok());
    }

    assert!(!TextureFormat::RGBA8.is_depth_renderable());
    assert_eq!(
      TextureFormat::RGBA8.check_depth_renderable(),
      Err(FormatError::NotDepthRenderable(TextureFormat::RGBA8))
    );
  }

  #[test]
  fn stencil_renderability() {
    for format in TextureFormat::ALL {
      if *format == TextureFormat::Depth24Stencil8 {
        assert_eq!(format.stencil_bits(), 8);
        assert!(format.is_stencil_renderable());
      } else {
        assert_eq!(format.stencil_bits(), 0);
        assert!(!format.is_stencil_renderable());
      }
    }
  }

  #[test]
  fn floating_point_classification() {
    assert!(TextureFormat::R16F.is_floating_point());
    assert!(TextureFormat::RGBA32F.is_floating_point());
    assert!(TextureFormat::Depth32F.is_floating_point());
    assert!(!TextureFormat::R8.is_floating_point());
    assert!(!TextureFormat::RGBA32UI.is_floating_point());
    assert!(!TextureFormat::Depth24.is_floating_point());
  }
}
