//! Blending configuration.
//!
//! Blending is the fixed-function stage mixing the color coming out of the fragment processing
//! with the color already present in the bound framebuffer. How both colors are combined is
//! driven by an [`Equation`] and two [`Factor`]s, optionally split between the RGB and alpha
//! channels.

/// A complete blending configuration for one channel group.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Blending {
  /// Blending equation to use.
  pub equation: Equation,
  /// Factor applied to the source color.
  pub src: Factor,
  /// Factor applied to the destination color.
  pub dst: Factor,
}

impl Default for Blending {
  /// `Additive` equation with `One` source factor and `Zero` destination factor, which replaces
  /// the destination color with the source color.
  fn default() -> Self {
    Blending {
      equation: Equation::Additive,
      src: Factor::One,
      dst: Factor::Zero,
    }
  }
}

/// How blending applies to the RGB and alpha channels.
///
/// Drivers support configuring the RGB channels and the alpha channel separately. When the
/// distinction doesn’t matter, use [`BlendingMode::Combined`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlendingMode {
  /// The same blending configuration for the RGB channels and the alpha channel.
  Combined(Blending),

  /// Distinct blending configurations for the RGB channels and the alpha channel.
  Separate {
    /// Blending configuration for the RGB channels.
    rgb: Blending,
    /// Blending configuration for the alpha channel.
    alpha: Blending,
  },
}

impl BlendingMode {
  /// Blending configuration applied to the RGB channels.
  pub fn rgb(&self) -> Blending {
    match *self {
      BlendingMode::Combined(b) => b,
      BlendingMode::Separate { rgb, .. } => rgb,
    }
  }

  /// Blending configuration applied to the alpha channel.
  pub fn alpha(&self) -> Blending {
    match *self {
      BlendingMode::Combined(b) => b,
      BlendingMode::Separate { alpha, .. } => alpha,
    }
  }
}

impl From<Blending> for BlendingMode {
  fn from(b: Blending) -> Self {
    BlendingMode::Combined(b)
  }
}

/// Blending equation.
///
/// Used to determine how blending factors are combined.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Equation {
  /// `Additive` represents the following blending equation:
  ///
  /// > `blended = src * src_k + dst * dst_k`
  Additive,

  /// `Subtract` represents the following blending equation:
  ///
  /// > `blended = src * src_k - dst * dst_k`
  Subtract,

  /// Because subtracting is not commutative, `ReverseSubtract` represents the following additional
  /// blending equation:
  ///
  /// > `blended = dst * dst_k - src * src_k`
  ReverseSubtract,

  /// `Min` represents the following blending equation:
  ///
  /// > `blended = min(src, dst)`
  Min,

  /// `Max` represents the following blending equation:
  ///
  /// > `blended = max(src, dst)`
  Max,
}

/// Blending factor. Pick one for the source and one for the destination color.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Factor {
  /// `1 * color = color`.
  One,

  /// `0 * color = 0`.
  Zero,

  /// `src * color`.
  SrcColor,

  /// `(1 - src) * color`.
  SrcColorComplement,

  /// `dst * color`.
  DestColor,

  /// `(1 - dst) * color`.
  DestColorComplement,

  /// `src_α * color`.
  SrcAlpha,

  /// `(1 - src_α) * color`.
  SrcAlphaComplement,

  /// `dst_α * color`.
  DstAlpha,

  /// `(1 - dst_α) * color`.
  DstAlphaComplement,

  /// `min(src_α, 1 - dst_α)`.
  SrcAlphaSaturate,
}
