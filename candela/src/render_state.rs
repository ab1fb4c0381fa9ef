//! Aggregate render state.
//!
//! A [`RenderState`] gathers every fixed-function toggle a draw depends on: blending, color
//! masking, depth and stencil testing, face culling, scissoring and the polygon rasterization
//! mode. Applying one replaces the whole previous state; the backend’s cache turns unchanged
//! settings into no-ops.
//!
//! # Strictness
//!
//! Enabling a depth or stencil test only makes sense against a framebuffer that carries the
//! corresponding bits. With [`Strictness::Strict`] (the default), such an application fails;
//! with [`Strictness::Lenient`] the setting is skipped silently. Disabling a test never fails
//! either way.

use crate::blending::BlendingMode;
use crate::depth_stencil::{Comparison, StencilState, Write};
use crate::face_culling::FaceCulling;
use crate::scissor::ScissorRegion;

/// Which color channels a draw may write.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ColorMask {
  /// Allow writes to the red channel.
  pub red: bool,

  /// Allow writes to the green channel.
  pub green: bool,

  /// Allow writes to the blue channel.
  pub blue: bool,

  /// Allow writes to the alpha channel.
  pub alpha: bool,
}

impl ColorMask {
  /// Every channel writable.
  pub const ALL: ColorMask = ColorMask {
    red: true,
    green: true,
    blue: true,
    alpha: true,
  };

  /// No channel writable.
  pub const NONE: ColorMask = ColorMask {
    red: false,
    green: false,
    blue: false,
    alpha: false,
  };
}

impl Default for ColorMask {
  fn default() -> Self {
    ColorMask::ALL
  }
}

/// How polygons are rasterized.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PolygonMode {
  /// Filled polygons.
  Fill,

  /// Outlines only.
  Line,

  /// Vertices only.
  Point,
}

/// How depth and stencil settings behave against a framebuffer without the matching bits.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Strictness {
  /// Enabling a test against a framebuffer without the matching bits is an error.
  Strict,

  /// Such settings are skipped silently.
  Lenient,
}

/// GPU render state.
///
/// Constructed with [`RenderState::default`] and refined with the `set_*` methods.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderState {
  blending: Option<BlendingMode>,
  color_mask: ColorMask,
  depth_test: Option<Comparison>,
  depth_write: Write,
  depth_clamp: bool,
  stencil: Option<StencilState>,
  face_culling: Option<FaceCulling>,
  scissor: Option<ScissorRegion>,
  polygon_mode: PolygonMode,
  strictness: Strictness,
}

impl RenderState {
  /// Blending configuration, if enabled.
  pub fn blending(&self) -> Option<BlendingMode> {
    self.blending
  }

  /// Change the blending configuration. `None` disables blending.
  pub fn set_blending<B>(self, blending: B) -> Self
  where
    B: Into<Option<BlendingMode>>,
  {
    Self {
      blending: blending.into(),
      ..self
    }
  }

  /// Color channel mask.
  pub fn color_mask(&self) -> ColorMask {
    self.color_mask
  }

  /// Change the color channel mask.
  pub fn set_color_mask(self, color_mask: ColorMask) -> Self {
    Self { color_mask, ..self }
  }

  /// Depth test comparison, if the test is enabled.
  pub fn depth_test(&self) -> Option<Comparison> {
    self.depth_test
  }

  /// Change the depth test. `None` disables it.
  pub fn set_depth_test<D>(self, depth_test: D) -> Self
  where
    D: Into<Option<Comparison>>,
  {
    Self {
      depth_test: depth_test.into(),
      ..self
    }
  }

  /// Whether the depth buffer is written.
  pub fn depth_write(&self) -> Write {
    self.depth_write
  }

  /// Change depth buffer writing.
  pub fn set_depth_write(self, depth_write: Write) -> Self {
    Self {
      depth_write,
      ..self
    }
  }

  /// Whether depth values are clamped to the viewport range instead of clipped.
  pub fn depth_clamp(&self) -> bool {
    self.depth_clamp
  }

  /// Change depth clamping.
  pub fn set_depth_clamp(self, depth_clamp: bool) -> Self {
    Self {
      depth_clamp,
      ..self
    }
  }

  /// Stencil configuration, if the test is enabled.
  pub fn stencil(&self) -> Option<StencilState> {
    self.stencil
  }

  /// Change the stencil configuration. `None` disables the test; a bare
  /// [`StencilTest`](crate::depth_stencil::StencilTest) applies to both faces.
  pub fn set_stencil<S>(self, stencil: S) -> Self
  where
    S: Into<Option<StencilState>>,
  {
    Self {
      stencil: stencil.into(),
      ..self
    }
  }

  /// Face culling configuration, if enabled.
  pub fn face_culling(&self) -> Option<FaceCulling> {
    self.face_culling
  }

  /// Change face culling. `None` disables it.
  pub fn set_face_culling<F>(self, face_culling: F) -> Self
  where
    F: Into<Option<FaceCulling>>,
  {
    Self {
      face_culling: face_culling.into(),
      ..self
    }
  }

  /// Scissor region, if scissoring is enabled.
  pub fn scissor(&self) -> Option<ScissorRegion> {
    self.scissor
  }

  /// Change the scissor region. `None` disables scissoring.
  pub fn set_scissor<S>(self, scissor: S) -> Self
  where
    S: Into<Option<ScissorRegion>>,
  {
    Self {
      scissor: scissor.into(),
      ..self
    }
  }

  /// Polygon rasterization mode.
  pub fn polygon_mode(&self) -> PolygonMode {
    self.polygon_mode
  }

  /// Change the polygon rasterization mode.
  pub fn set_polygon_mode(self, polygon_mode: PolygonMode) -> Self {
    Self {
      polygon_mode,
      ..self
    }
  }

  /// How missing depth/stencil bits are treated.
  pub fn strictness(&self) -> Strictness {
    self.strictness
  }

  /// Change how missing depth/stencil bits are treated.
  pub fn set_strictness(self, strictness: Strictness) -> Self {
    Self { strictness, ..self }
  }
}

impl Default for RenderState {
  /// No blending, every channel writable, depth test [`Comparison::Less`] with writes on, no
  /// stencil, no culling, no scissor, filled polygons, strict.
  fn default() -> Self {
    RenderState {
      blending: None,
      color_mask: ColorMask::ALL,
      depth_test: Some(Comparison::Less),
      depth_write: Write::On,
      depth_clamp: false,
      stencil: None,
      face_culling: None,
      scissor: None,
      polygon_mode: PolygonMode::Fill,
      strictness: Strictness::Strict,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::blending::{Blending, Equation, Factor};
  use crate::depth_stencil::StencilTest;

  #[test]
  fn default_state() {
    let state = RenderState::default();

    assert_eq!(state.blending(), None);
    assert_eq!(state.color_mask(), ColorMask::ALL);
    assert_eq!(state.depth_test(), Some(Comparison::Less));
    assert_eq!(state.depth_write(), Write::On);
    assert!(!state.depth_clamp());
    assert_eq!(state.stencil(), None);
    assert_eq!(state.face_culling(), None);
    assert_eq!(state.scissor(), None);
    assert_eq!(state.polygon_mode(), PolygonMode::Fill);
    assert_eq!(state.strictness(), Strictness::Strict);
  }

  #[test]
  fn setters_compose() {
    let blending = Blending {
      equation: Equation::Additive,
      src: Factor::SrcAlpha,
      dst: Factor::SrcAlphaComplement,
    };

    let state = RenderState::default()
      .set_blending(BlendingMode::from(blending))
      .set_depth_test(None)
      .set_stencil(StencilState::from(StencilTest::new()))
      .set_strictness(Strictness::Lenient);

    assert_eq!(state.blending(), Some(BlendingMode::from(blending)));
    assert_eq!(state.depth_test(), None);
    assert!(state.stencil().is_some());
    assert_eq!(state.strictness(), Strictness::Lenient);
  }
}
