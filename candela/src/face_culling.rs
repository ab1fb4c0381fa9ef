//! Face culling configuration.
//!
//! Face culling drops triangles early based on their winding order on screen. The winding that
//! counts as front-facing and the set of faces to drop are both configurable.

/// Face culling setup.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FaceCulling {
  /// Winding order describing front faces.
  pub winding: FaceWinding,
  /// Faces to cull.
  pub face: Face,
}

impl FaceCulling {
  /// Create a new [`FaceCulling`].
  pub fn new(winding: FaceWinding, face: Face) -> Self {
    FaceCulling { winding, face }
  }
}

impl Default for FaceCulling {
  /// Counter-clockwise front faces and back-face culling.
  fn default() -> Self {
    FaceCulling::new(FaceWinding::CounterClockwise, Face::Back)
  }
}

/// Winding order qualifying a triangle as front-facing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FaceWinding {
  /// Clockwise triangles are front-facing.
  Clockwise,

  /// Counter-clockwise triangles are front-facing.
  CounterClockwise,
}

/// A selection of faces.
///
/// Besides culling, this selection also addresses the per-face halves of the stencil
/// configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Face {
  /// Front faces.
  Front,

  /// Back faces.
  Back,

  /// Both front and back faces.
  FrontAndBack,
}
