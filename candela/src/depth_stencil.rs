//! Depth and stencil test configuration.
//!
//! Both tests compare an incoming fragment against the value already stored in the depth or
//! stencil buffer of the bound framebuffer, using a [`Comparison`]. The stencil test
//! additionally runs one of eight [`StencilOp`]s depending on which of the tests passed.

/// Comparison to perform for depth and stencil tests.
///
/// `a` is the incoming fragment’s value and `b` the value from the buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Comparison {
  /// Test never succeeds.
  Never,

  /// Test always succeeds.
  Always,

  /// Test succeeds if `a == b`.
  Equal,

  /// Test succeeds if `a != b`.
  NotEqual,

  /// Test succeeds if `a < b`.
  Less,

  /// Test succeeds if `a <= b`.
  LessOrEqual,

  /// Test succeeds if `a > b`.
  Greater,

  /// Test succeeds if `a >= b`.
  GreaterOrEqual,
}

/// Whether writes to a buffer are enabled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Write {
  /// Writes are enabled.
  On,

  /// Writes are disabled.
  Off,
}

/// Operation to perform on the stencil buffer once the stencil and depth tests have resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StencilOp {
  /// Keep the current value.
  Keep,

  /// Set the stencil value to zero.
  Zero,

  /// Replace the stencil value with the reference value.
  Replace,

  /// Increment the stencil value, clamping at the maximum.
  Increment,

  /// Increment the stencil value, wrapping to zero past the maximum.
  IncrementWrap,

  /// Decrement the stencil value, clamping at zero.
  Decrement,

  /// Decrement the stencil value, wrapping to the maximum below zero.
  DecrementWrap,

  /// Bitwise-invert the stencil value.
  Invert,
}

/// Stencil test configuration for one face of the geometry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StencilTest {
  /// Comparison to apply between the reference value and the stencil buffer.
  pub comparison: Comparison,

  /// Reference value compared against the stencil buffer.
  pub reference: u8,

  /// Mask ANDed with both the reference and the stored value before comparing.
  pub test_mask: u8,

  /// Mask selecting which stencil bits may be written.
  pub write_mask: u8,

  /// Operation run when the stencil test fails.
  pub on_stencil_fail: StencilOp,

  /// Operation run when the stencil test passes but the depth test fails.
  pub on_depth_fail: StencilOp,

  /// Operation run when both tests pass.
  pub on_pass: StencilOp,
}

impl StencilTest {
  /// Stencil test that always passes, writes every bit and keeps the buffer untouched.
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the comparison.
  pub fn set_comparison(self, comparison: Comparison) -> Self {
    StencilTest { comparison, ..self }
  }

  /// Set the reference value.
  pub fn set_reference(self, reference: u8) -> Self {
    StencilTest { reference, ..self }
  }

  /// Set the test mask.
  pub fn set_test_mask(self, test_mask: u8) -> Self {
    StencilTest { test_mask, ..self }
  }

  /// Set the write mask.
  pub fn set_write_mask(self, write_mask: u8) -> Self {
    StencilTest { write_mask, ..self }
  }

  /// Set the operation run when the stencil test fails.
  pub fn on_stencil_fail(self, op: StencilOp) -> Self {
    StencilTest {
      on_stencil_fail: op,
      ..self
    }
  }

  /// Set the operation run when the depth test fails.
  pub fn on_depth_fail(self, op: StencilOp) -> Self {
    StencilTest {
      on_depth_fail: op,
      ..self
    }
  }

  /// Set the operation run when both tests pass.
  pub fn on_pass(self, op: StencilOp) -> Self {
    StencilTest { on_pass: op, ..self }
  }
}

impl Default for StencilTest {
  fn default() -> Self {
    StencilTest {
      comparison: Comparison::Always,
      reference: 0,
      test_mask: 0xff,
      write_mask: 0xff,
      on_stencil_fail: StencilOp::Keep,
      on_depth_fail: StencilOp::Keep,
      on_pass: StencilOp::Keep,
    }
  }
}

/// Stencil configuration for both faces of the geometry.
///
/// Converting a single [`StencilTest`] into a `StencilState` applies it to both faces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StencilState {
  /// Test applied to front-facing fragments.
  pub front: StencilTest,

  /// Test applied to back-facing fragments.
  pub back: StencilTest,
}

impl From<StencilTest> for StencilState {
  fn from(test: StencilTest) -> Self {
    StencilState {
      front: test,
      back: test,
    }
  }
}

impl From<StencilTest> for Option<StencilState> {
  fn from(test: StencilTest) -> Self {
    Some(test.into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stencil_test_defaults_keep_everything() {
    let st = StencilTest::new();

    assert_eq!(st.comparison, Comparison::Always);
    assert_eq!(st.test_mask, 0xff);
    assert_eq!(st.write_mask, 0xff);
    assert_eq!(st.on_stencil_fail, StencilOp::Keep);
    assert_eq!(st.on_depth_fail, StencilOp::Keep);
    assert_eq!(st.on_pass, StencilOp::Keep);
  }

  #[test]
  fn stencil_test_setters_compose() {
    let st = StencilTest::new()
      .set_comparison(Comparison::Equal)
      .set_reference(1)
      .on_pass(StencilOp::Replace);

    assert_eq!(st.comparison, Comparison::Equal);
    assert_eq!(st.reference, 1);
    assert_eq!(st.on_pass, StencilOp::Replace);
    assert_eq!(st.on_depth_fail, StencilOp::Keep);
  }
}
