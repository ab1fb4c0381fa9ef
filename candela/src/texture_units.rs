//! Texture unit allocation.
//!
//! Devices expose a fixed set of texture units. [`TextureUnits`] hands them out through a stack
//! of _unit contexts_: each [`push`](TextureUnits::push) opens a context that starts with its
//! parent’s bindings, each bind inside it claims a free unit, and
//! [`pop`](TextureUnits::pop) releases everything the context claimed, restoring the parent’s
//! view of the units.
//!
//! Only the innermost context may bind, unbind, push or pop. Contexts are represented by
//! [`UnitContext`] tokens; using a token that is not the innermost one is an error, as is
//! pushing past the stack limit or binding when every unit is taken.
//!
//! The returned unit indices are what sampler uniforms consume, through
//! [`UniformValue::TextureUnit`](crate::shader::UniformValue::TextureUnit).

use std::error;
use std::fmt;
use std::marker::PhantomData;

use crate::backend::query::{Query as QueryBackend, QueryError};
use crate::backend::texture::Texture as TextureBackend;
use crate::context::GraphicsContext;
use crate::texture::{Texture2D, TextureCube};

/// Token for one live frame of the unit context stack.
///
/// Tokens are not cloneable; [`TextureUnits::pop`] consumes the token of the context it closes.
#[derive(Debug)]
pub struct UnitContext {
  depth: usize,
}

impl UnitContext {
  /// Stack depth of this context; the root is at depth 0.
  pub fn depth(&self) -> usize {
    self.depth
  }
}

#[derive(Clone, Debug)]
struct Frame {
  occupied: Vec<bool>,
  own: Vec<bool>,
}

impl Frame {
  fn root(max_units: u32) -> Self {
    Frame {
      occupied: vec![false; max_units as usize],
      own: vec![false; max_units as usize],
    }
  }

  fn child(&self) -> Self {
    Frame {
      occupied: self.occupied.clone(),
      own: vec![false; self.occupied.len()],
    }
  }

  fn free_unit(&self) -> Option<u32> {
    self.occupied.iter().position(|occupied| !occupied).map(|i| i as u32)
  }
}

/// Stack-shaped allocator for the device’s texture units.
#[derive(Debug)]
pub struct TextureUnits<B>
where
  B: ?Sized + TextureBackend,
{
  stack: Vec<Frame>,
  max_units: u32,
  max_depth: usize,
  _backend: PhantomData<B>,
}

impl<B> TextureUnits<B>
where
  B: ?Sized + TextureBackend,
{
  /// Create an allocator for a device with `max_units` texture units.
  ///
  /// `max_depth` bounds the unit context stack, root included.
  pub fn new(max_units: u32, max_depth: usize) -> Self {
    TextureUnits {
      stack: vec![Frame::root(max_units)],
      max_units,
      max_depth: max_depth.max(1),
      _backend: PhantomData,
    }
  }

  /// Create an allocator sized from the unit count `ctx` advertises.
  ///
  /// Snapshots [`Limits::max_texture_units`](crate::version::Limits::max_texture_units) once;
  /// `max_depth` bounds the stack as in [`TextureUnits::new`].
  pub fn for_context<C>(ctx: &mut C, max_depth: usize) -> Result<Self, QueryError>
  where
    C: GraphicsContext<Backend = B>,
    B: QueryBackend,
  {
    let limits = ctx.backend().limits()?;
    Ok(Self::new(limits.max_texture_units as u32, max_depth))
  }

  /// Number of texture units the device exposes.
  pub fn max_units(&self) -> u32 {
    self.max_units
  }

  /// Current depth of the context stack, root included.
  pub fn depth(&self) -> usize {
    self.stack.len()
  }

  /// Number of units not claimed by any live context.
  pub fn free_units(&self) -> u32 {
    let frame = &self.stack[self.stack.len() - 1];
    frame.occupied.iter().filter(|occupied| !**occupied).count() as u32
  }

  /// Token for the root context.
  ///
  /// Valid for binding only while no child context is live.
  pub fn root(&self) -> UnitContext {
    UnitContext { depth: 0 }
  }

  /// Open a child context on top of `parent`.
  ///
  /// The child starts with the parent’s bindings and claims fresh units on top of them.
  pub fn push(&mut self, parent: &UnitContext) -> Result<UnitContext, TextureUnitError> {
    self.check_current(parent)?;

    if self.stack.len() >= self.max_depth {
      return Err(TextureUnitError::StackLimitReached {
        limit: self.max_depth,
      });
    }

    let child = self.stack[self.stack.len() - 1].child();
    self.stack.push(child);

    Ok(UnitContext {
      depth: self.stack.len() - 1,
    })
  }

  /// Close `context`, unbinding every unit it claimed.
  pub fn pop<C>(&mut self, ctx: &mut C, context: UnitContext) -> Result<(), TextureUnitError>
  where
    C: GraphicsContext<Backend = B>,
  {
    self.check_current(&context)?;

    if context.depth == 0 {
      return Err(TextureUnitError::RootContext);
    }

    if let Some(frame) = self.stack.pop() {
      for (unit, own) in frame.own.iter().enumerate() {
        if *own {
          unsafe { ctx.backend().unbind_unit(unit as u32) };
        }
      }
    }

    Ok(())
  }

  /// Bind a 2D texture to a free unit of `context` and hand the unit index back.
  pub fn bind_2d<C>(
    &mut self,
    ctx: &mut C,
    context: &UnitContext,
    texture: &Texture2D<B>,
  ) -> Result<u32, TextureUnitError>
  where
    C: GraphicsContext<Backend = B>,
  {
    self.bind_repr(ctx, context, &texture.repr)
  }

  /// Bind a cubemap texture to a free unit of `context` and hand the unit index back.
  pub fn bind_cube<C>(
    &mut self,
    ctx: &mut C,
    context: &UnitContext,
    texture: &TextureCube<B>,
  ) -> Result<u32, TextureUnitError>
  where
    C: GraphicsContext<Backend = B>,
  {
    self.bind_repr(ctx, context, &texture.repr)
  }

  /// Release a unit claimed by `context`.
  pub fn unbind<C>(
    &mut self,
    ctx: &mut C,
    context: &UnitContext,
    unit: u32,
  ) -> Result<(), TextureUnitError>
  where
    C: GraphicsContext<Backend = B>,
  {
    self.check_current(context)?;

    if unit >= self.max_units {
      return Err(TextureUnitError::OutOfRange {
        unit,
        max_units: self.max_units,
      });
    }

    let depth = self.stack.len() - 1;
    let frame = &mut self.stack[depth];

    if !frame.own[unit as usize] {
      return Err(TextureUnitError::NotClaimedHere(unit));
    }

    frame.own[unit as usize] = false;
    frame.occupied[unit as usize] = false;

    unsafe { ctx.backend().unbind_unit(unit) };
    Ok(())
  }

  fn bind_repr<C>(
    &mut self,
    ctx: &mut C,
    context: &UnitContext,
    repr: &B::TextureRepr,
  ) -> Result<u32, TextureUnitError>
  where
    C: GraphicsContext<Backend = B>,
  {
    self.check_current(context)?;

    let depth = self.stack.len() - 1;
    let unit = match self.stack[depth].free_unit() {
      Some(unit) => unit,
      None => {
        return Err(TextureUnitError::Exhausted {
          max_units: self.max_units,
        })
      }
    };

    unsafe { ctx.backend().bind_texture(unit, repr)? };

    let frame = &mut self.stack[depth];
    frame.occupied[unit as usize] = true;
    frame.own[unit as usize] = true;

    Ok(unit)
  }

  fn check_current(&self, context: &UnitContext) -> Result<(), TextureUnitError> {
    let current = self.stack.len() - 1;

    if context.depth == current {
      Ok(())
    } else {
      Err(TextureUnitError::ContextNotCurrent {
        depth: context.depth,
        current,
      })
    }
  }
}

/// Texture unit error.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TextureUnitError {
  /// Every unit is claimed.
  Exhausted {
    /// Number of units the device exposes.
    max_units: u32,
  },

  /// Pushing would exceed the stack limit.
  StackLimitReached {
    /// Stack limit, root included.
    limit: usize,
  },

  /// The token does not name the innermost context.
  ContextNotCurrent {
    /// Depth of the token.
    depth: usize,

    /// Depth of the innermost context.
    current: usize,
  },

  /// The root context cannot be popped.
  RootContext,

  /// The unit index is beyond what the device exposes.
  OutOfRange {
    /// The offending unit index.
    unit: u32,

    /// Number of units the device exposes.
    max_units: u32,
  },

  /// The unit was not claimed by the innermost context.
  NotClaimedHere(u32),

  /// The texture belongs to another graphics context.
  ContextMismatch,
}

impl fmt::Display for TextureUnitError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      TextureUnitError::Exhausted { max_units } => write!(
        f,
        "texture units exhausted (required 1, available 0 of {})",
        max_units
      ),

      TextureUnitError::StackLimitReached { limit } => {
        write!(f, "unit context stack limit reached ({})", limit)
      }

      TextureUnitError::ContextNotCurrent { depth, current } => write!(
        f,
        "unit context at depth {} is not the innermost (depth {})",
        depth, current
      ),

      TextureUnitError::RootContext => f.write_str("the root unit context cannot be popped"),

      TextureUnitError::OutOfRange { unit, max_units } => {
        write!(f, "unit {} out of range (device has {})", unit, max_units)
      }

      TextureUnitError::NotClaimedHere(unit) => {
        write!(f, "unit {} was not claimed by the innermost context", unit)
      }

      TextureUnitError::ContextMismatch => {
        f.write_str("texture belongs to another graphics context")
      }
    }
  }
}

impl error::Error for TextureUnitError {}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::formats::TextureFormat;
  use crate::texture::{CubeFace, Region, Sampler, TextureError};

  struct NoopBackend;

  unsafe impl TextureBackend for NoopBackend {
    type TextureRepr = ();

    unsafe fn new_texture_2d(
      &mut self,
      _: u32,
      _: u32,
      _: TextureFormat,
      _: &Sampler,
    ) -> Result<Self::TextureRepr, TextureError> {
      Ok(())
    }

    unsafe fn new_texture_cube(
      &mut self,
      _: u32,
      _: TextureFormat,
      _: &Sampler,
    ) -> Result<Self::TextureRepr, TextureError> {
      Ok(())
    }

    unsafe fn destroy_texture(_: &mut Self::TextureRepr) {}

    unsafe fn upload_2d(_: &mut Self::TextureRepr, _: Region, _: &[u8]) -> Result<(), TextureError> {
      Ok(())
    }

    unsafe fn upload_cube(
      _: &mut Self::TextureRepr,
      _: CubeFace,
      _: Region,
      _: &[u8],
    ) -> Result<(), TextureError> {
      Ok(())
    }

    unsafe fn read_2d(_: &Self::TextureRepr) -> Result<Vec<u8>, TextureError> {
      Ok(Vec::new())
    }

    unsafe fn read_cube(_: &Self::TextureRepr, _: CubeFace) -> Result<Vec<u8>, TextureError> {
      Ok(Vec::new())
    }

    unsafe fn bind_texture(&mut self, _: u32, _: &Self::TextureRepr) -> Result<(), TextureUnitError> {
      Ok(())
    }

    unsafe fn unbind_unit(&mut self, _: u32) {}
  }

  #[test]
  fn stack_limit_is_enforced() {
    let mut units = TextureUnits::<NoopBackend>::new(4, 2);
    let root = units.root();

    let child = units.push(&root).unwrap();
    assert_eq!(child.depth(), 1);

    match units.push(&child) {
      Err(TextureUnitError::StackLimitReached { limit: 2 }) => (),
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn only_the_innermost_context_operates() {
    let mut units = TextureUnits::<NoopBackend>::new(4, 8);
    let root = units.root();
    let _child = units.push(&root).unwrap();

    match units.push(&root) {
      Err(TextureUnitError::ContextNotCurrent {
        depth: 0,
        current: 1,
      }) => (),
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn free_units_shrink_with_claims() {
    let units = TextureUnits::<NoopBackend>::new(4, 8);
    assert_eq!(units.free_units(), 4);
    assert_eq!(units.max_units(), 4);
  }
}
