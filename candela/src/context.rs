//! Graphics context.
//!
//! A [`GraphicsContext`] is the owner of a native driver context. Everything else in this crate
//! is parameterized by the backend type such a context exposes: resources are created through
//! it, and per-frame operations borrow it.

use crate::backend::query::Query as QueryBackend;
use crate::pipeline::Frame;
use crate::query::Query;

/// Owner of a native graphics context.
///
/// # Unsafety
///
/// Implementations promise that the returned backend actually belongs to a live native context
/// and that at most one mutable borrow of it is reachable at a time, which the `&mut self`
/// receivers enforce for safe callers.
pub unsafe trait GraphicsContext {
  /// Backend the context exposes.
  type Backend: ?Sized;

  /// Access the underlying backend.
  fn backend(&mut self) -> &mut Self::Backend;

  /// Start issuing per-frame operations (viewport, clears, render states, draws).
  fn frame(&mut self) -> Frame<Self>
  where
    Self: Sized,
  {
    Frame::new(self)
  }

  /// Query driver identification, version and limits.
  fn query(&mut self) -> Query<Self>
  where
    Self: Sized,
    Self::Backend: QueryBackend,
  {
    Query::new(self)
  }
}
