//! OpenGL 3.3 backend.
//!
//! [`GL33`] implements every backend trait of [`candela::backend`] on top of a core OpenGL 3.3
//! context. All driver traffic goes through a shared [`GLState`], a cache of the context state
//! that skips redundant binds and redundant state changes; resource representations keep a
//! reference-counted handle on it so that destructors can fix the cache up when native objects
//! die.

mod buffer;
mod framebuffer;
mod pipeline;
mod query;
mod shader;
mod state;
mod texture;
mod timer;
mod vertex_array;

use std::cell::RefCell;
use std::rc::Rc;

pub use self::state::{GLState, StateQueryError};

/// The OpenGL 3.3 backend.
#[derive(Debug)]
pub struct GL33 {
  pub(crate) state: Rc<RefCell<GLState>>,
}

impl GL33 {
  /// Create the backend from the current context.
  ///
  /// Fails if the graphics state has already been acquired on this thread or if the context
  /// does not implement core OpenGL 3.3.
  pub fn new() -> Result<Self, StateQueryError> {
    Self::with_debug(false)
  }

  /// Create the backend with driver error checking enabled.
  ///
  /// The driver error queue is drained after every operation and anything found is reported as
  /// an error of that operation. Each check is a driver roundtrip, so this constructor is meant
  /// for development; [`GL33::new`] performs no such checks.
  pub fn new_debug() -> Result<Self, StateQueryError> {
    Self::with_debug(true)
  }

  fn with_debug(debug: bool) -> Result<Self, StateQueryError> {
    GLState::new(debug).map(|state| GL33 {
      state: Rc::new(RefCell::new(state)),
    })
  }

  /// Get access to the underlying graphics state.
  ///
  /// # Safety
  ///
  /// Changing the context behind the backend’s back desynchronizes the cache from the driver.
  /// After foreign code has touched the context, call [`GLState::invalidate_all`] so that the
  /// next operations re-issue their driver calls.
  pub unsafe fn state(&self) -> &Rc<RefCell<GLState>> {
    &self.state
  }
}
