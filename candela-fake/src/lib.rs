//! Driverless software backend for candela.
//!
//! This crate exports a backend for [candela](https://crates.io/crates/candela) that talks to
//! no driver at all: buffers and textures live in ordinary memory, shader programs reflect
//! their uniforms by scanning the source text, and draws only check and record state. It exists
//! so the whole public surface can be exercised in tests without a native context.
//!
//! Unlike a real driver, a [`FakeContext`] also knows which context a resource was created on,
//! so handing a texture to the wrong context is a detectable error instead of undefined
//! behavior. Any number of contexts may live on one thread.
//!
//! ```
//! use candela::context::GraphicsContext as _;
//! use candela_fake::FakeContext;
//!
//! let mut ctx = FakeContext::new("main");
//! let limits = ctx.query().limits().unwrap();
//! assert!(limits.max_texture_units >= 1);
//! ```

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

use candela::context::GraphicsContext;

pub use crate::state::FakeConfig;
use crate::state::FakeState;

/// The software backend.
///
/// Obtained through [`FakeContext`]; everything it tracks lives in process memory.
#[derive(Debug)]
pub struct FakeBackend {
  pub(crate) state: Rc<RefCell<FakeState>>,
}

/// A software graphics context.
///
/// Each context owns an independent [`FakeBackend`]; resources are tied to the context that
/// created them and using them elsewhere is reported as a context mismatch.
#[derive(Debug)]
pub struct FakeContext {
  backend: FakeBackend,
  name: String,
}

impl FakeContext {
  /// Create a context with the default device properties.
  ///
  /// `name` identifies the context in log output.
  pub fn new<N>(name: N) -> Self
  where
    N: Into<String>,
  {
    Self::with_config(name, FakeConfig::default())
  }

  /// Create a context with specific device properties.
  pub fn with_config<N>(name: N, config: FakeConfig) -> Self
  where
    N: Into<String>,
  {
    let name = name.into();
    let state = FakeState::new(name.clone(), config);

    FakeContext {
      backend: FakeBackend {
        state: Rc::new(RefCell::new(state)),
      },
      name,
    }
  }

  /// Name of this context.
  pub fn name(&self) -> &str {
    &self.name
  }
}

unsafe impl GraphicsContext for FakeContext {
  type Backend = FakeBackend;

  fn backend(&mut self) -> &mut Self::Backend {
    &mut self.backend
  }
}
