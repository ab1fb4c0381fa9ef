//! Backend interfacing.
//!
//! Backend crates implement the traits found in the submodules of this module, one per driver
//! concern. A trait method receives either the backend itself (resource creation, binds,
//! per-frame work) or a _representation_ value (everything scoped to one resource). The `*Repr`
//! associated types are those representations: a backend picks whatever it needs to talk to its
//! driver, and the public wrapper types in the crate root carry them around.
//!
//! All traits are `unsafe` to implement: an implementation vouches that it upholds the
//! documented call contracts (arguments pre-validated by the wrappers, representations only
//! ever handed back to the backend that created them).

pub mod buffer;
pub mod framebuffer;
pub mod pipeline;
pub mod query;
pub mod shader;
pub mod texture;
pub mod timer;
pub mod vertex_array;

/// The whole OpenGL 3.3-level surface.
///
/// Code generic over a complete backend bounds on this trait instead of spelling out the
/// individual concerns. It is implemented automatically.
pub trait GL33Backend:
  self::pipeline::Pipeline
  + self::shader::Shader
  + self::framebuffer::Framebuffer
  + self::query::Query
  + self::timer::Timer
{
}

impl<B> GL33Backend for B where
  B: self::pipeline::Pipeline
    + self::shader::Shader
    + self::framebuffer::Framebuffer
    + self::query::Query
    + self::timer::Timer
{
}
