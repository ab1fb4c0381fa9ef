//! OpenGL backends for candela.
//!
//! This crate exports [OpenGL](https://www.khronos.org/opengl/) backends for
//! [candela](https://crates.io/crates/candela). The only backend type for now is [`GL33`],
//! which targets core OpenGL 3.3 contexts. Construct one once a context has been made current
//! and its function pointers loaded (for instance with `gl::load_with`), then wrap it in
//! whatever windowing glue implements [`GraphicsContext`](candela::context::GraphicsContext).

pub mod gl33;

pub use gl33::GL33;
