//! # candela
//!
//! candela is a typed, state-cached abstraction over OpenGL-style graphics contexts. It sits
//! between your code and the driver and does three things, relentlessly:
//!
//! - **Validate before the driver sees anything.** Texture dimensions, upload sizes, attachment
//!   formats, uniform types, unit limits: everything checkable is checked up front, and
//!   failures come back as typed errors instead of driver error codes discovered later.
//! - **Cache driver state.** Binding points, the active texture unit and render state toggles
//!   are shadowed on the CPU. No operation requires a bind ceremony; the layer binds on demand
//!   and skips the driver call when the cached state already matches.
//! - **Tie resource lifetimes to handles.** Creating a resource hands back an owning value;
//!   dropping it destroys the native object and invalidates whatever cached bindings pointed at
//!   it.
//!
//! # What this crate is, and is not
//!
//! This crate is the backend-agnostic surface: typed wrappers, validation, the format
//! negotiation table and the texture unit allocator. Actual drivers live in backend crates that
//! implement the `unsafe` traits in [`backend`]:
//!
//! - `candela-gl` drives a real OpenGL 3.3 context through the [gl] crate.
//! - `candela-fake` is a driverless software backend that tracks everything in memory, meant
//!   for running tests without a display.
//!
//! There is no windowing here and no shading language DSL; bring your own context and GLSL.
//!
//! # A taste
//!
//! ```ignore
//! let triangle = VertexArrayBuilder::new()
//!   .attribute(VertexAttribute::new(0, 2, AttributeKind::Float), &positions)
//!   .build(&mut ctx)?;
//!
//! let mut frame = ctx.frame();
//! frame.clear(&ClearSpec::new().set_color([0., 0., 0., 1.]))?;
//! frame.apply(&RenderState::default())?;
//! frame.draw_arrays(&triangle, Primitive::Triangles, 0, 3);
//! ```
//!
//! [gl]: https://crates.io/crates/gl

#![deny(missing_docs)]

pub mod backend;
pub mod blending;
pub mod buffer;
pub mod context;
pub mod depth_stencil;
pub mod face_culling;
pub mod formats;
pub mod framebuffer;
pub mod pipeline;
pub mod query;
pub mod render_state;
pub mod scissor;
pub mod shader;
pub mod texture;
pub mod texture_units;
pub mod timer;
pub mod version;
pub mod vertex_array;
pub mod viewport;
