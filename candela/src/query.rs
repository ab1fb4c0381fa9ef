//! Driver introspection.
//!
//! [`Query`] answers who the driver is (author, name, version), which extensions it advertises
//! and which integer limits it enforces. Backends gather these once at construction, so
//! querying is cheap and repeatable.

use crate::backend::query::{Query as QueryBackend, QueryError};
use crate::context::GraphicsContext;
use crate::version::{Extensions, Limits, Version};

/// Introspection surface of a context.
///
/// Obtained with [`GraphicsContext::query`].
pub struct Query<'a, C>
where
  C: ?Sized,
{
  ctx: &'a mut C,
}

impl<'a, C> Query<'a, C>
where
  C: GraphicsContext,
  C::Backend: QueryBackend,
{
  pub(crate) fn new(ctx: &'a mut C) -> Self {
    Query { ctx }
  }

  /// The implementation author, most of the time referred to as “vendor”.
  pub fn backend_author(&mut self) -> Result<String, QueryError> {
    self.ctx.backend().backend_author()
  }

  /// The backend name, most of the time referred to as “renderer”.
  pub fn backend_name(&mut self) -> Result<String, QueryError> {
    self.ctx.backend().backend_name()
  }

  /// The raw backend version string.
  pub fn backend_version_string(&mut self) -> Result<String, QueryError> {
    self.ctx.backend().backend_version_string()
  }

  /// The parsed backend version.
  pub fn backend_version(&mut self) -> Result<Version, QueryError> {
    self.ctx.backend().backend_version()
  }

  /// The shading language version string.
  pub fn backend_shading_lang_version(&mut self) -> Result<String, QueryError> {
    self.ctx.backend().backend_shading_lang_version()
  }

  /// The advertised extensions.
  pub fn extensions(&mut self) -> Result<Extensions, QueryError> {
    self.ctx.backend().extensions()
  }

  /// Whether the driver advertises `extension`.
  pub fn supports_extension(&mut self, extension: &str) -> Result<bool, QueryError> {
    Ok(self.ctx.backend().extensions()?.supports(extension))
  }

  /// The advertised limits.
  pub fn limits(&mut self) -> Result<Limits, QueryError> {
    self.ctx.backend().limits()
  }
}
