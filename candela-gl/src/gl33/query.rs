//! OpenGL query implementation.
//!
//! All answers come from the data [`GLState`] captured at construction; nothing here touches the
//! driver.
//!
//! [`GLState`]: crate::gl33::GLState

use candela::backend::query::{Query, QueryError};
use candela::version::{Extensions, Limits, Version};

use crate::gl33::GL33;

unsafe impl Query for GL33 {
  fn backend_author(&self) -> Result<String, QueryError> {
    self
      .state
      .borrow()
      .vendor()
      .map(str::to_owned)
      .ok_or(QueryError::NoBackendAuthor)
  }

  fn backend_name(&self) -> Result<String, QueryError> {
    self
      .state
      .borrow()
      .renderer()
      .map(str::to_owned)
      .ok_or(QueryError::NoBackendName)
  }

  fn backend_version_string(&self) -> Result<String, QueryError> {
    self
      .state
      .borrow()
      .version_string()
      .map(str::to_owned)
      .ok_or(QueryError::NoBackendVersion)
  }

  fn backend_version(&self) -> Result<Version, QueryError> {
    Ok(self.state.borrow().version())
  }

  fn backend_shading_lang_version(&self) -> Result<String, QueryError> {
    self
      .state
      .borrow()
      .glsl_version()
      .map(str::to_owned)
      .ok_or(QueryError::NoBackendShadingLanguageVersion)
  }

  fn extensions(&self) -> Result<Extensions, QueryError> {
    Ok(self.state.borrow().extensions().clone())
  }

  fn limits(&self) -> Result<Limits, QueryError> {
    Ok(self.state.borrow().limits())
  }
}
