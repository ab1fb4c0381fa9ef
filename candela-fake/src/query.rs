//! Software query implementation.

use candela::backend::query::{Query, QueryError};
use candela::version::{Extensions, Limits, Version};

use crate::FakeBackend;

unsafe impl Query for FakeBackend {
  fn backend_author(&self) -> Result<String, QueryError> {
    Ok("candela project".to_owned())
  }

  fn backend_name(&self) -> Result<String, QueryError> {
    Ok(format!("candela-fake ({})", self.state.borrow().name()))
  }

  fn backend_version_string(&self) -> Result<String, QueryError> {
    Ok("3.3.0 candela-fake".to_owned())
  }

  fn backend_version(&self) -> Result<Version, QueryError> {
    Ok(self.state.borrow().version())
  }

  fn backend_shading_lang_version(&self) -> Result<String, QueryError> {
    Ok("3.30 candela-fake".to_owned())
  }

  fn extensions(&self) -> Result<Extensions, QueryError> {
    Ok(self.state.borrow().extensions().clone())
  }

  fn limits(&self) -> Result<Limits, QueryError> {
    Ok(self.state.borrow().limits())
  }
}
