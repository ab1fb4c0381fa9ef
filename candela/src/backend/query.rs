//! Query backend interface.
//!
//! Identification strings, the parsed driver version, the advertised extension set and the
//! integer limits all come from here. Backends gather these once at construction time, so the
//! methods read from cached data rather than the driver.

use std::error;
use std::fmt;

use crate::version::{Extensions, Limits, Version, VersionParseError};

/// Query error.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum QueryError {
  /// No backend author information available.
  NoBackendAuthor,

  /// No backend name information available.
  NoBackendName,

  /// No backend version information available.
  NoBackendVersion,

  /// No backend shading language version information available.
  NoBackendShadingLanguageVersion,

  /// The driver handed back a version string that does not parse.
  UnparsableVersion(VersionParseError),
}

impl fmt::Display for QueryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      QueryError::NoBackendAuthor => f.write_str("no backend author available"),
      QueryError::NoBackendName => f.write_str("no backend name available"),
      QueryError::NoBackendVersion => f.write_str("no backend version available"),
      QueryError::NoBackendShadingLanguageVersion => {
        f.write_str("no backend shading language version available")
      }
      QueryError::UnparsableVersion(ref e) => write!(f, "unparsable backend version: {}", e),
    }
  }
}

impl error::Error for QueryError {}

impl From<VersionParseError> for QueryError {
  fn from(e: VersionParseError) -> Self {
    QueryError::UnparsableVersion(e)
  }
}

/// Backends that support querying.
pub unsafe trait Query {
  /// The implementation author, most of the time referred to as “vendor”.
  fn backend_author(&self) -> Result<String, QueryError>;

  /// The backend name, most of the time referred to as “renderer”.
  fn backend_name(&self) -> Result<String, QueryError>;

  /// The raw backend version string.
  fn backend_version_string(&self) -> Result<String, QueryError>;

  /// The parsed backend version.
  fn backend_version(&self) -> Result<Version, QueryError>;

  /// The shading language version string.
  fn backend_shading_lang_version(&self) -> Result<String, QueryError>;

  /// The advertised extensions.
  fn extensions(&self) -> Result<Extensions, QueryError>;

  /// The advertised limits.
  fn limits(&self) -> Result<Limits, QueryError>;
}
