//! Driver version and capability probing.
//!
//! Drivers advertise what they support through a version string, an extension list and a set of
//! integer limits. This module gives those three a typed form so that capability questions
//! (“does this context support 3.3?”, “is `GL_ARB_timer_query` available?”) are answered once,
//! against parsed data, instead of by re-querying the driver.

use std::collections::BTreeSet;
use std::error;
use std::fmt;

/// The API family a context implements.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Api {
  /// Desktop OpenGL.
  Core,

  /// OpenGL ES.
  ES,
}

/// A parsed driver version.
///
/// Only the major and minor numbers participate in capability decisions; patch-level and vendor
/// suffixes in the version string are ignored.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Version {
  /// API family.
  pub api: Api,

  /// Major version number.
  pub major: u32,

  /// Minor version number.
  pub minor: u32,
}

impl Version {
  /// Create a version from its parts.
  pub fn new(api: Api, major: u32, minor: u32) -> Self {
    Version { api, major, minor }
  }

  /// Parse a version out of a driver version string.
  ///
  /// Accepted shapes are the ones drivers actually produce: a leading `major.minor[.patch]`
  /// optionally followed by vendor information (`"3.3.0 NVIDIA 460.91.03"`,
  /// `"4.6 (Core Profile) Mesa 21.2.6"`), and the embedded forms used by OpenGL ES
  /// (`"OpenGL ES 3.0 Mesa 21.2.6"`).
  pub fn parse(raw: &str) -> Result<Self, VersionParseError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
      return Err(VersionParseError::Empty);
    }

    let (api, rest) = if let Some(rest) = trimmed.strip_prefix("OpenGL ES-CM ") {
      (Api::ES, rest)
    } else if let Some(rest) = trimmed.strip_prefix("OpenGL ES ") {
      (Api::ES, rest)
    } else {
      (Api::Core, trimmed)
    };

    let numbers = rest
      .split_whitespace()
      .next()
      .ok_or_else(|| VersionParseError::Malformed(raw.to_owned()))?;

    let mut parts = numbers.split('.');
    let major = parts
      .next()
      .and_then(|p| p.parse().ok())
      .ok_or_else(|| VersionParseError::Malformed(raw.to_owned()))?;
    let minor = parts
      .next()
      .and_then(|p| p.parse().ok())
      .ok_or_else(|| VersionParseError::Malformed(raw.to_owned()))?;

    Ok(Version { api, major, minor })
  }

  /// Whether this version is at least `major.minor` within its own API family.
  pub fn supports(&self, major: u32, minor: u32) -> bool {
    (self.major, self.minor) >= (major, minor)
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self.api {
      Api::Core => write!(f, "OpenGL {}.{}", self.major, self.minor),
      Api::ES => write!(f, "OpenGL ES {}.{}", self.major, self.minor),
    }
  }
}

/// A driver version string could not be parsed.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VersionParseError {
  /// The version string was empty.
  Empty,

  /// The version string does not start with a `major.minor` pair; the offending string is
  /// carried verbatim.
  Malformed(String),
}

impl fmt::Display for VersionParseError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      VersionParseError::Empty => f.write_str("empty version string"),
      VersionParseError::Malformed(ref raw) => write!(f, "malformed version string: {:?}", raw),
    }
  }
}

impl error::Error for VersionParseError {}

/// The set of extensions a context advertises.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Extensions {
  names: BTreeSet<String>,
}

impl Extensions {
  /// Build the set from advertised names.
  pub fn new<I>(names: I) -> Self
  where
    I: IntoIterator,
    I::Item: Into<String>,
  {
    Extensions {
      names: names.into_iter().map(Into::into).collect(),
    }
  }

  /// Whether the extension `name` is advertised.
  pub fn supports(&self, name: &str) -> bool {
    self.names.contains(name)
  }

  /// Number of advertised extensions.
  pub fn len(&self) -> usize {
    self.names.len()
  }

  /// Whether no extension is advertised.
  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  /// Iterate over the advertised names, in lexicographic order.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.names.iter().map(String::as_str)
  }
}

/// Integer and range limits a context advertises.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
  /// Largest texture dimension supported.
  pub max_texture_size: usize,

  /// Number of texture units.
  pub max_texture_units: usize,

  /// Number of color attachments a framebuffer supports.
  pub max_color_attachments: usize,

  /// Number of vertex attributes a vertex array supports.
  pub max_vertex_attributes: usize,

  /// Smallest and largest supported line width.
  pub line_width_range: [f32; 2],
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_plain_core_versions() {
    let v = Version::parse("3.3.0 NVIDIA 460.91.03").unwrap();
    assert_eq!(v, Version::new(Api::Core, 3, 3));

    let v = Version::parse("4.6 (Core Profile) Mesa 21.2.6").unwrap();
    assert_eq!(v, Version::new(Api::Core, 4, 6));
  }

  #[test]
  fn parses_es_versions() {
    let v = Version::parse("OpenGL ES 3.0 Mesa 21.2.6").unwrap();
    assert_eq!(v, Version::new(Api::ES, 3, 0));

    let v = Version::parse("OpenGL ES-CM 1.1 Apple").unwrap();
    assert_eq!(v, Version::new(Api::ES, 1, 1));
  }

  #[test]
  fn rejects_garbage() {
    assert_eq!(Version::parse("   "), Err(VersionParseError::Empty));
    assert!(matches!(
      Version::parse("wat"),
      Err(VersionParseError::Malformed(_))
    ));
    assert!(matches!(
      Version::parse("3 NVIDIA"),
      Err(VersionParseError::Malformed(_))
    ));
  }

  #[test]
  fn support_ordering() {
    let v = Version::new(Api::Core, 3, 3);

    assert!(v.supports(3, 0));
    assert!(v.supports(3, 3));
    assert!(v.supports(2, 1));
    assert!(!v.supports(3, 4));
    assert!(!v.supports(4, 0));
  }

  #[test]
  fn extension_lookup() {
    let exts = Extensions::new(["GL_ARB_timer_query", "GL_ARB_debug_output"]);

    assert_eq!(exts.len(), 2);
    assert!(exts.supports("GL_ARB_timer_query"));
    assert!(!exts.supports("GL_ARB_gpu_shader_fp64"));
  }
}
