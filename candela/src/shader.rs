//! Shader stages, programs and uniforms.
//!
//! A [`Stage`] is one compiled unit of the shading language. A [`Program`] links a vertex stage,
//! an optional geometry stage and a fragment stage, then reflects its active uniforms and vertex
//! attributes so that lookups and writes can be validated without touching the driver.
//!
//! # Uniform checking
//!
//! Uniform writes go through a [`Uniform`] handle obtained with [`Program::uniform`]. Two checks
//! apply, each of which can be relaxed per program:
//!
//! - _Activity checking_ (default on): looking up a name the linker discarded is an error. With
//!   checking off, the lookup succeeds with an inert handle and writes through it are silently
//!   skipped, mirroring how drivers treat unknown uniform locations.
//! - _Type checking_ (default on): the written value must match the reflected shading-language
//!   type. With checking off, values are handed to the driver as-is.

use std::collections::HashMap;
use std::error;
use std::fmt;

use crate::backend::shader::Shader as ShaderBackend;
use crate::context::GraphicsContext;
use crate::vertex_array::AttributeDesc;

/// Kind of shader stage.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageType {
  /// Vertex stage.
  Vertex,

  /// Geometry stage.
  Geometry,

  /// Fragment stage.
  Fragment,
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      StageType::Vertex => f.write_str("vertex shader"),
      StageType::Geometry => f.write_str("geometry shader"),
      StageType::Fragment => f.write_str("fragment shader"),
    }
  }
}

/// A compiled shader stage.
#[derive(Debug)]
pub struct Stage<B>
where
  B: ?Sized + ShaderBackend,
{
  pub(crate) repr: B::StageRepr,
  ty: StageType,
}

impl<B> Stage<B>
where
  B: ?Sized + ShaderBackend,
{
  /// Compile a stage from source.
  ///
  /// Sources that are empty or contain only whitespace are rejected before reaching the driver.
  pub fn new<C, S>(ctx: &mut C, ty: StageType, src: S) -> Result<Self, StageError>
  where
    C: GraphicsContext<Backend = B>,
    S: AsRef<str>,
  {
    let src = src.as_ref();

    if src.trim().is_empty() {
      return Err(StageError::EmptySource(ty));
    }

    let repr = unsafe { ctx.backend().new_stage(ty, src)? };
    Ok(Stage { repr, ty })
  }

  /// Kind of this stage.
  pub fn ty(&self) -> StageType {
    self.ty
  }
}

impl<B> Drop for Stage<B>
where
  B: ?Sized + ShaderBackend,
{
  fn drop(&mut self) {
    unsafe { B::destroy_stage(&mut self.repr) }
  }
}

/// Shader stage error.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StageError {
  /// The source was empty or whitespace-only.
  EmptySource(StageType),

  /// The driver rejected the source.
  CompilationFailed(StageType, String),

  /// The device cannot run this kind of stage.
  UnsupportedType(StageType),
}

impl fmt::Display for StageError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      StageError::EmptySource(ty) => write!(f, "empty source for {}", ty),

      StageError::CompilationFailed(ty, ref reason) => {
        write!(f, "{} compilation failed: {}", ty, reason)
      }

      StageError::UnsupportedType(ty) => write!(f, "unsupported {}", ty),
    }
  }
}

impl error::Error for StageError {}

/// Shading language type of a uniform or vertex attribute.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UniformType {
  /// 32-bit signed integer.
  Int,

  /// 32-bit unsigned integer.
  UnsignedInt,

  /// 32-bit floating point number.
  Float,

  /// Boolean.
  Bool,

  /// 2D signed integral vector.
  IVec2,

  /// 3D signed integral vector.
  IVec3,

  /// 4D signed integral vector.
  IVec4,

  /// 2D unsigned integral vector.
  UVec2,

  /// 3D unsigned integral vector.
  UVec3,

  /// 4D unsigned integral vector.
  UVec4,

  /// 2D floating vector.
  Vec2,

  /// 3D floating vector.
  Vec3,

  /// 4D floating vector.
  Vec4,

  /// 2D boolean vector.
  BVec2,

  /// 3D boolean vector.
  BVec3,

  /// 4D boolean vector.
  BVec4,

  /// 2×2 floating matrix.
  M22,

  /// 3×3 floating matrix.
  M33,

  /// 4×4 floating matrix.
  M44,

  /// 2D texture sampler.
  Sampler2D,

  /// Cubemap texture sampler.
  SamplerCube,
}

impl UniformType {
  /// Whether this type samples a texture.
  pub fn is_sampler(self) -> bool {
    matches!(self, UniformType::Sampler2D | UniformType::SamplerCube)
  }
}

impl fmt::Display for UniformType {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match *self {
      UniformType::Int => "int",
      UniformType::UnsignedInt => "uint",
      UniformType::Float => "float",
      UniformType::Bool => "bool",
      UniformType::IVec2 => "ivec2",
      UniformType::IVec3 => "ivec3",
      UniformType::IVec4 => "ivec4",
      UniformType::UVec2 => "uvec2",
      UniformType::UVec3 => "uvec3",
      UniformType::UVec4 => "uvec4",
      UniformType::Vec2 => "vec2",
      UniformType::Vec3 => "vec3",
      UniformType::Vec4 => "vec4",
      UniformType::BVec2 => "bvec2",
      UniformType::BVec3 => "bvec3",
      UniformType::BVec4 => "bvec4",
      UniformType::M22 => "mat2",
      UniformType::M33 => "mat3",
      UniformType::M44 => "mat4",
      UniformType::Sampler2D => "sampler2D",
      UniformType::SamplerCube => "samplerCube",
    };

    f.write_str(name)
  }
}

/// A uniform value, carried to the driver.
///
/// [`UniformValue::TextureUnit`] is the value form of every sampler type: the unit index a
/// texture was bound to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
  /// 32-bit signed integer.
  Int(i32),

  /// 32-bit unsigned integer.
  UnsignedInt(u32),

  /// 32-bit floating point number.
  Float(f32),

  /// Boolean.
  Bool(bool),

  /// 2D signed integral vector.
  IVec2([i32; 2]),

  /// 3D signed integral vector.
  IVec3([i32; 3]),

  /// 4D signed integral vector.
  IVec4([i32; 4]),

  /// 2D unsigned integral vector.
  UVec2([u32; 2]),

  /// 3D unsigned integral vector.
  UVec3([u32; 3]),

  /// 4D unsigned integral vector.
  UVec4([u32; 4]),

  /// 2D floating vector.
  Vec2([f32; 2]),

  /// 3D floating vector.
  Vec3([f32; 3]),

  /// 4D floating vector.
  Vec4([f32; 4]),

  /// 2D boolean vector.
  BVec2([bool; 2]),

  /// 3D boolean vector.
  BVec3([bool; 3]),

  /// 4D boolean vector.
  BVec4([bool; 4]),

  /// 2×2 floating matrix, column-major.
  M22([[f32; 2]; 2]),

  /// 3×3 floating matrix, column-major.
  M33([[f32; 3]; 3]),

  /// 4×4 floating matrix, column-major.
  M44([[f32; 4]; 4]),

  /// Texture unit index, for sampler uniforms.
  TextureUnit(u32),
}

impl UniformValue {
  /// Shading language type of this value, when unambiguous.
  ///
  /// [`UniformValue::TextureUnit`] answers `None`: a unit index can feed any sampler type.
  pub fn ty(&self) -> Option<UniformType> {
    let ty = match *self {
      UniformValue::Int(_) => UniformType::Int,
      UniformValue::UnsignedInt(_) => UniformType::UnsignedInt,
      UniformValue::Float(_) => UniformType::Float,
      UniformValue::Bool(_) => UniformType::Bool,
      UniformValue::IVec2(_) => UniformType::IVec2,
      UniformValue::IVec3(_) => UniformType::IVec3,
      UniformValue::IVec4(_) => UniformType::IVec4,
      UniformValue::UVec2(_) => UniformType::UVec2,
      UniformValue::UVec3(_) => UniformType::UVec3,
      UniformValue::UVec4(_) => UniformType::UVec4,
      UniformValue::Vec2(_) => UniformType::Vec2,
      UniformValue::Vec3(_) => UniformType::Vec3,
      UniformValue::Vec4(_) => UniformType::Vec4,
      UniformValue::BVec2(_) => UniformType::BVec2,
      UniformValue::BVec3(_) => UniformType::BVec3,
      UniformValue::BVec4(_) => UniformType::BVec4,
      UniformValue::M22(_) => UniformType::M22,
      UniformValue::M33(_) => UniformType::M33,
      UniformValue::M44(_) => UniformType::M44,
      UniformValue::TextureUnit(_) => return None,
    };

    Some(ty)
  }

  /// Whether this value can be written to a uniform of type `ty`.
  pub fn matches(&self, ty: UniformType) -> bool {
    match *self {
      UniformValue::TextureUnit(_) => ty.is_sampler(),
      _ => self.ty() == Some(ty),
    }
  }
}

macro_rules! impl_uniform_value_from {
  ($($t:ty => $variant:ident),* $(,)?) => {
    $(
      impl From<$t> for UniformValue {
        fn from(value: $t) -> Self {
          UniformValue::$variant(value)
        }
      }
    )*
  };
}

impl_uniform_value_from! {
  i32 => Int,
  u32 => UnsignedInt,
  f32 => Float,
  bool => Bool,
  [i32; 2] => IVec2,
  [i32; 3] => IVec3,
  [i32; 4] => IVec4,
  [u32; 2] => UVec2,
  [u32; 3] => UVec3,
  [u32; 4] => UVec4,
  [f32; 2] => Vec2,
  [f32; 3] => Vec3,
  [f32; 4] => Vec4,
  [bool; 2] => BVec2,
  [bool; 3] => BVec3,
  [bool; 4] => BVec4,
  [[f32; 2]; 2] => M22,
  [[f32; 3]; 3] => M33,
  [[f32; 4]; 4] => M44,
}

/// Description of an active uniform, as reflected from a linked program.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct UniformDesc {
  /// Name of the uniform in the shading language.
  pub name: String,

  /// Location the linker assigned.
  pub location: i32,

  /// Shading language type of the uniform.
  pub ty: UniformType,
}

/// Handle on a uniform of a specific [`Program`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Uniform {
  name: String,
  location: i32,
  ty: Option<UniformType>,
}

impl Uniform {
  /// Name the handle was looked up with.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Location the linker assigned; `-1` for an inert handle.
  pub fn location(&self) -> i32 {
    self.location
  }

  /// Reflected type; `None` for an inert handle.
  pub fn ty(&self) -> Option<UniformType> {
    self.ty
  }
}

/// A linked shader program.
#[derive(Debug)]
pub struct Program<B>
where
  B: ?Sized + ShaderBackend,
{
  pub(crate) repr: B::ProgramRepr,
  uniforms: HashMap<String, UniformDesc>,
  attributes: HashMap<String, AttributeDesc>,
  type_checking: bool,
  activity_checking: bool,
}

impl<B> Program<B>
where
  B: ?Sized + ShaderBackend,
{
  /// Link a program from its stages.
  ///
  /// Each stage must be of the kind its argument slot names.
  pub fn new<C>(
    ctx: &mut C,
    vertex: &Stage<B>,
    geometry: Option<&Stage<B>>,
    fragment: &Stage<B>,
  ) -> Result<Self, ProgramError>
  where
    C: GraphicsContext<Backend = B>,
  {
    check_stage_slot(StageType::Vertex, vertex)?;
    check_stage_slot(StageType::Fragment, fragment)?;

    if let Some(geometry) = geometry {
      check_stage_slot(StageType::Geometry, geometry)?;
    }

    let repr = unsafe {
      ctx
        .backend()
        .new_program(&vertex.repr, geometry.map(|stage| &stage.repr), &fragment.repr)?
    };

    let uniforms = unsafe { B::active_uniforms(&repr) }
      .into_iter()
      .map(|desc| (desc.name.clone(), desc))
      .collect();

    let attributes = unsafe { B::active_attributes(&repr) }
      .into_iter()
      .map(|desc| (desc.name.clone(), desc))
      .collect();

    Ok(Program {
      repr,
      uniforms,
      attributes,
      type_checking: true,
      activity_checking: true,
    })
  }

  /// Look up a uniform by name.
  ///
  /// With activity checking on, names the linker discarded are an error. With it off, such names
  /// yield an inert handle whose writes are skipped.
  pub fn uniform(&self, name: &str) -> Result<Uniform, UniformError> {
    match self.uniforms.get(name) {
      Some(desc) => Ok(Uniform {
        name: desc.name.clone(),
        location: desc.location,
        ty: Some(desc.ty),
      }),

      None if self.activity_checking => Err(UniformError::Inactive(name.to_owned())),

      None => Ok(Uniform {
        name: name.to_owned(),
        location: -1,
        ty: None,
      }),
    }
  }

  /// Write a value through a uniform handle.
  ///
  /// With activity checking on, the handle must have been obtained from this very program. The
  /// program is made current on demand; no prior activation is required.
  pub fn set<V>(&self, uniform: &Uniform, value: V) -> Result<(), UniformError>
  where
    V: Into<UniformValue>,
  {
    if uniform.location < 0 {
      return Ok(());
    }

    let value = value.into();
    let ty = if self.activity_checking {
      match self.uniforms.get(&uniform.name) {
        Some(desc) if desc.location == uniform.location => Some(desc.ty),
        _ => return Err(UniformError::Inactive(uniform.name.clone())),
      }
    } else {
      uniform.ty
    };

    if self.type_checking {
      if let Some(expected) = ty {
        if !value.matches(expected) {
          return Err(UniformError::TypeMismatch {
            name: uniform.name.clone(),
            expected,
            actual: value.ty(),
          });
        }
      }
    }

    unsafe { B::set_uniform(&self.repr, uniform.location, &value) };
    Ok(())
  }

  /// Reflected description of an active uniform, if that name survived linking.
  pub fn uniform_desc(&self, name: &str) -> Option<&UniformDesc> {
    self.uniforms.get(name)
  }

  /// All active uniforms, in no particular order.
  pub fn uniforms(&self) -> impl Iterator<Item = &UniformDesc> {
    self.uniforms.values()
  }

  /// Reflected description of an active vertex attribute, if that name survived linking.
  pub fn attribute(&self, name: &str) -> Option<&AttributeDesc> {
    self.attributes.get(name)
  }

  /// All active vertex attributes, in no particular order.
  pub fn attributes(&self) -> impl Iterator<Item = &AttributeDesc> {
    self.attributes.values()
  }

  /// Whether uniform writes are type-checked.
  pub fn type_checking(&self) -> bool {
    self.type_checking
  }

  /// Enable or disable type checking of uniform writes.
  pub fn set_type_checking(&mut self, enabled: bool) {
    self.type_checking = enabled;
  }

  /// Whether uniform lookups and writes are activity-checked.
  pub fn activity_checking(&self) -> bool {
    self.activity_checking
  }

  /// Enable or disable activity checking of uniform lookups and writes.
  pub fn set_activity_checking(&mut self, enabled: bool) {
    self.activity_checking = enabled;
  }
}

impl<B> Drop for Program<B>
where
  B: ?Sized + ShaderBackend,
{
  fn drop(&mut self) {
    unsafe { B::destroy_program(&mut self.repr) }
  }
}

fn check_stage_slot<B>(expected: StageType, stage: &Stage<B>) -> Result<(), ProgramError>
where
  B: ?Sized + ShaderBackend,
{
  if stage.ty() == expected {
    Ok(())
  } else {
    Err(ProgramError::StageTypeMismatch {
      expected,
      actual: stage.ty(),
    })
  }
}

/// Program error.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProgramError {
  /// A stage was passed in a slot reserved for another kind.
  StageTypeMismatch {
    /// Kind the slot requires.
    expected: StageType,

    /// Kind that was passed.
    actual: StageType,
  },

  /// The driver failed to link the program.
  LinkFailed(String),

  /// The driver reported an error while creating the program object.
  CreationFailed(String),
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      ProgramError::StageTypeMismatch { expected, actual } => {
        write!(f, "expected a {}, got a {}", expected, actual)
      }

      ProgramError::LinkFailed(ref reason) => write!(f, "program link failed: {}", reason),

      ProgramError::CreationFailed(ref reason) => {
        write!(f, "program creation failed: {}", reason)
      }
    }
  }
}

impl error::Error for ProgramError {}

/// Uniform error.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum UniformError {
  /// The name is not an active uniform of the program.
  Inactive(String),

  /// The written value does not match the reflected type.
  TypeMismatch {
    /// Name of the uniform.
    name: String,

    /// Reflected shading language type.
    expected: UniformType,

    /// Type of the written value; `None` for a texture unit index.
    actual: Option<UniformType>,
  },
}

impl fmt::Display for UniformError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      UniformError::Inactive(ref name) => write!(f, "inactive uniform: {}", name),

      UniformError::TypeMismatch {
        ref name,
        expected,
        actual: Some(actual),
      } => write!(
        f,
        "type mismatch for uniform {}: expected {}, got {}",
        name, expected, actual
      ),

      UniformError::TypeMismatch {
        ref name, expected, ..
      } => write!(
        f,
        "type mismatch for uniform {}: expected {}, got a texture unit",
        name, expected
      ),
    }
  }
}

impl error::Error for UniformError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn value_types() {
    assert_eq!(UniformValue::Float(0.).ty(), Some(UniformType::Float));
    assert_eq!(UniformValue::IVec3([0; 3]).ty(), Some(UniformType::IVec3));
    assert_eq!(
      UniformValue::M44([[0.; 4]; 4]).ty(),
      Some(UniformType::M44)
    );
    assert_eq!(UniformValue::TextureUnit(0).ty(), None);
  }

  #[test]
  fn texture_units_match_any_sampler() {
    let unit = UniformValue::TextureUnit(3);

    assert!(unit.matches(UniformType::Sampler2D));
    assert!(unit.matches(UniformType::SamplerCube));
    assert!(!unit.matches(UniformType::Int));
  }

  #[test]
  fn scalar_values_match_their_own_type_only() {
    let value = UniformValue::from([1., 2., 3.]);

    assert!(value.matches(UniformType::Vec3));
    assert!(!value.matches(UniformType::Vec4));
    assert!(!value.matches(UniformType::Sampler2D));
  }

  #[test]
  fn glsl_spellings() {
    assert_eq!(UniformType::UVec2.to_string(), "uvec2");
    assert_eq!(UniformType::M33.to_string(), "mat3");
    assert_eq!(UniformType::SamplerCube.to_string(), "samplerCube");
  }
}
