//! Shader backend interface.

use crate::shader::{ProgramError, StageError, StageType, UniformDesc, UniformValue};
use crate::vertex_array::AttributeDesc;

/// Shader backend.
///
/// # Call contracts
///
/// - `new_stage` receives source that is not empty nor whitespace-only.
/// - `set_uniform` receives a location discovered on that very program, with a value whose type
///   has already been checked (unless the owning program opted out of checking).
/// - `set_uniform` makes the program current itself, through the state cache.
pub unsafe trait Shader {
  /// Representation of a compiled shader stage.
  type StageRepr;

  /// Representation of a linked program.
  type ProgramRepr;

  /// Compile a stage from source.
  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError>;

  /// Destroy a stage.
  unsafe fn destroy_stage(stage: &mut Self::StageRepr);

  /// Link a program from its stages.
  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    geometry: Option<&Self::StageRepr>,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ProgramError>;

  /// Destroy a program. The cached current program must be invalidated if it is this one.
  unsafe fn destroy_program(program: &mut Self::ProgramRepr);

  /// Make the program the current one for subsequent draws.
  unsafe fn use_program(program: &Self::ProgramRepr);

  /// Snapshot the program’s active uniforms.
  unsafe fn active_uniforms(program: &Self::ProgramRepr) -> Vec<UniformDesc>;

  /// Snapshot the program’s active vertex attributes.
  unsafe fn active_attributes(program: &Self::ProgramRepr) -> Vec<AttributeDesc>;

  /// Write a uniform value at `location`, making the program current first.
  unsafe fn set_uniform(program: &Self::ProgramRepr, location: i32, value: &UniformValue);
}
