//! Software shader implementation.
//!
//! There is no compiler here. A stage keeps its source text; linking reflects the program by
//! scanning that text for `uniform <type> <name>;` declarations (and, in the vertex stage,
//! `in <type> <name>;` for attributes), assigning locations in discovery order. Declarations
//! are recognized at the start of a line.
//!
//! Failure paths stay reachable: a line starting with `#error` fails compilation with the rest
//! of the line as the message, and declaring one uniform name with two different types across
//! stages fails linking, as a real linker would.

use std::cell::RefCell;
use std::rc::Rc;

use candela::backend::shader::Shader as ShaderBackend;
use candela::shader::{ProgramError, StageError, StageType, UniformDesc, UniformType, UniformValue};
use candela::vertex_array::AttributeDesc;

use crate::state::FakeState;
use crate::FakeBackend;

/// Software shader stage; keeps its source for link-time reflection.
#[derive(Debug)]
pub struct StageRepr {
  pub(crate) id: u64,
  src: String,
  state: Rc<RefCell<FakeState>>,
}

/// Software shader program with reflection tables scanned out of the stage sources.
#[derive(Debug)]
pub struct ProgramRepr {
  pub(crate) id: u64,
  uniforms: Vec<UniformDesc>,
  attributes: Vec<AttributeDesc>,
  pub(crate) state: Rc<RefCell<FakeState>>,
}

unsafe impl ShaderBackend for FakeBackend {
  type StageRepr = StageRepr;
  type ProgramRepr = ProgramRepr;

  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError> {
    for line in src.lines() {
      if let Some(message) = line.trim().strip_prefix("#error") {
        let message = message.trim();
        let message = if message.is_empty() { "#error" } else { message };
        return Err(StageError::CompilationFailed(ty, message.to_owned()));
      }
    }

    let mut state = self.state.borrow_mut();
    let id = state.fresh_id();

    log::debug!("context {}: stage {}: compiled {}", state.name(), id, ty);

    drop(state);

    Ok(StageRepr {
      id,
      src: src.to_owned(),
      state: self.state.clone(),
    })
  }

  unsafe fn destroy_stage(stage: &mut Self::StageRepr) {
    let state = stage.state.borrow();
    log::debug!("context {}: stage {}: destroyed", state.name(), stage.id);
  }

  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    geometry: Option<&Self::StageRepr>,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ProgramError> {
    let foreign = [Some(vertex), geometry, Some(fragment)]
      .iter()
      .flatten()
      .any(|stage| !Rc::ptr_eq(&self.state, &stage.state));
    if foreign {
      return Err(ProgramError::CreationFailed(
        "a stage belongs to another context".to_owned(),
      ));
    }

    let mut uniforms: Vec<(String, UniformType)> = Vec::new();
    let sources = [
      Some(vertex.src.as_str()),
      geometry.map(|g| g.src.as_str()),
      Some(fragment.src.as_str()),
    ];

    for src in sources.iter().flatten() {
      for (name, ty) in scan_declarations(src, "uniform") {
        let known = uniforms
          .iter()
          .find(|(known, _)| *known == name)
          .map(|(_, known_ty)| *known_ty);

        match known {
          Some(known_ty) if known_ty != ty => {
            return Err(ProgramError::LinkFailed(format!(
              "uniform {} declared as both {} and {}",
              name, known_ty, ty
            )));
          }
          Some(_) => (),
          None => uniforms.push((name, ty)),
        }
      }
    }

    let uniforms = uniforms
      .into_iter()
      .enumerate()
      .map(|(location, (name, ty))| UniformDesc {
        name,
        location: location as i32,
        ty,
      })
      .collect();

    let attributes = scan_declarations(&vertex.src, "in")
      .into_iter()
      .enumerate()
      .map(|(location, (name, ty))| AttributeDesc {
        name,
        location: location as u32,
        ty,
      })
      .collect();

    let mut state = self.state.borrow_mut();
    let id = state.fresh_id();

    log::debug!(
      "context {}: program {}: linked stages {:?}",
      state.name(),
      id,
      [
        Some(vertex.id),
        geometry.map(|g| g.id),
        Some(fragment.id)
      ]
    );

    drop(state);

    Ok(ProgramRepr {
      id,
      uniforms,
      attributes,
      state: self.state.clone(),
    })
  }

  unsafe fn destroy_program(program: &mut Self::ProgramRepr) {
    let mut state = program.state.borrow_mut();
    state.forget_program(program.id);
    log::debug!("context {}: program {}: destroyed", state.name(), program.id);
  }

  unsafe fn use_program(program: &Self::ProgramRepr) {
    program.state.borrow_mut().use_program(program.id);
  }

  unsafe fn active_uniforms(program: &Self::ProgramRepr) -> Vec<UniformDesc> {
    program.uniforms.clone()
  }

  unsafe fn active_attributes(program: &Self::ProgramRepr) -> Vec<AttributeDesc> {
    program.attributes.clone()
  }

  unsafe fn set_uniform(program: &Self::ProgramRepr, location: i32, value: &UniformValue) {
    let mut state = program.state.borrow_mut();
    state.use_program(program.id);
    log::trace!(
      "context {}: program {}: uniform at {} set to {:?}",
      state.name(),
      program.id,
      location,
      value
    );
  }
}

/// Scan `src` for `<keyword> <type> <name>[, <name>…];` lines.
///
/// Declarations with an unknown type or an array suffix are skipped with a warning, the way a
/// reflection pass skips what it cannot represent.
fn scan_declarations(src: &str, keyword: &str) -> Vec<(String, UniformType)> {
  let mut found = Vec::new();

  for line in src.lines() {
    let line = match line.split_once("//") {
      Some((code, _)) => code,
      None => line,
    };
    let line = line.trim();

    let rest = match line.strip_prefix(keyword) {
      Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
      _ => continue,
    };

    let (ty_word, declarators) = match rest.split_once(char::is_whitespace) {
      Some(split) => split,
      None => continue,
    };

    let ty = match glsl_type(ty_word) {
      Some(ty) => ty,
      None => {
        log::warn!("cannot reflect type {} in {:?}; ignoring it", ty_word, line);
        continue;
      }
    };

    let declarators = match declarators.split_once(';') {
      Some((declarators, _)) => declarators,
      None => declarators,
    };

    for name in declarators.split(',') {
      let name = name.trim();

      if name.is_empty() {
        continue;
      }

      if name.contains('[') {
        log::warn!("cannot reflect array {} in {:?}; ignoring it", name, line);
        continue;
      }

      found.push((name.to_owned(), ty));
    }
  }

  found
}

fn glsl_type(word: &str) -> Option<UniformType> {
  let ty = match word {
    "int" => UniformType::Int,
    "uint" => UniformType::UnsignedInt,
    "float" => UniformType::Float,
    "bool" => UniformType::Bool,
    "ivec2" => UniformType::IVec2,
    "ivec3" => UniformType::IVec3,
    "ivec4" => UniformType::IVec4,
    "uvec2" => UniformType::UVec2,
    "uvec3" => UniformType::UVec3,
    "uvec4" => UniformType::UVec4,
    "vec2" => UniformType::Vec2,
    "vec3" => UniformType::Vec3,
    "vec4" => UniformType::Vec4,
    "bvec2" => UniformType::BVec2,
    "bvec3" => UniformType::BVec3,
    "bvec4" => UniformType::BVec4,
    "mat2" => UniformType::M22,
    "mat3" => UniformType::M33,
    "mat4" => UniformType::M44,
    "sampler2D" | "sampler2DShadow" => UniformType::Sampler2D,
    "samplerCube" | "samplerCubeShadow" => UniformType::SamplerCube,
    _ => return None,
  };

  Some(ty)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn declarations_are_scanned_with_comments_stripped() {
    let src = "#version 330\n\
               uniform mat4 mvp; // model-view-projection\n\
               uniform sampler2D albedo;\n\
               in vec3 position;\n";

    let uniforms = scan_declarations(src, "uniform");
    assert_eq!(
      uniforms,
      vec![
        ("mvp".to_owned(), UniformType::M44),
        ("albedo".to_owned(), UniformType::Sampler2D),
      ]
    );

    let attributes = scan_declarations(src, "in");
    assert_eq!(attributes, vec![("position".to_owned(), UniformType::Vec3)]);
  }

  #[test]
  fn declarator_lists_yield_every_name() {
    let src = "uniform float near, far;";
    let uniforms = scan_declarations(src, "uniform");

    assert_eq!(
      uniforms,
      vec![
        ("near".to_owned(), UniformType::Float),
        ("far".to_owned(), UniformType::Float),
      ]
    );
  }

  #[test]
  fn unknown_types_and_arrays_are_skipped() {
    let src = "uniform sampler3D volume;\nuniform float weights[4];\nuniform vec2 scale;";
    let uniforms = scan_declarations(src, "uniform");

    assert_eq!(uniforms, vec![("scale".to_owned(), UniformType::Vec2)]);
  }

  #[test]
  fn keyword_prefixes_do_not_match() {
    let src = "uniforms float nope;\nin_data vec2 nope2;";

    assert!(scan_declarations(src, "uniform").is_empty());
    assert!(scan_declarations(src, "in").is_empty());
  }
}
