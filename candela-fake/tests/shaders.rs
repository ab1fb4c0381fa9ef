use candela::shader::{
  Program, ProgramError, Stage, StageError, StageType, UniformError, UniformType, UniformValue,
};
use candela_fake::{FakeBackend, FakeContext};

const VERTEX_SRC: &str = "
in vec2 position;
in vec4 color;

uniform mat4 transform;

void main() {
  gl_Position = transform * vec4(position, 0., 1.);
}
";

const FRAGMENT_SRC: &str = "
uniform vec4 tint;
uniform sampler2D albedo;

void main() {
  gl_FragColor = tint;
}
";

fn link(ctx: &mut FakeContext) -> Program<FakeBackend> {
  let vertex = Stage::new(ctx, StageType::Vertex, VERTEX_SRC).unwrap();
  let fragment = Stage::new(ctx, StageType::Fragment, FRAGMENT_SRC).unwrap();
  Program::new(ctx, &vertex, None, &fragment).unwrap()
}

#[test]
fn empty_sources_never_reach_the_driver() {
  let mut ctx = FakeContext::new("shaders");
  let result = Stage::new(&mut ctx, StageType::Vertex, "  \n\t  ");

  assert_eq!(
    result.err(),
    Some(StageError::EmptySource(StageType::Vertex))
  );
}

#[test]
fn error_directives_fail_compilation() {
  let mut ctx = FakeContext::new("shaders");
  let result = Stage::new(&mut ctx, StageType::Fragment, "#error unsupported platform\n");

  match result {
    Err(StageError::CompilationFailed(StageType::Fragment, reason)) => {
      assert_eq!(reason, "unsupported platform");
    }

    unexpected => panic!("unexpected result: {:?}", unexpected),
  }
}

#[test]
fn linked_programs_reflect_their_uniforms() {
  let mut ctx = FakeContext::new("shaders");
  let program = link(&mut ctx);

  assert_eq!(
    program.uniform_desc("transform").map(|desc| desc.ty),
    Some(UniformType::M44)
  );
  assert_eq!(
    program.uniform_desc("tint").map(|desc| desc.ty),
    Some(UniformType::Vec4)
  );
  assert_eq!(
    program.uniform_desc("albedo").map(|desc| desc.ty),
    Some(UniformType::Sampler2D)
  );
  assert_eq!(program.uniforms().count(), 3);
}

#[test]
fn vertex_inputs_become_attributes() {
  let mut ctx = FakeContext::new("shaders");
  let program = link(&mut ctx);

  assert_eq!(
    program.attribute("position").map(|desc| desc.ty),
    Some(UniformType::Vec2)
  );
  assert_eq!(
    program.attribute("color").map(|desc| desc.ty),
    Some(UniformType::Vec4)
  );
  assert_eq!(program.attributes().count(), 2);
}

#[test]
fn conflicting_uniform_declarations_fail_linking() {
  let mut ctx = FakeContext::new("shaders");
  let vertex = Stage::new(
    &mut ctx,
    StageType::Vertex,
    "uniform float fog;\nvoid main() {}\n",
  )
  .unwrap();
  let fragment = Stage::new(
    &mut ctx,
    StageType::Fragment,
    "uniform vec3 fog;\nvoid main() {}\n",
  )
  .unwrap();

  match Program::new(&mut ctx, &vertex, None, &fragment) {
    Err(ProgramError::LinkFailed(reason)) => assert!(reason.contains("fog")),
    unexpected => panic!("unexpected result: {:?}", unexpected),
  }
}

#[test]
fn stage_slots_enforce_their_kind() {
  let mut ctx = FakeContext::new("shaders");
  let vertex = Stage::new(&mut ctx, StageType::Vertex, VERTEX_SRC).unwrap();
  let fragment = Stage::new(&mut ctx, StageType::Fragment, FRAGMENT_SRC).unwrap();

  assert_eq!(
    Program::new(&mut ctx, &fragment, None, &vertex).err(),
    Some(ProgramError::StageTypeMismatch {
      expected: StageType::Vertex,
      actual: StageType::Fragment,
    })
  );
}

#[test]
fn stages_cannot_link_across_contexts() {
  let mut ctx = FakeContext::new("shaders");
  let mut other = FakeContext::new("elsewhere");

  let vertex = Stage::new(&mut ctx, StageType::Vertex, VERTEX_SRC).unwrap();
  let fragment = Stage::new(&mut other, StageType::Fragment, FRAGMENT_SRC).unwrap();

  match Program::new(&mut ctx, &vertex, None, &fragment) {
    Err(ProgramError::CreationFailed(reason)) => assert!(reason.contains("another context")),
    unexpected => panic!("unexpected result: {:?}", unexpected),
  }
}

#[test]
fn unknown_uniforms_are_inactive() {
  let mut ctx = FakeContext::new("shaders");
  let program = link(&mut ctx);

  assert_eq!(
    program.uniform("fog").err(),
    Some(UniformError::Inactive("fog".to_owned()))
  );
}

#[test]
fn relaxed_activity_checking_hands_out_inert_handles() {
  let mut ctx = FakeContext::new("shaders");
  let mut program = link(&mut ctx);

  program.set_activity_checking(false);

  let fog = program.uniform("fog").unwrap();
  assert_eq!(fog.location(), -1);
  assert_eq!(fog.ty(), None);

  // writes through an inert handle are skipped, not refused
  program.set(&fog, 0.5f32).unwrap();
}

#[test]
fn uniform_writes_are_type_checked() {
  let mut ctx = FakeContext::new("shaders");
  let program = link(&mut ctx);
  let tint = program.uniform("tint").unwrap();

  program.set(&tint, [1.0f32, 0., 0., 1.]).unwrap();

  assert_eq!(
    program.set(&tint, 1.0f32),
    Err(UniformError::TypeMismatch {
      name: "tint".to_owned(),
      expected: UniformType::Vec4,
      actual: Some(UniformType::Float),
    })
  );
}

#[test]
fn texture_units_feed_any_sampler_uniform() {
  let mut ctx = FakeContext::new("shaders");
  let program = link(&mut ctx);
  let albedo = program.uniform("albedo").unwrap();

  program.set(&albedo, UniformValue::TextureUnit(2)).unwrap();

  assert_eq!(
    program.set(&albedo, 3i32),
    Err(UniformError::TypeMismatch {
      name: "albedo".to_owned(),
      expected: UniformType::Sampler2D,
      actual: Some(UniformType::Int),
    })
  );
}

#[test]
fn relaxed_type_checking_forwards_values_untouched() {
  let mut ctx = FakeContext::new("shaders");
  let mut program = link(&mut ctx);

  program.set_type_checking(false);

  let tint = program.uniform("tint").unwrap();
  program.set(&tint, 1.0f32).unwrap();
}

#[test]
fn geometry_stages_join_the_reflection() {
  let mut ctx = FakeContext::new("shaders");
  let vertex = Stage::new(&mut ctx, StageType::Vertex, VERTEX_SRC).unwrap();
  let geometry = Stage::new(
    &mut ctx,
    StageType::Geometry,
    "uniform float extrusion;\nvoid main() {}\n",
  )
  .unwrap();
  let fragment = Stage::new(&mut ctx, StageType::Fragment, FRAGMENT_SRC).unwrap();

  let program = Program::new(&mut ctx, &vertex, Some(&geometry), &fragment).unwrap();

  assert_eq!(
    program.uniform_desc("extrusion").map(|desc| desc.ty),
    Some(UniformType::Float)
  );
  assert_eq!(program.uniforms().count(), 4);
}
