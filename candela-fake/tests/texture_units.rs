use candela::formats::TextureFormat;
use candela::texture::{Sampler, Texture2D};
use candela::texture_units::{TextureUnitError, TextureUnits};
use candela_fake::{FakeBackend, FakeConfig, FakeContext};

fn texture(ctx: &mut FakeContext) -> Texture2D<FakeBackend> {
  Texture2D::new(ctx, 2, 2, TextureFormat::RGBA8, &Sampler::default()).unwrap()
}

#[test]
fn binds_claim_free_units_in_ascending_order() {
  let mut ctx = FakeContext::new("units");
  let t0 = texture(&mut ctx);
  let t1 = texture(&mut ctx);

  let mut units = TextureUnits::new(4, 8);
  let root = units.root();

  assert_eq!(units.bind_2d(&mut ctx, &root, &t0).unwrap(), 0);
  assert_eq!(units.bind_2d(&mut ctx, &root, &t1).unwrap(), 1);
  assert_eq!(units.free_units(), 2);
}

#[test]
fn exhausted_units_are_an_error() {
  let config = FakeConfig::default().set_max_texture_units(2);
  let mut ctx = FakeContext::with_config("units", config);
  let t0 = texture(&mut ctx);
  let t1 = texture(&mut ctx);
  let t2 = texture(&mut ctx);

  let mut units = TextureUnits::new(2, 8);
  let root = units.root();

  units.bind_2d(&mut ctx, &root, &t0).unwrap();
  units.bind_2d(&mut ctx, &root, &t1).unwrap();

  assert_eq!(
    units.bind_2d(&mut ctx, &root, &t2).err(),
    Some(TextureUnitError::Exhausted { max_units: 2 })
  );
}

#[test]
fn child_contexts_start_from_their_parents_bindings() {
  let mut ctx = FakeContext::new("units");
  let t0 = texture(&mut ctx);
  let t1 = texture(&mut ctx);

  let mut units = TextureUnits::new(4, 8);
  let root = units.root();

  units.bind_2d(&mut ctx, &root, &t0).unwrap();

  let child = units.push(&root).unwrap();
  assert_eq!(child.depth(), 1);

  // unit 0 is taken by the parent; the child claims the next one
  assert_eq!(units.bind_2d(&mut ctx, &child, &t1).unwrap(), 1);
  assert_eq!(units.free_units(), 2);
}

#[test]
fn pops_release_only_what_the_context_claimed() {
  let mut ctx = FakeContext::new("units");
  let t0 = texture(&mut ctx);
  let t1 = texture(&mut ctx);

  let mut units = TextureUnits::new(4, 8);
  let root = units.root();

  let parent_unit = units.bind_2d(&mut ctx, &root, &t0).unwrap();

  let child = units.push(&root).unwrap();
  units.bind_2d(&mut ctx, &child, &t1).unwrap();
  assert_eq!(units.free_units(), 2);

  units.pop(&mut ctx, child).unwrap();

  assert_eq!(units.free_units(), 3);
  units.unbind(&mut ctx, &root, parent_unit).unwrap();
  assert_eq!(units.free_units(), 4);
}

#[test]
fn only_the_innermost_context_may_bind() {
  let mut ctx = FakeContext::new("units");
  let t0 = texture(&mut ctx);

  let mut units = TextureUnits::new(4, 8);
  let root = units.root();
  let _child = units.push(&root).unwrap();

  assert_eq!(
    units.bind_2d(&mut ctx, &root, &t0).err(),
    Some(TextureUnitError::ContextNotCurrent {
      depth: 0,
      current: 1,
    })
  );
}

#[test]
fn the_root_context_cannot_be_popped() {
  let mut ctx = FakeContext::new("units");
  let mut units = TextureUnits::new(4, 8);
  let root = units.root();

  assert_eq!(
    units.pop(&mut ctx, root),
    Err(TextureUnitError::RootContext)
  );
}

#[test]
fn units_claimed_by_the_parent_cannot_be_unbound_by_a_child() {
  let mut ctx = FakeContext::new("units");
  let t0 = texture(&mut ctx);

  let mut units = TextureUnits::new(4, 8);
  let root = units.root();
  let unit = units.bind_2d(&mut ctx, &root, &t0).unwrap();

  let child = units.push(&root).unwrap();

  assert_eq!(
    units.unbind(&mut ctx, &child, unit),
    Err(TextureUnitError::NotClaimedHere(unit))
  );
}

#[test]
fn unbinding_past_the_device_range_is_an_error() {
  let mut ctx = FakeContext::new("units");
  let mut units = TextureUnits::new(4, 8);
  let root = units.root();

  assert_eq!(
    units.unbind(&mut ctx, &root, 9),
    Err(TextureUnitError::OutOfRange {
      unit: 9,
      max_units: 4,
    })
  );
}

#[test]
fn the_stack_limit_bounds_pushes() {
  let mut units = TextureUnits::<FakeBackend>::new(4, 2);
  let root = units.root();
  let child = units.push(&root).unwrap();

  assert_eq!(
    units.push(&child).err(),
    Some(TextureUnitError::StackLimitReached { limit: 2 })
  );
}

#[test]
fn foreign_textures_cannot_be_bound() {
  let mut ctx = FakeContext::new("units");
  let mut other = FakeContext::new("elsewhere");
  let foreign = texture(&mut other);

  let mut units = TextureUnits::new(4, 8);
  let root = units.root();

  assert_eq!(
    units.bind_2d(&mut ctx, &root, &foreign).err(),
    Some(TextureUnitError::ContextMismatch)
  );
}

#[test]
fn cubemaps_claim_units_like_flat_textures() {
  use candela::texture::TextureCube;

  let mut ctx = FakeContext::new("units");
  let cube = TextureCube::new(&mut ctx, 2, TextureFormat::RGBA8, &Sampler::default()).unwrap();

  let mut units = TextureUnits::new(4, 8);
  let root = units.root();

  assert_eq!(units.bind_cube(&mut ctx, &root, &cube).unwrap(), 0);
}
