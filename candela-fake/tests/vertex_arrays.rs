use candela::buffer::{Buffer, Usage};
use candela::vertex_array::{
  AttributeKind, VertexArrayBuilder, VertexArrayError, VertexAttribute,
};
use candela_fake::{FakeBackend, FakeConfig, FakeContext};

fn positions(ctx: &mut FakeContext) -> Buffer<FakeBackend, f32> {
  Buffer::from_slice(ctx, Usage::StaticDraw, &[0.; 8]).unwrap()
}

#[test]
fn descriptions_need_at_least_one_attribute() {
  let mut ctx = FakeContext::new("vertex-arrays");

  assert_eq!(
    VertexArrayBuilder::<FakeBackend>::new().build(&mut ctx).err(),
    Some(VertexArrayError::NoAttributes)
  );
}

#[test]
fn component_counts_run_from_one_to_four() {
  let mut ctx = FakeContext::new("vertex-arrays");
  let buffer = positions(&mut ctx);

  let result = VertexArrayBuilder::new()
    .attribute(VertexAttribute::new(0, 5, AttributeKind::Float), &buffer)
    .build(&mut ctx);

  assert_eq!(
    result.err(),
    Some(VertexArrayError::InvalidComponentCount {
      index: 0,
      components: 5,
    })
  );
}

#[test]
fn integral_attributes_cannot_use_floating_kinds() {
  let mut ctx = FakeContext::new("vertex-arrays");
  let buffer = positions(&mut ctx);

  let attribute = VertexAttribute::new(0, 2, AttributeKind::Float).set_integral(true);
  let result = VertexArrayBuilder::new()
    .attribute(attribute, &buffer)
    .build(&mut ctx);

  assert_eq!(
    result.err(),
    Some(VertexArrayError::InvalidIntegralAttribute(0))
  );
}

#[test]
fn integral_attributes_cannot_normalize() {
  let mut ctx = FakeContext::new("vertex-arrays");
  let buffer = positions(&mut ctx);

  let attribute = VertexAttribute::new(0, 2, AttributeKind::Int)
    .set_integral(true)
    .set_normalized(true);
  let result = VertexArrayBuilder::new()
    .attribute(attribute, &buffer)
    .build(&mut ctx);

  assert_eq!(
    result.err(),
    Some(VertexArrayError::InvalidIntegralAttribute(0))
  );
}

#[test]
fn attribute_indices_are_claimed_once() {
  let mut ctx = FakeContext::new("vertex-arrays");
  let buffer = positions(&mut ctx);

  let result = VertexArrayBuilder::new()
    .attribute(VertexAttribute::new(1, 2, AttributeKind::Float), &buffer)
    .attribute(VertexAttribute::new(1, 4, AttributeKind::Float), &buffer)
    .build(&mut ctx);

  assert_eq!(
    result.err(),
    Some(VertexArrayError::AttributeAlreadyAssigned(1))
  );
}

#[test]
fn the_device_bounds_attribute_indices() {
  let config = FakeConfig::default().set_max_vertex_attributes(4);
  let mut ctx = FakeContext::with_config("vertex-arrays", config);
  let buffer = positions(&mut ctx);

  let result = VertexArrayBuilder::new()
    .attribute(VertexAttribute::new(7, 2, AttributeKind::Float), &buffer)
    .build(&mut ctx);

  assert_eq!(
    result.err(),
    Some(VertexArrayError::AttributeOutOfRange {
      index: 7,
      max_attributes: 4,
    })
  );
}

#[test]
fn buffers_from_another_context_are_rejected() {
  let mut ctx = FakeContext::new("vertex-arrays");
  let mut other = FakeContext::new("elsewhere");
  let foreign = positions(&mut other);

  let result = VertexArrayBuilder::new()
    .attribute(VertexAttribute::new(0, 2, AttributeKind::Float), &foreign)
    .build(&mut ctx);

  match result {
    Err(VertexArrayError::DriverError(reason)) => assert!(reason.contains("another context")),
    unexpected => panic!("unexpected result: {:?}", unexpected),
  }
}

#[test]
fn interleaved_layouts_build() {
  let mut ctx = FakeContext::new("vertex-arrays");
  // four vertices of [position x, y | color r, g, b], tightly interleaved
  let vertices = Buffer::from_slice(&mut ctx, Usage::StaticDraw, &[0.0f32; 20]).unwrap();

  let stride = 5 * 4;
  let array = VertexArrayBuilder::new()
    .attribute(
      VertexAttribute::new(0, 2, AttributeKind::Float).set_stride(stride),
      &vertices,
    )
    .attribute(
      VertexAttribute::new(1, 3, AttributeKind::Float)
        .set_stride(stride)
        .set_offset(2 * 4),
      &vertices,
    )
    .build(&mut ctx)
    .unwrap();

  assert_eq!(array.indices(), None);
}
