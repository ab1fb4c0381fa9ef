use candela::buffer::{Buffer, Usage};
use candela::context::GraphicsContext;
use candela::depth_stencil::{Comparison, StencilTest, Write};
use candela::formats::TextureFormat;
use candela::framebuffer::{Framebuffer, FramebufferBuilder};
use candela::pipeline::{ClearSpec, PipelineError, Primitive};
use candela::render_state::{RenderState, Strictness};
use candela::texture::{Sampler, Texture2D};
use candela::vertex_array::{AttributeKind, IndexType, VertexArrayBuilder, VertexAttribute};
use candela::viewport::Viewport;
use candela_fake::{FakeBackend, FakeConfig, FakeContext};

fn color_target(ctx: &mut FakeContext) -> (Texture2D<FakeBackend>, Framebuffer<FakeBackend>) {
  let color = Texture2D::new(ctx, 4, 4, TextureFormat::RGBA8, &Sampler::default()).unwrap();
  let target = FramebufferBuilder::new().color(0, &color).build(ctx).unwrap();
  (color, target)
}

#[test]
fn strict_clears_demand_the_buffers_they_touch() {
  let mut ctx = FakeContext::new("frames");
  let (_color, target) = color_target(&mut ctx);

  let mut frame = ctx.frame();
  frame.render_to(&target);

  let spec = ClearSpec::new().set_color([0., 0., 0., 1.]).set_depth(1.);
  assert_eq!(frame.clear(&spec), Err(PipelineError::NoDepthBuffer));

  let spec = ClearSpec::new().set_stencil(0);
  assert_eq!(frame.clear(&spec), Err(PipelineError::NoStencilBuffer));

  let spec = ClearSpec::new().set_color([0., 0., 0., 1.]);
  frame.clear(&spec).unwrap();
}

#[test]
fn lenient_clears_skip_missing_buffers() {
  let mut ctx = FakeContext::new("frames");
  let (_color, target) = color_target(&mut ctx);

  let mut frame = ctx.frame();
  frame.render_to(&target);

  let spec = ClearSpec::new()
    .set_color([0.; 4])
    .set_depth(1.)
    .set_stencil(0)
    .set_strictness(Strictness::Lenient);

  frame.clear(&spec).unwrap();
}

#[test]
fn the_back_buffer_clears_every_buffer_it_carries() {
  let config = FakeConfig::default().set_depth_bits(24).set_stencil_bits(8);
  let mut ctx = FakeContext::with_config("frames", config);
  let back = Framebuffer::back_buffer(&mut ctx, [320, 200]).unwrap();

  let mut frame = ctx.frame();
  frame.render_to(&back);

  let spec = ClearSpec::new().set_color([0.; 4]).set_depth(1.).set_stencil(0);
  frame.clear(&spec).unwrap();
}

#[test]
fn depth_tests_against_a_depthless_target_are_strict_errors() {
  let mut ctx = FakeContext::new("frames");
  let (_color, target) = color_target(&mut ctx);

  let mut frame = ctx.frame();
  frame.render_to(&target);

  let state = RenderState::default().set_depth_test(Comparison::Less);
  assert_eq!(frame.apply(&state), Err(PipelineError::NoDepthBuffer));

  let lenient = state.set_strictness(Strictness::Lenient);
  frame.apply(&lenient).unwrap();
}

#[test]
fn depth_writes_against_a_depthless_target_are_strict_errors() {
  let mut ctx = FakeContext::new("frames");
  let (_color, target) = color_target(&mut ctx);

  let mut frame = ctx.frame();
  frame.render_to(&target);

  // writes are on by default even with the test disabled
  let state = RenderState::default().set_depth_test(None);
  assert_eq!(frame.apply(&state), Err(PipelineError::NoDepthBuffer));

  frame.apply(&state.set_depth_write(Write::Off)).unwrap();
}

#[test]
fn stencil_tests_demand_stencil_bits() {
  let mut ctx = FakeContext::new("frames");
  let depth =
    Texture2D::new(&mut ctx, 4, 4, TextureFormat::Depth24, &Sampler::default()).unwrap();
  let target = FramebufferBuilder::new().depth(&depth).build(&mut ctx).unwrap();

  let mut frame = ctx.frame();
  frame.render_to(&target);

  let state = RenderState::default()
    .set_stencil(StencilTest::new().set_comparison(Comparison::Equal));
  assert_eq!(frame.apply(&state), Err(PipelineError::NoStencilBuffer));
}

#[test]
fn full_render_states_apply_against_a_complete_target() {
  let mut ctx = FakeContext::new("frames");
  let color = Texture2D::new(&mut ctx, 4, 4, TextureFormat::RGBA8, &Sampler::default()).unwrap();
  let depth = Texture2D::new(
    &mut ctx,
    4,
    4,
    TextureFormat::Depth24Stencil8,
    &Sampler::default(),
  )
  .unwrap();
  let target = FramebufferBuilder::new()
    .color(0, &color)
    .depth(&depth)
    .build(&mut ctx)
    .unwrap();

  let mut frame = ctx.frame();
  frame.render_to(&target);
  frame.set_viewport(Viewport::Whole);

  let state = RenderState::default()
    .set_depth_test(Comparison::LessOrEqual)
    .set_stencil(StencilTest::new().set_comparison(Comparison::Always));
  frame.apply(&state).unwrap();
}

#[test]
fn line_widths_are_validated_against_the_device_range() {
  let config = FakeConfig::default().set_line_width_range([1., 4.]);
  let mut ctx = FakeContext::with_config("frames", config);

  let mut frame = ctx.frame();
  frame.set_line_width(2.).unwrap();

  assert_eq!(
    frame.set_line_width(16.),
    Err(PipelineError::LineWidthOutOfRange {
      requested: 16.,
      range: [1., 4.],
    })
  );
}

#[test]
fn indexed_draws_require_an_index_buffer() {
  let mut ctx = FakeContext::new("frames");
  let positions = Buffer::from_slice(&mut ctx, Usage::StaticDraw, &[0.0f32; 6]).unwrap();
  let triangle = VertexArrayBuilder::new()
    .attribute(VertexAttribute::new(0, 2, AttributeKind::Float), &positions)
    .build(&mut ctx)
    .unwrap();

  let mut frame = ctx.frame();
  frame.draw_arrays(&triangle, Primitive::Triangles, 0, 3);
  frame.draw_arrays_instanced(&triangle, Primitive::Triangles, 0, 3, 8);

  assert_eq!(
    frame.draw_elements(&triangle, Primitive::Triangles),
    Err(PipelineError::NoIndexBuffer)
  );
}

#[test]
fn index_buffers_carry_their_type_and_count() {
  let mut ctx = FakeContext::new("frames");
  let positions = Buffer::from_slice(&mut ctx, Usage::StaticDraw, &[0.0f32; 8]).unwrap();
  let indices = Buffer::from_slice(&mut ctx, Usage::StaticDraw, &[0u16, 1, 2, 2, 1, 3]).unwrap();

  let quad = VertexArrayBuilder::new()
    .attribute(VertexAttribute::new(0, 2, AttributeKind::Float), &positions)
    .indices(&indices)
    .build(&mut ctx)
    .unwrap();

  assert_eq!(quad.indices(), Some((IndexType::UnsignedShort, 6)));

  let mut frame = ctx.frame();
  frame.draw_elements(&quad, Primitive::Triangles).unwrap();
  frame
    .draw_elements_instanced(&quad, Primitive::Triangles, 4)
    .unwrap();
}
