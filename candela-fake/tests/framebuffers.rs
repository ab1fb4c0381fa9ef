use candela::formats::{FormatError, TextureFormat};
use candela::framebuffer::{
  BlitBuffers, BlitFilter, Framebuffer, FramebufferBuilder, FramebufferError,
};
use candela::texture::{Region, Sampler, Texture2D};
use candela_fake::{FakeBackend, FakeConfig, FakeContext};

fn color_texture(ctx: &mut FakeContext, width: u32, height: u32) -> Texture2D<FakeBackend> {
  Texture2D::new(ctx, width, height, TextureFormat::RGBA8, &Sampler::default()).unwrap()
}

#[test]
fn color_and_depth_attachments_negotiate_their_formats() {
  let mut ctx = FakeContext::new("framebuffers");
  let color = color_texture(&mut ctx, 8, 8);
  let depth = Texture2D::new(
    &mut ctx,
    8,
    8,
    TextureFormat::Depth24Stencil8,
    &Sampler::default(),
  )
  .unwrap();

  let framebuffer = FramebufferBuilder::new()
    .color(0, &color)
    .depth(&depth)
    .build(&mut ctx)
    .unwrap();

  assert_eq!(framebuffer.size(), [8, 8]);
  assert_eq!(framebuffer.color_points(), &[0]);
  assert!(framebuffer.has_depth());
  assert_eq!(framebuffer.depth_bits(), 24);
  assert_eq!(framebuffer.stencil_bits(), 8);
}

#[test]
fn non_renderable_color_formats_are_rejected() {
  let mut ctx = FakeContext::new("framebuffers");
  let texture =
    Texture2D::new(&mut ctx, 8, 8, TextureFormat::RGB32F, &Sampler::default()).unwrap();

  assert_eq!(
    FramebufferBuilder::new()
      .color(0, &texture)
      .build(&mut ctx)
      .err(),
    Some(FramebufferError::UnsupportedAttachment(
      FormatError::NotColorRenderable(TextureFormat::RGB32F)
    ))
  );
}

#[test]
fn color_formats_cannot_back_the_depth_attachment() {
  let mut ctx = FakeContext::new("framebuffers");
  let texture = color_texture(&mut ctx, 8, 8);

  assert_eq!(
    FramebufferBuilder::new().depth(&texture).build(&mut ctx).err(),
    Some(FramebufferError::UnsupportedAttachment(
      FormatError::NotDepthRenderable(TextureFormat::RGBA8)
    ))
  );
}

#[test]
fn attachments_share_one_size() {
  let mut ctx = FakeContext::new("framebuffers");
  let small = color_texture(&mut ctx, 4, 4);
  let large = color_texture(&mut ctx, 8, 8);

  assert_eq!(
    FramebufferBuilder::new()
      .color(0, &small)
      .color(1, &large)
      .build(&mut ctx)
      .err(),
    Some(FramebufferError::AttachmentSizeMismatch {
      expected: [4, 4],
      actual: [8, 8],
    })
  );
}

#[test]
fn empty_descriptions_have_no_size() {
  let mut ctx = FakeContext::new("framebuffers");

  assert_eq!(
    FramebufferBuilder::<FakeBackend>::new().build(&mut ctx).err(),
    Some(FramebufferError::NoAttachments)
  );
}

#[test]
fn depth_only_framebuffers_are_legal() {
  let mut ctx = FakeContext::new("framebuffers");
  let depth =
    Texture2D::new(&mut ctx, 4, 4, TextureFormat::Depth32F, &Sampler::default()).unwrap();

  let framebuffer = FramebufferBuilder::new().depth(&depth).build(&mut ctx).unwrap();

  assert!(framebuffer.color_points().is_empty());
  assert!(framebuffer.has_depth());
  assert_eq!(framebuffer.depth_bits(), 32);
  assert_eq!(framebuffer.stencil_bits(), 0);
}

#[test]
fn the_device_bounds_color_attachments() {
  let config = FakeConfig::default().set_max_color_attachments(2);
  let mut ctx = FakeContext::with_config("framebuffers", config);
  let t0 = color_texture(&mut ctx, 4, 4);
  let t1 = color_texture(&mut ctx, 4, 4);
  let t2 = color_texture(&mut ctx, 4, 4);

  assert_eq!(
    FramebufferBuilder::new()
      .color(0, &t0)
      .color(1, &t1)
      .color(2, &t2)
      .build(&mut ctx)
      .err(),
    Some(FramebufferError::TooManyColorAttachments {
      requested: 3,
      max: 2,
    })
  );
}

#[test]
fn attachment_points_are_bounded_too() {
  let config = FakeConfig::default().set_max_color_attachments(2);
  let mut ctx = FakeContext::with_config("framebuffers", config);
  let texture = color_texture(&mut ctx, 4, 4);

  assert_eq!(
    FramebufferBuilder::new()
      .color(5, &texture)
      .build(&mut ctx)
      .err(),
    Some(FramebufferError::TooManyColorAttachments {
      requested: 6,
      max: 2,
    })
  );
}

#[test]
fn attaching_twice_at_one_point_replaces() {
  let mut ctx = FakeContext::new("framebuffers");
  let first = color_texture(&mut ctx, 4, 4);
  let second = color_texture(&mut ctx, 4, 4);

  let framebuffer = FramebufferBuilder::new()
    .color(0, &first)
    .color(0, &second)
    .build(&mut ctx)
    .unwrap();

  assert_eq!(framebuffer.color_points(), &[0]);
}

#[test]
fn attachment_points_come_back_sorted() {
  let mut ctx = FakeContext::new("framebuffers");
  let t0 = color_texture(&mut ctx, 4, 4);
  let t1 = color_texture(&mut ctx, 4, 4);
  let t2 = color_texture(&mut ctx, 4, 4);

  let framebuffer = FramebufferBuilder::new()
    .color(2, &t0)
    .color(0, &t1)
    .color(1, &t2)
    .build(&mut ctx)
    .unwrap();

  assert_eq!(framebuffer.color_points(), &[0, 1, 2]);
}

#[test]
fn attachments_from_another_context_are_rejected() {
  let mut ctx = FakeContext::new("framebuffers");
  let mut other = FakeContext::new("elsewhere");
  let foreign = color_texture(&mut other, 4, 4);

  match FramebufferBuilder::new().color(0, &foreign).build(&mut ctx) {
    Err(FramebufferError::DriverError(reason)) => assert!(reason.contains("another context")),
    unexpected => panic!("unexpected result: {:?}", unexpected),
  }
}

#[test]
fn the_back_buffer_reports_the_context_bits() {
  let config = FakeConfig::default().set_depth_bits(16).set_stencil_bits(0);
  let mut ctx = FakeContext::with_config("framebuffers", config);

  let back = Framebuffer::back_buffer(&mut ctx, [640, 480]).unwrap();

  assert_eq!(back.size(), [640, 480]);
  assert_eq!(back.depth_bits(), 16);
  assert_eq!(back.stencil_bits(), 0);
}

#[test]
fn depth_and_stencil_blits_require_the_nearest_filter() {
  let mut ctx = FakeContext::new("framebuffers");
  let src_color = color_texture(&mut ctx, 4, 4);
  let dst_color = color_texture(&mut ctx, 4, 4);
  let src = FramebufferBuilder::new()
    .color(0, &src_color)
    .build(&mut ctx)
    .unwrap();
  let dst = FramebufferBuilder::new()
    .color(0, &dst_color)
    .build(&mut ctx)
    .unwrap();

  let whole = Region::whole(4, 4);

  assert_eq!(
    src.blit_to(&mut ctx, &dst, whole, whole, BlitBuffers::DEPTH, BlitFilter::Linear),
    Err(FramebufferError::BlitDepthStencilRequiresNearest)
  );

  src
    .blit_to(&mut ctx, &dst, whole, whole, BlitBuffers::COLOR, BlitFilter::Linear)
    .unwrap();
  src
    .blit_to(&mut ctx, &dst, whole, whole, BlitBuffers::DEPTH, BlitFilter::Nearest)
    .unwrap();
}

#[test]
fn blit_regions_must_fit() {
  let mut ctx = FakeContext::new("framebuffers");
  let src_color = color_texture(&mut ctx, 4, 4);
  let dst_color = color_texture(&mut ctx, 8, 8);
  let src = FramebufferBuilder::new()
    .color(0, &src_color)
    .build(&mut ctx)
    .unwrap();
  let dst = FramebufferBuilder::new()
    .color(0, &dst_color)
    .build(&mut ctx)
    .unwrap();

  let overflowing = Region {
    x: 2,
    y: 0,
    width: 4,
    height: 4,
  };

  assert_eq!(
    src.blit_to(
      &mut ctx,
      &dst,
      overflowing,
      Region::whole(8, 8),
      BlitBuffers::COLOR,
      BlitFilter::Nearest,
    ),
    Err(FramebufferError::BlitRegionOutOfBounds {
      region: overflowing,
      size: [4, 4],
    })
  );
}
