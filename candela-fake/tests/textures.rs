use candela::formats::TextureFormat;
use candela::texture::{CubeFace, Region, Sampler, Texture2D, TextureCube, TextureError};
use candela_fake::{FakeConfig, FakeContext};

#[test]
fn textures_must_be_at_least_two_texels_wide() {
  let mut ctx = FakeContext::new("textures");
  let result = Texture2D::new(&mut ctx, 1, 64, TextureFormat::RGBA8, &Sampler::default());

  assert_eq!(
    result.err(),
    Some(TextureError::TooSmall {
      width: 1,
      height: 64,
    })
  );
}

#[test]
fn the_device_maximum_bounds_texture_sizes() {
  let config = FakeConfig::default().set_max_texture_size(256);
  let mut ctx = FakeContext::with_config("textures", config);

  let result = Texture2D::new(&mut ctx, 512, 16, TextureFormat::RGBA8, &Sampler::default());

  assert_eq!(
    result.err(),
    Some(TextureError::TooLarge {
      requested: 512,
      max: 256,
    })
  );

  let result = TextureCube::new(&mut ctx, 512, TextureFormat::RGBA8, &Sampler::default());
  assert!(matches!(result, Err(TextureError::TooLarge { .. })));
}

#[test]
fn uploads_must_carry_exactly_the_region_bytes() {
  let mut ctx = FakeContext::new("textures");
  let mut texture =
    Texture2D::new(&mut ctx, 4, 4, TextureFormat::RG8, &Sampler::default()).unwrap();

  // a 2x2 region of RG8 spans 8 bytes
  let region = Region {
    x: 0,
    y: 0,
    width: 2,
    height: 2,
  };

  assert_eq!(
    texture.upload(region, &[0; 7]),
    Err(TextureError::NotEnoughTexels {
      expected_bytes: 8,
      provided_bytes: 7,
    })
  );

  assert_eq!(
    texture.upload(region, &[0; 9]),
    Err(TextureError::TooManyTexels {
      expected_bytes: 8,
      provided_bytes: 9,
    })
  );
}

#[test]
fn regions_must_fit_in_the_texture() {
  let mut ctx = FakeContext::new("textures");
  let mut texture =
    Texture2D::new(&mut ctx, 4, 4, TextureFormat::R8, &Sampler::default()).unwrap();
  let region = Region {
    x: 3,
    y: 0,
    width: 2,
    height: 1,
  };

  assert_eq!(
    texture.upload(region, &[0; 2]),
    Err(TextureError::RegionOutOfBounds {
      region,
      width: 4,
      height: 4,
    })
  );
}

#[test]
fn empty_regions_are_out_of_bounds() {
  let mut ctx = FakeContext::new("textures");
  let mut texture =
    Texture2D::new(&mut ctx, 4, 4, TextureFormat::R8, &Sampler::default()).unwrap();
  let region = Region {
    x: 0,
    y: 0,
    width: 0,
    height: 2,
  };

  assert!(matches!(
    texture.upload(region, &[]),
    Err(TextureError::RegionOutOfBounds { .. })
  ));
}

#[test]
fn region_uploads_land_where_they_aim() {
  let mut ctx = FakeContext::new("textures");
  let mut texture =
    Texture2D::new(&mut ctx, 4, 4, TextureFormat::R8, &Sampler::default()).unwrap();

  let region = Region {
    x: 1,
    y: 2,
    width: 2,
    height: 1,
  };
  texture.upload(region, &[7, 9]).unwrap();

  let texels = texture.read().unwrap();
  assert_eq!(texels.len(), 16);
  assert_eq!(texels[2 * 4 + 1], 7);
  assert_eq!(texels[2 * 4 + 2], 9);
  assert_eq!(texels.iter().filter(|&&texel| texel != 0).count(), 2);
}

#[test]
fn whole_uploads_round_trip() {
  let mut ctx = FakeContext::new("textures");
  let mut texture =
    Texture2D::new(&mut ctx, 2, 2, TextureFormat::RGBA8, &Sampler::default()).unwrap();

  let texels: Vec<u8> = (0..16).collect();
  texture.upload_whole(&texels).unwrap();

  assert_eq!(texture.read().unwrap(), texels);
}

#[test]
fn cube_faces_are_independent_images() {
  let mut ctx = FakeContext::new("textures");
  let mut cube = TextureCube::new(&mut ctx, 2, TextureFormat::R8, &Sampler::default()).unwrap();

  cube
    .upload_whole_face(CubeFace::NegativeY, &[1, 2, 3, 4])
    .unwrap();

  assert_eq!(cube.read_face(CubeFace::NegativeY).unwrap(), vec![1, 2, 3, 4]);

  for face in CubeFace::ALL {
    if face != CubeFace::NegativeY {
      assert_eq!(cube.read_face(face).unwrap(), vec![0; 4], "face {:?}", face);
    }
  }
}

#[test]
fn depth_formats_store_their_texel_width() {
  let mut ctx = FakeContext::new("textures");
  let texture =
    Texture2D::new(&mut ctx, 2, 2, TextureFormat::Depth24Stencil8, &Sampler::default()).unwrap();

  // 4 bytes per texel, 4 texels
  assert_eq!(texture.read().unwrap().len(), 16);
}
