use candela::context::GraphicsContext;
use candela::version::{Api, Version};
use candela_fake::{FakeConfig, FakeContext};

#[test]
fn limits_come_from_the_configuration() {
  let config = FakeConfig::default()
    .set_max_texture_size(2048)
    .set_max_texture_units(32)
    .set_max_color_attachments(4)
    .set_max_vertex_attributes(8)
    .set_line_width_range([0.5, 10.]);
  let mut ctx = FakeContext::with_config("queries", config);

  let limits = ctx.query().limits().unwrap();

  assert_eq!(limits.max_texture_size, 2048);
  assert_eq!(limits.max_texture_units, 32);
  assert_eq!(limits.max_color_attachments, 4);
  assert_eq!(limits.max_vertex_attributes, 8);
  assert_eq!(limits.line_width_range, [0.5, 10.]);
}

#[test]
fn extensions_are_advertised_verbatim() {
  let config = FakeConfig::default().set_extensions(["EXT_texture_filter_anisotropic"]);
  let mut ctx = FakeContext::with_config("queries", config);
  let mut query = ctx.query();

  assert!(query
    .supports_extension("EXT_texture_filter_anisotropic")
    .unwrap());
  assert!(!query.supports_extension("ARB_bindless_texture").unwrap());
  assert_eq!(query.extensions().unwrap().len(), 1);
}

#[test]
fn no_extensions_are_advertised_by_default() {
  let mut ctx = FakeContext::new("queries");

  assert!(ctx.query().extensions().unwrap().is_empty());
}

#[test]
fn the_version_facade_parses_the_fake_driver() {
  let mut ctx = FakeContext::new("queries");
  let mut query = ctx.query();

  let version = query.backend_version().unwrap();
  assert_eq!(version.api, Api::Core);
  assert!(version.supports(3, 3));
  assert!(!version.supports(4, 0));

  let raw = query.backend_version_string().unwrap();
  assert_eq!(Version::parse(&raw).unwrap(), version);
}

#[test]
fn fake_contexts_identify_themselves() {
  let mut ctx = FakeContext::new("main");
  assert_eq!(ctx.name(), "main");

  let mut query = ctx.query();
  assert!(query.backend_name().unwrap().contains("main"));
  assert!(!query.backend_author().unwrap().is_empty());
  assert!(!query.backend_shading_lang_version().unwrap().is_empty());
}
