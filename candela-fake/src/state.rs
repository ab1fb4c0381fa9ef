//! Software graphics state.
//!
//! [`FakeState`] plays the role a driver context plays for a real backend: it tracks bindings,
//! hands out object ids and carries the advertised limits. Resource representations keep a
//! reference-counted handle on it, which doubles as the identity of the context they belong to.

use candela::version::{Api, Extensions, Limits, Version};

/// How much the software clock advances per observation.
pub(crate) const CLOCK_STEP_NANOSECONDS: u64 = 1_000_000;

const DEFAULT_BACK_BUFFER_SIZE: [u32; 2] = [640, 480];

/// Device properties of a software context.
///
/// Built with [`FakeConfig::default`] and refined with the `set_*` methods. The defaults
/// describe a small but complete device: 16 texture units, 1024×1024 textures, 8 color
/// attachments, 16 vertex attributes, line widths from 1 to 8 and a 24/8 depth/stencil back
/// buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct FakeConfig {
  max_texture_size: usize,
  max_texture_units: usize,
  max_color_attachments: usize,
  max_vertex_attributes: usize,
  line_width_range: [f32; 2],
  depth_bits: usize,
  stencil_bits: usize,
  extensions: Vec<String>,
}

impl Default for FakeConfig {
  fn default() -> Self {
    FakeConfig {
      max_texture_size: 1024,
      max_texture_units: 16,
      max_color_attachments: 8,
      max_vertex_attributes: 16,
      line_width_range: [1., 8.],
      depth_bits: 24,
      stencil_bits: 8,
      extensions: Vec::new(),
    }
  }
}

impl FakeConfig {
  /// Largest texture dimension the device accepts.
  pub fn set_max_texture_size(self, max_texture_size: usize) -> Self {
    Self {
      max_texture_size,
      ..self
    }
  }

  /// Number of texture units the device exposes.
  pub fn set_max_texture_units(self, max_texture_units: usize) -> Self {
    Self {
      max_texture_units,
      ..self
    }
  }

  /// Number of color attachments a framebuffer supports.
  pub fn set_max_color_attachments(self, max_color_attachments: usize) -> Self {
    Self {
      max_color_attachments,
      ..self
    }
  }

  /// Number of vertex attributes a vertex array supports.
  pub fn set_max_vertex_attributes(self, max_vertex_attributes: usize) -> Self {
    Self {
      max_vertex_attributes,
      ..self
    }
  }

  /// Smallest and largest line width the device rasterizes.
  pub fn set_line_width_range(self, line_width_range: [f32; 2]) -> Self {
    Self {
      line_width_range,
      ..self
    }
  }

  /// Depth bits of the back buffer.
  pub fn set_depth_bits(self, depth_bits: usize) -> Self {
    Self { depth_bits, ..self }
  }

  /// Stencil bits of the back buffer.
  pub fn set_stencil_bits(self, stencil_bits: usize) -> Self {
    Self {
      stencil_bits,
      ..self
    }
  }

  /// Extension names the device advertises.
  pub fn set_extensions<I>(self, extensions: I) -> Self
  where
    I: IntoIterator,
    I::Item: Into<String>,
  {
    Self {
      extensions: extensions.into_iter().map(Into::into).collect(),
      ..self
    }
  }
}

/// The mutable state of one software context.
#[derive(Debug)]
pub(crate) struct FakeState {
  name: String,
  limits: Limits,
  extensions: Extensions,
  back_buffer_bits: [usize; 2],
  next_id: u64,
  bound_units: Vec<Option<u64>>,
  current_program: u64,
  bound_vertex_array: u64,
  draw_framebuffer: u64,
  read_framebuffer: u64,
  draw_framebuffer_size: [u32; 2],
  draw_framebuffer_bits: [usize; 2],
  timer_running: bool,
  clock_nanoseconds: u64,
}

impl FakeState {
  pub(crate) fn new(name: String, config: FakeConfig) -> Self {
    let limits = Limits {
      max_texture_size: config.max_texture_size,
      max_texture_units: config.max_texture_units,
      max_color_attachments: config.max_color_attachments,
      max_vertex_attributes: config.max_vertex_attributes,
      line_width_range: config.line_width_range,
    };
    let back_buffer_bits = [config.depth_bits, config.stencil_bits];

    log::debug!("context {}: created", name);

    FakeState {
      name,
      limits,
      extensions: Extensions::new(config.extensions),
      back_buffer_bits,
      next_id: 1,
      bound_units: vec![None; config.max_texture_units],
      current_program: 0,
      bound_vertex_array: 0,
      draw_framebuffer: 0,
      read_framebuffer: 0,
      draw_framebuffer_size: DEFAULT_BACK_BUFFER_SIZE,
      draw_framebuffer_bits: back_buffer_bits,
      timer_running: false,
      clock_nanoseconds: 0,
    }
  }

  pub(crate) fn name(&self) -> &str {
    &self.name
  }

  pub(crate) fn limits(&self) -> Limits {
    self.limits
  }

  pub(crate) fn extensions(&self) -> &Extensions {
    &self.extensions
  }

  pub(crate) fn version(&self) -> Version {
    Version::new(Api::Core, 3, 3)
  }

  pub(crate) fn back_buffer_bits(&self) -> [usize; 2] {
    self.back_buffer_bits
  }

  pub(crate) fn draw_framebuffer_size(&self) -> [u32; 2] {
    self.draw_framebuffer_size
  }

  pub(crate) fn draw_framebuffer_bits(&self) -> [usize; 2] {
    self.draw_framebuffer_bits
  }

  /// Hand out a fresh object id. Id 0 stands for the default framebuffer.
  pub(crate) fn fresh_id(&mut self) -> u64 {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  /// Advance the software clock and observe it.
  pub(crate) fn next_instant(&mut self) -> u64 {
    self.clock_nanoseconds += CLOCK_STEP_NANOSECONDS;
    self.clock_nanoseconds
  }

  pub(crate) fn timer_running(&self) -> bool {
    self.timer_running
  }

  pub(crate) fn set_timer_running(&mut self, running: bool) {
    self.timer_running = running;
  }

  pub(crate) fn bind_unit(&mut self, unit: u32, texture: u64) {
    log::trace!("context {}: bind texture {} at unit {}", self.name, texture, unit);
    self.bound_units[unit as usize] = Some(texture);
  }

  pub(crate) fn unbind_unit(&mut self, unit: u32) {
    if let Some(texture) = self.bound_units[unit as usize].take() {
      log::trace!("context {}: unbind texture {} from unit {}", self.name, texture, unit);
    }
  }

  pub(crate) fn unit_count(&self) -> usize {
    self.bound_units.len()
  }

  /// Texture bound at `unit`, if any.
  pub(crate) fn unit_binding(&self, unit: u32) -> Option<u64> {
    self.bound_units.get(unit as usize).copied().flatten()
  }

  /// Drop a deleted texture from every unit holding it.
  pub(crate) fn forget_texture(&mut self, texture: u64) {
    for unit in 0..self.bound_units.len() {
      if self.bound_units[unit] == Some(texture) {
        log::trace!(
          "context {}: unbind deleted texture {} from unit {}",
          self.name,
          texture,
          unit
        );
        self.bound_units[unit] = None;
      }
    }
  }

  pub(crate) fn use_program(&mut self, program: u64) {
    if self.current_program != program {
      log::trace!("context {}: use program {}", self.name, program);
      self.current_program = program;
    }
  }

  pub(crate) fn forget_program(&mut self, program: u64) {
    if self.current_program == program {
      self.current_program = 0;
    }
  }

  pub(crate) fn bind_vertex_array(&mut self, vertex_array: u64) {
    if self.bound_vertex_array != vertex_array {
      log::trace!("context {}: bind vertex array {}", self.name, vertex_array);
      self.bound_vertex_array = vertex_array;
    }
  }

  pub(crate) fn forget_vertex_array(&mut self, vertex_array: u64) {
    if self.bound_vertex_array == vertex_array {
      self.bound_vertex_array = 0;
    }
  }

  pub(crate) fn bind_draw_framebuffer(&mut self, framebuffer: u64, size: [u32; 2], bits: [usize; 2]) {
    if self.draw_framebuffer != framebuffer {
      log::trace!("context {}: bind draw framebuffer {}", self.name, framebuffer);
      self.draw_framebuffer = framebuffer;
    }

    self.draw_framebuffer_size = size;
    self.draw_framebuffer_bits = bits;
  }

  pub(crate) fn bind_read_framebuffer(&mut self, framebuffer: u64) {
    if self.read_framebuffer != framebuffer {
      log::trace!("context {}: bind read framebuffer {}", self.name, framebuffer);
      self.read_framebuffer = framebuffer;
    }
  }

  pub(crate) fn forget_framebuffer(&mut self, framebuffer: u64) {
    if self.draw_framebuffer == framebuffer {
      self.draw_framebuffer = 0;
      self.draw_framebuffer_bits = self.back_buffer_bits;
    }

    if self.read_framebuffer == framebuffer {
      self.read_framebuffer = 0;
    }
  }
}
