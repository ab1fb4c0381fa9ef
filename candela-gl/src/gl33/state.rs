//! Graphics state.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::ffi::CStr;
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_char;

use candela::blending::{Equation, Factor};
use candela::depth_stencil::{Comparison, StencilOp, StencilState, StencilTest, Write};
use candela::face_culling::{Face, FaceWinding};
use candela::render_state::{ColorMask, PolygonMode};
use candela::scissor::ScissorRegion;
use candela::version::{Api, Extensions, Limits, Version};

// TLS synchronization barrier for `GLState`.
thread_local!(static TLS_ACQUIRE_GFX_STATE: RefCell<Option<()>> = RefCell::new(Some(())));

/// Cached value.
///
/// A cached value is used to prevent issuing costy GPU commands if we know the target value is
/// already set to what the command tries to set. For instance, if you ask to bind a texture ID
/// `34` once, that value will be set on the GPU and cached on our side. Later, if no other
/// binding has occurred, asking to bind texture ID `34` again is a no-op, because the cache
/// knows the GPU is already there.
///
/// This optimization has limits and sometimes, because of side-effects, it is not possible to
/// cache something correctly.
///
/// Note: do not confuse [`Cached`] with [`Bind`]. The latter is for internal use only and
/// is used to either use the regular cache mechanism or override it to force a value to be
/// written. It cannot be used to invalidate a setting for later use.
#[derive(Debug)]
struct Cached<T>(Option<T>)
where
  T: PartialEq;

impl<T> Cached<T>
where
  T: PartialEq,
{
  /// Cache a value.
  fn new(initial: T) -> Self {
    Cached(Some(initial))
  }

  /// Explicitly invalidate a value.
  ///
  /// This is necessary when we want to be able to force a GPU command to run.
  fn invalidate(&mut self) {
    self.0 = None;
  }

  fn set(&mut self, value: T) {
    self.0 = Some(value);
  }

  /// Check if the cached value is invalid regarding a value.
  ///
  /// A non-cached value (i.e. empty) is always invalid whatever compared value. If a value is
  /// already cached, then it’s invalid if it’s not equal ([`PartialEq`]) to the input value.
  fn is_invalid(&self, new_val: &T) -> bool {
    match &self.0 {
      Some(ref t) => t != new_val,
      _ => true,
    }
  }

  /// Whether `value` is exactly the cached one.
  fn contains(&self, value: &T) -> bool {
    self.0.as_ref() == Some(value)
  }
}

/// The graphics state.
///
/// This type represents the current state of a given graphics context. It acts as a
/// forward-gate to all the exposed features from the low-level API but adds a small cache layer
/// over it to prevent from issuing the same API call (with the same parameters) twice.
///
/// It also carries everything captured once at construction time: the identification strings,
/// the parsed [`Version`], the advertised [`Extensions`] and the device [`Limits`].
#[derive(Debug)]
pub struct GLState {
  _a: PhantomData<*const ()>, // !Send and !Sync

  // whether the driver error queue is drained and reported after operations
  debug: bool,

  // viewport
  viewport: Cached<[GLint; 4]>,

  // clear values
  clear_color: Cached<[GLfloat; 4]>,
  clear_depth: Cached<GLfloat>,
  clear_stencil: Cached<GLint>,

  // blending
  blending_state: Cached<BlendingState>,
  blending_equations: Cached<BlendingEquations>,
  blending_factors: Cached<BlendingFactors>,

  // color mask
  color_mask: Cached<ColorMask>,

  // depth
  depth_test: Cached<DepthTest>,
  depth_test_comparison: Cached<Comparison>,
  depth_write: Cached<Write>,
  depth_clamp: Cached<DepthClamp>,

  // stencil
  stencil_test: Cached<StencilTestState>,
  stencil_config: Cached<StencilState>,

  // face culling
  face_culling_state: Cached<FaceCullingState>,
  face_culling_order: Cached<FaceWinding>,
  face_culling_mode: Cached<Face>,

  // scissor
  scissor_state: Cached<ScissorState>,
  scissor_region: Cached<ScissorRegion>,

  // polygon mode
  polygon_mode: Cached<PolygonMode>,

  // line width; the supported range lives in the limits
  line_width: Cached<GLfloat>,

  // texture units
  current_texture_unit: Cached<GLenum>,
  bound_textures: Vec<(GLenum, GLuint)>,

  // array buffer
  bound_array_buffer: GLuint,

  // element buffer
  bound_element_array_buffer: GLuint,

  // vertex array
  bound_vertex_array: GLuint,

  // shader program
  current_program: GLuint,

  // framebuffers; the draw side also remembers the size and the depth/stencil bits of the
  // bound target, which strict render states and clears check against
  bound_draw_framebuffer: Cached<GLuint>,
  bound_read_framebuffer: Cached<GLuint>,
  draw_framebuffer_size: [u32; 2],
  draw_framebuffer_bits: [usize; 2],

  // pixel store
  unpack_alignment: Cached<GLint>,
  pack_alignment: Cached<GLint>,

  // timer queries; a context can only run one at a time
  timer_query_running: bool,

  // identification and capabilities, captured once at construction
  vendor: Option<String>,
  renderer: Option<String>,
  version_string: Option<String>,
  glsl_version: Option<String>,
  version: Version,
  extensions: Extensions,
  limits: Limits,

  // depth/stencil bits of the default framebuffer, captured at construction
  back_buffer_bits: [usize; 2],
}

impl GLState {
  /// Create a new `GLState`.
  ///
  /// > Note: keep in mind you can create only one per thread.
  pub(crate) fn new(debug: bool) -> Result<Self, StateQueryError> {
    TLS_ACQUIRE_GFX_STATE.with(|rc| {
      let mut inner = rc.borrow_mut();

      match *inner {
        Some(_) => {
          inner.take();
          Self::get_from_context(debug)
        }

        None => Err(StateQueryError::UnavailableGLState),
      }
    })
  }

  /// Build a `GLState` from the current OpenGL context.
  fn get_from_context(debug: bool) -> Result<Self, StateQueryError> {
    unsafe {
      let version_string = get_ctx_string(gl::VERSION);
      let raw_version = version_string
        .as_deref()
        .ok_or(StateQueryError::NoVersion)?;
      let version = Version::parse(raw_version).map_err(StateQueryError::UnparsableVersion)?;

      if version.api != Api::Core || !version.supports(3, 3) {
        return Err(StateQueryError::UnsupportedVersion(version));
      }

      let vendor = get_ctx_string(gl::VENDOR);
      let renderer = get_ctx_string(gl::RENDERER);
      let glsl_version = get_ctx_string(gl::SHADING_LANGUAGE_VERSION);
      let extensions = get_ctx_extensions();
      let limits = get_ctx_limits()?;
      let back_buffer_bits = get_ctx_framebuffer_bits();

      let viewport = get_ctx_viewport()?;
      // the initial viewport covers the window framebuffer
      let draw_framebuffer_size = [viewport[2] as u32, viewport[3] as u32];

      Ok(GLState {
        _a: PhantomData,
        debug,
        viewport: Cached::new(viewport),
        clear_color: Cached::new(get_ctx_clear_color()?),
        clear_depth: Cached::new(get_ctx_clear_depth()?),
        clear_stencil: Cached::new(get_ctx_clear_stencil()?),
        blending_state: Cached::new(get_ctx_blending_state()?),
        blending_equations: Cached::new(get_ctx_blending_equations()?),
        blending_factors: Cached::new(get_ctx_blending_factors()?),
        color_mask: Cached::new(get_ctx_color_mask()?),
        depth_test: Cached::new(get_ctx_depth_test()?),
        depth_test_comparison: Cached::new(Comparison::Less),
        depth_write: Cached::new(get_ctx_depth_write()?),
        depth_clamp: Cached::new(get_ctx_depth_clamp()?),
        stencil_test: Cached::new(get_ctx_stencil_test()?),
        stencil_config: Cached::new(StencilState::from(StencilTest::default())),
        face_culling_state: Cached::new(get_ctx_face_culling_state()?),
        face_culling_order: Cached::new(get_ctx_face_culling_order()?),
        face_culling_mode: Cached::new(get_ctx_face_culling_mode()?),
        scissor_state: Cached::new(get_ctx_scissor_state()?),
        scissor_region: Cached::new(get_ctx_scissor_region()?),
        polygon_mode: Cached::new(get_ctx_polygon_mode()?),
        line_width: Cached::new(get_ctx_line_width()?),
        current_texture_unit: Cached::new(get_ctx_current_texture_unit()?),
        bound_textures: vec![(gl::TEXTURE_2D, 0); limits.max_texture_units.max(16)],
        bound_array_buffer: 0,
        bound_element_array_buffer: 0,
        bound_vertex_array: get_ctx_bound_vertex_array()?,
        current_program: get_ctx_current_program()?,
        bound_draw_framebuffer: Cached::new(get_ctx_bound_draw_framebuffer()?),
        bound_read_framebuffer: Cached::new(get_ctx_bound_read_framebuffer()?),
        draw_framebuffer_size,
        draw_framebuffer_bits: back_buffer_bits,
        unpack_alignment: Cached::new(get_ctx_unpack_alignment()?),
        pack_alignment: Cached::new(get_ctx_pack_alignment()?),
        timer_query_running: false,
        vendor,
        renderer,
        version_string,
        glsl_version,
        version,
        extensions,
        limits,
        back_buffer_bits,
      })
    }
  }

  /// Invalidate the currently in-use viewport.
  pub fn invalidate_viewport(&mut self) {
    self.viewport.invalidate()
  }

  /// Invalidate the currently in-use clear color.
  pub fn invalidate_clear_color(&mut self) {
    self.clear_color.invalidate()
  }

  /// Invalidate the currently in-use clear depth.
  pub fn invalidate_clear_depth(&mut self) {
    self.clear_depth.invalidate()
  }

  /// Invalidate the currently in-use clear stencil value.
  pub fn invalidate_clear_stencil(&mut self) {
    self.clear_stencil.invalidate()
  }

  /// Invalidate the currently in-use blending state.
  pub fn invalidate_blending_state(&mut self) {
    self.blending_state.invalidate()
  }

  /// Invalidate the currently in-use blending equations.
  pub fn invalidate_blending_equations(&mut self) {
    self.blending_equations.invalidate()
  }

  /// Invalidate the currently in-use blending factors.
  pub fn invalidate_blending_factors(&mut self) {
    self.blending_factors.invalidate()
  }

  /// Invalidate the currently in-use color mask.
  pub fn invalidate_color_mask(&mut self) {
    self.color_mask.invalidate()
  }

  /// Invalidate the currently in-use depth test.
  pub fn invalidate_depth_test(&mut self) {
    self.depth_test.invalidate()
  }

  /// Invalidate the currently in-use depth test comparison.
  pub fn invalidate_depth_test_comparison(&mut self) {
    self.depth_test_comparison.invalidate()
  }

  /// Invalidate the currently in-use depth write mask.
  pub fn invalidate_depth_write(&mut self) {
    self.depth_write.invalidate()
  }

  /// Invalidate the currently in-use depth clamp state.
  pub fn invalidate_depth_clamp(&mut self) {
    self.depth_clamp.invalidate()
  }

  /// Invalidate the currently in-use stencil test state.
  pub fn invalidate_stencil_test(&mut self) {
    self.stencil_test.invalidate()
  }

  /// Invalidate the currently in-use per-face stencil configuration.
  pub fn invalidate_stencil_config(&mut self) {
    self.stencil_config.invalidate()
  }

  /// Invalidate the currently in-use face culling state.
  pub fn invalidate_face_culling_state(&mut self) {
    self.face_culling_state.invalidate()
  }

  /// Invalidate the currently in-use face culling order.
  pub fn invalidate_face_culling_order(&mut self) {
    self.face_culling_order.invalidate()
  }

  /// Invalidate the currently in-use face culling mode.
  pub fn invalidate_face_culling_mode(&mut self) {
    self.face_culling_mode.invalidate()
  }

  /// Invalidate the currently in-use scissor state.
  pub fn invalidate_scissor_state(&mut self) {
    self.scissor_state.invalidate()
  }

  /// Invalidate the currently in-use scissor region.
  pub fn invalidate_scissor_region(&mut self) {
    self.scissor_region.invalidate()
  }

  /// Invalidate the currently in-use polygon mode.
  pub fn invalidate_polygon_mode(&mut self) {
    self.polygon_mode.invalidate()
  }

  /// Invalidate the currently in-use line width.
  pub fn invalidate_line_width(&mut self) {
    self.line_width.invalidate()
  }

  /// Invalidate the currently active texture unit.
  pub fn invalidate_texture_unit(&mut self) {
    self.current_texture_unit.invalidate()
  }

  /// Invalidate the texture bindings.
  pub fn invalidate_bound_textures(&mut self) {
    for t in &mut self.bound_textures {
      *t = (gl::TEXTURE_2D, 0);
    }
  }

  /// Invalidate the currently in-use array buffer.
  pub fn invalidate_array_buffer(&mut self) {
    self.bound_array_buffer = 0;
  }

  /// Invalidate the currently in-use element array buffer.
  pub fn invalidate_element_array_buffer(&mut self) {
    self.bound_element_array_buffer = 0;
  }

  /// Invalidate the currently in-use vertex array.
  pub fn invalidate_vertex_array(&mut self) {
    self.bound_vertex_array = 0;
  }

  /// Invalidate the currently in-use shader program.
  pub fn invalidate_program(&mut self) {
    self.current_program = 0;
  }

  /// Invalidate the currently in-use draw and read framebuffers.
  pub fn invalidate_framebuffers(&mut self) {
    self.bound_draw_framebuffer.invalidate();
    self.bound_read_framebuffer.invalidate();
  }

  /// Invalidate the currently in-use pixel store alignments.
  pub fn invalidate_pixel_store(&mut self) {
    self.unpack_alignment.invalidate();
    self.pack_alignment.invalidate();
  }

  /// Invalidate the whole cache.
  ///
  /// Call this after foreign code has issued driver calls without going through this state, so
  /// that the next operations re-issue theirs.
  pub fn invalidate_all(&mut self) {
    self.invalidate_viewport();
    self.invalidate_clear_color();
    self.invalidate_clear_depth();
    self.invalidate_clear_stencil();
    self.invalidate_blending_state();
    self.invalidate_blending_equations();
    self.invalidate_blending_factors();
    self.invalidate_color_mask();
    self.invalidate_depth_test();
    self.invalidate_depth_test_comparison();
    self.invalidate_depth_write();
    self.invalidate_depth_clamp();
    self.invalidate_stencil_test();
    self.invalidate_stencil_config();
    self.invalidate_face_culling_state();
    self.invalidate_face_culling_order();
    self.invalidate_face_culling_mode();
    self.invalidate_scissor_state();
    self.invalidate_scissor_region();
    self.invalidate_polygon_mode();
    self.invalidate_line_width();
    self.invalidate_texture_unit();
    self.invalidate_bound_textures();
    self.invalidate_array_buffer();
    self.invalidate_element_array_buffer();
    self.invalidate_vertex_array();
    self.invalidate_program();
    self.invalidate_framebuffers();
    self.invalidate_pixel_store();
  }

  pub(crate) fn debug(&self) -> bool {
    self.debug
  }

  pub(crate) fn vendor(&self) -> Option<&str> {
    self.vendor.as_deref()
  }

  pub(crate) fn renderer(&self) -> Option<&str> {
    self.renderer.as_deref()
  }

  pub(crate) fn version_string(&self) -> Option<&str> {
    self.version_string.as_deref()
  }

  pub(crate) fn glsl_version(&self) -> Option<&str> {
    self.glsl_version.as_deref()
  }

  pub(crate) fn version(&self) -> Version {
    self.version
  }

  pub(crate) fn extensions(&self) -> &Extensions {
    &self.extensions
  }

  pub(crate) fn limits(&self) -> Limits {
    self.limits
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

  pub(crate) fn timer_query_running(&self) -> bool {
    self.timer_query_running
  }

  pub(crate) fn set_timer_query_running(&mut self, running: bool) {
    self.timer_query_running = running;
  }

  /// Drain the driver error queue, describing everything found there.
  ///
  /// Always `None` unless the backend was built with driver error checking.
  pub(crate) unsafe fn error_report(&self, operation: &str) -> Option<String> {
    if !self.debug {
      return None;
    }

    let mut reasons: Vec<&str> = Vec::new();

    loop {
      let err = gl::GetError();

      if err == gl::NO_ERROR {
        break;
      }

      reasons.push(describe_gl_error(err));
    }

    if reasons.is_empty() {
      None
    } else {
      let reason = format!("{}: {}", operation, reasons.join(", "));
      log::error!("driver error: {}", reason);
      Some(reason)
    }
  }

  pub(crate) unsafe fn set_viewport(&mut self, viewport: [GLint; 4]) {
    if self.viewport.is_invalid(&viewport) {
      gl::Viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
      self.viewport.set(viewport);
    }
  }

  pub(crate) unsafe fn set_clear_color(&mut self, clear_color: [GLfloat; 4]) {
    if self.clear_color.is_invalid(&clear_color) {
      gl::ClearColor(
        clear_color[0],
        clear_color[1],
        clear_color[2],
        clear_color[3],
      );
      self.clear_color.set(clear_color);
    }
  }

  pub(crate) unsafe fn set_clear_depth(&mut self, clear_depth: GLfloat) {
    if self.clear_depth.is_invalid(&clear_depth) {
      gl::ClearDepth(clear_depth as _);
      self.clear_depth.set(clear_depth);
    }
  }

  pub(crate) unsafe fn set_clear_stencil(&mut self, clear_stencil: GLint) {
    if self.clear_stencil.is_invalid(&clear_stencil) {
      gl::ClearStencil(clear_stencil);
      self.clear_stencil.set(clear_stencil);
    }
  }

  pub(crate) unsafe fn set_blending_state(&mut self, state: BlendingState) {
    if self.blending_state.is_invalid(&state) {
      match state {
        BlendingState::On => gl::Enable(gl::BLEND),
        BlendingState::Off => gl::Disable(gl::BLEND),
      }

      self.blending_state.set(state);
    }
  }

  pub(crate) unsafe fn set_blending_equations(&mut self, rgb: Equation, alpha: Equation) {
    let equations = BlendingEquations { rgb, alpha };

    if self.blending_equations.is_invalid(&equations) {
      gl::BlendEquationSeparate(from_blending_equation(rgb), from_blending_equation(alpha));
      self.blending_equations.set(equations);
    }
  }

  pub(crate) unsafe fn set_blending_factors(
    &mut self,
    src_rgb: Factor,
    dst_rgb: Factor,
    src_alpha: Factor,
    dst_alpha: Factor,
  ) {
    let factors = BlendingFactors {
      src_rgb,
      dst_rgb,
      src_alpha,
      dst_alpha,
    };

    if self.blending_factors.is_invalid(&factors) {
      gl::BlendFuncSeparate(
        from_blending_factor(src_rgb),
        from_blending_factor(dst_rgb),
        from_blending_factor(src_alpha),
        from_blending_factor(dst_alpha),
      );

      self.blending_factors.set(factors);
    }
  }

  pub(crate) unsafe fn set_color_mask(&mut self, mask: ColorMask) {
    if self.color_mask.is_invalid(&mask) {
      gl::ColorMask(
        mask.red as GLboolean,
        mask.green as GLboolean,
        mask.blue as GLboolean,
        mask.alpha as GLboolean,
      );

      self.color_mask.set(mask);
    }
  }

  pub(crate) unsafe fn set_depth_test(&mut self, depth_test: DepthTest) {
    if self.depth_test.is_invalid(&depth_test) {
      match depth_test {
        DepthTest::On => gl::Enable(gl::DEPTH_TEST),
        DepthTest::Off => gl::Disable(gl::DEPTH_TEST),
      }

      self.depth_test.set(depth_test);
    }
  }

  pub(crate) unsafe fn set_depth_test_comparison(&mut self, comparison: Comparison) {
    if self.depth_test_comparison.is_invalid(&comparison) {
      gl::DepthFunc(from_comparison(comparison));
      self.depth_test_comparison.set(comparison);
    }
  }

  pub(crate) unsafe fn set_depth_write(&mut self, write: Write) {
    if self.depth_write.is_invalid(&write) {
      match write {
        Write::On => gl::DepthMask(gl::TRUE),
        Write::Off => gl::DepthMask(gl::FALSE),
      }

      self.depth_write.set(write);
    }
  }

  pub(crate) unsafe fn set_depth_clamp(&mut self, clamp: DepthClamp) {
    if self.depth_clamp.is_invalid(&clamp) {
      match clamp {
        DepthClamp::On => gl::Enable(gl::DEPTH_CLAMP),
        DepthClamp::Off => gl::Disable(gl::DEPTH_CLAMP),
      }

      self.depth_clamp.set(clamp);
    }
  }

  pub(crate) unsafe fn set_stencil_test(&mut self, stencil_test: StencilTestState) {
    if self.stencil_test.is_invalid(&stencil_test) {
      match stencil_test {
        StencilTestState::On => gl::Enable(gl::STENCIL_TEST),
        StencilTestState::Off => gl::Disable(gl::STENCIL_TEST),
      }

      self.stencil_test.set(stencil_test);
    }
  }

  pub(crate) unsafe fn set_stencil_config(&mut self, config: StencilState) {
    if self.stencil_config.is_invalid(&config) {
      for &(face, test) in &[(gl::FRONT, config.front), (gl::BACK, config.back)] {
        gl::StencilFuncSeparate(
          face,
          from_comparison(test.comparison),
          GLint::from(test.reference),
          GLuint::from(test.test_mask),
        );
        gl::StencilOpSeparate(
          face,
          from_stencil_op(test.on_stencil_fail),
          from_stencil_op(test.on_depth_fail),
          from_stencil_op(test.on_pass),
        );
        gl::StencilMaskSeparate(face, GLuint::from(test.write_mask));
      }

      self.stencil_config.set(config);
    }
  }

  pub(crate) unsafe fn set_face_culling_state(&mut self, state: FaceCullingState) {
    if self.face_culling_state.is_invalid(&state) {
      match state {
        FaceCullingState::On => gl::Enable(gl::CULL_FACE),
        FaceCullingState::Off => gl::Disable(gl::CULL_FACE),
      }

      self.face_culling_state.set(state);
    }
  }

  pub(crate) unsafe fn set_face_culling_order(&mut self, winding: FaceWinding) {
    if self.face_culling_order.is_invalid(&winding) {
      match winding {
        FaceWinding::Clockwise => gl::FrontFace(gl::CW),
        FaceWinding::CounterClockwise => gl::FrontFace(gl::CCW),
      }

      self.face_culling_order.set(winding);
    }
  }

  pub(crate) unsafe fn set_face_culling_mode(&mut self, face: Face) {
    if self.face_culling_mode.is_invalid(&face) {
      gl::CullFace(from_face(face));
      self.face_culling_mode.set(face);
    }
  }

  pub(crate) unsafe fn set_scissor_state(&mut self, state: ScissorState) {
    if self.scissor_state.is_invalid(&state) {
      match state {
        ScissorState::On => gl::Enable(gl::SCISSOR_TEST),
        ScissorState::Off => gl::Disable(gl::SCISSOR_TEST),
      }

      self.scissor_state.set(state);
    }
  }

  pub(crate) unsafe fn set_scissor_region(&mut self, region: ScissorRegion) {
    if self.scissor_region.is_invalid(&region) {
      gl::Scissor(
        region.x as GLint,
        region.y as GLint,
        region.width as GLint,
        region.height as GLint,
      );

      self.scissor_region.set(region);
    }
  }

  pub(crate) unsafe fn set_polygon_mode(&mut self, mode: PolygonMode) {
    if self.polygon_mode.is_invalid(&mode) {
      let gl_mode = match mode {
        PolygonMode::Fill => gl::FILL,
        PolygonMode::Line => gl::LINE,
        PolygonMode::Point => gl::POINT,
      };

      gl::PolygonMode(gl::FRONT_AND_BACK, gl_mode);
      self.polygon_mode.set(mode);
    }
  }

  pub(crate) unsafe fn set_line_width(&mut self, width: GLfloat) {
    if self.line_width.is_invalid(&width) {
      gl::LineWidth(width);
      self.line_width.set(width);
    }
  }

  pub(crate) unsafe fn set_texture_unit(&mut self, unit: u32) {
    let unit = unit as GLenum;

    if self.current_texture_unit.is_invalid(&unit) {
      gl::ActiveTexture(gl::TEXTURE0 + unit);
      self.current_texture_unit.set(unit);
    }
  }

  /// Bind `handle` on the given unit, making that unit active.
  pub(crate) unsafe fn bind_texture_at(&mut self, target: GLenum, handle: GLuint, unit: u32) {
    self.set_texture_unit(unit);

    let unit = unit as usize;

    match self.bound_textures.get(unit).copied() {
      Some((target_, handle_)) if target == target_ && handle == handle_ => (), // cached

      _ => {
        gl::BindTexture(target, handle);

        if self.bound_textures.len() <= unit {
          // not enough tracked texture units; grow a bit more
          self.bound_textures.resize(unit + 1, (gl::TEXTURE_2D, 0));
        }

        self.bound_textures[unit] = (target, handle);
      }
    }
  }

  /// Bind a texture on unit 0 for an edit, handing back what was displaced.
  ///
  /// Edits (uploads, readbacks, parameter changes) always go through unit 0. The displaced
  /// binding is restored with [`GLState::restore_edit_bind`] so that claims on unit 0 survive
  /// the edit.
  pub(crate) unsafe fn edit_bind(&mut self, target: GLenum, handle: GLuint) -> (GLenum, GLuint) {
    self.set_texture_unit(0);

    let previous = self
      .bound_textures
      .first()
      .copied()
      .unwrap_or((gl::TEXTURE_2D, 0));

    self.bind_texture_at(target, handle, 0);
    previous
  }

  /// Restore what an edit displaced from unit 0.
  pub(crate) unsafe fn restore_edit_bind(&mut self, previous: (GLenum, GLuint)) {
    self.bind_texture_at(previous.0, previous.1, 0);
  }

  /// Unbind whatever occupies the given unit.
  pub(crate) unsafe fn unbind_texture_unit(&mut self, unit: u32) {
    let target = self
      .bound_textures
      .get(unit as usize)
      .map(|&(target, _)| target)
      .unwrap_or(gl::TEXTURE_2D);

    self.bind_texture_at(target, 0, unit);
  }

  /// Drop a deleted texture from the cache.
  ///
  /// The driver rebinds every unit holding a deleted texture to zero on its own.
  pub(crate) fn forget_texture(&mut self, handle: GLuint) {
    for t in &mut self.bound_textures {
      if t.1 == handle {
        t.1 = 0;
      }
    }
  }

  pub(crate) unsafe fn bind_array_buffer(&mut self, handle: GLuint, bind: Bind) {
    if bind == Bind::Forced || self.bound_array_buffer != handle {
      gl::BindBuffer(gl::ARRAY_BUFFER, handle);
      self.bound_array_buffer = handle;
    }
  }

  pub(crate) unsafe fn bind_element_array_buffer(&mut self, handle: GLuint, bind: Bind) {
    if bind == Bind::Forced || self.bound_element_array_buffer != handle {
      gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, handle);
      self.bound_element_array_buffer = handle;
    }
  }

  /// Drop a deleted buffer from the cache.
  ///
  /// The driver reverts bindings of deleted objects to zero on its own, so only the cache needs
  /// fixing.
  pub(crate) fn forget_buffer(&mut self, handle: GLuint) {
    if self.bound_array_buffer == handle {
      self.bound_array_buffer = 0;
    }

    if self.bound_element_array_buffer == handle {
      self.bound_element_array_buffer = 0;
    }
  }

  pub(crate) unsafe fn bind_vertex_array(&mut self, handle: GLuint, bind: Bind) {
    if bind == Bind::Forced || self.bound_vertex_array != handle {
      gl::BindVertexArray(handle);
      self.bound_vertex_array = handle;
    }
  }

  /// Drop a deleted vertex array from the cache.
  pub(crate) fn forget_vertex_array(&mut self, handle: GLuint) {
    if self.bound_vertex_array == handle {
      self.bound_vertex_array = 0;
    }
  }

  pub(crate) unsafe fn use_program(&mut self, handle: GLuint) {
    if self.current_program != handle {
      gl::UseProgram(handle);
      self.current_program = handle;
    }
  }

  /// Deselect a program about to be deleted.
  ///
  /// Unlike other objects, a deleted program stays current until replaced, so this issues a
  /// real deselection when needed.
  pub(crate) unsafe fn unuse_program(&mut self, handle: GLuint) {
    if self.current_program == handle {
      self.use_program(0);
    }
  }

  /// Bind the draw framebuffer, remembering its size and its depth/stencil bits.
  pub(crate) unsafe fn bind_draw_framebuffer(
    &mut self,
    handle: GLuint,
    size: [u32; 2],
    bits: [usize; 2],
  ) {
    if self.bound_draw_framebuffer.is_invalid(&handle) {
      gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, handle);
      self.bound_draw_framebuffer.set(handle);
    }

    // a re-bound handle may still carry different properties (the back buffer after a resize)
    self.draw_framebuffer_size = size;
    self.draw_framebuffer_bits = bits;
  }

  pub(crate) unsafe fn bind_read_framebuffer(&mut self, handle: GLuint) {
    if self.bound_read_framebuffer.is_invalid(&handle) {
      gl::BindFramebuffer(gl::READ_FRAMEBUFFER, handle);
      self.bound_read_framebuffer.set(handle);
    }
  }

  /// Drop a deleted framebuffer from the cache. Bindings revert to the default framebuffer.
  pub(crate) fn forget_framebuffer(&mut self, handle: GLuint) {
    if self.bound_draw_framebuffer.contains(&handle) {
      self.bound_draw_framebuffer.set(0);
      self.draw_framebuffer_bits = self.back_buffer_bits;
    }

    if self.bound_read_framebuffer.contains(&handle) {
      self.bound_read_framebuffer.set(0);
    }
  }

  pub(crate) unsafe fn set_unpack_alignment(&mut self, alignment: GLint) {
    if self.unpack_alignment.is_invalid(&alignment) {
      gl::PixelStorei(gl::UNPACK_ALIGNMENT, alignment);
      self.unpack_alignment.set(alignment);
    }
  }

  pub(crate) unsafe fn set_pack_alignment(&mut self, alignment: GLint) {
    if self.pack_alignment.is_invalid(&alignment) {
      gl::PixelStorei(gl::PACK_ALIGNMENT, alignment);
      self.pack_alignment.set(alignment);
    }
  }
}

/// Should the binding be cached or forced to the provided value?
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Bind {
  Forced,
  Cached,
}

#[inline]
fn from_blending_equation(equation: Equation) -> GLenum {
  match equation {
    Equation::Additive => gl::FUNC_ADD,
    Equation::Subtract => gl::FUNC_SUBTRACT,
    Equation::ReverseSubtract => gl::FUNC_REVERSE_SUBTRACT,
    Equation::Min => gl::MIN,
    Equation::Max => gl::MAX,
  }
}

#[inline]
fn from_blending_factor(factor: Factor) -> GLenum {
  match factor {
    Factor::One => gl::ONE,
    Factor::Zero => gl::ZERO,
    Factor::SrcColor => gl::SRC_COLOR,
    Factor::SrcColorComplement => gl::ONE_MINUS_SRC_COLOR,
    Factor::DestColor => gl::DST_COLOR,
    Factor::DestColorComplement => gl::ONE_MINUS_DST_COLOR,
    Factor::SrcAlpha => gl::SRC_ALPHA,
    Factor::SrcAlphaComplement => gl::ONE_MINUS_SRC_ALPHA,
    Factor::DstAlpha => gl::DST_ALPHA,
    Factor::DstAlphaComplement => gl::ONE_MINUS_DST_ALPHA,
    Factor::SrcAlphaSaturate => gl::SRC_ALPHA_SATURATE,
  }
}

#[inline]
pub(crate) fn from_comparison(comparison: Comparison) -> GLenum {
  match comparison {
    Comparison::Never => gl::NEVER,
    Comparison::Always => gl::ALWAYS,
    Comparison::Equal => gl::EQUAL,
    Comparison::NotEqual => gl::NOTEQUAL,
    Comparison::Less => gl::LESS,
    Comparison::LessOrEqual => gl::LEQUAL,
    Comparison::Greater => gl::GREATER,
    Comparison::GreaterOrEqual => gl::GEQUAL,
  }
}

#[inline]
fn from_stencil_op(op: StencilOp) -> GLenum {
  match op {
    StencilOp::Keep => gl::KEEP,
    StencilOp::Zero => gl::ZERO,
    StencilOp::Replace => gl::REPLACE,
    StencilOp::Increment => gl::INCR,
    StencilOp::IncrementWrap => gl::INCR_WRAP,
    StencilOp::Decrement => gl::DECR,
    StencilOp::DecrementWrap => gl::DECR_WRAP,
    StencilOp::Invert => gl::INVERT,
  }
}

#[inline]
fn from_face(face: Face) -> GLenum {
  match face {
    Face::Front => gl::FRONT,
    Face::Back => gl::BACK,
    Face::FrontAndBack => gl::FRONT_AND_BACK,
  }
}

fn describe_gl_error(err: GLenum) -> &'static str {
  match err {
    gl::INVALID_ENUM => "invalid enum",
    gl::INVALID_VALUE => "invalid value",
    gl::INVALID_OPERATION => "invalid operation",
    gl::INVALID_FRAMEBUFFER_OPERATION => "invalid framebuffer operation",
    gl::OUT_OF_MEMORY => "out of memory",
    _ => "unknown error",
  }
}

/// An error that might happen when the context is queried.
#[non_exhaustive]
#[derive(Debug)]
pub enum StateQueryError {
  /// The [`GLState`] object is unavailable.
  ///
  /// That might occur if the current thread doesn’t support allocating a new graphics state. It
  /// might happen if you try to have more than one state on the same thread, for instance.
  UnavailableGLState,
  /// The driver advertises no version string at all.
  NoVersion,
  /// The driver version string does not parse.
  UnparsableVersion(candela::version::VersionParseError),
  /// The context implements a version below core OpenGL 3.3.
  UnsupportedVersion(Version),
  /// Corrupted blending state.
  UnknownBlendingState(GLboolean),
  /// Corrupted blending equation.
  UnknownBlendingEquation(GLenum),
  /// Corrupted blending source factor.
  UnknownBlendingSrcFactor(GLenum),
  /// Corrupted blending destination factor.
  UnknownBlendingDstFactor(GLenum),
  /// Corrupted color mask channel.
  UnknownColorMaskChannel(GLboolean),
  /// Corrupted depth test state.
  UnknownDepthTestState(GLboolean),
  /// Corrupted depth write mask.
  UnknownDepthWriteMask(GLboolean),
  /// Corrupted depth clamp state.
  UnknownDepthClampState(GLboolean),
  /// Corrupted stencil test state.
  UnknownStencilTestState(GLboolean),
  /// Corrupted face culling state.
  UnknownFaceCullingState(GLboolean),
  /// Corrupted face culling order.
  UnknownFaceCullingOrder(GLenum),
  /// Corrupted face culling mode.
  UnknownFaceCullingMode(GLenum),
  /// Corrupted scissor state.
  UnknownScissorState(GLboolean),
  /// Corrupted polygon mode.
  UnknownPolygonMode(GLenum),
}

impl fmt::Display for StateQueryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StateQueryError::UnavailableGLState => write!(f, "unavailable graphics state"),
      StateQueryError::NoVersion => write!(f, "no version string advertised"),
      StateQueryError::UnparsableVersion(ref e) => write!(f, "unparsable version string: {}", e),
      StateQueryError::UnsupportedVersion(ref v) => {
        write!(f, "unsupported version: {} (need core OpenGL 3.3)", v)
      }
      StateQueryError::UnknownBlendingState(ref s) => write!(f, "unknown blending state: {}", s),
      StateQueryError::UnknownBlendingEquation(ref e) => {
        write!(f, "unknown blending equation: {}", e)
      }
      StateQueryError::UnknownBlendingSrcFactor(ref k) => {
        write!(f, "unknown blending source factor: {}", k)
      }
      StateQueryError::UnknownBlendingDstFactor(ref k) => {
        write!(f, "unknown blending destination factor: {}", k)
      }
      StateQueryError::UnknownColorMaskChannel(ref c) => {
        write!(f, "unknown color mask channel: {}", c)
      }
      StateQueryError::UnknownDepthTestState(ref s) => write!(f, "unknown depth test state: {}", s),
      StateQueryError::UnknownDepthWriteMask(ref m) => write!(f, "unknown depth write mask: {}", m),
      StateQueryError::UnknownDepthClampState(ref s) => {
        write!(f, "unknown depth clamp state: {}", s)
      }
      StateQueryError::UnknownStencilTestState(ref s) => {
        write!(f, "unknown stencil test state: {}", s)
      }
      StateQueryError::UnknownFaceCullingState(ref s) => {
        write!(f, "unknown face culling state: {}", s)
      }
      StateQueryError::UnknownFaceCullingOrder(ref o) => {
        write!(f, "unknown face culling order: {}", o)
      }
      StateQueryError::UnknownFaceCullingMode(ref m) => {
        write!(f, "unknown face culling mode: {}", m)
      }
      StateQueryError::UnknownScissorState(ref s) => write!(f, "unknown scissor state: {}", s),
      StateQueryError::UnknownPolygonMode(ref m) => write!(f, "unknown polygon mode: {}", m),
    }
  }
}

impl error::Error for StateQueryError {}

unsafe fn get_ctx_string(name: GLenum) -> Option<String> {
  let ptr = gl::GetString(name);

  if ptr.is_null() {
    None
  } else {
    let cstr = CStr::from_ptr(ptr as *const c_char);
    Some(cstr.to_string_lossy().into_owned())
  }
}

unsafe fn get_ctx_extensions() -> Extensions {
  let mut count: GLint = 0;
  gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut count);

  let mut names = Vec::with_capacity(count.max(0) as usize);

  for i in 0..count.max(0) as GLuint {
    let ptr = gl::GetStringi(gl::EXTENSIONS, i);

    if !ptr.is_null() {
      let cstr = CStr::from_ptr(ptr as *const c_char);
      names.push(cstr.to_string_lossy().into_owned());
    }
  }

  Extensions::new(names)
}

unsafe fn get_ctx_limits() -> Result<Limits, StateQueryError> {
  let mut max_texture_size: GLint = 0;
  gl::GetIntegerv(gl::MAX_TEXTURE_SIZE, &mut max_texture_size);

  let mut max_texture_units: GLint = 0;
  gl::GetIntegerv(gl::MAX_TEXTURE_IMAGE_UNITS, &mut max_texture_units);

  let mut max_color_attachments: GLint = 0;
  gl::GetIntegerv(gl::MAX_COLOR_ATTACHMENTS, &mut max_color_attachments);

  let mut max_vertex_attributes: GLint = 0;
  gl::GetIntegerv(gl::MAX_VERTEX_ATTRIBS, &mut max_vertex_attributes);

  let mut line_width_range: [GLfloat; 2] = [1., 1.];
  gl::GetFloatv(gl::ALIASED_LINE_WIDTH_RANGE, line_width_range.as_mut_ptr());

  Ok(Limits {
    max_texture_size: max_texture_size.max(0) as usize,
    max_texture_units: max_texture_units.max(0) as usize,
    max_color_attachments: max_color_attachments.max(0) as usize,
    max_vertex_attributes: max_vertex_attributes.max(0) as usize,
    line_width_range,
  })
}

// Depth and stencil bits of the bound draw framebuffer, which at construction time is the
// default one.
unsafe fn get_ctx_framebuffer_bits() -> [usize; 2] {
  let mut depth_bits: GLint = 0;
  let mut stencil_bits: GLint = 0;

  gl::GetFramebufferAttachmentParameteriv(
    gl::DRAW_FRAMEBUFFER,
    gl::DEPTH,
    gl::FRAMEBUFFER_ATTACHMENT_DEPTH_SIZE,
    &mut depth_bits,
  );
  gl::GetFramebufferAttachmentParameteriv(
    gl::DRAW_FRAMEBUFFER,
    gl::STENCIL,
    gl::FRAMEBUFFER_ATTACHMENT_STENCIL_SIZE,
    &mut stencil_bits,
  );

  [depth_bits.max(0) as usize, stencil_bits.max(0) as usize]
}

unsafe fn get_ctx_viewport() -> Result<[GLint; 4], StateQueryError> {
  let mut data = [0; 4];
  gl::GetIntegerv(gl::VIEWPORT, data.as_mut_ptr());
  Ok(data)
}

unsafe fn get_ctx_clear_color() -> Result<[GLfloat; 4], StateQueryError> {
  let mut data = [0.; 4];
  gl::GetFloatv(gl::COLOR_CLEAR_VALUE, data.as_mut_ptr());
  Ok(data)
}

unsafe fn get_ctx_clear_depth() -> Result<GLfloat, StateQueryError> {
  let mut data = 1.;
  gl::GetFloatv(gl::DEPTH_CLEAR_VALUE, &mut data);
  Ok(data)
}

unsafe fn get_ctx_clear_stencil() -> Result<GLint, StateQueryError> {
  let mut data = 0;
  gl::GetIntegerv(gl::STENCIL_CLEAR_VALUE, &mut data);
  Ok(data)
}

unsafe fn get_ctx_blending_state() -> Result<BlendingState, StateQueryError> {
  let state = gl::IsEnabled(gl::BLEND);

  match state {
    gl::TRUE => Ok(BlendingState::On),
    gl::FALSE => Ok(BlendingState::Off),
    _ => Err(StateQueryError::UnknownBlendingState(state)),
  }
}

unsafe fn get_ctx_blending_equations() -> Result<BlendingEquations, StateQueryError> {
  let mut rgb = gl::FUNC_ADD as GLint;
  let mut alpha = gl::FUNC_ADD as GLint;

  gl::GetIntegerv(gl::BLEND_EQUATION_RGB, &mut rgb);
  gl::GetIntegerv(gl::BLEND_EQUATION_ALPHA, &mut alpha);

  let rgb = map_enum_to_blending_equation(rgb as GLenum)?;
  let alpha = map_enum_to_blending_equation(alpha as GLenum)?;

  Ok(BlendingEquations { rgb, alpha })
}

unsafe fn get_ctx_blending_factors() -> Result<BlendingFactors, StateQueryError> {
  let mut src_rgb = gl::ONE as GLint;
  let mut dst_rgb = gl::ZERO as GLint;
  let mut src_alpha = gl::ONE as GLint;
  let mut dst_alpha = gl::ZERO as GLint;

  gl::GetIntegerv(gl::BLEND_SRC_RGB, &mut src_rgb);
  gl::GetIntegerv(gl::BLEND_DST_RGB, &mut dst_rgb);
  gl::GetIntegerv(gl::BLEND_SRC_ALPHA, &mut src_alpha);
  gl::GetIntegerv(gl::BLEND_DST_ALPHA, &mut dst_alpha);

  let src_rgb = from_gl_blending_factor(src_rgb as GLenum)
    .map_err(StateQueryError::UnknownBlendingSrcFactor)?;
  let dst_rgb = from_gl_blending_factor(dst_rgb as GLenum)
    .map_err(StateQueryError::UnknownBlendingDstFactor)?;
  let src_alpha = from_gl_blending_factor(src_alpha as GLenum)
    .map_err(StateQueryError::UnknownBlendingSrcFactor)?;
  let dst_alpha = from_gl_blending_factor(dst_alpha as GLenum)
    .map_err(StateQueryError::UnknownBlendingDstFactor)?;

  Ok(BlendingFactors {
    src_rgb,
    dst_rgb,
    src_alpha,
    dst_alpha,
  })
}

#[inline]
fn map_enum_to_blending_equation(data: GLenum) -> Result<Equation, StateQueryError> {
  match data {
    gl::FUNC_ADD => Ok(Equation::Additive),
    gl::FUNC_SUBTRACT => Ok(Equation::Subtract),
    gl::FUNC_REVERSE_SUBTRACT => Ok(Equation::ReverseSubtract),
    gl::MIN => Ok(Equation::Min),
    gl::MAX => Ok(Equation::Max),
    _ => Err(StateQueryError::UnknownBlendingEquation(data)),
  }
}

#[inline]
fn from_gl_blending_factor(factor: GLenum) -> Result<Factor, GLenum> {
  match factor {
    gl::ONE => Ok(Factor::One),
    gl::ZERO => Ok(Factor::Zero),
    gl::SRC_COLOR => Ok(Factor::SrcColor),
    gl::ONE_MINUS_SRC_COLOR => Ok(Factor::SrcColorComplement),
    gl::DST_COLOR => Ok(Factor::DestColor),
    gl::ONE_MINUS_DST_COLOR => Ok(Factor::DestColorComplement),
    gl::SRC_ALPHA => Ok(Factor::SrcAlpha),
    gl::ONE_MINUS_SRC_ALPHA => Ok(Factor::SrcAlphaComplement),
    gl::DST_ALPHA => Ok(Factor::DstAlpha),
    gl::ONE_MINUS_DST_ALPHA => Ok(Factor::DstAlphaComplement),
    gl::SRC_ALPHA_SATURATE => Ok(Factor::SrcAlphaSaturate),
    _ => Err(factor),
  }
}

unsafe fn get_ctx_color_mask() -> Result<ColorMask, StateQueryError> {
  let mut data: [GLboolean; 4] = [gl::TRUE; 4];
  gl::GetBooleanv(gl::COLOR_WRITEMASK, data.as_mut_ptr());

  let mut channels = [true; 4];
  for (channel, &raw) in channels.iter_mut().zip(&data) {
    *channel = match raw {
      gl::TRUE => true,
      gl::FALSE => false,
      _ => return Err(StateQueryError::UnknownColorMaskChannel(raw)),
    };
  }

  Ok(ColorMask {
    red: channels[0],
    green: channels[1],
    blue: channels[2],
    alpha: channels[3],
  })
}

unsafe fn get_ctx_depth_test() -> Result<DepthTest, StateQueryError> {
  let state = gl::IsEnabled(gl::DEPTH_TEST);

  match state {
    gl::TRUE => Ok(DepthTest::On),
    gl::FALSE => Ok(DepthTest::Off),
    _ => Err(StateQueryError::UnknownDepthTestState(state)),
  }
}

unsafe fn get_ctx_depth_write() -> Result<Write, StateQueryError> {
  let mut mask: GLboolean = gl::TRUE;
  gl::GetBooleanv(gl::DEPTH_WRITEMASK, &mut mask);

  match mask {
    gl::TRUE => Ok(Write::On),
    gl::FALSE => Ok(Write::Off),
    _ => Err(StateQueryError::UnknownDepthWriteMask(mask)),
  }
}

unsafe fn get_ctx_depth_clamp() -> Result<DepthClamp, StateQueryError> {
  let state = gl::IsEnabled(gl::DEPTH_CLAMP);

  match state {
    gl::TRUE => Ok(DepthClamp::On),
    gl::FALSE => Ok(DepthClamp::Off),
    _ => Err(StateQueryError::UnknownDepthClampState(state)),
  }
}

unsafe fn get_ctx_stencil_test() -> Result<StencilTestState, StateQueryError> {
  let state = gl::IsEnabled(gl::STENCIL_TEST);

  match state {
    gl::TRUE => Ok(StencilTestState::On),
    gl::FALSE => Ok(StencilTestState::Off),
    _ => Err(StateQueryError::UnknownStencilTestState(state)),
  }
}

unsafe fn get_ctx_face_culling_state() -> Result<FaceCullingState, StateQueryError> {
  let state = gl::IsEnabled(gl::CULL_FACE);

  match state {
    gl::TRUE => Ok(FaceCullingState::On),
    gl::FALSE => Ok(FaceCullingState::Off),
    _ => Err(StateQueryError::UnknownFaceCullingState(state)),
  }
}

unsafe fn get_ctx_face_culling_order() -> Result<FaceWinding, StateQueryError> {
  let mut order = gl::CCW as GLint;
  gl::GetIntegerv(gl::FRONT_FACE, &mut order);

  let order = order as GLenum;
  match order {
    gl::CCW => Ok(FaceWinding::CounterClockwise),
    gl::CW => Ok(FaceWinding::Clockwise),
    _ => Err(StateQueryError::UnknownFaceCullingOrder(order)),
  }
}

unsafe fn get_ctx_face_culling_mode() -> Result<Face, StateQueryError> {
  let mut mode = gl::BACK as GLint;
  gl::GetIntegerv(gl::CULL_FACE_MODE, &mut mode);

  let mode = mode as GLenum;
  match mode {
    gl::FRONT => Ok(Face::Front),
    gl::BACK => Ok(Face::Back),
    gl::FRONT_AND_BACK => Ok(Face::FrontAndBack),
    _ => Err(StateQueryError::UnknownFaceCullingMode(mode)),
  }
}

unsafe fn get_ctx_scissor_state() -> Result<ScissorState, StateQueryError> {
  let state = gl::IsEnabled(gl::SCISSOR_TEST);

  match state {
    gl::TRUE => Ok(ScissorState::On),
    gl::FALSE => Ok(ScissorState::Off),
    _ => Err(StateQueryError::UnknownScissorState(state)),
  }
}

unsafe fn get_ctx_scissor_region() -> Result<ScissorRegion, StateQueryError> {
  let mut data: [GLint; 4] = [0; 4];
  gl::GetIntegerv(gl::SCISSOR_BOX, data.as_mut_ptr());

  Ok(ScissorRegion {
    x: data[0].max(0) as u32,
    y: data[1].max(0) as u32,
    width: data[2].max(0) as u32,
    height: data[3].max(0) as u32,
  })
}

unsafe fn get_ctx_polygon_mode() -> Result<PolygonMode, StateQueryError> {
  let mut data: [GLint; 2] = [gl::FILL as GLint; 2];
  gl::GetIntegerv(gl::POLYGON_MODE, data.as_mut_ptr());

  let mode = data[0] as GLenum;
  match mode {
    gl::FILL => Ok(PolygonMode::Fill),
    gl::LINE => Ok(PolygonMode::Line),
    gl::POINT => Ok(PolygonMode::Point),
    _ => Err(StateQueryError::UnknownPolygonMode(mode)),
  }
}

unsafe fn get_ctx_line_width() -> Result<GLfloat, StateQueryError> {
  let mut data = 1.;
  gl::GetFloatv(gl::LINE_WIDTH, &mut data);
  Ok(data)
}

unsafe fn get_ctx_current_texture_unit() -> Result<GLenum, StateQueryError> {
  let mut active_texture = gl::TEXTURE0 as GLint;
  gl::GetIntegerv(gl::ACTIVE_TEXTURE, &mut active_texture);
  Ok(active_texture as GLenum - gl::TEXTURE0)
}

unsafe fn get_ctx_bound_vertex_array() -> Result<GLuint, StateQueryError> {
  let mut bound = 0 as GLint;
  gl::GetIntegerv(gl::VERTEX_ARRAY_BINDING, &mut bound);
  Ok(bound as GLuint)
}

unsafe fn get_ctx_current_program() -> Result<GLuint, StateQueryError> {
  let mut used = 0 as GLint;
  gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut used);
  Ok(used as GLuint)
}

unsafe fn get_ctx_bound_draw_framebuffer() -> Result<GLuint, StateQueryError> {
  let mut bound = 0 as GLint;
  gl::GetIntegerv(gl::DRAW_FRAMEBUFFER_BINDING, &mut bound);
  Ok(bound as GLuint)
}

unsafe fn get_ctx_bound_read_framebuffer() -> Result<GLuint, StateQueryError> {
  let mut bound = 0 as GLint;
  gl::GetIntegerv(gl::READ_FRAMEBUFFER_BINDING, &mut bound);
  Ok(bound as GLuint)
}

unsafe fn get_ctx_unpack_alignment() -> Result<GLint, StateQueryError> {
  let mut data = 4;
  gl::GetIntegerv(gl::UNPACK_ALIGNMENT, &mut data);
  Ok(data)
}

unsafe fn get_ctx_pack_alignment() -> Result<GLint, StateQueryError> {
  let mut data = 4;
  gl::GetIntegerv(gl::PACK_ALIGNMENT, &mut data);
  Ok(data)
}

/// Whether or not enable blending.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum BlendingState {
  /// Enable blending.
  On,
  /// Disable blending.
  Off,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct BlendingFactors {
  src_rgb: Factor,
  dst_rgb: Factor,
  src_alpha: Factor,
  dst_alpha: Factor,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct BlendingEquations {
  rgb: Equation,
  alpha: Equation,
}

/// Whether or not depth test should be enabled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum DepthTest {
  /// The depth test is enabled.
  On,
  /// The depth test is disabled.
  Off,
}

/// Whether or not depth clamping should be enabled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum DepthClamp {
  /// Depth clamping is enabled.
  On,
  /// Depth clamping is disabled.
  Off,
}

/// Whether or not the stencil test should be enabled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum StencilTestState {
  /// The stencil test is enabled.
  On,
  /// The stencil test is disabled.
  Off,
}

/// Should face culling be enabled?
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum FaceCullingState {
  /// Enable face culling.
  On,
  /// Disable face culling.
  Off,
}

/// Whether or not the scissor test should be enabled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ScissorState {
  /// The scissor test is enabled.
  On,
  /// The scissor test is disabled.
  Off,
}
