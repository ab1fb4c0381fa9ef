//! OpenGL timer query implementation.
//!
//! Timer queries measure elapsed device time with `GL_TIME_ELAPSED`. The driver allows a single
//! running `GL_TIME_ELAPSED` query per context, so [`GLState`] carries a flag shared by every
//! timer of the context.
//!
//! [`GLState`]: crate::gl33::GLState

use gl::types::*;
use std::cell::RefCell;
use std::rc::Rc;

use candela::backend::timer::Timer as TimerBackend;
use candela::timer::TimerError;

use crate::gl33::state::GLState;
use crate::gl33::GL33;

/// OpenGL timer query.
#[derive(Debug)]
pub struct TimerRepr {
  handle: GLuint,
  running: bool,
  ended: bool,
  state: Rc<RefCell<GLState>>,
}

unsafe impl TimerBackend for GL33 {
  type TimerRepr = TimerRepr;

  unsafe fn new_timer(&mut self) -> Result<Self::TimerRepr, TimerError> {
    let mut handle: GLuint = 0;

    gl::GenQueries(1, &mut handle);

    Ok(TimerRepr {
      handle,
      running: false,
      ended: false,
      state: self.state.clone(),
    })
  }

  unsafe fn destroy_timer(timer: &mut Self::TimerRepr) {
    if timer.running {
      gl::EndQuery(gl::TIME_ELAPSED);
      timer.state.borrow_mut().set_timer_query_running(false);
    }

    gl::DeleteQueries(1, &timer.handle);
  }

  unsafe fn begin(timer: &mut Self::TimerRepr) -> Result<(), TimerError> {
    if timer.running {
      return Err(TimerError::AlreadyRunning);
    }

    let mut state = timer.state.borrow_mut();

    if state.timer_query_running() {
      return Err(TimerError::AnotherQueryRunning);
    }

    gl::BeginQuery(gl::TIME_ELAPSED, timer.handle);
    state.set_timer_query_running(true);
    timer.running = true;
    // restarting drops the previous measure
    timer.ended = false;

    Ok(())
  }

  unsafe fn end(timer: &mut Self::TimerRepr) -> Result<(), TimerError> {
    if !timer.running {
      return Err(TimerError::NotRunning);
    }

    gl::EndQuery(gl::TIME_ELAPSED);
    timer.state.borrow_mut().set_timer_query_running(false);
    timer.running = false;
    timer.ended = true;

    Ok(())
  }

  unsafe fn is_ready(timer: &Self::TimerRepr) -> Result<bool, TimerError> {
    if !timer.ended {
      return Err(TimerError::NoResult);
    }

    let mut available: GLint = 0;
    gl::GetQueryObjectiv(timer.handle, gl::QUERY_RESULT_AVAILABLE, &mut available);

    Ok(available == gl::TRUE.into())
  }

  unsafe fn wait_nanoseconds(timer: &Self::TimerRepr) -> Result<u64, TimerError> {
    if !timer.ended {
      return Err(TimerError::NoResult);
    }

    let mut nanoseconds: GLuint64 = 0;
    gl::GetQueryObjectui64v(timer.handle, gl::QUERY_RESULT, &mut nanoseconds);

    Ok(nanoseconds)
  }
}
