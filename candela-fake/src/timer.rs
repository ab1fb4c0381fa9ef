//! Software timer query implementation.
//!
//! There is no device to time, so measures come from a software clock that advances one
//! millisecond at every observation. Results are deterministic, nonzero and grow with the
//! number of observations between `begin` and `end`, which is all timing code paths need.

use std::cell::RefCell;
use std::rc::Rc;

use candela::backend::timer::Timer as TimerBackend;
use candela::timer::TimerError;

use crate::state::FakeState;
use crate::FakeBackend;

/// Software timer query.
#[derive(Debug)]
pub struct TimerRepr {
  id: u64,
  running: bool,
  ended: bool,
  begin_nanoseconds: u64,
  end_nanoseconds: u64,
  state: Rc<RefCell<FakeState>>,
}

unsafe impl TimerBackend for FakeBackend {
  type TimerRepr = TimerRepr;

  unsafe fn new_timer(&mut self) -> Result<Self::TimerRepr, TimerError> {
    let mut state = self.state.borrow_mut();
    let id = state.fresh_id();

    log::debug!("context {}: timer {}: allocated", state.name(), id);

    drop(state);

    Ok(TimerRepr {
      id,
      running: false,
      ended: false,
      begin_nanoseconds: 0,
      end_nanoseconds: 0,
      state: self.state.clone(),
    })
  }

  unsafe fn destroy_timer(timer: &mut Self::TimerRepr) {
    let mut state = timer.state.borrow_mut();

    if timer.running {
      state.set_timer_running(false);
    }

    log::debug!("context {}: timer {}: destroyed", state.name(), timer.id);
  }

  unsafe fn begin(timer: &mut Self::TimerRepr) -> Result<(), TimerError> {
    if timer.running {
      return Err(TimerError::AlreadyRunning);
    }

    let mut state = timer.state.borrow_mut();

    if state.timer_running() {
      return Err(TimerError::AnotherQueryRunning);
    }

    timer.begin_nanoseconds = state.next_instant();
    state.set_timer_running(true);
    timer.running = true;
    // restarting drops the previous measure
    timer.ended = false;

    Ok(())
  }

  unsafe fn end(timer: &mut Self::TimerRepr) -> Result<(), TimerError> {
    if !timer.running {
      return Err(TimerError::NotRunning);
    }

    let mut state = timer.state.borrow_mut();

    timer.end_nanoseconds = state.next_instant();
    state.set_timer_running(false);
    timer.running = false;
    timer.ended = true;

    Ok(())
  }

  unsafe fn is_ready(timer: &Self::TimerRepr) -> Result<bool, TimerError> {
    if !timer.ended {
      return Err(TimerError::NoResult);
    }

    Ok(true)
  }

  unsafe fn wait_nanoseconds(timer: &Self::TimerRepr) -> Result<u64, TimerError> {
    if !timer.ended {
      return Err(TimerError::NoResult);
    }

    Ok(timer.end_nanoseconds - timer.begin_nanoseconds)
  }
}
